// src/common/time_utils.rs

use chrono::{Local, NaiveDate, NaiveDateTime};

// Formato de carimbo usado em toda a linha do tempo e no histórico.
// É o formato legado do app original, então backups antigos continuam legíveis.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

// Formato curto sem ano ("09:30 AM, 05 Mar") que aparece em registros antigos.
const SHORT_FORMAT: &str = "%I:%M %p, %d %b %Y";

// Carimbo de "agora" no horário local.
pub fn now_stamp() -> String {
    Local::now().format(STAMP_FORMAT).to_string()
}

// Interpreta um carimbo de data/hora vindo da linha do tempo ou do histórico.
// Carimbos malformados caem em "agora" em vez de derrubar a consulta inteira —
// comportamento lossy documentado, concentrado aqui para ficar testável.
pub fn parse_stamp(raw: &str) -> NaiveDateTime {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw.trim(), STAMP_FORMAT) {
        return dt;
    }
    // O formato curto não carrega ano; assume 1900 como o strptime original.
    if let Ok(dt) = NaiveDateTime::parse_from_str(&format!("{} 1900", raw.trim()), SHORT_FORMAT) {
        return dt;
    }
    Local::now().naive_local()
}

// Data (granularidade de dia) de um carimbo, para os filtros de período.
pub fn stamp_date(raw: &str) -> NaiveDate {
    parse_stamp(raw).date()
}

// Inclusão em um intervalo [start, end], comparando só a data.
pub fn within_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(start) = start {
        if date < start {
            return false;
        }
    }
    if let Some(end) = end {
        if date > end {
            return false;
        }
    }
    true
}
