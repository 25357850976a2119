// src/models/history.rs

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::time_utils;
use crate::models::batch::Batch;

// --- 1. Registro de estoque ---
// Gerado apenas pelo depósito de matéria-prima ("Added to Stock").
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLog {
    #[schema(example = "Aço 1045")]
    pub product_type: String,

    #[schema(example = "Added to Stock")]
    pub action: String,

    #[schema(example = 500.0)]
    pub quantity: Decimal,

    // Carimbo no formato legado (ver `time_utils`).
    pub date: String,
}

// --- 2. Fotografia de um lote concluído ---
// Cópia profunda do lote no momento do arquivamento. Nenhuma subestrutura
// (etapas, linha do tempo) é compartilhada com o lote vivo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedBatch {
    #[serde(flatten)]
    pub batch: Batch,

    pub date_completed: String,
}

impl ArchivedBatch {
    // Sela o lote para o histórico: carimbo de conclusão mais o registro
    // final na linha do tempo, com o mesmo horário.
    pub fn seal(mut batch: Batch) -> Self {
        let date_completed = time_utils::now_stamp();
        batch.timeline.push(crate::models::batch::TimelineEntry {
            description: "Batch Finalized & Archived".to_string(),
            timestamp: date_completed.clone(),
        });
        Self {
            batch,
            date_completed,
        }
    }
}

// --- 3. Entrada de histórico ---
// Imutável depois de acrescentada; a consolidação abaixo trabalha sempre
// sobre cópias.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "entryType")]
pub enum HistoryEntry {
    Stock(StockLog),
    Batch(ArchivedBatch),
}

impl HistoryEntry {
    // Data efetiva para o filtro de período: `date`, senão `dateCompleted`,
    // senão o carimbo do último registro da linha do tempo.
    pub fn effective_date(&self) -> NaiveDate {
        match self {
            HistoryEntry::Stock(log) => time_utils::stamp_date(&log.date),
            HistoryEntry::Batch(entry) => {
                if !entry.date_completed.is_empty() {
                    time_utils::stamp_date(&entry.date_completed)
                } else if let Some(last) = entry.batch.timeline.last() {
                    time_utils::stamp_date(&last.timestamp)
                } else {
                    time_utils::stamp_date("")
                }
            }
        }
    }
}

// --- 4. Visão consolidada para relatório ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedHistory {
    pub batches: Vec<ArchivedBatch>,
    pub stock_logs: Vec<StockLog>,
}

// Mescla entradas de lote que compartilham o mesmo nome: soma as quantidades
// e une as linhas do tempo deduplicando por carimbo idêntico, ordenando o
// resultado por horário crescente. Registros de estoque nunca são mesclados;
// saem individualmente, do mais recente para o mais antigo. Somente leitura:
// o histórico armazenado não é tocado.
pub fn consolidate(entries: Vec<HistoryEntry>) -> ConsolidatedHistory {
    let mut batches: Vec<ArchivedBatch> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut stock_logs: Vec<StockLog> = Vec::new();

    for entry in entries {
        match entry {
            HistoryEntry::Stock(log) => stock_logs.push(log),
            HistoryEntry::Batch(incoming) => match by_name.get(&incoming.batch.name) {
                Some(&idx) => {
                    let target = &mut batches[idx];
                    target.batch.quantity += incoming.batch.quantity;
                    let mut seen: HashSet<String> = target
                        .batch
                        .timeline
                        .iter()
                        .map(|t| t.timestamp.clone())
                        .collect();
                    for record in incoming.batch.timeline {
                        if seen.insert(record.timestamp.clone()) {
                            target.batch.timeline.push(record);
                        }
                    }
                }
                None => {
                    by_name.insert(incoming.batch.name.clone(), batches.len());
                    batches.push(incoming);
                }
            },
        }
    }

    for entry in &mut batches {
        entry
            .batch
            .timeline
            .sort_by_key(|record| time_utils::parse_stamp(&record.timestamp));
    }
    stock_logs.reverse();

    ConsolidatedHistory {
        batches,
        stock_logs,
    }
}
