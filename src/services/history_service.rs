// src/services/history_service.rs

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    common::{error::AppError, time_utils},
    models::{
        batch::{Batch, TimelineEntry},
        dashboard::{ActivityStatus, DashboardEntry},
        history::{self, ConsolidatedHistory, HistoryEntry},
        location::{LocationEntry, LocationKey},
    },
    store::ErpStore,
};

// Filtro da consulta de histórico. Sem limites de data, tudo entra;
// fábrica/sala/sub-zona ausentes não restringem.
#[derive(Debug, Default, Clone)]
pub struct HistoryFilter {
    pub factory: Option<String>,
    pub room: Option<String>,
    pub sub_zone: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Consultas de relatório: tudo aqui lê, nada muta.
#[derive(Clone)]
pub struct HistoryService {
    store: ErpStore,
}

impl HistoryService {
    pub fn new(store: ErpStore) -> Self {
        Self { store }
    }

    // Fotografia de um local "fábrica::sala" para a tela de inventário.
    // Local configurado mas nunca tocado devolve a entrada vazia.
    pub async fn location_snapshot(
        &self,
        factory: &str,
        room: &str,
    ) -> Result<LocationEntry, AppError> {
        let state = self.store.read().await;
        if !state.has_room(factory, room) {
            return Err(AppError::LocationNotFound);
        }
        Ok(state
            .locations
            .get(&LocationKey::new(factory, room).storage_key())
            .cloned()
            .unwrap_or_default())
    }

    pub async fn all_batch_names(&self) -> Vec<String> {
        let state = self.store.read().await;
        let mut names: Vec<String> = state.all_batch_names().into_iter().collect();
        names.sort();
        names
    }

    // Histórico filtrado por local e período, consolidado para exibição:
    // lotes de mesmo nome mesclados, registros de estoque individuais do
    // mais recente para o mais antigo.
    pub async fn query_history(&self, filter: &HistoryFilter) -> ConsolidatedHistory {
        let state = self.store.read().await;
        let mut entries: Vec<HistoryEntry> = Vec::new();

        for (raw_key, entry) in &state.locations {
            let key = LocationKey::parse(raw_key);
            if filter.factory.as_deref().is_some_and(|f| f != key.factory) {
                continue;
            }
            if filter.room.as_deref().is_some_and(|r| r != key.room) {
                continue;
            }
            for (sub_zone, zone) in &entry.data {
                if filter.sub_zone.as_deref().is_some_and(|s| s != sub_zone) {
                    continue;
                }
                for record in &zone.history {
                    if time_utils::within_range(
                        record.effective_date(),
                        filter.start_date,
                        filter.end_date,
                    ) {
                        entries.push(record.clone());
                    }
                }
            }
        }

        history::consolidate(entries)
    }

    // O painel global: todo lote ativo ou arquivado cujos registros caem no
    // período, com a linha do tempo filtrada e invertida (mais novo
    // primeiro), ordenado pela atividade mais recente.
    pub async fn dashboard_feed(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<DashboardEntry> {
        let state = self.store.read().await;
        let mut items: Vec<(NaiveDateTime, DashboardEntry)> = Vec::new();

        for (raw_key, entry) in &state.locations {
            let key = LocationKey::parse(raw_key);
            for (sub_zone, zone) in &entry.data {
                for batch in &zone.active {
                    let status = if batch.is_processing {
                        ActivityStatus::InProcess
                    } else {
                        ActivityStatus::Pending
                    };
                    if let Some(item) =
                        feed_entry(&key, sub_zone, batch, status, start_date, end_date)
                    {
                        items.push(item);
                    }
                }
                for record in &zone.history {
                    if let HistoryEntry::Batch(archived) = record {
                        if let Some(item) = feed_entry(
                            &key,
                            sub_zone,
                            &archived.batch,
                            ActivityStatus::Completed,
                            start_date,
                            end_date,
                        ) {
                            items.push(item);
                        }
                    }
                }
            }
        }

        items.sort_by(|a, b| b.0.cmp(&a.0));
        items.into_iter().map(|(_, entry)| entry).collect()
    }
}

// Monta o cartão do painel; lote sem nenhum registro dentro do período fica
// de fora do feed.
fn feed_entry(
    key: &LocationKey,
    sub_zone: &str,
    batch: &Batch,
    status: ActivityStatus,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Option<(NaiveDateTime, DashboardEntry)> {
    let mut valid: Vec<TimelineEntry> = batch
        .timeline
        .iter()
        .filter(|record| {
            time_utils::within_range(
                time_utils::stamp_date(&record.timestamp),
                start_date,
                end_date,
            )
        })
        .cloned()
        .collect();
    if valid.is_empty() {
        return None;
    }
    valid.reverse();
    let latest = time_utils::parse_stamp(&valid[0].timestamp);

    Some((
        latest,
        DashboardEntry {
            factory: key.factory.clone(),
            room: key.room.clone(),
            sub_zone: sub_zone.to_string(),
            product_type: batch.product_type.clone(),
            name: batch.name.clone(),
            status,
            step_index: batch.step_index,
            total_steps: batch.steps.len(),
            timeline: valid,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        batch::Batch,
        history::{ArchivedBatch, StockLog},
    };
    use rust_decimal::Decimal;

    fn timeline_entry(description: &str, timestamp: &str) -> TimelineEntry {
        TimelineEntry {
            description: description.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    async fn seeded_store() -> ErpStore {
        let store = ErpStore::new();
        let mut state = store.write().await;
        state
            .factories
            .push(crate::models::catalog::FactoryEntry {
                name: "Planta Sul".to_string(),
                rooms: vec!["Sala 1".to_string()],
            });

        let zone = state.sub_zone_mut(&LocationKey::new("Planta Sul", "Sala 1"), "Zona A");
        zone.history.push(HistoryEntry::Stock(StockLog {
            product_type: "Steel".to_string(),
            action: "Added to Stock".to_string(),
            quantity: Decimal::from(500),
            date: "2026-02-01 09:00 AM".to_string(),
        }));

        let mut batch = Batch::extract("Steel", "Batch 1", Decimal::from(300), vec![]);
        batch.timeline = vec![
            timeline_entry("Created from Stock", "2026-02-02 09:00 AM"),
            timeline_entry("Started: Cut", "2026-02-03 09:00 AM"),
        ];
        zone.history.push(HistoryEntry::Batch(ArchivedBatch {
            batch,
            date_completed: "2026-02-03 10:00 AM".to_string(),
        }));

        let mut live = Batch::extract("Steel", "Batch 2", Decimal::from(100), vec![
            "Cut".to_string(),
        ]);
        live.timeline = vec![timeline_entry("Created from Stock", "2026-02-05 08:00 AM")];
        zone.active.push(live);

        drop(state);
        store
    }

    #[tokio::test]
    async fn date_filter_excludes_out_of_range_entries() {
        let service = HistoryService::new(seeded_store().await);
        let filter = HistoryFilter {
            start_date: NaiveDate::from_ymd_opt(2026, 2, 2),
            ..Default::default()
        };
        let result = service.query_history(&filter).await;
        // O registro de estoque de 01/02 ficou de fora; o lote de 03/02 entrou.
        assert!(result.stock_logs.is_empty());
        assert_eq!(result.batches.len(), 1);
        assert_eq!(result.batches[0].batch.name, "Batch 1");
    }

    #[tokio::test]
    async fn no_bounds_includes_everything() {
        let service = HistoryService::new(seeded_store().await);
        let result = service.query_history(&HistoryFilter::default()).await;
        assert_eq!(result.stock_logs.len(), 1);
        assert_eq!(result.batches.len(), 1);
    }

    #[tokio::test]
    async fn location_filter_narrows_the_query() {
        let service = HistoryService::new(seeded_store().await);
        let filter = HistoryFilter {
            sub_zone: Some("Zona X".to_string()),
            ..Default::default()
        };
        let result = service.query_history(&filter).await;
        assert!(result.batches.is_empty());
        assert!(result.stock_logs.is_empty());
    }

    #[tokio::test]
    async fn snapshot_of_untouched_location_is_empty() {
        let store = seeded_store().await;
        {
            let mut state = store.write().await;
            state.factory_mut("Planta Sul").unwrap().rooms.push("Sala 2".to_string());
        }
        let service = HistoryService::new(store);
        let snapshot = service.location_snapshot("Planta Sul", "Sala 2").await.unwrap();
        assert!(snapshot.sub_zones.is_empty());

        assert!(matches!(
            service.location_snapshot("Planta Sul", "Sala 9").await,
            Err(AppError::LocationNotFound)
        ));
    }

    #[tokio::test]
    async fn dashboard_orders_by_latest_activity() {
        let service = HistoryService::new(seeded_store().await);
        let feed = service.dashboard_feed(None, None).await;
        assert_eq!(feed.len(), 2);
        // O lote vivo (05/02) vem antes do arquivado (03/02).
        assert_eq!(feed[0].name, "Batch 2");
        assert_eq!(feed[0].status, ActivityStatus::Pending);
        assert_eq!(feed[1].name, "Batch 1");
        assert_eq!(feed[1].status, ActivityStatus::Completed);
        // Linha do tempo invertida: registro mais novo primeiro.
        assert_eq!(feed[1].timeline[0].description, "Started: Cut");
    }

    #[tokio::test]
    async fn dashboard_skips_batches_outside_the_range() {
        let service = HistoryService::new(seeded_store().await);
        let feed = service
            .dashboard_feed(
                NaiveDate::from_ymd_opt(2026, 2, 5),
                NaiveDate::from_ymd_opt(2026, 2, 6),
            )
            .await;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].name, "Batch 2");
    }

    #[tokio::test]
    async fn batch_names_are_sorted_and_global() {
        let service = HistoryService::new(seeded_store().await);
        assert_eq!(service.all_batch_names().await, vec!["Batch 1", "Batch 2"]);
    }
}
