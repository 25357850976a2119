// src/services/inventory_service.rs

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, time_utils},
    models::{
        batch::Batch,
        history::{HistoryEntry, StockLog},
        location::{LocationKey, StockLevel},
    },
    store::ErpStore,
};

// A razão de estoque: entrada de matéria-prima e extração para lote.
#[derive(Clone)]
pub struct InventoryService {
    store: ErpStore,
}

impl InventoryService {
    pub fn new(store: ErpStore) -> Self {
        Self { store }
    }

    // --- ENTRADA DE ESTOQUE ---
    // Exige produto configurado e sub-zona já criada (a interface original
    // garantia os dois via dropdown; aqui viram erros tipados). Grava o
    // registro "Added to Stock" no histórico da sub-zona.
    pub async fn deposit_stock(
        &self,
        factory: &str,
        room: &str,
        sub_zone: &str,
        product: &str,
        quantity: Decimal,
    ) -> Result<StockLevel, AppError> {
        let mut state = self.store.write().await;

        if !state.has_room(factory, room) {
            return Err(AppError::LocationNotFound);
        }
        if !state.products.contains_key(product) {
            return Err(AppError::ProductNotFound);
        }

        let key = LocationKey::new(factory, room);
        let zone = state
            .zone_mut(&key.storage_key(), sub_zone)
            .ok_or(AppError::LocationNotFound)?;

        let level = zone.deposit(product, quantity)?;
        zone.history.push(HistoryEntry::Stock(StockLog {
            product_type: product.to_string(),
            action: "Added to Stock".to_string(),
            quantity,
            date: time_utils::now_stamp(),
        }));

        Ok(StockLevel {
            product_type: product.to_string(),
            quantity: level,
        })
    }

    // --- EXTRAÇÃO PARA LOTE ---
    // Baixa o estoque e cria o lote com uma cópia independente do template
    // de etapas. Nome ausente recebe o menor "Batch {n}" livre; nome em uso
    // em qualquer lugar do sistema é rejeitado. Nada é mutado em caso de
    // falha.
    pub async fn extract_batch(
        &self,
        factory: &str,
        room: &str,
        sub_zone: &str,
        product: &str,
        name: Option<&str>,
        quantity: Decimal,
    ) -> Result<Batch, AppError> {
        let mut state = self.store.write().await;

        if !state.has_room(factory, room) {
            return Err(AppError::LocationNotFound);
        }

        let batch_name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(given) => given.to_string(),
            None => state.unique_batch_name(),
        };
        state.assert_name_free(&batch_name, None)?;

        // Produto removido da configuração depois do depósito ainda pode ser
        // extraído; o lote sai com a lista de etapas vazia, como no original.
        let steps = state.products.get(product).cloned().unwrap_or_default();

        let key = LocationKey::new(factory, room);
        let zone = state
            .zone_mut(&key.storage_key(), sub_zone)
            .ok_or(AppError::LocationNotFound)?;

        zone.withdraw(product, quantity)?;

        let batch = Batch::extract(product, &batch_name, quantity, steps);
        zone.active.push(batch.clone());
        Ok(batch)
    }
}
