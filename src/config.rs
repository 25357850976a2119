// src/config.rs

use crate::{
    services::{BatchService, CatalogService, HistoryService, InventoryService},
    store::ErpStore,
};
use std::env;

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub store: ErpStore,
    pub catalog_service: CatalogService,
    pub inventory_service: InventoryService,
    pub batch_service: BatchService,
    pub history_service: HistoryService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // Todo o estado vive na memória do processo; o backup JSON é a única
        // forma de persistência (exportação sob demanda).
        let store = ErpStore::new();
        tracing::info!("✅ Armazenamento em memória inicializado!");

        // --- Monta o gráfico de dependências ---
        let catalog_service = CatalogService::new(store.clone());
        let inventory_service = InventoryService::new(store.clone());
        let batch_service = BatchService::new(store.clone());
        let history_service = HistoryService::new(store.clone());

        Ok(Self {
            store,
            catalog_service,
            inventory_service,
            batch_service,
            history_service,
        })
    }

    pub fn server_addr() -> String {
        env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
    }
}
