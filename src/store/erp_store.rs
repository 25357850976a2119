// src/store/erp_store.rs

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::erp_state::ErpState;

// O "pool" deste backend: um único RwLock sobre o documento de estado.
// Todo comando segura o lock de escrita do começo ao fim da mutação, então
// leitores nunca enxergam uma relocação pela metade; consultas compartilham
// o lock de leitura. Nenhuma operação faz I/O segurando o lock.
#[derive(Clone, Default)]
pub struct ErpStore {
    inner: Arc<RwLock<ErpState>>,
}

impl ErpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, ErpState> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, ErpState> {
        self.inner.write().await
    }

    // Fotografia do documento inteiro, para o backup.
    pub async fn export(&self) -> ErpState {
        self.inner.read().await.clone()
    }

    // Substitui o documento inteiro (restauração de backup).
    pub async fn import(&self, document: ErpState) {
        *self.inner.write().await = document;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::LocationKey;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn export_import_round_trips_the_document() {
        let store = ErpStore::new();
        {
            let mut state = store.write().await;
            state.products.insert(
                "Steel".to_string(),
                vec!["Cut".to_string(), "Weld".to_string()],
            );
            state
                .sub_zone_mut(&LocationKey::new("Planta Sul", "Sala 1"), "Zona A")
                .deposit("Steel", Decimal::from(500))
                .unwrap();
        }

        let document = store.export().await;
        let json = serde_json::to_string(&document).unwrap();
        let parsed: ErpState = serde_json::from_str(&json).unwrap();

        let restored = ErpStore::new();
        restored.import(parsed).await;

        let state = restored.read().await;
        assert_eq!(state.products.get("Steel").unwrap().len(), 2);
        assert_eq!(
            state
                .sub_zone(&LocationKey::new("Planta Sul", "Sala 1"), "Zona A")
                .unwrap()
                .current_stock("Steel"),
            Decimal::from(500)
        );
    }
}
