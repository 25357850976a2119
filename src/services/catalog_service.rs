// src/services/catalog_service.rs

use crate::{
    common::error::AppError,
    models::catalog::{FactoryEntry, ProductConfig},
    store::ErpStore,
};

// Configuração global: catálogo de produtos (com seus templates de
// roteamento) e a hierarquia fábrica → sala → sub-zona.
#[derive(Clone)]
pub struct CatalogService {
    store: ErpStore,
}

impl CatalogService {
    pub fn new(store: ErpStore) -> Self {
        Self { store }
    }

    // --- PRODUTOS ---

    pub async fn create_product(&self, name: &str) -> Result<ProductConfig, AppError> {
        let mut state = self.store.write().await;
        if state.products.contains_key(name) {
            return Err(AppError::DuplicateName(name.to_string()));
        }
        state.products.insert(name.to_string(), Vec::new());
        Ok(ProductConfig {
            name: name.to_string(),
            steps: Vec::new(),
        })
    }

    pub async fn list_products(&self) -> Vec<ProductConfig> {
        let state = self.store.read().await;
        let mut products: Vec<ProductConfig> = state
            .products
            .iter()
            .map(|(name, steps)| ProductConfig {
                name: name.clone(),
                steps: steps.clone(),
            })
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    // Renomear o produto não toca nos lotes já extraídos: cada lote carrega
    // o nome do produto e as etapas que valiam na extração.
    pub async fn rename_product(&self, name: &str, new_name: &str) -> Result<ProductConfig, AppError> {
        let mut state = self.store.write().await;
        if new_name != name && state.products.contains_key(new_name) {
            return Err(AppError::DuplicateName(new_name.to_string()));
        }
        let steps = state
            .products
            .remove(name)
            .ok_or(AppError::ProductNotFound)?;
        state.products.insert(new_name.to_string(), steps.clone());
        Ok(ProductConfig {
            name: new_name.to_string(),
            steps,
        })
    }

    pub async fn delete_product(&self, name: &str) -> Result<(), AppError> {
        let mut state = self.store.write().await;
        state
            .products
            .remove(name)
            .map(|_| ())
            .ok_or(AppError::ProductNotFound)
    }

    // --- TEMPLATE DE ROTEAMENTO ---

    // Posição 1-based opcional; ausente ou fora da faixa vira append,
    // com o mesmo clamp da inserção nas etapas de um lote.
    pub async fn add_routing_step(
        &self,
        product: &str,
        description: &str,
        position: Option<usize>,
    ) -> Result<ProductConfig, AppError> {
        let mut state = self.store.write().await;
        let steps = state
            .products
            .get_mut(product)
            .ok_or(AppError::ProductNotFound)?;
        let idx = match position {
            Some(pos) => pos.saturating_sub(1).min(steps.len()),
            None => steps.len(),
        };
        steps.insert(idx, description.to_string());
        Ok(ProductConfig {
            name: product.to_string(),
            steps: steps.clone(),
        })
    }

    pub async fn rename_routing_step(
        &self,
        product: &str,
        index: usize,
        description: &str,
    ) -> Result<ProductConfig, AppError> {
        let mut state = self.store.write().await;
        let steps = state
            .products
            .get_mut(product)
            .ok_or(AppError::ProductNotFound)?;
        let slot = steps.get_mut(index).ok_or(AppError::StepNotFound)?;
        *slot = description.to_string();
        Ok(ProductConfig {
            name: product.to_string(),
            steps: steps.clone(),
        })
    }

    pub async fn delete_routing_step(
        &self,
        product: &str,
        index: usize,
    ) -> Result<ProductConfig, AppError> {
        let mut state = self.store.write().await;
        let steps = state
            .products
            .get_mut(product)
            .ok_or(AppError::ProductNotFound)?;
        if index >= steps.len() {
            return Err(AppError::StepNotFound);
        }
        steps.remove(index);
        Ok(ProductConfig {
            name: product.to_string(),
            steps: steps.clone(),
        })
    }

    // --- FÁBRICAS E SALAS ---

    pub async fn list_factories(&self) -> Vec<FactoryEntry> {
        self.store.read().await.factories.clone()
    }

    pub async fn create_factory(&self, name: &str) -> Result<FactoryEntry, AppError> {
        let mut state = self.store.write().await;
        if state.factory(name).is_some() {
            return Err(AppError::DuplicateName(name.to_string()));
        }
        let entry = FactoryEntry::new(name);
        state.factories.push(entry.clone());
        Ok(entry)
    }

    // Renomear migra as chaves "fábrica::sala" dos locais já criados, para o
    // documento de backup continuar internamente consistente.
    pub async fn rename_factory(&self, name: &str, new_name: &str) -> Result<FactoryEntry, AppError> {
        let mut state = self.store.write().await;
        if new_name != name && state.factory(new_name).is_some() {
            return Err(AppError::DuplicateName(new_name.to_string()));
        }
        let entry = state.factory_mut(name).ok_or(AppError::FactoryNotFound)?;
        entry.name = new_name.to_string();
        let updated = entry.clone();
        for room in &updated.rooms {
            let old_key = format!("{name}::{room}");
            if let Some(data) = state.locations.remove(&old_key) {
                state.locations.insert(format!("{new_name}::{room}"), data);
            }
        }
        Ok(updated)
    }

    pub async fn delete_factory(&self, name: &str) -> Result<(), AppError> {
        let mut state = self.store.write().await;
        let position = state
            .factories
            .iter()
            .position(|f| f.name == name)
            .ok_or(AppError::FactoryNotFound)?;
        let removed = state.factories.remove(position);
        for room in &removed.rooms {
            state.locations.remove(&format!("{name}::{room}"));
        }
        Ok(())
    }

    pub async fn create_room(&self, factory: &str, room: &str) -> Result<FactoryEntry, AppError> {
        let mut state = self.store.write().await;
        let entry = state.factory_mut(factory).ok_or(AppError::FactoryNotFound)?;
        if entry.rooms.iter().any(|r| r == room) {
            return Err(AppError::DuplicateName(room.to_string()));
        }
        entry.rooms.push(room.to_string());
        Ok(entry.clone())
    }

    pub async fn rename_room(
        &self,
        factory: &str,
        room: &str,
        new_name: &str,
    ) -> Result<FactoryEntry, AppError> {
        let mut state = self.store.write().await;
        let entry = state.factory_mut(factory).ok_or(AppError::FactoryNotFound)?;
        if new_name != room && entry.rooms.iter().any(|r| r == new_name) {
            return Err(AppError::DuplicateName(new_name.to_string()));
        }
        let slot = entry
            .rooms
            .iter_mut()
            .find(|r| *r == room)
            .ok_or(AppError::LocationNotFound)?;
        *slot = new_name.to_string();
        let updated = entry.clone();
        let old_key = format!("{factory}::{room}");
        if let Some(data) = state.locations.remove(&old_key) {
            state
                .locations
                .insert(format!("{factory}::{new_name}"), data);
        }
        Ok(updated)
    }

    pub async fn delete_room(&self, factory: &str, room: &str) -> Result<(), AppError> {
        let mut state = self.store.write().await;
        let entry = state.factory_mut(factory).ok_or(AppError::FactoryNotFound)?;
        let position = entry
            .rooms
            .iter()
            .position(|r| r == room)
            .ok_or(AppError::LocationNotFound)?;
        entry.rooms.remove(position);
        state.locations.remove(&format!("{factory}::{room}"));
        Ok(())
    }

    // Cria o contêiner de uma sub-zona. A fábrica e a sala precisam existir
    // na configuração; o nome precisa ser inédito dentro do local.
    pub async fn create_sub_zone(
        &self,
        factory: &str,
        room: &str,
        name: &str,
    ) -> Result<(), AppError> {
        let mut state = self.store.write().await;
        if !state.has_room(factory, room) {
            return Err(AppError::LocationNotFound);
        }
        let key = crate::models::location::LocationKey::new(factory, room);
        let entry = state.location_entry_mut(&key);
        if entry.sub_zones.iter().any(|s| s == name) {
            return Err(AppError::DuplicateName(name.to_string()));
        }
        entry.sub_zone_mut(name);
        Ok(())
    }
}
