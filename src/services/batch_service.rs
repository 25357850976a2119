// src/services/batch_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        batch::{Batch, BatchState},
        history::{ArchivedBatch, HistoryEntry},
        location::LocationKey,
    },
    store::ErpStore,
};

// Ciclo de vida do lote: transições de etapa, edição das etapas e dos
// campos, relocação entre locais e arquivamento no histórico.
#[derive(Clone)]
pub struct BatchService {
    store: ErpStore,
}

impl BatchService {
    pub fn new(store: ErpStore) -> Self {
        Self { store }
    }

    // Aplica uma mutação ao lote segurando o lock de escrita, devolvendo a
    // cópia atualizada. A mutação falha sem efeito colateral.
    async fn with_batch<F>(&self, id: Uuid, apply: F) -> Result<Batch, AppError>
    where
        F: FnOnce(&mut Batch) -> Result<(), AppError>,
    {
        let mut state = self.store.write().await;
        let batch = state.batch_mut(id).ok_or(AppError::BatchNotFound)?;
        apply(batch)?;
        Ok(batch.clone())
    }

    // --- TRANSIÇÕES ---

    pub async fn start_step(&self, id: Uuid) -> Result<Batch, AppError> {
        self.with_batch(id, |batch| batch.start_step()).await
    }

    pub async fn finish_step(&self, id: Uuid) -> Result<Batch, AppError> {
        self.with_batch(id, |batch| batch.finish_step()).await
    }

    pub async fn revert_step(&self, id: Uuid) -> Result<Batch, AppError> {
        self.with_batch(id, |batch| {
            batch.revert();
            Ok(())
        })
        .await
    }

    // --- EDIÇÃO DE ETAPAS E CAMPOS ---

    pub async fn insert_custom_step(
        &self,
        id: Uuid,
        description: &str,
        position: Option<usize>,
    ) -> Result<Batch, AppError> {
        self.with_batch(id, |batch| {
            batch.insert_step(description, position);
            Ok(())
        })
        .await
    }

    pub async fn delete_batch_step(&self, id: Uuid, index: usize) -> Result<Batch, AppError> {
        self.with_batch(id, |batch| batch.delete_step(index).map(|_| ()))
            .await
    }

    pub async fn set_quantity(&self, id: Uuid, quantity: Decimal) -> Result<Batch, AppError> {
        self.with_batch(id, |batch| batch.set_quantity(quantity))
            .await
    }

    pub async fn rename_batch(&self, id: Uuid, new_name: &str) -> Result<Batch, AppError> {
        let mut state = self.store.write().await;
        let current = state.batch(id).ok_or(AppError::BatchNotFound)?.name.clone();
        state.assert_name_free(new_name, Some(&current))?;
        let batch = state.batch_mut(id).ok_or(AppError::BatchNotFound)?;
        batch.name = new_name.to_string();
        Ok(batch.clone())
    }

    // --- RELOCAÇÃO ---
    // O destino é validado antes de qualquer remoção; a dupla mutação
    // (remover da origem, inserir no destino) acontece sob o mesmo lock de
    // escrita, então o lote nunca é visto em dois lugares nem em nenhum.
    // Nenhum estoque acompanha o lote.
    pub async fn relocate(
        &self,
        id: Uuid,
        to_factory: &str,
        to_room: &str,
        to_sub_zone: &str,
    ) -> Result<Batch, AppError> {
        let mut state = self.store.write().await;

        if !state.has_room(to_factory, to_room) {
            return Err(AppError::UnresolvedDestination);
        }

        let origin = state.find_batch(id).ok_or(AppError::BatchNotFound)?;
        let from = LocationKey::parse(&origin.location_key);

        let mut batch = {
            let zone = state
                .zone_mut(&origin.location_key, &origin.sub_zone)
                .ok_or(AppError::BatchNotFound)?;
            zone.active.remove(origin.index)
        };
        batch.log(format!(
            "Relocated: [{} > {} > {}] → [{} > {} > {}]",
            from.factory, from.room, origin.sub_zone, to_factory, to_room, to_sub_zone
        ));

        // O contêiner da sub-zona de destino é criado sob demanda.
        let destination = state.sub_zone_mut(&LocationKey::new(to_factory, to_room), to_sub_zone);
        destination.active.push(batch.clone());
        Ok(batch)
    }

    // --- ARQUIVAMENTO ---
    // Só a partir de ReadyToArchive. Fotografia profunda para o histórico da
    // própria sub-zona, com carimbo de conclusão; o lote sai da lista ativa.
    // Irreversível.
    pub async fn archive(&self, id: Uuid) -> Result<ArchivedBatch, AppError> {
        let mut state = self.store.write().await;

        let origin = state.find_batch(id).ok_or(AppError::BatchNotFound)?;
        let zone = state
            .zone_mut(&origin.location_key, &origin.sub_zone)
            .ok_or(AppError::BatchNotFound)?;

        if zone.active[origin.index].state() != BatchState::ReadyToArchive {
            return Err(AppError::IllegalTransition);
        }

        let batch = zone.active.remove(origin.index);
        let archived = ArchivedBatch::seal(batch);
        zone.history.push(HistoryEntry::Batch(archived.clone()));
        Ok(archived)
    }
}
