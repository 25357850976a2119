// src/store/erp_state.rs

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::{
    batch::Batch,
    catalog::FactoryEntry,
    history::HistoryEntry,
    location::{LocationEntry, LocationKey, SubZoneState},
};

// O documento de estado inteiro. É exatamente o formato do backup JSON:
// exportar é serializar este struct, importar é substituí-lo — o round-trip
// é lossless por construção.
//
// Locais são criados preguiçosamente no primeiro toque e nunca removidos por
// esvaziamento: local vazio é configuração.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErpState {
    // Produto → template ordenado de etapas de roteamento.
    #[serde(default)]
    pub products: HashMap<String, Vec<String>>,

    // Fábricas na ordem de criação, cada uma com suas salas ordenadas.
    #[serde(default)]
    pub factories: Vec<FactoryEntry>,

    // "fábrica::sala" → sub-zonas e seus estados.
    #[serde(default)]
    pub locations: HashMap<String, LocationEntry>,
}

// Posição de um lote ativo dentro do documento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRef {
    pub location_key: String,
    pub sub_zone: String,
    pub index: usize,
}

impl ErpState {
    // --- CONFIGURAÇÃO (fábricas e salas) ---

    pub fn factory(&self, name: &str) -> Option<&FactoryEntry> {
        self.factories.iter().find(|f| f.name == name)
    }

    pub fn factory_mut(&mut self, name: &str) -> Option<&mut FactoryEntry> {
        self.factories.iter_mut().find(|f| f.name == name)
    }

    pub fn has_room(&self, factory: &str, room: &str) -> bool {
        self.factory(factory)
            .is_some_and(|f| f.rooms.iter().any(|r| r == room))
    }

    // --- LOCAIS (criação preguiçosa) ---

    pub fn location_entry_mut(&mut self, key: &LocationKey) -> &mut LocationEntry {
        self.locations.entry(key.storage_key()).or_default()
    }

    pub fn sub_zone_mut(&mut self, key: &LocationKey, sub_zone: &str) -> &mut SubZoneState {
        self.location_entry_mut(key).sub_zone_mut(sub_zone)
    }

    pub fn sub_zone(&self, key: &LocationKey, sub_zone: &str) -> Option<&SubZoneState> {
        self.locations
            .get(&key.storage_key())
            .and_then(|entry| entry.data.get(sub_zone))
    }

    // Acesso sem criação, por chave crua (usado por quem já localizou o lote).
    pub fn zone_mut(&mut self, raw_key: &str, sub_zone: &str) -> Option<&mut SubZoneState> {
        self.locations
            .get_mut(raw_key)
            .and_then(|entry| entry.data.get_mut(sub_zone))
    }

    // --- NOMES E IDENTIFICADORES ---

    // Todos os nomes em uso: lotes ativos em qualquer local mais as entradas
    // de histórico do tipo lote (registros de estoque não contam).
    pub fn all_batch_names(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        for entry in self.locations.values() {
            for zone in entry.data.values() {
                for batch in &zone.active {
                    names.insert(batch.name.clone());
                }
                for record in &zone.history {
                    if let HistoryEntry::Batch(archived) = record {
                        names.insert(archived.batch.name.clone());
                    }
                }
            }
        }
        names
    }

    // Menor "Batch {n}" livre, n >= 1.
    pub fn unique_batch_name(&self) -> String {
        let existing = self.all_batch_names();
        let mut n: u64 = 1;
        while existing.contains(&format!("Batch {n}")) {
            n += 1;
        }
        format!("Batch {n}")
    }

    // Falha com DuplicateName se o candidato já nomeia qualquer outro lote
    // (vivo ou arquivado) do sistema inteiro.
    pub fn assert_name_free(&self, candidate: &str, excluding: Option<&str>) -> Result<(), AppError> {
        if excluding == Some(candidate) {
            return Ok(());
        }
        if self.all_batch_names().contains(candidate) {
            return Err(AppError::DuplicateName(candidate.to_string()));
        }
        Ok(())
    }

    // --- BUSCA DE LOTES ---

    pub fn find_batch(&self, id: Uuid) -> Option<BatchRef> {
        for (key, entry) in &self.locations {
            for (sub_zone, zone) in &entry.data {
                if let Some(index) = zone.active.iter().position(|b| b.id == id) {
                    return Some(BatchRef {
                        location_key: key.clone(),
                        sub_zone: sub_zone.clone(),
                        index,
                    });
                }
            }
        }
        None
    }

    pub fn batch(&self, id: Uuid) -> Option<&Batch> {
        self.locations
            .values()
            .flat_map(|entry| entry.data.values())
            .flat_map(|zone| zone.active.iter())
            .find(|b| b.id == id)
    }

    pub fn batch_mut(&mut self, id: Uuid) -> Option<&mut Batch> {
        self.locations
            .values_mut()
            .flat_map(|entry| entry.data.values_mut())
            .flat_map(|zone| zone.active.iter_mut())
            .find(|b| b.id == id)
    }
}
