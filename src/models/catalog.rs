// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Fábrica configurada ---
// A ordem das salas é configuração e precisa sobreviver ao backup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactoryEntry {
    #[schema(example = "Planta Sul")]
    pub name: String,

    #[serde(default)]
    pub rooms: Vec<String>,
}

impl FactoryEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rooms: Vec::new(),
        }
    }
}

// Visão de um produto do catálogo com seu template de roteamento.
// O template pertence à configuração global; cada lote extraído leva uma
// cópia própria.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductConfig {
    #[schema(example = "Aço 1045")]
    pub name: String,

    pub steps: Vec<String>,
}
