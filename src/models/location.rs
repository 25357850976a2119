// src/models/location.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;
use crate::models::{batch::Batch, history::HistoryEntry};

// Chave composta (fábrica, sala). No documento persistido vira a string
// "fábrica::sala", o formato do app original.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub factory: String,
    pub room: String,
}

impl LocationKey {
    pub fn new(factory: &str, room: &str) -> Self {
        Self {
            factory: factory.to_string(),
            room: room.to_string(),
        }
    }

    pub fn storage_key(&self) -> String {
        format!("{}::{}", self.factory, self.room)
    }

    pub fn parse(raw: &str) -> Self {
        match raw.split_once("::") {
            Some((factory, room)) => Self::new(factory, room),
            None => Self::new(raw, ""),
        }
    }
}

// --- Estado de uma sub-zona ---
// Razão de estoque por produto mais as duas coleções de lotes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubZoneState {
    #[serde(default)]
    pub stock: HashMap<String, Decimal>,

    #[serde(default)]
    pub active: Vec<Batch>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl SubZoneState {
    pub fn current_stock(&self, product: &str) -> Decimal {
        self.stock.get(product).copied().unwrap_or(Decimal::ZERO)
    }

    // Entrada de estoque. Cria a posição do produto se não existir.
    pub fn deposit(&mut self, product: &str, quantity: Decimal) -> Result<Decimal, AppError> {
        if quantity <= Decimal::ZERO {
            return Err(AppError::InvalidQuantity);
        }
        let level = self
            .stock
            .entry(product.to_string())
            .or_insert(Decimal::ZERO);
        *level += quantity;
        Ok(*level)
    }

    // Saída de estoque. Falha sem mutação quando o saldo não cobre o pedido;
    // o saldo nunca fica negativo.
    pub fn withdraw(&mut self, product: &str, quantity: Decimal) -> Result<Decimal, AppError> {
        if quantity <= Decimal::ZERO {
            return Err(AppError::InvalidQuantity);
        }
        let available = self.current_stock(product);
        if quantity > available {
            return Err(AppError::InsufficientStock { available });
        }
        let level = self
            .stock
            .entry(product.to_string())
            .or_insert(Decimal::ZERO);
        *level -= quantity;
        Ok(*level)
    }
}

// --- Entrada de um local "fábrica::sala" ---
// `sub_zones` guarda a ordem de criação (as "abas" do app original);
// `data` guarda o estado de cada sub-zona.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEntry {
    #[serde(default)]
    pub sub_zones: Vec<String>,

    #[serde(default)]
    pub data: HashMap<String, SubZoneState>,
}

impl LocationEntry {
    // Garante o contêiner da sub-zona, registrando a aba na ordem de chegada.
    pub fn sub_zone_mut(&mut self, name: &str) -> &mut SubZoneState {
        if !self.sub_zones.iter().any(|existing| existing == name) {
            self.sub_zones.push(name.to_string());
        }
        self.data.entry(name.to_string()).or_default()
    }
}

// Saldo devolvido pelos comandos de estoque.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_type: String,
    pub quantity: Decimal,
}
