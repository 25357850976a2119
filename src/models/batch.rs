// src/models/batch.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{error::AppError, time_utils};

// Um registro da linha do tempo. O carimbo é uma string no formato legado
// (ver `time_utils`) para manter compatibilidade com backups antigos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub description: String,
    pub timestamp: String,
}

// Estado derivado do par (step_index, is_processing). Nunca é armazenado:
// é sempre recalculado, então não há como os dois saírem de sincronia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Etapa `i` ainda não iniciada.
    Pending(usize),
    /// Etapa `i` iniciada e não concluída.
    InProgress(usize),
    /// Todas as etapas concluídas; elegível para arquivamento.
    ReadyToArchive,
}

// --- O LOTE (entidade central) ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Aço 1045")]
    pub product_type: String,

    // Nome visível ao usuário; único entre todos os lotes (ativos e
    // arquivados) do sistema inteiro.
    #[schema(example = "Batch 1")]
    pub name: String,

    #[schema(example = 300.0)]
    pub quantity: Decimal,

    // Cópia própria das etapas do produto no momento da extração.
    // Mudanças no template depois disso não afetam este lote.
    pub steps: Vec<String>,

    // Cursor em `steps`; `step_index == steps.len()` significa pronto
    // para arquivar.
    pub step_index: usize,

    pub is_processing: bool,

    pub timeline: Vec<TimelineEntry>,
}

impl Batch {
    // Extrai um novo lote a partir do estoque, com cópia independente das
    // etapas de roteamento do produto.
    pub fn extract(product_type: &str, name: &str, quantity: Decimal, steps: Vec<String>) -> Self {
        let mut batch = Self {
            id: Uuid::new_v4(),
            product_type: product_type.to_string(),
            name: name.to_string(),
            quantity,
            steps,
            step_index: 0,
            is_processing: false,
            timeline: Vec::new(),
        };
        batch.log("Created from Stock");
        batch
    }

    pub fn state(&self) -> BatchState {
        if self.step_index >= self.steps.len() {
            BatchState::ReadyToArchive
        } else if self.is_processing {
            BatchState::InProgress(self.step_index)
        } else {
            BatchState::Pending(self.step_index)
        }
    }

    // Acrescenta um registro na linha do tempo com o horário atual.
    pub fn log(&mut self, description: impl Into<String>) {
        self.timeline.push(TimelineEntry {
            description: description.into(),
            timestamp: time_utils::now_stamp(),
        });
    }

    // --- TRANSIÇÕES DO CICLO DE VIDA ---

    // Pending(i) → InProgress(i). Registra "Started: {etapa}".
    pub fn start_step(&mut self) -> Result<(), AppError> {
        match self.state() {
            BatchState::Pending(i) => {
                let step = self.steps[i].clone();
                self.is_processing = true;
                self.log(format!("Started: {step}"));
                Ok(())
            }
            _ => Err(AppError::IllegalTransition),
        }
    }

    // InProgress(i) → Pending(i+1). Registra "Completed: {etapa}".
    pub fn finish_step(&mut self) -> Result<(), AppError> {
        match self.state() {
            BatchState::InProgress(i) => {
                let step = self.steps[i].clone();
                self.is_processing = false;
                self.log(format!("Completed: {step}"));
                self.step_index += 1;
                Ok(())
            }
            _ => Err(AppError::IllegalTransition),
        }
    }

    // Desfaz apenas a última transição. De InProgress(i) volta a Pending(i);
    // de Pending(i > 0) volta a InProgress(i-1); em Pending(0) não faz nada.
    // O marcador correspondente é procurado de trás para frente, para que um
    // registro de relocação no fim da linha do tempo não impeça a remoção.
    pub fn revert(&mut self) {
        if self.is_processing {
            self.is_processing = false;
            if let Some(step) = self.steps.get(self.step_index).cloned() {
                self.remove_last_matching(&format!("Started: {step}"));
            }
        } else if self.step_index > 0 {
            self.step_index -= 1;
            self.is_processing = true;
            if let Some(step) = self.steps.get(self.step_index).cloned() {
                self.remove_last_matching(&format!("Completed: {step}"));
            }
        }
    }

    fn remove_last_matching(&mut self, marker: &str) {
        if let Some(pos) = self
            .timeline
            .iter()
            .rposition(|entry| entry.description == marker)
        {
            self.timeline.remove(pos);
        }
    }

    // --- EDIÇÃO DA LISTA DE ETAPAS DO LOTE ---

    // Insere uma etapa na posição 1-based informada (ausente ou fora da faixa
    // vira append). O cursor se desloca para continuar apontando para a mesma
    // etapa lógica; se a inserção cai exatamente no cursor de uma etapa em
    // andamento, a etapa em andamento mantém a identidade à frente da nova.
    pub fn insert_step(&mut self, description: &str, position: Option<usize>) {
        let idx = match position {
            Some(pos) => pos.saturating_sub(1).min(self.steps.len()),
            None => self.steps.len(),
        };
        self.steps.insert(idx, description.to_string());
        if idx < self.step_index || (idx == self.step_index && self.is_processing) {
            self.step_index += 1;
        }
    }

    // Remove a etapa no índice 0-based. Etapas já concluídas ou em andamento
    // são imutáveis: a busca por "Completed: {etapa}" na linha do tempo
    // depende delas continuarem existindo.
    pub fn delete_step(&mut self, index: usize) -> Result<String, AppError> {
        if index >= self.steps.len() {
            return Err(AppError::StepNotFound);
        }
        let deletable =
            index > self.step_index || (index == self.step_index && !self.is_processing);
        if !deletable {
            return Err(AppError::StepLocked);
        }
        Ok(self.steps.remove(index))
    }

    // --- EDIÇÕES DE CAMPO ---

    pub fn set_quantity(&mut self, quantity: Decimal) -> Result<(), AppError> {
        if quantity.is_sign_negative() {
            return Err(AppError::InvalidQuantity);
        }
        self.quantity = quantity;
        Ok(())
    }
}
