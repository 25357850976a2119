// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::batch::TimelineEntry;

// Situação exibida no painel global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ActivityStatus {
    Pending,
    InProcess,
    Completed,
}

// Um cartão do painel: lote (ativo ou arquivado) com sua localização e a
// linha do tempo já filtrada pelo período, do registro mais novo para o
// mais antigo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    pub factory: String,
    pub room: String,
    pub sub_zone: String,

    pub product_type: String,
    pub name: String,

    pub status: ActivityStatus,
    pub step_index: usize,
    pub total_steps: usize,

    pub timeline: Vec<TimelineEntry>,
}
