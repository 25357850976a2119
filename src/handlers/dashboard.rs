// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{common::error::AppError, config::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// GET /api/dashboard/feed — visão global de atividade, mais recente primeiro.
pub async fn dashboard_feed(
    State(app_state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let feed = app_state
        .history_service
        .dashboard_feed(params.start_date, params.end_date)
        .await;
    Ok((StatusCode::OK, Json(feed)))
}
