// src/handlers/history.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    common::error::AppError, config::AppState, services::history_service::HistoryFilter,
};

// Filtros da consulta de histórico; datas no formato YYYY-MM-DD.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub factory: Option<String>,
    pub room: Option<String>,
    pub sub_zone: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// GET /api/history
pub async fn query_history(
    State(app_state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = HistoryFilter {
        factory: params.factory,
        room: params.room,
        sub_zone: params.sub_zone,
        start_date: params.start_date,
        end_date: params.end_date,
    };
    let report = app_state.history_service.query_history(&filter).await;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/locations/{factory}/{room}
pub async fn location_snapshot(
    State(app_state): State<AppState>,
    Path((factory, room)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state
        .history_service
        .location_snapshot(&factory, &room)
        .await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

// GET /api/batches/names
pub async fn list_batch_names(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let names = app_state.history_service.all_batch_names().await;
    Ok((StatusCode::OK, Json(names)))
}
