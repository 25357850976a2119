// src/handlers/backup.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{common::error::AppError, config::AppState, store::ErpState};

// GET /api/backup — exporta o documento de estado inteiro.
// O formato é o contrato de backup/restauração: produtos, fábricas com salas
// ordenadas e os locais "fábrica::sala" com estoque, ativos e histórico.
pub async fn export_backup(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let document = app_state.store.export().await;
    Ok((StatusCode::OK, Json(document)))
}

// POST /api/backup — substitui o estado pelo documento enviado.
pub async fn import_backup(
    State(app_state): State<AppState>,
    Json(document): Json<ErpState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.store.import(document).await;
    tracing::info!("✅ Backup restaurado com sucesso!");
    Ok(StatusCode::NO_CONTENT)
}
