// src/handlers/batches.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{batch::Batch, history::ArchivedBatch},
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// =============================================================================
//  1. TRANSIÇÕES DO CICLO DE VIDA
// =============================================================================

// POST /api/batches/{id}/start
#[utoipa::path(
    post,
    path = "/api/batches/{id}/start",
    tag = "Batches",
    responses(
        (status = 200, description = "Etapa atual iniciada", body = Batch),
        (status = 404, description = "Lote não encontrado"),
        (status = 422, description = "Transição ilegal")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn start_step(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let batch = app_state.batch_service.start_step(id).await?;
    Ok((StatusCode::OK, Json(batch)))
}

// POST /api/batches/{id}/finish
#[utoipa::path(
    post,
    path = "/api/batches/{id}/finish",
    tag = "Batches",
    responses(
        (status = 200, description = "Etapa atual concluída", body = Batch),
        (status = 404, description = "Lote não encontrado"),
        (status = 422, description = "Transição ilegal")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn finish_step(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let batch = app_state.batch_service.finish_step(id).await?;
    Ok((StatusCode::OK, Json(batch)))
}

// POST /api/batches/{id}/revert
#[utoipa::path(
    post,
    path = "/api/batches/{id}/revert",
    tag = "Batches",
    responses(
        (status = 200, description = "Última transição desfeita (no-op na primeira etapa pendente)", body = Batch),
        (status = 404, description = "Lote não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn revert_step(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let batch = app_state.batch_service.revert_step(id).await?;
    Ok((StatusCode::OK, Json(batch)))
}

// POST /api/batches/{id}/archive
#[utoipa::path(
    post,
    path = "/api/batches/{id}/archive",
    tag = "Batches",
    responses(
        (status = 200, description = "Lote arquivado no histórico", body = ArchivedBatch),
        (status = 404, description = "Lote não encontrado"),
        (status = 422, description = "Lote ainda tem etapas pendentes")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn archive_batch(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let archived = app_state.batch_service.archive(id).await?;
    Ok((StatusCode::OK, Json(archived)))
}

// =============================================================================
//  2. ETAPAS DO LOTE
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertStepPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    #[schema(example = "Inspeção manual")]
    pub description: String,

    // Posição 1-based; ausente ou fora da faixa vira append.
    #[schema(example = 2)]
    pub position: Option<usize>,
}

// POST /api/batches/{id}/steps
#[utoipa::path(
    post,
    path = "/api/batches/{id}/steps",
    tag = "Batches",
    request_body = InsertStepPayload,
    responses(
        (status = 200, description = "Etapa inserida no roteiro do lote", body = Batch),
        (status = 404, description = "Lote não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn insert_custom_step(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InsertStepPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = app_state
        .batch_service
        .insert_custom_step(id, payload.description.trim(), payload.position)
        .await?;
    Ok((StatusCode::OK, Json(batch)))
}

// DELETE /api/batches/{id}/steps/{index}
#[utoipa::path(
    delete,
    path = "/api/batches/{id}/steps/{index}",
    tag = "Batches",
    responses(
        (status = 200, description = "Etapa removida", body = Batch),
        (status = 404, description = "Lote ou etapa não encontrados"),
        (status = 422, description = "Etapa concluída ou em andamento")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Lote"),
        ("index" = usize, Path, description = "Índice 0-based da etapa")
    )
)]
pub async fn delete_batch_step(
    State(app_state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let batch = app_state.batch_service.delete_batch_step(id, index).await?;
    Ok((StatusCode::OK, Json(batch)))
}

// =============================================================================
//  3. EDIÇÃO DE CAMPOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameBatchPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Lote Urgente")]
    pub name: String,
}

// PUT /api/batches/{id}/name
#[utoipa::path(
    put,
    path = "/api/batches/{id}/name",
    tag = "Batches",
    request_body = RenameBatchPayload,
    responses(
        (status = 200, description = "Lote renomeado", body = Batch),
        (status = 404, description = "Lote não encontrado"),
        (status = 409, description = "Nome já em uso em outro lote")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn rename_batch(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameBatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = app_state
        .batch_service
        .rename_batch(id, payload.name.trim())
        .await?;
    Ok((StatusCode::OK, Json(batch)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetQuantityPayload {
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 250.0)]
    pub quantity: Decimal,
}

// PUT /api/batches/{id}/quantity
#[utoipa::path(
    put,
    path = "/api/batches/{id}/quantity",
    tag = "Batches",
    request_body = SetQuantityPayload,
    responses(
        (status = 200, description = "Quantidade atualizada", body = Batch),
        (status = 404, description = "Lote não encontrado"),
        (status = 422, description = "Quantidade inválida")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn set_quantity(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetQuantityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = app_state
        .batch_service
        .set_quantity(id, payload.quantity)
        .await?;
    Ok((StatusCode::OK, Json(batch)))
}

// =============================================================================
//  4. RELOCAÇÃO
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelocateBatchPayload {
    #[validate(length(min = 1, message = "A fábrica de destino é obrigatória."))]
    #[schema(example = "Planta Norte")]
    pub to_factory: String,

    #[validate(length(min = 1, message = "A sala de destino é obrigatória."))]
    #[schema(example = "Sala 9")]
    pub to_room: String,

    #[validate(length(min = 1, message = "A sub-zona de destino é obrigatória."))]
    #[schema(example = "Recebimento")]
    pub to_sub_zone: String,
}

// POST /api/batches/{id}/relocate
#[utoipa::path(
    post,
    path = "/api/batches/{id}/relocate",
    tag = "Batches",
    request_body = RelocateBatchPayload,
    responses(
        (status = 200, description = "Lote movido para o destino", body = Batch),
        (status = 404, description = "Lote não encontrado"),
        (status = 422, description = "Fábrica ou sala de destino não existe")
    ),
    params(("id" = Uuid, Path, description = "ID do Lote"))
)]
pub async fn relocate_batch(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RelocateBatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = app_state
        .batch_service
        .relocate(
            id,
            &payload.to_factory,
            &payload.to_room,
            &payload.to_sub_zone,
        )
        .await?;
    Ok((StatusCode::OK, Json(batch)))
}
