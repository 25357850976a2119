// src/handlers/inventory.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{batch::Batch, location::StockLevel},
};

// ---
// Validação Customizada
// ---
fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("A quantidade precisa ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: AddStock (Entrada de matéria-prima)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStockPayload {
    #[validate(length(min = 1, message = "A fábrica é obrigatória."))]
    #[schema(example = "Planta Sul")]
    pub factory: String,

    #[validate(length(min = 1, message = "A sala é obrigatória."))]
    #[schema(example = "Sala 1")]
    pub room: String,

    #[validate(length(min = 1, message = "A sub-zona é obrigatória."))]
    #[schema(example = "Zona A")]
    pub sub_zone: String,

    #[validate(length(min = 1, message = "O produto é obrigatório."))]
    #[schema(example = "Aço 1045")]
    pub product_type: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 500.0)]
    pub quantity: Decimal,
}

// POST /api/inventory/stock-entry
#[utoipa::path(
    post,
    path = "/api/inventory/stock-entry",
    tag = "Inventory",
    request_body = AddStockPayload,
    responses(
        (status = 200, description = "Saldo atualizado do produto no local", body = StockLevel),
        (status = 404, description = "Produto ou local não configurado"),
        (status = 422, description = "Quantidade inválida")
    )
)]
pub async fn add_stock(
    State(app_state): State<AppState>,
    Json(payload): Json<AddStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let level = app_state
        .inventory_service
        .deposit_stock(
            &payload.factory,
            &payload.room,
            &payload.sub_zone,
            &payload.product_type,
            payload.quantity,
        )
        .await?;

    Ok((StatusCode::OK, Json(level)))
}

// ---
// Payload: ExtractBatch (Extração de estoque para lote)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractBatchPayload {
    #[validate(length(min = 1, message = "A fábrica é obrigatória."))]
    #[schema(example = "Planta Sul")]
    pub factory: String,

    #[validate(length(min = 1, message = "A sala é obrigatória."))]
    #[schema(example = "Sala 1")]
    pub room: String,

    #[validate(length(min = 1, message = "A sub-zona é obrigatória."))]
    #[schema(example = "Zona A")]
    pub sub_zone: String,

    #[validate(length(min = 1, message = "O produto é obrigatório."))]
    #[schema(example = "Aço 1045")]
    pub product_type: String,

    // Opcional: ausente ou vazio recebe o menor "Batch {n}" livre.
    #[schema(example = "Batch 1")]
    pub name: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 300.0)]
    pub quantity: Decimal,
}

// POST /api/inventory/extract
#[utoipa::path(
    post,
    path = "/api/inventory/extract",
    tag = "Inventory",
    request_body = ExtractBatchPayload,
    responses(
        (status = 201, description = "Lote criado a partir do estoque", body = Batch),
        (status = 409, description = "Nome de lote já em uso"),
        (status = 422, description = "Estoque insuficiente ou quantidade inválida")
    )
)]
pub async fn extract_batch(
    State(app_state): State<AppState>,
    Json(payload): Json<ExtractBatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = app_state
        .inventory_service
        .extract_batch(
            &payload.factory,
            &payload.room,
            &payload.sub_zone,
            &payload.product_type,
            payload.name.as_deref(),
            payload.quantity,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(batch)))
}
