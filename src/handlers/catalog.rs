// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// ---
// Payloads de configuração (todos só carregam um nome/descrição)
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NamePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStepPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    // Posição 1-based; ausente vira append.
    pub position: Option<usize>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptionPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubZonePayload {
    #[validate(length(min = 1, message = "A fábrica é obrigatória."))]
    pub factory: String,

    #[validate(length(min = 1, message = "A sala é obrigatória."))]
    pub room: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

// ---
// Handlers: Produtos e template de roteamento
// ---
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state
        .catalog_service
        .create_product(payload.name.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.catalog_service.list_products().await;
    Ok((StatusCode::OK, Json(products)))
}

pub async fn rename_product(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state
        .catalog_service
        .rename_product(&name, payload.name.trim())
        .await?;
    Ok((StatusCode::OK, Json(product)))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_product(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_routing_step(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<TemplateStepPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state
        .catalog_service
        .add_routing_step(&name, payload.description.trim(), payload.position)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn rename_routing_step(
    State(app_state): State<AppState>,
    Path((name, index)): Path<(String, usize)>,
    Json(payload): Json<StepDescriptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state
        .catalog_service
        .rename_routing_step(&name, index, payload.description.trim())
        .await?;
    Ok((StatusCode::OK, Json(product)))
}

pub async fn delete_routing_step(
    State(app_state): State<AppState>,
    Path((name, index)): Path<(String, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .catalog_service
        .delete_routing_step(&name, index)
        .await?;
    Ok((StatusCode::OK, Json(product)))
}

// ---
// Handlers: Fábricas, salas e sub-zonas
// ---
pub async fn create_factory(
    State(app_state): State<AppState>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let factory = app_state
        .catalog_service
        .create_factory(payload.name.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(factory)))
}

pub async fn list_factories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let factories = app_state.catalog_service.list_factories().await;
    Ok((StatusCode::OK, Json(factories)))
}

pub async fn rename_factory(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let factory = app_state
        .catalog_service
        .rename_factory(&name, payload.name.trim())
        .await?;
    Ok((StatusCode::OK, Json(factory)))
}

pub async fn delete_factory(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_factory(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_room(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let factory = app_state
        .catalog_service
        .create_room(&name, payload.name.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(factory)))
}

pub async fn rename_room(
    State(app_state): State<AppState>,
    Path((name, room)): Path<(String, String)>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let factory = app_state
        .catalog_service
        .rename_room(&name, &room, payload.name.trim())
        .await?;
    Ok((StatusCode::OK, Json(factory)))
}

pub async fn delete_room(
    State(app_state): State<AppState>,
    Path((name, room)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_room(&name, &room).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_sub_zone(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSubZonePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    app_state
        .catalog_service
        .create_sub_zone(&payload.factory, &payload.room, payload.name.trim())
        .await?;
    Ok(StatusCode::CREATED)
}
