// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- INVENTORY ---
        handlers::inventory::add_stock,
        handlers::inventory::extract_batch,

        // --- BATCHES ---
        handlers::batches::start_step,
        handlers::batches::finish_step,
        handlers::batches::revert_step,
        handlers::batches::archive_batch,
        handlers::batches::insert_custom_step,
        handlers::batches::delete_batch_step,
        handlers::batches::rename_batch,
        handlers::batches::set_quantity,
        handlers::batches::relocate_batch,
    ),
    components(
        schemas(

            // --- Modelos ---
            models::batch::Batch,
            models::batch::TimelineEntry,
            models::history::ArchivedBatch,
            models::location::StockLevel,

            // --- Payloads ---
            handlers::inventory::AddStockPayload,
            handlers::inventory::ExtractBatchPayload,
            handlers::batches::InsertStepPayload,
            handlers::batches::RenameBatchPayload,
            handlers::batches::SetQuantityPayload,
            handlers::batches::RelocateBatchPayload,
        )
    ),
    tags(
        (name = "Inventory", description = "Entrada de estoque e extração para lote"),
        (name = "Batches", description = "Ciclo de vida, relocação e arquivamento de lotes")
    ),
    info(
        title = "Fábrica Backend API",
        description = "Rastreamento de estoque e lotes em processamento por fábrica, sala e sub-zona.",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

// GET /api-docs/openapi.json
// Servimos o documento direto, sem a UI estática do Swagger.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
