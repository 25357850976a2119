use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Todos os erros de domínio são recuperáveis: o comando é rejeitado e o
// estado fica intacto.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Nome duplicado: {0}")]
    DuplicateName(String),

    #[error("Estoque insuficiente (disponível: {available})")]
    InsufficientStock { available: Decimal },

    #[error("Quantidade inválida")]
    InvalidQuantity,

    #[error("Etapa concluída ou em andamento não pode ser removida")]
    StepLocked,

    #[error("Transição de estado ilegal")]
    IllegalTransition,

    #[error("Destino da relocação não existe")]
    UnresolvedDestination,

    #[error("Lote não encontrado")]
    BatchNotFound,

    #[error("Etapa não encontrada")]
    StepNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Fábrica não encontrada")]
    FactoryNotFound,

    #[error("Local não encontrado")]
    LocationNotFound,

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::DuplicateName(name) => (
                StatusCode::CONFLICT,
                format!("O nome '{}' já está em uso.", name),
            ),
            AppError::InsufficientStock { available } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Estoque insuficiente: apenas {} disponível.",
                    available.normalize()
                ),
            ),
            AppError::InvalidQuantity => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "A quantidade precisa ser um número positivo válido.".to_string(),
            ),
            AppError::StepLocked => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Etapas concluídas ou em andamento não podem ser removidas.".to_string(),
            ),
            AppError::IllegalTransition => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Transição ilegal para o estado atual do lote.".to_string(),
            ),
            AppError::UnresolvedDestination => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Fábrica ou sala de destino não existe.".to_string(),
            ),
            AppError::BatchNotFound => (StatusCode::NOT_FOUND, "Lote não encontrado.".to_string()),
            AppError::StepNotFound => (StatusCode::NOT_FOUND, "Etapa não encontrada.".to_string()),
            AppError::ProductNotFound => {
                (StatusCode::NOT_FOUND, "Produto não encontrado.".to_string())
            }
            AppError::FactoryNotFound => {
                (StatusCode::NOT_FOUND, "Fábrica não encontrada.".to_string())
            }
            AppError::LocationNotFound => {
                (StatusCode::NOT_FOUND, "Local não encontrado.".to_string())
            }

            // Erros inesperados viram 500. O `tracing` loga a mensagem
            // detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
