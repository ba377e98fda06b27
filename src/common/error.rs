// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::{db_utils, i18n};
use crate::middleware::i18n::Locale;

// O tipo de erro do domínio. Toda falha do Ledger e dos serviços passa por aqui.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidPayload(String),

    #[error("Quantidade inválida: {0}")]
    InvalidQuantity(i64),

    #[error("Muitos códigos de SKU: {given} (máximo {max})")]
    TooManySkuCodes { given: usize, max: usize },

    #[error("SKU não encontrado: {0}")]
    SkuNotFound(String),

    #[error("Código de SKU ambíguo: {0}")]
    AmbiguousSku(String),

    #[error("Hub não encontrado: {0}")]
    HubNotFound(i64),

    #[error("Saldo não encontrado (hub {hub_id}, seller {seller_id}, sku {sku_id})")]
    InventoryNotFound {
        hub_id: i64,
        seller_id: String,
        sku_id: i64,
    },

    // Conflict: violação de unicidade (sku_id, hub_id) no Create
    #[error("Já existe saldo para o sku {sku_id} no hub {hub_id}")]
    InventoryAlreadyExists { sku_id: i64, hub_id: i64 },

    // InvalidState: o ajuste deixaria o saldo negativo
    #[error("Ajuste de {delta} deixaria o saldo negativo")]
    InsufficientStock { delta: i64 },

    #[error("Ajuste de {delta} estoura o limite da quantidade")]
    QuantityOverflow { delta: i64 },

    // Falha transitória de I/O: o chamador pode tentar de novo
    #[error("Armazenamento indisponível: {0}")]
    StoreUnavailable(String),

    #[error("Operação cancelada (prazo esgotado)")]
    Cancelled,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// Erros do sqlx passam pela classificação (transitório, constraint, resto).
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        db_utils::classify_store_error(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidPayload(_)
            | AppError::InvalidQuantity(_)
            | AppError::TooManySkuCodes { .. } => StatusCode::BAD_REQUEST,

            AppError::SkuNotFound(_)
            | AppError::HubNotFound(_)
            | AppError::InventoryNotFound { .. } => StatusCode::NOT_FOUND,

            AppError::AmbiguousSku(_)
            | AppError::InventoryAlreadyExists { .. }
            | AppError::InsufficientStock { .. }
            | AppError::QuantityOverflow { .. } => StatusCode::CONFLICT,

            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Cancelled => StatusCode::GATEWAY_TIMEOUT,

            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Código estável, legível por máquina, enviado junto da mensagem.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidPayload(_) => "INVALID_PAYLOAD",
            AppError::InvalidQuantity(_) => "INVALID_QUANTITY",
            AppError::TooManySkuCodes { .. } => "TOO_MANY_SKU_CODES",
            AppError::SkuNotFound(_) => "SKU_NOT_FOUND",
            AppError::AmbiguousSku(_) => "AMBIGUOUS_SKU",
            AppError::HubNotFound(_) => "HUB_NOT_FOUND",
            AppError::InventoryNotFound { .. } => "INVENTORY_NOT_FOUND",
            AppError::InventoryAlreadyExists { .. } => "INVENTORY_ALREADY_EXISTS",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::QuantityOverflow { .. } => "QUANTITY_OVERFLOW",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Cancelled => "CANCELLED",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::InvalidPayload(reason) => Some(json!({ "reason": reason })),
            AppError::InvalidQuantity(quantity) => Some(json!({ "quantity": quantity })),
            AppError::TooManySkuCodes { given, max } => Some(json!({ "given": given, "max": max })),
            AppError::SkuNotFound(sku) | AppError::AmbiguousSku(sku) => {
                Some(json!({ "sku": sku }))
            }
            AppError::HubNotFound(hub_id) => Some(json!({ "hub_id": hub_id })),
            AppError::InventoryNotFound { hub_id, seller_id, sku_id } => Some(json!({
                "hub_id": hub_id,
                "seller_id": seller_id,
                "sku_id": sku_id,
            })),
            AppError::InventoryAlreadyExists { sku_id, hub_id } => {
                Some(json!({ "sku_id": sku_id, "hub_id": hub_id }))
            }
            AppError::InsufficientStock { delta } | AppError::QuantityOverflow { delta } => {
                Some(json!({ "delta": delta }))
            }
            _ => None,
        }
    }

    /// Converte o erro de domínio na resposta HTTP, no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();
        if status.is_server_error() {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!(code = self.code(), "Erro no processamento da requisição: {}", self);
        }

        ApiError {
            status,
            code: self.code(),
            message: i18n::translate(&locale.0, self.code()).to_string(),
            details: self.details(),
        }
    }
}

// Resposta de erro já pronta para sair pela API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message,
            "code": self.code,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

// Sem contexto de idioma (ex: middleware), usa o idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_http_status() {
        assert_eq!(AppError::SkuNotFound("X1".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::HubNotFound(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InventoryAlreadyExists { sku_id: 1, hub_id: 1 }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InsufficientStock { delta: -100 }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::TooManySkuCodes { given: 101, max: 100 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::StoreUnavailable("pool timed out".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::Cancelled.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn api_error_is_localised_and_carries_details() {
        let err = AppError::HubNotFound(42);

        let pt = err.to_api_error(&Locale("pt".into()));
        assert_eq!(pt.code, "HUB_NOT_FOUND");
        assert_eq!(pt.message, "Hub não encontrado.");
        assert_eq!(pt.details, Some(json!({ "hub_id": 42 })));

        let en = err.to_api_error(&Locale("en".into()));
        assert_eq!(en.message, "Hub not found.");
    }

    #[test]
    fn invalid_payload_keeps_the_parser_reason() {
        let api = AppError::InvalidPayload("expected value at line 1 column 2".into())
            .to_api_error(&Locale("pt".into()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.code, "INVALID_PAYLOAD");
        assert_eq!(api.message, "O corpo da requisição não é um JSON válido.");
        assert_eq!(
            api.details,
            Some(json!({ "reason": "expected value at line 1 column 2" }))
        );
    }

    #[test]
    fn validation_details_list_each_field() {
        let mut errors = validator::ValidationErrors::new();
        let mut field_err = validator::ValidationError::new("range");
        field_err.message = Some("hub_id deve ser >= 1".into());
        errors.add("hub_id", field_err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details, Some(json!({ "hub_id": ["hub_id deve ser >= 1"] })));
    }
}
