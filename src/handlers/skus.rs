// src/handlers/skus.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppJson,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::sku::Sku,
};

fn validate_codes_not_blank(codes: &[String]) -> Result<(), ValidationError> {
    if codes.iter().any(|code| code.trim().is_empty()) {
        let mut err = ValidationError::new("length");
        err.message = Some("Nenhum código de SKU pode ser vazio.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSkuPayload {
    #[validate(length(min = 1, message = "O campo 'tenant_id' é obrigatório."))]
    #[schema(example = "t1")]
    pub tenant_id: String,

    #[validate(length(min = 1, message = "O campo 'seller_id' é obrigatório."))]
    #[schema(example = "s1")]
    pub seller_id: String,

    #[validate(length(min = 1, max = 50, message = "O 'sku_code' deve ter entre 1 e 50 caracteres."))]
    #[schema(example = "X1")]
    pub sku_code: String,

    #[validate(length(min = 2, max = 200, message = "O nome deve ter entre 2 e 200 caracteres."))]
    #[schema(example = "Caneta Azul")]
    pub name: String,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Value,
}

#[utoipa::path(
    post,
    path = "/api/v1/skus/create",
    tag = "SKUs",
    request_body = CreateSkuPayload,
    responses(
        (status = 201, description = "SKU criado", body = Sku),
        (status = 400, description = "Payload inválido")
    )
)]
pub async fn create_sku(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateSkuPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    // Sem metadata, grava um objeto vazio (a coluna é NOT NULL).
    let metadata = if payload.metadata.is_null() {
        Value::Object(Default::default())
    } else {
        payload.metadata
    };

    let sku = app_state
        .sku_service
        .create_sku(
            &payload.tenant_id,
            &payload.seller_id,
            &payload.sku_code,
            &payload.name,
            metadata,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(sku)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GetSkusPayload {
    #[validate(length(min = 1, message = "O campo 'tenant_id' é obrigatório."))]
    pub tenant_id: String,

    #[validate(length(min = 1, message = "O campo 'seller_id' é obrigatório."))]
    pub seller_id: String,

    #[validate(
        length(min = 1, max = 100, message = "Informe entre 1 e 100 códigos de SKU."),
        custom(function = "validate_codes_not_blank")
    )]
    #[schema(example = json!(["X1", "X2"]))]
    pub sku_codes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SkuListResponse {
    pub skus: Vec<Sku>,
    pub count: usize,
}

#[utoipa::path(
    post,
    path = "/api/v1/skus/get",
    tag = "SKUs",
    request_body = GetSkusPayload,
    responses(
        (status = 200, description = "SKUs encontrados", body = SkuListResponse),
        (status = 400, description = "Payload inválido")
    )
)]
pub async fn get_skus(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<GetSkusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let skus = app_state
        .sku_service
        .get_skus_by_codes(&payload.tenant_id, &payload.seller_id, &payload.sku_codes)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let count = skus.len();
    Ok((StatusCode::OK, Json(SkuListResponse { skus, count })))
}
