// src/handlers/inventory.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppJson,
    },
    config::AppState,
    middleware::{deadline::RequestDeadline, i18n::Locale},
    models::inventory::{
        Inventory, InventoryQuery, InventoryView, SkuKey, StockAdjustment, StockAssignment,
    },
};

// ---
// Validações Customizadas
// ---
fn validate_non_zero(val: i64) -> Result<(), ValidationError> {
    if val == 0 {
        let mut err = ValidationError::new("non_zero");
        err.message = Some("O ajuste não pode ser zero.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_sku_codes(codes: &[String]) -> Result<(), ValidationError> {
    if codes.iter().any(|code| code.trim().is_empty()) {
        let mut err = ValidationError::new("length");
        err.add_param("min".into(), &1);
        err.message = Some("Nenhum código de SKU pode ser vazio.".into());
        return Err(err);
    }
    Ok(())
}

// Um erro de validação "solto" vira o mesmo formato de resposta do validator.
fn field_error(field: &'static str, err: ValidationError) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

// ---
// Payload: Create / Upsert
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InventoryLevelPayload {
    #[validate(length(min = 1, message = "O campo 'tenant_id' é obrigatório."))]
    #[schema(example = "t1")]
    pub tenant_id: String,

    #[validate(length(min = 1, message = "O campo 'seller_id' é obrigatório."))]
    #[schema(example = "s1")]
    pub seller_id: String,

    #[validate(length(min = 1, max = 50, message = "O 'sku_code' deve ter entre 1 e 50 caracteres."))]
    #[schema(example = "X1")]
    pub sku_code: String,

    #[validate(range(min = 1, message = "O 'hub_id' deve ser maior ou igual a 1."))]
    #[schema(example = 1)]
    pub hub_id: i64,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[schema(example = 50)]
    pub quantity: i64,
}

impl From<InventoryLevelPayload> for StockAssignment {
    fn from(payload: InventoryLevelPayload) -> Self {
        StockAssignment {
            tenant_id: payload.tenant_id,
            seller_id: payload.seller_id,
            sku_code: payload.sku_code,
            hub_id: payload.hub_id,
            quantity: payload.quantity,
        }
    }
}

// ---
// Handler: create_inventory
// ---
#[utoipa::path(
    post,
    path = "/api/v1/inventory/create",
    tag = "Inventory",
    request_body = InventoryLevelPayload,
    responses(
        (status = 201, description = "Saldo criado", body = Inventory),
        (status = 400, description = "Payload inválido"),
        (status = 404, description = "SKU ou Hub não encontrado"),
        (status = 409, description = "Já existe saldo para este SKU neste hub")
    ),
    params(
        ("x-request-timeout-ms" = Option<u64>, Header, description = "Prazo da operação em ms")
    )
)]
pub async fn create_inventory(
    State(app_state): State<AppState>,
    locale: Locale,
    RequestDeadline(deadline): RequestDeadline,
    AppJson(payload): AppJson<InventoryLevelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let level = app_state
        .inventory_service
        .create(deadline, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(level)))
}

// ---
// Handler: upsert_inventory
// ---
#[utoipa::path(
    patch,
    path = "/api/v1/inventory/upsert",
    tag = "Inventory",
    request_body = InventoryLevelPayload,
    responses(
        (status = 200, description = "Saldo criado ou substituído", body = Inventory),
        (status = 400, description = "Payload inválido"),
        (status = 404, description = "SKU ou Hub não encontrado")
    ),
    params(
        ("x-request-timeout-ms" = Option<u64>, Header, description = "Prazo da operação em ms")
    )
)]
pub async fn upsert_inventory(
    State(app_state): State<AppState>,
    locale: Locale,
    RequestDeadline(deadline): RequestDeadline,
    AppJson(payload): AppJson<InventoryLevelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let level = app_state
        .inventory_service
        .upsert(deadline, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(level)))
}

// ---
// Payload / Resposta: get_inventory
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GetInventoryPayload {
    #[validate(length(min = 1, message = "O campo 'tenant_id' é obrigatório."))]
    pub tenant_id: String,

    #[validate(length(min = 1, message = "O campo 'seller_id' é obrigatório."))]
    pub seller_id: String,

    #[validate(range(min = 1, message = "O 'hub_id' deve ser maior ou igual a 1."))]
    pub hub_id: i64,

    // Vazio ou ausente = todos os SKUs do seller no hub.
    // O limite de 100 é aplicado depois de remover os repetidos.
    #[serde(default)]
    #[validate(custom(function = "validate_sku_codes"))]
    #[schema(example = json!(["X1", "X2"]))]
    pub sku_codes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryListResponse {
    pub items: Vec<InventoryView>,
    pub count: usize,
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory/get",
    tag = "Inventory",
    request_body = GetInventoryPayload,
    responses(
        (status = 200, description = "Saldos do seller no hub", body = InventoryListResponse),
        (status = 400, description = "Payload inválido ou mais de 100 códigos")
    ),
    params(
        ("x-request-timeout-ms" = Option<u64>, Header, description = "Prazo da operação em ms")
    )
)]
pub async fn get_inventory(
    State(app_state): State<AppState>,
    locale: Locale,
    RequestDeadline(deadline): RequestDeadline,
    AppJson(payload): AppJson<GetInventoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let query = InventoryQuery {
        tenant_id: payload.tenant_id,
        seller_id: payload.seller_id,
        hub_id: payload.hub_id,
        sku_codes: payload.sku_codes,
    };

    let items = app_state
        .inventory_service
        .query(deadline, query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let count = items.len();
    Ok((StatusCode::OK, Json(InventoryListResponse { items, count })))
}

// ---
// Payload: update_quantity (ajuste por delta)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuantityPayload {
    #[validate(length(min = 1, message = "O 'tenant_id', se enviado, não pode ser vazio."))]
    pub tenant_id: Option<String>,

    #[validate(length(min = 1, message = "O campo 'seller_id' é obrigatório."))]
    pub seller_id: String,

    #[validate(range(min = 1, message = "O 'hub_id' deve ser maior ou igual a 1."))]
    pub hub_id: i64,

    #[validate(length(min = 1, max = 50, message = "O 'sku_code' deve ter entre 1 e 50 caracteres."))]
    pub sku_code: Option<String>,

    #[validate(range(min = 1, message = "O 'sku_id' deve ser maior ou igual a 1."))]
    pub sku_id: Option<i64>,

    // Delta com sinal: positivo = entrada, negativo = baixa.
    #[validate(custom(function = "validate_non_zero"))]
    #[schema(example = json!(-3))]
    pub quantity: i64,
}

impl UpdateQuantityPayload {
    // Exatamente um identificador de SKU.
    fn sku_key(&self) -> Result<SkuKey, ValidationError> {
        match (&self.sku_code, self.sku_id) {
            (Some(code), None) => Ok(SkuKey::Code(code.clone())),
            (None, Some(id)) => Ok(SkuKey::Id(id)),
            _ => {
                let mut err = ValidationError::new("SkuIdentifierRequired");
                err.message = Some("Informe 'sku_code' ou 'sku_id' (apenas um).".into());
                Err(err)
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateQuantityResponse {
    #[schema(example = "Inventory quantity updated successfully")]
    pub message: String,
    pub inventory: Inventory,
}

#[utoipa::path(
    patch,
    path = "/api/v1/inventory/update-quantity",
    tag = "Inventory",
    request_body = UpdateQuantityPayload,
    responses(
        (status = 200, description = "Quantidade ajustada", body = UpdateQuantityResponse),
        (status = 400, description = "Payload inválido"),
        (status = 404, description = "Saldo ou SKU não encontrado"),
        (status = 409, description = "Estoque insuficiente ou SKU ambíguo")
    ),
    params(
        ("x-request-timeout-ms" = Option<u64>, Header, description = "Prazo da operação em ms")
    )
)]
pub async fn update_quantity(
    State(app_state): State<AppState>,
    locale: Locale,
    RequestDeadline(deadline): RequestDeadline,
    AppJson(payload): AppJson<UpdateQuantityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let sku = payload
        .sku_key()
        .map_err(|e| field_error("sku_code", e).to_api_error(&locale))?;

    let adjustment = StockAdjustment {
        tenant_id: payload.tenant_id,
        seller_id: payload.seller_id,
        hub_id: payload.hub_id,
        sku,
        delta: payload.quantity,
    };

    let inventory = app_state
        .inventory_service
        .adjust_quantity(deadline, adjustment)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((
        StatusCode::OK,
        Json(UpdateQuantityResponse {
            message: "Inventory quantity updated successfully".to_string(),
            inventory,
        }),
    ))
}
