// src/handlers/hubs.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppJson,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::hub::Hub,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHubPayload {
    #[validate(length(min = 1, message = "O campo 'tenant_id' é obrigatório."))]
    #[schema(example = "t1")]
    pub tenant_id: String,

    #[validate(length(min = 1, max = 200, message = "O nome deve ter entre 1 e 200 caracteres."))]
    #[schema(example = "Galpão Norte")]
    pub name: String,

    #[serde(default)]
    #[schema(value_type = Object, example = json!({ "city": "Recife", "lat": -8.05, "lng": -34.9 }))]
    pub location: Value,
}

#[utoipa::path(
    post,
    path = "/api/v1/hubs/create",
    tag = "Hubs",
    request_body = CreateHubPayload,
    responses(
        (status = 201, description = "Hub criado", body = Hub),
        (status = 400, description = "Payload inválido")
    )
)]
pub async fn create_hub(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateHubPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let location = if payload.location.is_null() {
        Value::Object(Default::default())
    } else {
        payload.location
    };

    let hub = app_state
        .hub_service
        .create_hub(&payload.tenant_id, &payload.name, location)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(hub)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GetHubPayload {
    #[validate(range(min = 1, message = "O 'id' deve ser maior ou igual a 1."))]
    #[schema(example = 1)]
    pub id: i64,
}

#[utoipa::path(
    post,
    path = "/api/v1/hubs/get",
    tag = "Hubs",
    request_body = GetHubPayload,
    responses(
        (status = 200, description = "Hub encontrado", body = Hub),
        (status = 404, description = "Hub não encontrado")
    )
)]
pub async fn get_hub(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<GetHubPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let hub = app_state
        .hub_service
        .get_hub(payload.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(hub)))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HubListResponse {
    pub hubs: Vec<Hub>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/v1/hubs/getall",
    tag = "Hubs",
    responses(
        (status = 200, description = "Todos os hubs", body = HubListResponse)
    )
)]
pub async fn get_all_hubs(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let hubs = app_state
        .hub_service
        .list_hubs()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let count = hubs.len();
    Ok((StatusCode::OK, Json(HubListResponse { hubs, count })))
}
