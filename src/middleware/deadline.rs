// src/middleware/deadline.rs

use std::time::Duration;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use serde_json::json;

use crate::{
    common::{error::ApiError, i18n},
    config::AppState,
    middleware::i18n::Locale,
};

pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Prazo da operação para esta requisição.
///
/// Sem o header vale o `REQUEST_TIMEOUT_MS` da configuração; com ele, o valor
/// pedido limitado a `MAX_REQUEST_TIMEOUT_MS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDeadline(pub Duration);

impl RequestDeadline {
    pub fn from_headers(headers: &HeaderMap, default: Duration, max: Duration) -> Result<Self, String> {
        let Some(raw) = headers.get(REQUEST_TIMEOUT_HEADER) else {
            return Ok(RequestDeadline(default));
        };

        let millis = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .ok_or_else(|| format!("{REQUEST_TIMEOUT_HEADER} deve ser um inteiro positivo (ms)"))?;

        Ok(RequestDeadline(Duration::from_millis(millis).min(max)))
    }
}

impl FromRequestParts<AppState> for RequestDeadline {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let config = &state.config;

        match RequestDeadline::from_headers(&parts.headers, config.request_timeout, config.max_request_timeout) {
            Ok(deadline) => Ok(deadline),
            Err(reason) => {
                let locale = Locale::from_headers(&parts.headers);
                tracing::warn!("Header de prazo rejeitado: {}", reason);
                Err(ApiError {
                    status: StatusCode::BAD_REQUEST,
                    code: "INVALID_DEADLINE",
                    message: i18n::translate(&locale.0, "INVALID_DEADLINE").to_string(),
                    details: Some(json!({ "reason": reason })),
                })
            }
        }
    }
}
