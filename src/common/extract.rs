// src/common/extract.rs

use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    middleware::i18n::Locale,
};

// Igual ao `Json` do axum, mas um corpo inválido vira 400 no nosso formato de erro
// (em vez do texto puro / 422 padrão do axum), no idioma do Accept-Language.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // O idioma é lido antes: o corpo consome a requisição.
        let locale = Locale::from_headers(req.headers());

        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::warn!("Corpo da requisição rejeitado: {}", rejection.body_text());
                Err(AppError::InvalidPayload(rejection.body_text()).to_api_error(&locale))
            }
        }
    }
}
