// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::common::i18n::SUPPORTED_LANGUAGES;

// Nosso extrator de idioma
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale("en".to_string())
    }
}

impl Locale {
    // Primeiro idioma suportado do Accept-Language, na ordem de preferência do cliente.
    // "pt-BR" -> "pt"
    pub fn from_header(header_str: &str) -> Self {
        accept_language::parse(header_str)
            .iter()
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_ascii_lowercase())
            .find(|lang| SUPPORTED_LANGUAGES.contains(&lang.as_str()))
            .map(Locale)
            .unwrap_or_default()
    }

    // Sem Accept-Language (ou com valor ilegível), fica o padrão.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_supported_language() {
        assert_eq!(Locale::from_header("pt-BR,pt;q=0.9,en;q=0.8").0, "pt");
        assert_eq!(Locale::from_header("en-US").0, "en");
        assert_eq!(Locale::from_header("de-DE,pt;q=0.5").0, "pt");
        assert_eq!(Locale::from_header("fr").0, "en");
        assert_eq!(Locale::from_header("").0, "en");
    }

    #[test]
    fn reads_accept_language_from_header_map() {
        let mut headers = HeaderMap::new();
        assert_eq!(Locale::from_headers(&headers), Locale::default());

        headers.insert(header::ACCEPT_LANGUAGE, "pt-BR".parse().unwrap());
        assert_eq!(Locale::from_headers(&headers).0, "pt");
    }
}
