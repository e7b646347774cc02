use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod error;
pub mod form;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Upload ceiling for PDF bodies.
pub const DEFAULT_BODY_LIMIT: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub body_limit: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl WebConfig {
    /// Reads `CORS_ALLOWED_ORIGINS` as a comma separated list.
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        Self { allowed_origins, ..Self::default() }
    }

    fn cors(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            return CorsLayer::permissive();
        }
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

pub fn create_app(state: AppState, config: &WebConfig) -> Router {
    Router::new()
        .route("/summarize-text", post(handlers::summarize_text))
        .route("/summarize-pdf", post(handlers::summarize_pdf))
        .route("/summarize-youtube", post(handlers::summarize_youtube))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(config.cors())
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use ts_core::{Error, Result, SummaryResult};
    pub use crate::{create_app, AppState, WebConfig};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://a.example/ ,http://localhost:3000,, "),
            vec!["https://a.example".to_string(), "http://localhost:3000".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }
}
