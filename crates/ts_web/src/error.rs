use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use ts_core::Error;

/// Wraps a domain error so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            err if err.is_user_error() => StatusCode::BAD_REQUEST,
            Error::TranscriptsDisabled(_) => StatusCode::FORBIDDEN,
            Error::TranscriptUnavailable(_) => StatusCode::NOT_FOUND,
            Error::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::MalformedResponse(_)
            | Error::UpstreamError { .. }
            | Error::UpstreamUnavailable(_)
            | Error::NetworkError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {} ({})", self.0, status);
        } else {
            tracing::warn!("⚠️ {} ({})", self.0, status);
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}
