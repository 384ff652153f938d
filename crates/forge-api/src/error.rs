use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use forge_core::ForgeError;
use forge_in::DecodeError;
use forge_out::ExportError;
use forge_rules::RuleError;
use serde_json::json;

/// Handler error, rendered as `{error, code}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        Self::Forge(err.into())
    }
}

impl From<RuleError> for ApiError {
    fn from(err: RuleError) -> Self {
        Self::Forge(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Forge(err) => match err {
                ForgeError::ConfigError(_) => {
                    tracing::error!(error = %err, "configuration error");
                    (StatusCode::INTERNAL_SERVER_ERROR, err.code(), err.to_string())
                }
                _ => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
            },
            ApiError::Export(ExportError::Blocked(_)) => {
                (StatusCode::CONFLICT, "EXPORT_BLOCKED", self.to_string())
            }
            ApiError::Export(err) => {
                tracing::error!(error = %err, "export failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT", err.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let ApiError::Export(ExportError::Blocked(errors)) = &self {
            body["errorCount"] = json!(errors);
        }

        (status, axum::Json(body)).into_response()
    }
}
