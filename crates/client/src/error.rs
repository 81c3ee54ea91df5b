//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas";
pub const ADMIN_ONLY: &str = "Apenas administradores podem realizar esta ação";
pub const SESSION_EXPIRED: &str = "Session expired, please log in again";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never completed (network down, CORS, DNS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication required")]
    Unauthorized,

    /// 401 from the login endpoint itself
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A mutating call was attempted without a bearer token
    #[error("No session token")]
    MissingToken,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map a non-success status and its body to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body);
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(message),
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the stored session should be dropped.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::MissingToken)
    }

    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(_) => "Could not reach the server".to_string(),
            ApiError::Unauthorized => SESSION_EXPIRED.to_string(),
            ApiError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            ApiError::Forbidden(_) => ADMIN_ONLY.to_string(),
            ApiError::NotFound(m) if m.is_empty() => "Not found".to_string(),
            ApiError::NotFound(m) => format!("Not found: {m}"),
            ApiError::Validation(m) if m.is_empty() => "The server rejected the request".to_string(),
            ApiError::Validation(m) => m.clone(),
            ApiError::Server { status, .. } => format!("Server error ({status})"),
            ApiError::InvalidResponse(_) | ApiError::Serialization(_) => {
                "Unexpected response from the server".to_string()
            }
            ApiError::MissingToken => "Please log in first".to_string(),
        }
    }
}

/// Pull `message` or `error` out of a JSON error body; fall back to the raw text.
fn server_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "erro", "mensagem"] {
            if let Some(serde_json::Value::String(s)) = map.get(key) {
                return s.clone();
            }
        }
    }
    body.trim().to_string()
}
