//! HTTP route modules

pub mod health;
pub mod monitor;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Uniform response envelope
///
/// `code` mirrors the HTTP status. Successful responses stay `200` even when
/// some categories are degraded; degradation is reported inside `data`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiEnvelope<T> {
    pub code: u16,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiEnvelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            data: Some(data),
            message: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an error envelope
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            message: Some(message.into()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl<T: Serialize> ApiEnvelope<T> {
    /// Convert the envelope into an HTTP response carrying the same status
    pub fn to_http_response(&self) -> HttpResponse {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}
