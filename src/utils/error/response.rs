//! HTTP response handling for errors

use super::types::MonitorError;
use crate::server::routes::ApiEnvelope;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for MonitorError {
    fn status_code(&self) -> StatusCode {
        match self {
            MonitorError::NotFound(_) => StatusCode::NOT_FOUND,
            MonitorError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            MonitorError::Database(_) if self.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            MonitorError::Database(_) if status == StatusCode::SERVICE_UNAVAILABLE => {
                "Backing store unavailable".to_string()
            }
            MonitorError::Database(_) => "Database operation failed".to_string(),
            MonitorError::Config(_)
            | MonitorError::Aggregation(_)
            | MonitorError::Internal(_)
            | MonitorError::Io(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        };

        HttpResponse::build(status).json(ApiEnvelope::<()>::error(status.as_u16(), message))
    }
}
