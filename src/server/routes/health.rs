//! Liveness endpoint

use crate::server::routes::ApiEnvelope;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health status information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub git_hash: Cow<'static, str>,
    pub build_time: Cow<'static, str>,
}

/// Liveness only; this never touches the backing store
pub async fn health_check() -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        git_hash: Cow::Borrowed(env!("GIT_HASH")),
        build_time: Cow::Borrowed(env!("BUILD_TIME")),
    };

    Ok(ApiEnvelope::ok(status).to_http_response())
}
