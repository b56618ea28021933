//! Monitoring endpoints under `/api/monitor`

use crate::monitoring::{Alert, Category, CategoryMetrics};
use crate::server::routes::ApiEnvelope;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Configure monitoring routes
///
/// Fixed paths are registered before the `{category}` catch-all.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/monitor")
            .route("/system-metrics", web::get().to(system_metrics))
            .route("/alerts", web::get().to(current_alerts))
            .route("/history", web::get().to(history))
            .route("/scheduler", web::get().to(scheduler_status))
            .route("/connections/list", web::get().to(connection_list))
            .route(
                "/security-events/anomalies",
                web::get().to(security_anomalies),
            )
            .route("/{category}", web::get().to(category_metrics)),
    );
}

/// History query parameters
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "timeRange")]
    pub time_range: Option<String>,
}

/// Detail listing drawn from one category
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub category: Category,
    pub degraded: bool,
    pub items: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsResponse {
    pub evaluated_at: DateTime<Utc>,
    pub degraded_categories: Vec<Category>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub running: bool,
    pub in_flight: bool,
    pub interval_seconds: u64,
    #[serde(flatten)]
    pub stats: crate::monitoring::SchedulerStats,
}

/// Every category at once
async fn system_metrics(state: web::Data<AppState>) -> Result<HttpResponse> {
    let set = state.facade.get_all().await;
    state.facade.ensure_store_reachable(&set.categories).await?;
    Ok(ApiEnvelope::ok(set).to_http_response())
}

/// One category by path segment
async fn category_metrics(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let metrics = state.facade.get_category(&path).await?;
    state.facade.ensure_store_reachable([&metrics]).await?;
    Ok(ApiEnvelope::ok(metrics).to_http_response())
}

async fn connection_list(state: web::Data<AppState>) -> Result<HttpResponse> {
    listing(&state, Category::Connections, "connections").await
}

async fn security_anomalies(state: web::Data<AppState>) -> Result<HttpResponse> {
    listing(&state, Category::SecurityEvents, "anomalies").await
}

async fn listing(state: &AppState, category: Category, field: &str) -> Result<HttpResponse> {
    let metrics = state.facade.get(category).await?;
    state.facade.ensure_store_reachable([&metrics]).await?;
    Ok(ApiEnvelope::ok(to_listing(metrics, field)).to_http_response())
}

fn to_listing(metrics: CategoryMetrics, field: &str) -> ListingResponse {
    let items = metrics
        .details
        .as_ref()
        .and_then(|details| details.get(field))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    ListingResponse {
        category: metrics.category,
        degraded: metrics.degraded,
        items,
    }
}

/// Alerts raised by a fresh collection against the current threshold table
async fn current_alerts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let set = state.facade.get_all().await;
    state.facade.ensure_store_reachable(&set.categories).await?;

    let alerts = state.evaluator.evaluate(&set);
    debug!(count = alerts.len(), "Alerts evaluated");

    Ok(ApiEnvelope::ok(AlertsResponse {
        evaluated_at: set.collected_at,
        degraded_categories: set.degraded_categories(),
        alerts,
    })
    .to_http_response())
}

async fn history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    let token = query
        .time_range
        .as_deref()
        .unwrap_or(&state.config.monitoring.default_time_range);
    let series = state.facade.get_history(token).await?;
    Ok(ApiEnvelope::ok(series).to_http_response())
}

async fn scheduler_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    let scheduler = &state.scheduler;
    Ok(ApiEnvelope::ok(SchedulerStatus {
        running: scheduler.is_running(),
        in_flight: scheduler.is_in_flight(),
        interval_seconds: scheduler.interval().as_secs(),
        stats: scheduler.stats(),
    })
    .to_http_response())
}
