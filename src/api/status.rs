use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;
use crate::providers::types::ProviderStatus;
use crate::usage::WeeklyReport;

/// GET /api/ai/status
///
/// Per-provider health and usage counters, in router priority order.
pub async fn provider_status(State(state): State<AppState>) -> Json<Vec<ProviderStatus>> {
    Json(state.router.provider_status().await)
}

/// GET /api/ai/spend
///
/// Today's aggregate cost across all providers as a bare decimal.
/// Per-provider errors are swallowed into a partial sum.
pub async fn today_spend(State(state): State<AppState>) -> Json<f64> {
    Json(state.router.today_spend())
}

/// GET /api/ai/usage/weekly
///
/// Seven-day usage report per provider, with explicit zero entries for
/// days without traffic.
pub async fn weekly_usage(State(state): State<AppState>) -> Json<WeeklyReport> {
    Json(state.ledger.weekly_report())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersHealth {
    pub status: String,
    pub healthy_providers: usize,
    pub total_providers: usize,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/ai/health
///
/// Probes every provider; "Healthy" when at least one passes.
pub async fn providers_health(State(state): State<AppState>) -> Json<ProvidersHealth> {
    let statuses = state.router.provider_status().await;
    let healthy = statuses.iter().filter(|s| s.is_healthy).count();
    let status = if healthy > 0 { "Healthy" } else { "Unhealthy" };

    Json(ProvidersHealth {
        status: status.to_string(),
        healthy_providers: healthy,
        total_providers: statuses.len(),
        timestamp: Utc::now(),
    })
}
