pub mod generate;
pub mod health;
pub mod history;
pub mod status;

use axum::Router;
use axum::routing::{get, post};

use crate::AppState;

/// Build the full API router.
///
/// Route layout:
/// ```text
/// /health                 GET   liveness probe
/// /api/ai/generate        POST  routed generation
/// /api/ai/status          GET   per-provider status
/// /api/ai/spend           GET   today's aggregate cost
/// /api/ai/usage/weekly    GET   seven-day usage report
/// /api/ai/health          POST  provider health summary
/// /api/ai/history         GET   response history document
/// /api/ai/rollover        POST  force a history rollover
/// ```
pub fn build_api_router() -> Router<AppState> {
    let ai_routes = Router::new()
        .route("/generate", post(generate::generate))
        .route("/status", get(status::provider_status))
        .route("/spend", get(status::today_spend))
        .route("/usage/weekly", get(status::weekly_usage))
        .route("/health", post(status::providers_health))
        .route("/history", get(history::history))
        .route("/rollover", post(history::force_rollover));

    Router::new()
        .route("/health", get(health::liveness))
        .nest("/api/ai", ai_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_api_router_creates_router() {
        // Smoke test: ensure the router builds without panicking.
        let _router: Router<AppState> = build_api_router();
    }
}
