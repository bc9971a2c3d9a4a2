use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::journal::{JournalDocument, JournalEntry};
use crate::providers::types::{GenerateRequest, RouteOutcome};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSuccess {
    pub success: bool,
    pub content: String,
    pub provider: String,
    pub cost: f64,
    /// Milliseconds.
    pub duration: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFailure {
    pub success: bool,
    pub error: String,
    pub failed_providers: Vec<String>,
    pub total_attempted_cost: f64,
    /// Milliseconds.
    pub duration: u64,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/ai/generate
///
/// Validates the request, routes it through the provider pool, appends the
/// user-visible outcome to the history document, and maps the terminal
/// response to 200 (success) or 503 (all providers exhausted).
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4().to_string();

    if request.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt must not be empty".to_string()));
    }
    if request.max_tokens == 0 {
        return Err(AppError::BadRequest("maxTokens must be positive".to_string()));
    }
    if !(0.0..=2.0).contains(&request.temperature) {
        return Err(AppError::BadRequest(
            "temperature must be between 0 and 2".to_string(),
        ));
    }

    let options = request.options();
    tracing::info!(
        request_id = %request_id,
        model = %options.model,
        max_tokens = options.max_tokens,
        "Generation request"
    );

    let outcome = state.router.route(&request.prompt, &options).await;
    append_history(&state, &request, &outcome).await;

    match outcome {
        RouteOutcome::Success {
            content,
            provider,
            cost,
            duration_ms,
        } => {
            tracing::info!(
                request_id = %request_id,
                provider = %provider,
                cost,
                duration_ms,
                "Generation succeeded"
            );
            Ok(Json(GenerateSuccess {
                success: true,
                content,
                provider,
                cost,
                duration: duration_ms,
            })
            .into_response())
        }
        RouteOutcome::Failure {
            error,
            failed_providers,
            total_attempted_cost,
            duration_ms,
        } => {
            tracing::warn!(
                request_id = %request_id,
                failed_providers = ?failed_providers,
                duration_ms,
                "Generation failed"
            );
            Ok((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(GenerateFailure {
                    success: false,
                    error,
                    failed_providers,
                    total_attempted_cost,
                    duration: duration_ms,
                }),
            )
                .into_response())
        }
    }
}

/// Append the user-visible outcome to the history document. Failures here
/// must not affect the response.
async fn append_history(state: &AppState, request: &GenerateRequest, outcome: &RouteOutcome) {
    if !state.history.enabled() {
        return;
    }

    let entry = match outcome {
        RouteOutcome::Success {
            content,
            provider,
            cost,
            duration_ms,
        } => history_entry(
            request,
            true,
            provider.clone(),
            content.clone(),
            String::new(),
            *cost,
            *duration_ms,
        ),
        RouteOutcome::Failure {
            error,
            total_attempted_cost,
            duration_ms,
            ..
        } => history_entry(
            request,
            false,
            String::new(),
            String::new(),
            error.clone(),
            *total_attempted_cost,
            *duration_ms,
        ),
    };

    let mut doc = match state.history.load::<JournalDocument>().await {
        Ok(Some(doc)) => doc,
        Ok(None) => JournalDocument::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load response history");
            return;
        }
    };
    doc.push(entry);
    if let Err(e) = state.history.write(&doc).await {
        tracing::warn!(error = %e, "Failed to write response history");
    }
}

fn history_entry(
    request: &GenerateRequest,
    success: bool,
    provider: String,
    content: String,
    error: String,
    cost: f64,
    duration_ms: u64,
) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        prompt: request.prompt.clone(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        model: request.model.clone(),
        success,
        provider,
        content,
        error,
        cost,
        duration_ms,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, JournalConfig, RouterConfig};
    use crate::journal::JournalStore;
    use crate::providers::types::GenerationOptions;
    use crate::providers::{ProviderError, ProviderRouter, TextProvider};
    use crate::usage::UsageLedger;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;

    struct EchoProvider;

    impl TextProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }
        fn priority(&self) -> u32 {
            1
        }
        fn cost_per_token(&self) -> f64 {
            0.0
        }
        fn generate(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + '_>> {
            let reply = format!("echo: {prompt}");
            Box::pin(async move { Ok(reply) })
        }
        fn check_health(
            &self,
        ) -> Pin<Box<dyn Future<Output = Result<bool, ProviderError>> + Send + '_>> {
            Box::pin(async move { Ok(true) })
        }
    }

    fn state_with(
        providers: Vec<Arc<dyn TextProvider>>,
        history: JournalConfig,
        router_config: RouterConfig,
    ) -> AppState {
        let ledger = Arc::new(UsageLedger::new(router_config.provider_limits.clone()));
        let journal = Arc::new(JournalStore::new(JournalConfig::default()));
        let history = Arc::new(JournalStore::new(history));
        let router = Arc::new(ProviderRouter::new(
            providers,
            Arc::clone(&ledger),
            journal,
            router_config,
        ));
        AppState {
            config: Arc::new(Config::default()),
            router,
            ledger,
            history,
        }
    }

    fn request(prompt: &str) -> GenerateRequest {
        serde_json::from_value(serde_json::json!({ "prompt": prompt })).unwrap()
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let state = state_with(vec![], JournalConfig::default(), RouterConfig::default());
        let result = generate(State(state), Json(request("   "))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_temperature_is_rejected() {
        let state = state_with(vec![], JournalConfig::default(), RouterConfig::default());
        let mut req = request("hi");
        req.temperature = 2.5;
        let result = generate(State(state), Json(req)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_exhausted_pool_returns_503() {
        let state = state_with(vec![], JournalConfig::default(), RouterConfig::default());
        let response = generate(State(state), Json(request("hi")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_success_returns_200_and_appends_history() {
        let dir = tempfile::tempdir().unwrap();
        let history_config = JournalConfig {
            enabled: true,
            file_path: dir.path().join("history.json"),
            ..JournalConfig::default()
        };
        let router_config = RouterConfig {
            enable_rate_limiting: false,
            enable_cost_tracking: false,
            ..RouterConfig::default()
        };
        let state = state_with(
            vec![Arc::new(EchoProvider)],
            history_config,
            router_config,
        );

        let response = generate(State(state.clone()), Json(request("hi")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc: JournalDocument = state.history.load().await.unwrap().unwrap();
        assert_eq!(doc.total_requests, 1);
        assert!(doc.responses[0].success);
        assert_eq!(doc.responses[0].provider, "echo");
        assert_eq!(doc.responses[0].content, "echo: hi");
    }

    #[tokio::test]
    async fn test_failure_is_also_recorded_in_history() {
        let dir = tempfile::tempdir().unwrap();
        let history_config = JournalConfig {
            enabled: true,
            file_path: dir.path().join("history.json"),
            ..JournalConfig::default()
        };
        let state = state_with(vec![], history_config, RouterConfig::default());

        let response = generate(State(state.clone()), Json(request("hi")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let doc: JournalDocument = state.history.load().await.unwrap().unwrap();
        assert_eq!(doc.total_requests, 1);
        assert!(!doc.responses[0].success);
        assert_eq!(
            doc.responses[0].error,
            "All AI providers exhausted or unavailable"
        );
    }

    #[test]
    fn test_wire_shapes() {
        let success = GenerateSuccess {
            success: true,
            content: "hello".into(),
            provider: "openai".into(),
            cost: 0.001,
            duration: 42,
        };
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["duration"], 42);

        let failure = GenerateFailure {
            success: false,
            error: "All AI providers exhausted or unavailable".into(),
            failed_providers: vec!["openai".into()],
            total_attempted_cost: 0.0,
            duration: 7,
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["failedProviders"][0], "openai");
        assert_eq!(json["totalAttemptedCost"], 0.0);
    }
}
