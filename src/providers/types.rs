//! Request and response types shared by the router and the HTTP façade.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GenerateRequest
// ---------------------------------------------------------------------------

/// A generation request as received on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

impl GenerateRequest {
    /// The options handed to an adapter: the request minus the prompt.
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            model: self.model.clone(),
            stop_sequences: self.stop_sequences.clone(),
        }
    }
}

const fn default_max_tokens() -> u32 {
    1000
}
const fn default_temperature() -> f64 {
    0.7
}
fn default_model() -> String {
    "default".to_string()
}

// ---------------------------------------------------------------------------
// GenerationOptions
// ---------------------------------------------------------------------------

/// Generation parameters passed to a provider adapter.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f64,
    pub model: String,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            model: default_model(),
            stop_sequences: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RouteOutcome
// ---------------------------------------------------------------------------

/// Terminal response of one routed generation call.
///
/// Pattern matching is the intended consumer style; the façade maps each
/// variant to its HTTP representation.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Success {
        content: String,
        provider: String,
        cost: f64,
        duration_ms: u64,
    },
    Failure {
        error: String,
        failed_providers: Vec<String>,
        total_attempted_cost: f64,
        duration_ms: u64,
    },
}

impl RouteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Success { duration_ms, .. } | Self::Failure { duration_ms, .. } => *duration_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderStatus
// ---------------------------------------------------------------------------

/// Point-in-time view of a single provider, as served by `/api/ai/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub name: String,
    pub is_healthy: bool,
    pub requests_today: u64,
    pub cost_today: f64,
    pub remaining_requests: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults() {
        let request: GenerateRequest = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        assert_eq!(request.prompt, "hi");
        assert_eq!(request.max_tokens, 1000);
        assert!((request.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(request.model, "default");
        assert!(request.stop_sequences.is_empty());
    }

    #[test]
    fn test_generate_request_camel_case_fields() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"prompt":"hi","maxTokens":50,"temperature":1.5,"model":"fast","stopSequences":["END"]}"#,
        )
        .unwrap();
        assert_eq!(request.max_tokens, 50);
        assert!((request.temperature - 1.5).abs() < f64::EPSILON);
        assert_eq!(request.model, "fast");
        assert_eq!(request.stop_sequences, vec!["END".to_string()]);
    }

    #[test]
    fn test_options_drop_the_prompt() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"prompt":"hi","maxTokens":50}"#).unwrap();
        let options = request.options();
        assert_eq!(options.max_tokens, 50);
        assert_eq!(options.model, "default");
    }

    #[test]
    fn test_provider_status_serialization() {
        let status = ProviderStatus {
            name: "openai".into(),
            is_healthy: true,
            requests_today: 3,
            cost_today: 0.25,
            remaining_requests: 97,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["name"], "openai");
        assert_eq!(json["isHealthy"], true);
        assert_eq!(json["requestsToday"], 3);
        assert_eq!(json["remainingRequests"], 97);
    }

    #[test]
    fn test_route_outcome_accessors() {
        let success = RouteOutcome::Success {
            content: "hello".into(),
            provider: "p1".into(),
            cost: 0.1,
            duration_ms: 12,
        };
        assert!(success.is_success());
        assert_eq!(success.duration_ms(), 12);

        let failure = RouteOutcome::Failure {
            error: "nope".into(),
            failed_providers: vec![],
            total_attempted_cost: 0.0,
            duration_ms: 3,
        };
        assert!(!failure.is_success());
        assert_eq!(failure.duration_ms(), 3);
    }
}
