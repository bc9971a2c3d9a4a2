//! Ollama local fallback provider.
//!
//! Speaks the Ollama `/api/generate` protocol against a local daemon. No
//! credential is required; the daemon is assumed to be reachable on
//! localhost.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OllamaConfig;
use crate::providers::types::GenerationOptions;
use crate::providers::{ProviderError, TextProvider};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions<'a>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions<'a> {
    num_predict: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "slice_is_empty")]
    stop: &'a [String],
}

fn slice_is_empty(slice: &&[String]) -> bool {
    slice.is_empty()
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

// ---------------------------------------------------------------------------
// OllamaProvider
// ---------------------------------------------------------------------------

pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn resolve_model<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        if options.model == "default" {
            &self.config.model
        } else {
            &options.model
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

impl TextProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn priority(&self) -> u32 {
        self.config.priority
    }

    fn cost_per_token(&self) -> f64 {
        self.config.cost_per_token
    }

    fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + '_>> {
        let prompt = prompt.to_string();
        let options = options.clone();
        Box::pin(async move {
            let url = format!("{}/api/generate", self.base_url());
            let body = OllamaRequest {
                model: self.resolve_model(&options),
                prompt: &prompt,
                stream: false,
                options: OllamaOptions {
                    num_predict: options.max_tokens.min(self.config.max_tokens),
                    temperature: options.temperature,
                    stop: &options.stop_sequences,
                },
            };

            debug!(model = %body.model, "Sending Ollama generate request");
            let resp = self.client.post(&url).json(&body).send().await?;

            let status = resp.status();
            if !status.is_success() {
                let message = resp.text().await.unwrap_or_default();
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: OllamaResponse = resp.json().await.map_err(|e| {
                ProviderError::ResponseParsing(format!("Invalid Ollama response: {e}"))
            })?;

            if parsed.response.is_empty() {
                return Err(ProviderError::EmptyCompletion {
                    provider: "ollama".to_string(),
                });
            }
            Ok(parsed.response)
        })
    }

    fn check_health(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<bool, ProviderError>> + Send + '_>> {
        Box::pin(async move {
            let url = format!("{}/api/tags", self.base_url());
            match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
                Ok(resp) => Ok(resp.status().is_success()),
                Err(_) => Ok(false),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
