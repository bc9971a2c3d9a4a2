//! OpenAI-compatible remote provider.
//!
//! Speaks the `/v1/chat/completions` protocol against any OpenAI-compatible
//! endpoint. This is the primary remote backend; routing priority and
//! pricing come from configuration.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::OpenAiConfig;
use crate::providers::types::GenerationOptions;
use crate::providers::{ProviderError, TextProvider};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Response types for deserialization
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenAiProvider
// ---------------------------------------------------------------------------

pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// The model sent upstream: the request hint unless it is the generic
    /// "default", in which case the configured model wins.
    fn resolve_model<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        if options.model == "default" {
            &self.config.model
        } else {
            &options.model
        }
    }

    fn build_request_body(&self, prompt: &str, options: &GenerationOptions) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.resolve_model(options),
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": options.max_tokens.min(self.config.max_tokens),
            "temperature": options.temperature,
        });
        if !options.stop_sequences.is_empty() {
            body["stop"] = serde_json::json!(options.stop_sequences);
        }
        body
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

impl TextProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
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
        let body = self.build_request_body(prompt, options);
        Box::pin(async move {
            let url = format!("{}/v1/chat/completions", self.base_url());
            debug!(model = %body["model"], "Sending chat completion request");

            let resp = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let message = resp.text().await.unwrap_or_default();
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatCompletionResponse = resp.json().await.map_err(|e| {
                ProviderError::ResponseParsing(format!("Invalid chat completion response: {e}"))
            })?;

            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .filter(|content| !content.is_empty())
                .ok_or_else(|| ProviderError::EmptyCompletion {
                    provider: "openai".to_string(),
                })
        })
    }

    fn check_health(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<bool, ProviderError>> + Send + '_>> {
        Box::pin(async move {
            let url = format!("{}/v1/models", self.base_url());
            match self
                .client
                .get(&url)
                .bearer_auth(&self.config.api_key)
                .timeout(HEALTH_TIMEOUT)
                .send()
                .await
            {
                Ok(resp) => Ok(resp.status().is_success()),
                Err(_) => Ok(false),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
