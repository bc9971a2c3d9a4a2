//! Provider Router
//!
//! Orders providers by priority, gates each candidate on health, request
//! rate, and budget, and falls through to the next provider on failure.
//! Every dispatched attempt is recorded in the usage ledger and, best
//! effort, in the attempt journal.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::RouterConfig;
use crate::journal::{JournalDocument, JournalEntry, JournalStore};
use crate::providers::TextProvider;
use crate::providers::estimate::{chars_to_tokens, cost_for_tokens, estimate_cost};
use crate::providers::types::{GenerationOptions, ProviderStatus, RouteOutcome};
use crate::usage::UsageLedger;

// ---------------------------------------------------------------------------
// Per-call accounting
// ---------------------------------------------------------------------------

/// Outcome of a single dispatched provider attempt.
struct Attempt {
    provider: String,
    success: bool,
    content: String,
    cost: f64,
    entry: JournalEntry,
}

/// Accumulator for one routed call. The last attempt is the terminal one;
/// if any attempt succeeded, it is the last.
#[derive(Default)]
struct RoutingResult {
    attempts: Vec<Attempt>,
}

impl RoutingResult {
    fn total_cost(&self) -> f64 {
        self.attempts.iter().map(|a| a.cost).sum()
    }

    fn failed_providers(&self) -> Vec<String> {
        self.attempts
            .iter()
            .filter(|a| !a.success)
            .map(|a| a.provider.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ProviderRouter
// ---------------------------------------------------------------------------

/// Routes generation requests across the provider pool.
///
/// Immutable after construction, so it is shared as a plain `Arc` and every
/// operation takes `&self`. Attempts within one `route` call are strictly
/// sequential; concurrent calls are independent.
pub struct ProviderRouter {
    /// Sorted ascending by priority; ties keep insertion order.
    providers: Vec<Arc<dyn TextProvider>>,
    ledger: Arc<UsageLedger>,
    journal: Arc<JournalStore>,
    config: RouterConfig,
}

impl ProviderRouter {
    pub fn new(
        mut providers: Vec<Arc<dyn TextProvider>>,
        ledger: Arc<UsageLedger>,
        journal: Arc<JournalStore>,
        config: RouterConfig,
    ) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self {
            providers,
            ledger,
            journal,
            config,
        }
    }

    /// Registered providers in priority order.
    pub fn providers(&self) -> &[Arc<dyn TextProvider>] {
        &self.providers
    }

    // -- route ---------------------------------------------------------------

    /// Route one generation call through the provider pool.
    ///
    /// Providers are visited in priority order; non-viable ones are skipped
    /// without an attempt, and a failed attempt falls through to the next
    /// candidate. Never returns an error: exhaustion yields the Failure
    /// variant.
    pub async fn route(&self, prompt: &str, options: &GenerationOptions) -> RouteOutcome {
        let started = Instant::now();
        let mut result = RoutingResult::default();

        for provider in &self.providers {
            if !self.is_viable(provider.as_ref(), prompt).await {
                continue;
            }

            let attempt = self.attempt(provider.as_ref(), prompt, options).await;
            if attempt.success {
                let content = attempt.content.clone();
                let provider_name = attempt.provider.clone();
                let cost = attempt.cost;
                result.attempts.push(attempt);
                self.persist(&result).await;
                return RouteOutcome::Success {
                    content,
                    provider: provider_name,
                    cost,
                    duration_ms: started.elapsed().as_millis() as u64,
                };
            }
            result.attempts.push(attempt);
        }

        self.persist(&result).await;
        RouteOutcome::Failure {
            error: "All AI providers exhausted or unavailable".to_string(),
            failed_providers: result.failed_providers(),
            total_attempted_cost: result.total_cost(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    // -- viability -----------------------------------------------------------

    /// Whether a provider qualifies for selection on this call: healthy,
    /// under its request limit, and within the daily budget projection.
    /// Anything unexpected fails closed.
    async fn is_viable(&self, provider: &dyn TextProvider, prompt: &str) -> bool {
        let name = provider.name();

        match provider.check_health().await {
            Ok(true) => {}
            Ok(false) => {
                debug!(provider = %name, "Skipping unhealthy provider");
                return false;
            }
            Err(e) => {
                warn!(provider = %name, error = %e, "Health check failed");
                return false;
            }
        }

        let limit = self.ledger.limit_for(name);

        if self.config.enable_rate_limiting {
            let Some(limit) = limit else {
                debug!(provider = %name, "No provider limits configured, denying");
                return false;
            };
            let usage = self.ledger.usage_for_limit_type(name, limit.limit_type);
            if usage.request_count >= limit.request_limit {
                debug!(
                    provider = %name,
                    used = usage.request_count,
                    limit = limit.request_limit,
                    "Request limit reached"
                );
                return false;
            }
        }

        if self.config.enable_cost_tracking {
            let cost_per_token = limit.map_or(0.0, |l| l.cost_per_token);
            let projected =
                self.ledger.today_usage(name).total_cost + estimate_cost(prompt, cost_per_token);
            if projected > self.config.daily_budget {
                debug!(
                    provider = %name,
                    projected,
                    budget = self.config.daily_budget,
                    "Daily budget would be exceeded"
                );
                return false;
            }
        }

        true
    }

    // -- attempt -------------------------------------------------------------

    /// Dispatch one generation attempt and account for its outcome.
    async fn attempt(
        &self,
        provider: &dyn TextProvider,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Attempt {
        let name = provider.name().to_string();
        info!(provider = %name, "Routing request to provider");
        let started = Instant::now();

        match provider.generate(prompt, options).await {
            Ok(content) => {
                let tokens = chars_to_tokens(prompt.chars().count() + content.chars().count());
                let cost = cost_for_tokens(tokens, self.ledger.cost_per_token(&name));
                self.ledger.record(&name, tokens, cost);

                let duration_ms = started.elapsed().as_millis() as u64;
                info!(provider = %name, tokens, cost, duration_ms, "Provider call succeeded");

                let entry = self.journal_entry(
                    prompt,
                    options,
                    &name,
                    true,
                    content.clone(),
                    String::new(),
                    cost,
                    duration_ms,
                );
                Attempt {
                    provider: name,
                    success: true,
                    content,
                    cost,
                    entry,
                }
            }
            Err(e) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                error!(provider = %name, error = %e, "Provider failed");

                let entry = self.journal_entry(
                    prompt,
                    options,
                    &name,
                    false,
                    String::new(),
                    e.to_string(),
                    0.0,
                    duration_ms,
                );
                Attempt {
                    provider: name,
                    success: false,
                    content: String::new(),
                    cost: 0.0,
                    entry,
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn journal_entry(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        provider: &str,
        success: bool,
        content: String,
        error: String,
        cost: f64,
        duration_ms: u64,
    ) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            prompt: prompt.to_string(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            model: options.model.clone(),
            success,
            provider: provider.to_string(),
            content,
            error,
            cost,
            duration_ms,
        }
    }

    /// Append this call's entries to the attempt journal. Journal failures
    /// are non-fatal.
    async fn persist(&self, result: &RoutingResult) {
        if result.attempts.is_empty() || !self.journal.enabled() {
            return;
        }
        let mut doc = match self.journal.load::<JournalDocument>().await {
            Ok(Some(doc)) => doc,
            Ok(None) => JournalDocument::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load attempt journal");
                return;
            }
        };
        for attempt in &result.attempts {
            doc.push(attempt.entry.clone());
        }
        if let Err(e) = self.journal.write(&doc).await {
            warn!(error = %e, "Failed to write attempt journal");
        }
    }

    // -- diagnostics ---------------------------------------------------------

    /// Current status of every provider, in priority order. A failed probe
    /// marks the provider unhealthy; this never aborts.
    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        let mut statuses = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let name = provider.name();
            let is_healthy = matches!(provider.check_health().await, Ok(true));

            let limit = self.ledger.limit_for(name);
            let usage = match limit {
                Some(limit) => self.ledger.usage_for_limit_type(name, limit.limit_type),
                None => self.ledger.today_usage(name),
            };
            let request_limit = limit.map_or(0, |l| l.request_limit);

            statuses.push(ProviderStatus {
                name: name.to_string(),
                is_healthy,
                requests_today: usage.request_count,
                cost_today: usage.total_cost,
                remaining_requests: request_limit.saturating_sub(usage.request_count),
            });
        }
        statuses
    }

    /// Today's aggregate spend across all providers.
    pub fn today_spend(&self) -> f64 {
        self.providers
            .iter()
            .map(|p| self.ledger.today_usage(p.name()).total_cost)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
