//! Provider trait.

use std::future::Future;
use std::pin::Pin;

use crate::providers::ProviderError;
use crate::providers::types::GenerationOptions;

/// Trait that every text-generation backend must implement.
///
/// Async methods return boxed futures so the trait is dyn-compatible (can be
/// used as `Arc<dyn TextProvider>`). No `async_trait` macro is needed.
pub trait TextProvider: Send + Sync {
    /// Identity used in logs, the usage ledger, and provider-limit lookups.
    fn name(&self) -> &str;

    /// Selection order; lower values are tried first.
    fn priority(&self) -> u32;

    /// Advertised per-token price, for diagnostics only. The authoritative
    /// value comes from the provider-limit configuration.
    fn cost_per_token(&self) -> f64;

    /// Produce a completion for the prompt.
    fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + '_>>;

    /// Lightweight health probe, bounded by a small fixed timeout. Must not
    /// touch the ledger. Callers treat an `Err` the same as unhealthy.
    fn check_health(&self) -> Pin<Box<dyn Future<Output = Result<bool, ProviderError>> + Send + '_>>;
}
