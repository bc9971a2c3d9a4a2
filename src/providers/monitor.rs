//! Background provider health monitor.
//!
//! Probes every registered provider at the configured interval and logs the
//! result. Routing never consults these results; the viability gate always
//! probes synchronously.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::providers::ProviderRouter;

/// Spawn the periodic health probe task. Runs for the process lifetime; the
/// returned handle is mainly useful for aborting it in tests.
pub fn spawn_health_monitor(
    router: Arc<ProviderRouter>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so the initial
        // sweep happens one full interval after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            for provider in router.providers() {
                let name = provider.name();
                match provider.check_health().await {
                    Ok(true) => debug!(provider = %name, "Provider healthy"),
                    Ok(false) => warn!(provider = %name, "Provider unhealthy"),
                    Err(e) => warn!(provider = %name, error = %e, "Health probe failed"),
                }
            }
        }
    })
}
