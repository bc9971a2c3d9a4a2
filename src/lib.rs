pub mod api;
pub mod config;
pub mod error;
pub mod journal;
pub mod providers;
pub mod usage;

use std::sync::Arc;

use crate::config::Config;
use crate::journal::JournalStore;
use crate::providers::ProviderRouter;
use crate::usage::UsageLedger;

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub router: Arc<ProviderRouter>,
    pub ledger: Arc<UsageLedger>,
    /// User-visible response history, distinct from the router's internal
    /// attempt journal.
    pub history: Arc<JournalStore>,
}
