//! Durable JSON journals.
//!
//! A journal is a single on-disk JSON document plus a directory of
//! rolled-over snapshots. The router records every attempt in one journal;
//! the HTTP façade records user-visible outcomes in a separate history
//! document. Both share the same store implementation.

pub mod store;

pub use self::store::{JournalError, JournalStore};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Journal document model
// ---------------------------------------------------------------------------

/// One recorded generation attempt or user-visible response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub model: String,
    pub success: bool,
    pub provider: String,
    pub content: String,
    pub error: String,
    pub cost: f64,
    pub duration_ms: u64,
}

/// The on-disk document: ordered entries plus derived totals.
///
/// `total_requests` and `total_cost` are kept consistent with `responses`
/// on every persisted version; always mutate through [`Self::push`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDocument {
    pub responses: Vec<JournalEntry>,
    pub last_updated: DateTime<Utc>,
    pub total_requests: u64,
    pub total_cost: f64,
}

impl JournalDocument {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            last_updated: Utc::now(),
            total_requests: 0,
            total_cost: 0.0,
        }
    }

    /// Append an entry, updating the derived totals and timestamp.
    pub fn push(&mut self, entry: JournalEntry) {
        self.total_requests += 1;
        self.total_cost += entry.cost;
        self.last_updated = Utc::now();
        self.responses.push(entry);
    }
}

impl Default for JournalDocument {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Scheduled rollover
// ---------------------------------------------------------------------------

/// Spawn a background task that periodically runs the size/age rollover
/// check, so the age trigger fires even when writes are rare.
///
/// The task runs for the process lifetime; the returned handle is mainly
/// useful for aborting it in tests.
pub fn spawn_rollover_task(
    store: Arc<JournalStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so the initial
        // check happens one full interval after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.rollover_if_needed().await {
                Ok(true) => tracing::info!("Scheduled journal rollover completed"),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "Scheduled journal rollover failed"),
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cost: f64) -> JournalEntry {
        JournalEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            prompt: "hi".into(),
            max_tokens: 1000,
            temperature: 0.7,
            model: "default".into(),
            success: true,
            provider: "openai".into(),
            content: "hello".into(),
            error: String::new(),
            cost,
            duration_ms: 12,
        }
    }

    #[test]
    fn test_push_maintains_totals() {
        let mut doc = JournalDocument::new();
        doc.push(entry(0.25));
        doc.push(entry(0.75));

        assert_eq!(doc.responses.len(), 2);
        assert_eq!(doc.total_requests, 2);
        assert!((doc.total_cost - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_document_wire_layout() {
        let mut doc = JournalDocument::new();
        doc.push(entry(0.5));

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["responses"].is_array());
        assert!(json["lastUpdated"].is_string());
        assert_eq!(json["totalRequests"], 1);
        assert_eq!(json["responses"][0]["durationMs"], 12);
        assert_eq!(json["responses"][0]["maxTokens"], 1000);
    }

    #[test]
    fn test_document_roundtrip() {
        let mut doc = JournalDocument::new();
        doc.push(entry(0.5));

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: JournalDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_requests, doc.total_requests);
        assert_eq!(parsed.responses[0].provider, "openai");
    }
}
