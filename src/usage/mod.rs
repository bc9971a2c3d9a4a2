//! In-memory usage accounting.
//!
//! The ledger keeps per-provider, per-UTC-day usage for one process
//! lifetime. Nothing here touches disk; durable history lives in the
//! journal module.

pub mod ledger;

pub use self::ledger::{DailyUsage, UsageLedger, WeeklyReport};
