//! Usage ledger: concurrent (provider, day) accounting.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::config::{LimitType, ProviderLimitConfig};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Records and views
// ---------------------------------------------------------------------------

/// A single recorded usage event. Owned by the ledger; never published.
#[derive(Debug, Clone)]
struct UsageRecord {
    #[allow(dead_code)]
    timestamp: DateTime<Utc>,
    tokens: u64,
    cost: f64,
}

/// Aggregated usage for one provider on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsage {
    pub provider: String,
    pub date: String,
    pub request_count: u64,
    pub tokens_used: u64,
    pub total_cost: f64,
}

impl DailyUsage {
    fn zero(provider: &str, date: &str) -> Self {
        Self {
            provider: provider.to_string(),
            date: date.to_string(),
            request_count: 0,
            tokens_used: 0,
            total_cost: 0.0,
        }
    }
}

/// Seven-day usage report across every provider ever recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    /// Provider -> seven entries, oldest first ([today-6 .. today]).
    pub providers: BTreeMap<String, Vec<DailyUsage>>,
    pub total_requests: u64,
    pub total_cost: f64,
}

// ---------------------------------------------------------------------------
// UsageLedger
// ---------------------------------------------------------------------------

type DayKey = (String, String);
type Bucket = Arc<Mutex<Vec<UsageRecord>>>;

/// Process-wide, concurrent-safe map of (provider, UTC day) -> records.
///
/// The outer map gives atomic insert-or-get per key; each value is an
/// append-only sequence updated under its own short critical section. No
/// lock is held across I/O. Lock poisoning is recovered via `into_inner`,
/// so `record` cannot fail.
pub struct UsageLedger {
    days: RwLock<HashMap<DayKey, Bucket>>,
    /// Provider-limit configuration, keyed by lowercased provider name.
    limits: HashMap<String, ProviderLimitConfig>,
}

impl UsageLedger {
    pub fn new(limits: HashMap<String, ProviderLimitConfig>) -> Self {
        let limits = limits
            .into_iter()
            .map(|(name, limit)| (name.to_lowercase(), limit))
            .collect();
        Self {
            days: RwLock::new(HashMap::new()),
            limits,
        }
    }

    /// The configured limits for a provider, if any.
    pub fn limit_for(&self, provider: &str) -> Option<&ProviderLimitConfig> {
        self.limits.get(&provider.to_lowercase())
    }

    /// Authoritative per-token price for a provider; 0 when unconfigured.
    pub fn cost_per_token(&self, provider: &str) -> f64 {
        self.limit_for(provider).map_or(0.0, |l| l.cost_per_token)
    }

    /// Append a usage record for the current UTC instant. Atomic per key.
    pub fn record(&self, provider: &str, tokens: u64, cost: f64) {
        let now = Utc::now();
        let date = now.format(DATE_FORMAT).to_string();
        let bucket = self.bucket(provider, &date);
        let mut records = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        records.push(UsageRecord {
            timestamp: now,
            tokens,
            cost,
        });
    }

    /// Usage for the current UTC date; zero-valued when nothing is recorded.
    pub fn today_usage(&self, provider: &str) -> DailyUsage {
        self.usage_on(provider, &Utc::now().format(DATE_FORMAT).to_string())
    }

    /// Usage view for a rate-limit window.
    ///
    /// Hour and month windows resolve to the calendar-day view; `unlimited`
    /// yields a synthetic zero view that is always below any limit.
    pub fn usage_for_limit_type(&self, provider: &str, limit_type: LimitType) -> DailyUsage {
        match limit_type {
            LimitType::Unlimited => {
                DailyUsage::zero(provider, &Utc::now().format(DATE_FORMAT).to_string())
            }
            LimitType::Hour | LimitType::Day | LimitType::Month => self.today_usage(provider),
        }
    }

    /// Whether `additional_cost` fits under the provider's daily budget
    /// limit. A provider with no configured limit is denied.
    pub fn check_budget(&self, provider: &str, additional_cost: f64) -> bool {
        let Some(limit) = self.limit_for(provider) else {
            return false;
        };
        self.today_usage(provider).total_cost + additional_cost <= limit.daily_budget_limit
    }

    /// Seven daily views per provider for [today-6 .. today], with missing
    /// days as explicit zero entries, plus cross-provider aggregates.
    pub fn weekly_report(&self) -> WeeklyReport {
        let today = Utc::now().date_naive();
        let mut names: Vec<String> = {
            let days = self.days.read().unwrap_or_else(PoisonError::into_inner);
            days.keys().map(|(provider, _)| provider.clone()).collect()
        };
        names.sort();
        names.dedup();

        let mut providers = BTreeMap::new();
        let mut total_requests = 0;
        let mut total_cost = 0.0;

        for name in names {
            let mut entries = Vec::with_capacity(7);
            for offset in (0..7).rev() {
                let date = format_day(today, offset);
                let usage = self.usage_on(&name, &date);
                total_requests += usage.request_count;
                total_cost += usage.total_cost;
                entries.push(usage);
            }
            providers.insert(name, entries);
        }

        WeeklyReport {
            providers,
            total_requests,
            total_cost,
        }
    }

    // -- internals -----------------------------------------------------------

    fn usage_on(&self, provider: &str, date: &str) -> DailyUsage {
        let key = (provider.to_string(), date.to_string());
        let bucket = {
            let days = self.days.read().unwrap_or_else(PoisonError::into_inner);
            days.get(&key).cloned()
        };
        let Some(bucket) = bucket else {
            return DailyUsage::zero(provider, date);
        };

        let records = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        DailyUsage {
            provider: provider.to_string(),
            date: date.to_string(),
            request_count: records.len() as u64,
            tokens_used: records.iter().map(|r| r.tokens).sum(),
            total_cost: records.iter().map(|r| r.cost).sum(),
        }
    }

    fn bucket(&self, provider: &str, date: &str) -> Bucket {
        let key = (provider.to_string(), date.to_string());
        {
            let days = self.days.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(bucket) = days.get(&key) {
                return Arc::clone(bucket);
            }
        }
        let mut days = self.days.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(days.entry(key).or_default())
    }
}

fn format_day(today: NaiveDate, offset: u64) -> String {
    today
        .checked_sub_days(Days::new(offset))
        .unwrap_or(today)
        .format(DATE_FORMAT)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
