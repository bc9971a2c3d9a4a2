use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Environment override tracking
// ---------------------------------------------------------------------------

/// Tracks which configuration settings are overridden by environment
/// variables, so diagnostics can report where an effective value came from.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    overrides: HashMap<String, String>,
}

impl EnvOverrides {
    /// Check whether a setting key (e.g. "server.host") is overridden.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.overrides.contains_key(key)
    }

    /// Get the env var name that overrides the given setting key.
    pub fn env_var_for(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str)
    }

    fn record(&mut self, key: &str, env_var: &str) {
        self.overrides.insert(key.to_string(), env_var.to_string());
    }
}

// ---------------------------------------------------------------------------
// Main configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Env var overrides are not serialized to TOML.
    #[serde(skip)]
    pub env_overrides: EnvOverrides,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouterConfig {
    /// Overall daily spend ceiling applied during viability gating.
    #[serde(default = "default_daily_budget")]
    pub daily_budget: f64,
    /// Advisory; routing visits each provider exactly once.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval_secs: u64,
    #[serde(default = "default_true")]
    pub enable_cost_tracking: bool,
    #[serde(default = "default_true")]
    pub enable_rate_limiting: bool,
    /// Per-provider limits, keyed by provider name (matched
    /// case-insensitively).
    #[serde(default)]
    pub provider_limits: HashMap<String, ProviderLimitConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            daily_budget: default_daily_budget(),
            max_retries: default_max_retries(),
            health_check_interval_secs: default_health_check_interval(),
            enable_cost_tracking: true,
            enable_rate_limiting: true,
            provider_limits: HashMap::new(),
        }
    }
}

impl RouterConfig {
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ProviderLimitConfig {
    /// Requests allowed per window; 0 denies all requests by rate.
    #[serde(default)]
    pub request_limit: u64,
    #[serde(default)]
    pub limit_type: LimitType,
    #[serde(default)]
    pub cost_per_token: f64,
    #[serde(default)]
    pub daily_budget_limit: f64,
}

/// Rate-limit window. Hour and month currently resolve to the calendar-day
/// view; `unlimited` always passes the rate gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitType {
    Hour,
    #[default]
    Day,
    Month,
    Unlimited,
}

impl std::fmt::Display for LimitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl FromStr for LimitType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "unlimited" => Ok(Self::Unlimited),
            _ => Err(format!("Unknown limit type: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Journal configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_journal_path")]
    pub file_path: PathBuf,
    /// Accepts an integer byte count or a multiplicative expression such as
    /// "5 * 1024 * 1024". Invalid expressions fall back to 10 MiB.
    #[serde(
        default = "default_max_file_size",
        deserialize_with = "deserialize_byte_size"
    )]
    pub max_file_size: u64,
    #[serde(default = "default_max_file_age_days")]
    pub max_file_age_days: u64,
    #[serde(default = "default_rollover_directory")]
    pub rollover_directory: PathBuf,
    /// How often the scheduled rotation task re-checks the size/age limits.
    #[serde(default = "default_rollover_check_interval")]
    pub rollover_check_interval_secs: u64,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file_path: default_journal_path(),
            max_file_size: default_max_file_size(),
            max_file_age_days: default_max_file_age_days(),
            rollover_directory: default_rollover_directory(),
            rollover_check_interval_secs: default_rollover_check_interval(),
        }
    }
}

impl JournalConfig {
    pub fn max_file_age(&self) -> Duration {
        Duration::from_secs(self.max_file_age_days * 24 * 60 * 60)
    }

    pub fn rollover_check_interval(&self) -> Duration {
        Duration::from_secs(self.rollover_check_interval_secs)
    }

    /// Derive the options for a sibling document: same directory, limits,
    /// and rollover settings, with `suffix` appended to the file stem.
    pub fn for_document(&self, suffix: &str) -> Self {
        let stem = self
            .file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("journal");
        let ext = self
            .file_path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("json");
        let mut derived = self.clone();
        derived.file_path = self.file_path.with_file_name(format!("{stem}{suffix}.{ext}"));
        derived
    }
}

/// Parse "N * M * ..." into a byte count. Only literal non-negative
/// integers joined by `*` are accepted; this is not an expression language.
fn parse_byte_size_expr(expr: &str) -> Option<u64> {
    let mut product: u64 = 1;
    let mut seen_any = false;
    for part in expr.split('*') {
        let factor: u64 = part.trim().parse().ok()?;
        product = product.checked_mul(factor)?;
        seen_any = true;
    }
    (seen_any && product > 0).then_some(product)
}

fn deserialize_byte_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ByteSize {
        Count(u64),
        Expr(String),
    }

    match ByteSize::deserialize(deserializer)? {
        ByteSize::Count(n) => Ok(n),
        ByteSize::Expr(expr) => Ok(parse_byte_size_expr(&expr).unwrap_or_else(|| {
            tracing::warn!(
                expr = %expr,
                "Invalid max_file_size expression, using 10 MiB"
            );
            default_max_file_size()
        })),
    }
}

// ---------------------------------------------------------------------------
// Provider adapter configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiConfig>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<OllamaConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_adapter_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_openai_priority")]
    pub priority: u32,
    #[serde(default)]
    pub cost_per_token: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
    #[serde(default = "default_adapter_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_ollama_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_ollama_priority")]
    pub priority: u32,
    #[serde(default)]
    pub cost_per_token: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "127.0.0.1".to_string()
}
const fn default_port() -> u16 {
    8420
}
const fn default_true() -> bool {
    true
}
const fn default_daily_budget() -> f64 {
    10.0
}
const fn default_max_retries() -> u32 {
    3
}
const fn default_health_check_interval() -> u64 {
    300
}
fn default_journal_path() -> PathBuf {
    PathBuf::from("data/journal.json")
}
const fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}
const fn default_max_file_age_days() -> u64 {
    7
}
fn default_rollover_directory() -> PathBuf {
    PathBuf::from("data/rollover")
}
const fn default_rollover_check_interval() -> u64 {
    300
}
fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
const fn default_adapter_max_tokens() -> u32 {
    4096
}
const fn default_openai_timeout() -> u64 {
    60
}
const fn default_openai_priority() -> u32 {
    1
}
fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_ollama_model() -> String {
    "llama3".to_string()
}
const fn default_ollama_timeout() -> u64 {
    120
}
const fn default_ollama_priority() -> u32 {
    2
}
fn default_log_level() -> String {
    "info".to_string()
}

// ---------------------------------------------------------------------------
// Config loading, env overrides, validation
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a TOML file, then apply environment variable
    /// overrides. Any setting prefixed with `SWITCHBOARD_` takes precedence
    /// over the file value and is tracked in `env_overrides`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        let mut ov = EnvOverrides::default();

        macro_rules! env_str {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    $field = val;
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_bool {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    $field = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_parse {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    if let Ok(parsed) = val.parse() {
                        $field = parsed;
                        ov.record($key, $env);
                    }
                }
            };
        }
        macro_rules! env_path {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    $field = PathBuf::from(val);
                    ov.record($key, $env);
                }
            };
        }

        // -- Server --
        env_str!("server.host", "SWITCHBOARD_SERVER_HOST", self.server.host);
        env_parse!("server.port", "SWITCHBOARD_SERVER_PORT", self.server.port);

        // -- Router --
        env_parse!(
            "router.daily_budget",
            "SWITCHBOARD_ROUTER_DAILY_BUDGET",
            self.router.daily_budget
        );
        env_bool!(
            "router.enable_cost_tracking",
            "SWITCHBOARD_ROUTER_COST_TRACKING",
            self.router.enable_cost_tracking
        );
        env_bool!(
            "router.enable_rate_limiting",
            "SWITCHBOARD_ROUTER_RATE_LIMITING",
            self.router.enable_rate_limiting
        );

        // -- Journal --
        env_bool!(
            "journal.enabled",
            "SWITCHBOARD_JOURNAL_ENABLED",
            self.journal.enabled
        );
        env_path!(
            "journal.file_path",
            "SWITCHBOARD_JOURNAL_PATH",
            self.journal.file_path
        );
        env_path!(
            "journal.rollover_directory",
            "SWITCHBOARD_JOURNAL_ROLLOVER_DIR",
            self.journal.rollover_directory
        );

        // -- Logging --
        env_str!("logging.level", "SWITCHBOARD_LOG_LEVEL", self.logging.level);
        env_bool!("logging.json", "SWITCHBOARD_LOG_JSON", self.logging.json);

        self.env_overrides = ov;
    }

    /// Validate startup invariants. Any violation is fatal: the process
    /// must not accept traffic with a broken configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.router.daily_budget > 0.0,
            "router.daily_budget must be positive (got {})",
            self.router.daily_budget
        );
        anyhow::ensure!(
            (1..=10).contains(&self.router.max_retries),
            "router.max_retries must be in 1..=10 (got {})",
            self.router.max_retries
        );
        anyhow::ensure!(
            self.router.health_check_interval_secs > 0,
            "router.health_check_interval_secs must be positive"
        );

        for (name, limit) in &self.router.provider_limits {
            anyhow::ensure!(
                limit.cost_per_token >= 0.0,
                "provider_limits.{name}.cost_per_token must be non-negative"
            );
            anyhow::ensure!(
                limit.daily_budget_limit >= 0.0,
                "provider_limits.{name}.daily_budget_limit must be non-negative"
            );
        }

        if self.journal.enabled {
            anyhow::ensure!(
                self.journal.file_path.file_name().is_some(),
                "journal.file_path must name a file"
            );
            anyhow::ensure!(
                self.journal.max_file_size > 0,
                "journal.max_file_size must be positive"
            );
            anyhow::ensure!(
                self.journal.max_file_age_days > 0,
                "journal.max_file_age_days must be positive"
            );
            anyhow::ensure!(
                !self.journal.rollover_directory.as_os_str().is_empty(),
                "journal.rollover_directory must not be empty"
            );
            anyhow::ensure!(
                self.journal.rollover_check_interval_secs > 0,
                "journal.rollover_check_interval_secs must be positive"
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            router: RouterConfig::default(),
            journal: JournalConfig::default(),
            providers: ProvidersConfig::default(),
            logging: LoggingConfig::default(),
            env_overrides: EnvOverrides::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8420);
        assert_eq!(config.router.daily_budget, 10.0);
        assert_eq!(config.router.max_retries, 3);
        assert_eq!(config.router.health_check_interval_secs, 300);
        assert!(config.router.enable_cost_tracking);
        assert!(config.router.enable_rate_limiting);
        assert!(!config.journal.enabled);
        assert_eq!(config.journal.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.journal.max_file_age_days, 7);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_limit_type_from_str() {
        assert_eq!("hour".parse::<LimitType>().unwrap(), LimitType::Hour);
        assert_eq!("Day".parse::<LimitType>().unwrap(), LimitType::Day);
        assert_eq!("month".parse::<LimitType>().unwrap(), LimitType::Month);
        assert_eq!(
            "unlimited".parse::<LimitType>().unwrap(),
            LimitType::Unlimited
        );
        assert!("weekly".parse::<LimitType>().is_err());
    }

    #[test]
    fn test_limit_type_display() {
        assert_eq!(LimitType::Hour.to_string(), "hour");
        assert_eq!(LimitType::Unlimited.to_string(), "unlimited");
    }

    #[test]
    fn test_parse_byte_size_expr() {
        assert_eq!(parse_byte_size_expr("1024"), Some(1024));
        assert_eq!(parse_byte_size_expr("5 * 1024 * 1024"), Some(5_242_880));
        assert_eq!(parse_byte_size_expr("2*2"), Some(4));
        assert_eq!(parse_byte_size_expr(""), None);
        assert_eq!(parse_byte_size_expr("0"), None);
        assert_eq!(parse_byte_size_expr("5 + 5"), None);
        assert_eq!(parse_byte_size_expr("abc"), None);
        // Overflow is rejected, not wrapped.
        assert_eq!(
            parse_byte_size_expr("18446744073709551615 * 2"),
            None
        );
    }

    #[test]
    fn test_max_file_size_accepts_integer_and_expression() {
        let config: JournalConfig =
            toml::from_str(r#"max_file_size = 2048"#).unwrap();
        assert_eq!(config.max_file_size, 2048);

        let config: JournalConfig =
            toml::from_str(r#"max_file_size = "5 * 1024 * 1024""#).unwrap();
        assert_eq!(config.max_file_size, 5_242_880);

        // Invalid expression falls back to the documented 10 MiB default.
        let config: JournalConfig =
            toml::from_str(r#"max_file_size = "lots""#).unwrap();
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_provider_limits_parse() {
        let config: Config = toml::from_str(
            r#"
[router]
daily_budget = 5.0

[router.provider_limits.openai]
request_limit = 100
limit_type = "day"
cost_per_token = 0.0001
daily_budget_limit = 2.5

[router.provider_limits.ollama]
limit_type = "unlimited"
"#,
        )
        .unwrap();

        let openai = &config.router.provider_limits["openai"];
        assert_eq!(openai.request_limit, 100);
        assert_eq!(openai.limit_type, LimitType::Day);
        assert_eq!(openai.daily_budget_limit, 2.5);

        let ollama = &config.router.provider_limits["ollama"];
        assert_eq!(ollama.request_limit, 0);
        assert_eq!(ollama.limit_type, LimitType::Unlimited);
    }

    #[test]
    fn test_for_document_derives_sibling_path() {
        let config = JournalConfig {
            file_path: PathBuf::from("data/journal.json"),
            ..JournalConfig::default()
        };
        let history = config.for_document("_history");
        assert_eq!(history.file_path, PathBuf::from("data/journal_history.json"));
        assert_eq!(history.rollover_directory, config.rollover_directory);
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let mut config = Config::default();
        config.router.daily_budget = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_max_retries() {
        let mut config = Config::default();
        config.router.max_retries = 0;
        assert!(config.validate().is_err());
        config.router.max_retries = 11;
        assert!(config.validate().is_err());
        config.router.max_retries = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_journal_invariants_only_when_enabled() {
        let mut config = Config::default();
        config.journal.max_file_age_days = 0;
        // Disabled journal: broken invariants are ignored.
        assert!(config.validate().is_ok());

        config.journal.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_limit_values() {
        let mut config = Config::default();
        config.router.provider_limits.insert(
            "openai".to_string(),
            ProviderLimitConfig {
                request_limit: 10,
                limit_type: LimitType::Day,
                cost_per_token: -0.1,
                daily_budget_limit: 1.0,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override_applies() {
        // SAFETY: Tests are run sequentially for env-mutating tests.
        unsafe {
            std::env::set_var("SWITCHBOARD_SERVER_PORT", "9999");
            std::env::set_var("SWITCHBOARD_ROUTER_DAILY_BUDGET", "2.5");
            std::env::set_var("SWITCHBOARD_LOG_LEVEL", "debug");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.router.daily_budget, 2.5);
        assert_eq!(config.logging.level, "debug");

        assert!(config.env_overrides.is_overridden("server.port"));
        assert!(config.env_overrides.is_overridden("router.daily_budget"));
        assert_eq!(
            config.env_overrides.env_var_for("logging.level"),
            Some("SWITCHBOARD_LOG_LEVEL")
        );
        assert!(!config.env_overrides.is_overridden("server.host"));

        unsafe {
            std::env::remove_var("SWITCHBOARD_SERVER_PORT");
            std::env::remove_var("SWITCHBOARD_ROUTER_DAILY_BUDGET");
            std::env::remove_var("SWITCHBOARD_LOG_LEVEL");
        }
    }

    #[test]
    fn test_env_bool_variants() {
        for (val, expected) in [
            ("1", true),
            ("true", true),
            ("yes", true),
            ("on", true),
            ("0", false),
            ("false", false),
            ("off", false),
        ] {
            // SAFETY: Tests are run sequentially for env-mutating tests.
            unsafe {
                std::env::set_var("SWITCHBOARD_JOURNAL_ENABLED", val);
            }
            let mut config = Config::default();
            config.apply_env_overrides();
            assert_eq!(config.journal.enabled, expected, "value was {val}");
        }
        unsafe {
            std::env::remove_var("SWITCHBOARD_JOURNAL_ENABLED");
        }
    }

    #[test]
    fn test_config_load_missing_file() {
        let path = Path::new("/tmp/nonexistent_switchboard_config_test.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.server.port, 8420);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 9000

[router]
daily_budget = 1.5
enable_rate_limiting = false

[journal]
enabled = true
file_path = "/tmp/sb/journal.json"
max_file_size = "1 * 1024"
rollover_directory = "/tmp/sb/rollover"

[providers.openai]
api_key = "sk-test"
model = "gpt-4o"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.router.daily_budget, 1.5);
        assert!(!config.router.enable_rate_limiting);
        assert!(config.journal.enabled);
        assert_eq!(config.journal.max_file_size, 1024);
        let openai = config.providers.openai.unwrap();
        assert_eq!(openai.api_key, "sk-test");
        assert_eq!(openai.model, "gpt-4o");
        assert!(openai.enabled);
        assert_eq!(openai.priority, 1);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_listen_addr() {
        let config = Config::default();
        assert_eq!(config.listen_addr(), "127.0.0.1:8420");
    }
}
