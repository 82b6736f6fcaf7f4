use toastlab_alerts::ScanConfig;
use toastlab_push::WebPushSettings;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Push delivery configuration.
    pub push: PushConfig,
    /// Inventory scanner configuration.
    pub scanner: ScannerConfig,
}

/// Push gateway and envelope configuration.
///
/// | Env Var               | Default                            |
/// |-----------------------|------------------------------------|
/// | `PUSH_GATEWAY_URL`    | unset (delivery channel disabled)  |
/// | `PUSH_GATEWAY_KEY`    | unset                              |
/// | `PUSH_TOPIC_RESTRICT` | `true`                             |
/// | `PUSH_SEED_TEMPLATES` | `true`                             |
/// | `PUSH_TTL_SECS`       | `3600`                             |
/// | `PUSH_URGENCY`        | `high`                             |
/// | `PUSH_ICON`           | `/admin/images/push/toastlab.png`  |
/// | `PUSH_BADGE`          | `/admin/images/push/badge-72.png`  |
/// | `PUSH_DEFAULT_LINK`   | `/admin`                           |
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Base URL of the external push gateway. When unset the dispatcher
    /// runs with no delivery channel and every send fails fast.
    pub gateway_url: Option<String>,
    /// Bearer key for the gateway.
    pub gateway_key: Option<String>,
    /// Restrict topics to the fixed HQ allow-list.
    pub topic_restrict: bool,
    /// Upsert the default alert templates at startup.
    pub seed_templates: bool,
    /// Web-push envelope defaults (TTL, urgency, icon, badge, deep link).
    pub webpush: WebPushSettings,
}

/// Inventory scanner configuration.
///
/// | Env Var                | Default |
/// |------------------------|---------|
/// | `SCANNER_ENABLED`      | `false` |
/// | `SCAN_INTERVAL_SECS`   | `1800`  |
/// | `STOCK_LOW_MAX`        | `50`    |
/// | `EXPIRE_SOON_MAX`      | `50`    |
/// | `EXPIRE_SOON_DAYS`     | `3`     |
/// | `SUPPRESSION_TTL_SECS` | `1800`  |
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Spawn the periodic scan loop.
    pub enabled: bool,
    /// Scan cadence in seconds.
    pub interval_secs: u64,
    pub stock_low_max: usize,
    pub expire_soon_max: usize,
    pub expire_soon_days: i64,
    pub suppression_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = parse_env("PORT", "3000");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", "30");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            push: PushConfig::from_env(),
            scanner: ScannerConfig::from_env(),
        }
    }
}

impl PushConfig {
    pub fn from_env() -> Self {
        let webpush = WebPushSettings {
            ttl_secs: parse_env("PUSH_TTL_SECS", "3600"),
            urgency: env_or("PUSH_URGENCY", "high"),
            icon: env_or("PUSH_ICON", "/admin/images/push/toastlab.png"),
            badge: env_or("PUSH_BADGE", "/admin/images/push/badge-72.png"),
            default_link: env_or("PUSH_DEFAULT_LINK", "/admin"),
        };

        Self {
            gateway_url: std::env::var("PUSH_GATEWAY_URL").ok().filter(|s| !s.is_empty()),
            gateway_key: std::env::var("PUSH_GATEWAY_KEY").ok().filter(|s| !s.is_empty()),
            topic_restrict: parse_env("PUSH_TOPIC_RESTRICT", "true"),
            seed_templates: parse_env("PUSH_SEED_TEMPLATES", "true"),
            webpush,
        }
    }
}

impl ScannerConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: parse_env("SCANNER_ENABLED", "false"),
            interval_secs: parse_env("SCAN_INTERVAL_SECS", "1800"),
            stock_low_max: parse_env("STOCK_LOW_MAX", "50"),
            expire_soon_max: parse_env("EXPIRE_SOON_MAX", "50"),
            expire_soon_days: parse_env("EXPIRE_SOON_DAYS", "3"),
            suppression_ttl_secs: parse_env("SUPPRESSION_TTL_SECS", "1800"),
        }
    }

    /// The orchestrator's view of this configuration.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            stock_low_max: self.stock_low_max,
            expire_soon_max: self.expire_soon_max,
            expire_soon_days: self.expire_soon_days,
            suppression_ttl: std::time::Duration::from_secs(self.suppression_ttl_secs),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(name: &str, default: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = env_or(name, default);
    value
        .parse()
        .unwrap_or_else(|e| panic!("{name} must be a valid value: {e}"))
}
