use std::str::FromStr;
use std::time::Duration;

/// Server configuration
///
/// # Environment variables
///
/// Every field can be set from the environment (a `.env` file is loaded first):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | DATABASE_PATH | juicery.db | SQLite database file |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | tracing filter directive |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | daily rolling log files in this directory |
/// | PALLET_CAPACITY | 40 | default crates per new pallet |
/// | SHELF_CAPACITY | 6 | default pallets per new shelf |
/// | POUCHES_PER_KG | 0.2 | pouch yield used when intake records weight only |
/// | MAX_ORDER_POUCHES | 4000 | largest pouch total accepted at intake |
/// | PRINTER_HOST | (unset) | label printer host |
/// | PRINTER_PORT | 3100 | label printer TCP port |
/// | PRINTER_CONNECT_TIMEOUT_MS | 3000 | connect timeout |
/// | PRINTER_ACK_TIMEOUT_MS | 1000 | wait for a reply after each command |
/// | PRINTER_JOB | 1 | stored label job selected before printing |
/// | SMS_ENABLED | false | send SMS through AWS SNS (log only otherwise) |
/// | SMS_NOTIFY_ON_READY | false | text the customer on every `orderReady` |
/// | SMS_SENDER_ID | (unset) | alphanumeric SNS sender id |
/// | EVENT_CHANNEL_CAPACITY | 1024 | broadcast buffer per subscriber |
///
/// # Example
///
/// ```ignore
/// DATABASE_PATH=/var/lib/juicery/juicery.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_path: String,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,

    // === Inventory ===
    pub pallet_capacity: i64,
    pub shelf_capacity: i64,
    pub pouches_per_kg: f64,
    pub max_order_pouches: i64,

    // === Label printer ===
    pub printer_host: Option<String>,
    pub printer_port: u16,
    pub printer_connect_timeout_ms: u64,
    pub printer_ack_timeout_ms: u64,
    pub printer_job: String,

    // === SMS ===
    pub sms_enabled: bool,
    pub sms_notify_on_ready: bool,
    pub sms_sender_id: Option<String>,

    pub event_channel_capacity: usize,
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT", 3000),
            database_path: env_opt("DATABASE_PATH").unwrap_or_else(|| "juicery.db".into()),
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: env_opt("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: env_opt("LOG_DIR"),

            pallet_capacity: env_parse("PALLET_CAPACITY", 40),
            shelf_capacity: env_parse("SHELF_CAPACITY", 6),
            pouches_per_kg: env_parse("POUCHES_PER_KG", 0.2),
            max_order_pouches: env_parse(
                "MAX_ORDER_POUCHES",
                crate::workflow::intake::DEFAULT_MAX_ORDER_POUCHES,
            ),

            printer_host: env_opt("PRINTER_HOST"),
            printer_port: env_parse("PRINTER_PORT", 3100),
            printer_connect_timeout_ms: env_parse("PRINTER_CONNECT_TIMEOUT_MS", 3000),
            printer_ack_timeout_ms: env_parse("PRINTER_ACK_TIMEOUT_MS", 1000),
            printer_job: env_opt("PRINTER_JOB").unwrap_or_else(|| "1".into()),

            sms_enabled: env_parse("SMS_ENABLED", false),
            sms_notify_on_ready: env_parse("SMS_NOTIFY_ON_READY", false),
            sms_sender_id: env_opt("SMS_SENDER_ID"),

            event_channel_capacity: env_parse("EVENT_CHANNEL_CAPACITY", 1024),
        }
    }

    /// Override the database location and port
    ///
    /// Used by tests
    pub fn with_overrides(database_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn printer_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_connect_timeout_ms)
    }

    pub fn printer_ack_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_ack_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/test.db", 18080);
        assert_eq!(config.database_path, "/tmp/test.db");
        assert_eq!(config.http_port, 18080);
        assert!(config.pallet_capacity > 0);
        assert!(config.event_channel_capacity > 0);
    }

    #[test]
    fn test_timeouts() {
        let mut config = Config::default();
        config.printer_ack_timeout_ms = 250;
        assert_eq!(config.printer_ack_timeout(), Duration::from_millis(250));
    }
}
