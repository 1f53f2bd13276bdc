//! Service configuration.
//!
//! Read from a TOML file (default `./helmet_monitor.toml`, override with
//! `HELMET_CONFIG`), then adjusted by environment variables, which may come
//! from a `.env` file. Every key is optional; a missing file means defaults.
//!
//! ```toml
//! poll_interval_secs = 10
//! history_window = 24
//! supervisor_name = "John Supervisor"
//!
//! [logging]
//! level = "info"
//! file = "helmet_monitor.log"
//! ```

use serde::Deserialize;
use std::time::Duration;

use crate::logging::LogLevel;
use crate::model::HelmetError;

pub const DEFAULT_CONFIG_PATH: &str = "./helmet_monitor.toml";
pub const DEFAULT_SESSION_PATH: &str = "./.helmet_session.json";
/// Seed the CLI falls back to, so event ids name the same events across runs.
pub const DEFAULT_CLI_SEED: u64 = 2024;

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between vitals polls for the watched worker.
    pub poll_interval_secs: u64,
    /// Samples in a worker's vital history (one per hour).
    pub history_window: usize,
    /// Rows per event-history page.
    pub page_size: usize,
    /// Events shown on a worker profile.
    pub recent_events: usize,
    /// Events the simulated store starts with.
    pub seed_event_count: usize,
    /// A helmet silent for longer than this is flagged stale.
    pub stale_after_secs: u64,
    /// Artificial delay added to every simulated accessor call.
    pub simulated_latency_ms: u64,
    /// Fixes the simulated feed's randomness when set.
    pub seed: Option<u64>,
    /// Acting supervisor recorded on resolutions when no one is logged in.
    pub supervisor_name: String,
    /// Where the login session is persisted between runs; `None` keeps it
    /// in memory only.
    pub session_file: Option<String>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval_secs: 10,
            history_window: 24,
            page_size: 10,
            recent_events: 5,
            seed_event_count: 20,
            stale_after_secs: 60,
            simulated_latency_ms: 0,
            seed: None,
            supervisor_name: "John Supervisor".to_string(),
            session_file: Some(DEFAULT_SESSION_PATH.to_string()),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn log_level(&self) -> Result<LogLevel, HelmetError> {
        LogLevel::parse(&self.logging.level)
            .ok_or_else(|| HelmetError::Config(format!("unknown log level '{}'", self.logging.level)))
    }

    /// This config with `seed` pinned to `DEFAULT_CLI_SEED` when unset.
    pub fn with_stable_seed(&self) -> MonitorConfig {
        MonitorConfig {
            seed: Some(self.seed.unwrap_or(DEFAULT_CLI_SEED)),
            ..self.clone()
        }
    }

    fn validate(self) -> Result<Self, HelmetError> {
        if self.poll_interval_secs == 0 {
            return Err(HelmetError::Config("poll_interval_secs must be positive".to_string()));
        }
        if self.page_size == 0 {
            return Err(HelmetError::Config("page_size must be positive".to_string()));
        }
        if self.history_window == 0 {
            return Err(HelmetError::Config("history_window must be positive".to_string()));
        }
        self.log_level()?;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses configuration text. Unknown keys are ignored.
pub fn parse_config(text: &str) -> Result<MonitorConfig, HelmetError> {
    let config: MonitorConfig =
        toml::from_str(text).map_err(|e| HelmetError::Config(format!("TOML parse error: {}", e)))?;
    config.validate()
}

/// Loads configuration from `path`; a missing file yields defaults.
pub fn load_config(path: &str) -> Result<MonitorConfig, HelmetError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_config(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(MonitorConfig::default()),
        Err(e) => Err(HelmetError::Config(format!("reading {}: {}", path, e))),
    }
}

/// Applies environment overrides through `lookup` (normally `env::var`).
///
/// Recognised: `HELMET_POLL_INTERVAL_SECS`, `HELMET_LOG_LEVEL`,
/// `HELMET_LOG_FILE`, `HELMET_SEED`.
pub fn apply_overrides<F>(mut config: MonitorConfig, lookup: F) -> Result<MonitorConfig, HelmetError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("HELMET_POLL_INTERVAL_SECS") {
        config.poll_interval_secs = value.trim().parse().map_err(|_| {
            HelmetError::Config(format!("HELMET_POLL_INTERVAL_SECS is not a number: '{}'", value))
        })?;
    }
    if let Some(value) = lookup("HELMET_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Some(value) = lookup("HELMET_LOG_FILE") {
        config.logging.file = Some(value);
    }
    if let Some(value) = lookup("HELMET_SEED") {
        config.seed = Some(value.trim().parse().map_err(|_| {
            HelmetError::Config(format!("HELMET_SEED is not a number: '{}'", value))
        })?);
    }
    config.validate()
}

/// Full start-up load: `.env`, config file, environment overrides.
pub fn load() -> Result<MonitorConfig, HelmetError> {
    dotenv::dotenv().ok();
    let path = std::env::var("HELMET_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path)?;
    apply_overrides(config, |key| std::env::var(key).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("").expect("empty config should parse");
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse_config(
            r#"
            poll_interval_secs = 5
            supervisor_name = "Dana Shift Lead"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.supervisor_name, "Dana Shift Lead");
        assert_eq!(config.log_level().unwrap(), LogLevel::Debug);
        assert_eq!(config.history_window, 24);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = parse_config("poll_interval_secs = 0").unwrap_err();
        assert!(matches!(err, HelmetError::Config(_)));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        assert!(parse_config("[logging]\nlevel = \"chatty\"").is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = parse_config("poll_interval_secs = [").unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config("./does-not-exist/helmet_monitor.toml").unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("HELMET_POLL_INTERVAL_SECS", "3"),
            ("HELMET_LOG_LEVEL", "warn"),
            ("HELMET_SEED", "99"),
        ]
        .into_iter()
        .collect();
        let config = apply_overrides(MonitorConfig::default(), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.log_level().unwrap(), LogLevel::Warning);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_non_numeric_override_rejected() {
        let result = apply_overrides(MonitorConfig::default(), |k| {
            (k == "HELMET_POLL_INTERVAL_SECS").then(|| "ten".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_stable_seed_fills_only_unset_seed() {
        assert_eq!(MonitorConfig::default().with_stable_seed().seed, Some(DEFAULT_CLI_SEED));

        let pinned = MonitorConfig {
            seed: Some(99),
            ..MonitorConfig::default()
        };
        assert_eq!(pinned.with_stable_seed().seed, Some(99));
    }
}
