//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `vmdash.toml` in the working directory (or the path in
//! `VMDASH_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use vmdash_app::services::dashboard_controller::DashboardSettings;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which control API implementation to talk to.
    pub backend: Backend,
    /// Remote control API settings.
    pub api: ApiConfig,
    /// Dashboard behaviour.
    pub dashboard: DashboardConfig,
    /// Simulated VM used by the `virtual` backend.
    pub virtual_vm: VirtualVmConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Control API implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The remote HTTP control API.
    #[default]
    Http,
    /// An in-memory simulated VM.
    Virtual,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown backend {other:?} (expected \"http\" or \"virtual\")"
            ))),
        }
    }
}

/// Remote control API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/api/vm/*` paths are appended to.
    pub base_url: String,
    /// Per-request timeout in seconds; `0` waits indefinitely.
    pub timeout_secs: u64,
}

/// Dashboard behaviour.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub poll_interval_secs: u64,
    /// Delay before status is re-polled after a successful command.
    pub reconcile_delay_secs: u64,
    pub currency_symbol: String,
    /// Accept start/stop confirmations without prompting.
    pub assume_yes: bool,
}

/// Simulated VM configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VirtualVmConfig {
    pub vm_name: String,
    pub hourly_cost: f64,
    /// Seconds spent in `starting` / `stopping`.
    pub transition_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `vmdash.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("VMDASH_CONFIG").unwrap_or_else(|_| "vmdash.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("VMDASH_BACKEND") {
            self.backend = val.parse()?;
        }
        if let Some(val) = lookup("VMDASH_API_URL") {
            self.api.base_url = val;
        }
        if let Some(val) = lookup("VMDASH_ASSUME_YES") {
            self.dashboard.assume_yes = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Some(val) = lookup("VMDASH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be non-zero".to_string(),
            ));
        }
        if self.backend == Backend::Http && self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api base_url must be set for the http backend".to_string(),
            ));
        }
        if self.virtual_vm.hourly_cost < 0.0 {
            return Err(ConfigError::Validation(
                "hourly cost must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Controller settings derived from the `[dashboard]` section.
    #[must_use]
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            poll_interval: Duration::from_secs(self.dashboard.poll_interval_secs),
            reconcile_delay: Duration::from_secs(self.dashboard.reconcile_delay_secs),
            currency_symbol: self.dashboard.currency_symbol.clone(),
        }
    }

    /// HTTP client settings derived from the `[api]` section.
    #[must_use]
    pub fn http_config(&self) -> vmdash_adapter_http_reqwest::Config {
        vmdash_adapter_http_reqwest::Config {
            base_url: self.api.base_url.clone(),
            timeout: (self.api.timeout_secs > 0)
                .then(|| Duration::from_secs(self.api.timeout_secs)),
        }
    }

    /// Simulated VM settings derived from the `[virtual_vm]` section.
    #[must_use]
    pub fn virtual_config(&self) -> vmdash_adapter_virtual::Config {
        vmdash_adapter_virtual::Config {
            vm_name: self.virtual_vm.vm_name.clone(),
            hourly_cost: self.virtual_vm.hourly_cost,
            transition: Duration::from_secs(self.virtual_vm.transition_secs),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            reconcile_delay_secs: 3,
            currency_symbol: "€".to_string(),
            assume_yes: false,
        }
    }
}

impl Default for VirtualVmConfig {
    fn default() -> Self {
        Self {
            vm_name: "virtual-vm".to_string(),
            hourly_cost: 0.53,
            transition_secs: 20,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "vmdash=info,vmdash_app=info,vmdash_adapter_http_reqwest=info,vmdash_adapter_virtual=info"
                .to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Http);
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.dashboard.poll_interval_secs, 30);
        assert_eq!(config.dashboard.reconcile_delay_secs, 3);
        assert_eq!(config.dashboard.currency_symbol, "€");
        assert!(!config.dashboard.assume_yes);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.dashboard.poll_interval_secs, 30);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            backend = 'virtual'

            [api]
            base_url = 'https://vm.example.com'
            timeout_secs = 5

            [dashboard]
            poll_interval_secs = 10
            reconcile_delay_secs = 1
            currency_symbol = '$'
            assume_yes = true

            [virtual_vm]
            vm_name = 'demo'
            hourly_cost = 1.25
            transition_secs = 2

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.backend, Backend::Virtual);
        assert_eq!(config.api.base_url, "https://vm.example.com");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.dashboard.poll_interval_secs, 10);
        assert_eq!(config.dashboard.currency_symbol, "$");
        assert!(config.dashboard.assume_yes);
        assert_eq!(config.virtual_vm.vm_name, "demo");
        assert_eq!(config.virtual_vm.transition_secs, 2);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [dashboard]
            poll_interval_secs = 60
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.dashboard.poll_interval_secs, 60);
        assert_eq!(config.dashboard.reconcile_delay_secs, 3);
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.backend, Backend::Http);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_environment_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("VMDASH_BACKEND", "Virtual"),
                ("VMDASH_API_URL", "http://10.0.0.5:8080"),
                ("VMDASH_ASSUME_YES", "1"),
                ("VMDASH_LOG", "vmdash=debug"),
            ]))
            .unwrap();
        assert_eq!(config.backend, Backend::Virtual);
        assert_eq!(config.api.base_url, "http://10.0.0.5:8080");
        assert!(config.dashboard.assume_yes);
        assert_eq!(config.logging.filter, "vmdash=debug");
    }

    #[test]
    fn should_prefer_rust_log_over_vmdash_log() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("VMDASH_LOG", "info"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_reject_unknown_backend_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("VMDASH_BACKEND", "azure")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_poll_interval() {
        let mut config = Config::default();
        config.dashboard.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_base_url_for_http_backend() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        config.backend = Backend::Virtual;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_disable_timeout_when_zero() {
        let mut config = Config::default();
        assert_eq!(config.http_config().timeout, Some(Duration::from_secs(30)));

        config.api.timeout_secs = 0;
        assert_eq!(config.http_config().timeout, None);
    }

    #[test]
    fn should_convert_dashboard_settings() {
        let settings = Config::default().dashboard_settings();
        assert_eq!(settings.poll_interval, Duration::from_secs(30));
        assert_eq!(settings.reconcile_delay, Duration::from_secs(3));
        assert_eq!(settings.currency_symbol, "€");
    }
}
