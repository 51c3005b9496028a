use crate::error::{CanopyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Connection settings for one live imagery catalog
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub url: ConfigValue<Option<String>>,
    pub dataset: ConfigValue<String>,
    pub username: ConfigValue<Option<String>>,
    pub password: ConfigValue<Option<String>>,
    pub token: ConfigValue<Option<String>>,
}

impl CatalogConfig {
    fn with_defaults(dataset: &str) -> Self {
        Self {
            url: ConfigValue::new(None, ConfigSource::Default),
            dataset: ConfigValue::new(dataset.to_string(), ConfigSource::Default),
            username: ConfigValue::new(None, ConfigSource::Default),
            password: ConfigValue::new(None, ConfigSource::Default),
            token: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Whether enough is configured to attempt a live query
    pub fn has_credentials(&self) -> bool {
        let basic = self.username.value.is_some() && self.password.value.is_some();
        self.url.value.is_some() && (basic || self.token.value.is_some())
    }

    fn apply_file(&mut self, section: FileCatalogSection) {
        if let Some(url) = section.url {
            self.url.update(Some(url), ConfigSource::File);
        }
        if let Some(dataset) = section.dataset {
            self.dataset.update(dataset, ConfigSource::File);
        }
        if let Some(username) = section.username {
            self.username.update(Some(username), ConfigSource::File);
        }
        if let Some(password) = section.password {
            self.password.update(Some(password), ConfigSource::File);
        }
        if let Some(token) = section.token {
            self.token.update(Some(token), ConfigSource::File);
        }
    }

    fn apply_env(&mut self, prefix: &str) {
        if let Ok(url) = env::var(format!("{prefix}_URL")) {
            self.url.update(Some(url), ConfigSource::Environment);
        }
        if let Ok(dataset) = env::var(format!("{prefix}_DATASET")) {
            self.dataset.update(dataset, ConfigSource::Environment);
        }
        if let Ok(username) = env::var(format!("{prefix}_USERNAME")) {
            self.username.update(Some(username), ConfigSource::Environment);
        }
        if let Ok(password) = env::var(format!("{prefix}_PASSWORD")) {
            self.password.update(Some(password), ConfigSource::Environment);
        }
        if let Ok(token) = env::var(format!("{prefix}_TOKEN")) {
            self.token.update(Some(token), ConfigSource::Environment);
        }
    }

    fn inspect(&self, name: &str, map: &mut HashMap<String, (String, ConfigSource)>) {
        map.insert(
            format!("{name}.url"),
            (self.url.value.clone().unwrap_or_else(|| "(unset)".to_string()), self.url.source),
        );
        map.insert(format!("{name}.dataset"), (self.dataset.value.clone(), self.dataset.source));
        map.insert(
            format!("{name}.username"),
            (
                self.username.value.clone().unwrap_or_else(|| "(unset)".to_string()),
                self.username.source,
            ),
        );
        map.insert(format!("{name}.password"), (mask(&self.password.value), self.password.source));
        map.insert(format!("{name}.token"), (mask(&self.token.value), self.token.source));
    }
}

fn mask(secret: &Option<String>) -> String {
    match secret {
        Some(_) => "********".to_string(),
        None => "(unset)".to_string(),
    }
}

/// Layered configuration for Canopy
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub default_provider: ConfigValue<String>,
    /// Seed for synthetic data; entropy when unset
    pub seed: ConfigValue<Option<u64>>,
    /// Per sub-query timeout in seconds; 0 disables the timeout
    pub subquery_timeout_secs: ConfigValue<u64>,
    pub baseline_window_days: ConfigValue<i64>,
    /// Climate zone name, or `auto` to infer from latitude
    pub climate_zone: ConfigValue<String>,
    pub request_timeout_secs: ConfigValue<u64>,
    pub max_retries: ConfigValue<u32>,
    pub highres: CatalogConfig,
    pub moderate: CatalogConfig,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            default_provider: ConfigValue::new("simulated".to_string(), ConfigSource::Default),
            seed: ConfigValue::new(None, ConfigSource::Default),
            subquery_timeout_secs: ConfigValue::new(120, ConfigSource::Default),
            baseline_window_days: ConfigValue::new(30, ConfigSource::Default),
            climate_zone: ConfigValue::new("auto".to_string(), ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(30, ConfigSource::Default),
            max_retries: ConfigValue::new(3, ConfigSource::Default),
            highres: CatalogConfig::with_defaults("msi-l2a"),
            moderate: CatalogConfig::with_defaults("oli-tirs-c2-l2"),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| CanopyError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| CanopyError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(provider) = file_config.default_provider {
            self.default_provider.update(provider, ConfigSource::File);
        }

        if let Some(seed) = file_config.seed {
            self.seed.update(Some(seed), ConfigSource::File);
        }

        if let Some(timeout) = file_config.subquery_timeout_secs {
            self.subquery_timeout_secs.update(timeout, ConfigSource::File);
        }

        if let Some(days) = file_config.baseline_window_days {
            validate_window_days(days)?;
            self.baseline_window_days.update(days, ConfigSource::File);
        }

        if let Some(zone) = file_config.climate_zone {
            self.climate_zone.update(zone, ConfigSource::File);
        }

        if let Some(timeout) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(timeout, ConfigSource::File);
        }

        if let Some(retries) = file_config.max_retries {
            self.max_retries.update(retries, ConfigSource::File);
        }

        if let Some(section) = file_config.highres {
            self.highres.apply_file(section);
        }

        if let Some(section) = file_config.moderate {
            self.moderate.apply_file(section);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // CANOPY_DEFAULT_PROVIDER
        if let Ok(provider) = env::var("CANOPY_DEFAULT_PROVIDER") {
            self.default_provider.update(provider, ConfigSource::Environment);
        }

        // CANOPY_SEED
        if let Ok(seed_str) = env::var("CANOPY_SEED") {
            match seed_str.parse::<u64>() {
                Ok(seed) => self.seed.update(Some(seed), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CANOPY_SEED value '{}': expected unsigned integer",
                    seed_str
                ),
            }
        }

        // CANOPY_SUBQUERY_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("CANOPY_SUBQUERY_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => {
                    self.subquery_timeout_secs.update(timeout, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid CANOPY_SUBQUERY_TIMEOUT_SECS value '{}': expected seconds",
                    timeout_str
                ),
            }
        }

        // CANOPY_BASELINE_WINDOW_DAYS
        if let Ok(days_str) = env::var("CANOPY_BASELINE_WINDOW_DAYS") {
            match parse_window_days(&days_str) {
                Ok(days) => self.baseline_window_days.update(days, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CANOPY_BASELINE_WINDOW_DAYS value '{}': expected 1-365",
                    days_str
                ),
            }
        }

        // CANOPY_CLIMATE_ZONE
        if let Ok(zone) = env::var("CANOPY_CLIMATE_ZONE") {
            self.climate_zone.update(zone, ConfigSource::Environment);
        }

        // CANOPY_REQUEST_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("CANOPY_REQUEST_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.request_timeout_secs.update(timeout, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CANOPY_REQUEST_TIMEOUT_SECS value '{}': expected seconds",
                    timeout_str
                ),
            }
        }

        // CANOPY_MAX_RETRIES
        if let Ok(retries_str) = env::var("CANOPY_MAX_RETRIES") {
            match retries_str.parse::<u32>() {
                Ok(retries) => self.max_retries.update(retries, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CANOPY_MAX_RETRIES value '{}': expected integer",
                    retries_str
                ),
            }
        }

        self.highres.apply_env("CANOPY_HIGHRES");
        self.moderate.apply_env("CANOPY_MODERATE");

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(provider) = overrides.default_provider {
            self.default_provider.update(provider, ConfigSource::Cli);
        }

        if let Some(seed) = overrides.seed {
            self.seed.update(Some(seed), ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.subquery_timeout_secs {
            self.subquery_timeout_secs.update(timeout, ConfigSource::Cli);
        }

        if let Some(zone) = overrides.climate_zone {
            self.climate_zone.update(zone, ConfigSource::Cli);
        }
    }

    /// Sub-query timeout, `None` when disabled
    pub fn subquery_timeout(&self) -> Option<Duration> {
        match self.subquery_timeout_secs.value {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value.max(1))
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "default_provider".to_string(),
            (self.default_provider.value.clone(), self.default_provider.source),
        );

        map.insert(
            "seed".to_string(),
            (
                self.seed.value.map(|s| s.to_string()).unwrap_or_else(|| "entropy".to_string()),
                self.seed.source,
            ),
        );

        map.insert(
            "subquery_timeout_secs".to_string(),
            (self.subquery_timeout_secs.value.to_string(), self.subquery_timeout_secs.source),
        );

        map.insert(
            "baseline_window_days".to_string(),
            (self.baseline_window_days.value.to_string(), self.baseline_window_days.source),
        );

        map.insert(
            "climate_zone".to_string(),
            (self.climate_zone.value.clone(), self.climate_zone.source),
        );

        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );

        map.insert(
            "max_retries".to_string(),
            (self.max_retries.value.to_string(), self.max_retries.source),
        );

        self.highres.inspect("highres", &mut map);
        self.moderate.inspect("moderate", &mut map);

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    default_provider: Option<String>,
    seed: Option<u64>,
    subquery_timeout_secs: Option<u64>,
    baseline_window_days: Option<i64>,
    climate_zone: Option<String>,
    request_timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    highres: Option<FileCatalogSection>,
    moderate: Option<FileCatalogSection>,
}

#[derive(Debug, Deserialize, Serialize)]
struct FileCatalogSection {
    url: Option<String>,
    dataset: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub default_provider: Option<String>,
    pub seed: Option<u64>,
    pub subquery_timeout_secs: Option<u64>,
    pub climate_zone: Option<String>,
}

/// Parse a baseline/current window length in days
pub fn parse_window_days(s: &str) -> Result<i64> {
    let days = s.trim().parse::<i64>().map_err(|_| CanopyError::ConfigInvalid {
        key: "baseline_window_days".to_string(),
        reason: format!("Invalid number of days: {}", s),
    })?;
    validate_window_days(days)?;
    Ok(days)
}

fn validate_window_days(days: i64) -> Result<()> {
    if !(1..=365).contains(&days) {
        return Err(CanopyError::ConfigInvalid {
            key: "baseline_window_days".to_string(),
            reason: format!("{} is outside 1-365", days),
        });
    }
    Ok(())
}
