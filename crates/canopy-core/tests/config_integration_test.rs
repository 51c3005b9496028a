//! Integration tests for layered configuration
//!
//! Loading follows the precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use canopy_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 6] = [
    "CANOPY_DEFAULT_PROVIDER",
    "CANOPY_SEED",
    "CANOPY_BASELINE_WINDOW_DAYS",
    "CANOPY_MODERATE_URL",
    "CANOPY_MODERATE_TOKEN",
    "CANOPY_SUBQUERY_TIMEOUT_SECS",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_default_configuration() {
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.default_provider.value, "simulated");
    assert_eq!(config.default_provider.source, ConfigSource::Default);
    assert_eq!(config.climate_zone.value, "auto");
    assert_eq!(config.max_retries.value, 3);
    assert_eq!(config.moderate.dataset.value, "oli-tirs-c2-l2");
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
seed = 1234
# Everything else stays at defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.seed.value, Some(1234));
    assert_eq!(config.seed.source, ConfigSource::File);
    assert_eq!(config.default_provider.source, ConfigSource::Default);
    assert_eq!(config.baseline_window_days.value, 30);
}

#[test]
fn test_invalid_toml_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "seed = \"not a number\"").unwrap();

    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("canopy.toml");

    assert!(LayeredConfig::with_defaults().load_from_file(&missing).is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("CANOPY_DEFAULT_PROVIDER", "moderate");
    env::set_var("CANOPY_SEED", "99");
    env::set_var("CANOPY_MODERATE_URL", "https://landsat.example.org");
    env::set_var("CANOPY_MODERATE_TOKEN", "token-from-env");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
default_provider = "highres"
seed = 1

[moderate]
url = "https://file.example.org"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.default_provider.value, "moderate");
    assert_eq!(config.default_provider.source, ConfigSource::Environment);
    assert_eq!(config.seed.value, Some(99));
    assert_eq!(config.moderate.url.value.as_deref(), Some("https://landsat.example.org"));
    assert!(config.moderate.has_credentials());

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("CANOPY_SEED", "forty-two");
    env::set_var("CANOPY_BASELINE_WINDOW_DAYS", "0");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.seed.value, None);
    assert_eq!(config.seed.source, ConfigSource::Default);
    assert_eq!(config.baseline_window_days.value, 30);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("CANOPY_SUBQUERY_TIMEOUT_SECS", "15");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "subquery_timeout_secs = 5").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.subquery_timeout_secs.value, 15);
    assert_eq!(config.subquery_timeout_secs.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        subquery_timeout_secs: Some(60),
        ..Default::default()
    });

    assert_eq!(config.subquery_timeout_secs.value, 60);
    assert_eq!(config.subquery_timeout_secs.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "climate_zone = \"boreal\"").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
    let inspection_map = config.to_inspection_map();

    let (zone, zone_source) = &inspection_map["climate_zone"];
    assert_eq!(zone, "boreal");
    assert_eq!(*zone_source, ConfigSource::File);

    let (provider, provider_source) = &inspection_map["default_provider"];
    assert_eq!(provider, "simulated");
    assert_eq!(*provider_source, ConfigSource::Default);
}
