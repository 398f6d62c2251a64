//! Configuration system tests
//!
//! Defaults, file formats, environment layering and validation

use std::collections::HashMap;
use std::path::PathBuf;

use souqdash::config::loader::*;
use souqdash::config::validation::*;
use souqdash::config::*;
use souqdash::{DeliveryStatus, Result, TableKind};
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = DashboardConfig::default();

    assert_eq!(config.data.base_dirs, vec![PathBuf::from("data"), PathBuf::from(".")]);
    assert_eq!(
        config.data.files.candidates(TableKind::Fulfillment),
        &["fulfillment.csv".to_string(), "fullfillment.csv".to_string()]
    );
    assert!(config.data.is_quote_wrapped(TableKind::OrderItems));
    assert!(!config.data.is_quote_wrapped(TableKind::Orders));
    assert_eq!(config.filters.all_sentinel, "All");
    assert_eq!(config.vocabulary.no_delay, "No Delay");
    assert_eq!(config.display.currency, "AED");
    assert_eq!(config.logging.level, "info");

    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_config_serialization() -> Result<()> {
    let config = DashboardConfig::default();

    let yaml = config.to_yaml()?;
    assert!(yaml.contains("data:"));
    assert!(yaml.contains("vocabulary:"));
    assert_eq!(DashboardConfig::from_yaml(&yaml)?, config);

    let toml = config.to_toml()?;
    assert!(toml.contains("[data"));
    assert!(toml.contains("[schema."));
    assert_eq!(DashboardConfig::from_toml(&toml)?, config);

    Ok(())
}

#[test]
fn test_partial_yaml_keeps_defaults() -> Result<()> {
    let config = DashboardConfig::from_yaml(
        "vocabulary:\n  on_time: [\"Delivered\"]\nfilters:\n  all_sentinel: \"Any\"\n",
    )?;

    assert_eq!(config.vocabulary.on_time, vec!["Delivered".to_string()]);
    assert_eq!(config.vocabulary.classify("Delivered"), DeliveryStatus::OnTime);
    assert_eq!(
        config.vocabulary.classify("On Time"),
        DeliveryStatus::Other("On Time".to_string())
    );
    assert_eq!(config.filters.all_sentinel, "Any");
    assert_eq!(config.data, DataConfig::default());

    Ok(())
}

#[test]
fn test_config_validation() {
    let mut config = DashboardConfig::default();
    assert!(validate_config(&config).is_ok());

    // No directories to search
    config.data.base_dirs.clear();
    assert!(validate_config(&config).is_err());
    config.data.base_dirs = vec![PathBuf::from("data")];

    // A label may not mean two outcomes
    config.vocabulary.delayed.push("Delivered".to_string());
    assert!(validate_config(&config).is_err());
    config.vocabulary = StatusVocabulary::default();

    // Join keys must stay required
    config.schema.orders.required.retain(|c| c != "order_id");
    assert!(validate_config(&config).is_err());
    config.schema = SchemaConfig::default();

    config.display.top_delay_reasons = 0;
    assert!(validate_config(&config).is_err());
    config.display = DisplayConfig::default();

    config.logging.level = "loud".to_string();
    assert!(validate_config(&config).is_err());
    config.logging.level = "souqdash=debug".to_string();
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_environment_config_loading() -> Result<()> {
    let vars: HashMap<&str, &str> = [
        ("SOUQDASH_ALL_SENTINEL", "Everything"),
        ("SOUQDASH_NO_DELAY_LABEL", "On schedule"),
        ("SOUQDASH_CURRENCY", "USD"),
        ("SOUQDASH_LOG_LEVEL", "debug"),
    ]
    .into_iter()
    .collect();

    let config = load_from_vars(|key| vars.get(key).map(|v| v.to_string()))?;

    assert_eq!(config.filters.all_sentinel, "Everything");
    assert_eq!(config.vocabulary.no_delay, "On schedule");
    assert_eq!(config.display.currency, "USD");
    assert_eq!(config.logging.level, "debug");

    Ok(())
}

#[test]
fn test_data_dir_variable_is_a_path_list() -> Result<()> {
    let joined = std::env::join_paths(["/srv/a", "/srv/b"])
        .map_err(|e| souqdash::Error::InvalidInput(e.to_string()))?
        .into_string()
        .map_err(|_| souqdash::Error::InvalidInput("non-utf8 path".to_string()))?;

    let config = load_from_vars(|key| (key == "SOUQDASH_DATA_DIR").then(|| joined.clone()))?;
    assert_eq!(
        config.data.base_dirs,
        vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")]
    );

    Ok(())
}

#[test]
fn test_config_file_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let mut config = DashboardConfig::default();
    config.data.base_dirs = vec![PathBuf::from("/var/lib/souqdash")];
    config.display.currency = "SAR".to_string();

    for name in ["config.yaml", "config.toml"] {
        let path = dir.path().join(name);
        save_to_file(&config, &path)?;
        assert_eq!(load_from_file(&path)?, config);
    }

    Ok(())
}

#[test]
fn test_explicit_file_takes_precedence_over_defaults() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("souqdash.yaml");
    std::fs::write(&path, "display:\n  currency: EUR\n  top_delay_reasons: 5\n")?;

    let config = load_with_precedence(Some(&path))?;
    assert_eq!(config.display.top_delay_reasons, 5);
    assert_eq!(config.data, DataConfig::default());

    Ok(())
}

#[test]
fn test_unsupported_extension() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.ini");
    std::fs::write(&path, "[data]\n")?;

    assert!(load_from_file(&path).is_err());

    Ok(())
}

#[test]
fn test_merge_only_overrides_what_was_set() {
    let mut base = DashboardConfig::default();
    base.data.base_dirs = vec![PathBuf::from("/data")];

    let mut layer = DashboardConfig::default();
    layer.logging.level = "warn".to_string();

    base.merge(&layer);
    assert_eq!(base.data.base_dirs, vec![PathBuf::from("/data")]);
    assert_eq!(base.logging.level, "warn");
}

#[test]
fn test_missing_file_names_the_path() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("absent.yaml");

    let err = load_from_file(&path).err().expect("missing file is an error");
    assert!(err.to_string().contains("absent.yaml"));

    Ok(())
}
