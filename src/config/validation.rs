//! Configuration validation utilities
//!
//! Checks that every table can be located and parsed with the configured
//! schema, and that the status vocabulary is unambiguous.

use super::*;
use crate::core::error::{Error, Result};
use crate::core::records::TableKind;
use std::collections::HashSet;

/// Key columns the join cannot work without
const KEY_COLUMNS: [(TableKind, &[&str]); 5] = [
    (TableKind::Customers, &["customer_id"]),
    (TableKind::Orders, &["order_id", "customer_id", "order_date"]),
    (TableKind::OrderItems, &["order_id"]),
    (TableKind::Fulfillment, &["order_id"]),
    (TableKind::Returns, &["order_id"]),
];

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validate the entire configuration
pub fn validate_config(config: &DashboardConfig) -> Result<()> {
    validate_data_config(&config.data)?;
    validate_vocabulary(&config.vocabulary)?;
    validate_schema_config(&config.schema)?;
    validate_filter_config(&config.filters)?;
    validate_display_config(&config.display)?;
    validate_logging_config(&config.logging)?;

    Ok(())
}

/// Validate input locations
pub fn validate_data_config(config: &DataConfig) -> Result<()> {
    if config.base_dirs.is_empty() {
        return Err(Error::ConfigurationError(
            "At least one base directory is required".to_string(),
        ));
    }

    for table in TableKind::ALL {
        let candidates = config.files.candidates(table);
        if candidates.is_empty() {
            return Err(Error::ConfigurationError(format!(
                "No candidate file names configured for table '{}'",
                table
            )));
        }

        if candidates.iter().any(|name| name.trim().is_empty()) {
            return Err(Error::ConfigurationError(format!(
                "Empty file name configured for table '{}'",
                table
            )));
        }
    }

    Ok(())
}

/// Validate the status vocabulary
///
/// Every status needs at least one label and no label may map to two
/// statuses.
pub fn validate_vocabulary(vocabulary: &StatusVocabulary) -> Result<()> {
    let families = [
        ("on_time", &vocabulary.on_time),
        ("delayed", &vocabulary.delayed),
        ("failed", &vocabulary.failed),
        ("pending", &vocabulary.pending),
    ];

    let mut seen = HashSet::new();
    for (status, labels) in families {
        if labels.is_empty() {
            return Err(Error::ConfigurationError(format!(
                "Status '{}' has no labels",
                status
            )));
        }

        for label in labels {
            let normalized = label.trim().to_ascii_lowercase();
            if normalized.is_empty() {
                return Err(Error::ConfigurationError(format!(
                    "Status '{}' has an empty label",
                    status
                )));
            }
            if !seen.insert(normalized) {
                return Err(Error::ConfigurationError(format!(
                    "Status label '{}' is assigned more than once",
                    label
                )));
            }
        }
    }

    if vocabulary.no_delay.trim().is_empty() {
        return Err(Error::ConfigurationError(
            "no_delay label must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate per-table column expectations
pub fn validate_schema_config(config: &SchemaConfig) -> Result<()> {
    for (table, keys) in KEY_COLUMNS {
        let schema = config.table(table);

        for key in keys {
            if !schema.required.iter().any(|c| c == key) {
                return Err(Error::ConfigurationError(format!(
                    "Key column '{}' must be required for table '{}'",
                    key, table
                )));
            }
        }

        for column in &schema.required {
            if schema.optional.contains_key(column) {
                return Err(Error::ConfigurationError(format!(
                    "Column '{}' of table '{}' is both required and optional",
                    column, table
                )));
            }
        }
    }

    Ok(())
}

/// Validate filter configuration
pub fn validate_filter_config(config: &FilterConfig) -> Result<()> {
    if config.all_sentinel.trim().is_empty() {
        return Err(Error::ConfigurationError(
            "all_sentinel must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate report presentation settings
pub fn validate_display_config(config: &DisplayConfig) -> Result<()> {
    if config.currency.trim().is_empty() {
        return Err(Error::ConfigurationError(
            "currency must not be empty".to_string(),
        ));
    }

    if config.top_delay_reasons == 0 {
        return Err(Error::ConfigurationError(
            "top_delay_reasons must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
pub fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    // RUST_LOG style directives ("souqdash=debug") are passed through
    if config.level.contains('=') {
        return Ok(());
    }

    if !LOG_LEVELS.contains(&config.level.to_ascii_lowercase().as_str()) {
        return Err(Error::ConfigurationError(format!(
            "Invalid log level: {}",
            config.level
        )));
    }

    Ok(())
}
