//! Configuration management for souqdash
//!
//! One parameterized pipeline serves every data-set variant. This module
//! enumerates what used to differ between variants:
//! - candidate base directories and file names for each input table
//! - the delivery status vocabulary ("Delivered" vs "On Time" and friends)
//! - required and optional columns per table, with defaults for absent ones
//! - filter and fill sentinels
//!
//! Settings are layered: defaults, then a YAML/TOML file, then environment
//! variables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::core::records::{DeliveryStatus, TableKind};
use crate::dataframe::DEFAULT_ALL_SENTINEL;
use crate::format::DEFAULT_CURRENCY;
use crate::stats::DEFAULT_TOP_REASONS;

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where the input tables live
    pub data: DataConfig,
    /// Delivery status labels and fill sentinels
    pub vocabulary: StatusVocabulary,
    /// Required and optional columns per table
    pub schema: SchemaConfig,
    /// Filter behaviour
    pub filters: FilterConfig,
    /// Report presentation
    pub display: DisplayConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Input location configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Base directories, searched in order
    pub base_dirs: Vec<PathBuf>,
    /// Candidate file names per table, tried in order inside each directory
    pub files: TableFiles,
    /// Tables whose lines may arrive wrapped in an extra layer of quotes
    pub quote_wrapped: Vec<TableKind>,
}

/// Candidate file names for each table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub customers: Vec<String>,
    pub orders: Vec<String>,
    pub order_items: Vec<String>,
    pub fulfillment: Vec<String>,
    pub returns: Vec<String>,
}

/// Labels that map raw delivery status strings onto [`DeliveryStatus`]
///
/// Matching is case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusVocabulary {
    pub on_time: Vec<String>,
    pub delayed: Vec<String>,
    pub failed: Vec<String>,
    pub pending: Vec<String>,
    /// Fill value for an absent delay reason
    pub no_delay: String,
}

/// Required and optional columns for every table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub customers: TableSchema,
    pub orders: TableSchema,
    pub order_items: TableSchema,
    pub fulfillment: TableSchema,
    pub returns: TableSchema,
}

/// Column expectations for one table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    /// Columns the header must contain
    pub required: Vec<String>,
    /// Columns that may be absent, with the cell value used when they are.
    /// An empty default reads as a null cell.
    pub optional: BTreeMap<String, String>,
}

/// Filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter value meaning "no restriction on this dimension"
    pub all_sentinel: String,
}

/// Report presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency code printed before amounts
    pub currency: String,
    /// How many delay reasons the operations view lists
    pub top_delay_reasons: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error, off)
    pub level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            vocabulary: StatusVocabulary::default(),
            schema: SchemaConfig::default(),
            filters: FilterConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_dirs: vec![PathBuf::from("data"), PathBuf::from(".")],
            files: TableFiles::default(),
            quote_wrapped: vec![TableKind::OrderItems],
        }
    }
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            customers: names(&["customers.csv"]),
            orders: names(&["orders.csv"]),
            order_items: names(&["order_items.csv"]),
            // Older exports misspell the file name
            fulfillment: names(&["fulfillment.csv", "fullfillment.csv"]),
            returns: names(&["returns.csv"]),
        }
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self {
            on_time: names(&["On Time", "Delivered"]),
            delayed: names(&["Delayed"]),
            failed: names(&["Failed"]),
            pending: names(&["Pending"]),
            no_delay: "No Delay".to_string(),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            customers: TableSchema::new(
                &["customer_id", "city"],
                &[
                    ("customer_segment", "Unknown"),
                    ("signup_date", ""),
                    ("signup_channel", ""),
                ],
            ),
            orders: TableSchema::new(
                &[
                    "order_id",
                    "customer_id",
                    "order_date",
                    "gross_amount",
                    "net_amount",
                ],
                &[
                    ("order_channel", ""),
                    ("order_status", ""),
                    ("discount_amount", ""),
                    ("payment_method", ""),
                    ("coupon_code", ""),
                ],
            ),
            order_items: TableSchema::new(
                &["order_id"],
                &[
                    ("product_name", ""),
                    ("product_category", ""),
                    ("item_total", ""),
                ],
            ),
            fulfillment: TableSchema::new(
                &["order_id", "delivery_status"],
                &[
                    ("warehouse_hub", ""),
                    ("delivery_zone", ""),
                    ("delay_reason", ""),
                    ("delivery_partner", ""),
                    ("promised_date", ""),
                    ("actual_delivery_date", ""),
                ],
            ),
            returns: TableSchema::new(
                &["order_id", "refund_amount"],
                &[
                    ("return_date", ""),
                    ("return_reason", ""),
                    ("refund_status", ""),
                ],
            ),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            all_sentinel: DEFAULT_ALL_SENTINEL.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            top_delay_reasons: DEFAULT_TOP_REASONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl TableFiles {
    /// Candidate file names for a table
    pub fn candidates(&self, table: TableKind) -> &[String] {
        match table {
            TableKind::Customers => &self.customers,
            TableKind::Orders => &self.orders,
            TableKind::OrderItems => &self.order_items,
            TableKind::Fulfillment => &self.fulfillment,
            TableKind::Returns => &self.returns,
        }
    }
}

impl DataConfig {
    /// Every candidate path for a table, in priority order
    ///
    /// Directories are the outer loop: all names are tried in the first
    /// directory before moving on to the next.
    pub fn candidate_paths(&self, table: TableKind) -> Vec<PathBuf> {
        self.base_dirs
            .iter()
            .flat_map(|dir| {
                self.files
                    .candidates(table)
                    .iter()
                    .map(move |name| dir.join(name))
            })
            .collect()
    }

    pub fn is_quote_wrapped(&self, table: TableKind) -> bool {
        self.quote_wrapped.contains(&table)
    }
}

impl StatusVocabulary {
    /// Map a raw label onto a delivery status
    pub fn classify(&self, label: &str) -> DeliveryStatus {
        let label = label.trim();
        let matches = |labels: &[String]| labels.iter().any(|l| l.trim().eq_ignore_ascii_case(label));

        if matches(&self.on_time) {
            DeliveryStatus::OnTime
        } else if matches(&self.delayed) {
            DeliveryStatus::Delayed
        } else if matches(&self.failed) {
            DeliveryStatus::Failed
        } else if matches(&self.pending) {
            DeliveryStatus::Pending
        } else {
            DeliveryStatus::Other(label.to_string())
        }
    }
}

impl SchemaConfig {
    pub fn table(&self, table: TableKind) -> &TableSchema {
        match table {
            TableKind::Customers => &self.customers,
            TableKind::Orders => &self.orders,
            TableKind::OrderItems => &self.order_items,
            TableKind::Fulfillment => &self.fulfillment,
            TableKind::Returns => &self.returns,
        }
    }
}

impl TableSchema {
    pub fn new(required: &[&str], optional: &[(&str, &str)]) -> Self {
        Self {
            required: names(required),
            optional: optional
                .iter()
                .map(|(column, default)| (column.to_string(), default.to_string()))
                .collect(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        loader::load_from_env()
    }

    /// Load configuration from a file (YAML or TOML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path.as_ref())
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        loader::load_from_yaml(yaml)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        loader::load_from_toml(toml)
    }

    /// Load configuration with precedence: defaults -> file -> env
    pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        loader::load_with_precedence(config_file)
    }

    /// Validate configuration and return errors if invalid
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        loader::save_to_file(self, path.as_ref())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to YAML: {}", e))
        })
    }

    /// Convert to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to TOML: {}", e))
        })
    }

    /// Merge another configuration into this one
    ///
    /// Sections of `other` that differ from the defaults win, so a layer
    /// only overrides what it actually set.
    pub fn merge(&mut self, other: &Self) {
        let defaults = DashboardConfig::default();

        if other.data.base_dirs != defaults.data.base_dirs {
            self.data.base_dirs = other.data.base_dirs.clone();
        }
        if other.data.files != defaults.data.files {
            self.data.files = other.data.files.clone();
        }
        if other.data.quote_wrapped != defaults.data.quote_wrapped {
            self.data.quote_wrapped = other.data.quote_wrapped.clone();
        }

        if other.vocabulary != defaults.vocabulary {
            self.vocabulary = other.vocabulary.clone();
        }

        if other.schema != defaults.schema {
            self.schema = other.schema.clone();
        }

        if other.filters.all_sentinel != defaults.filters.all_sentinel {
            self.filters.all_sentinel = other.filters.all_sentinel.clone();
        }

        if other.display != defaults.display {
            self.display = other.display.clone();
        }

        if other.logging.level != defaults.logging.level {
            self.logging.level = other.logging.level.clone();
        }
    }
}
