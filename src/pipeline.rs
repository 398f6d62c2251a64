//! End-to-end dataset construction: load, join, derive

use crate::config::DashboardConfig;
use crate::core::records::EnrichedOrderLine;
use crate::dataframe::{derive_lines, filter_options, join_tables, FilterOptions, JoinReport};
use crate::error::Result;
use crate::io::{InputSet, RawTables, TableLoader};

/// Raw tables plus the enriched order lines built from them
///
/// Immutable once built. The raw fulfillment and returns tables stay
/// available for the partner and refund-status breakdowns.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub inputs: InputSet,
    pub tables: RawTables,
    pub lines: Vec<EnrichedOrderLine>,
    pub report: JoinReport,
}

impl Dataset {
    /// Load and build from the files resolved through `loader`
    pub fn load(loader: &TableLoader) -> Result<Self> {
        let inputs = loader.resolve_all()?;
        Self::load_from(loader, inputs)
    }

    /// Build from already-resolved input paths
    pub fn load_from(loader: &TableLoader, inputs: InputSet) -> Result<Self> {
        let tables = loader.load_from(&inputs)?;
        Ok(Self::from_tables(inputs, tables, loader.config()))
    }

    /// Join and derive over tables already in memory
    pub fn from_tables(inputs: InputSet, tables: RawTables, config: &DashboardConfig) -> Self {
        let (rows, report) = join_tables(&tables, &config.vocabulary);
        let lines = derive_lines(rows, &config.vocabulary.no_delay);

        log::info!(
            "built {} order lines from {} orders ({} without items, {} without fulfillment)",
            lines.len(),
            tables.orders.len(),
            report.orders_without_items,
            report.orders_without_fulfillment
        );

        Dataset {
            inputs,
            tables,
            lines,
            report,
        }
    }

    /// Filter choices over the whole dataset
    pub fn filter_options(&self, sentinel: &str) -> FilterOptions {
        filter_options(&self.lines, sentinel)
    }
}
