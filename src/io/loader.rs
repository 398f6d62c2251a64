//! Raw table loading: resolve each logical table to a file, then parse it

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::core::records::{Customer, FulfillmentRecord, Order, OrderItem, ReturnRecord, TableKind};
use crate::error::{Error, Result};
use crate::io::csv::read_table;

/// The five raw tables as loaded from disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTables {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub fulfillment: Vec<FulfillmentRecord>,
    pub returns: Vec<ReturnRecord>,
}

impl RawTables {
    /// Row count of one table
    pub fn row_count(&self, table: TableKind) -> usize {
        match table {
            TableKind::Customers => self.customers.len(),
            TableKind::Orders => self.orders.len(),
            TableKind::OrderItems => self.order_items.len(),
            TableKind::Fulfillment => self.fulfillment.len(),
            TableKind::Returns => self.returns.len(),
        }
    }
}

/// The file chosen for each table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InputSet {
    pub customers: PathBuf,
    pub orders: PathBuf,
    pub order_items: PathBuf,
    pub fulfillment: PathBuf,
    pub returns: PathBuf,
}

impl InputSet {
    pub fn path(&self, table: TableKind) -> &Path {
        match table {
            TableKind::Customers => &self.customers,
            TableKind::Orders => &self.orders,
            TableKind::OrderItems => &self.order_items,
            TableKind::Fulfillment => &self.fulfillment,
            TableKind::Returns => &self.returns,
        }
    }

    /// `(table, path)` pairs in load order
    pub fn iter(&self) -> impl Iterator<Item = (TableKind, &Path)> + '_ {
        TableKind::ALL.into_iter().map(move |table| (table, self.path(table)))
    }
}

/// Loads the raw tables described by a [`DashboardConfig`]
#[derive(Debug, Clone)]
pub struct TableLoader {
    config: DashboardConfig,
}

impl TableLoader {
    pub fn new(config: DashboardConfig) -> Self {
        TableLoader { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// First existing candidate path for a table
    ///
    /// Fails with [`Error::MissingInput`] listing every searched path when
    /// none exists.
    pub fn resolve(&self, table: TableKind) -> Result<PathBuf> {
        let candidates = self.config.data.candidate_paths(table);

        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                log::debug!("{}: resolved to {}", table, path.display());
                Ok(path.clone())
            }
            None => Err(Error::MissingInput {
                table,
                searched: candidates,
            }),
        }
    }

    /// Resolve all five tables
    pub fn resolve_all(&self) -> Result<InputSet> {
        Ok(InputSet {
            customers: self.resolve(TableKind::Customers)?,
            orders: self.resolve(TableKind::Orders)?,
            order_items: self.resolve(TableKind::OrderItems)?,
            fulfillment: self.resolve(TableKind::Fulfillment)?,
            returns: self.resolve(TableKind::Returns)?,
        })
    }

    /// Resolve and parse all five tables
    pub fn load(&self) -> Result<RawTables> {
        let inputs = self.resolve_all()?;
        self.load_from(&inputs)
    }

    /// Parse the tables at already-resolved paths
    ///
    /// The first failure aborts the load; no partial set is returned.
    pub fn load_from(&self, inputs: &InputSet) -> Result<RawTables> {
        let tables = RawTables {
            customers: self.load_table(inputs, TableKind::Customers)?,
            orders: self.load_table(inputs, TableKind::Orders)?,
            order_items: self.load_table(inputs, TableKind::OrderItems)?,
            fulfillment: self.load_table(inputs, TableKind::Fulfillment)?,
            returns: self.load_table(inputs, TableKind::Returns)?,
        };

        for table in TableKind::ALL {
            log::info!(
                "loaded {} rows of {} from {}",
                tables.row_count(table),
                table,
                inputs.path(table).display()
            );
        }

        Ok(tables)
    }

    fn load_table<T: DeserializeOwned>(&self, inputs: &InputSet, table: TableKind) -> Result<Vec<T>> {
        read_table(
            inputs.path(table),
            table,
            self.config.schema.table(table),
            self.config.data.is_quote_wrapped(table),
        )
    }
}
