//! souqdash: order, fulfillment and returns analytics for an executive dashboard
//!
//! Five CSV tables (customers, orders, order items, fulfillment, returns) are
//! loaded, left-joined into one line per order item, enriched with calendar
//! buckets and summarized into revenue, delivery, return and customer KPIs.

// Core module with fundamental records and the error type
pub mod core;

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod dataframe;
pub mod error;
pub mod format;
pub mod groupby;
pub mod io;
pub mod pipeline;
pub mod stats;
pub mod temporal;

#[cfg(test)]
mod test_support;

// Re-export core types
pub use crate::core::error::{Error, Result};
pub use crate::core::records::{
    Customer, DeliveryStatus, EnrichedOrderLine, FulfillmentRecord, JoinedRow, Order, OrderItem,
    RefundStatus, ReturnRecord, TableKind,
};

// Pipeline stages
pub use cache::{fingerprint, PipelineCache};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSummary};
pub use dataframe::{apply_filters, FilterOptions, FilterSpec, JoinReport, Selection};
pub use io::{InputSet, RawTables, TableLoader};
pub use pipeline::Dataset;
pub use stats::Breakdown;
pub use temporal::DateRange;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
