// Order-line pipeline: join, derive, filter
pub mod derive;
pub mod filter;
pub mod join;

// Re-exports for convenience
pub use derive::{derive_line, derive_lines};
pub use filter::{apply_filters, filter_options, FilterOptions, FilterSpec, Selection, DEFAULT_ALL_SENTINEL};
pub use join::{aggregate_returns, join_tables, JoinReport};
