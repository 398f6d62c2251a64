pub mod csv;
pub mod loader;

// Re-export commonly used functions
pub use self::csv::{clean_quoted_lines, parse_table, read_table, strip_wrapping_quotes};
pub use self::loader::{InputSet, RawTables, TableLoader};
