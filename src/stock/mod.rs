//! Inventory Data Model
//!
//! Domain types for parts, stock items and their test data, as handed over
//! by the data-access layer. The report pipeline only reads these types.

pub mod types;

// Re-export
pub use types::{
    latest_results, test_key, InstalledItem, Part, Recorder, StockItem, TestResult, TestTemplate,
};
