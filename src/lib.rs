// Library exports for stock-report

pub mod error;

pub mod config; // Configuration management
pub mod stock; // Inventory data model (parts, stock items, tests)

// Stock item test report generation
pub mod report; // Test result reconciliation and HTML report rendering
