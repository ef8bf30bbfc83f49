//! Stock Item and Test Data Type Definitions
//!
//! Type definitions for the report data snapshot. All types are plain
//! serde-serializable values: the data layer resolves database records into
//! this shape before report generation starts, and nothing here is mutated
//! by the render step.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A part definition, the subject of test templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Full display name (e.g., "Widget Assembly | Rev C")
    pub full_name: String,

    /// Free-text part description
    #[serde(default)]
    pub description: String,

    /// Optional reference to the part image, embedded in the report header
    #[serde(default)]
    pub image_url: Option<String>,
}

/// The user who recorded a test result
///
/// Display honors the "full names" setting of the enclosing application:
/// when enabled and a full name is present it is shown instead of the
/// username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recorder {
    /// Login name, always present
    pub username: String,

    /// Optional "First Last" form
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Recorder {
    /// Name to display for this recorder
    ///
    /// Returns the full name when `display_full_names` is set and a
    /// non-empty full name exists, otherwise the username.
    pub fn display_name(&self, display_full_names: bool) -> &str {
        if display_full_names {
            if let Some(name) = &self.full_name {
                if !name.trim().is_empty() {
                    return name;
                }
            }
        }
        &self.username
    }
}

/// A part-level test definition
///
/// Templates are defined by part administrators and persist independent of
/// any stock item. A required template whose key has no recorded result is
/// flagged distinctly in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestTemplate {
    /// Human-readable test name (e.g., "Firmware Version")
    pub test_name: String,

    /// Whether stock items of this part must record this test
    pub required: bool,
}

impl TestTemplate {
    /// Normalized lookup key for this template
    pub fn key(&self) -> String {
        test_key(&self.test_name)
    }
}

/// A recorded outcome of a test performed on a specific stock item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name as recorded (may refer to a renamed or removed template)
    pub test_name: String,

    /// Pass / fail outcome
    pub result: bool,

    /// Measured or observed value, free text
    #[serde(default)]
    pub value: String,

    /// User who recorded the result
    pub user: Recorder,

    /// When the result was recorded
    pub date: DateTime<Utc>,
}

impl TestResult {
    /// Normalized lookup key for this result
    pub fn key(&self) -> String {
        test_key(&self.test_name)
    }
}

/// A stock item recorded as installed within another stock item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledItem {
    /// Part of the installed item
    pub part: Part,

    /// Serial number, present only for serialized items
    #[serde(default)]
    pub serial: Option<String>,

    /// Quantity, meaningful only for non-serialized items
    #[serde(default)]
    pub quantity: Decimal,
}

impl InstalledItem {
    /// Whether this installed item is tracked by serial number
    pub fn is_serialized(&self) -> bool {
        self.serial.is_some()
    }
}

/// The stock item a report is generated for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Primary key of the stock item record
    pub pk: i64,

    /// Part this stock item is an instance of
    pub part: Part,

    /// Storage location display name, if the item is placed
    #[serde(default)]
    pub location: Option<String>,

    /// Serial number, present only if the item is serialized
    #[serde(default)]
    pub serial: Option<String>,

    /// Quantity, meaningful only if the item is not serialized
    #[serde(default)]
    pub quantity: Decimal,

    /// Sub-items installed into this item, in the order supplied by the
    /// data layer (the report does not re-sort them)
    #[serde(default)]
    pub installed_items: Vec<InstalledItem>,
}

impl StockItem {
    /// Whether this stock item is tracked by serial number
    pub fn is_serialized(&self) -> bool {
        self.serial.is_some()
    }
}

/// Normalize a test name into its lookup key
///
/// The key is the trimmed, lowercased name with every character outside
/// `[a-z0-9_]` removed. A key that would start with a digit is prefixed
/// with an underscore so keys stay usable as identifiers.
///
/// # Example
/// ```
/// use stock_report::stock::test_key;
///
/// assert_eq!(test_key("Test the RPM"), "testtherpm");
/// assert_eq!(test_key("100 hour burn-in"), "_100hourburnin");
/// ```
pub fn test_key(name: &str) -> String {
    let mut key: String = name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if key.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        key.insert(0, '_');
    }

    key
}

/// Collapse a result history into one authoritative result per test key
///
/// The most recent result wins, judged by `date`; on an exact tie the
/// later entry in the input wins. Callers that track multiple recordings
/// per test apply this before assembling the report snapshot.
pub fn latest_results(results: Vec<TestResult>) -> BTreeMap<String, TestResult> {
    let mut latest: BTreeMap<String, TestResult> = BTreeMap::new();

    for result in results {
        let key = result.key();
        match latest.get(&key) {
            Some(existing) if existing.date > result.date => {}
            _ => {
                latest.insert(key, result);
            }
        }
    }

    latest
}
