// Report module for stock item test reporting
//
// This module turns a stock item data snapshot into a printable HTML test
// report: part summary, reconciled test-result table and installed
// sub-item listing.

pub mod formatter;
pub mod generator;
pub mod reconcile;
pub mod sections;

// Re-export main types
pub use generator::{render_report, ReportGenerator};
pub use reconcile::{reconcile, TestDisposition, TestRow};

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::stock::{StockItem, TestResult, TestTemplate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Section name: part and stock item summary
pub const SECTION_SUMMARY: &str = "summary";
/// Section name: reconciled test result table
pub const SECTION_TEST_RESULTS: &str = "test_results";
/// Section name: installed sub-item listing
pub const SECTION_INSTALLED_ITEMS: &str = "installed_items";

/// All section names accepted by [`ReportOptions::include_sections`]
pub const KNOWN_SECTIONS: [&str; 3] =
    [SECTION_SUMMARY, SECTION_TEST_RESULTS, SECTION_INSTALLED_ITEMS];

/// Configuration options for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportOptions {
    /// List of section names to include in the report.
    /// If None or empty, all sections are included.
    pub include_sections: Option<Vec<String>>,
}

impl ReportOptions {
    /// Validates the report options and returns an error if any option is invalid.
    ///
    /// Every name in `include_sections` must be one of [`KNOWN_SECTIONS`].
    ///
    /// # Example
    /// ```
    /// use stock_report::report::ReportOptions;
    ///
    /// let options = ReportOptions {
    ///     include_sections: Some(vec!["test_results".to_string()]),
    /// };
    /// assert!(options.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if let Some(sections) = &self.include_sections {
            for name in sections {
                if !KNOWN_SECTIONS.contains(&name.as_str()) {
                    return Err(format!(
                        "unknown report section '{}', expected one of: {}",
                        name,
                        KNOWN_SECTIONS.join(", ")
                    ));
                }
            }
        }
        Ok(())
    }

    /// Whether a section should be rendered under these options
    pub fn includes(&self, section_name: &str) -> bool {
        match &self.include_sections {
            None => true,
            Some(list) if list.is_empty() => true,
            Some(list) => list.iter().any(|name| name == section_name),
        }
    }

    /// Generates a deterministic cache key suffix from the report options.
    ///
    /// Section names are sorted so that the same selection produces the
    /// same suffix regardless of input order.
    pub fn to_cache_key_suffix(&self) -> String {
        let sections_key = match &self.include_sections {
            None => "all".to_string(),
            Some(sections) if sections.is_empty() => "all".to_string(),
            Some(sections) => {
                let mut sorted = sections.clone();
                sorted.sort();
                sorted.join(",")
            }
        };

        format!("sections:{}", sections_key)
    }

    /// Generates a complete cache key for a stock item and these options
    ///
    /// # Example
    /// ```
    /// use stock_report::report::ReportOptions;
    ///
    /// let key = ReportOptions::default().to_cache_key(42);
    /// assert_eq!(key, "42:sections:all");
    /// ```
    pub fn to_cache_key(&self, stock_item_pk: i64) -> String {
        format!("{}:{}", stock_item_pk, self.to_cache_key_suffix())
    }
}

/// Formatting state the enclosing application would otherwise supply
/// implicitly (session, localization, wall clock)
///
/// Passing it explicitly keeps [`render_report`](crate::report::render_report)
/// a pure function: identical inputs, identical output.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Report generation timestamp, stamped into the footer
    pub generated_at: DateTime<Utc>,

    /// strftime pattern applied to result dates
    pub date_format: String,

    /// Display recorder full names instead of usernames
    pub display_full_names: bool,
}

impl RenderContext {
    /// Context with default formatting for the given generation timestamp
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self::from_config(&ReportConfig::default(), generated_at)
    }

    /// Context carrying the formatting settings of `config`
    pub fn from_config(config: &ReportConfig, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            date_format: config.date_format.clone(),
            display_full_names: config.display_full_names,
        }
    }
}

/// The data snapshot a report is rendered from
///
/// Assembled by the data-access layer: the stock item, the part's test
/// templates and the item's recorded results, both keyed by normalized
/// test key, plus the set of keys to display. The snapshot carries one
/// result per key; callers with a result history collapse it first via
/// [`latest_results`](crate::stock::latest_results).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    /// The stock item under report
    pub stock_item: StockItem,

    /// Keys to display, normally the union of template and result keys.
    /// A key present here but absent from both maps is rendered through
    /// the orphaned-key display path.
    #[serde(default)]
    pub test_keys: BTreeSet<String>,

    /// Test templates declared on the part, by key
    #[serde(default)]
    pub templates: BTreeMap<String, TestTemplate>,

    /// Authoritative test results recorded on the item, by key
    #[serde(default)]
    pub results: BTreeMap<String, TestResult>,
}

impl ReportData {
    /// Builds a snapshot with `test_keys` set to the union of template and
    /// result keys
    pub fn new(
        stock_item: StockItem,
        templates: BTreeMap<String, TestTemplate>,
        results: BTreeMap<String, TestResult>,
    ) -> Self {
        let test_keys = templates.keys().chain(results.keys()).cloned().collect();

        Self {
            stock_item,
            test_keys,
            templates,
            results,
        }
    }

    /// Parses a serialized snapshot
    ///
    /// An absent or empty `test_keys` field is filled with the union of
    /// template and result keys.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let mut data: Self = serde_json::from_str(json)?;

        if data.test_keys.is_empty() {
            data.test_keys = data
                .templates
                .keys()
                .chain(data.results.keys())
                .cloned()
                .collect();
        }

        Ok(data)
    }
}

/// The complete generated test report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// The complete HTML document
    pub html_content: String,

    /// Stock item this report was generated for
    pub stock_item_pk: i64,

    /// Unix timestamp (milliseconds) the report was generated at, taken
    /// from the render context
    pub generated_at: i64,

    /// Report generation duration in milliseconds
    pub generation_time_ms: u64,
}

/// Internal representation of a report section
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub name: String,
    pub title: String,
    pub content: String,
}

impl ReportSection {
    pub fn render(&self) -> &str {
        &self.content
    }
}

/// TTL-based in-memory cache for reports
pub struct ReportCache {
    cache: Mutex<HashMap<String, (TestReport, Instant)>>,
    ttl: Duration,
}

impl ReportCache {
    /// Creates a new report cache with the specified time-to-live (TTL).
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Retrieves a cached report if it exists and is not expired.
    ///
    /// Expired entries are removed on access. Thread-safe via internal
    /// locking.
    pub fn get(&self, key: &str) -> Option<TestReport> {
        let mut cache = self.cache.lock().unwrap();
        if let Some((report, timestamp)) = cache.get(key) {
            if timestamp.elapsed() < self.ttl {
                return Some(report.clone());
            }
            cache.remove(key);
        }
        None
    }

    /// Stores a report in the cache with the current timestamp.
    ///
    /// An existing entry with the same key is replaced.
    pub fn set(&self, key: String, report: TestReport) {
        let mut cache = self.cache.lock().unwrap();
        cache.insert(key, (report, Instant::now()));
    }

    /// Invalidates all cached reports for a stock item across all option
    /// combinations.
    ///
    /// Cache keys include both the stock item pk and the options suffix,
    /// so every entry with the pk prefix is removed.
    pub fn invalidate(&self, stock_item_pk: i64) {
        let mut cache = self.cache.lock().unwrap();
        let prefix = format!("{}:", stock_item_pk);
        cache.retain(|key, _| !key.starts_with(&prefix));
    }
}
