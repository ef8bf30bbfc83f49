// Test result reconciliation
//
// Matches a part's test templates against the results recorded on a stock
// item, one display row per test key. Absence on either side is a
// first-class state, not an error: templates with no result and results
// with no template each get their own disposition, as does a key found on
// neither side.

use crate::stock::{TestResult, TestTemplate};
use std::collections::{BTreeMap, BTreeSet};

/// Per-key outcome of matching templates against results
#[derive(Debug, Clone, PartialEq)]
pub enum TestDisposition {
    /// Template exists and a result was recorded
    Recorded {
        template: TestTemplate,
        result: TestResult,
    },

    /// Template exists but no result was recorded yet
    NotRun { template: TestTemplate },

    /// A result exists for a test that is no longer templated
    /// (renamed or removed template)
    Untemplated { result: TestResult },

    /// The key matches neither a template nor a result; stale input from
    /// the caller, displayed rather than rejected
    Orphaned,
}

/// One display row of the test result table
#[derive(Debug, Clone, PartialEq)]
pub struct TestRow {
    /// Normalized test key
    pub key: String,
    pub disposition: TestDisposition,
}

impl TestRow {
    /// Label text for this row: the template name when templated, the
    /// recorded name when only a result exists, the raw key otherwise
    pub fn label(&self) -> &str {
        match &self.disposition {
            TestDisposition::Recorded { template, .. } => &template.test_name,
            TestDisposition::NotRun { template } => &template.test_name,
            TestDisposition::Untemplated { result } => &result.test_name,
            TestDisposition::Orphaned => &self.key,
        }
    }

    /// Whether the row belongs to a required test template
    pub fn is_required(&self) -> bool {
        match &self.disposition {
            TestDisposition::Recorded { template, .. } => template.required,
            TestDisposition::NotRun { template } => template.required,
            _ => false,
        }
    }

    /// The recorded result, if any
    pub fn result(&self) -> Option<&TestResult> {
        match &self.disposition {
            TestDisposition::Recorded { result, .. } => Some(result),
            TestDisposition::Untemplated { result } => Some(result),
            _ => None,
        }
    }
}

/// Build the ordered display rows for a test report
///
/// One row per key, in sorted key order. Each key is resolved against both
/// maps independently, so every combination of presence and absence maps
/// to a [`TestDisposition`]. Orphaned keys are logged and displayed, never
/// rejected.
pub fn reconcile(
    test_keys: &BTreeSet<String>,
    templates: &BTreeMap<String, TestTemplate>,
    results: &BTreeMap<String, TestResult>,
) -> Vec<TestRow> {
    test_keys
        .iter()
        .map(|key| {
            let disposition = match (templates.get(key), results.get(key)) {
                (Some(template), Some(result)) => TestDisposition::Recorded {
                    template: template.clone(),
                    result: result.clone(),
                },
                (Some(template), None) => TestDisposition::NotRun {
                    template: template.clone(),
                },
                (None, Some(result)) => TestDisposition::Untemplated {
                    result: result.clone(),
                },
                (None, None) => {
                    tracing::warn!(
                        key = %key,
                        "Test key matches neither a template nor a result"
                    );
                    TestDisposition::Orphaned
                }
            };

            TestRow {
                key: key.clone(),
                disposition,
            }
        })
        .collect()
}
