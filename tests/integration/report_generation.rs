// Integration tests for stock item test report generation
//
// These tests verify end-to-end report generation including:
// - Complete report assembly with all sections
// - Section filtering via ReportOptions
// - Report caching behavior and invalidation
// - Display-state mapping for every input irregularity
// - Idempotence of the pure render step

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use stock_report::error::ReportError;
use stock_report::report::{
    render_report, RenderContext, ReportData, ReportGenerator, ReportOptions,
};
use stock_report::stock::{
    test_key, InstalledItem, Part, Recorder, StockItem, TestResult, TestTemplate,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn operator() -> Recorder {
    Recorder {
        username: "operator".to_string(),
        full_name: Some("Olive Operator".to_string()),
    }
}

fn template(name: &str, required: bool) -> (String, TestTemplate) {
    (
        test_key(name),
        TestTemplate {
            test_name: name.to_string(),
            required,
        },
    )
}

fn result(name: &str, passed: bool, value: &str) -> (String, TestResult) {
    (
        test_key(name),
        TestResult {
            test_name: name.to_string(),
            result: passed,
            value: value.to_string(),
            user: operator(),
            date: Utc.with_ymd_and_hms(2026, 2, 1, 14, 30, 0).unwrap(),
        },
    )
}

fn snapshot() -> ReportData {
    let stock_item = StockItem {
        pk: 42,
        part: Part {
            full_name: "Controller Board | Rev B".to_string(),
            description: "Main controller PCB assembly".to_string(),
            image_url: Some("media/controller.png".to_string()),
        },
        location: Some("Electronics / Shelf 2".to_string()),
        serial: Some("2026-0042".to_string()),
        quantity: Decimal::ZERO,
        installed_items: vec![
            InstalledItem {
                part: Part {
                    full_name: "Display Module".to_string(),
                    description: String::new(),
                    image_url: None,
                },
                serial: Some("007".to_string()),
                quantity: Decimal::ZERO,
            },
            InstalledItem {
                part: Part {
                    full_name: "M3 Standoff".to_string(),
                    description: String::new(),
                    image_url: None,
                },
                serial: None,
                quantity: Decimal::new(40, 1),
            },
        ],
    };

    let templates = BTreeMap::from([
        template("Firmware Version", true),
        template("Burn In", true),
        template("Paint Check", false),
    ]);

    let results = BTreeMap::from([
        result("Firmware Version", true, "v2.1.0"),
        result("Legacy Check", false, "out of spec"),
    ]);

    ReportData::new(stock_item, templates, results)
}

fn ctx() -> RenderContext {
    RenderContext::new(Utc.with_ymd_and_hms(2026, 2, 2, 8, 0, 0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_complete_report() {
        init_tracing();

        let generator = ReportGenerator::new(60);
        let report = generator
            .generate_report(&snapshot(), ReportOptions::default(), &ctx())
            .unwrap();

        assert_eq!(report.stock_item_pk, 42);
        assert_eq!(
            report.generated_at,
            Utc.with_ymd_and_hms(2026, 2, 2, 8, 0, 0)
                .unwrap()
                .timestamp_millis()
        );

        let html = &report.html_content;

        // Document structure
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.ends_with("</body>\n</html>\n"));

        // All three sections plus footer
        assert!(html.contains("<h1>Stock Item Test Report</h1>"));
        assert!(html.contains("Controller Board | Rev B"));
        assert!(html.contains("<h2>Test Results</h2>"));
        assert!(html.contains("<h2>Installed Items</h2>"));
        assert!(html.contains("Generated 2026-02-02 08:00:00 UTC"));
    }

    #[test]
    fn test_display_states_cover_all_dispositions() {
        let mut data = snapshot();
        data.test_keys.insert("ghostkey".to_string());

        let html = render_report(&data, &ReportOptions::default(), &ctx());

        // Recorded pass: value, user and date echoed
        assert!(html.contains("<td class=\"test-required\">Firmware Version</td>"));
        assert!(html.contains("<td class=\"test-pass\">Pass</td>"));
        assert!(html.contains("<td>v2.1.0</td>"));
        assert!(html.contains("<td>operator</td>"));
        assert!(html.contains("<td>2026-02-01</td>"));

        // Required template without result
        assert!(html.contains("<td class=\"test-required\">Burn In</td>"));
        assert!(html.contains(
            "<td class=\"test-missing-required\" colspan=\"4\">Required test not recorded</td>"
        ));

        // Optional template without result
        assert!(html.contains("<td>Paint Check</td>"));
        assert!(html.contains("<td class=\"test-missing\" colspan=\"4\">No result</td>"));

        // Result without template, failed
        assert!(html.contains("<td class=\"test-untemplated\">Legacy Check</td>"));
        assert!(html.contains("<td class=\"test-fail\">Fail</td>"));

        // Orphaned key shows the raw key, error-highlighted
        assert!(html.contains("<td class=\"test-orphan\">ghostkey</td>"));
    }

    #[test]
    fn test_installed_items_serial_and_quantity() {
        let html = render_report(&snapshot(), &ReportOptions::default(), &ctx());

        assert!(html.contains("Serial: 007"));
        assert!(html.contains("Quantity: 4"));
        assert!(!html.contains("Quantity: 4.0"));
    }

    #[test]
    fn test_empty_installed_items_omits_section() {
        let mut data = snapshot();
        data.stock_item.installed_items.clear();

        let html = render_report(&data, &ReportOptions::default(), &ctx());
        assert!(!html.contains("<h2>Installed Items</h2>"));
    }

    #[test]
    fn test_empty_test_keys_renders_placeholder() {
        let data = ReportData::new(
            snapshot().stock_item,
            BTreeMap::new(),
            BTreeMap::new(),
        );
        assert!(data.test_keys.is_empty());

        let html = render_report(&data, &ReportOptions::default(), &ctx());

        assert!(html.contains("No tests are defined for this part."));
        assert!(html.contains("<h2>Test Results</h2>"));
    }

    #[test]
    fn test_include_sections_filtering() {
        let options = ReportOptions {
            include_sections: Some(vec!["test_results".to_string()]),
        };

        let html = render_report(&snapshot(), &options, &ctx());

        assert!(html.contains("<h2>Test Results</h2>"));
        assert!(!html.contains("<h1>Stock Item Test Report</h1>"));
        assert!(!html.contains("<h2>Installed Items</h2>"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let generator = ReportGenerator::new(60);
        let options = ReportOptions {
            include_sections: Some(vec!["orderbook".to_string()]),
        };

        let err = generator
            .generate_report(&snapshot(), options, &ctx())
            .unwrap_err();

        assert!(matches!(err, ReportError::Validation(_)));
        assert!(err.to_string().contains("unknown report section"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let data = snapshot();
        let options = ReportOptions::default();
        let context = ctx();

        let first = render_report(&data, &options, &context);
        let second = render_report(&data, &options, &context);
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_caching_preserves_original_content() {
        init_tracing();

        let generator = ReportGenerator::new(60);
        let data = snapshot();

        let first = generator
            .generate_report(&data, ReportOptions::default(), &ctx())
            .unwrap();

        // Second request with a later clock still returns the cached
        // document, stamped with the original generation time
        let later = RenderContext::new(Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap());
        let second = generator
            .generate_report(&data, ReportOptions::default(), &later)
            .unwrap();

        assert_eq!(second.html_content, first.html_content);
        assert_eq!(second.generated_at, first.generated_at);

        // Invalidation forces regeneration against the new context
        generator.invalidate_cache(data.stock_item.pk);
        let third = generator
            .generate_report(&data, ReportOptions::default(), &later)
            .unwrap();

        assert!(third.html_content.contains("Generated 2026-02-03 09:00:00 UTC"));
        assert_ne!(third.generated_at, first.generated_at);
    }

    #[test]
    fn test_cache_isolated_by_options() {
        let generator = ReportGenerator::new(60);
        let data = snapshot();

        let full = generator
            .generate_report(&data, ReportOptions::default(), &ctx())
            .unwrap();
        let subset = generator
            .generate_report(
                &data,
                ReportOptions {
                    include_sections: Some(vec!["test_results".to_string()]),
                },
                &ctx(),
            )
            .unwrap();

        assert_ne!(full.html_content, subset.html_content);
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "stock_item": {
                "pk": 9,
                "part": {"full_name": "Widget"},
                "quantity": "2.50"
            },
            "templates": {
                "burnin": {"test_name": "Burn In", "required": true}
            },
            "results": {
                "legacycheck": {
                    "test_name": "Legacy Check",
                    "result": true,
                    "value": "ok",
                    "user": {"username": "operator"},
                    "date": "2026-02-01T14:30:00Z"
                }
            }
        }"#;

        let data = ReportData::from_json(json).unwrap();

        // test_keys filled with the union of template and result keys
        assert!(data.test_keys.contains("burnin"));
        assert!(data.test_keys.contains("legacycheck"));

        let html = render_report(&data, &ReportOptions::default(), &ctx());
        assert!(html.contains("Burn In"));
        assert!(html.contains("Legacy Check"));
        assert!(html.contains("<td>Quantity</td><td>2.5</td>"));
    }

    #[test]
    fn test_malformed_snapshot_is_a_json_error() {
        let err = ReportData::from_json("{not json").unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[test]
    fn test_recorded_values_are_escaped_end_to_end() {
        let mut data = snapshot();
        data.stock_item.part.full_name = "Board <script>alert(1)</script>".to_string();

        let html = render_report(&data, &ReportOptions::default(), &ctx());

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }
}
