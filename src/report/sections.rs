// Section builders for the stock item test report
//
// Each function builds one section of the report as an HTML fragment. The
// generator assembles the fragments into the final document; every
// irregular input (missing template, missing result, orphaned key, empty
// listings) maps to a display state here, never to an error.

use super::formatter;
use super::{
    RenderContext, ReportSection, TestDisposition, TestRow, SECTION_INSTALLED_ITEMS,
    SECTION_SUMMARY, SECTION_TEST_RESULTS,
};
use crate::stock::{InstalledItem, StockItem};

/// Build the embedded stylesheet
///
/// Colors and widths are presentation only; what matters is that the four
/// result states (pass, fail, missing-required, missing-optional) and the
/// orphaned-key label stay visually distinct.
pub fn build_stylesheet() -> String {
    let mut style = String::new();

    style.push_str("<style>\n");
    style.push_str("body { font-family: Arial, sans-serif; margin: 24px; }\n");
    style.push_str("table { border-collapse: collapse; width: 100%; margin-bottom: 16px; }\n");
    style.push_str("th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }\n");
    style.push_str("th { background-color: #eee; }\n");
    style.push_str(".part-image { max-width: 120px; max-height: 120px; float: right; }\n");
    style.push_str(&format!(
        ".{} {{ color: #080; font-weight: bold; }}\n",
        formatter::CLASS_PASS
    ));
    style.push_str(&format!(
        ".{} {{ color: #c00; font-weight: bold; }}\n",
        formatter::CLASS_FAIL
    ));
    style.push_str(&format!(
        ".{} {{ background-color: #fdd; color: #c00; }}\n",
        formatter::CLASS_MISSING_REQUIRED
    ));
    style.push_str(&format!(
        ".{} {{ color: #888; }}\n",
        formatter::CLASS_MISSING
    ));
    style.push_str(&format!(
        ".{} {{ background-color: #fdd; font-style: italic; }}\n",
        formatter::CLASS_ORPHAN
    ));
    style.push_str(&format!(
        ".{} {{ font-weight: bold; }}\n",
        formatter::CLASS_REQUIRED
    ));
    style.push_str(&format!(
        ".{} {{ font-style: italic; }}\n",
        formatter::CLASS_UNTEMPLATED
    ));
    style.push_str("footer { margin-top: 24px; font-size: 0.8em; color: #888; }\n");
    style.push_str("</style>\n");

    style
}

/// Build the part and stock item summary section
pub fn build_summary_section(item: &StockItem, _ctx: &RenderContext) -> ReportSection {
    let mut content = String::new();

    content.push_str("<div class=\"summary\">\n");

    if let Some(url) = &item.part.image_url {
        content.push_str(&format!(
            "<img class=\"part-image\" src=\"{}\" alt=\"{}\">\n",
            formatter::escape_html(url),
            formatter::escape_html(&item.part.full_name),
        ));
    }

    content.push_str(&formatter::build_section_header("Stock Item Test Report", 1));

    let mut rows = Vec::new();
    rows.push(formatter::row(&[
        formatter::cell("Part", None),
        formatter::cell(&formatter::escape_html(&item.part.full_name), None),
    ]));

    if !item.part.description.is_empty() {
        rows.push(formatter::row(&[
            formatter::cell("Description", None),
            formatter::cell(&formatter::escape_html(&item.part.description), None),
        ]));
    }

    // Serialized items show the serial, batch items the quantity
    match &item.serial {
        Some(serial) => rows.push(formatter::row(&[
            formatter::cell("Serial", None),
            formatter::cell(&formatter::escape_html(serial), None),
        ])),
        None => rows.push(formatter::row(&[
            formatter::cell("Quantity", None),
            formatter::cell(&formatter::format_quantity(item.quantity), None),
        ])),
    }

    if let Some(location) = &item.location {
        rows.push(formatter::row(&[
            formatter::cell("Location", None),
            formatter::cell(&formatter::escape_html(location), None),
        ]));
    }

    content.push_str(&formatter::build_table(&["Field", "Value"], &rows));
    content.push_str("</div>\n");

    ReportSection {
        name: SECTION_SUMMARY.to_string(),
        title: "Stock Item Test Report".to_string(),
        content,
    }
}

/// Build the reconciled test result table
///
/// One row per test key. Label styling follows the disposition: required
/// templates bold, untemplated results italic, orphaned keys
/// error-highlighted. Rows without a result collapse the four result
/// columns into one wide cell, styled by whether the test was required.
/// An empty key set renders an explanatory placeholder instead of a table.
pub fn build_test_results_section(rows: &[TestRow], ctx: &RenderContext) -> ReportSection {
    let mut content = formatter::build_section_header("Test Results", 2);

    if rows.is_empty() {
        content.push_str("<p class=\"no-tests\">No tests are defined for this part.</p>\n");
    } else {
        let table_rows: Vec<String> = rows.iter().map(|row| build_test_row(row, ctx)).collect();
        content.push_str(&formatter::build_table(
            &["Test", "Result", "Value", "User", "Date"],
            &table_rows,
        ));
    }

    ReportSection {
        name: SECTION_TEST_RESULTS.to_string(),
        title: "Test Results".to_string(),
        content,
    }
}

fn build_test_row(row: &TestRow, ctx: &RenderContext) -> String {
    let label_class = match &row.disposition {
        TestDisposition::Recorded { .. } | TestDisposition::NotRun { .. } => {
            if row.is_required() {
                Some(formatter::CLASS_REQUIRED)
            } else {
                None
            }
        }
        TestDisposition::Untemplated { .. } => Some(formatter::CLASS_UNTEMPLATED),
        TestDisposition::Orphaned => Some(formatter::CLASS_ORPHAN),
    };

    let mut cells = vec![formatter::cell(
        &formatter::escape_html(row.label()),
        label_class,
    )];

    match row.result() {
        Some(result) => {
            let (status, class) = if result.result {
                ("Pass", formatter::CLASS_PASS)
            } else {
                ("Fail", formatter::CLASS_FAIL)
            };

            cells.push(formatter::cell(status, Some(class)));
            cells.push(formatter::cell(&formatter::escape_html(&result.value), None));
            cells.push(formatter::cell(
                &formatter::format_user(&result.user, ctx.display_full_names),
                None,
            ));
            cells.push(formatter::cell(
                &formatter::format_date(&result.date, &ctx.date_format),
                None,
            ));
        }
        None => {
            let (text, class) = if row.is_required() {
                ("Required test not recorded", formatter::CLASS_MISSING_REQUIRED)
            } else {
                ("No result", formatter::CLASS_MISSING)
            };

            cells.push(formatter::wide_cell(text, Some(class), 4));
        }
    }

    formatter::row(&cells)
}

/// Build the installed sub-item listing
///
/// Returns `None` for an empty listing; the section is omitted from the
/// report entirely rather than rendered as an empty table.
pub fn build_installed_items_section(items: &[InstalledItem]) -> Option<ReportSection> {
    if items.is_empty() {
        return None;
    }

    let mut content = formatter::build_section_header("Installed Items", 2);

    let table_rows: Vec<String> = items
        .iter()
        .map(|item| {
            let mut part_cell = String::new();
            if let Some(url) = &item.part.image_url {
                part_cell.push_str(&format!(
                    "<img class=\"part-image\" src=\"{}\" alt=\"{}\"> ",
                    formatter::escape_html(url),
                    formatter::escape_html(&item.part.full_name),
                ));
            }
            part_cell.push_str(&formatter::escape_html(&item.part.full_name));

            let detail = match &item.serial {
                Some(serial) => format!("Serial: {}", formatter::escape_html(serial)),
                None => format!("Quantity: {}", formatter::format_quantity(item.quantity)),
            };

            formatter::row(&[
                formatter::cell(&part_cell, None),
                formatter::cell(&detail, None),
            ])
        })
        .collect();

    content.push_str(&formatter::build_table(&["Part", "Detail"], &table_rows));

    Some(ReportSection {
        name: SECTION_INSTALLED_ITEMS.to_string(),
        title: "Installed Items".to_string(),
        content,
    })
}

/// Build the report footer with generation metadata
pub fn build_report_footer(ctx: &RenderContext) -> String {
    format!(
        "<footer>Generated {}</footer>\n",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
