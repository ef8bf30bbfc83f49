// Report generator - main orchestrator for creating stock item test reports

use super::sections;
use super::{reconcile, RenderContext, ReportCache, ReportData, ReportOptions, TestReport};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use std::sync::Arc;
use std::time::Instant;

/// Main service for generating stock item test reports
///
/// Holds the report cache; rendering itself is the pure [`render_report`]
/// function, so a generator is only needed where caching or option
/// validation is wanted.
pub struct ReportGenerator {
    cache: Arc<ReportCache>,
}

impl ReportGenerator {
    /// Create a new report generator with the given cache lifetime
    pub fn new(cache_ttl_secs: u64) -> Self {
        Self {
            cache: Arc::new(ReportCache::new(cache_ttl_secs)),
        }
    }

    /// Create a generator from loaded configuration
    pub fn with_config(config: &ReportConfig) -> Self {
        Self::new(config.cache_ttl_secs)
    }

    /// Create a generator configured from the environment
    pub fn from_env() -> Result<Self> {
        let config = ReportConfig::from_env().map_err(ReportError::Config)?;
        Ok(Self::with_config(&config))
    }

    /// Generate the test report for a stock item snapshot
    ///
    /// Validates the options, consults the cache, and renders on a miss.
    /// Cache hits return the originally rendered content; only the
    /// generation time is replaced with the retrieval time.
    pub fn generate_report(
        &self,
        data: &ReportData,
        options: ReportOptions,
        ctx: &RenderContext,
    ) -> Result<TestReport> {
        let start_time = Instant::now();

        options.validate().map_err(ReportError::Validation)?;

        let cache_key = options.to_cache_key(data.stock_item.pk);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(
                stock_item = data.stock_item.pk,
                cache_key = %cache_key,
                "Returning cached test report"
            );

            return Ok(TestReport {
                generation_time_ms: start_time.elapsed().as_millis() as u64,
                ..cached
            });
        }

        let html_content = render_report(data, &options, ctx);

        let report = TestReport {
            html_content,
            stock_item_pk: data.stock_item.pk,
            generated_at: ctx.generated_at.timestamp_millis(),
            generation_time_ms: start_time.elapsed().as_millis() as u64,
        };

        self.cache.set(cache_key, report.clone());

        tracing::debug!(
            stock_item = data.stock_item.pk,
            test_keys = data.test_keys.len(),
            installed_items = data.stock_item.installed_items.len(),
            generation_time_ms = report.generation_time_ms,
            "Generated test report"
        );

        Ok(report)
    }

    /// Clear cached reports for a stock item
    pub fn invalidate_cache(&self, stock_item_pk: i64) {
        self.cache.invalidate(stock_item_pk);
    }
}

/// Render a test report document
///
/// The pure assembly step: reconciles the snapshot's test keys into
/// display rows and concatenates the selected section fragments into a
/// complete HTML document. No side effects, no hidden state; identical
/// inputs produce identical output.
pub fn render_report(data: &ReportData, options: &ReportOptions, ctx: &RenderContext) -> String {
    let rows = reconcile(&data.test_keys, &data.templates, &data.results);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&sections::build_stylesheet());
    html.push_str("</head>\n<body>\n");

    if options.includes(super::SECTION_SUMMARY) {
        html.push_str(sections::build_summary_section(&data.stock_item, ctx).render());
    }

    if options.includes(super::SECTION_TEST_RESULTS) {
        html.push_str(sections::build_test_results_section(&rows, ctx).render());
    }

    if options.includes(super::SECTION_INSTALLED_ITEMS) {
        // Omitted entirely for an empty listing
        if let Some(section) = sections::build_installed_items_section(&data.stock_item.installed_items)
        {
            html.push_str(section.render());
        }
    }

    html.push_str(&sections::build_report_footer(ctx));
    html.push_str("</body>\n</html>\n");

    html
}
