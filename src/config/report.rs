//! Report Generation Settings
//!
//! Settings loaded from environment variables with sensible defaults, so the
//! crate can run unconfigured inside tests and development setups.

/// Default cache lifetime for generated reports
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Default strftime pattern for result dates
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Report generation settings
///
/// Loaded once at startup via [`ReportConfig::from_env`], or constructed
/// directly. `Default` mirrors the unconfigured environment.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Lifetime of cached reports, in seconds
    pub cache_ttl_secs: u64,

    /// strftime pattern applied to result dates
    pub date_format: String,

    /// Display recorder full names instead of usernames
    pub display_full_names: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            display_full_names: false,
        }
    }
}

impl ReportConfig {
    /// Loads settings from environment variables
    ///
    /// Reads `STOCK_REPORT_CACHE_TTL_SECS`, `STOCK_REPORT_DATE_FORMAT` and
    /// `STOCK_REPORT_DISPLAY_FULL_NAMES`. Unset variables fall back to
    /// defaults; set but invalid values return `Err` with a message naming
    /// the variable.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(ttl) = std::env::var("STOCK_REPORT_CACHE_TTL_SECS") {
            config.cache_ttl_secs = ttl.trim().parse::<u64>().map_err(|_| {
                format!(
                    "STOCK_REPORT_CACHE_TTL_SECS must be a non-negative integer, got '{}'",
                    ttl
                )
            })?;
        }

        if let Ok(format) = std::env::var("STOCK_REPORT_DATE_FORMAT") {
            let format = format.trim();
            if format.is_empty() {
                return Err("STOCK_REPORT_DATE_FORMAT is empty after trimming whitespace".into());
            }
            config.date_format = format.to_string();
        }

        if let Ok(flag) = std::env::var("STOCK_REPORT_DISPLAY_FULL_NAMES") {
            config.display_full_names = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(format!(
                        "STOCK_REPORT_DISPLAY_FULL_NAMES must be a boolean, got '{}'",
                        other
                    ))
                }
            };
        }

        Ok(config)
    }
}
