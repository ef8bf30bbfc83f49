// Unit tests for ReportOptions validation and cache keys

use stock_report::report::{ReportOptions, KNOWN_SECTIONS};

fn options(sections: &[&str]) -> ReportOptions {
    ReportOptions {
        include_sections: Some(sections.iter().map(|s| s.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ReportOptions::default();
        assert!(options.include_sections.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_known_sections() {
        for name in KNOWN_SECTIONS {
            assert!(options(&[name]).validate().is_ok());
        }
        assert!(options(&["summary", "test_results", "installed_items"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_unknown_section() {
        let err = options(&["orderbook"]).validate().unwrap_err();
        assert!(err.contains("unknown report section 'orderbook'"));
        assert!(err.contains("test_results"));
    }

    #[test]
    fn test_validate_empty_list_means_all() {
        let options = options(&[]);
        assert!(options.validate().is_ok());
        assert!(options.includes("summary"));
        assert!(options.includes("installed_items"));
    }

    #[test]
    fn test_includes_filters_sections() {
        let options = options(&["test_results"]);
        assert!(options.includes("test_results"));
        assert!(!options.includes("summary"));
        assert!(!options.includes("installed_items"));
    }

    #[test]
    fn test_cache_key_suffix_sorted_and_deterministic() {
        let forward = options(&["test_results", "summary"]);
        let backward = options(&["summary", "test_results"]);

        assert_eq!(forward.to_cache_key_suffix(), backward.to_cache_key_suffix());
        assert_eq!(
            forward.to_cache_key_suffix(),
            "sections:summary,test_results"
        );
    }

    #[test]
    fn test_cache_key_defaults_to_all() {
        assert_eq!(ReportOptions::default().to_cache_key_suffix(), "sections:all");
        assert_eq!(options(&[]).to_cache_key_suffix(), "sections:all");
    }

    #[test]
    fn test_cache_key_includes_stock_item_pk() {
        let key = options(&["summary"]).to_cache_key(42);
        assert_eq!(key, "42:sections:summary");
    }
}
