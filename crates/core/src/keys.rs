// crates/core/src/keys.rs
//! Composite-key rules for the metadata table and artifact bucket.

/// Partition key: `city#scenario`.
pub fn composite_key(city: &str, scenario: &str) -> String {
    format!("{city}#{scenario}")
}

/// Sort key: `outcome#statistic_type#facet_choice`.
pub fn sort_key(outcome: &str, statistic_type: &str, facet_choice: &str) -> String {
    format!("{outcome}#{statistic_type}#{facet_choice}")
}

/// Split a partition key back into (city, scenario).
///
/// Splits on the first `#` only. Returns `None` for keys without a
/// separator.
pub fn split_composite_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('#')
}

/// Normalize an artifact key: requests for the metadata sidecar are rewritten
/// to the primary plot artifact before lookup.
pub fn normalize_plot_key(key: &str) -> String {
    match key.strip_suffix("_metadata.json") {
        Some(stem) => format!("{stem}.json"),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key("C.12580", "cessation"), "C.12580#cessation");
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(
            sort_key("incidence", "mean.and.interval", "sex"),
            "incidence#mean.and.interval#sex"
        );
    }

    #[test]
    fn test_split_composite_key() {
        assert_eq!(
            split_composite_key("C.12580#cessation"),
            Some(("C.12580", "cessation"))
        );
        assert_eq!(split_composite_key("no-separator"), None);
        // Only the first separator splits
        assert_eq!(split_composite_key("a#b#c"), Some(("a", "b#c")));
    }

    #[test]
    fn test_normalize_plot_key_rewrites_metadata_suffix() {
        assert_eq!(
            normalize_plot_key("plots/jheem_real_plot_metadata.json"),
            "plots/jheem_real_plot.json"
        );
    }

    #[test]
    fn test_normalize_plot_key_leaves_primary_keys_alone() {
        assert_eq!(
            normalize_plot_key("plots/jheem_real_plot.json"),
            "plots/jheem_real_plot.json"
        );
        assert_eq!(normalize_plot_key("plots/data.csv"), "plots/data.csv");
    }
}
