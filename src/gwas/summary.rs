use serde::Serialize;

/// A disease needs strictly more associations than this to count in the summary.
pub const SUMMARY_MIN_ASSOCIATIONS: usize = 9;

/// Headline numbers for a catalog or one of its subsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    /// Number of association rows.
    pub associations: usize,
    /// Number of distinct `DISEASE/TRAIT` values.
    pub diseases: usize,
    /// Diseases with more than [`SUMMARY_MIN_ASSOCIATIONS`] rows.
    pub diseases_over_threshold: usize,
}
