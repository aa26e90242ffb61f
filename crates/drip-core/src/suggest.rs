//! Canned savings suggestions per spending category
//!
//! Pure lookup with no state; the table is substitutable for tests or
//! alternate copy decks.

/// Maps a category to a canned savings recommendation.
pub struct SuggestionEngine {
    entries: Vec<(String, String)>,
    fallback: String,
}

impl SuggestionEngine {
    pub fn new(entries: Vec<(String, String)>, fallback: impl Into<String>) -> Self {
        Self {
            entries,
            fallback: fallback.into(),
        }
    }

    /// Look up the suggestion for a category.
    ///
    /// Exact category-name match; anything unmapped gets the generic
    /// fallback. Total, never fails.
    pub fn suggest(&self, category: &str) -> &str {
        self.entries
            .iter()
            .find(|(cat, _)| cat == category)
            .map(|(_, text)| text.as_str())
            .unwrap_or(&self.fallback)
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(
            vec![
                (
                    "Food & Dining".to_string(),
                    "Cook at home or use a coffee subscription to save up to 40%.".to_string(),
                ),
                (
                    "Subscriptions".to_string(),
                    "Check for family plans or annual billing discounts.".to_string(),
                ),
                (
                    "Transportation".to_string(),
                    "Consider a monthly pass or carpooling.".to_string(),
                ),
            ],
            "Track this expense to see if it's necessary.",
        )
    }
}
