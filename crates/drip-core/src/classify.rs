//! Keyword-taxonomy classifiers
//!
//! Three independent classifiers run over the extracted merchant or the full
//! message text:
//! - category: ordered category -> keyword table, first match wins
//! - subscription: boolean OR over a merchant keyword set
//! - payment channel: tiered full-message lookup (UPI > Card > Wallet)
//!
//! All tables are immutable after construction and safe to share across
//! threads. Every classifier is pure and total; there is no error path.

use tracing::debug;

use crate::models::PaymentChannel;

/// Fixed mapping from spending category to merchant keywords, evaluated in
/// declaration order.
pub struct CategoryTaxonomy {
    entries: Vec<(String, Vec<String>)>,
    default_category: String,
}

impl CategoryTaxonomy {
    /// Build a taxonomy from ordered (category, keywords) pairs.
    ///
    /// Keywords are lower-cased on the way in; declaration order decides
    /// ties when a merchant matches several categories.
    pub fn new(entries: Vec<(String, Vec<String>)>, default_category: impl Into<String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(cat, kws)| (cat, kws.into_iter().map(|k| k.to_lowercase()).collect()))
            .collect();
        Self {
            entries,
            default_category: default_category.into(),
        }
    }

    /// The coarse taxonomy used by the leak-detection flow.
    pub fn coarse() -> Self {
        Self::new(
            vec![
                (
                    "Food & Dining".to_string(),
                    str_vec(&["starbucks", "coffee", "mcdonalds", "swiggy", "zomato"]),
                ),
                (
                    "Transportation".to_string(),
                    str_vec(&["uber", "ola", "fuel", "petrol"]),
                ),
                (
                    "Subscriptions".to_string(),
                    str_vec(&["netflix", "spotify", "prime", "apple"]),
                ),
                (
                    "Shopping".to_string(),
                    str_vec(&["amazon", "flipkart", "myntra"]),
                ),
            ],
            "General",
        )
    }

    /// Classify a merchant label into a category.
    ///
    /// Case-insensitive substring search over each category's keywords, in
    /// declaration order; the first category with a hit wins. No match
    /// yields the default category.
    pub fn classify(&self, merchant: &str) -> &str {
        let merchant_lower = merchant.to_lowercase();
        for (category, keywords) in &self.entries {
            if keywords.iter().any(|kw| merchant_lower.contains(kw)) {
                debug!(merchant, category = %category, "Category keyword matched");
                return category;
            }
        }
        &self.default_category
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }
}

impl Default for CategoryTaxonomy {
    /// The fine-grained taxonomy used when parsing incoming notifications.
    fn default() -> Self {
        Self::new(
            vec![
                (
                    "Food".to_string(),
                    str_vec(&[
                        "swiggy",
                        "zomato",
                        "restaurant",
                        "cafe",
                        "burger",
                        "pizza",
                        "food",
                        "dining",
                    ]),
                ),
                (
                    "Transport".to_string(),
                    str_vec(&[
                        "uber", "ola", "rapido", "fuel", "petrol", "shell", "bpcl", "hpcl", "metro",
                    ]),
                ),
                (
                    "Shopping".to_string(),
                    str_vec(&[
                        "amazon", "flipkart", "myntra", "zara", "h&m", "retail", "store", "mart",
                        "mall",
                    ]),
                ),
                (
                    "Entertainment".to_string(),
                    str_vec(&[
                        "netflix",
                        "pvr",
                        "inox",
                        "movie",
                        "cinema",
                        "bookmyshow",
                        "hotstar",
                        "spotify",
                    ]),
                ),
                (
                    "Bills".to_string(),
                    str_vec(&[
                        "electricity",
                        "water",
                        "gas",
                        "bill",
                        "recharge",
                        "jio",
                        "airtel",
                        "vi",
                        "bescom",
                    ]),
                ),
                (
                    "Groceries".to_string(),
                    str_vec(&[
                        "bigbasket",
                        "blinkit",
                        "zepto",
                        "dmart",
                        "reliance fresh",
                        "grocery",
                    ]),
                ),
            ],
            "General",
        )
    }
}

/// Flags merchants that represent recurring billing.
///
/// Scoped to the merchant label only, never the whole message; no amount
/// heuristic is applied.
pub struct SubscriptionMatcher {
    keywords: Vec<String>,
}

impl SubscriptionMatcher {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_subscription(&self, merchant: &str) -> bool {
        let merchant_lower = merchant.to_lowercase();
        self.keywords.iter().any(|kw| merchant_lower.contains(kw))
    }
}

impl Default for SubscriptionMatcher {
    fn default() -> Self {
        Self::new(str_vec(&[
            "netflix",
            "spotify",
            "amazon prime",
            "hotstar",
            "youtube",
            "apple",
            "google one",
            "microsoft",
            "adobe",
            "gym",
            "fitness",
            "subscription",
        ]))
    }
}

impl PaymentChannel {
    /// Detect the payment channel from the lower-cased full message.
    ///
    /// Fixed tier priority: UPI, then card-family words, then wallet-family
    /// words. Only the first matching tier applies.
    pub fn detect(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("upi") {
            Self::Upi
        } else if lower.contains("card") || lower.contains("debit") || lower.contains("credit") {
            Self::Card
        } else if lower.contains("wallet") || lower.contains("paytm") || lower.contains("phonepe")
        {
            Self::Wallet
        } else {
            Self::Unknown
        }
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
