//! Leak detection
//!
//! Flags anomalous spending patterns in a classified transaction against a
//! caller-supplied history sequence. Two rules run in fixed order and the
//! later rule overwrites the earlier one when it actually fires; severities
//! are never merged or accumulated.
//!
//! The detector is stateless: history arrives per call in whatever order the
//! caller assembled it, and that order is load-bearing for the price-increase
//! rule under the default lookup policy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{HistoryEntry, LeakSeverity, LeakVerdict, TransactionRecord};

/// Which history entry to compare against for the price-increase rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceLookup {
    /// First entry in caller order that matches the merchant. This is the
    /// historical behavior and the default, even though the first entry is
    /// not necessarily the most recent price.
    #[default]
    FirstMatch,
    /// Last entry in caller order that matches the merchant.
    MostRecent,
}

/// Leak detection thresholds
#[derive(Debug, Clone)]
pub struct LeakConfig {
    /// Category that counts as small discretionary spend
    pub small_spend_category: String,
    /// Amounts strictly below this count as small
    pub small_spend_limit: f64,
    /// Prior small spends must exceed this count to flag (6th one triggers)
    pub small_spend_count_threshold: usize,
    /// Category checked for price increases
    pub subscription_category: String,
    /// History entry selection for the price comparison
    pub price_lookup: PriceLookup,
}

impl Default for LeakConfig {
    fn default() -> Self {
        Self {
            small_spend_category: "Food & Dining".to_string(),
            small_spend_limit: 500.0,
            small_spend_count_threshold: 5,
            subscription_category: "Subscriptions".to_string(),
            price_lookup: PriceLookup::default(),
        }
    }
}

/// Stateless detector applying the leak rules to one transaction.
pub struct LeakDetector {
    config: LeakConfig,
}

impl LeakDetector {
    pub fn new() -> Self {
        Self {
            config: LeakConfig::default(),
        }
    }

    pub fn with_config(config: LeakConfig) -> Self {
        Self { config }
    }

    /// Apply both leak rules to a classified transaction.
    ///
    /// Rule 1 (frequent small spend) runs first; rule 2 (subscription price
    /// increase) overwrites its verdict only when rule 2 itself flags a
    /// leak. A merchant match without a price increase leaves rule 1's
    /// verdict standing.
    pub fn detect(&self, tx: &TransactionRecord, history: &[HistoryEntry]) -> LeakVerdict {
        let mut verdict = LeakVerdict::none();

        // 1. Frequent small discretionary spend: pure count over history,
        // independent of ordering.
        if tx.category == self.config.small_spend_category
            && tx.amount < self.config.small_spend_limit
        {
            let prior_small = history
                .iter()
                .filter(|h| {
                    h.category == self.config.small_spend_category
                        && h.amount < self.config.small_spend_limit
                })
                .count();

            if prior_small > self.config.small_spend_count_threshold {
                debug!(prior_small, "Frequent small spend rule fired");
                verdict =
                    LeakVerdict::flagged(LeakSeverity::Medium, "Frequent small food purchases");
            }
        }

        // 2. Subscription price increase: compare against the entry picked
        // by the lookup policy.
        if tx.category == self.config.subscription_category {
            if let Some(merchant) = tx.merchant.as_deref() {
                let prior = match self.config.price_lookup {
                    PriceLookup::FirstMatch => history.iter().find(|h| h.merchant == merchant),
                    PriceLookup::MostRecent => {
                        history.iter().rev().find(|h| h.merchant == merchant)
                    }
                };

                if let Some(prev) = prior {
                    if tx.amount > prev.amount {
                        debug!(
                            merchant,
                            old_amount = prev.amount,
                            new_amount = tx.amount,
                            "Subscription price increase rule fired"
                        );
                        verdict = LeakVerdict::flagged(
                            LeakSeverity::High,
                            format!("Price increased from {} to {}", prev.amount, tx.amount),
                        );
                    }
                }
            }
        }

        verdict
    }
}

impl Default for LeakDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, PaymentChannel};
    use chrono::Utc;

    fn record(merchant: &str, amount: f64, category: &str) -> TransactionRecord {
        TransactionRecord {
            amount,
            merchant: Some(merchant.to_string()),
            category: category.to_string(),
            date: Utc::now(),
            direction: Direction::Debit,
            is_subscription: false,
            payment_channel: PaymentChannel::Unknown,
            leak: LeakVerdict::none(),
        }
    }

    fn food_history(n: usize) -> Vec<HistoryEntry> {
        (0..n)
            .map(|i| HistoryEntry::new(format!("Cafe {}", i), 120.0, "Food & Dining"))
            .collect()
    }

    #[test]
    fn test_small_spend_boundary_at_threshold() {
        let detector = LeakDetector::new();
        let tx = record("Corner Cafe", 150.0, "Food & Dining");

        // Exactly 5 prior entries: not a leak
        let verdict = detector.detect(&tx, &food_history(5));
        assert!(!verdict.is_leak);

        // 6 prior entries: leak at medium severity
        let verdict = detector.detect(&tx, &food_history(6));
        assert!(verdict.is_leak);
        assert_eq!(verdict.severity, Some(LeakSeverity::Medium));
        assert_eq!(verdict.reason.as_deref(), Some("Frequent small food purchases"));
    }

    #[test]
    fn test_small_spend_ignores_large_or_other_category_entries() {
        let detector = LeakDetector::new();
        let tx = record("Corner Cafe", 150.0, "Food & Dining");

        let mut history = food_history(5);
        // Neither a large food purchase nor other categories count
        history.push(HistoryEntry::new("Fancy Diner", 900.0, "Food & Dining"));
        history.push(HistoryEntry::new("Bus Pass", 120.0, "Transportation"));

        assert!(!detector.detect(&tx, &history).is_leak);
    }

    #[test]
    fn test_large_food_purchase_never_triggers_rule_one() {
        let detector = LeakDetector::new();
        let tx = record("Fancy Diner", 800.0, "Food & Dining");
        assert!(!detector.detect(&tx, &food_history(10)).is_leak);
    }

    #[test]
    fn test_price_increase_fires_high() {
        let detector = LeakDetector::new();
        let tx = record("Netflix", 249.0, "Subscriptions");
        let history = vec![HistoryEntry::new("Netflix", 199.0, "Subscriptions")];

        let verdict = detector.detect(&tx, &history);
        assert!(verdict.is_leak);
        assert_eq!(verdict.severity, Some(LeakSeverity::High));
        let reason = verdict.reason.unwrap();
        assert!(reason.contains("199"));
        assert!(reason.contains("249"));
    }

    #[test]
    fn test_price_unchanged_or_decreased_is_not_a_leak() {
        let detector = LeakDetector::new();
        let history = vec![HistoryEntry::new("Netflix", 199.0, "Subscriptions")];

        let same = record("Netflix", 199.0, "Subscriptions");
        assert!(!detector.detect(&same, &history).is_leak);

        let cheaper = record("Netflix", 149.0, "Subscriptions");
        assert!(!detector.detect(&cheaper, &history).is_leak);
    }

    #[test]
    fn test_first_match_policy_uses_first_entry_in_caller_order() {
        let detector = LeakDetector::new();
        let tx = record("Netflix", 249.0, "Subscriptions");
        // First entry is the higher price; the newer, lower price later in
        // the sequence is ignored under FirstMatch.
        let history = vec![
            HistoryEntry::new("Netflix", 299.0, "Subscriptions"),
            HistoryEntry::new("Netflix", 199.0, "Subscriptions"),
        ];
        assert!(!detector.detect(&tx, &history).is_leak);
    }

    #[test]
    fn test_most_recent_policy_uses_last_entry_in_caller_order() {
        let detector = LeakDetector::with_config(LeakConfig {
            price_lookup: PriceLookup::MostRecent,
            ..LeakConfig::default()
        });
        let tx = record("Netflix", 249.0, "Subscriptions");
        let history = vec![
            HistoryEntry::new("Netflix", 299.0, "Subscriptions"),
            HistoryEntry::new("Netflix", 199.0, "Subscriptions"),
        ];
        let verdict = detector.detect(&tx, &history);
        assert!(verdict.is_leak);
        assert!(verdict.reason.unwrap().contains("199"));
    }

    #[test]
    fn test_rule_two_overwrites_rule_one_when_both_fire() {
        // Contrived single-category config where a small spend is also a
        // subscription price increase; the later rule's verdict must win.
        let detector = LeakDetector::with_config(LeakConfig {
            small_spend_category: "Subscriptions".to_string(),
            subscription_category: "Subscriptions".to_string(),
            ..LeakConfig::default()
        });

        let tx = record("Netflix", 249.0, "Subscriptions");
        let mut history: Vec<HistoryEntry> = (0..6)
            .map(|i| HistoryEntry::new(format!("Sub {}", i), 100.0, "Subscriptions"))
            .collect();
        history.push(HistoryEntry::new("Netflix", 199.0, "Subscriptions"));

        let verdict = detector.detect(&tx, &history);
        assert!(verdict.is_leak);
        assert_eq!(verdict.severity, Some(LeakSeverity::High));
    }

    #[test]
    fn test_rule_one_survives_when_rule_two_matches_but_does_not_fire() {
        // Same contrived config, but history holds a higher prior price, so
        // rule 2 finds the merchant yet stays silent.
        let detector = LeakDetector::with_config(LeakConfig {
            small_spend_category: "Subscriptions".to_string(),
            subscription_category: "Subscriptions".to_string(),
            ..LeakConfig::default()
        });

        let tx = record("Netflix", 249.0, "Subscriptions");
        let mut history: Vec<HistoryEntry> = (0..6)
            .map(|i| HistoryEntry::new(format!("Sub {}", i), 100.0, "Subscriptions"))
            .collect();
        history.push(HistoryEntry::new("Netflix", 299.0, "Subscriptions"));

        let verdict = detector.detect(&tx, &history);
        assert!(verdict.is_leak);
        assert_eq!(verdict.severity, Some(LeakSeverity::Medium));
    }

    #[test]
    fn test_missing_merchant_skips_price_rule() {
        let detector = LeakDetector::new();
        let mut tx = record("Netflix", 249.0, "Subscriptions");
        tx.merchant = None;
        let history = vec![HistoryEntry::new("Netflix", 199.0, "Subscriptions")];
        assert!(!detector.detect(&tx, &history).is_leak);
    }

    #[test]
    fn test_empty_history_is_never_a_leak() {
        let detector = LeakDetector::new();
        let tx = record("Corner Cafe", 150.0, "Food & Dining");
        let verdict = detector.detect(&tx, &[]);
        assert_eq!(verdict, LeakVerdict::none());
    }
}
