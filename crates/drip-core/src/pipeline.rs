//! Pipeline glue: raw message text to a structured TransactionRecord
//!
//! Control flow: extraction rules pull (amount, merchant) out of the text,
//! then the category, subscription, and payment-channel classifiers run
//! independently on the merchant or full message, and the assembled record
//! optionally goes through the leak detector when the caller supplies a
//! history sequence.
//!
//! The pipeline holds only immutable compiled tables, so a single instance
//! can be shared across threads and invoked concurrently without locking.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::classify::{CategoryTaxonomy, SubscriptionMatcher};
use crate::error::Result;
use crate::extract::ExtractionRuleSet;
use crate::leak::LeakDetector;
use crate::models::{Direction, HistoryEntry, LeakVerdict, PaymentChannel, TransactionRecord};

/// The full extraction/classification/leak pipeline.
pub struct Pipeline {
    rules: ExtractionRuleSet,
    taxonomy: CategoryTaxonomy,
    subscriptions: SubscriptionMatcher,
    leaks: LeakDetector,
}

impl Pipeline {
    /// Build a pipeline with the built-in rules and taxonomies.
    ///
    /// The only fallible step is compiling the extraction rules; once built,
    /// processing never fails.
    ///
    /// Uses the fine-grained [`CategoryTaxonomy::default`], whose category
    /// names do not overlap the default [`LeakDetector`] categories, so
    /// `process_with_history` will not flag leaks on this pairing. For leak
    /// detection, wire [`CategoryTaxonomy::coarse`] (or a matching
    /// `LeakConfig`) via [`Pipeline::with_parts`].
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: ExtractionRuleSet::new()?,
            taxonomy: CategoryTaxonomy::default(),
            subscriptions: SubscriptionMatcher::default(),
            leaks: LeakDetector::new(),
        })
    }

    /// Build a pipeline from substituted parts.
    pub fn with_parts(
        rules: ExtractionRuleSet,
        taxonomy: CategoryTaxonomy,
        subscriptions: SubscriptionMatcher,
        leaks: LeakDetector,
    ) -> Self {
        Self {
            rules,
            taxonomy,
            subscriptions,
            leaks,
        }
    }

    /// Process a message into a record stamped with the current time.
    pub fn process(&self, text: &str) -> TransactionRecord {
        self.process_at(text, Utc::now())
    }

    /// Process a message with an explicit timestamp.
    ///
    /// Output is fully deterministic for a fixed `(text, date)`; `process`
    /// only differs by stamping `Utc::now()`.
    pub fn process_at(&self, text: &str, date: DateTime<Utc>) -> TransactionRecord {
        let extraction = self.rules.extract(text);

        let category = match extraction.merchant.as_deref() {
            Some(merchant) => self.taxonomy.classify(merchant).to_string(),
            None => self.taxonomy.default_category().to_string(),
        };
        let is_subscription = extraction
            .merchant
            .as_deref()
            .is_some_and(|m| self.subscriptions.is_subscription(m));

        if extraction.merchant.is_none() || extraction.amount == 0.0 {
            debug!(amount = extraction.amount, "Extraction degraded to sentinel values");
        }

        TransactionRecord {
            amount: extraction.amount,
            merchant: extraction.merchant,
            category,
            date,
            direction: Direction::infer(text),
            is_subscription,
            payment_channel: PaymentChannel::detect(text),
            leak: LeakVerdict::none(),
        }
    }

    /// Process a message and run leak detection against prior transactions.
    ///
    /// History is read-only and stays in whatever order the caller assembled
    /// it; that order matters for the price-increase rule.
    pub fn process_with_history(
        &self,
        text: &str,
        history: &[HistoryEntry],
    ) -> TransactionRecord {
        let mut record = self.process(text);
        record.leak = self.leaks.detect(&record, history);
        record
    }
}
