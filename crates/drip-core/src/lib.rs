//! Drip Core Library
//!
//! Shared functionality for the drip spending-leak detection tool:
//! - Ordered extraction rules for free-text bank notifications
//! - Keyword-taxonomy classifiers (category, subscription, payment channel)
//! - Leak detection against a caller-supplied transaction history
//! - Canned savings suggestions per category
//!
//! The pipeline is a pure, synchronous transform over
//! `(message, history) -> TransactionRecord`. Persistence, HTTP routing,
//! and dashboard aggregation live in external callers.

pub mod classify;
pub mod error;
pub mod extract;
pub mod leak;
pub mod models;
pub mod pipeline;
pub mod suggest;

pub use classify::{CategoryTaxonomy, SubscriptionMatcher};
pub use error::{Error, Result};
pub use extract::{Extraction, ExtractionRuleSet, RuleDef};
pub use leak::{LeakConfig, LeakDetector, PriceLookup};
pub use models::{
    Direction, HistoryEntry, LeakSeverity, LeakVerdict, PaymentChannel, TransactionRecord,
};
pub use pipeline::Pipeline;
pub use suggest::SuggestionEngine;
