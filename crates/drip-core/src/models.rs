//! Domain models for drip

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of money movement, inferred from message wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Infer direction from the full message text.
    ///
    /// A message is a debit iff it mentions "debit" anywhere; everything
    /// else is treated as a credit, including wording like "paid to".
    pub fn infer(message: &str) -> Self {
        if message.to_lowercase().contains("debit") {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment channel used for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentChannel {
    Upi,
    Card,
    Wallet,
    #[default]
    Unknown,
}

impl PaymentChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Card => "card",
            Self::Wallet => "wallet",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for PaymentChannel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "wallet" => Ok(Self::Wallet),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown payment channel: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a flagged leak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeakSeverity {
    Medium,
    High,
}

impl LeakSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl std::str::FromStr for LeakSeverity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown leak severity: {}", s)),
        }
    }
}

impl std::fmt::Display for LeakSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict produced by the leak detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LeakVerdict {
    pub is_leak: bool,
    pub severity: Option<LeakSeverity>,
    pub reason: Option<String>,
}

impl LeakVerdict {
    /// The no-leak verdict
    pub fn none() -> Self {
        Self::default()
    }

    pub fn flagged(severity: LeakSeverity, reason: impl Into<String>) -> Self {
        Self {
            is_leak: true,
            severity: Some(severity),
            reason: Some(reason.into()),
        }
    }
}

/// A prior transaction supplied by the caller for leak detection.
///
/// Read-only input; the caller decides the ordering of the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub merchant: String,
    pub amount: f64,
    pub category: String,
}

impl HistoryEntry {
    pub fn new(merchant: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            merchant: merchant.into(),
            amount,
            category: category.into(),
        }
    }
}

/// Structured transaction produced by the pipeline.
///
/// Owned by the caller after return; all fields are computed fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Extracted amount; `0.0` means no usable amount was found
    pub amount: f64,
    /// Extracted merchant label; `None` when extraction failed
    pub merchant: Option<String>,
    /// Category from the taxonomy, `"General"` when nothing matched
    pub category: String,
    /// Processing time; date tokens in the message are not parsed into this
    pub date: DateTime<Utc>,
    pub direction: Direction,
    pub is_subscription: bool,
    pub payment_channel: PaymentChannel,
    pub leak: LeakVerdict,
}

impl TransactionRecord {
    /// Whether extraction recovered a usable amount.
    ///
    /// Callers are expected to ignore messages where this is false rather
    /// than persisting a zero-value transaction.
    pub fn is_extracted(&self) -> bool {
        self.amount > 0.0
    }
}
