//! Extraction rule set for free-text bank notifications
//!
//! An ordered list of compiled patterns, each carving an amount, a merchant,
//! and optionally a trailing date token out of a message. Rules are tried in
//! declaration order; the first rule that yields a parseable amount and a
//! merchant wins outright. Partial matches are never merged across rules.
//!
//! When no rule matches, a lenient fallback recovers just the amount. When
//! even that fails, extraction degrades to the zero/absent sentinel instead
//! of erroring; malformed bank messages are common and must not abort the
//! caller's flow.

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// Definition of a single extraction pattern before compilation.
///
/// Capture group 1 must be the amount, group 2 the merchant. Rules that set
/// `captures_date` expose group 3 as a raw date token.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub pattern: String,
    pub captures_date: bool,
}

impl RuleDef {
    pub fn new(pattern: impl Into<String>, captures_date: bool) -> Self {
        Self {
            pattern: pattern.into(),
            captures_date,
        }
    }
}

/// The built-in rule definitions, in priority order.
///
/// These mirror the message shapes of common bank notifications:
/// 1. "Rs. <amount> spent on <card> at <merchant> on <date>"
/// 2. "Debited: Rs. <amount> from A/c ... to <merchant>"
/// 3. "Transaction of Rs. <amount> made at <merchant>"
/// 4. "Paid Rs. <amount> to <merchant>"
///
/// The merchant group is terminated by a boundary word (on/for/using/via),
/// a sentence-ending period, or end of input.
pub fn default_rule_defs() -> Vec<RuleDef> {
    vec![
        RuleDef::new(
            r"(?i)(?:rs\.?|inr)\s*([\d,]+(?:\.\d{2})?)\s*(?:spent|debited|paid)\s*(?:on|using|via)?\s*(?:card|upi|wallet)?\s*.*?\s*(?:at|to)\s*([a-zA-Z0-9\s\.\-\&]+?)\s*(?:on|at)\s*(\d{2}[-/]\d{2}(?:[-/]\d{2,4})?)",
            true,
        ),
        RuleDef::new(
            r"(?i)debited[:\s]*rs\.?\s*([\d,]+(?:\.\d{2})?).*?to\s*([a-zA-Z0-9\s\.\-\&]+?)(?:\s+(?:on|for|using|via)\s+|\.|$)",
            false,
        ),
        RuleDef::new(
            r"(?i)transaction.*?rs\.?\s*([\d,]+(?:\.\d{2})?).*?at\s*([a-zA-Z0-9\s\.\-\&]+?)(?:\s+(?:on|for|using|via)\s+|\.|$)",
            false,
        ),
        RuleDef::new(
            r"(?i)paid\s*rs\.?\s*([\d,]+(?:\.\d{2})?)\s*to\s*([a-zA-Z0-9\s\.\-\&]+?)(?:\s+(?:on|for|using|via)\s+|\.|$)",
            false,
        ),
    ]
}

/// Amount-only fallback when no structural rule matches
const FALLBACK_PATTERN: &str = r"(?i)(?:rs\.?|inr)\s*([\d,]+(?:\.\d{2})?)";

/// A compiled extraction rule
#[derive(Debug)]
struct ExtractionRule {
    regex: Regex,
    captures_date: bool,
}

/// What the rule set recovered from a message
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Parsed amount; `0.0` when nothing usable was found
    pub amount: f64,
    /// Merchant label with surrounding whitespace trimmed; case and
    /// punctuation are preserved
    pub merchant: Option<String>,
    /// Trailing date token as captured, not parsed
    pub raw_date_token: Option<String>,
}

impl Extraction {
    fn empty() -> Self {
        Self {
            amount: 0.0,
            merchant: None,
            raw_date_token: None,
        }
    }
}

/// Ordered set of extraction rules plus the amount-only fallback.
///
/// Compiled once at startup and shared immutably across callers.
#[derive(Debug)]
pub struct ExtractionRuleSet {
    rules: Vec<ExtractionRule>,
    fallback: Regex,
}

impl ExtractionRuleSet {
    /// Compile the built-in rules.
    pub fn new() -> Result<Self> {
        Self::from_defs(&default_rule_defs())
    }

    /// Compile a caller-supplied rule list, preserving its order.
    pub fn from_defs(defs: &[RuleDef]) -> Result<Self> {
        let mut rules = Vec::with_capacity(defs.len());
        for def in defs {
            let regex = Regex::new(&def.pattern)?;
            // captures_len counts the implicit whole-match group 0
            let required = if def.captures_date { 4 } else { 3 };
            if regex.captures_len() < required {
                return Err(Error::InvalidRule(format!(
                    "pattern needs {} capture groups, has {}: {}",
                    required - 1,
                    regex.captures_len() - 1,
                    def.pattern
                )));
            }
            rules.push(ExtractionRule {
                regex,
                captures_date: def.captures_date,
            });
        }

        Ok(Self {
            rules,
            fallback: Regex::new(FALLBACK_PATTERN)?,
        })
    }

    /// Extract amount/merchant (and maybe a date token) from a message.
    ///
    /// Never fails: returns the zero/absent sentinel when nothing matches.
    pub fn extract(&self, text: &str) -> Extraction {
        let text = text.trim();

        for (i, rule) in self.rules.iter().enumerate() {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };

            // A structural match without a usable amount or merchant does
            // not win; the next rule gets its turn.
            let Some(amount) = caps.get(1).and_then(|m| parse_amount(m.as_str())) else {
                continue;
            };
            let Some(merchant) = caps.get(2).map(|m| m.as_str().trim().to_string()) else {
                continue;
            };

            let raw_date_token = if rule.captures_date {
                caps.get(3).map(|m| m.as_str().to_string())
            } else {
                None
            };

            debug!(rule = i, merchant = %merchant, amount, "Extraction rule matched");
            return Extraction {
                amount,
                merchant: Some(merchant),
                raw_date_token,
            };
        }

        // Lenient fallback: recover just the amount, ignore the merchant
        if let Some(amount) = self
            .fallback
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_amount(m.as_str()))
        {
            debug!(amount, "No rule matched; fallback recovered amount only");
            return Extraction {
                amount,
                merchant: None,
                raw_date_token: None,
            };
        }

        Extraction::empty()
    }
}

/// Strip thousands separators and parse as a non-negative amount.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a >= 0.0)
}
