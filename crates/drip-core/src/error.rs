//! Error types for drip

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid extraction rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, Error>;
