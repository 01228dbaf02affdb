//! Error types

use crate::types::SignalDialect;
use thiserror::Error;

/// Crate-level error
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Channel closed: {0}")]
    Channel(String),
}

/// Why a message produced no signal.
///
/// None of these escape [`crate::parser::SignalParser::parse`]; they are
/// logged and collapsed into an absent result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The dialect's anchor pattern did not match.
    #[error("{dialect}: required field `{field}` not found")]
    StructuralMismatch {
        dialect: SignalDialect,
        field: &'static str,
    },

    /// Anchor fields were found but a completeness rule failed.
    #[error("{dialect}: incomplete signal, missing `{field}`")]
    IncompleteExtraction {
        dialect: SignalDialect,
        field: &'static str,
    },

    /// A captured numeric token is not a decimal.
    #[error("field `{field}`: cannot parse {value:?} as decimal: {reason}")]
    Conversion {
        field: String,
        value: String,
        reason: String,
    },

    /// A field is present with the wrong type or is not part of the dialect.
    #[error("{dialect}: field `{field}` violates the schema")]
    SchemaViolation {
        dialect: SignalDialect,
        field: String,
    },

    #[error("no extractor for dialect {0}")]
    UnsupportedDialect(SignalDialect),
}

pub type Result<T> = std::result::Result<T, SignalError>;
