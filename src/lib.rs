//! Arbitrage Signal Parser
//!
//! Turns chat posts from arbitrage signal feeds into structured records.
//!
//! ## Architecture
//!
//! ```text
//! Source (TG) → Classifier → Dialect Extractor → Validator → Signal record → Sink
//!                                  ↑
//!                     URL / Flag / Decimal patterns
//! ```
//!
//! Everything from the classifier to the validator is a pure function of the
//! message text; see [`parser::SignalParser`].

pub mod config;
pub mod error;
pub mod ingester;
pub mod parser;
pub mod signals;
pub mod types;

pub use error::{ParseError, Result, SignalError};
pub use parser::{ParseOutcome, SignalParser};
pub use signals::Signal;
pub use types::{ExtractedFields, FieldValue, SignalDialect};

#[cfg(test)]
mod config_tests;
