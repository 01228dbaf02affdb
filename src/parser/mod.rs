//! Signal message parsing
//!
//! Classifies a message into one of the feed dialects, runs that dialect's
//! field extractor and gates the result through the validator. Parsing is a
//! pure function of the input text: a compiled [`SignalParser`] is immutable
//! and can be shared across tasks behind an `Arc`.

pub mod classifier;
pub mod funding_rate;
pub mod mexc_dex;
pub mod patterns;
pub mod spot_futures;
pub mod validate;

#[cfg(test)]
mod tests;

pub use classifier::classify;
pub use funding_rate::FundingRateExtractor;
pub use mexc_dex::MexcDexExtractor;
pub use patterns::{parse_boolean_flag, FlagPattern, UrlExtractor};
pub use spot_futures::SpotFuturesExtractor;
pub use validate::{field_keys, field_kind, validate};

use crate::error::{ParseError, Result};
use crate::types::{ExtractedFields, SignalDialect};
use serde::Serialize;

const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Field extraction for one dialect
pub trait DialectExtractor: Send + Sync {
    fn dialect(&self) -> SignalDialect;

    /// Run every field pattern over the text.
    ///
    /// Only conversion errors fail here; required-field checks belong to
    /// [`validate`].
    fn extract(&self, text: &str) -> std::result::Result<ExtractedFields, ParseError>;
}

/// Result of parsing one message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub dialect: SignalDialect,
    pub fields: Option<ExtractedFields>,
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        self.fields.is_some()
    }
}

/// Compiled classifier + extractors for all dialects
pub struct SignalParser {
    urls: UrlExtractor,
    spot_futures: SpotFuturesExtractor,
    funding_rate: FundingRateExtractor,
    mexc_dex: MexcDexExtractor,
    preview_chars: usize,
}

impl SignalParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            urls: UrlExtractor::new()?,
            spot_futures: SpotFuturesExtractor::new()?,
            funding_rate: FundingRateExtractor::new()?,
            mexc_dex: MexcDexExtractor::new()?,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        })
    }

    /// Number of message characters included in failure logs
    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    pub fn classify(&self, text: &str) -> SignalDialect {
        classify(text)
    }

    pub fn extract_urls<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.urls.extract(text)
    }

    fn extractor(&self, dialect: SignalDialect) -> Option<&dyn DialectExtractor> {
        match dialect {
            SignalDialect::MexcSpotFutures => Some(&self.spot_futures),
            SignalDialect::FundingRateSpread => Some(&self.funding_rate),
            SignalDialect::MexcDex => Some(&self.mexc_dex),
            SignalDialect::Unknown => None,
        }
    }

    /// Extract and validate as the given dialect, reporting why on failure.
    pub fn extract(
        &self,
        dialect: SignalDialect,
        text: &str,
    ) -> std::result::Result<ExtractedFields, ParseError> {
        let extractor = self
            .extractor(dialect)
            .ok_or(ParseError::UnsupportedDialect(dialect))?;
        let fields = extractor.extract(text)?;
        validate(dialect, &fields)?;
        Ok(fields)
    }

    /// Classify and extract. Never fails: a rejected message yields
    /// `fields: None` and a log line.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let dialect = self.classify(text);
        if !dialect.is_known() {
            tracing::trace!("Message matches no signal dialect");
            return ParseOutcome {
                dialect,
                fields: None,
            };
        }

        let fields = match self.extract(dialect, text) {
            Ok(fields) => Some(fields),
            Err(e @ ParseError::Conversion { .. }) | Err(e @ ParseError::SchemaViolation { .. }) => {
                tracing::warn!(
                    dialect = %dialect,
                    error = %e,
                    message_preview = %self.preview(text),
                    "Error parsing signal"
                );
                None
            }
            Err(e) => {
                tracing::debug!(dialect = %dialect, reason = %e, "Signal rejected");
                None
            }
        };

        ParseOutcome { dialect, fields }
    }

    fn preview(&self, text: &str) -> String {
        text.chars().take(self.preview_chars).collect()
    }
}
