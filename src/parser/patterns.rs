//! Field-level pattern objects
//!
//! Each dialect extractor is a composition of these. They are compiled once
//! and hold no mutable state, so a single instance can be shared freely.

use crate::error::{ParseError, Result};
use crate::types::{ExtractedFields, Position};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const AFFIRMATIVE_GLYPH: char = '✅';
pub const NEGATIVE_GLYPH: char = '❌';

/// Number token as written in signal messages: digits and dots
pub(crate) const NUMBER: &str = r"[0-9.]+";

/// Parse a captured numeric token, keeping its sign.
///
/// Tokens beyond `Decimal` precision are rejected, including non-zero
/// values that would round to zero.
pub fn to_decimal(field: &str, raw: &str) -> std::result::Result<Decimal, ParseError> {
    let conversion = |reason: String| ParseError::Conversion {
        field: field.to_string(),
        value: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let value = Decimal::from_str(unsigned).map_err(|e| conversion(e.to_string()))?;
    if value.is_zero() && unsigned.chars().any(|c| matches!(c, '1'..='9')) {
        return Err(conversion("value underflows decimal precision".to_string()));
    }
    Ok(value)
}

/// Finds every `http(s)://` link in a message
#[derive(Debug, Clone)]
pub struct UrlExtractor {
    re: Regex,
}

impl UrlExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            re: Regex::new(r"https?://\S+")?,
        })
    }

    /// All links in first-occurrence order, verbatim and not deduplicated.
    pub fn extract<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.re.find_iter(text).map(|m| m.as_str()).collect()
    }
}

/// `Label: ✅` / `Label: ❌` marker for one label
#[derive(Debug, Clone)]
pub struct FlagPattern {
    re: Regex,
}

impl FlagPattern {
    pub fn new(label: &str) -> Result<Self> {
        let pattern = format!(
            r"(?i){}:\s*([{}{}])",
            regex::escape(label),
            AFFIRMATIVE_GLYPH,
            NEGATIVE_GLYPH
        );
        Ok(Self {
            re: Regex::new(&pattern)?,
        })
    }

    /// `Some(true)` for ✅, `Some(false)` for ❌, `None` when the label is
    /// not followed by either glyph.
    pub fn find(&self, text: &str) -> Option<bool> {
        self.re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|glyph| glyph.as_str().starts_with(AFFIRMATIVE_GLYPH))
    }

    /// Lossy decode: anything but an explicit ✅ is false.
    pub fn is_set(&self, text: &str) -> bool {
        self.find(text).unwrap_or(false)
    }
}

/// One-off lossy flag lookup.
pub fn parse_boolean_flag(text: &str, label: &str) -> bool {
    FlagPattern::new(label)
        .map(|flag| flag.is_set(text))
        .unwrap_or(false)
}

/// A decimal captured by a labeled pattern (capture group 1)
#[derive(Debug, Clone)]
pub struct DecimalField {
    key: &'static str,
    re: Regex,
}

impl DecimalField {
    pub fn new(key: &'static str, pattern: &str) -> Result<Self> {
        Ok(Self {
            key,
            re: Regex::new(pattern)?,
        })
    }

    /// `Ok(None)` when the label is absent, `Err` when the token is not a
    /// decimal.
    pub fn find(&self, text: &str) -> std::result::Result<Option<Decimal>, ParseError> {
        match self.re.captures(text).and_then(|caps| caps.get(1)) {
            Some(token) => to_decimal(self.key, token.as_str()).map(Some),
            None => Ok(None),
        }
    }

    /// Look the value up and store it under this field's key.
    pub fn apply(
        &self,
        text: &str,
        fields: &mut ExtractedFields,
    ) -> std::result::Result<(), ParseError> {
        if let Some(value) = self.find(text)? {
            fields.insert(self.key, value);
        }
        Ok(())
    }
}

/// Standalone `LONG` / `SHORT` word anywhere in the text
#[derive(Debug, Clone)]
pub struct PositionPattern {
    short: Regex,
    long: Regex,
}

impl PositionPattern {
    pub fn new() -> Result<Self> {
        Ok(Self {
            short: Regex::new(r"(?i)\bSHORT\b")?,
            long: Regex::new(r"(?i)\bLONG\b")?,
        })
    }

    /// SHORT wins when both words appear.
    pub fn find(&self, text: &str) -> Option<Position> {
        if self.short.is_match(text) {
            Some(Position::Short)
        } else if self.long.is_match(text) {
            Some(Position::Long)
        } else {
            None
        }
    }
}

/// Substring rule mapping a link to a field key
#[derive(Debug, Clone, Copy)]
pub struct UrlRule {
    key: &'static str,
    contains: &'static str,
    excludes: Option<&'static str>,
}

impl UrlRule {
    pub const fn new(key: &'static str, contains: &'static str) -> Self {
        Self {
            key,
            contains,
            excludes: None,
        }
    }

    pub const fn excluding(self, excludes: &'static str) -> Self {
        Self {
            excludes: Some(excludes),
            ..self
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        url.contains(self.contains) && !self.excludes.is_some_and(|ex| url.contains(ex))
    }
}

/// Ordered URL rules.
///
/// A link goes to the first rule it matches. Links are applied in message
/// order, so the last link of a category overwrites earlier ones.
#[derive(Debug, Clone, Copy)]
pub struct UrlClassifier {
    rules: &'static [UrlRule],
}

impl UrlClassifier {
    pub const fn new(rules: &'static [UrlRule]) -> Self {
        Self { rules }
    }

    pub fn classify(&self, url: &str) -> Option<&'static str> {
        self.rules.iter().find(|rule| rule.matches(url)).map(|rule| rule.key)
    }

    pub fn apply(&self, urls: &[&str], fields: &mut ExtractedFields) {
        for url in urls {
            if let Some(key) = self.classify(url) {
                fields.insert(key, *url);
            }
        }
    }
}
