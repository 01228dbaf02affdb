//! Core types shared by the parser and the ingestion pipeline

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Message shape of a signal feed post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalDialect {
    #[serde(rename = "mexc_spot_futures")]
    MexcSpotFutures,
    #[serde(rename = "funding_rate")]
    FundingRateSpread,
    #[serde(rename = "mexc_dex")]
    MexcDex,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SignalDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDialect::MexcSpotFutures => "mexc_spot_futures",
            SignalDialect::FundingRateSpread => "funding_rate",
            SignalDialect::MexcDex => "mexc_dex",
            SignalDialect::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SignalDialect::Unknown)
    }
}

impl fmt::Display for SignalDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade direction attached to a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Long,
    Short,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Long => "LONG",
            Position::Short => "SHORT",
        }
    }

    /// Case-insensitive `LONG` / `SHORT`
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("long") {
            Some(Position::Long)
        } else if label.eq_ignore_ascii_case("short") {
            Some(Position::Short)
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchanges quoted in funding-rate messages, in message order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Gate,
    Binance,
    Mexc,
    Ourbit,
    Bitget,
    Bybit,
}

impl Exchange {
    pub const ALL: [Exchange; 6] = [
        Exchange::Gate,
        Exchange::Binance,
        Exchange::Mexc,
        Exchange::Ourbit,
        Exchange::Bitget,
        Exchange::Bybit,
    ];

    /// Name as written in messages
    pub fn label(&self) -> &'static str {
        match self {
            Exchange::Gate => "GATE",
            Exchange::Binance => "BINANCE",
            Exchange::Mexc => "MEXC",
            Exchange::Ourbit => "OURBIT",
            Exchange::Bitget => "BITGET",
            Exchange::Bybit => "BYBIT",
        }
    }

    /// Prefix of the `{exchange}_rate` style field keys
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Exchange::Gate => "gate",
            Exchange::Binance => "binance",
            Exchange::Mexc => "mexc",
            Exchange::Ourbit => "ourbit",
            Exchange::Bitget => "bitget",
            Exchange::Bybit => "bybit",
        }
    }

    pub fn rate_key(&self) -> String {
        format!("{}_rate", self.key_prefix())
    }

    pub fn url_key(&self) -> String {
        format!("{}_url", self.key_prefix())
    }

    pub fn interval_key(&self) -> String {
        format!("{}_interval", self.key_prefix())
    }

    pub fn position_key(&self) -> String {
        format!("{}_position", self.key_prefix())
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Value of one extracted field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Decimal(Decimal),
    Bool(bool),
}

/// Kind tag of a [`FieldValue`], used by the per-dialect schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Decimal,
    Bool,
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Decimal(_) => FieldKind::Decimal,
            FieldValue::Bool(_) => FieldKind::Bool,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Flat field name -> value mapping produced by one successful parse.
///
/// A missing key means the field was not found. Only the parser inserts;
/// callers get a read-only view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractedFields {
    values: BTreeMap<String, FieldValue>,
}

impl ExtractedFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        match self.values.get(key) {
            Some(FieldValue::Decimal(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
