//! Per-dialect field schema and completeness gate

use crate::error::ParseError;
use crate::types::{Exchange, ExtractedFields, FieldKind, SignalDialect};

const SPOT_FUTURES_FIELDS: &[(&str, FieldKind)] = &[
    ("coin_name", FieldKind::Text),
    ("position", FieldKind::Text),
    ("spread", FieldKind::Decimal),
    ("mexc_spot_price", FieldKind::Decimal),
    ("mexc_futures_price", FieldKind::Decimal),
    ("spot_url", FieldKind::Text),
    ("futures_url", FieldKind::Text),
    ("dex_url", FieldKind::Text),
    ("deposit_enabled", FieldKind::Bool),
    ("withdrawal_enabled", FieldKind::Bool),
];

const FUNDING_RATE_FIELDS: &[(&str, FieldKind)] = &[
    ("coin_name", FieldKind::Text),
    ("hourly_profit", FieldKind::Decimal),
];

const EXCHANGE_QUOTE_FIELDS: &[(&str, FieldKind)] = &[
    ("rate", FieldKind::Decimal),
    ("url", FieldKind::Text),
    ("interval", FieldKind::Text),
    ("position", FieldKind::Text),
];

const MEXC_DEX_FIELDS: &[(&str, FieldKind)] = &[
    ("coin_name", FieldKind::Text),
    ("spread_percent", FieldKind::Decimal),
    ("mexc_price", FieldKind::Decimal),
    ("dex_price", FieldKind::Decimal),
    ("mexc_url", FieldKind::Text),
    ("dexscreener_url", FieldKind::Text),
    ("max_size_usd", FieldKind::Decimal),
    ("deposit_enabled", FieldKind::Bool),
    ("withdrawal_enabled", FieldKind::Bool),
    ("deposit_url", FieldKind::Text),
    ("withdrawal_url", FieldKind::Text),
    ("token_contract", FieldKind::Text),
    ("token_chain", FieldKind::Text),
];

/// Fields whose absence means the message is not this dialect at all
fn anchor_fields(dialect: SignalDialect) -> &'static [&'static str] {
    match dialect {
        SignalDialect::MexcSpotFutures => &["coin_name"],
        SignalDialect::FundingRateSpread => &["coin_name", "hourly_profit"],
        SignalDialect::MexcDex => &["coin_name", "spread_percent"],
        SignalDialect::Unknown => &[],
    }
}

/// Fields also needed before a signal is accepted
fn completeness_fields(dialect: SignalDialect) -> &'static [&'static str] {
    match dialect {
        SignalDialect::MexcDex => &["mexc_price", "dex_price"],
        _ => &[],
    }
}

/// Declared type of a field, `None` if the key is not part of the dialect.
pub fn field_kind(dialect: SignalDialect, key: &str) -> Option<FieldKind> {
    let lookup = |table: &[(&str, FieldKind)], key: &str| {
        table.iter().find(|(name, _)| *name == key).map(|(_, kind)| *kind)
    };

    match dialect {
        SignalDialect::MexcSpotFutures => lookup(SPOT_FUTURES_FIELDS, key),
        SignalDialect::MexcDex => lookup(MEXC_DEX_FIELDS, key),
        SignalDialect::FundingRateSpread => lookup(FUNDING_RATE_FIELDS, key).or_else(|| {
            Exchange::ALL.iter().find_map(|exchange| {
                key.strip_prefix(exchange.key_prefix())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .and_then(|suffix| lookup(EXCHANGE_QUOTE_FIELDS, suffix))
            })
        }),
        SignalDialect::Unknown => None,
    }
}

/// Every key a dialect may produce, in documented order
pub fn field_keys(dialect: SignalDialect) -> Vec<String> {
    let names = |table: &[(&str, FieldKind)]| -> Vec<String> {
        table.iter().map(|(name, _)| name.to_string()).collect()
    };

    match dialect {
        SignalDialect::MexcSpotFutures => names(SPOT_FUTURES_FIELDS),
        SignalDialect::MexcDex => names(MEXC_DEX_FIELDS),
        SignalDialect::FundingRateSpread => {
            let mut keys = names(FUNDING_RATE_FIELDS);
            for exchange in Exchange::ALL {
                for (suffix, _) in EXCHANGE_QUOTE_FIELDS {
                    keys.push(format!("{}_{}", exchange.key_prefix(), suffix));
                }
            }
            keys
        }
        SignalDialect::Unknown => Vec::new(),
    }
}

/// Accept or reject an extraction.
///
/// Checks run in order: every key typed per the schema, anchor fields
/// present, completeness fields present.
pub fn validate(dialect: SignalDialect, fields: &ExtractedFields) -> Result<(), ParseError> {
    if !dialect.is_known() {
        return Err(ParseError::UnsupportedDialect(dialect));
    }

    for (key, value) in fields.iter() {
        if field_kind(dialect, key) != Some(value.kind()) {
            return Err(ParseError::SchemaViolation {
                dialect,
                field: key.to_string(),
            });
        }
    }

    if let Some(field) = anchor_fields(dialect).iter().copied().find(|f| !fields.contains(f)) {
        return Err(ParseError::StructuralMismatch { dialect, field });
    }

    if let Some(field) = completeness_fields(dialect).iter().copied().find(|f| !fields.contains(f)) {
        return Err(ParseError::IncompleteExtraction { dialect, field });
    }

    Ok(())
}
