//! Typed signal records built from extracted fields
//!
//! These mirror the storage schema consumed downstream: optional columns stay
//! `Option`, transfer flags default to enabled when the message omits them.

use crate::error::ParseError;
use crate::types::{Exchange, ExtractedFields, Position, SignalDialect};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MexcSpotFuturesSignal {
    pub coin_name: String,
    pub position: Option<Position>,
    pub spread: Option<Decimal>,
    pub mexc_spot_price: Option<Decimal>,
    pub mexc_futures_price: Option<Decimal>,
    pub spot_url: Option<String>,
    pub futures_url: Option<String>,
    pub dex_url: Option<String>,
    pub deposit_enabled: bool,
    pub withdrawal_enabled: bool,
}

/// Funding rate of one exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub rate: Decimal,
    pub url: String,
    pub interval: String,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRateSignal {
    pub coin_name: String,
    pub hourly_profit: Decimal,
    pub quotes: BTreeMap<Exchange, ExchangeQuote>,
}

impl FundingRateSignal {
    pub fn quote(&self, exchange: Exchange) -> Option<&ExchangeQuote> {
        self.quotes.get(&exchange)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MexcDexSignal {
    pub coin_name: String,
    pub spread_percent: Decimal,
    pub mexc_price: Decimal,
    pub dex_price: Decimal,
    pub mexc_url: Option<String>,
    pub dexscreener_url: Option<String>,
    pub max_size_usd: Option<Decimal>,
    pub deposit_enabled: bool,
    pub withdrawal_enabled: bool,
    pub deposit_url: Option<String>,
    pub withdrawal_url: Option<String>,
    pub token_contract: Option<String>,
    pub token_chain: Option<String>,
}

/// A parsed signal of any dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    MexcSpotFutures(MexcSpotFuturesSignal),
    FundingRate(FundingRateSignal),
    MexcDex(MexcDexSignal),
}

impl Signal {
    /// Build the typed record for an accepted extraction.
    pub fn from_fields(dialect: SignalDialect, fields: &ExtractedFields) -> Result<Self, ParseError> {
        let reader = FieldReader { dialect, fields };

        match dialect {
            SignalDialect::MexcSpotFutures => Ok(Signal::MexcSpotFutures(MexcSpotFuturesSignal {
                coin_name: reader.required_text("coin_name")?,
                position: reader.position("position"),
                spread: fields.decimal("spread"),
                mexc_spot_price: fields.decimal("mexc_spot_price"),
                mexc_futures_price: fields.decimal("mexc_futures_price"),
                spot_url: reader.text("spot_url"),
                futures_url: reader.text("futures_url"),
                dex_url: reader.text("dex_url"),
                deposit_enabled: fields.flag("deposit_enabled").unwrap_or(true),
                withdrawal_enabled: fields.flag("withdrawal_enabled").unwrap_or(true),
            })),
            SignalDialect::FundingRateSpread => {
                let mut quotes = BTreeMap::new();
                for exchange in Exchange::ALL {
                    let rate = fields.decimal(&exchange.rate_key());
                    let url = reader.text(&exchange.url_key());
                    let interval = reader.text(&exchange.interval_key());
                    if let (Some(rate), Some(url), Some(interval)) = (rate, url, interval) {
                        quotes.insert(
                            exchange,
                            ExchangeQuote {
                                rate,
                                url,
                                interval,
                                position: reader.position(&exchange.position_key()),
                            },
                        );
                    }
                }

                Ok(Signal::FundingRate(FundingRateSignal {
                    coin_name: reader.required_text("coin_name")?,
                    hourly_profit: reader.required_decimal("hourly_profit")?,
                    quotes,
                }))
            }
            SignalDialect::MexcDex => Ok(Signal::MexcDex(MexcDexSignal {
                coin_name: reader.required_text("coin_name")?,
                spread_percent: reader.required_decimal("spread_percent")?,
                mexc_price: reader.required_decimal("mexc_price")?,
                dex_price: reader.required_decimal("dex_price")?,
                mexc_url: reader.text("mexc_url"),
                dexscreener_url: reader.text("dexscreener_url"),
                max_size_usd: fields.decimal("max_size_usd"),
                deposit_enabled: fields.flag("deposit_enabled").unwrap_or(true),
                withdrawal_enabled: fields.flag("withdrawal_enabled").unwrap_or(true),
                deposit_url: reader.text("deposit_url"),
                withdrawal_url: reader.text("withdrawal_url"),
                token_contract: reader.text("token_contract"),
                token_chain: reader.text("token_chain"),
            })),
            SignalDialect::Unknown => Err(ParseError::UnsupportedDialect(dialect)),
        }
    }

    pub fn dialect(&self) -> SignalDialect {
        match self {
            Signal::MexcSpotFutures(_) => SignalDialect::MexcSpotFutures,
            Signal::FundingRate(_) => SignalDialect::FundingRateSpread,
            Signal::MexcDex(_) => SignalDialect::MexcDex,
        }
    }

    pub fn coin_name(&self) -> &str {
        match self {
            Signal::MexcSpotFutures(s) => &s.coin_name,
            Signal::FundingRate(s) => &s.coin_name,
            Signal::MexcDex(s) => &s.coin_name,
        }
    }

    /// The number a reader looks at first: spread, hourly profit or DEX spread
    pub fn headline_metric(&self) -> Option<Decimal> {
        match self {
            Signal::MexcSpotFutures(s) => s.spread,
            Signal::FundingRate(s) => Some(s.hourly_profit),
            Signal::MexcDex(s) => Some(s.spread_percent),
        }
    }
}

struct FieldReader<'a> {
    dialect: SignalDialect,
    fields: &'a ExtractedFields,
}

impl FieldReader<'_> {
    fn text(&self, key: &str) -> Option<String> {
        self.fields.text(key).map(str::to_string)
    }

    fn position(&self, key: &str) -> Option<Position> {
        self.fields.text(key).and_then(Position::from_label)
    }

    fn required_text(&self, key: &'static str) -> Result<String, ParseError> {
        self.text(key).ok_or(ParseError::StructuralMismatch {
            dialect: self.dialect,
            field: key,
        })
    }

    fn required_decimal(&self, key: &'static str) -> Result<Decimal, ParseError> {
        self.fields.decimal(key).ok_or(ParseError::IncompleteExtraction {
            dialect: self.dialect,
            field: key,
        })
    }
}
