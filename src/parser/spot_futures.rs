//! MEXC spot vs futures spread messages
//!
//! ```text
//! Монета: NB
//! SHORT
//! Спред: 8.84%
//! https://www.mexc.com/exchange/NB_USDT
//! https://futures.mexc.com/exchange/NB_USDT
//! Спот: 0.00666400
//! Фючи: 0.00728000
//! Депозит: ✅ Вывод: ✅
//! https://dexscreener.com/bsc/0xc2bD425A63800731E3Ae42b6596BDD783299fCb1
//! ```

use super::patterns::{
    DecimalField, FlagPattern, PositionPattern, UrlClassifier, UrlExtractor, UrlRule, NUMBER,
};
use super::DialectExtractor;
use crate::error::{ParseError, Result};
use crate::types::{ExtractedFields, SignalDialect};
use regex::Regex;

const URL_RULES: &[UrlRule] = &[
    UrlRule::new("spot_url", "mexc.com/exchange").excluding("futures"),
    UrlRule::new("futures_url", "futures.mexc.com"),
    UrlRule::new("dex_url", "dexscreener.com"),
];

pub struct SpotFuturesExtractor {
    urls: UrlExtractor,
    link_rules: UrlClassifier,
    coin: Regex,
    position: PositionPattern,
    prices: [DecimalField; 3],
    deposit: FlagPattern,
    withdrawal: FlagPattern,
}

impl SpotFuturesExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            urls: UrlExtractor::new()?,
            link_rules: UrlClassifier::new(URL_RULES),
            coin: Regex::new(r"(?i)Монета:\s*(\w+)")?,
            position: PositionPattern::new()?,
            prices: [
                DecimalField::new("spread", &format!(r"(?i)Спред:\s*({NUMBER})%"))?,
                DecimalField::new("mexc_spot_price", &format!(r"(?i)Спот:\s*({NUMBER})"))?,
                DecimalField::new("mexc_futures_price", &format!(r"(?i)Фючи:\s*({NUMBER})"))?,
            ],
            deposit: FlagPattern::new("Депозит")?,
            withdrawal: FlagPattern::new("Вывод")?,
        })
    }
}

impl DialectExtractor for SpotFuturesExtractor {
    fn dialect(&self) -> SignalDialect {
        SignalDialect::MexcSpotFutures
    }

    fn extract(&self, text: &str) -> std::result::Result<ExtractedFields, ParseError> {
        let mut fields = ExtractedFields::new();

        if let Some(coin) = self.coin.captures(text).and_then(|caps| caps.get(1)) {
            fields.insert("coin_name", coin.as_str().trim());
        }

        if let Some(position) = self.position.find(text) {
            fields.insert("position", position.as_str());
        }

        for price in &self.prices {
            price.apply(text, &mut fields)?;
        }

        self.link_rules.apply(&self.urls.extract(text), &mut fields);

        // Absent labels stay absent; the record layer defaults them to enabled.
        if let Some(enabled) = self.deposit.find(text) {
            fields.insert("deposit_enabled", enabled);
        }
        if let Some(enabled) = self.withdrawal.find(text) {
            fields.insert("withdrawal_enabled", enabled);
        }

        Ok(fields)
    }
}
