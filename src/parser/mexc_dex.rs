//! MEXC futures vs DEX price spread messages
//!
//! ```text
//! 🔴 YEE 13.9%
//!
//! Price Mxc (https://futures.mexc.com/exchange/YEE_USDT?inviteCode=1E5e4): 0.0221
//! Price Dexscreener (https://dexscreener.com/ethereum/0x9Ac9...77Fd): 0.0190
//!
//! Max size | Deposit Withdrawal
//!  66$ | ✅ ✅
//!
//! Deposit (https://www.mexc.com/assets/deposit/YEE) | Withdrawal (https://www.mexc.com/assets/withdraw/YEE)
//! ETH: 0x9Ac9468E7E3E1D194080827226B45d0B892C77Fd
//! ```

use super::patterns::{
    to_decimal, DecimalField, UrlClassifier, UrlExtractor, UrlRule, AFFIRMATIVE_GLYPH,
    NEGATIVE_GLYPH, NUMBER,
};
use super::DialectExtractor;
use crate::error::{ParseError, Result};
use crate::types::{ExtractedFields, SignalDialect};
use regex::Regex;

const URL_RULES: &[UrlRule] = &[
    UrlRule::new("mexc_url", "futures.mexc.com/exchange"),
    UrlRule::new("dexscreener_url", "dexscreener.com"),
    UrlRule::new("deposit_url", "mexc.com/assets/deposit"),
    UrlRule::new("withdrawal_url", "mexc.com/assets/withdraw"),
];

/// Position size in USD, next to a `$` sign.
///
/// Prefers the amount after the `Max size` label; without the label, falls
/// back to the `66$ | ✅ ✅` table row.
struct MaxSizePattern {
    labeled: Regex,
    row: Regex,
}

impl MaxSizePattern {
    const KEY: &'static str = "max_size_usd";

    fn new() -> Result<Self> {
        Ok(Self {
            labeled: Regex::new(&format!(
                r"(?i)Max size[^$]*?(?:\$\s*({NUMBER})|({NUMBER})\s*\$)"
            ))?,
            row: Regex::new(&format!(r"({NUMBER})\s*\$\s*\|"))?,
        })
    }

    fn find(&self, text: &str) -> std::result::Result<Option<rust_decimal::Decimal>, ParseError> {
        let token = self
            .labeled
            .captures(text)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .or_else(|| self.row.captures(text).and_then(|caps| caps.get(1)));

        token
            .map(|m| to_decimal(Self::KEY, m.as_str()))
            .transpose()
    }
}

pub struct MexcDexExtractor {
    urls: UrlExtractor,
    link_rules: UrlClassifier,
    headline: Regex,
    prices: [DecimalField; 2],
    max_size: MaxSizePattern,
    transfer_flags: Regex,
    contract: Regex,
}

impl MexcDexExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            urls: UrlExtractor::new()?,
            link_rules: UrlClassifier::new(URL_RULES),
            headline: Regex::new(&format!(r"[🔴🟢]\s*(\w+)\s*({NUMBER})%"))?,
            prices: [
                DecimalField::new(
                    "mexc_price",
                    &format!(r"(?i)Price Mxc(?:\s*\([^)]*\))?[^:\n]*:\s*({NUMBER})"),
                )?,
                DecimalField::new(
                    "dex_price",
                    &format!(r"(?i)Price Dexscreener(?:\s*\([^)]*\))?[^:\n]*:\s*({NUMBER})"),
                )?,
            ],
            max_size: MaxSizePattern::new()?,
            transfer_flags: Regex::new(&format!(
                r"\$\s*\|\s*([{a}{n}])\s*([{a}{n}])",
                a = AFFIRMATIVE_GLYPH,
                n = NEGATIVE_GLYPH
            ))?,
            contract: Regex::new(r"(ETH|BSC|POLYGON|AVAX):\s*(0x[a-fA-F0-9]+)")?,
        })
    }
}

impl DialectExtractor for MexcDexExtractor {
    fn dialect(&self) -> SignalDialect {
        SignalDialect::MexcDex
    }

    fn extract(&self, text: &str) -> std::result::Result<ExtractedFields, ParseError> {
        let mut fields = ExtractedFields::new();

        if let Some(caps) = self.headline.captures(text) {
            if let (Some(coin), Some(spread)) = (caps.get(1), caps.get(2)) {
                let spread = to_decimal("spread_percent", spread.as_str())?;
                fields.insert("coin_name", coin.as_str().trim());
                fields.insert("spread_percent", spread);
            }
        }

        for price in &self.prices {
            price.apply(text, &mut fields)?;
        }

        self.link_rules.apply(&self.urls.extract(text), &mut fields);

        if let Some(size) = self.max_size.find(text)? {
            fields.insert(MaxSizePattern::KEY, size);
        }

        // Both flags come from the same row, or neither is set.
        if let Some(caps) = self.transfer_flags.captures(text) {
            if let (Some(deposit), Some(withdrawal)) = (caps.get(1), caps.get(2)) {
                fields.insert("deposit_enabled", deposit.as_str().starts_with(AFFIRMATIVE_GLYPH));
                fields.insert(
                    "withdrawal_enabled",
                    withdrawal.as_str().starts_with(AFFIRMATIVE_GLYPH),
                );
            }
        }

        if let Some(caps) = self.contract.captures(text) {
            if let (Some(chain), Some(contract)) = (caps.get(1), caps.get(2)) {
                fields.insert("token_chain", chain.as_str());
                fields.insert("token_contract", contract.as_str());
            }
        }

        Ok(fields)
    }
}
