//! Funding-rate spread messages
//!
//! ```text
//! ⚠️ RAVE Профит за час: 0.4576%
//! GATE (https://www.gate.com/uk/futures/USDT/RAVE_USDT): -0.4563% (интервал: 1.0h) (LONG)
//! BINANCE (https://www.binance.com/en/futures/RAVEUSDT): 0.005% (интервал: 4h) (SHORT)
//! MEXC (https://futures.mexc.com/exchange/RAVE_USDT): 0.005% (интервал: 4h)
//! ```

use super::patterns::{to_decimal, NUMBER};
use super::DialectExtractor;
use crate::error::{ParseError, Result};
use crate::types::{Exchange, ExtractedFields, Position, SignalDialect};
use regex::Regex;

/// Quote line and trailing position marker for one exchange
struct ExchangeLine {
    exchange: Exchange,
    quote: Regex,
    position: Regex,
}

impl ExchangeLine {
    fn new(exchange: Exchange) -> Result<Self> {
        let label = regex::escape(exchange.label());
        Ok(Self {
            exchange,
            quote: Regex::new(&format!(
                r"(?i)\b{label}\s*\(([^)]+)\):\s*([+-]?{NUMBER})%\s*\(интервал:\s*([^)]+)\)"
            ))?,
            position: Regex::new(&format!(
                r"(?i)\b{label}\s*\([^)]*\):[^\n]*?\((LONG|SHORT)\)"
            ))?,
        })
    }

    fn apply(
        &self,
        text: &str,
        fields: &mut ExtractedFields,
    ) -> std::result::Result<(), ParseError> {
        let Some(caps) = self.quote.captures(text) else {
            return Ok(());
        };

        let rate_key = self.exchange.rate_key();
        let (Some(url), Some(rate), Some(interval)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            return Ok(());
        };
        let rate = to_decimal(&rate_key, rate.as_str())?;

        fields.insert(rate_key, rate);
        fields.insert(self.exchange.url_key(), url.as_str().trim());
        fields.insert(self.exchange.interval_key(), interval.as_str().trim());

        let position = self
            .position
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| Position::from_label(m.as_str()));
        if let Some(position) = position {
            fields.insert(self.exchange.position_key(), position.as_str());
        }

        Ok(())
    }
}

pub struct FundingRateExtractor {
    headline: Regex,
    exchanges: Vec<ExchangeLine>,
}

impl FundingRateExtractor {
    pub fn new() -> Result<Self> {
        let exchanges = Exchange::ALL
            .iter()
            .map(|exchange| ExchangeLine::new(*exchange))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            headline: Regex::new(&format!(
                r"⚠\x{{FE0F}}?\s*(\w+)\s*Профит за час:\s*({NUMBER})%"
            ))?,
            exchanges,
        })
    }
}

impl DialectExtractor for FundingRateExtractor {
    fn dialect(&self) -> SignalDialect {
        SignalDialect::FundingRateSpread
    }

    fn extract(&self, text: &str) -> std::result::Result<ExtractedFields, ParseError> {
        let mut fields = ExtractedFields::new();

        if let Some(caps) = self.headline.captures(text) {
            if let (Some(coin), Some(profit)) = (caps.get(1), caps.get(2)) {
                let profit = to_decimal("hourly_profit", profit.as_str())?;
                fields.insert("coin_name", coin.as_str().trim());
                fields.insert("hourly_profit", profit);
            }
        }

        for line in &self.exchanges {
            line.apply(text, &mut fields)?;
        }

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "Parser [CheapMirror], [16.12.2025 10:03]
⚠️ RAVE Профит за час: 0.4576%
GATE (https://www.gate.com/uk/futures/USDT/RAVE_USDT): -0.4563% (интервал: 1.0h) (LONG)
BINANCE (https://www.binance.com/en/futures/RAVEUSDT): 0.005% (интервал: 4h) (SHORT)
MEXC (https://futures.mexc.com/exchange/RAVE_USDT): 0.005% (интервал: 4h)
OURBIT (https://futures.ourbit.com/exchange/RAVE_USDT): +0.005% (интервал: 4h)
BITGET (https://www.bitget.com/ru/futures/usdt/RAVEUSDT): -0.0076% (интервал: 4h)
BYBIT (https://www.bybit.com/trade/usdt/RAVEUSDT): 0.005% (интервал: 4h)
";

    #[test]
    fn test_extract_all_exchanges() {
        let fields = FundingRateExtractor::new().unwrap().extract(SAMPLE).unwrap();

        assert_eq!(fields.text("coin_name"), Some("RAVE"));
        assert_eq!(fields.decimal("hourly_profit"), Some(dec!(0.4576)));

        assert_eq!(fields.decimal("gate_rate"), Some(dec!(-0.4563)));
        assert_eq!(
            fields.text("gate_url"),
            Some("https://www.gate.com/uk/futures/USDT/RAVE_USDT")
        );
        assert_eq!(fields.text("gate_interval"), Some("1.0h"));
        assert_eq!(fields.text("gate_position"), Some("LONG"));
        assert_eq!(fields.text("binance_position"), Some("SHORT"));

        assert_eq!(fields.decimal("ourbit_rate"), Some(dec!(0.005)));
        assert_eq!(fields.decimal("bitget_rate"), Some(dec!(-0.0076)));
        assert_eq!(fields.text("bybit_interval"), Some("4h"));

        for exchange in ["mexc", "ourbit", "bitget", "bybit"] {
            assert!(!fields.contains(&format!("{exchange}_position")), "{exchange}");
        }
    }

    #[test]
    fn test_position_is_scoped_to_its_line() {
        let text = "⚠️ X Профит за час: 1%\nGATE (u): 0.1% (интервал: 1h)\nBINANCE (u): 0.2% (интервал: 8h) (short)";
        let fields = FundingRateExtractor::new().unwrap().extract(text).unwrap();
        assert!(!fields.contains("gate_position"));
        assert_eq!(fields.text("binance_position"), Some("SHORT"));
    }

    #[test]
    fn test_exchanges_are_independent() {
        let text = "⚠️ X Профит за час: 1%\nBYBIT (u): -0.2% (интервал: 1h)";
        let fields = FundingRateExtractor::new().unwrap().extract(text).unwrap();
        assert_eq!(fields.decimal("bybit_rate"), Some(dec!(-0.2)));
        assert!(!fields.contains("gate_rate"));
        assert_eq!(fields.iter().count(), 5);
    }

    #[test]
    fn test_headline_missing_leaves_no_coin() {
        let text = "GATE (u): 0.1% (интервал: 1h)";
        let fields = FundingRateExtractor::new().unwrap().extract(text).unwrap();
        assert!(!fields.contains("coin_name"));
        assert!(fields.contains("gate_rate"));
    }
}
