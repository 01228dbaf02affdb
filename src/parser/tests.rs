//! End-to-end parser tests over full feed messages

use super::*;
use rust_decimal_macros::dec;

const SPOT_FUTURES: &str = "Монета: NB\nSHORT\nСпред: 8.84%\nhttps://www.mexc.com/exchange/NB_USDT\nhttps://futures.mexc.com/exchange/NB_USDT\nСпот: 0.00666400\nФючи: 0.00728000\nДепозит: ✅ Вывод: ✅\nhttps://dexscreener.com/bsc/0xabc";

const FUNDING_RATE: &str = "⚠️ PIPPIN Профит за час: 0.2711%\nGATE (url): -0.0422% (интервал: 1.0h)\nBYBIT (url): -0.2698% (интервал: 1h) (LONG)";

const MEXC_DEX: &str = "🔴 YEE 13.9%\nPrice Mxc (url): 0.0221\nPrice Dexscreener (url): 0.0190\n66$ | ✅ ✅\nETH: 0xabc";

fn parser() -> SignalParser {
    SignalParser::new().unwrap()
}

#[test]
fn test_spot_futures_message() {
    let outcome = parser().parse(SPOT_FUTURES);
    assert_eq!(outcome.dialect, SignalDialect::MexcSpotFutures);

    let fields = outcome.fields.unwrap();
    assert_eq!(fields.text("coin_name"), Some("NB"));
    assert_eq!(fields.text("position"), Some("SHORT"));
    assert_eq!(fields.decimal("spread"), Some(dec!(8.84)));
    assert_eq!(fields.decimal("mexc_spot_price"), Some(dec!(0.00666400)));
    assert_eq!(fields.decimal("mexc_futures_price"), Some(dec!(0.00728000)));
    assert_eq!(fields.flag("deposit_enabled"), Some(true));
    assert_eq!(fields.flag("withdrawal_enabled"), Some(true));
}

#[test]
fn test_funding_rate_message() {
    let outcome = parser().parse(FUNDING_RATE);
    assert_eq!(outcome.dialect, SignalDialect::FundingRateSpread);

    let fields = outcome.fields.unwrap();
    assert_eq!(fields.text("coin_name"), Some("PIPPIN"));
    assert_eq!(fields.decimal("hourly_profit"), Some(dec!(0.2711)));
    assert_eq!(fields.decimal("gate_rate"), Some(dec!(-0.0422)));
    assert_eq!(fields.text("gate_url"), Some("url"));
    assert_eq!(fields.text("gate_interval"), Some("1.0h"));
    assert!(!fields.contains("gate_position"));
    assert!(!fields.contains("binance_position"));
    assert_eq!(fields.decimal("bybit_rate"), Some(dec!(-0.2698)));
    assert_eq!(fields.text("bybit_position"), Some("LONG"));
}

#[test]
fn test_mexc_dex_message() {
    let outcome = parser().parse(MEXC_DEX);
    assert_eq!(outcome.dialect, SignalDialect::MexcDex);

    let fields = outcome.fields.unwrap();
    assert_eq!(fields.text("coin_name"), Some("YEE"));
    assert_eq!(fields.decimal("spread_percent"), Some(dec!(13.9)));
    assert_eq!(fields.decimal("mexc_price"), Some(dec!(0.0221)));
    assert_eq!(fields.decimal("dex_price"), Some(dec!(0.0190)));
    assert_eq!(fields.decimal("max_size_usd"), Some(dec!(66)));
    assert_eq!(fields.flag("deposit_enabled"), Some(true));
    assert_eq!(fields.flag("withdrawal_enabled"), Some(true));
    assert_eq!(fields.text("token_chain"), Some("ETH"));
    assert_eq!(fields.text("token_contract"), Some("0xabc"));
}

#[test]
fn test_mexc_dex_without_prices_is_rejected() {
    let text = "🟢 YEE 13.9%\nprice mxc is missing today\n66$ | ✅ ✅\nETH: 0xabc";
    let outcome = parser().parse(text);
    assert_eq!(outcome.dialect, SignalDialect::MexcDex);
    assert!(outcome.fields.is_none());

    assert_eq!(
        parser().extract(SignalDialect::MexcDex, text),
        Err(ParseError::IncompleteExtraction {
            dialect: SignalDialect::MexcDex,
            field: "mexc_price",
        })
    );
}

#[test]
fn test_mexc_dex_with_one_price_is_rejected() {
    let text = "🔴 YEE 13.9%\nPrice Mxc (url): 0.0221";
    assert!(!parser().parse(text).is_accepted());
}

#[test]
fn test_plain_prose_is_unknown() {
    let outcome = parser().parse("Hello everyone, no signals today.");
    assert_eq!(outcome.dialect, SignalDialect::Unknown);
    assert!(outcome.fields.is_none());
}

#[test]
fn test_required_token_missing_yields_nothing() {
    // Classified by "Профит за час:" but the headline lacks the warning glyph.
    let text = "PIPPIN Профит за час: 0.2711%\nGATE (url): -0.0422% (интервал: 1.0h)";
    let outcome = parser().parse(text);
    assert_eq!(outcome.dialect, SignalDialect::FundingRateSpread);
    assert!(outcome.fields.is_none());
}

#[test]
fn test_conversion_error_collapses_message() {
    let text = "Монета: NB\nСпред: 8.84%\nФючи: 0.007.28";
    let outcome = parser().parse(text);
    assert_eq!(outcome.dialect, SignalDialect::MexcSpotFutures);
    assert!(outcome.fields.is_none());
    assert!(matches!(
        parser().extract(outcome.dialect, text),
        Err(ParseError::Conversion { .. })
    ));
}

#[test]
fn test_malformed_exchange_rate_collapses_funding_message() {
    let text = "⚠️ PIPPIN Профит за час: 0.2711%\nGATE (url): -0.04.22% (интервал: 1h)\nBYBIT (url): -0.2698% (интервал: 1h) (LONG)";
    let outcome = parser().parse(text);
    assert_eq!(outcome.dialect, SignalDialect::FundingRateSpread);
    assert!(outcome.fields.is_none());
    assert!(matches!(
        parser().extract(outcome.dialect, text),
        Err(ParseError::Conversion { ref field, .. }) if field == "gate_rate"
    ));
}

#[test]
fn test_malformed_dex_price_collapses_mexc_dex_message() {
    let text = "🔴 YEE 13.9%\nPrice Mxc (url): 0.0221\nPrice Dexscreener (url): 0.01.90\n66$ | ✅ ✅\nETH: 0xabc";
    let outcome = parser().parse(text);
    assert_eq!(outcome.dialect, SignalDialect::MexcDex);
    assert!(outcome.fields.is_none());
    assert!(matches!(
        parser().extract(outcome.dialect, text),
        Err(ParseError::Conversion { ref field, .. }) if field == "dex_price"
    ));
}

#[test]
fn test_spot_futures_wins_over_funding_rate() {
    let text = format!("⚠️ {SPOT_FUTURES}");
    let outcome = parser().parse(&text);
    assert_eq!(outcome.dialect, SignalDialect::MexcSpotFutures);
    assert_eq!(outcome.fields.unwrap().text("coin_name"), Some("NB"));
}

#[test]
fn test_parse_is_deterministic() {
    let parser = parser();
    for text in [SPOT_FUTURES, FUNDING_RATE, MEXC_DEX, "noise"] {
        assert_eq!(parser.parse(text), parser.parse(text));
    }
}

#[test]
fn test_unknown_dialect_cannot_be_extracted() {
    assert_eq!(
        parser().extract(SignalDialect::Unknown, SPOT_FUTURES),
        Err(ParseError::UnsupportedDialect(SignalDialect::Unknown))
    );
}

#[test]
fn test_extract_urls_via_parser() {
    let urls = parser().extract_urls(SPOT_FUTURES);
    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://www.mexc.com/exchange/NB_USDT");
}

#[test]
fn test_outcome_serializes_flat_fields() {
    let json = serde_json::to_value(parser().parse(SPOT_FUTURES)).unwrap();
    assert_eq!(json["dialect"], "mexc_spot_futures");
    assert_eq!(json["fields"]["coin_name"], "NB");
    assert_eq!(json["fields"]["deposit_enabled"], true);

    let json = serde_json::to_value(parser().parse("noise")).unwrap();
    assert_eq!(json["dialect"], "unknown");
    assert!(json["fields"].is_null());
}

#[test]
fn test_parser_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SignalParser>();

    let parser = std::sync::Arc::new(parser());
    let handles: Vec<_> = [SPOT_FUTURES, FUNDING_RATE, MEXC_DEX]
        .into_iter()
        .map(|text| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.parse(text).is_accepted())
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
