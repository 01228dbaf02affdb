//! Dialect detection
//!
//! Rules are checked in order and the first hit wins. A message can satisfy
//! more than one rule (e.g. `Монета:` together with `⚠️`); the order below is
//! what resolves it.

use crate::types::SignalDialect;

const WARNING_GLYPH: &str = "⚠️";
const RED_CIRCLE: &str = "🔴";
const GREEN_CIRCLE: &str = "🟢";

/// Pick the dialect of a message. Total: every input maps to exactly one tag.
pub fn classify(text: &str) -> SignalDialect {
    let lower = text.to_lowercase();

    if lower.contains("монета:") && (lower.contains("спред:") || lower.contains("спот:")) {
        return SignalDialect::MexcSpotFutures;
    }

    if lower.contains("профит за час:") || text.contains(WARNING_GLYPH) {
        return SignalDialect::FundingRateSpread;
    }

    if (text.contains(RED_CIRCLE) || text.contains(GREEN_CIRCLE)) && lower.contains("price mxc") {
        return SignalDialect::MexcDex;
    }

    SignalDialect::Unknown
}
