//! Signal processing
//!
//! Runs each raw message through the parser, turns accepted extractions
//! into typed records and hands them to a sink. Messages are independent:
//! nothing is buffered or correlated between them.

use super::{ParsedSignal, RawMessage, SignalSink};
use crate::parser::SignalParser;
use crate::signals::Signal;
use crate::types::SignalDialect;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Counters for one processor run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    pub received: u64,
    /// Matched no dialect
    pub unknown: u64,
    /// Matched a dialect but failed extraction or validation
    pub rejected: u64,
    pub accepted: u64,
    pub sink_errors: u64,
}

pub struct SignalProcessor {
    parser: Arc<SignalParser>,
}

impl SignalProcessor {
    pub fn new(parser: Arc<SignalParser>) -> Self {
        Self { parser }
    }

    /// Parse one message. `None` when no signal could be built.
    pub fn process(&self, raw: &RawMessage) -> Option<ParsedSignal> {
        self.evaluate(raw).1
    }

    fn evaluate(&self, raw: &RawMessage) -> (SignalDialect, Option<ParsedSignal>) {
        let outcome = self.parser.parse(&raw.text);
        let Some(fields) = outcome.fields else {
            return (outcome.dialect, None);
        };

        let parsed = match Signal::from_fields(outcome.dialect, &fields) {
            Ok(signal) => Some(ParsedSignal {
                dialect: outcome.dialect,
                signal,
                fields,
                source: raw.source.clone(),
                source_id: raw.source_id.clone(),
                received_at: raw.received_at,
                parsed_at: Utc::now(),
            }),
            Err(e) => {
                tracing::warn!(
                    source_id = %raw.source_id,
                    error = %e,
                    "Accepted fields did not form a signal record"
                );
                None
            }
        };
        (outcome.dialect, parsed)
    }

    /// Consume messages until the channel closes.
    pub async fn run(
        &self,
        mut raw_rx: mpsc::Receiver<RawMessage>,
        sink: Arc<dyn SignalSink>,
    ) -> ProcessorStats {
        let mut stats = ProcessorStats::default();
        tracing::info!(sink = sink.name(), "Signal processor started");

        while let Some(raw) = raw_rx.recv().await {
            stats.received += 1;

            let (dialect, parsed) = self.evaluate(&raw);
            let Some(parsed) = parsed else {
                if dialect == SignalDialect::Unknown {
                    stats.unknown += 1;
                } else {
                    stats.rejected += 1;
                }
                tracing::debug!("No signal extracted from: {}", raw.source_id);
                continue;
            };

            stats.accepted += 1;
            if let Err(e) = sink.publish(&parsed).await {
                stats.sink_errors += 1;
                tracing::warn!("Sink {} failed to publish signal: {}", sink.name(), e);
            }
        }

        tracing::info!(
            received = stats.received,
            accepted = stats.accepted,
            rejected = stats.rejected,
            unknown = stats.unknown,
            "Signal processor stopped"
        );
        stats
    }
}
