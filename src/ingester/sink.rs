//! Signal sinks

use super::ParsedSignal;
use crate::error::{Result, SignalError};
use crate::signals::Signal;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Consumes accepted signals (storage, notifications, broadcasts)
#[async_trait]
pub trait SignalSink: Send + Sync {
    fn name(&self) -> &str;

    async fn publish(&self, signal: &ParsedSignal) -> Result<()>;
}

/// Logs one line per signal
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl SignalSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, parsed: &ParsedSignal) -> Result<()> {
        let metric = parsed
            .signal
            .headline_metric()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());

        match &parsed.signal {
            Signal::MexcSpotFutures(_) => tracing::info!(
                coin_name = parsed.signal.coin_name(),
                spread = %metric,
                source_id = %parsed.source_id,
                "Created MEXC Spot & Futures signal"
            ),
            Signal::FundingRate(s) => tracing::info!(
                coin_name = parsed.signal.coin_name(),
                hourly_profit = %metric,
                exchanges = s.quotes.len(),
                source_id = %parsed.source_id,
                "Created Funding Rate signal"
            ),
            Signal::MexcDex(_) => tracing::info!(
                coin_name = parsed.signal.coin_name(),
                spread_percent = %metric,
                source_id = %parsed.source_id,
                "Created MEXC & DEX signal"
            ),
        }
        Ok(())
    }
}

/// Forwards signals to an in-process consumer
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<ParsedSignal>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ParsedSignal>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl SignalSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    async fn publish(&self, signal: &ParsedSignal) -> Result<()> {
        self.tx
            .send(signal.clone())
            .await
            .map_err(|_| SignalError::Channel("parsed signal receiver dropped".into()))
    }
}
