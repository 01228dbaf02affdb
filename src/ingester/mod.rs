//! Message ingestion pipeline
//!
//! ```text
//! MessageSource (Telegram) → SignalProcessor (classify + extract) → SignalSink
//! ```
//!
//! Sources and sinks are the collaborators around the pure parser: sources
//! decide which chat messages reach it, sinks decide what happens to the
//! accepted signals.

pub mod processor;
pub mod sink;
pub mod telegram;


pub use processor::{ProcessorStats, SignalProcessor};
pub use sink::{ChannelSink, LogSink, SignalSink};
pub use telegram::TelegramBotSource;

use crate::error::Result;
use crate::signals::Signal;
use crate::types::{ExtractedFields, SignalDialect};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A chat message as delivered by a source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    /// Source name ("telegram", "stdin", ...)
    pub source: String,
    /// Source-specific message id, e.g. `chat_id:message_id`
    pub source_id: String,
    pub chat_id: Option<String>,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl RawMessage {
    pub fn new(source: impl Into<String>, source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_id: source_id.into(),
            chat_id: None,
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}

/// An accepted signal with its provenance
#[derive(Debug, Clone, Serialize)]
pub struct ParsedSignal {
    pub dialect: SignalDialect,
    pub signal: Signal,
    pub fields: ExtractedFields,
    pub source: String,
    pub source_id: String,
    pub received_at: DateTime<Utc>,
    pub parsed_at: DateTime<Utc>,
}

/// Produces raw messages
#[async_trait]
pub trait MessageSource: Send + Sync {
    fn name(&self) -> &str;

    /// Push messages into `tx` until the source is exhausted or the
    /// receiver is dropped.
    async fn run(&self, tx: mpsc::Sender<RawMessage>) -> Result<()>;
}
