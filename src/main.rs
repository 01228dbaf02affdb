//! Arbitrage Signal Parser
//!
//! Parses signal messages from files, stdin or a live Telegram chat.

use anyhow::Context;
use arb_signal_parser::{
    config::{Config, LoggingConfig},
    ingester::{
        LogSink, MessageSource, ParsedSignal, RawMessage, SignalProcessor, SignalSink,
        TelegramBotSource,
    },
    SignalParser,
};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "signal-parser")]
#[command(about = "Extract arbitrage signals from chat messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one message and print the outcome as JSON
    Parse {
        /// Message file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Print the dialect of one message
    Classify {
        /// Message file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Listen to the configured Telegram chat and emit signals as JSON lines
    Listen,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;
    init_logging(&config.logging);

    match cli.command {
        Commands::Parse { file } => parse_message(&config, file),
        Commands::Classify { file } => classify_message(file),
        Commands::Listen => listen(config).await,
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn read_message(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn parse_message(config: &Config, file: Option<PathBuf>) -> anyhow::Result<()> {
    let text = read_message(file)?;
    let parser = SignalParser::new()?.with_preview_chars(config.processor.preview_chars);

    let outcome = parser.parse(&text);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn classify_message(file: Option<PathBuf>) -> anyhow::Result<()> {
    let text = read_message(file)?;
    println!("{}", arb_signal_parser::parser::classify(&text));
    Ok(())
}

/// Logs each signal and prints it to stdout as one JSON line
struct StdoutSink;

#[async_trait]
impl SignalSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn publish(&self, signal: &ParsedSignal) -> arb_signal_parser::Result<()> {
        LogSink.publish(signal).await?;
        println!("{}", serde_json::to_string(signal)?);
        Ok(())
    }
}

async fn listen(config: Config) -> anyhow::Result<()> {
    let telegram = config
        .telegram
        .clone()
        .context("Telegram is not configured (set [telegram] bot_token)")?;

    tracing::info!("Starting signal listener");

    let parser = Arc::new(
        SignalParser::new()?.with_preview_chars(config.processor.preview_chars),
    );
    let processor = SignalProcessor::new(parser);
    let (raw_tx, raw_rx) = mpsc::channel::<RawMessage>(config.processor.channel_capacity);

    let source = TelegramBotSource::new(telegram);
    let source_name = source.name().to_string();
    let source_task = tokio::spawn(async move {
        if let Err(e) = source.run(raw_tx).await {
            tracing::error!("Message source {} failed: {}", source_name, e);
        }
    });

    let processing = processor.run(raw_rx, Arc::new(StdoutSink));
    tokio::select! {
        stats = processing => {
            tracing::info!(?stats, "Processor finished");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    source_task.abort();
    Ok(())
}
