//! CLI entry point for the channel analyzer.
//!
//! Provides subcommands for analyzing a channel's upload feed into a summary
//! report and for resolving a pasted URL to its feed URL.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use yt_channel_analyzer::analyzers::recommend::recommendations;
use yt_channel_analyzer::fetch::resolve::{ChannelRef, resolve_feed_url};
use yt_channel_analyzer::fetch::{BasicClient, fetch_text};
use yt_channel_analyzer::output::{ChannelReport, SummaryRow, append_record, print_json, write_report};
use yt_channel_analyzer::parser::{ChannelFeed, parse_channel_feed};
use yt_channel_analyzer::stats::Summary;

#[derive(Parser)]
#[command(name = "yt_channel_analyzer")]
#[command(about = "A tool to analyze a channel's public upload feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a channel from a URL or a saved feed XML file
    Analyze {
        /// Channel/video URL, or path to a local videos.xml file
        #[arg(value_name = "URL_OR_FILE")]
        source: String,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// CSV file to append a flattened summary row to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Resolve a channel or video URL to its upload feed URL
    Resolve {
        /// Channel or video URL
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/yt_channel_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("yt_channel_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            output,
            csv,
        } => {
            let feed = load_feed(&source).await?;
            info!(
                channel = %feed.channel.title,
                items = feed.items.len(),
                "Feed loaded"
            );

            let summary = Summary::from_items(&feed.items);
            let recommendations = recommendations(&summary);
            let report = ChannelReport {
                channel: feed.channel,
                summary,
                recommendations,
            };

            if let Some(path) = &csv {
                append_record(path, &SummaryRow::from_report(&report))?;
            }

            match output {
                Some(path) => write_report(&path, &report)?,
                None => print_json(&report)?,
            }
        }
        Commands::Resolve { url } => {
            let reference = ChannelRef::parse(&url)?;
            let client = BasicClient::new();
            let resolved = resolve_feed_url(&client, &reference).await?;

            info!(
                feed_url = %resolved.feed_url,
                subscriber_estimate = resolved.subscriber_estimate.as_deref(),
                "Channel resolved"
            );
            println!("{}", resolved.feed_url);
        }
    }

    Ok(())
}

/// Loads the upload feed from a local XML file or by resolving and fetching
/// a channel/video URL.
#[tracing::instrument(fields(source = %source))]
async fn load_feed(source: &str) -> Result<ChannelFeed> {
    if !source.starts_with("http") {
        let xml = std::fs::read_to_string(source)?;
        return Ok(parse_channel_feed(&xml)?);
    }

    let reference = ChannelRef::parse(source)?;
    let client = BasicClient::new();

    let resolved = resolve_feed_url(&client, &reference).await?;
    debug!(feed_url = %resolved.feed_url, "Fetching upload feed");

    let xml = fetch_text(&client, &resolved.feed_url).await?;
    let mut feed = parse_channel_feed(&xml)?;

    // Subscriber estimate only exists when resolution scraped a page
    feed.channel.subscriber_estimate = resolved.subscriber_estimate;

    Ok(feed)
}
