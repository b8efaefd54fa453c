//! CLI entry point for the Meta Insights analytics tool.
//!
//! Provides subcommands for building a time-windowed report from exported
//! CSV files, normalizing exports into the canonical record schema, and
//! pushing a report to the spreadsheet webhook.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use meta_insights::{
    output::{append_records, write_report},
    parser::{ParseError, RecordSet, SourceKind, normalize},
    store::DatasetStore,
    sync::{BasicClient, SyncError, push_report},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "meta_insights")]
#[command(about = "A tool to analyze social media export spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a time-windowed report from exported CSV files
    Report {
        /// Facebook posts CSV export (repeatable)
        #[arg(long = "facebook", value_name = "FILE")]
        facebook: Vec<String>,

        /// Instagram posts CSV export (repeatable)
        #[arg(long = "instagram", value_name = "FILE")]
        instagram: Vec<String>,

        /// Instagram stories CSV export (repeatable)
        #[arg(long = "stories", value_name = "FILE")]
        stories: Vec<String>,

        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Window end (YYYY-MM-DD), inclusive through end of day
        #[arg(long)]
        end: NaiveDate,

        /// File to write the JSON report to
        #[arg(short, long, default_value = "report.json")]
        output: String,
    },
    /// Normalize raw exports into the canonical CSV schema
    Normalize {
        /// Export shape of the input files
        #[arg(long, value_enum)]
        kind: ExportKind,

        /// Input CSV files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,

        /// CSV file to append normalized records to
        #[arg(short, long, default_value = "normalized.csv")]
        output: String,
    },
    /// Push a generated report JSON to the spreadsheet webhook
    Sync {
        /// Report JSON file to push
        #[arg(value_name = "REPORT")]
        report: String,

        /// Webhook URL (defaults to SHEET_WEBHOOK_URL)
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    FacebookPosts,
    InstagramPosts,
    InstagramStories,
}

impl From<ExportKind> for SourceKind {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::FacebookPosts => SourceKind::FacebookPosts,
            ExportKind::InstagramPosts => SourceKind::InstagramPosts,
            ExportKind::InstagramStories => SourceKind::InstagramStories,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/meta_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("meta_insights.log"));

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
        Commands::Report {
            facebook,
            instagram,
            stories,
            start,
            end,
            output,
        } => {
            let mut store = DatasetStore::new();

            let mut failures = 0;
            failures += ingest_all(&facebook, |bytes| store.ingest_facebook(bytes));
            failures += ingest_all(&instagram, |bytes| store.ingest_instagram(bytes));
            failures += ingest_all(&stories, |bytes| store.ingest_stories(bytes));

            if failures > 0 && store.is_empty() {
                bail!("no exports could be parsed");
            }

            let report = store.report(start, end);
            write_report(&output, &report)?;

            info!(
                output = %output,
                failed_files = failures,
                facebook_posts = report.facebook.stats.total_posts,
                instagram_posts = report.instagram.stats.total_posts,
                stories = report.stories.stats.total_stories,
                "Report written"
            );
        }
        Commands::Normalize {
            kind,
            files,
            output,
        } => {
            for path in &files {
                let bytes = match std::fs::read(path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        error!(file = %path, error = %e, "Failed to read export");
                        continue;
                    }
                };

                match normalize(kind.into(), &bytes) {
                    Ok(RecordSet::Posts(records)) => {
                        append_records(&output, &records)?;
                        info!(file = %path, records = records.len(), "Export normalized");
                    }
                    Ok(RecordSet::Stories(records)) => {
                        append_records(&output, &records)?;
                        info!(file = %path, records = records.len(), "Export normalized");
                    }
                    Err(e) => error!(file = %path, error = %e, "Export rejected"),
                }
            }
        }
        Commands::Sync { report, url } => {
            let url = url
                .or_else(|| std::env::var("SHEET_WEBHOOK_URL").ok())
                .context("webhook URL required via --url or SHEET_WEBHOOK_URL")?;

            let bytes = std::fs::read(&report)
                .with_context(|| format!("failed to read report {report}"))?;
            let payload: serde_json::Value =
                serde_json::from_slice(&bytes).context("report file is not valid JSON")?;

            let client = BasicClient::new();
            match push_report(&client, &url, &payload).await {
                Ok(response) => info!(response = %response, "Sheet sync complete"),
                Err(SyncError::Timeout) => {
                    error!("Webhook timed out; the remote script may still be running");
                    return Err(SyncError::Timeout.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

/// Ingests each file through `ingest`, reporting per-file failures without
/// aborting the rest of the batch. Returns the failure count.
fn ingest_all<F>(files: &[String], mut ingest: F) -> usize
where
    F: FnMut(&[u8]) -> Result<usize, ParseError>,
{
    let mut failures = 0;
    for path in files {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(file = %path, error = %e, "Failed to read export");
                failures += 1;
                continue;
            }
        };

        match ingest(&bytes) {
            Ok(total) => info!(file = %path, total_records = total, "Export ingested"),
            Err(e) => {
                error!(file = %path, error = %e, "Export rejected");
                failures += 1;
            }
        }
    }
    failures
}
