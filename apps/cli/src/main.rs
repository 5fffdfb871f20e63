use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::EnvFilter;
use ytdigest_core::{
    DigestConfig, SummaryClient, SummaryResult, Transcript, TranscriptExtractor,
    TranscriptResponse, parse_transcript, video_id_from_url,
};

use crate::format::{format_duration, render_summary};

mod format;

#[derive(Parser)]
#[command(name = "ytdigest")]
#[command(about = "Pull YouTube transcripts from caption tracks and request video summaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP timeout in seconds (overrides YTDIGEST_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the transcript of a video page
    Transcript {
        /// Video URL
        #[arg(required_unless_present = "page_file")]
        url: Option<String>,

        /// Print the {"transcript"} / {"error"} reply as JSON
        #[arg(long)]
        json: bool,

        /// Inspect a saved watch page instead of downloading it
        #[arg(long)]
        page_file: Option<PathBuf>,
    },

    /// Run the caption parsing tiers on a saved caption payload
    Parse {
        /// Caption payload (JSON events, XML or plain text)
        file: PathBuf,
    },

    /// Ask the summarization backend for a summary of a video
    Summarize {
        /// Video URL
        url: String,

        /// Summarization endpoint (overrides YTDIGEST_BACKEND_URL)
        #[arg(long)]
        backend_url: Option<String>,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ytdigest=debug,ytdigest_core=debug,warn"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}

fn report_transcript(transcript: &Transcript, elapsed: Duration) {
    eprintln!(
        "{} Transcript: {} words {}",
        style("✓").green().bold(),
        transcript.text.split_whitespace().count(),
        style(format!("[{}]", format_duration(elapsed))).dim()
    );
    eprintln!("{}", style("─".repeat(60)).dim());
    println!("{}", transcript);
}

async fn run_transcript(
    config: DigestConfig,
    url: Option<String>,
    page_file: Option<PathBuf>,
    json: bool,
) -> Result<bool> {
    let extractor = TranscriptExtractor::new(config)?;
    let start = Instant::now();

    let spinner = (!json).then(|| create_spinner("Fetching transcript..."));
    let result = match page_file {
        Some(path) => {
            let html = fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            extractor.extract_from_html(&html).await
        }
        None => extractor.extract(url.as_deref().unwrap_or_default()).await,
    };
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        let response = TranscriptResponse::from(result);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(matches!(response, TranscriptResponse::Transcript { .. }));
    }

    match result {
        Ok(transcript) => {
            report_transcript(&transcript, start.elapsed());
            Ok(true)
        }
        Err(e) => {
            report_error(e);
            Ok(false)
        }
    }
}

async fn run_parse(file: PathBuf) -> Result<bool> {
    let start = Instant::now();
    let body = fs::read_to_string(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    match parse_transcript(&body) {
        Ok(transcript) => {
            report_transcript(&transcript, start.elapsed());
            Ok(true)
        }
        Err(e) => {
            report_error(e);
            Ok(false)
        }
    }
}

async fn run_summarize(
    mut config: DigestConfig,
    url: String,
    backend_url: Option<String>,
) -> Result<bool> {
    let Some(video_id) = video_id_from_url(&url) else {
        report_error("Not a valid YouTube video page.");
        return Ok(false);
    };

    if let Some(backend_url) = backend_url {
        config.backend_url = backend_url;
    }

    let client = SummaryClient::from_config(&config)?;
    let start = Instant::now();

    let spinner = create_spinner(&format!("Summarizing {}...", video_id));
    let result = client.summary_result(&video_id).await;
    spinner.finish_and_clear();

    match result {
        SummaryResult::Summary(text) => {
            eprintln!(
                "{} Summary for {} {}",
                style("✓").green().bold(),
                style(&video_id).yellow(),
                style(format!("[{}]", format_duration(start.elapsed()))).dim()
            );
            eprintln!("{}", style("─".repeat(60)).dim());
            println!("{}", render_summary(&text));
            Ok(true)
        }
        SummaryResult::Failed(message) => {
            report_error(message);
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DigestConfig::from_env();
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    tracing::debug!(?config, "configuration loaded");

    let succeeded = match cli.command {
        Command::Transcript {
            url,
            json,
            page_file,
        } => run_transcript(config, url, page_file, json).await?,
        Command::Parse { file } => run_parse(file).await?,
        Command::Summarize { url, backend_url } => {
            run_summarize(config, url, backend_url).await?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}
