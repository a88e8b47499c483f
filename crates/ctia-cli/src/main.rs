//! CTIA - Canada Trade Intelligence Assistant CLI
//!
//! The `ctia` command turns a free-text trade query into a trade
//! intelligence report.
//!
//! ## Commands
//!
//! - `analyze`: Run one query and print the report
//! - `languages`: List supported report languages

mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ctia_core::{
    AnalysisController, ControllerConfig, ControllerEvent, FixtureProvider, IntelligenceProvider,
    LanguageCode, Phase, ViewState, METRICS,
};
use ctia_gemini::{GeminiConfig, GeminiProvider};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "ctia")]
#[command(author = "CogniCo AI Consulting")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Canada Trade Intelligence Assistant (CTIA)", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a trade query, e.g. "Export canola oil to Malaysia"
    Analyze {
        /// Free-text trade question
        query: String,

        /// Report language (en, fr, ms, tl, id, vi)
        #[arg(short, long, default_value = "en")]
        lang: LanguageCode,

        /// Serve the report from a JSON file instead of calling Gemini
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Report output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,

        /// Give up on the provider after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// List supported report languages
    Languages,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    ctia_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Analyze {
            query,
            lang,
            fixture,
            output,
            timeout_secs,
        } => cmd_analyze(&query, lang, fixture, output, timeout_secs).await,
        Commands::Languages => cmd_languages(),
    };

    METRICS.flush();
    result
}

/// Build the provider: fixture file when given, Gemini otherwise.
fn build_provider(
    fixture: Option<PathBuf>,
    timeout: Option<Duration>,
) -> Result<Arc<dyn IntelligenceProvider>> {
    if let Some(path) = fixture {
        anyhow::ensure!(path.exists(), "fixture not found: {}", path.display());
        return Ok(Arc::new(FixtureProvider::new(path)));
    }

    let mut config = GeminiConfig::from_env();
    if let Some(timeout) = timeout {
        config = config.with_request_timeout(timeout);
    }
    if !config.is_configured() {
        tracing::warn!("no Gemini API key found; analysis will fail");
    }
    let provider = GeminiProvider::new(config).context("Failed to create Gemini client")?;
    Ok(Arc::new(provider))
}

/// Run one query to completion
async fn cmd_analyze(
    query: &str,
    lang: LanguageCode,
    fixture: Option<PathBuf>,
    output: OutputFormat,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let timeout = timeout_secs.filter(|s| *s > 0).map(Duration::from_secs);
    let provider = build_provider(fixture, timeout)?;

    let mut config = ControllerConfig::from_env();
    if let Some(timeout) = timeout {
        config = config.with_provider_timeout(timeout);
    }
    let controller = AnalysisController::new(provider, config);

    let mut events = controller.events();
    let session_id = controller
        .submit(query, lang)
        .context("Cannot analyze query")?;
    info!(session_id = %session_id, "analysis started");

    // Progress goes to stderr when stdout carries JSON.
    let progress = |line: String| match output {
        OutputFormat::Text => println!("{line}"),
        OutputFormat::Json => eprintln!("{line}"),
    };

    loop {
        match events.recv().await {
            Ok(ControllerEvent::PhaseChanged { phase, .. }) => progress(render::phase_line(phase)),
            Ok(ControllerEvent::ViewChanged {
                view: ViewState::Results,
                ..
            })
            | Ok(ControllerEvent::ErrorPublished { .. }) => break,
            Ok(_) => {}
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }

    let snapshot = controller.snapshot();
    match (snapshot.phase(), snapshot.report) {
        (Phase::Complete, Some(report)) => {
            match output {
                OutputFormat::Text => print!("{}", render::report(&report)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(report.as_ref())
                        .context("Failed to serialize report")?
                ),
            }
            Ok(())
        }
        _ => {
            let message = snapshot
                .error
                .unwrap_or_else(|| ctia_core::DEFAULT_FAILURE_MESSAGE.to_string());
            anyhow::bail!(message)
        }
    }
}

/// List supported languages
fn cmd_languages() -> Result<()> {
    print!("{}", render::languages());
    Ok(())
}
