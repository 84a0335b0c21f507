//! CLI argument parsing and the in-process `ask` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use docchat_core::{Config, Personality, Provider, UploadedDocument};
use docchat_ingest::CorpusBuilder;
use docchat_session::{ask, ingest, IngestOutcome, SessionId, SessionState, SettingsUpdate};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "docchat", version, about = "Ask questions about your documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Bind address (overrides HOST).
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides PORT).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Process local files, answer one question, and exit.
    Ask(AskArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// Document to load (PDF, text or markdown). Repeat for several.
    #[arg(long = "file", required = true)]
    pub files: Vec<PathBuf>,

    #[arg(long)]
    pub question: String,

    /// Answer backend (defaults to LLM_PROVIDER).
    #[arg(long)]
    pub provider: Option<Provider>,

    /// API key for the selected provider.
    #[arg(long, env = "DOCCHAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub personality: Option<Personality>,

    /// Print word/character counts and sentiment for each file.
    #[arg(long)]
    pub analytics: bool,
}

#[derive(Debug, Serialize)]
pub struct AskReport {
    pub provider: Provider,
    pub answer: String,
    pub ingest: IngestOutcome,
}

/// Run the upload-then-ask pipeline on local files.
pub async fn run_ask(config: &Config, args: AskArgs) -> anyhow::Result<AskReport> {
    let mut documents = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        documents.push(UploadedDocument::new(&name, bytes));
    }

    let mut state = SessionState::new(SessionId::new_v4(), config);
    state.apply(SettingsUpdate {
        provider: args.provider,
        api_key: args.api_key,
        personality: args.personality,
        analytics_enabled: Some(args.analytics),
        display_char_count: Some(args.analytics),
        display_word_count: Some(args.analytics),
        display_sentiment: Some(args.analytics),
        ..SettingsUpdate::default()
    });

    let outcome = ingest(&mut state, &documents, &CorpusBuilder::default(), config)?;
    info!(documents = outcome.documents.len(), "files processed");

    let answered = ask(&mut state, &args.question).await?;
    Ok(AskReport {
        provider: answered.provider,
        answer: answered.answer,
        ingest: outcome,
    })
}

pub fn print_report(report: &AskReport) -> anyhow::Result<()> {
    for failure in &report.ingest.failures {
        eprintln!("warning: {}: {}", failure.name, failure.error);
    }
    for skipped in &report.ingest.skipped {
        eprintln!("warning: {skipped}: no extractable text");
    }
    println!("{}", report.answer);
    if !report.ingest.analytics.is_empty() {
        println!();
        println!("{}", serde_json::to_string_pretty(&report.ingest.analytics)?);
    }
    Ok(())
}
