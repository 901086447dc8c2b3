//! synthese command-line interface.
//!
//! - `process <url>`: ingest a URL through the full pipeline and store it
//! - `summarize [FILE]`: summarize a file (or stdin) without storing anything
//!
//! Configuration comes from the same `SYNTHESE_*` environment and config file
//! as the MCP server. Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use synthese_client::Pipeline;
use synthese_core::{AppConfig, Summarizer};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize YouTube transcripts and web pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, summarize and store a URL
    Process(ProcessArgs),

    /// Summarize text from a file or stdin
    Summarize(SummarizeArgs),
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// YouTube link or web page URL
    #[arg(required = true)]
    url: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Number of sentences to keep (default: from configuration)
    #[arg(short, long)]
    sentences: Option<usize>,

    /// Print every selected sentence with its score as JSON
    #[arg(long)]
    json: bool,

    /// Input file; reads stdin when omitted
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::debug!(db_path = %config.db_path.display(), language = %config.language, "configuration loaded");

    match cli.command {
        Commands::Process(args) => process(&config, args).await,
        Commands::Summarize(args) => summarize(&config, args).await,
    }
}

async fn process(config: &AppConfig, args: ProcessArgs) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config).await?;
    let outcome = pipeline.process(&args.url).await?;
    tracing::debug!(document_id = %outcome.document_id, url = %args.url, "stored document");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("document {}", outcome.document_id);
        println!("{}", outcome.summary);
    }
    Ok(())
}

async fn summarize(config: &AppConfig, args: SummarizeArgs) -> anyhow::Result<()> {
    let text = read_input(args.file.as_deref()).await?;
    let sentence_count = args.sentences.unwrap_or(config.summary_sentences);
    tracing::debug!(chars = text.chars().count(), sentence_count, "summarizing input");

    let summarizer = Summarizer::from_config(config)?;
    let summary = summarizer.summarize(&text, sentence_count)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.text);
    }
    Ok(())
}

/// Contents of `file`, or all of stdin when no file is given.
async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    let text = match file {
        Some(path) => {
            tokio::fs::read_to_string(path).await.with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await.context("failed to read stdin")?;
            buf
        }
    };
    let source = file.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    tracing::debug!(%source, bytes = text.len(), "read input");
    Ok(text)
}
