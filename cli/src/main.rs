//! chainlab - LLM building blocks from the terminal.
//!
//! # Usage
//!
//! ```bash
//! chainlab rag --document report.txt
//! chainlab hospital --memory
//! chainlab summarize-note --file note.txt
//! chainlab travel-plan --destination "Lisbon, Portugal" --days 3
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chainlab_cli::{
    AppConfig, HospitalSession, RagSession, TravelPlanner, TravelRequest, logging, note, repl,
};
use chainlab_ingest::Document;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser)]
#[command(name = "chainlab", version, about)]
struct Cli {
    /// Config file (default: <config_dir>/chainlab/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask questions about a text document
    Rag {
        /// UTF-8 text, pages separated by form feeds
        #[arg(long)]
        document: PathBuf,
    },

    /// Chat with a hospital assistant that can look up patients
    Hospital {
        /// Keep the conversation and reuse earlier tool results
        #[arg(long)]
        memory: bool,
    },

    /// Summarize a patient note into JSON
    SummarizeNote {
        /// Note to summarize (default: a built-in sample)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Build a structured multi-day travel plan
    TravelPlan {
        #[arg(long, default_value = "Lisbon, Portugal")]
        destination: String,

        #[arg(long, default_value_t = 3)]
        days: u32,

        #[arg(
            long,
            default_value = "food-loving traveler on a moderate budget who prefers to walk"
        )]
        style: String,

        #[arg(long, default_value = "Avoid long drives; keep evenings relaxed")]
        constraints: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    let config = AppConfig::load(cli.config.as_deref())?;
    let api_key = config
        .api_key()
        .ok_or_else(|| anyhow!("no API key: set OPENAI_API_KEY or openai.api_key in the config"))?;

    match cli.command {
        Command::Rag { document } => {
            let document = Document::load(&document)
                .with_context(|| format!("failed to load {}", document.display()))?;
            let mut session = RagSession::start(
                config.retrieval.clone(),
                Arc::new(config.embedder(&api_key)),
                Arc::new(config.chat_model(&api_key, 0.0)),
                &document,
            )
            .await?;

            let stdin = BufReader::new(tokio::io::stdin());
            repl::run(&mut session, stdin, &mut std::io::stdout()).await?;
            session.end();
        }
        Command::Hospital { memory } => {
            let mut session = HospitalSession::start(
                Arc::new(config.chat_model(&api_key, 0.0)),
                Arc::new(config.chat_model(&api_key, 0.0)),
                memory,
            );

            let stdin = BufReader::new(tokio::io::stdin());
            repl::run(&mut session, stdin, &mut std::io::stdout()).await?;
            session.end();
        }
        Command::SummarizeNote { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => note::SAMPLE_NOTE.to_string(),
            };
            let model = config.chat_model(&api_key, 0.0);
            let summary = note::summarize_note(&model, &text).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::TravelPlan {
            destination,
            days,
            style,
            constraints,
        } => {
            let model = Arc::new(config.chat_model(&api_key, 0.0));
            let planner = TravelPlanner::new(model, config.travel.clone())?;
            let plan = planner
                .plan(&TravelRequest {
                    destination,
                    days,
                    style,
                    constraints,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    info!("Done");
    Ok(())
}
