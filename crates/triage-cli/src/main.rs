use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use triage_classify::{DocumentClassifier, EmailClassifier, validate_record};
use triage_core::{Outcome, SourceKind, StoredRecord};
use triage_model::{DEFAULT_BASE_URL, DEFAULT_MODEL, Generator, OllamaClient};
use triage_store::ResultStore;

mod display;
mod ingest;

#[derive(Parser)]
#[command(name = "triage", version, about = "Classify business documents and extract key fields")]
struct Cli {
    /// Base URL of the model service.
    #[arg(long, env = "TRIAGE_MODEL_URL", default_value = DEFAULT_BASE_URL)]
    model_url: String,

    /// Model identifier passed to the generate endpoint.
    #[arg(long, env = "TRIAGE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Skip the model entirely; classify with rules only.
    #[arg(long)]
    no_model: bool,

    /// Path of the on-disk result store.
    #[arg(long, env = "TRIAGE_STORE", default_value = "output/results.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one input file (PDF, text/email, or JSON record).
    Process { path: PathBuf },

    /// Show stored classification records.
    History {
        /// Only records for this conversation id.
        #[arg(long)]
        conversation: Option<String>,
    },

    /// Check whether the model service is reachable.
    Probe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Process { path } => process(&cli, path.clone()).await,
        Command::History { conversation } => history(&cli, conversation.as_deref()),
        Command::Probe => probe(&cli).await,
    }
}

fn generator(cli: &Cli) -> Option<Arc<dyn Generator>> {
    if cli.no_model {
        info!("model disabled, using rule-based classification only");
        return None;
    }
    Some(Arc::new(OllamaClient::new(
        cli.model_url.clone(),
        cli.model.clone(),
    )))
}

async fn process(cli: &Cli, path: PathBuf) -> anyhow::Result<()> {
    let kind = ingest::detect_kind(&path);
    let conversation_id = format!("{}_{}", kind.as_str(), Utc::now().format("%Y%m%d_%H%M%S"));
    info!(path = %path.display(), kind = kind.as_str(), "processing input");

    let outcome = match kind {
        SourceKind::Pdf => {
            let text = ingest::load_pdf_text(&path).context("loading PDF text")?;
            let classifier = match generator(cli) {
                Some(g) => DocumentClassifier::with_generator(g),
                None => DocumentClassifier::rule_only(),
            };
            let result = classifier.classify(&text).await;
            display::print_document(&result);
            Outcome::Document(result)
        }
        SourceKind::Text => {
            let text = ingest::load_text(&path).context("loading text file")?;
            if ingest::looks_like_email(&text) {
                info!("email format detected");
                let classifier = match generator(cli) {
                    Some(g) => EmailClassifier::with_generator(g),
                    None => EmailClassifier::rule_only(),
                };
                let result = classifier.classify(&text).await;
                display::print_email(&result);
                Outcome::Email(result)
            } else {
                let classifier = match generator(cli) {
                    Some(g) => DocumentClassifier::with_generator(g),
                    None => DocumentClassifier::rule_only(),
                };
                let result = classifier.classify(&text).await;
                display::print_document(&result);
                Outcome::Document(result)
            }
        }
        SourceKind::Json => {
            let value = ingest::load_json(&path).context("loading JSON record")?;
            let report = validate_record(&value);
            display::print_record_report(&report);
            Outcome::Record(report)
        }
    };

    // A store failure must not invalidate the result already shown.
    let record = StoredRecord::new(conversation_id, path.display().to_string(), kind, outcome);
    match ResultStore::open(&cli.store) {
        Ok(mut store) => {
            if let Err(e) = store.append(record) {
                error!(error = %e, "failed to persist classification record");
            }
        }
        Err(e) => error!(error = %e, "failed to open result store"),
    }

    Ok(())
}

fn history(cli: &Cli, conversation: Option<&str>) -> anyhow::Result<()> {
    let store = ResultStore::open(&cli.store).context("opening result store")?;
    let records: Vec<_> = match conversation {
        Some(id) => store.by_conversation(id),
        None => store.all().iter().collect(),
    };
    display::print_history(&records);
    Ok(())
}

async fn probe(cli: &Cli) -> anyhow::Result<()> {
    let client = OllamaClient::new(cli.model_url.clone(), cli.model.clone());
    if client.healthy().await {
        println!("model service reachable at {}", client.base_url());
    } else {
        println!(
            "model service NOT reachable at {} (classification will use rules)",
            client.base_url()
        );
    }
    Ok(())
}
