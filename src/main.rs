use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use policylens_core::{
    CorpusLoader, CorpusProvider, Language, OfflineGenerator, PolicyCategory, Profile,
    SynthesisOptions, TextGenerator,
};
use policylens_corpus::{FallbackCorpusLoader, MarkdownCorpusLoader, StaticCorpusLoader};
use policylens_engine::SummarySynthesizer;
use policylens_watsonx::WatsonxClient;

mod ui;

#[derive(Parser)]
#[command(name = "policylens")]
#[command(about = "Personalized policy relevance summaries", long_about = None)]
struct Cli {
    /// Profile JSON file
    #[arg(short, long)]
    profile: PathBuf,

    /// Markdown corpus file or directory (the built-in corpus is used otherwise)
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    /// Skip watsonx even when credentials are configured
    #[arg(long)]
    offline: bool,

    /// Print the summary and metadata as JSON
    #[arg(long)]
    json: bool,

    /// Do not call the text generator
    #[arg(long)]
    no_detailed_analysis: bool,

    #[arg(long, default_value_t = 5)]
    max_recommendations: usize,

    /// Response language: en, zh-hk or zh-cn
    #[arg(short, long, default_value = "en")]
    language: Language,

    /// Categories to list first, comma separated
    #[arg(long, value_delimiter = ',')]
    focus: Vec<PolicyCategory>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let profile = read_profile(&cli.profile).await?;
    let generator = build_generator(cli.offline).await;

    let primary: Arc<dyn CorpusLoader> = match &cli.corpus {
        Some(path) => Arc::new(MarkdownCorpusLoader::new(path)),
        None => Arc::new(StaticCorpusLoader::new()),
    };
    let loader = FallbackCorpusLoader::new(primary, Arc::new(StaticCorpusLoader::new()));
    let corpus = Arc::new(CorpusProvider::new(Arc::new(loader)));

    let options = SynthesisOptions {
        include_detailed_analysis: !cli.no_detailed_analysis,
        max_recommendations: cli.max_recommendations,
        language: cli.language,
        focus_categories: (!cli.focus.is_empty()).then_some(cli.focus),
    };

    let synthesizer = SummarySynthesizer::new(corpus, generator);
    let (summary, metadata) = synthesizer
        .synthesize(&profile, &options)
        .await
        .context("Failed to build personalized summary")?;

    if cli.json {
        let output = serde_json::json!({
            "summary": summary,
            "metadata": metadata,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", ui::render_summary(&summary, &metadata));
    }

    Ok(())
}

/// Log to stderr so JSON on stdout stays machine-readable
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policylens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn read_profile(path: &Path) -> Result<Profile> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid profile JSON in {}", path.display()))
}

/// watsonx when configured and reachable, offline otherwise
async fn build_generator(offline: bool) -> Arc<dyn TextGenerator> {
    if offline {
        info!("Running offline, summaries use policy text only");
        return Arc::new(OfflineGenerator);
    }

    let mut client = match WatsonxClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            info!("watsonx not configured ({}), running offline", e);
            return Arc::new(OfflineGenerator);
        }
    };

    match client.connect().await {
        Ok(()) => {
            info!("Using {}", client.provider_id());
            Arc::new(client)
        }
        Err(e) => {
            warn!("watsonx connection failed: {}. Continuing offline.", e);
            eprintln!("{} watsonx unavailable, using policy text only", "⚠️".yellow());
            Arc::new(OfflineGenerator)
        }
    }
}
