use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use finsig_core::{load_app_config, AppConfig, GenerationMode};
use finsig_index::{
    document_chunks, index_document, ChunkingConfig, Embedder, ExtractionOutcome, HttpEmbedder,
    MemoryIndex, VectorIndex,
};
use finsig_retrieval::{GenerationClient, Retriever};
use finsig_risk::{analyze_context, Article, RiskAggregator, SourceCredibility};

#[derive(Debug, Parser)]
#[command(name = "finsig-cli")]
#[command(about = "FINSIG document intelligence command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show how a document's text would be chunked.
    Chunks {
        /// Plain-text file, or a `.json` extraction result payload.
        #[arg(long)]
        file: String,
        #[arg(long, default_value_t = 1)]
        document_id: i64,
    },
    /// Index a document and answer a question over it in one run.
    Ask {
        #[arg(long)]
        file: String,
        #[arg(long, default_value_t = 1)]
        document_id: i64,
        #[arg(long)]
        question: String,
        /// Optional company name stored as chunk metadata.
        #[arg(long)]
        company: Option<String>,
    },
    /// Score article sentiment focused on one entity.
    Sentiment {
        #[arg(long)]
        text: String,
        #[arg(long)]
        entity: String,
    },
    /// Compute an entity risk assessment from an articles JSON file.
    Risk {
        #[arg(long)]
        entity: String,
        /// JSON array of articles: {sentiment, publishedAt, source: {name}}.
        #[arg(long)]
        articles: String,
        #[arg(long, default_value_t = 7)]
        window_days: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chunks { file, document_id } => chunks(&file, document_id),
        Commands::Ask {
            file,
            document_id,
            question,
            company,
        } => ask(&file, document_id, &question, company).await,
        Commands::Sentiment { text, entity } => {
            let result = analyze_context(&text, &entity);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Risk {
            entity,
            articles,
            window_days,
        } => risk(&entity, &articles, window_days),
    }
}

/// Read document text from a plain-text file, or from a text-extraction
/// collaborator JSON payload when the file ends in `.json`.
fn read_document_text(file: &str) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(file)?;
    if !std::path::Path::new(file)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        return Ok(raw);
    }
    let outcome: ExtractionOutcome = serde_json::from_str(&raw)?;
    match outcome.text_for_indexing() {
        Some(text) => Ok(text.to_string()),
        None => anyhow::bail!(
            "extraction produced no indexable text: {}",
            outcome.error.as_deref().unwrap_or("empty text")
        ),
    }
}

fn chunks(file: &str, document_id: i64) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let text = read_document_text(file)?;
    let chunking = ChunkingConfig {
        chunk_size: config.chunk_size,
        overlap: config.chunk_overlap,
    };
    for chunk in document_chunks(document_id, &text, &chunking)? {
        println!(
            "chunk {}/{} [{}..{}] {} chars",
            chunk.chunk_index + 1,
            chunk.total_chunks,
            chunk.char_start,
            chunk.char_end,
            chunk.text.chars().count()
        );
    }
    Ok(())
}

async fn ask(
    file: &str,
    document_id: i64,
    question: &str,
    company: Option<String>,
) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let text = read_document_text(file)?;

    let embedder = Arc::new(HttpEmbedder::new(
        &config.embedding_url,
        config.request_timeout_secs,
    )?);

    // Probe the embedder once so the index dimension matches the model.
    let probe = embedder.embed(&[question]).await?;
    let dimension = probe
        .first()
        .map(Vec::len)
        .ok_or_else(|| anyhow::anyhow!("embedding service returned no vector"))?;
    let index = Arc::new(MemoryIndex::new(dimension));

    let chunking = ChunkingConfig {
        chunk_size: config.chunk_size,
        overlap: config.chunk_overlap,
    };
    let mut extra = HashMap::new();
    if let Some(company) = company {
        extra.insert("company".to_string(), company);
    }
    let indexed = index_document(
        embedder.as_ref(),
        index.as_ref(),
        document_id,
        &text,
        &chunking,
        extra,
    )
    .await?;
    tracing::info!(
        document_id,
        chunks = indexed,
        vectors = index.count().await,
        "document ready for querying"
    );

    let generator = generation_client(&config)?;
    tracing::info!(simulated = generator.is_simulated(), "generation client ready");
    let retriever = Retriever::new(
        embedder,
        index,
        generator,
        config.top_k,
        Duration::from_secs(config.request_timeout_secs),
    );
    let result = retriever.query(question, Some(document_id), None).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn risk(entity: &str, articles_path: &str, window_days: u32) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let raw = std::fs::read_to_string(articles_path)?;
    let articles: Vec<Article> = serde_json::from_str(&raw)?;

    let aggregator = RiskAggregator::new(
        config.risk_weights,
        SourceCredibility::with_default_weight(config.default_credibility),
    )?;
    let assessment = aggregator.calculate_risk(entity, &articles, window_days);
    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

fn generation_client(config: &AppConfig) -> anyhow::Result<GenerationClient> {
    match config.generation_mode {
        GenerationMode::Simulated => Ok(GenerationClient::simulated()),
        GenerationMode::Live => {
            let url = config
                .generation_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("live generation mode requires FINSIG_GENERATION_URL"))?;
            Ok(GenerationClient::live(url, config.request_timeout_secs)?)
        }
    }
}
