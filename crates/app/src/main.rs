use chrono::Utc;
use clap::{Parser, Subcommand};
use legal_rag_core::{
    build_chunks, load_corpus_file, read_corpus_file, sample_queries, AssistantStatus,
    CharacterNgramEmbedder, CorpusSnapshot, GeminiConfig, GeminiGenerator, LegalAssistant,
    RetryPolicy,
};
use legal_rag_core::generation::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "legal-rag", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, default_value = "")]
    gemini_api_key: String,

    /// Gemini model used for answers
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    gemini_model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_ENDPOINT", default_value = DEFAULT_GEMINI_ENDPOINT)]
    gemini_endpoint: String,

    /// Generation attempts before giving up on rate limits
    #[arg(long, env = "MAX_RETRIES", default_value = "10")]
    max_retries: u32,

    /// Base backoff delay in seconds, doubled per attempt
    #[arg(long, env = "RETRY_DELAY", default_value = "2")]
    retry_delay_secs: u64,

    /// Embedding vector size
    #[arg(long, default_value = "128")]
    embedding_dimensions: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Load a corpus and answer one question.
    Query {
        /// Legal corpus JSON file.
        #[arg(long)]
        corpus: PathBuf,
        /// Question to answer.
        #[arg(long)]
        question: String,
        /// Number of chunks to retrieve.
        #[arg(long, default_value = "5")]
        k: usize,
        /// Print the response as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the chunks a corpus file produces.
    Chunks {
        /// Legal corpus JSON file.
        #[arg(long)]
        corpus: PathBuf,
    },
    /// Load a corpus and report what was indexed.
    Status {
        /// Legal corpus JSON file.
        #[arg(long)]
        corpus: PathBuf,
    },
    /// List example questions.
    Samples,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "legal-rag boot"
    );

    match cli.command {
        Command::Samples => {
            for category in sample_queries() {
                println!("{}:", category.category);
                for question in category.questions {
                    println!("  - {question}");
                }
            }
        }
        Command::Chunks { ref corpus } => {
            let parsed = load_corpus_file(corpus).await?;
            let chunks = build_chunks(&parsed);
            for (position, chunk) in chunks.iter().enumerate() {
                let headline = chunk.text.lines().nth(1).unwrap_or_default();
                println!(
                    "{position:>4} [{}] {} | {}",
                    chunk.kind.as_str(),
                    chunk.law,
                    headline
                );
            }
            println!("{} chunks from {} laws", chunks.len(), parsed.laws.len());
        }
        Command::Status { ref corpus } => {
            // Indexing only; no generation client, so no api key needed.
            let source = read_corpus_file(corpus).await?;
            let snapshot = CorpusSnapshot::build(source, &embedder(&cli))?;
            let status = AssistantStatus::from_snapshot(Some(&snapshot), &cli.gemini_model);
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Query {
            ref corpus,
            ref question,
            k,
            json,
        } => {
            let assistant = build_assistant(&cli)?;
            assistant.load_corpus_file(corpus).await?;
            let response = assistant.query(question, k).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("query_type: {}", response.query_type.as_str());
                println!("chunks_retrieved: {}", response.chunks_retrieved);
                println!("sources: {}", response.sources.join(", "));
                println!();
                println!("{}", response.answer);
            }
        }
    }

    Ok(())
}

fn build_assistant(
    cli: &Cli,
) -> anyhow::Result<LegalAssistant<CharacterNgramEmbedder, GeminiGenerator>> {
    let config = GeminiConfig {
        api_key: cli.gemini_api_key.clone(),
        model: cli.gemini_model.clone(),
        endpoint: cli.gemini_endpoint.clone(),
    };
    let generator = GeminiGenerator::new(config).map_err(|error| {
        warn!(error = %error, "generation client unavailable");
        anyhow::anyhow!("{error}; set GEMINI_API_KEY or pass --gemini-api-key")
    })?;
    let retry = RetryPolicy {
        max_retries: cli.max_retries,
        base_delay: Duration::from_secs(cli.retry_delay_secs),
    };

    Ok(LegalAssistant::with_retry_policy(embedder(cli), generator, retry))
}

fn embedder(cli: &Cli) -> CharacterNgramEmbedder {
    CharacterNgramEmbedder {
        dimensions: cli.embedding_dimensions,
    }
}
