use anyhow::{bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use qcat::{ApiState, Categorizer, ProviderConfig, RestApi};
use qcat_embed::hashing::DEFAULT_HASH_DIM;
use qcat_embed::http::{DEFAULT_DIMENSION, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Embedding based question categorizer
#[derive(Parser, Debug)]
#[command(name = "qcat")]
#[command(about = "Categorize e-commerce support questions by embedding similarity", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Address to bind the HTTP API to
    #[arg(long, env = "QCAT_HOST", default_value = "0.0.0.0", global = true)]
    host: String,

    /// HTTP API port
    #[arg(long, env = "QCAT_PORT", default_value_t = 5002, global = true)]
    port: u16,

    /// Report `is_high_similarity` for confidences at or above this value
    #[arg(long, env = "QCAT_HIGH_SIMILARITY_THRESHOLD", global = true)]
    high_similarity_threshold: Option<f32>,

    /// Log level
    #[arg(long, env = "QCAT_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(flatten)]
    embedder: EmbedderArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Categorize questions from the command line and print JSON
    Classify {
        /// Questions to categorize
        #[arg(required = true)]
        questions: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EmbedderKind {
    /// Offline trigram feature hashing
    Hashing,
    /// OpenAI-compatible /embeddings endpoint
    Http,
}

#[derive(ClapArgs, Debug)]
struct EmbedderArgs {
    /// Embedding provider
    #[arg(long, env = "QCAT_EMBEDDER", value_enum, default_value_t = EmbedderKind::Hashing, global = true)]
    embedder: EmbedderKind,

    /// Base URL of the embedding API, e.g. http://localhost:8080/v1
    #[arg(long, env = "QCAT_EMBEDDING_URL", global = true)]
    embedding_url: Option<String>,

    /// Embedding model name sent to the API
    #[arg(long, env = "QCAT_EMBEDDING_MODEL", default_value = DEFAULT_MODEL, global = true)]
    embedding_model: String,

    /// Bearer token for the embedding API
    #[arg(long, env = "QCAT_EMBEDDING_API_KEY", hide_env_values = true, global = true)]
    embedding_api_key: Option<String>,

    /// Embedding dimension
    #[arg(long, env = "QCAT_EMBEDDING_DIM", global = true)]
    embedding_dim: Option<usize>,

    /// Embedding request timeout in seconds
    #[arg(long, env = "QCAT_EMBEDDING_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    embedding_timeout: u64,
}

impl EmbedderArgs {
    fn provider_config(&self) -> anyhow::Result<ProviderConfig> {
        match self.embedder {
            EmbedderKind::Hashing => Ok(ProviderConfig::Hashing {
                dim: self.embedding_dim.unwrap_or(DEFAULT_HASH_DIM),
            }),
            EmbedderKind::Http => {
                let Some(base_url) = self.embedding_url.clone() else {
                    bail!("--embedding-url is required with --embedder http");
                };
                Ok(ProviderConfig::Http {
                    base_url,
                    model: self.embedding_model.clone(),
                    api_key: self.embedding_api_key.clone(),
                    dimension: self.embedding_dim.unwrap_or(DEFAULT_DIMENSION),
                    timeout_secs: self.embedding_timeout,
                })
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout is reserved for `classify` output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(threshold) = args.high_similarity_threshold {
        if !(-1.0..=1.0).contains(&threshold) {
            bail!("--high-similarity-threshold must be within [-1, 1], got {}", threshold);
        }
    }

    info!("Starting qcat v{}", env!("CARGO_PKG_VERSION"));

    let provider = args
        .embedder
        .provider_config()?
        .build()
        .context("embedding provider unavailable")?;
    let categorizer =
        Arc::new(Categorizer::new(provider).context("failed to build category centroids")?);
    info!("Categorizer initialized");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(categorizer, &args.host, args.port, args.high_similarity_threshold),
        Command::Classify { questions } => classify(&categorizer, &questions),
    }
}

fn serve(
    categorizer: Arc<Categorizer>,
    host: &str,
    port: u16,
    high_similarity_threshold: Option<f32>,
) -> anyhow::Result<()> {
    let mut state = ApiState::new(categorizer);
    if let Some(threshold) = high_similarity_threshold {
        state = state.with_high_similarity_threshold(threshold);
    }

    info!("HTTP API: http://{}:{}/", host, port);

    let sys = actix_web::rt::System::new();
    sys.block_on(RestApi::start(Arc::new(state), host, port))
        .with_context(|| format!("HTTP server on {}:{} failed", host, port))?;

    info!("Shutting down...");
    Ok(())
}

fn classify(categorizer: &Categorizer, questions: &[String]) -> anyhow::Result<()> {
    for question in questions {
        let result = categorizer
            .categorize(question)
            .with_context(|| format!("failed to categorize {:?}", question))?;
        let line = serde_json::json!({
            "question": question,
            "result": result,
        });
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}
