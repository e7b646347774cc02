use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};
use ts_core::{SummaryRequest, TargetLength};
use ts_inference::models::{create_model, ModelKind};
use ts_inference::{InferenceConfig, Summarizer};
use ts_sources::{ensure_pdf_file_name, extract_pdf_text, extract_video_id, TranscriptFetcher};
use ts_web::{create_app, AppState, WebConfig};

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize text, PDFs and YouTube transcripts", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(long, value_enum, default_value_t = ModelKind::Huggingface, global = true)]
    model: ModelKind,
    /// Override HUGGINGFACE_MODEL
    #[arg(long, global = true)]
    model_id: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Transcript language preference, comma separated
        #[arg(long, value_delimiter = ',')]
        languages: Vec<String>,
    },
    /// Summarize a single input and print the result as JSON
    Summarize {
        #[command(subcommand)]
        input: SummarizeInput,
    },
}

#[derive(Subcommand, Debug)]
enum SummarizeInput {
    /// Text given as an argument, or read from stdin when omitted
    Text {
        text: Option<String>,
        #[arg(long, default_value_t = 150)]
        max_length: u32,
    },
    Pdf {
        path: PathBuf,
        #[arg(long, default_value_t = 150)]
        max_length: u32,
    },
    Youtube {
        url: String,
        #[arg(long, default_value_t = 150)]
        max_length: u32,
        #[arg(long, value_delimiter = ',')]
        languages: Vec<String>,
    },
}

async fn serve(summarizer: Summarizer, host: String, port: u16, languages: Vec<String>) -> anyhow::Result<()> {
    let transcripts = TranscriptFetcher::new()?.with_languages(languages);
    let web_config = WebConfig::from_env();
    if web_config.allowed_origins.is_empty() {
        warn!("CORS_ALLOWED_ORIGINS not set, allowing any origin");
    }

    let app = create_app(AppState::new(summarizer, transcripts), &web_config);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;
    info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("👋 Shutting down");
        })
        .await?;
    Ok(())
}

async fn summarize(summarizer: &Summarizer, input: SummarizeInput) -> anyhow::Result<serde_json::Value> {
    let (text, max_length, video_id) = match input {
        SummarizeInput::Text { text, max_length } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                    buf
                }
            };
            (text, max_length, None)
        }
        SummarizeInput::Pdf { path, max_length } => {
            ensure_pdf_file_name(&path.to_string_lossy())?;
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            (extract_pdf_text(bytes).await?, max_length, None)
        }
        SummarizeInput::Youtube { url, max_length, languages } => {
            let video_id = extract_video_id(&url)?;
            let fetcher = TranscriptFetcher::new()?.with_languages(languages);
            (fetcher.fetch_text(&video_id).await?, max_length, Some(video_id))
        }
    };

    let request = SummaryRequest::new(text, TargetLength::from_words(max_length))?;
    let result = summarizer.summarize_request(request).await?;
    let mut value = serde_json::to_value(&result)?;
    if let (Some(video_id), Some(map)) = (video_id, value.as_object_mut()) {
        map.insert("video_id".to_string(), serde_json::Value::String(video_id));
    }
    Ok(value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded_env = dotenvy::dotenv().is_ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    if loaded_env {
        info!("Loaded environment from .env");
    }

    let mut config = InferenceConfig::from_env()?;
    if let Some(model_id) = cli.model_id {
        config = config.with_model_id(model_id);
    }
    if cli.model == ModelKind::Huggingface && config.api_token.is_none() {
        warn!("HUGGINGFACE_TOKEN not set, calling the inference API unauthenticated");
    }
    let summarizer = Summarizer::new(create_model(cli.model, &config)?);

    match cli.command {
        Commands::Serve { host, port, languages } => serve(summarizer, host, port, languages).await,
        Commands::Summarize { input } => {
            let value = summarize(&summarizer, input).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}
