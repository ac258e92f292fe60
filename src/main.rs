use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use litsift::app::AppContext;
use litsift::client::{Document, content_type_for};
use litsift::config::{CONFIG, Config};
use litsift::error::{ApiResult, Failure};
use litsift::web;

#[derive(Parser)]
#[command(name = "litsift", version, about = "Article search and exclusion analysis")]
struct Cli {
    /// Backend base URL, overrides LITSIFT_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web UI
    Serve {
        /// Listen address, overrides LITSIFT_BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Vector search over articles
    Search { message: String },
    /// Generate keyword suggestions for a query
    Keywords { query: String },
    /// Expand a single keyword
    Expand { keyword: String },
    /// Submit a document for exclusion analysis
    Analyze {
        file: PathBuf,
        #[arg(long, default_value = "")]
        criteria: String,
        /// MIME type of the file, guessed from its extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Route log crate records into tracing, then install the subscriber
    tracing_log::LogTracer::init()?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let mut config = Config::clone(&CONFIG);
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url);
    }

    let ctx = AppContext::bootstrap(config)?;

    let outcome = match cli.command {
        Command::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| ctx.config.bind_addr.clone());
            let app = web::create_router(Arc::new(ctx));
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("Failed to bind {bind_addr}"))?;
            tracing::info!("UI listening on http://{}", bind_addr);
            axum::serve(listener, app).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Search { message } => ctx.client.search_articles(&message).await,
        Command::Keywords { query } => ctx.client.generate_keywords(&query).await,
        Command::Expand { keyword } => ctx.client.expand_keyword(&keyword).await,
        Command::Analyze {
            file,
            criteria,
            content_type,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut document = Document::new(file_name, bytes);
            document.content_type =
                content_type.or_else(|| content_type_for(&file).map(str::to_string));
            ctx.client.analyze_document(document, &criteria).await
        }
    };

    print_outcome(&outcome)
}

fn print_outcome(outcome: &ApiResult<Value>) -> anyhow::Result<ExitCode> {
    match outcome {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(payload)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&Failure::from(err))?);
            Ok(ExitCode::FAILURE)
        }
    }
}
