//! DraftWorks CLI entry point.
//!
//! This binary is the composition root for the entire system:
//!
//! 1. **Load configuration** — `.env` (when present) plus process
//!    environment, resolved once into [`config::Settings`].
//! 2. **Wire observability** — `tracing-subscriber` with an env-filter
//!    (`RUST_LOG`), defaulting to `info`.
//! 3. **Construct infrastructure** — the two provider clients and the
//!    artifact store, injected into [`agents::BlogPipeline`].
//! 4. **Select driver** — `generate` runs the pipeline once and logs
//!    progress; `serve` exposes the WebSocket streaming endpoint.

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use agents::{BlogPipeline, OutputStore};
use llm::{CohereClient, TogetherClient};
use pipeline::ProgressEvent;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "draftworks", about = "Five-stage LLM blog-generation pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline once and write the artifacts to the output directory.
    Generate {
        /// Topic to research and write about.
        #[arg(long, default_value = "Artificial Intelligence in Healthcare")]
        topic: String,
        /// Override the artifact output directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Serve the WebSocket progress-streaming endpoint.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Command::Generate { topic, output_dir } => {
            let blog = build_pipeline(&settings, output_dir);
            run_once(blog, &topic).await;
            Ok(())
        }
        Command::Serve { bind } => {
            let blog = Arc::new(build_pipeline(&settings, None));
            listener::serve(bind, blog).await
        }
    }
}

fn build_pipeline(settings: &Settings, output_dir: Option<PathBuf>) -> BlogPipeline {
    let chat = Arc::new(TogetherClient::new(settings.together.clone()));
    let generator = Arc::new(CohereClient::new(settings.cohere.clone()));
    let store = OutputStore::new(output_dir.unwrap_or_else(|| settings.output_dir.clone()));
    BlogPipeline::new(chat, generator, store)
}

/// Direct driver: logs each progress event and swallows the top-level
/// pipeline error into a final error log.
async fn run_once(blog: BlogPipeline, topic: &str) {
    info!(topic, "starting blog generation");

    let (events_tx, mut events_rx) = mpsc::channel(16);
    let log_loop = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                ProgressEvent::Stage(update) => {
                    info!(step = update.step, agent = %update.agent, "{}", update.message);
                }
                ProgressEvent::Completed(_) => {
                    info!("blog post generated; artifacts written to the output directory");
                }
                ProgressEvent::Failed(_) | ProgressEvent::Ping(_) => {}
            }
        }
    });

    match blog.run(topic, events_tx).await {
        Ok(outcome) => info!(status = ?outcome.status, "blog generation finished"),
        Err(err) => error!(%err, "blog generation failed"),
    }

    let _ = log_loop.await;
}
