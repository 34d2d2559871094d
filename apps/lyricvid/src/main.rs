use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{FileDownloadTrigger, RenderClient, SubmissionController, UiStateStore};
use shared::protocol::CreateVideoRequest;
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use config::load_settings;

/// Render a lyrics video from an image, an audio track and an SRT file.
#[derive(Parser, Debug)]
#[command(name = "lyricvid", version)]
struct Args {
    /// Image URL (Dropbox links are fine).
    #[arg(long, default_value = "")]
    image_url: String,
    /// Audio URL.
    #[arg(long, default_value = "")]
    audio_url: String,
    /// Lyrics (SRT) URL.
    #[arg(long, default_value = "")]
    lyrics_url: String,
    /// Base URL of the render service; overrides config and env.
    #[arg(long)]
    server_url: Option<String>,
    /// Directory the rendered video is saved into.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Config file; defaults to ./lyricvid.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(output_dir) = args.output_dir {
        settings.output_dir = output_dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&settings.log_filter).with_context(|| {
            format!("invalid log filter '{}'", settings.log_filter)
        })?)
        .with_writer(std::io::stderr)
        .init();

    let client = RenderClient::new(&settings.server_url)
        .with_context(|| format!("cannot use render service url '{}'", settings.server_url))?;
    tracing::info!(endpoint = %client.endpoint(), output_dir = %settings.output_dir.display(), "lyricvid ready");

    let state = Arc::new(UiStateStore::new());
    let view = view::spawn(state.subscribe());
    let controller = SubmissionController::new(
        client,
        FileDownloadTrigger::new(&settings.output_dir),
        Arc::clone(&state),
    );

    let request = CreateVideoRequest::new(args.image_url, args.audio_url, args.lyrics_url);
    let result = controller.submit(request).await;

    drop(controller);
    drop(state);
    view.await.context("view task failed")?;

    match result {
        Ok(saved) => {
            println!("{}", saved.path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
