use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use posecast::{App, AppConfig, Device, ModelVariant, build_router};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "posecast", version, about = "Serve a live posed avatar as an HTTP stream")]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long, env = "POSECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Model checkpoint variant.
    #[arg(long, value_enum, env = "POSECAST_MODEL")]
    model: Option<ModelVariant>,

    /// Compute device.
    #[arg(long, value_enum, env = "POSECAST_DEVICE")]
    device: Option<Device>,

    /// HTTP listen address.
    #[arg(long, env = "POSECAST_LISTEN")]
    listen: Option<SocketAddr>,

    /// Render-loop period in milliseconds.
    #[arg(long, env = "POSECAST_TICK_MS")]
    tick_ms: Option<u64>,

    /// Stream viewer re-check interval in milliseconds.
    #[arg(long, env = "POSECAST_STREAM_IDLE_MS")]
    stream_idle_ms: Option<u64>,

    /// Seed for the animation RNG.
    #[arg(long, env = "POSECAST_SEED")]
    seed: Option<u64>,

    /// Character image to load at startup.
    #[arg(long = "char", env = "POSECAST_CHAR")]
    character: Option<PathBuf>,

    /// Image shown when a character fails to decode.
    #[arg(long, env = "POSECAST_PLACEHOLDER")]
    placeholder: Option<PathBuf>,

    /// Largest accepted character upload in bytes.
    #[arg(long, env = "POSECAST_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Pause after the first rendered frame.
    #[arg(long, default_value_t = false)]
    start_paused: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::from_path(path)?,
            None => AppConfig::default(),
        };
        if let Some(model) = self.model {
            cfg.model = model;
        }
        if let Some(device) = self.device {
            cfg.device = device;
        }
        if let Some(listen) = self.listen {
            cfg.listen = listen;
        }
        if let Some(ms) = self.tick_ms {
            cfg.tick_interval_ms = ms;
        }
        if let Some(ms) = self.stream_idle_ms {
            cfg.stream_idle_ms = ms;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.character.is_some() {
            cfg.initial_image = self.character;
        }
        if self.placeholder.is_some() {
            cfg.placeholder = self.placeholder;
        }
        if let Some(bytes) = self.max_upload_bytes {
            cfg.max_upload_bytes = bytes;
        }
        cfg.start_paused |= self.start_paused;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = Cli::parse().into_config()?;
    let app = Arc::new(App::from_config(&cfg).context("initialize avatar")?);

    if let Some(path) = &cfg.initial_image {
        if let Err(err) = app.load_path(path) {
            tracing::warn!(path = %path.display(), error = %err, "initial character not loaded");
        }
    }
    app.start()?;

    let listener = tokio::net::TcpListener::bind(cfg.listen)
        .await
        .with_context(|| format!("bind {}", cfg.listen))?;
    tracing::info!(addr = %cfg.listen, "posecast listening");

    let router = build_router(Arc::clone(&app));
    axum::serve(listener, router)
        .with_graceful_shutdown({
            let app = Arc::clone(&app);
            async move {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %err, "ctrl-c handler failed");
                }
                if let Err(err) = tokio::task::spawn_blocking(move || app.shutdown()).await {
                    tracing::error!(error = %err, "shutdown task failed");
                }
            }
        })
        .await
        .context("serve http")?;
    Ok(())
}
