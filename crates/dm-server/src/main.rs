//! `dm-server` binary: serves the retrieval API over the configured index.
//!
//! No text-generation provider is bundled, so `POST /api/v1/recommend` answers
//! 503 from this binary. Applications that link a provider build their own
//! `AppState` and attach it with `AppState::with_generator`.

use std::path::PathBuf;

use anyhow::Context;
use dm_core::AdvisorConfig;
use dm_server::{app_with_state, state::AppState};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let config = match std::env::var_os("DM_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            AdvisorConfig::from_file(&path)
                .with_context(|| format!("loading config from {}", path.display()))?
        }
        None => AdvisorConfig::default(),
    };
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::from_config(config)?;
    let info = state.bootstrap().await.context("installing startup index")?;
    tracing::info!(dimension = info.dimension, count = info.count, "index ready");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "dm-server listening");
    axum::serve(listener, app_with_state(state)).await?;
    Ok(())
}
