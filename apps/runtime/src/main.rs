#[cfg(not(any(all(target_os = "macos", target_arch = "aarch64"), target_os = "ios")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use dotenv::dotenv;
use fauna_ml::{ArtifactPaths, Artifacts};
use fauna_web::{State, web_router};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting animal classification front-end");

    let config = config::Config::from_env()?;

    let paths = match &config.artifact_dir {
        Some(dir) => ArtifactPaths::in_dir(dir),
        None => ArtifactPaths::beside_executable()?,
    };

    // Nothing is served unless both artifacts load.
    let artifacts = Artifacts::load(&paths).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load artifacts");
    })?;

    let state = State::new(Arc::new(artifacts))?;
    let app = web_router(state);

    let addr = config.addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
