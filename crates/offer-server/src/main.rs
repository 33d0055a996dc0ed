//! Offer Rules HTTP Server
//!
//! Provides a REST API for evaluating offers against the active rule
//! package. The rule package is loaded from an artifact registry at
//! startup and hot-swapped in the background as newer versions are
//! published.

use anyhow::{Context, Result};
use offer_core::{Coordinate, VersionSelector};
use offer_registry::{HttpArtifactRegistry, RegistryConfig};
use offer_runtime::{ContainerSettings, RuntimeContainer, VersionPoller};
use offer_server::api;
use offer_server::config::ServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing()?;

    // Load configuration
    let config = ServerConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    // Build the registry client
    let mut registry_config = RegistryConfig::new(config.rules.registry_url.clone());
    if let Some(api_key) = &config.rules.api_key {
        registry_config = registry_config.with_api_key(api_key.clone());
    }
    let resolver = Arc::new(HttpArtifactRegistry::new(registry_config)?);

    // Build the runtime container
    let coordinate = Coordinate::new(&config.rules.group_id, &config.rules.artifact_id);
    let settings = ContainerSettings::new(&config.rules.entry_point)
        .with_selector(VersionSelector::parse(&config.rules.version))
        .with_auto_reload(config.rules.auto_reload)
        .with_poll_interval(Duration::from_secs(config.rules.poll_interval_seconds));
    let container = Arc::new(RuntimeContainer::new(coordinate, settings));

    // Initial load is fatal: refuse to start without a rule package
    let release = container
        .load_initial(resolver.as_ref())
        .await
        .context("failed to load initial rule package")?;
    info!("Rule package loaded: {}", release);

    // Background version polling
    let poller_handle = if config.rules.auto_reload {
        Some(VersionPoller::new(container.clone(), resolver).spawn())
    } else {
        info!("Auto-reload disabled; rule package is pinned for the process lifetime");
        None
    };

    // Create router
    let app = api::create_router(container);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    info!("✓ Server listening on http://{}", addr);
    info!("  Health check: http://{}/health", addr);
    info!("  Evaluate offer: POST http://{}/v1/offers/evaluate", addr);
    info!("  Rules status: http://{}/v1/rules/status", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = poller_handle {
        handle.shutdown().await;
    }

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "offer_server=info,offer_runtime=info,offer_registry=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
