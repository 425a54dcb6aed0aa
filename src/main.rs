//! Encache probe
//!
//! Builds the configured cache backend, checks that a memoised call is
//! served from the cache, then keeps the sweep task running until shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use encache::cache::{derive_key, CacheBackend, CacheValue, Signature, ValueKind};
use encache::{BackendKind, Config, LocalMapBackend, RedisStore, RemoteStoreBackend};

/// Main entry point for the cache probe.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured backend and start its sweep
/// 4. Run one memoised call twice (miss, then hit)
/// 5. Wait for SIGINT/SIGTERM and stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, default_ttl={}ms, sweep_interval={}ms",
        config.backend, config.default_ttl_ms, config.sweep_interval_ms
    );

    let backend = build_backend(&config).await?;
    let sweep = backend.periodic_expire(config.sweep_interval());

    for attempt in 1..=2 {
        let (sum, cached) = memoised_add(backend.as_ref(), 19, 23, config.default_ttl())
            .await
            .context("cache probe failed")?;
        info!(attempt, sum, cached, "probe call finished");
    }

    shutdown_signal().await;

    if let Some(sweep) = sweep {
        sweep.shutdown().await;
        info!("Sweep task stopped");
    }

    info!("Shutdown complete");
    Ok(())
}

async fn build_backend(config: &Config) -> anyhow::Result<Arc<dyn CacheBackend>> {
    let backend: Arc<dyn CacheBackend> = match config.backend {
        BackendKind::Map => {
            info!("Using local map backend");
            Arc::new(LocalMapBackend::with_capacity(config.initial_capacity))
        }
        BackendKind::Redis => {
            let store = RedisStore::connect(&config.redis_url)
                .await
                .with_context(|| format!("connecting to {}", config.redis_url))?;
            info!("Using redis backend at {}", config.redis_url);
            Arc::new(RemoteStoreBackend::new(store))
        }
    };
    Ok(backend)
}

/// Adds two numbers through the cache, returning the sum and whether it was cached.
async fn memoised_add(
    backend: &dyn CacheBackend,
    a: i64,
    b: i64,
    ttl: Duration,
) -> encache::Result<(i64, bool)> {
    let key = derive_key("add", &[CacheValue::Int(a), CacheValue::Int(b)]);
    let signature = Signature::new(vec![ValueKind::Int]);

    if let Some(values) = backend.get(&key, &signature).await? {
        if let [CacheValue::Int(sum)] = values.as_slice() {
            return Ok((*sum, true));
        }
        warn!(key = %key, "cached value has unexpected shape, recomputing");
    }

    let sum = a + b;
    backend.set(&key, vec![CacheValue::Int(sum)], ttl).await?;
    Ok((sum, false))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
