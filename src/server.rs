//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::click_worker::run_click_worker;
use crate::application::services::{LinkService, TieredEntryStore};
use crate::config::{CacheBackend, Config};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::EntryRepository;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::PgEntryRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long shutdown waits for the click worker to drain queued events.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the PostgreSQL pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(pool)
}

/// Builds the configured cache backend.
///
/// An unreachable Redis degrades to the in-process cache rather than
/// failing startup.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let memory = || -> Arc<dyn CacheService> {
        Arc::new(MemoryCache::new(config.cache_memory_capacity))
    };

    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Using in-process cache.",
                    e
                );
                memory()
            }
        },
        (CacheBackend::None, _) => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
        _ => {
            tracing::info!(
                "Cache enabled (in-process, capacity {})",
                config.cache_memory_capacity
            );
            memory()
        }
    }
}

/// Wires the two-tier store over the given collaborators.
pub fn build_store(
    config: &Config,
    cache: Arc<dyn CacheService>,
    repository: Arc<dyn EntryRepository>,
) -> Arc<TieredEntryStore> {
    Arc::new(
        TieredEntryStore::new(cache, repository)
            .with_ttl(config.cache_ttl())
            .with_write_policy(config.cache_write_policy),
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Cache backend (Redis, in-process or none)
/// - Background click worker (when click tracking is enabled)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    let repository: Arc<dyn EntryRepository> = Arc::new(PgEntryRepository::new(Arc::new(pool)));

    let cache = build_cache(&config).await;
    let store = build_store(&config, cache.clone(), repository.clone());

    let mut link_service = LinkService::new(store.clone(), CodeGenerator::default());

    let (click_sender, worker) = if config.click_tracking {
        let (click_tx, click_rx) = mpsc::channel::<ClickEvent>(config.click_queue_capacity);
        let worker = tokio::spawn(run_click_worker(click_rx, store));
        tracing::info!("Click worker started");
        link_service = link_service.with_click_sender(click_tx.clone());
        (Some(click_tx), Some(worker))
    } else {
        tracing::info!("Click tracking disabled");
        (None, None)
    };

    let state = AppState {
        link_service: Arc::new(link_service),
        cache,
        repository,
        click_sender,
    };

    let app = app_router(state, config.request_timeout(), &config.cors_allowed_origins);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned every click sender; the worker finishes once the
    // queue is drained.
    if let Some(worker) = worker {
        match tokio::time::timeout(CLICK_DRAIN_TIMEOUT, worker).await {
            Ok(_) => tracing::info!("Click queue drained"),
            Err(_) => tracing::warn!("Click worker did not drain in time, pending clicks lost"),
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
