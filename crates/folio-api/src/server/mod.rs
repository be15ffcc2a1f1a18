//! Server setup and initialization
//!
//! Builds the store, feed and service context from configuration, assembles
//! the router and serves it until a shutdown signal arrives.

use std::sync::Arc;

use axum::Router;
use folio_cache::RedisPool;
use folio_common::{AppConfig, AppError, IdentityVerifier, StoreBackend};
use folio_db::{
    create_pool, run_migrations, MemoryStore, PgAdminRepository, PgCommentRepository,
    PgReactionRepository,
};
use folio_service::feed::DEFAULT_FEED_CAPACITY;
use folio_service::{ChangeFeed, InviteLookup, ServiceContextBuilder, ServiceSettings};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application. Health probes sit outside the
/// middleware stack so the rate limiter never rejects them.
pub fn create_app(state: AppState) -> Router {
    let api = apply_middleware(create_router(), state.config());
    api.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let identity = Arc::new(IdentityVerifier::new(&config.identity));
    let mut builder = ServiceContextBuilder::new()
        .identity(identity)
        .settings(ServiceSettings::from(&config));

    builder = match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            builder.store(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let database = config.store.database.as_ref().ok_or_else(|| {
                AppError::Config("DATABASE_URL is required for the postgres store".to_string())
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&folio_db::DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            builder
                .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
                .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
                .admin_repo(Arc::new(PgAdminRepository::new(pool)))
        }
    };

    let redis_pool = match &config.redis {
        Some(redis) => {
            info!("Connecting to Redis...");
            let pool = RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
            let feed = ChangeFeed::with_redis(pool.clone(), &redis.url, DEFAULT_FEED_CAPACITY)
                .await
                .map_err(|e| AppError::Cache(e.to_string()))?;
            builder = builder.feed(feed);
            info!("Redis connection established");
            Some(pool)
        }
        None => {
            info!("Redis not configured; change feed is local to this instance");
            None
        }
    };

    if config.invites.enabled {
        builder = builder.invites(InviteLookup::new(&config.invites)?);
    }

    let service_context = builder.build()?;

    let state = AppState::new(service_context, config);
    Ok(match redis_pool {
        Some(pool) => state.with_redis(pool),
        None => state,
    })
}

/// Serve on an already bound listener until shutdown
pub async fn run_with_listener(listener: TcpListener, state: AppState) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Listener has no address: {e}")))?;
    info!("Server listening on http://{}", addr);

    let app = create_app(state.clone());
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")));

    state.service_context().dispose().await;
    info!("Server stopped");
    result
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    let state = create_app_state(config).await?;

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    run_with_listener(listener, state).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
