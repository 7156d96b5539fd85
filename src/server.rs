//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum
//! server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;

use crate::application::services::{
    AuthService, CacheKeys, JwtConfig, SubscriptionCache, SubscriptionService,
};
use crate::application::workers::{BillingReminderWorker, CacheRefreshWorker};
use crate::config::Config;
use crate::infrastructure::cache::{KeyValueCache, NullCache, RedisCache};
use crate::infrastructure::email::SmtpNotifier;
use crate::infrastructure::persistence::{PgSubscriptionRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::AppState;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (fatal on failure; the service never runs
///   without a store)
/// - Embedded migrations
/// - Redis cache, falling back to the no-op cache when unavailable
/// - Cache refresh worker, and the reminder worker when SMTP is configured
/// - Axum HTTP server with graceful shutdown on ctrl-c
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let backend: Arc<dyn KeyValueCache> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let pool = Arc::new(pool);
    let subscription_repository = Arc::new(PgSubscriptionRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));

    let subscription_cache = Arc::new(SubscriptionCache::new(
        backend,
        config.cache_ttl_seconds,
        CacheKeys {
            user_subscriptions: config.cache_key_user_subscriptions.clone(),
            user_stats: config.cache_key_user_stats.clone(),
        },
    ));

    let subscription_service = Arc::new(SubscriptionService::new(
        subscription_repository.clone(),
        subscription_cache.clone(),
    ));

    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        JwtConfig {
            secret: config.jwt_secret.clone(),
            access_ttl_seconds: config.access_token_ttl_seconds,
            refresh_ttl_seconds: config.refresh_token_ttl_seconds,
        },
    ));

    let mut refresh_worker = CacheRefreshWorker::new(
        subscription_repository.clone(),
        subscription_cache.clone(),
        Duration::from_secs(config.cache_refresh_interval_seconds),
        Duration::from_secs(config.cache_check_interval_seconds),
    );
    refresh_worker.start().await;
    tracing::info!("Cache refresh worker started");

    let reminder_worker = match &config.smtp {
        Some(smtp) => {
            let notifier = Arc::new(SmtpNotifier::new(smtp.clone())?);
            let mut worker = BillingReminderWorker::new(
                subscription_repository,
                user_repository,
                notifier,
                Duration::from_secs(config.reminder_interval_seconds),
                config.reminder_window_days,
            );
            worker.start();
            tracing::info!("Billing reminder worker started");
            Some(worker)
        }
        None => {
            tracing::info!("SMTP not configured, reminder worker disabled");
            None
        }
    };

    let state = AppState::new(auth_service, subscription_service, subscription_cache);

    let app = app_router(state, &config.cors_allowed_origins);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    refresh_worker.shutdown(SHUTDOWN_GRACE).await;
    if let Some(worker) = reminder_worker {
        worker.shutdown(SHUTDOWN_GRACE).await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
