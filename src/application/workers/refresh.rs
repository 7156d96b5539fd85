//! Background cache maintenance: warm-up, periodic refresh, and
//! change-driven refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::services::SubscriptionCache;
use crate::domain::repositories::SubscriptionRepository;

/// Keeps per-user cache entries warm so interactive reads rarely miss.
///
/// [`start`](Self::start) performs a synchronous warm-up and then spawns
/// two loops: a fixed-interval refresh of every active user, and a faster
/// poll of the store's change watermark that refreshes early when any
/// subscription row was written. Both loops stop when the worker is
/// cancelled; a refresh pass that is already underway finishes first.
///
/// A refresh pass and a concurrent write can race: the pass may briefly
/// reinstate an entry the write just invalidated. The entry is at most
/// one pass stale and expires with the TTL, which the API tolerates.
pub struct CacheRefreshWorker {
    repository: Arc<dyn SubscriptionRepository>,
    cache: Arc<SubscriptionCache>,
    refresh_interval: Duration,
    check_interval: Duration,
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl CacheRefreshWorker {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        cache: Arc<SubscriptionCache>,
        refresh_interval: Duration,
        check_interval: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            refresh_interval,
            check_interval,
            token: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    /// Warms the cache for every active user, then spawns the refresh and
    /// change-check loops. Call once.
    pub async fn start(&mut self) {
        info!("Warming subscription cache");
        let warmed = refresh_all(&self.repository, &self.cache).await;
        info!(users = warmed, "Cache warm-up complete");

        let watermark = match self.repository.latest_change().await {
            Ok(ts) => ts,
            Err(e) => {
                warn!(error = %e, "Failed to read change watermark at startup");
                None
            }
        };

        self.tasks.push(tokio::spawn(periodic_refresh_loop(
            Arc::clone(&self.repository),
            Arc::clone(&self.cache),
            self.refresh_interval,
            self.token.clone(),
        )));
        self.tasks.push(tokio::spawn(change_check_loop(
            Arc::clone(&self.repository),
            Arc::clone(&self.cache),
            self.check_interval,
            watermark,
            self.token.clone(),
        )));
    }

    /// Signals both loops to stop. Safe to call any number of times,
    /// including before [`start`](Self::start).
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Stops the loops and waits up to `grace` for each to finish its
    /// current pass.
    pub async fn shutdown(mut self, grace: Duration) {
        self.stop();
        for task in self.tasks.drain(..) {
            if tokio::time::timeout(grace, task).await.is_err() {
                warn!("Cache worker task did not stop within grace period");
            }
        }
        info!("Cache refresh worker stopped");
    }
}

async fn periodic_refresh_loop(
    repository: Arc<dyn SubscriptionRepository>,
    cache: Arc<SubscriptionCache>,
    interval: Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                debug!("Periodic cache refresh");
                refresh_all(&repository, &cache).await;
            }
        }
    }
}

async fn change_check_loop(
    repository: Arc<dyn SubscriptionRepository>,
    cache: Arc<SubscriptionCache>,
    interval: Duration,
    mut last_seen: Option<DateTime<Utc>>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                match repository.latest_change().await {
                    Ok(current) if current > last_seen => {
                        debug!(?current, "Change watermark advanced, refreshing cache");
                        refresh_all(&repository, &cache).await;
                        last_seen = current;
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "Change watermark check failed"),
                }
            }
        }
    }
}

/// Rebuilds the subscription-list and stats entries for every active
/// user. Failures are logged per user and do not abort the pass. Returns
/// the number of users refreshed.
async fn refresh_all(
    repository: &Arc<dyn SubscriptionRepository>,
    cache: &Arc<SubscriptionCache>,
) -> usize {
    let user_ids = match repository.active_user_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "Failed to list users for cache refresh");
            return 0;
        }
    };

    let mut refreshed = 0;
    for user_id in user_ids {
        match repository.list_for_user(user_id).await {
            Ok(list) => cache.cache_user_subscriptions(user_id, &list).await,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to refresh subscription list");
                continue;
            }
        }
        match repository.stats_for_user(user_id).await {
            Ok(stats) => cache.cache_user_stats(user_id, &stats).await,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to refresh stats");
                continue;
            }
        }
        refreshed += 1;
    }
    refreshed
}
