//! Scheduled billing reminder emails.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::repositories::{SubscriptionRepository, UserRepository};
use crate::infrastructure::email::Notifier;

/// Sends one reminder email per active subscription due within the
/// configured window, on a fixed schedule.
///
/// A pass runs immediately at startup and then once per interval. Send
/// failures are logged per recipient and never abort the pass; there is
/// no dedup across passes, so a daily interval means at most one mail
/// per subscription per day.
pub struct BillingReminderWorker {
    subscriptions: Arc<dyn SubscriptionRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    window_days: i64,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl BillingReminderWorker {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
        window_days: i64,
    ) -> Self {
        Self {
            subscriptions,
            users,
            notifier,
            interval,
            window_days,
            token: CancellationToken::new(),
            task: None,
        }
    }

    /// Spawns the reminder loop. Call once.
    pub fn start(&mut self) {
        let subscriptions = Arc::clone(&self.subscriptions);
        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);
        let interval = self.interval;
        let window_days = self.window_days;
        let token = self.token.clone();

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let sent = run_pass(&subscriptions, &users, &notifier, window_days).await;
                        info!(sent, "Billing reminder pass complete");
                    }
                }
            }
        }));
    }

    /// Signals the loop to stop. Safe to call any number of times.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Stops the loop and waits up to `grace` for the current pass.
    pub async fn shutdown(mut self, grace: Duration) {
        self.stop();
        if let Some(task) = self.task.take()
            && tokio::time::timeout(grace, task).await.is_err()
        {
            warn!("Reminder worker did not stop within grace period");
        }
        info!("Billing reminder worker stopped");
    }
}

/// One reminder pass. Returns the number of emails sent.
async fn run_pass(
    subscriptions: &Arc<dyn SubscriptionRepository>,
    users: &Arc<dyn UserRepository>,
    notifier: &Arc<dyn Notifier>,
    window_days: i64,
) -> usize {
    let due = match subscriptions.upcoming(window_days).await {
        Ok(due) => due,
        Err(e) => {
            warn!(error = %e, "Failed to load upcoming subscriptions");
            return 0;
        }
    };

    if due.is_empty() {
        debug!("No subscriptions due within the reminder window");
        return 0;
    }

    let mut sent = 0;
    for subscription in &due {
        let recipient = match users.find_by_id(subscription.user_id).await {
            Ok(Some(user)) => user.email,
            Ok(None) => {
                warn!(user_id = subscription.user_id, "Subscription owner no longer exists");
                continue;
            }
            Err(e) => {
                warn!(user_id = subscription.user_id, error = %e, "Failed to resolve recipient");
                continue;
            }
        };

        match notifier.send_billing_reminder(&recipient, subscription).await {
            Ok(()) => sent += 1,
            Err(e) => {
                warn!(recipient, subscription_id = subscription.id, error = %e,
                    "Failed to send billing reminder");
            }
        }
    }
    sent
}
