//! SMTP delivery of billing reminder emails.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use tracing::{info, warn};

use crate::domain::entities::Subscription;
use crate::error::AppError;
use serde_json::json;

/// SMTP connection settings for outgoing reminder mail.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

/// Delivery channel for billing reminders.
///
/// The reminder worker only depends on this trait, so tests substitute a
/// recording fake instead of a real SMTP server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends one reminder for a subscription due soon to `recipient`.
    async fn send_billing_reminder(
        &self,
        recipient: &str,
        subscription: &Subscription,
    ) -> Result<(), AppError>;
}

/// Notifier backed by an async SMTP transport.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    /// Builds the SMTP transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the relay host cannot be
    /// resolved into a transport (for example a malformed hostname).
    pub fn new(config: SmtpConfig) -> Result<Self, AppError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| {
                AppError::internal(
                    "Failed to build SMTP transport",
                    json!({ "host": config.host, "error": e.to_string() }),
                )
            })?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address,
        })
    }

    fn render_body(subscription: &Subscription) -> String {
        format!(
            "Hello,\n\n\
             Your subscription for {} is due on {}.\n\
             Amount: ${:.2}\n\
             Billing Cycle: {}\n\n\
             Thank you,\n\
             Subtrack",
            subscription.name,
            subscription.next_billing_date.format("%Y-%m-%d"),
            subscription.price,
            subscription.billing_cycle,
        )
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_billing_reminder(
        &self,
        recipient: &str,
        subscription: &Subscription,
    ) -> Result<(), AppError> {
        let message = Message::builder()
            .from(self.from_address.parse().map_err(|_| {
                AppError::internal("Invalid sender address", json!({ "from": self.from_address }))
            })?)
            .to(recipient.parse().map_err(|_| {
                AppError::bad_request("Invalid recipient address", json!({ "to": recipient }))
            })?)
            .subject(format!("Upcoming Subscription: {}", subscription.name))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::render_body(subscription))
            .map_err(|e| {
                AppError::internal("Failed to build email", json!({ "error": e.to_string() }))
            })?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!(recipient, subscription = %subscription.name, "Reminder email sent");
                Ok(())
            }
            Err(e) => {
                warn!(recipient, error = %e, "Failed to send reminder email");
                Err(AppError::internal(
                    "Failed to send email",
                    json!({ "error": e.to_string() }),
                ))
            }
        }
    }
}
