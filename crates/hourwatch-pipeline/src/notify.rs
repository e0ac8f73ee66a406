//! Alert delivery. Each alert is attempted once; failures are reported to the
//! caller and never retried here.

use std::future::Future;
use std::time::Duration;

use hourwatch_core::MismatchAlert;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected alert with HTTP {status}")]
    Rejected { status: u16 },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &MismatchAlert)
        -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Writes alerts to the log. Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, alert: &MismatchAlert) -> Result<(), NotifyError> {
        tracing::warn!(
            restaurant = %alert.name,
            address = %alert.address,
            expected = alert.expected,
            actual = alert.actual,
            time = %alert.local_time,
            "status mismatch detected"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// POSTs `{"text": ...}` to an incoming-webhook URL (Slack-compatible).
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Notifier for WebhookNotifier {
    async fn notify(&self, alert: &MismatchAlert) -> Result<(), NotifyError> {
        let text = alert.text();
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { text: &text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!(restaurant = %alert.name, "mismatch alert delivered");
        Ok(())
    }
}

/// The notifier chosen from configuration.
#[derive(Debug, Clone)]
pub enum AlertNotifier {
    Log(LogNotifier),
    Webhook(WebhookNotifier),
}

impl AlertNotifier {
    /// Webhook delivery when a URL is configured, log-only otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the webhook client cannot be built.
    pub fn from_webhook_url(url: Option<&str>, timeout_secs: u64) -> Result<Self, NotifyError> {
        match url {
            Some(url) => Ok(Self::Webhook(WebhookNotifier::new(url, timeout_secs)?)),
            None => Ok(Self::Log(LogNotifier)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Log(_) => "log",
            Self::Webhook(_) => "webhook",
        }
    }
}

impl Notifier for AlertNotifier {
    async fn notify(&self, alert: &MismatchAlert) -> Result<(), NotifyError> {
        match self {
            Self::Log(n) => n.notify(alert).await,
            Self::Webhook(n) => n.notify(alert).await,
        }
    }
}
