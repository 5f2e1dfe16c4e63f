use crate::config::{EmailOptions, SmsOptions};
use crate::notify::entity::{MailMessage, NotificationMessage, WebhookResponse};
use crate::notify::error::NotifyError;
use async_trait::async_trait;
use std::sync::Arc;

/// # Summary
/// Interface for delivering a notification to external systems.
///
/// # Invariants
/// - Implementations must be `Send` and `Sync` to support concurrent calls.
/// - The `notify` method must be asynchronous.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// Delivers one notification.
    ///
    /// # Logic
    /// 1. Renders the message for each target channel.
    /// 2. Transmits it over the channel's transport.
    /// 3. Returns success or the first failure.
    ///
    /// # Arguments
    /// * `message` - The notification to deliver.
    ///
    /// # Returns
    /// * `Ok(())` on success.
    /// * `Err(NotifyError)` on failure.
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}

/// # Summary
/// Renders a notification as a mail.
///
/// # Invariants
/// - Stateless: the output depends only on the input message.
pub trait MailMessageBuilder: Send + Sync {
    fn create_message(&self, message: &NotificationMessage) -> Result<MailMessage, NotifyError>;
}

/// # Summary
/// Renders a notification as a JSON webhook payload (Slack, Teams).
///
/// # Invariants
/// - Stateless: the output depends only on the input message.
pub trait WebhookMessageBuilder: Send + Sync {
    fn create_message(
        &self,
        message: &NotificationMessage,
    ) -> Result<serde_json::Value, NotifyError>;
}

/// # Summary
/// Renders a notification as plain text (SMS).
pub trait StringMessageBuilder: Send + Sync {
    fn create_message(&self, message: &NotificationMessage) -> Result<String, NotifyError>;
}

/// # Summary
/// Mail transport bound to an SMTP server and credentials.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &MailMessage) -> Result<(), NotifyError>;
}

/// # Summary
/// HTTP client posting JSON bodies to webhook endpoints.
///
/// # Invariants
/// - A non-2xx answer is returned as `Ok`; only transport failures are `Err`.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// # Arguments
    /// * `uri` - Target webhook URI.
    /// * `json_body` - UTF-8 JSON text sent as the request body.
    async fn post(&self, uri: &str, json_body: String) -> Result<WebhookResponse, NotifyError>;
}

/// # Summary
/// SMS gateway client bound to an API URI and key.
#[async_trait]
pub trait SmsClient: Send + Sync {
    async fn send(&self, mobile_number: &str, text: &str) -> Result<(), NotifyError>;
}

/// # Summary
/// Factory for channel clients, called once per channel attempt.
///
/// # Invariants
/// - Implementations must be `Send + Sync`; the same factory serves
///   concurrent dispatches.
/// - A construction failure is reported like a transmission failure of
///   that channel.
pub trait ChannelClients: Send + Sync {
    /// Mail transport bound to the configured SMTP server and credentials.
    fn mail_transport(&self, options: &EmailOptions) -> Result<Arc<dyn MailTransport>, NotifyError>;

    /// HTTP client used for both Slack and Teams webhooks.
    fn webhook_client(&self) -> Result<Arc<dyn WebhookClient>, NotifyError>;

    /// SMS client bound to the configured API URI and key.
    fn sms_client(&self, options: &SmsOptions) -> Result<Arc<dyn SmsClient>, NotifyError>;
}
