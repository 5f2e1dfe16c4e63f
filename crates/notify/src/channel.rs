//! Per-channel delivery: build, obtain a client, transmit, then log the outcome.
//!
//! Both the multi-channel dispatcher and the single-channel notifiers go
//! through [`attempt`], so every channel shares one logging and propagation
//! path, parameterised by [`FailurePolicy`].

use courier_core::config::Options;
use courier_core::notify::entity::{ChannelKind, NotificationMessage, WebhookResponse};
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::{
    ChannelClients, MailMessageBuilder, StringMessageBuilder, WebhookMessageBuilder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, trace};

/// # Summary
/// How a notifier reports channel failures before propagating them.
///
/// # Invariants
/// - Either way the failure is returned to the caller unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Every failure on every channel is logged at ERROR. Aggregated
    /// failures produce one event per flattened cause.
    #[default]
    Uniform,
    /// Per-channel coverage of the legacy notifier:
    /// Email and SMS log transmission failures, Slack logs nothing,
    /// Teams logs only the causes of aggregated transmission failures.
    /// Builder and client construction failures are never logged; a missing
    /// mobile number counts as an SMS transmission failure.
    Compatible,
}

/// A successful transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by a mail or SMS transport.
    Sent,
    /// Answered by a webhook endpoint, whatever the status.
    Posted(WebhookResponse),
}

impl std::fmt::Display for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delivery::Sent => f.write_str("Message sent."),
            Delivery::Posted(response) => {
                write!(f, "Message sent. {} -> {}", response.status, response.body)
            }
        }
    }
}

/// The typed builder of one active channel.
#[derive(Clone)]
pub(crate) enum ChannelBuilder {
    Mail(Arc<dyn MailMessageBuilder>),
    Webhook(Arc<dyn WebhookMessageBuilder>),
    Text(Arc<dyn StringMessageBuilder>),
}

/// Where in the attempt a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Build,
    Client,
    Transmit,
}

struct Failure {
    stage: Stage,
    error: NotifyError,
}

impl Failure {
    fn at(stage: Stage) -> impl FnOnce(NotifyError) -> Failure {
        move |error| Failure { stage, error }
    }
}

/// How the failure should appear in the log, if at all.
enum LogShape {
    Skip,
    Whole,
    PerCause,
}

impl FailurePolicy {
    fn log_shape(&self, channel: ChannelKind, failure: &Failure) -> LogShape {
        match self {
            FailurePolicy::Uniform => LogShape::PerCause,
            FailurePolicy::Compatible => match (channel, failure.stage, &failure.error) {
                (_, Stage::Build | Stage::Client, _) => LogShape::Skip,
                (ChannelKind::Email | ChannelKind::Sms, Stage::Transmit, _) => LogShape::Whole,
                (ChannelKind::Teams, Stage::Transmit, NotifyError::Aggregate(_)) => {
                    LogShape::PerCause
                }
                (ChannelKind::Teams | ChannelKind::Slack, Stage::Transmit, _) => LogShape::Skip,
            },
        }
    }
}

/// # Summary
/// Runs one channel end to end and logs the outcome.
///
/// # Logic
/// 1. Builds the channel payload.
/// 2. Obtains the channel client from the factory, bound to `options`.
/// 3. Transmits.
/// 4. TRACE on success; on failure, logs according to `policy` and returns the error.
///
/// # Arguments
/// * `channel` - Channel label, also selects the webhook URI.
/// * `builder` - The channel's builder.
/// * `message` - The notification.
///
/// # Returns
/// * `Ok(Delivery)` or the channel's unwrapped error.
pub(crate) async fn attempt(
    channel: ChannelKind,
    builder: &ChannelBuilder,
    message: &NotificationMessage,
    options: &Options,
    clients: &dyn ChannelClients,
    policy: FailurePolicy,
) -> Result<Delivery, NotifyError> {
    match deliver(channel, builder, message, options, clients).await {
        Ok(delivery) => {
            trace!(channel = %channel, "{} Notifier. {}", channel, delivery);
            Ok(delivery)
        }
        Err(failure) => {
            match policy.log_shape(channel, &failure) {
                LogShape::Skip => {}
                LogShape::Whole => log_failure(channel, &failure.error),
                LogShape::PerCause => {
                    for cause in failure.error.flatten() {
                        log_failure(channel, cause);
                    }
                }
            }
            Err(failure.error)
        }
    }
}

fn log_failure(channel: ChannelKind, error: &NotifyError) {
    error!(
        channel = %channel,
        error = ?error,
        "{} Notifier. Failed to send message. {}",
        channel,
        error
    );
}

async fn deliver(
    channel: ChannelKind,
    builder: &ChannelBuilder,
    message: &NotificationMessage,
    options: &Options,
    clients: &dyn ChannelClients,
) -> Result<Delivery, Failure> {
    match builder {
        ChannelBuilder::Mail(builder) => {
            let mail = builder
                .create_message(message)
                .map_err(Failure::at(Stage::Build))?;
            let transport = clients
                .mail_transport(&options.email)
                .map_err(Failure::at(Stage::Client))?;
            transport
                .send(&mail)
                .await
                .map_err(Failure::at(Stage::Transmit))?;
            Ok(Delivery::Sent)
        }
        ChannelBuilder::Webhook(builder) => {
            let payload = builder
                .create_message(message)
                .map_err(Failure::at(Stage::Build))?;
            let body = serde_json::to_string(&payload)
                .map_err(|e| NotifyError::Build(format!("Unserializable payload: {}", e)))
                .map_err(Failure::at(Stage::Build))?;
            let uri = match channel {
                ChannelKind::Teams => &options.teams.webhook_uri,
                _ => &options.slack.webhook_uri,
            };
            let client = clients
                .webhook_client()
                .map_err(Failure::at(Stage::Client))?;
            let response = client
                .post(uri, body)
                .await
                .map_err(Failure::at(Stage::Transmit))?;
            Ok(Delivery::Posted(response))
        }
        ChannelBuilder::Text(builder) => {
            let text = builder
                .create_message(message)
                .map_err(Failure::at(Stage::Build))?;
            let mobile_number = message
                .mobile_number
                .as_deref()
                .ok_or_else(|| NotifyError::Build("mobile number is required for SMS".to_string()))
                .map_err(Failure::at(Stage::Transmit))?;
            let client = clients
                .sms_client(&options.sms)
                .map_err(Failure::at(Stage::Client))?;
            client
                .send(mobile_number, &text)
                .await
                .map_err(Failure::at(Stage::Transmit))?;
            Ok(Delivery::Sent)
        }
    }
}
