use crate::channel::{ChannelBuilder, Delivery, FailurePolicy, attempt};
use async_trait::async_trait;
use courier_core::config::Options;
use courier_core::notify::entity::{ChannelKind, NotificationMessage};
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::{
    ChannelClients, MailMessageBuilder, Notifier, StringMessageBuilder, WebhookMessageBuilder,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{Instrument, Span, info_span};

const DEFAULT_NAME: &str = "Notifier";

/// # Summary
/// Fans one notification out to every configured channel.
///
/// # Invariants
/// - At least one channel is active; the set is fixed at construction.
/// - Channels run sequentially in `ChannelKind` order (Email, Slack, Teams, SMS).
/// - Holds no mutable state, so concurrent `notify` calls need no locking.
pub struct ChannelDispatcher {
    // Active channels keyed by kind; iteration order is dispatch order
    channels: BTreeMap<ChannelKind, ChannelBuilder>,
    options: Arc<Options>,
    clients: Arc<dyn ChannelClients>,
    policy: FailurePolicy,
    // Component name carried by every event of this instance
    name: String,
}

/// # Summary
/// Wiring for a [`ChannelDispatcher`]. Supplying a builder activates its channel.
#[derive(Default)]
pub struct ChannelDispatcherBuilder {
    channels: BTreeMap<ChannelKind, ChannelBuilder>,
    options: Option<Arc<Options>>,
    clients: Option<Arc<dyn ChannelClients>>,
    policy: FailurePolicy,
    name: Option<String>,
}

impl ChannelDispatcherBuilder {
    pub fn mail(mut self, builder: Arc<dyn MailMessageBuilder>) -> Self {
        self.channels
            .insert(ChannelKind::Email, ChannelBuilder::Mail(builder));
        self
    }

    pub fn slack(mut self, builder: Arc<dyn WebhookMessageBuilder>) -> Self {
        self.channels
            .insert(ChannelKind::Slack, ChannelBuilder::Webhook(builder));
        self
    }

    pub fn teams(mut self, builder: Arc<dyn WebhookMessageBuilder>) -> Self {
        self.channels
            .insert(ChannelKind::Teams, ChannelBuilder::Webhook(builder));
        self
    }

    pub fn sms(mut self, builder: Arc<dyn StringMessageBuilder>) -> Self {
        self.channels
            .insert(ChannelKind::Sms, ChannelBuilder::Text(builder));
        self
    }

    pub fn options(mut self, options: Arc<Options>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn clients(mut self, clients: Arc<dyn ChannelClients>) -> Self {
        self.clients = Some(clients);
        self
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Component name attached to every log event (default `"Notifier"`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// # Summary
    /// Validates the wiring and freezes the active channel set.
    ///
    /// # Returns
    /// * `Err(NotifyError::Config)` if the options or the client factory are
    ///   missing, or if no channel builder was supplied.
    pub fn build(self) -> Result<ChannelDispatcher, NotifyError> {
        let options = self
            .options
            .ok_or_else(|| NotifyError::Config("options are required".to_string()))?;
        let clients = self
            .clients
            .ok_or_else(|| NotifyError::Config("channel clients are required".to_string()))?;

        if self.channels.is_empty() {
            return Err(NotifyError::Config(
                "at least one of the mail, slack, teams or sms builders is required".to_string(),
            ));
        }

        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        Ok(ChannelDispatcher {
            channels: self.channels,
            options,
            clients,
            policy: self.policy,
            name,
        })
    }
}

/// Outcome of one channel in a best-effort dispatch.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: ChannelKind,
    pub result: Result<Delivery, NotifyError>,
}

/// # Summary
/// Per-channel results of [`ChannelDispatcher::notify_all`], in dispatch order.
#[derive(Debug)]
pub struct DispatchReport {
    outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    pub fn outcomes(&self) -> &[ChannelOutcome] {
        &self.outcomes
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (ChannelKind, &NotifyError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.channel, e)))
    }

    /// # Summary
    /// Collapses the report into a single result.
    ///
    /// # Returns
    /// * `Ok(())` if every channel succeeded.
    /// * The error itself when exactly one channel failed.
    /// * `NotifyError::Aggregate` of all errors otherwise.
    pub fn into_result(self) -> Result<(), NotifyError> {
        let mut errors: Vec<NotifyError> = self
            .outcomes
            .into_iter()
            .filter_map(|o| o.result.err())
            .collect();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(NotifyError::Aggregate(errors)),
        }
    }
}

impl ChannelDispatcher {
    pub fn builder() -> ChannelDispatcherBuilder {
        ChannelDispatcherBuilder::default()
    }

    /// Active channels in dispatch order.
    pub fn active_channels(&self) -> Vec<ChannelKind> {
        self.channels.keys().copied().collect()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    // Per call, so it nests under the caller's span
    fn span(&self) -> Span {
        info_span!("dispatcher", component = %self.name)
    }

    /// # Summary
    /// Delivers to every active channel, stopping at the first failure.
    ///
    /// # Logic
    /// 1. Walks the active channels in dispatch order.
    /// 2. Runs build, client and transmit for each one.
    /// 3. Returns the first channel error; later channels are not attempted.
    ///
    /// # Returns
    /// * `Ok(())` once every active channel succeeded.
    /// * `Err(NotifyError)` of the first failing channel.
    pub async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        async {
            for (channel, builder) in &self.channels {
                attempt(
                    *channel,
                    builder,
                    message,
                    &self.options,
                    self.clients.as_ref(),
                    self.policy,
                )
                .await?;
            }
            Ok::<(), NotifyError>(())
        }
        .instrument(self.span())
        .await
    }

    /// # Summary
    /// Delivers to every active channel regardless of earlier failures.
    ///
    /// # Logic
    /// 1. Attempts each active channel in dispatch order.
    /// 2. Records each channel's delivery or error.
    ///
    /// # Returns
    /// * A report with one outcome per active channel.
    pub async fn notify_all(&self, message: &NotificationMessage) -> DispatchReport {
        async {
            let mut outcomes = Vec::with_capacity(self.channels.len());
            for (channel, builder) in &self.channels {
                let result = attempt(
                    *channel,
                    builder,
                    message,
                    &self.options,
                    self.clients.as_ref(),
                    self.policy,
                )
                .await;
                outcomes.push(ChannelOutcome {
                    channel: *channel,
                    result,
                });
            }
            DispatchReport { outcomes }
        }
        .instrument(self.span())
        .await
    }
}

#[async_trait]
impl Notifier for ChannelDispatcher {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        ChannelDispatcher::notify(self, message).await
    }
}
