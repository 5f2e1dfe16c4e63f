use crate::channel::{ChannelBuilder, FailurePolicy, attempt};
use async_trait::async_trait;
use courier_core::config::Options;
use courier_core::notify::entity::{ChannelKind, NotificationMessage};
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::{ChannelClients, Notifier, StringMessageBuilder};
use std::sync::Arc;
use tracing::{Instrument, info_span};

/// # Summary
/// A notifier wired to the SMS channel only.
///
/// # Invariants
/// - Builder and options are both mandatory.
/// - Success or total failure; every failure is logged before it is returned.
pub struct SmsNotifier {
    builder: ChannelBuilder,
    options: Arc<Options>,
    clients: Arc<dyn ChannelClients>,
}

impl SmsNotifier {
    /// # Summary
    /// Creates a new `SmsNotifier`.
    ///
    /// # Arguments
    /// * `builder` - Renders the SMS text.
    /// * `options` - Channel settings; the `sms` section is used.
    /// * `clients` - Factory for the SMS gateway client.
    ///
    /// # Returns
    /// * `Err(NotifyError::Config)` if `builder` or `options` is missing.
    pub fn new(
        builder: Option<Arc<dyn StringMessageBuilder>>,
        options: Option<Arc<Options>>,
        clients: Arc<dyn ChannelClients>,
    ) -> Result<Self, NotifyError> {
        let builder =
            builder.ok_or_else(|| NotifyError::Config("message builder is required".to_string()))?;
        let options = options.ok_or_else(|| NotifyError::Config("options are required".to_string()))?;

        Ok(Self {
            builder: ChannelBuilder::Text(builder),
            options,
            clients,
        })
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    /// # Summary
    /// Builds the text and sends it to `message.mobile_number`.
    ///
    /// # Logic
    /// 1. Renders the SMS text with the builder.
    /// 2. Obtains an SMS client bound to the configured API URI and key.
    /// 3. Sends; TRACE on success, ERROR and re-raise on any failure.
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        attempt(
            ChannelKind::Sms,
            &self.builder,
            message,
            &self.options,
            self.clients.as_ref(),
            FailurePolicy::Uniform,
        )
        .instrument(info_span!("notifier", component = "SmsNotifier"))
        .await
        .map(|_| ())
    }
}
