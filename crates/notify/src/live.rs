use crate::email::SmtpMailTransport;
use crate::sms::HttpSmsClient;
use crate::webhook::{DEFAULT_TIMEOUT, HttpWebhookClient, build_http_client};
use courier_core::config::{EmailOptions, SmsOptions};
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::{ChannelClients, MailTransport, SmsClient, WebhookClient};
use std::sync::Arc;

/// # Summary
/// Production channel clients: SMTP via `lettre`, webhooks and SMS via `reqwest`.
///
/// # Invariants
/// - One `reqwest::Client` (and its connection pool) backs every HTTP client
///   handed out.
/// - A new SMTP transport is bound to the options on every call.
#[derive(Clone)]
pub struct LiveClients {
    http: reqwest::Client,
}

impl LiveClients {
    pub fn new() -> Result<Self, NotifyError> {
        Ok(Self {
            http: build_http_client(DEFAULT_TIMEOUT)?,
        })
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl ChannelClients for LiveClients {
    fn mail_transport(&self, options: &EmailOptions) -> Result<Arc<dyn MailTransport>, NotifyError> {
        Ok(Arc::new(SmtpMailTransport::new(options)?))
    }

    fn webhook_client(&self) -> Result<Arc<dyn WebhookClient>, NotifyError> {
        Ok(Arc::new(HttpWebhookClient::from_client(self.http.clone())))
    }

    fn sms_client(&self, options: &SmsOptions) -> Result<Arc<dyn SmsClient>, NotifyError> {
        Ok(Arc::new(HttpSmsClient::new(self.http.clone(), options)?))
    }
}
