//! In-memory builders and channel clients for tests.
//!
//! Every fake writes to a shared [`Recorder`], so a test can assert on the
//! exact sequence of builds and transmissions across channels.

use crate::config::{EmailOptions, Options, SmsOptions, WebhookOptions};
use crate::notify::entity::{ChannelKind, MailMessage, NotificationMessage, WebhookResponse};
use crate::notify::error::NotifyError;
use crate::notify::port::{
    ChannelClients, MailMessageBuilder, MailTransport, SmsClient, StringMessageBuilder,
    WebhookClient, WebhookMessageBuilder,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const SLACK_URI: &str = "https://hooks.slack.test/services/T000/B000/XXXX";
pub const TEAMS_URI: &str = "https://outlook.office.test/webhook/abc";

/// Produces a fresh error for every injected failure.
pub type ErrorFactory = Arc<dyn Fn() -> NotifyError + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Build(ChannelKind),
    SendMail(MailMessage),
    Post { uri: String, body: String },
    SendSms { mobile_number: String, text: String },
}

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Channels whose builder ran, in call order.
    pub fn built(&self) -> Vec<ChannelKind> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Build(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }
}

/// Options pointing at the fake webhook URIs.
pub fn test_options() -> Options {
    Options {
        email: EmailOptions {
            smtp_server: "smtp.example.test".to_string(),
            user_name: "mailer".to_string(),
            password: "secret".to_string(),
            from: "noreply@example.test".to_string(),
        },
        slack: WebhookOptions {
            webhook_uri: SLACK_URI.to_string(),
        },
        teams: WebhookOptions {
            webhook_uri: TEAMS_URI.to_string(),
        },
        sms: SmsOptions {
            api_uri: "https://sms.example.test/send".to_string(),
            api_key: "sms-key".to_string(),
        },
    }
}

/// # Summary
/// A builder that records its invocation and echoes the message body.
///
/// # Invariants
/// - Implements all three builder ports; the `kind` only labels the record.
pub struct FakeBuilder {
    kind: ChannelKind,
    recorder: Recorder,
    failure: Option<ErrorFactory>,
}

impl FakeBuilder {
    pub fn new(kind: ChannelKind, recorder: &Recorder) -> Arc<Self> {
        Arc::new(Self {
            kind,
            recorder: recorder.clone(),
            failure: None,
        })
    }

    pub fn failing(kind: ChannelKind, recorder: &Recorder, failure: ErrorFactory) -> Arc<Self> {
        Arc::new(Self {
            kind,
            recorder: recorder.clone(),
            failure: Some(failure),
        })
    }

    fn enter(&self) -> Result<(), NotifyError> {
        self.recorder.record(Call::Build(self.kind));
        match &self.failure {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

impl MailMessageBuilder for FakeBuilder {
    fn create_message(&self, message: &NotificationMessage) -> Result<MailMessage, NotifyError> {
        self.enter()?;
        Ok(MailMessage {
            to: message
                .recipient
                .clone()
                .unwrap_or_else(|| "ops@example.test".to_string()),
            from: "noreply@example.test".to_string(),
            subject: message.subject.clone().unwrap_or_default(),
            body: message.body.clone(),
        })
    }
}

impl WebhookMessageBuilder for FakeBuilder {
    fn create_message(
        &self,
        message: &NotificationMessage,
    ) -> Result<serde_json::Value, NotifyError> {
        self.enter()?;
        Ok(json!({ "text": message.body }))
    }
}

impl StringMessageBuilder for FakeBuilder {
    fn create_message(&self, message: &NotificationMessage) -> Result<String, NotifyError> {
        self.enter()?;
        Ok(message.body.clone())
    }
}

/// # Summary
/// A `ChannelClients` factory whose clients record every transmission.
///
/// # Invariants
/// - Injected failures are keyed by channel for mail/SMS and by URI for webhooks.
#[derive(Clone, Default)]
pub struct FakeClients {
    recorder: Recorder,
    mail_failure: Option<ErrorFactory>,
    sms_failure: Option<ErrorFactory>,
    webhook_failures: HashMap<String, ErrorFactory>,
    webhook_status: u16,
}

impl FakeClients {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            webhook_status: 200,
            ..Default::default()
        }
    }

    pub fn fail_mail(mut self, failure: ErrorFactory) -> Self {
        self.mail_failure = Some(failure);
        self
    }

    pub fn fail_sms(mut self, failure: ErrorFactory) -> Self {
        self.sms_failure = Some(failure);
        self
    }

    pub fn fail_webhook(mut self, uri: &str, failure: ErrorFactory) -> Self {
        self.webhook_failures.insert(uri.to_string(), failure);
        self
    }

    pub fn with_webhook_status(mut self, status: u16) -> Self {
        self.webhook_status = status;
        self
    }
}

impl ChannelClients for FakeClients {
    fn mail_transport(&self, _options: &EmailOptions) -> Result<Arc<dyn MailTransport>, NotifyError> {
        Ok(Arc::new(FakeMailTransport {
            recorder: self.recorder.clone(),
            failure: self.mail_failure.clone(),
        }))
    }

    fn webhook_client(&self) -> Result<Arc<dyn WebhookClient>, NotifyError> {
        Ok(Arc::new(FakeWebhookClient {
            recorder: self.recorder.clone(),
            failures: self.webhook_failures.clone(),
            status: self.webhook_status,
        }))
    }

    fn sms_client(&self, _options: &SmsOptions) -> Result<Arc<dyn SmsClient>, NotifyError> {
        Ok(Arc::new(FakeSmsClient {
            recorder: self.recorder.clone(),
            failure: self.sms_failure.clone(),
        }))
    }
}

struct FakeMailTransport {
    recorder: Recorder,
    failure: Option<ErrorFactory>,
}

#[async_trait]
impl MailTransport for FakeMailTransport {
    async fn send(&self, mail: &MailMessage) -> Result<(), NotifyError> {
        self.recorder.record(Call::SendMail(mail.clone()));
        match &self.failure {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

struct FakeWebhookClient {
    recorder: Recorder,
    failures: HashMap<String, ErrorFactory>,
    status: u16,
}

#[async_trait]
impl WebhookClient for FakeWebhookClient {
    async fn post(&self, uri: &str, json_body: String) -> Result<WebhookResponse, NotifyError> {
        self.recorder.record(Call::Post {
            uri: uri.to_string(),
            body: json_body,
        });
        match self.failures.get(uri) {
            Some(make) => Err(make()),
            None => Ok(WebhookResponse {
                status: self.status,
                body: "ok".to_string(),
            }),
        }
    }
}

struct FakeSmsClient {
    recorder: Recorder,
    failure: Option<ErrorFactory>,
}

#[async_trait]
impl SmsClient for FakeSmsClient {
    async fn send(&self, mobile_number: &str, text: &str) -> Result<(), NotifyError> {
        self.recorder.record(Call::SendSms {
            mobile_number: mobile_number.to_string(),
            text: text.to_string(),
        });
        match &self.failure {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}
