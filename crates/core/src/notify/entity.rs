use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// # Summary
/// The logical notification handed to a notifier.
///
/// # Invariants
/// - Content is opaque to notifiers; only builders interpret it.
/// - `mobile_number` must be present whenever the SMS channel is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Recipient mobile number (E.164, e.g. "+15551234567")
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// Recipient mail address
    #[serde(default)]
    pub recipient: Option<String>,
    /// Subject line or title
    #[serde(default)]
    pub subject: Option<String>,
    /// Main text
    pub body: String,
    /// Extra builder inputs
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl NotificationMessage {
    /// Creates a message with only a body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_mobile_number(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = Some(mobile_number.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// # Summary
/// A rendered mail, ready for an SMTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// # Summary
/// Raw answer of a webhook endpoint.
///
/// # Invariants
/// - A non-2xx `status` is still a successful transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

/// # Summary
/// Delivery channels, declared in dispatch order.
///
/// # Invariants
/// - `Ord` follows declaration order: Email, Slack, Teams, Sms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Slack,
    Teams,
    Sms,
}

impl ChannelKind {
    /// All channels in dispatch order.
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Email,
        ChannelKind::Slack,
        ChannelKind::Teams,
        ChannelKind::Sms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "Email",
            ChannelKind::Slack => "Slack",
            ChannelKind::Teams => "Teams",
            ChannelKind::Sms => "SMS",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order_matches_declaration() {
        let mut kinds = vec![ChannelKind::Sms, ChannelKind::Teams, ChannelKind::Email, ChannelKind::Slack];
        kinds.sort();
        assert_eq!(kinds, ChannelKind::ALL.to_vec());
    }

    #[test]
    fn test_message_deserializes_with_defaults() {
        let msg: NotificationMessage =
            serde_json::from_str(r#"{"mobile_number":"+15551234567","body":"Order shipped"}"#)
                .unwrap();
        assert_eq!(msg.mobile_number.as_deref(), Some("+15551234567"));
        assert_eq!(msg.body, "Order shipped");
        assert!(msg.subject.is_none());
        assert!(msg.metadata.is_empty());
    }
}
