//! Reference message builders for each channel.
//!
//! These cover the common case of a subject plus a plain-text body. Richer
//! layouts plug in through the builder ports in `courier_core::notify::port`.

use courier_core::notify::entity::{MailMessage, NotificationMessage};
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::{MailMessageBuilder, StringMessageBuilder, WebhookMessageBuilder};
use serde_json::json;

const DEFAULT_SUBJECT: &str = "Notification";

/// Plain-text mail addressed to `NotificationMessage::recipient`.
pub struct PlainMailBuilder {
    from: String,
}

impl PlainMailBuilder {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

impl MailMessageBuilder for PlainMailBuilder {
    fn create_message(&self, message: &NotificationMessage) -> Result<MailMessage, NotifyError> {
        let to = message
            .recipient
            .clone()
            .ok_or_else(|| NotifyError::Build("mail recipient is required".to_string()))?;

        Ok(MailMessage {
            to,
            from: self.from.clone(),
            subject: message
                .subject
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            body: message.body.clone(),
        })
    }
}

/// Slack incoming-webhook payload: `{"text": "*subject*\nbody"}`.
#[derive(Default)]
pub struct SlackMessageBuilder;

impl WebhookMessageBuilder for SlackMessageBuilder {
    fn create_message(
        &self,
        message: &NotificationMessage,
    ) -> Result<serde_json::Value, NotifyError> {
        let text = match &message.subject {
            Some(subject) => format!("*{}*\n{}", subject, message.body),
            None => message.body.clone(),
        };
        Ok(json!({ "text": text }))
    }
}

/// Office 365 connector `MessageCard` for Teams.
///
/// `metadata` entries become the facts of a single card section, sorted by key.
#[derive(Default)]
pub struct TeamsMessageBuilder;

impl WebhookMessageBuilder for TeamsMessageBuilder {
    fn create_message(
        &self,
        message: &NotificationMessage,
    ) -> Result<serde_json::Value, NotifyError> {
        let title = message.subject.as_deref().unwrap_or(DEFAULT_SUBJECT);
        let mut card = json!({
            "@type": "MessageCard",
            "@context": "https://schema.org/extensions",
            "summary": title,
            "title": title,
            "text": message.body,
        });

        if !message.metadata.is_empty() {
            let mut entries: Vec<_> = message.metadata.iter().collect();
            entries.sort();
            let facts: Vec<_> = entries
                .into_iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect();
            card["sections"] = json!([{ "facts": facts }]);
        }

        Ok(card)
    }
}

/// SMS text: `"subject: body"`, or just the body.
#[derive(Default)]
pub struct PlainSmsBuilder;

impl StringMessageBuilder for PlainSmsBuilder {
    fn create_message(&self, message: &NotificationMessage) -> Result<String, NotifyError> {
        Ok(match &message.subject {
            Some(subject) => format!("{}: {}", subject, message.body),
            None => message.body.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_mail_requires_recipient() {
        let builder = PlainMailBuilder::new("noreply@example.com");
        let err = builder
            .create_message(&NotificationMessage::new("hello"))
            .unwrap_err();
        assert!(matches!(err, NotifyError::Build(_)));

        let mail = builder
            .create_message(&NotificationMessage::new("hello").with_recipient("ops@example.com"))
            .unwrap();
        assert_eq!(mail.to, "ops@example.com");
        assert_eq!(mail.subject, DEFAULT_SUBJECT);
    }

    #[test]
    fn test_slack_payload_round_trips_through_json() {
        let message = NotificationMessage::new("Order shipped").with_subject("Orders");
        let payload = SlackMessageBuilder.create_message(&message).unwrap();

        let body = serde_json::to_string(&payload).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(decoded, payload);
        assert_eq!(decoded["text"], "*Orders*\nOrder shipped");
    }

    #[test]
    fn test_teams_card_uses_subject_as_title() {
        let message = NotificationMessage::new("Disk at 91%").with_subject("db-01");
        let card = TeamsMessageBuilder.create_message(&message).unwrap();
        assert_eq!(card["@type"], "MessageCard");
        assert_eq!(card["title"], "db-01");
        assert_eq!(card["text"], "Disk at 91%");
        assert!(card.get("sections").is_none());
    }

    #[test]
    fn test_teams_card_lists_metadata_as_facts() {
        let message = NotificationMessage::new("Disk at 91%")
            .with_metadata("region", "eu-west-1")
            .with_metadata("host", "db-01");
        let card = TeamsMessageBuilder.create_message(&message).unwrap();
        assert_eq!(
            card["sections"],
            json!([{ "facts": [
                { "name": "host", "value": "db-01" },
                { "name": "region", "value": "eu-west-1" },
            ] }])
        );
    }

    #[test]
    fn test_sms_text() {
        assert_eq!(
            PlainSmsBuilder
                .create_message(&NotificationMessage::new("Order shipped"))
                .unwrap(),
            "Order shipped"
        );
        assert_eq!(
            PlainSmsBuilder
                .create_message(&NotificationMessage::new("Order shipped").with_subject("Shop"))
                .unwrap(),
            "Shop: Order shipped"
        );
    }
}
