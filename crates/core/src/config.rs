use serde::{Deserialize, Serialize};

/// Channel settings, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub email: EmailOptions,
    pub slack: WebhookOptions,
    pub teams: WebhookOptions,
    pub sms: SmsOptions,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailOptions {
    pub smtp_server: String,
    pub user_name: String,
    pub password: String,
    /// Sender address used by the bundled mail builder
    pub from: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookOptions {
    pub webhook_uri: String,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsOptions {
    pub api_uri: String,
    pub api_key: String,
}

impl Default for EmailOptions {
    fn default() -> Self {
        Self {
            smtp_server: "localhost".to_string(),
            user_name: String::new(),
            password: String::new(),
            from: "noreply@localhost".to_string(),
        }
    }
}

// Secrets stay out of log output.
impl std::fmt::Debug for EmailOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailOptions")
            .field("smtp_server", &self.smtp_server)
            .field("user_name", &self.user_name)
            .field("password", &"***")
            .field("from", &self.from)
            .finish()
    }
}

impl std::fmt::Debug for SmsOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsOptions")
            .field("api_uri", &self.api_uri)
            .field("api_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let options = Options::default();
        assert_eq!(options.email.smtp_server, "localhost");
        assert_eq!(options.email.from, "noreply@localhost");
        assert!(options.slack.webhook_uri.is_empty());
        assert!(options.sms.api_key.is_empty());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let options: Options = serde_json::from_str(
            r#"{"sms": {"api_uri": "https://sms.example.com/send"}, "teams": {"webhook_uri": "https://teams.example.com/hook"}}"#,
        )
        .unwrap();
        assert_eq!(options.sms.api_uri, "https://sms.example.com/send");
        assert!(options.sms.api_key.is_empty());
        assert_eq!(options.teams.webhook_uri, "https://teams.example.com/hook");
        assert_eq!(options.email, EmailOptions::default());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let options = Options {
            email: EmailOptions {
                password: "hunter2".to_string(),
                ..Default::default()
            },
            sms: SmsOptions {
                api_uri: "https://sms.example.com".to_string(),
                api_key: "secret-key".to_string(),
            },
            ..Default::default()
        };
        let rendered = format!("{:?}", options);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("secret-key"));
    }
}
