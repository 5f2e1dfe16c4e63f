use crate::webhook::classify;
use async_trait::async_trait;
use courier_core::config::SmsOptions;
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::SmsClient;
use reqwest::StatusCode;
use serde::Serialize;

/// # Summary
/// An SMS gateway client speaking a JSON-over-HTTPS send API.
///
/// # Invariants
/// * `api_uri` accepts `POST` with a bearer token.
/// * Unlike webhooks, a non-2xx answer is a failed transmission.
pub struct HttpSmsClient {
    client: reqwest::Client,
    api_uri: String,
    api_key: String,
}

/// # Summary
/// Request body for the gateway's send endpoint.
#[derive(Serialize)]
struct SmsRequest<'a> {
    to: &'a str,
    message: &'a str,
}

impl HttpSmsClient {
    pub fn new(client: reqwest::Client, options: &SmsOptions) -> Result<Self, NotifyError> {
        if options.api_uri.is_empty() {
            return Err(NotifyError::Config("SMS api_uri is not set".to_string()));
        }

        Ok(Self {
            client,
            api_uri: options.api_uri.clone(),
            api_key: options.api_key.clone(),
        })
    }
}

#[async_trait]
impl SmsClient for HttpSmsClient {
    /// # Summary
    /// Sends one text message.
    ///
    /// # Logic
    /// 1. Posts `{ "to", "message" }` with the API key as bearer token.
    /// 2. Maps 401/403 to `Auth` and any other non-2xx status to `Platform`.
    async fn send(&self, mobile_number: &str, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.api_uri)
            .bearer_auth(&self.api_key)
            .json(&SmsRequest {
                to: mobile_number,
                message: text,
            })
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(NotifyError::Auth(format!(
                "SMS gateway rejected the API key: {}",
                status
            ))),
            _ => Err(NotifyError::Platform(format!(
                "SMS gateway error {}: {}",
                status, error_text
            ))),
        }
    }
}
