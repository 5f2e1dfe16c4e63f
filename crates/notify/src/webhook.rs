use async_trait::async_trait;
use courier_core::notify::entity::WebhookResponse;
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::WebhookClient;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// Applied to every webhook request unless a client is supplied.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// # Summary
/// Builds the shared `reqwest` client used by the HTTP adapters.
///
/// # Logic
/// 1. Installs the `ring` crypto provider for rustls if none is installed yet.
/// 2. Builds a client with the given request timeout.
///
/// # Returns
/// * The client, or `NotifyError::Config` if TLS setup fails.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, NotifyError> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NotifyError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Maps a `reqwest` failure onto the transmission error subtypes.
pub(crate) fn classify(e: reqwest::Error) -> NotifyError {
    if e.is_timeout() {
        NotifyError::Timeout(e.to_string())
    } else if e.is_builder() {
        NotifyError::Config(format!("Invalid request: {}", e))
    } else {
        NotifyError::Network(e.to_string())
    }
}

/// # Summary
/// A webhook client posting JSON payloads (Slack incoming webhooks, Teams connectors).
///
/// # Invariants
/// * The response status is reported, never judged.
#[derive(Clone)]
pub struct HttpWebhookClient {
    /// The HTTP client used for requests.
    client: reqwest::Client,
}

impl HttpWebhookClient {
    /// # Summary
    /// Creates a client with [`DEFAULT_TIMEOUT`].
    pub fn new() -> Result<Self, NotifyError> {
        Ok(Self::from_client(build_http_client(DEFAULT_TIMEOUT)?))
    }

    /// # Summary
    /// Wraps an existing client so its connection pool is shared.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    /// # Summary
    /// Posts a JSON body to the webhook.
    ///
    /// # Logic
    /// 1. Sends a POST request with a UTF-8 JSON content type.
    /// 2. Returns the status code and response text, whatever the status.
    ///
    /// # Arguments
    /// * `uri` - The webhook URI.
    /// * `json_body` - Serialized payload.
    ///
    /// # Returns
    /// * `Ok(WebhookResponse)` once the endpoint answered.
    /// * `Err(NotifyError)` if the request could not be delivered.
    async fn post(&self, uri: &str, json_body: String) -> Result<WebhookResponse, NotifyError> {
        let response = self
            .client
            .post(uri)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(json_body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(uri = %uri, status, error = %e, "Failed to read webhook response body");
                String::new()
            }
        };

        Ok(WebhookResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_truncated_response_body_is_logged() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            while !request.ends_with(b"\r\n\r\n{}") {
                let mut chunk = [0u8; 1024];
                let read = socket.read(&mut chunk).await.unwrap();
                assert!(read > 0);
                request.extend_from_slice(&chunk[..read]);
            }
            // Promises 100 bytes, sends 5, then hangs up
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\nshort")
                .await
                .unwrap();
        });

        let client = HttpWebhookClient::from_client(build_http_client(DEFAULT_TIMEOUT).unwrap());
        let response = client
            .post(&format!("http://{}/hook", addr), "{}".to_string())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
        assert!(logs_contain("Failed to read webhook response body"));
    }
}
