use async_trait::async_trait;
use courier_core::config::EmailOptions;
use courier_core::notify::entity::MailMessage;
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::MailTransport;
use lettre::message::{Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

/// SMTP reply codes meaning the server refused our credentials.
const AUTH_FAILURE_CODES: [&str; 2] = ["530", "535"];

/// # Summary
/// A mail transport that delivers messages via SMTP (e.g., Gmail, QQ Mail).
///
/// # Invariants
/// - Requires a valid SMTP server; credentials are optional for open relays.
/// - The `AsyncSmtpTransport` is reused for every message sent through it.
pub struct SmtpMailTransport {
    /// The asynchronous SMTP transport.
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    /// # Summary
    /// Creates a new `SmtpMailTransport`.
    ///
    /// # Logic
    /// 1. Configures the relay transport with TLS on the submission port.
    /// 2. Attaches credentials when a user name is configured.
    ///
    /// # Arguments
    /// * `options` - SMTP server, user name and password.
    ///
    /// # Returns
    /// * A new instance of `SmtpMailTransport` or `NotifyError::Config`.
    pub fn new(options: &EmailOptions) -> Result<Self, NotifyError> {
        // Use default submission port 587 with STARTTLS
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&options.smtp_server)
            .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?;

        if !options.user_name.is_empty() {
            builder = builder.credentials(Credentials::new(
                options.user_name.clone(),
                options.password.clone(),
            ));
        }

        Ok(Self {
            mailer: builder.build(),
        })
    }
}

/// # Summary
/// Converts a rendered mail into a `lettre` message.
///
/// # Returns
/// * `Err(NotifyError::Build)` if an address does not parse.
fn to_lettre_message(mail: &MailMessage) -> Result<Message, NotifyError> {
    Message::builder()
        .from(
            mail.from
                .parse()
                .map_err(|e| NotifyError::Build(format!("Invalid from address: {}", e)))?,
        )
        .to(mail
            .to
            .parse()
            .map_err(|e| NotifyError::Build(format!("Invalid to address: {}", e)))?)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| NotifyError::Build(format!("Failed to build email: {}", e)))
}

/// Maps an SMTP failure onto the transmission error subtypes.
fn classify(e: lettre::transport::smtp::Error) -> NotifyError {
    if e.is_timeout() {
        return NotifyError::Timeout(format!("SMTP timeout: {}", e));
    }
    match e.status() {
        Some(code) if AUTH_FAILURE_CODES.contains(&code.to_string().as_str()) => {
            NotifyError::Auth(format!("SMTP authentication failed: {}", e))
        }
        Some(_) => NotifyError::Platform(format!("SMTP error: {}", e)),
        None => NotifyError::Network(format!("SMTP error: {}", e)),
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    /// # Summary
    /// Sends one mail.
    ///
    /// # Logic
    /// 1. Builds a plain-text message from the rendered mail.
    /// 2. Sends it using the configured SMTP transport.
    ///
    /// # Returns
    /// * `Ok(())` if the server accepted the mail.
    /// * `Err(NotifyError)` on address, network or SMTP failures.
    async fn send(&self, mail: &MailMessage) -> Result<(), NotifyError> {
        let email = to_lettre_message(mail)?;
        self.mailer.send(email).await.map_err(classify)?;
        Ok(())
    }
}
