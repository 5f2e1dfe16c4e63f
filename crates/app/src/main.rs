mod settings;

use anyhow::Context;
use clap::Parser;
use courier_core::notify::entity::{ChannelKind, NotificationMessage};
use courier_notify::ChannelDispatcher;
use courier_notify::builders::{
    PlainMailBuilder, PlainSmsBuilder, SlackMessageBuilder, TeamsMessageBuilder,
};
use courier_notify::live::LiveClients;
use settings::AppSettings;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Send one notification to every configured channel.
#[derive(Parser, Debug)]
#[command(name = "courier", version)]
struct Cli {
    /// Message body
    body: String,

    /// Subject line or title
    #[arg(long)]
    subject: Option<String>,

    /// Recipient mail address (email channel)
    #[arg(long)]
    to: Option<String>,

    /// Recipient mobile number (SMS channel)
    #[arg(long)]
    mobile: Option<String>,

    /// Extra configuration file layered over config/default.toml
    #[arg(long, env = "COURIER_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Attempt every channel even after one fails
    #[arg(long)]
    best_effort: bool,
}

/// # Summary
/// Builds the dispatcher for the configured channels.
///
/// # Returns
/// * `Err` if no channel is configured; startup must abort.
fn build_dispatcher(settings: &AppSettings) -> anyhow::Result<ChannelDispatcher> {
    let mut builder = ChannelDispatcher::builder()
        .options(Arc::new(settings.options.clone()))
        .clients(Arc::new(LiveClients::new()?))
        .policy(settings.policy);

    for channel in &settings.channels {
        builder = match channel {
            ChannelKind::Email => builder.mail(Arc::new(PlainMailBuilder::new(
                settings.options.email.from.clone(),
            ))),
            ChannelKind::Slack => builder.slack(Arc::new(SlackMessageBuilder)),
            ChannelKind::Teams => builder.teams(Arc::new(TeamsMessageBuilder)),
            ChannelKind::Sms => builder.sms(Arc::new(PlainSmsBuilder)),
        };
    }

    Ok(builder.build()?)
}

/// # Summary
/// Entry point: loads configuration, wires the dispatcher, sends once.
///
/// # Logic
/// 1. Loads `.env` and initialises logging (`RUST_LOG`, default `info`).
/// 2. Loads layered settings.
/// 3. Builds the dispatcher; a wiring error aborts startup.
/// 4. Dispatches the message, stopping at the first failure unless `--best-effort`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = dotenvy::dotenv();

    // 1. Logging
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();
    if let Err(e) = env_file {
        debug!("No .env loaded: {}", e);
    }

    let cli = Cli::parse();

    // 2. Settings
    let settings = settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    info!(channels = ?settings.channels, policy = ?settings.policy, "Courier starting...");

    // 3. Wiring
    let dispatcher = build_dispatcher(&settings).context("invalid notifier wiring")?;

    let message = NotificationMessage {
        mobile_number: cli.mobile,
        recipient: cli.to,
        subject: cli.subject,
        body: cli.body,
        ..Default::default()
    };

    // 4. Dispatch
    if cli.best_effort {
        let report = dispatcher.notify_all(&message).await;
        for outcome in report.outcomes() {
            match &outcome.result {
                Ok(delivery) => info!(channel = %outcome.channel, "{}", delivery),
                Err(e) => error!(channel = %outcome.channel, "Delivery failed: {}", e),
            }
        }
        report.into_result()?;
    } else {
        dispatcher.notify(&message).await?;
    }

    info!("Notification delivered.");
    Ok(())
}
