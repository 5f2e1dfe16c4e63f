use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use courier_core::config::Options;
use courier_core::notify::entity::ChannelKind;
use courier_notify::FailurePolicy;
use serde::Deserialize;
use std::path::Path;

/// Looked up relative to the working directory; optional.
const DEFAULT_CONFIG: &str = "config/default";

/// Prefix of environment overrides, e.g. `COURIER__SMS__API_KEY`.
const ENV_PREFIX: &str = "COURIER";

const ENV_SEPARATOR: &str = "__";

/// # Summary
/// Process configuration: which channels to activate plus their settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub channels: Vec<ChannelKind>,
    #[serde(default)]
    pub policy: FailurePolicy,
    #[serde(flatten)]
    pub options: Options,
}

/// # Summary
/// Loads settings from layered sources.
///
/// # Logic
/// 1. `config/default.toml`, if present.
/// 2. The explicit file, if given (required when given).
/// 3. `COURIER__*` environment variables.
pub fn load(path: Option<&Path>) -> Result<AppSettings, ConfigError> {
    let mut builder = Config::builder().add_source(File::with_name(DEFAULT_CONFIG).required(false));
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    finish(builder.add_source(env_source()))
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppSettings, ConfigError> {
    builder.build()?.try_deserialize()
}
