use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use support_config::{parse_override, Properties, SupportSettings};
use support_logging::{LoggerConfig, PiiRedactor};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "support-settings")]
#[command(about = "Inspect the Proactive Support settings of a broker configuration")]
pub struct Args {
    /// Broker properties file (server.properties)
    #[arg(env = "SUPPORT_CONFIG_FILE")]
    pub config: PathBuf,

    /// Property applied on top of the file, may be repeated
    #[arg(long = "override", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log filter directive, `RUST_LOG` wins when set
    #[arg(long, env = "SUPPORT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "SUPPORT_LOG_JSON")]
    pub log_json: bool,

    /// Print customer ids and endpoint credentials in clear text
    #[arg(long)]
    pub no_redact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig::default()
            .with_log_level(self.log_level.as_str())
            .with_json(self.log_json)
    }
}

/// Loads the configuration named by `args` and renders its settings.
///
/// # Errors
///
/// Fails when the properties file cannot be loaded or an override is malformed.
pub fn run(args: &Args) -> Result<String> {
    let settings = load_settings(args)?;
    if !settings.proactive_support_enabled {
        warn!(path = %args.config.display(), "Proactive Support is not configured");
    }

    let redactor = (!args.no_redact).then(PiiRedactor::default);
    render(&settings, args.format, redactor.as_ref())
}

/// # Errors
///
/// Fails when the properties file cannot be loaded or an override is malformed.
pub fn load_settings(args: &Args) -> Result<SupportSettings> {
    let mut config = Properties::load(&args.config)
        .with_context(|| format!("Failed to load broker configuration {}", args.config.display()))?;

    for pair in &args.overrides {
        let (key, value) = parse_override(pair)?;
        info!(key = %key, "Overriding property");
        config.set(key, value);
    }

    Ok(SupportSettings::from_config(&config))
}

/// # Errors
///
/// Fails only if JSON serialization fails.
pub fn render(
    settings: &SupportSettings,
    format: OutputFormat,
    redactor: Option<&PiiRedactor>,
) -> Result<String> {
    let settings = match redactor {
        Some(redactor) => settings.redacted(redactor),
        None => settings.clone(),
    };

    match format {
        OutputFormat::Text => Ok(settings.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(&settings)
            .context("Failed to serialize support settings"),
    }
}
