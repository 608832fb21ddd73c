//! Configuration module for the webhook gateway.
//!
//! Configuration comes either from environment variables (the default) or
//! from a YAML file named by `GATEWAY_CONFIG`, with `${VAR}` and
//! `${VAR:-default}` interpolation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use webhook_gateway::config::GatewayConfig;
//!
//! let config = GatewayConfig::load()?;
//! println!("listening on {}", config.server.http_addr());
//! ```

mod env;
mod settings;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::alert::AlertTranslator;
use crate::domain::order_mapping::MapperPolicy;
use crate::infrastructure::broker::OandaConfig;

pub use settings::{
    BrokerConfig, Credentials, ServerConfig, TradingConfig, WebhookConfig,
};

/// Environment variable naming a YAML config file.
pub const CONFIG_PATH_VAR: &str = "GATEWAY_CONFIG";

/// Accepted broker timeout range, in seconds.
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=60;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but empty.
    #[error("Environment variable is empty: {0}")]
    EmptyValue(String),

    /// Environment variable could not be parsed.
    #[error("Invalid value for {name}: {reason}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Broker connection settings.
    pub broker: BrokerConfig,
    /// Sizing and flatten behavior.
    #[serde(default)]
    pub trading: TradingConfig,
    /// Webhook authentication.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl GatewayConfig {
    /// Load from the YAML file named by `GATEWAY_CONFIG`, or from the
    /// environment when it is unset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => load_config(path.trim()),
            _ => Self::from_env(),
        }
    }

    /// Broker adapter configuration.
    #[must_use]
    pub fn oanda_config(&self) -> OandaConfig {
        let broker = &self.broker;
        let config = OandaConfig::new(
            broker.credentials.account_id(),
            broker.credentials.api_key(),
            broker.environment,
        )
        .with_timeout(broker.timeout());

        match broker.base_url() {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    /// Order mapper policy.
    #[must_use]
    pub const fn mapper_policy(&self) -> MapperPolicy {
        MapperPolicy {
            flatten_on_flip: self.trading.auto_flatten,
            time_in_force: self.trading.time_in_force,
        }
    }

    /// Alert translator with the configured default risk fraction.
    #[must_use]
    pub const fn translator(&self) -> AlertTranslator {
        AlertTranslator::new(self.trading.default_risk_pct)
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: &str) -> Result<GatewayConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<GatewayConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: GatewayConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &GatewayConfig) -> Result<(), ConfigError> {
    let credentials = &config.broker.credentials;
    if credentials.account_id().trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "broker.credentials.account_id must not be empty".to_string(),
        ));
    }
    if credentials.api_key().trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "broker.credentials.api_key must not be empty".to_string(),
        ));
    }

    if !TIMEOUT_RANGE_SECS.contains(&config.broker.timeout_secs) {
        return Err(ConfigError::ValidationError(format!(
            "broker.timeout_secs must be between {} and {}",
            TIMEOUT_RANGE_SECS.start(),
            TIMEOUT_RANGE_SECS.end()
        )));
    }

    if config
        .trading
        .default_risk_pct
        .is_some_and(|f| f <= Decimal::ZERO || f > Decimal::ONE)
    {
        return Err(ConfigError::ValidationError(
            "trading.default_risk_pct must be within (0, 1]".to_string(),
        ));
    }

    if config.server.metrics_port != 0 && config.server.metrics_addr().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "server.bind_address '{}' must be an IP address when server.metrics_port is set",
            config.server.bind_address
        )));
    }

    if config.server.port != 0 && config.server.port == config.server.metrics_port {
        return Err(ConfigError::ValidationError(
            "server.port and server.metrics_port must be different".to_string(),
        ));
    }

    Ok(())
}
