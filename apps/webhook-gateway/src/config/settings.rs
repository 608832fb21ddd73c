//! Gateway configuration sections.

use std::net::SocketAddr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::order_mapping::TimeInForce;
use crate::infrastructure::broker::OandaEnvironment;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Webhook port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Prometheus metrics port (0 = disabled).
    #[serde(default)]
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            metrics_port: 0,
        }
    }
}

impl ServerConfig {
    /// `bind_address:port` for the webhook listener.
    #[must_use]
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Metrics listener address, if enabled.
    ///
    /// `None` also when `bind_address` is not an IP literal; configuration
    /// validation rejects that combination.
    #[must_use]
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        if self.metrics_port == 0 {
            return None;
        }
        format!("{}:{}", self.bind_address, self.metrics_port)
            .parse()
            .ok()
    }
}

pub(crate) const fn default_port() -> u16 {
    5000
}

pub(crate) fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// OANDA account credentials.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    account_id: String,
    api_key: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(account_id: String, api_key: String) -> Self {
        Self {
            account_id,
            api_key,
        }
    }

    /// Get the account ID.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrokerConfig {
    /// Practice or live.
    #[serde(default)]
    pub environment: OandaEnvironment,
    /// Account credentials.
    pub credentials: Credentials,
    /// Host override (tests, proxies).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BrokerConfig {
    /// Per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Host override, ignoring blank values.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

pub(crate) const fn default_timeout_secs() -> u64 {
    15
}

/// Order sizing and flip behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TradingConfig {
    /// Fraction of equity used when an entry alert carries no units.
    #[serde(default)]
    pub default_risk_pct: Option<Decimal>,
    /// Close an opposing position before a new entry.
    #[serde(default = "default_auto_flatten")]
    pub auto_flatten: bool,
    /// Time in force for market orders.
    #[serde(default)]
    pub time_in_force: TimeInForce,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            default_risk_pct: None,
            auto_flatten: default_auto_flatten(),
            time_in_force: TimeInForce::default(),
        }
    }
}

pub(crate) const fn default_auto_flatten() -> bool {
    true
}

/// Inbound webhook settings.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret callers must present.
    #[serde(default)]
    pub secret: Option<String>,
}

impl WebhookConfig {
    /// Configured secret, ignoring blank values.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &self.secret().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.http_addr(), "0.0.0.0:5000");
        assert_eq!(server.metrics_addr(), None);

        let server = ServerConfig {
            metrics_port: 9090,
            ..ServerConfig::default()
        };
        assert_eq!(server.metrics_addr().unwrap().port(), 9090);
    }

    #[test]
    fn secrets_are_redacted() {
        let credentials = Credentials::new("101-001".to_string(), "api-key-value".to_string());
        let debug = format!("{credentials:?}");
        assert!(debug.contains("101-001"));
        assert!(!debug.contains("api-key-value"));

        let webhook = WebhookConfig {
            secret: Some("hunter2".to_string()),
        };
        assert!(!format!("{webhook:?}").contains("hunter2"));
    }

    #[test]
    fn blank_values_are_absent() {
        let webhook = WebhookConfig {
            secret: Some(String::new()),
        };
        assert_eq!(webhook.secret(), None);
    }
}
