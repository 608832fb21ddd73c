//! OANDA adapter configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Environment for the OANDA API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OandaEnvironment {
    /// Practice (demo) account.
    #[default]
    #[serde(alias = "demo")]
    Practice,
    /// Live trading (real money).
    #[serde(alias = "trade")]
    Live,
}

impl OandaEnvironment {
    /// Get the REST API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Practice => "https://api-fxpractice.oanda.com",
            Self::Live => "https://api-fxtrade.oanda.com",
        }
    }

    /// Check if this is live trading.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for OandaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OandaEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "practice" | "demo" => Ok(Self::Practice),
            "live" | "trade" => Ok(Self::Live),
            other => Err(format!("unknown OANDA environment '{other}'")),
        }
    }
}

/// Configuration for the OANDA broker adapter.
#[derive(Clone)]
pub struct OandaConfig {
    /// Account identifier.
    pub account_id: String,
    /// Bearer token.
    pub api_token: String,
    /// Trading environment.
    pub environment: OandaEnvironment,
    /// Overrides the environment's host.
    pub base_url: Option<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl OandaConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(
        account_id: impl Into<String>,
        api_token: impl Into<String>,
        environment: OandaEnvironment,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            api_token: api_token.into(),
            environment,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the adapter at another host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Effective REST base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }
}

impl fmt::Debug for OandaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OandaConfig")
            .field("account_id", &self.account_id)
            .field("api_token", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_urls() {
        assert_eq!(
            OandaEnvironment::Practice.base_url(),
            "https://api-fxpractice.oanda.com"
        );
        assert_eq!(
            OandaEnvironment::Live.base_url(),
            "https://api-fxtrade.oanda.com"
        );
        assert!(OandaEnvironment::Live.is_live());
    }

    #[test]
    fn environment_parse() {
        assert_eq!("LIVE".parse(), Ok(OandaEnvironment::Live));
        assert_eq!(" practice ".parse(), Ok(OandaEnvironment::Practice));
        assert!("paper".parse::<OandaEnvironment>().is_err());
    }

    #[test]
    fn base_url_override() {
        let config = OandaConfig::new("101-001", "token", OandaEnvironment::Live)
            .with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");

        let config = OandaConfig::new("101-001", "token", OandaEnvironment::Practice);
        assert_eq!(config.base_url(), "https://api-fxpractice.oanda.com");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn debug_redacts_token() {
        let config = OandaConfig::new("101-001", "super-secret-token", OandaEnvironment::Practice);
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
