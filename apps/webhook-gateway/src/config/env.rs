//! Configuration from environment variables.

use std::str::FromStr;

use serde_json::Value;

use super::settings::{
    BrokerConfig, Credentials, ServerConfig, TradingConfig, WebhookConfig, default_auto_flatten,
    default_bind_address, default_port, default_timeout_secs,
};
use super::{ConfigError, GatewayConfig, validate_config};
use crate::domain::alert::parse_risk_fraction;
use crate::domain::order_mapping::TimeInForce;
use crate::infrastructure::broker::OandaEnvironment;

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or any value is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let credentials = Credentials::new(
            vars.required("OANDA_ACCOUNT_ID")?,
            vars.required("OANDA_API_KEY")?,
        );

        let broker = BrokerConfig {
            environment: vars.parse("OANDA_ENV", OandaEnvironment::default())?,
            credentials,
            base_url: vars.optional("OANDA_BASE_URL"),
            timeout_secs: vars.parse("BROKER_TIMEOUT_SECS", default_timeout_secs())?,
        };

        let default_risk_pct = vars
            .optional("DEFAULT_RISK_PCT")
            .map(|raw| {
                parse_risk_fraction(&Value::String(raw)).map_err(|e| ConfigError::InvalidEnvVar {
                    name: "DEFAULT_RISK_PCT".to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let trading = TradingConfig {
            default_risk_pct,
            auto_flatten: vars.flag("AUTO_FLATTEN", default_auto_flatten())?,
            time_in_force: vars.parse("ORDER_TIME_IN_FORCE", TimeInForce::default())?,
        };

        let server = ServerConfig {
            port: vars.parse("PORT", default_port())?,
            bind_address: vars
                .optional("BIND_ADDRESS")
                .unwrap_or_else(default_bind_address),
            metrics_port: vars.parse("METRICS_PORT", 0)?,
        };

        let webhook = WebhookConfig {
            secret: vars.optional("WEBHOOK_SECRET"),
        };

        let config = Self {
            server,
            broker,
            trading,
            webhook,
        };
        validate_config(&config)?;
        Ok(config)
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value, `None` when unset or blank.
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        match (self.0)(name) {
            None => Err(ConfigError::MissingEnvVar(name.to_string())),
            Some(v) if v.trim().is_empty() => Err(ConfigError::EmptyValue(name.to_string())),
            Some(v) => Ok(v.trim().to_string()),
        }
    }

    fn parse<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(name).map_or(Ok(default), |raw| {
            raw.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                reason: e.to_string(),
            })
        })
    }

    fn flag(&self, name: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.optional(name) else {
            return Ok(default);
        };
        match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidEnvVar {
                name: name.to_string(),
                reason: format!("'{raw}' is not a boolean"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        GatewayConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const CREDENTIALS: [(&str, &str); 2] = [
        ("OANDA_ACCOUNT_ID", "101-004-1234567-001"),
        ("OANDA_API_KEY", "token"),
    ];

    #[test]
    fn defaults_with_only_credentials() {
        let config = load(&CREDENTIALS).unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.metrics_addr(), None);
        assert_eq!(config.broker.environment, OandaEnvironment::Practice);
        assert_eq!(config.broker.timeout_secs, 15);
        assert_eq!(config.broker.base_url(), None);
        assert!(config.trading.auto_flatten);
        assert_eq!(config.trading.default_risk_pct, None);
        assert_eq!(config.webhook.secret(), None);
    }

    #[test]
    fn all_variables() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.extend([
            ("OANDA_ENV", "live"),
            ("OANDA_BASE_URL", "http://127.0.0.1:8081"),
            ("WEBHOOK_SECRET", "s3cret"),
            ("DEFAULT_RISK_PCT", "0.01"),
            ("AUTO_FLATTEN", "false"),
            ("ORDER_TIME_IN_FORCE", "ioc"),
            ("BROKER_TIMEOUT_SECS", "30"),
            ("PORT", "8000"),
            ("BIND_ADDRESS", "127.0.0.1"),
            ("METRICS_PORT", "9100"),
        ]);

        let config = load(&pairs).unwrap();
        assert_eq!(config.broker.environment, OandaEnvironment::Live);
        assert_eq!(config.broker.base_url(), Some("http://127.0.0.1:8081"));
        assert_eq!(config.webhook.secret(), Some("s3cret"));
        assert_eq!(config.trading.default_risk_pct, Some(dec!(0.01)));
        assert!(!config.trading.auto_flatten);
        assert_eq!(config.trading.time_in_force, TimeInForce::Ioc);
        assert_eq!(config.broker.timeout_secs, 30);
        assert_eq!(config.server.http_addr(), "127.0.0.1:8000");
        assert_eq!(config.server.metrics_addr().unwrap().port(), 9100);
    }

    #[test]
    fn missing_credentials() {
        assert!(matches!(
            load(&[("OANDA_API_KEY", "token")]),
            Err(ConfigError::MissingEnvVar(name)) if name == "OANDA_ACCOUNT_ID"
        ));
        assert!(matches!(
            load(&[("OANDA_ACCOUNT_ID", "1"), ("OANDA_API_KEY", "  ")]),
            Err(ConfigError::EmptyValue(name)) if name == "OANDA_API_KEY"
        ));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (name, value) in [
            ("OANDA_ENV", "paper"),
            ("DEFAULT_RISK_PCT", "2"),
            ("AUTO_FLATTEN", "maybe"),
            ("ORDER_TIME_IN_FORCE", "GTC"),
            ("PORT", "http"),
        ] {
            let mut pairs = CREDENTIALS.to_vec();
            pairs.push((name, value));
            assert!(
                matches!(load(&pairs), Err(ConfigError::InvalidEnvVar { .. })),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn timeout_out_of_range() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("BROKER_TIMEOUT_SECS", "0"));
        assert!(matches!(load(&pairs), Err(ConfigError::ValidationError(_))));
    }
}
