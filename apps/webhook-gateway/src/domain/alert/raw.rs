//! Loosely typed alert payload as received on the wire.

use serde::Deserialize;
use serde_json::Value;

/// Alert fields before validation.
///
/// Every field stays an untyped JSON value here; alerting services send
/// numbers as strings, strings as numbers, and use several aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAlert {
    /// Requested action.
    pub action: Option<Value>,
    /// Alias for `action`.
    pub side: Option<Value>,
    /// Instrument symbol.
    pub instrument: Option<Value>,
    /// Alias for `instrument`.
    pub symbol: Option<Value>,
    /// Order size.
    pub units: Option<Value>,
    /// Alias for `units`.
    pub qty: Option<Value>,
    /// Fraction of equity to size the order with.
    pub risk_pct: Option<Value>,
    /// Shared webhook secret.
    pub secret: Option<Value>,
    /// Alias for `secret`.
    pub passphrase: Option<Value>,
}

impl RawAlert {
    /// Action, falling back to `side`.
    #[must_use]
    pub fn action(&self) -> Option<&Value> {
        present(self.action.as_ref()).or_else(|| present(self.side.as_ref()))
    }

    /// Instrument, falling back to `symbol`.
    #[must_use]
    pub fn instrument(&self) -> Option<&Value> {
        present(self.instrument.as_ref()).or_else(|| present(self.symbol.as_ref()))
    }

    /// Units, falling back to `qty`.
    #[must_use]
    pub fn units(&self) -> Option<&Value> {
        present(self.units.as_ref()).or_else(|| present(self.qty.as_ref()))
    }

    /// Risk fraction.
    #[must_use]
    pub fn risk_pct(&self) -> Option<&Value> {
        present(self.risk_pct.as_ref())
    }

    /// Shared secret, falling back to `passphrase`.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        present(self.secret.as_ref())
            .or_else(|| present(self.passphrase.as_ref()))
            .and_then(Value::as_str)
    }
}

/// Treat JSON null and blank strings as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}
