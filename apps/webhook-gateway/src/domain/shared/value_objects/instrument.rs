//! Instrument value object for currency/asset pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::ValidationError;

/// Minimum length of each side of a pair.
const MIN_CODE_LEN: usize = 3;

/// Length of the quote code when the pair arrives without a separator.
const QUOTE_CODE_LEN: usize = 3;

/// A tradable pair in canonical `BASE_QUOTE` form.
///
/// Examples:
/// - FX: "EUR_USD", "GBP_JPY"
/// - CFD: "XAU_USD", "SPX500_USD"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instrument(String);

impl Instrument {
    /// Normalize a raw alert symbol into an instrument.
    ///
    /// Accepts `EUR_USD`, `EURUSD`, `eur/usd`, `EUR-USD`, `EUR USD` and
    /// venue-prefixed forms such as `OANDA:EURUSD`.
    ///
    /// A symbol without a separator is always split before its last three
    /// characters, so four-letter quotes need an explicit separator:
    /// `BTCUSDT` becomes `BTCU_SDT`, while `BTC/USDT` becomes `BTC_USDT`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInstrument` if the symbol cannot be
    /// split into two alphanumeric codes of at least three characters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidInstrument(raw.to_string());

        let upper = raw.trim().to_uppercase();
        let symbol = upper.rsplit(':').next().unwrap_or_default();

        let parts: Vec<&str> = symbol
            .split(|c: char| c == '_' || c == '-' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        let (base, quote) = match parts.as_slice() {
            [base, quote] => (*base, *quote),
            [joined] if joined.len() >= MIN_CODE_LEN + QUOTE_CODE_LEN && joined.is_ascii() => {
                joined.split_at(joined.len() - QUOTE_CODE_LEN)
            }
            _ => return Err(invalid()),
        };

        if !is_code(base) || !is_code(quote) {
            return Err(invalid());
        }

        Ok(Self(format!("{base}_{quote}")))
    }

    /// Get the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base code (left of the separator).
    #[must_use]
    pub fn base(&self) -> &str {
        self.0.split('_').next().unwrap_or_default()
    }

    /// Quote code (right of the separator).
    #[must_use]
    pub fn quote(&self) -> &str {
        self.0.split('_').nth(1).unwrap_or_default()
    }
}

fn is_code(part: &str) -> bool {
    part.len() >= MIN_CODE_LEN && part.chars().all(|c| c.is_ascii_alphanumeric())
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Instrument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
