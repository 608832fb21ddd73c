//! Alert Translator (Domain Service)
//!
//! Parse-then-validate pipeline from a raw webhook body to an [`OrderIntent`].

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::action::AlertAction;
use super::intent::{OrderIntent, SizingMode};
use super::raw::RawAlert;
use crate::domain::shared::{Instrument, Units, ValidationError, coerce_whole_units};

/// UTF-8 byte order mark some alerting tools prepend to text bodies.
const BOM: char = '\u{feff}';

/// Translates alerts into validated order intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertTranslator {
    default_risk_fraction: Option<Decimal>,
}

impl AlertTranslator {
    /// Create a translator.
    ///
    /// `default_risk_fraction` sizes `buy`/`sell` alerts that carry neither
    /// units nor their own `risk_pct`.
    #[must_use]
    pub const fn new(default_risk_fraction: Option<Decimal>) -> Self {
        Self {
            default_risk_fraction,
        }
    }

    /// Parse and validate a raw request body.
    pub fn translate(&self, body: &[u8]) -> Result<OrderIntent, ValidationError> {
        let raw = Self::parse_body(body)?;
        self.translate_raw(&raw)
    }

    /// Parse a request body into loosely typed alert fields.
    ///
    /// The body may be a JSON object or a JSON string whose text is itself a
    /// JSON object (alert services that post JSON as `text/plain` and
    /// double-encode it).
    pub fn parse_body(body: &[u8]) -> Result<RawAlert, ValidationError> {
        let text = std::str::from_utf8(body)
            .map_err(|_| ValidationError::InvalidFormat("body is not valid UTF-8".to_string()))?
            .trim_start_matches(BOM)
            .trim();

        if text.is_empty() {
            return Err(ValidationError::InvalidFormat("body is empty".to_string()));
        }

        let value: Value = serde_json::from_str(text)
            .map_err(|e| ValidationError::InvalidFormat(e.to_string()))?;

        let value = match value {
            Value::String(inner) => serde_json::from_str(inner.trim())
                .map_err(|e| ValidationError::InvalidFormat(e.to_string()))?,
            other => other,
        };

        Self::parse_value(value)
    }

    /// Read alert fields from an already decoded JSON value.
    pub fn parse_value(value: Value) -> Result<RawAlert, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::InvalidFormat(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ValidationError::InvalidFormat(e.to_string()))
    }

    /// Validate parsed alert fields.
    pub fn translate_raw(&self, raw: &RawAlert) -> Result<OrderIntent, ValidationError> {
        let action = parse_action(raw)?;
        let instrument = parse_instrument(raw)?;

        let sizing = match action {
            AlertAction::CloseAll => SizingMode::CloseAll,
            AlertAction::CloseBuy | AlertAction::CloseSell => {
                // Zero or negative units on a close mean "close everything".
                match raw.units().map(coerce_whole_units).transpose()? {
                    Some(n) => positive_units(n).map_or(SizingMode::CloseAll, SizingMode::Explicit),
                    None => SizingMode::CloseAll,
                }
            }
            AlertAction::Buy | AlertAction::Sell => {
                match raw.units().map(coerce_whole_units).transpose()? {
                    Some(n) => SizingMode::Explicit(positive_units(n).ok_or_else(|| {
                        ValidationError::InvalidUnits(format!(
                            "{n} must be greater than zero for {action}"
                        ))
                    })?),
                    None => SizingMode::RiskPercent(
                        self.risk_fraction(raw)?
                            .ok_or(ValidationError::MissingField("units"))?,
                    ),
                }
            }
        };

        Ok(OrderIntent::new(action, instrument, sizing))
    }

    fn risk_fraction(&self, raw: &RawAlert) -> Result<Option<Decimal>, ValidationError> {
        match raw.risk_pct() {
            Some(value) => parse_risk_fraction(value).map(Some),
            None => Ok(self.default_risk_fraction),
        }
    }
}

fn parse_action(raw: &RawAlert) -> Result<AlertAction, ValidationError> {
    let value = raw.action().ok_or(ValidationError::MissingField("action"))?;
    match value {
        Value::String(s) => s.parse(),
        other => Err(ValidationError::UnknownAction(other.to_string())),
    }
}

fn parse_instrument(raw: &RawAlert) -> Result<Instrument, ValidationError> {
    let value = raw
        .instrument()
        .ok_or(ValidationError::MissingField("instrument"))?;
    match value {
        Value::String(s) => Instrument::parse(s),
        other => Err(ValidationError::InvalidInstrument(other.to_string())),
    }
}

fn positive_units(n: i64) -> Option<Units> {
    u64::try_from(n).ok().and_then(Units::new)
}

/// Parse a risk fraction such as `0.02` and check it lies in `(0, 1]`.
pub(crate) fn parse_risk_fraction(value: &Value) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::InvalidRiskFraction(format!("'{value}' is not a number"));

    let fraction = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|_| invalid())?,
        Value::String(s) => Decimal::from_str(s.trim()).map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
        return Err(ValidationError::InvalidRiskFraction(format!(
            "{fraction} must be within (0, 1]"
        )));
    }

    Ok(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn translate(body: &Value) -> Result<OrderIntent, ValidationError> {
        AlertTranslator::default().translate(body.to_string().as_bytes())
    }

    #[test]
    fn buy_with_explicit_units() {
        let intent = translate(&json!({
            "action": "buy", "instrument": "EUR_USD", "units": 100
        }))
        .unwrap();

        assert_eq!(intent.action(), AlertAction::Buy);
        assert_eq!(intent.instrument().as_str(), "EUR_USD");
        assert_eq!(
            intent.sizing(),
            SizingMode::Explicit(Units::new(100).unwrap())
        );
    }

    #[test]
    fn aliases_symbol_and_qty() {
        let intent = translate(&json!({
            "action": "SELL", "symbol": "OANDA:GBPJPY", "qty": "50"
        }))
        .unwrap();

        assert_eq!(intent.action(), AlertAction::Sell);
        assert_eq!(intent.instrument().as_str(), "GBP_JPY");
        assert_eq!(intent.sizing(), SizingMode::Explicit(Units::new(50).unwrap()));
    }

    #[test]
    fn side_is_accepted_for_action() {
        let intent = translate(&json!({
            "side": "buy", "instrument": "EURUSD", "units": 1
        }))
        .unwrap();
        assert_eq!(intent.action(), AlertAction::Buy);
    }

    #[test]
    fn float_units_round_half_up() {
        let intent = translate(&json!({
            "action": "buy", "instrument": "EURUSD", "units": 10.5
        }))
        .unwrap();
        assert_eq!(intent.sizing(), SizingMode::Explicit(Units::new(11).unwrap()));
    }

    #[test]
    fn json_as_text_is_reparsed() {
        let inner = json!({"action": "buy", "instrument": "EUR/USD", "units": 5}).to_string();
        let body = serde_json::to_string(&inner).unwrap();

        let intent = AlertTranslator::default()
            .translate(body.as_bytes())
            .unwrap();
        assert_eq!(intent.instrument().as_str(), "EUR_USD");
    }

    #[test]
    fn bom_and_whitespace_are_tolerated() {
        let body = "\u{feff}  {\"action\":\"buy\",\"instrument\":\"EURUSD\",\"units\":1}\n";
        assert!(AlertTranslator::default().translate(body.as_bytes()).is_ok());
    }

    #[test]
    fn malformed_body_is_invalid_format() {
        for body in ["", "not json", "{\"action\":", "[1,2]", "42", "\"plain text\""] {
            assert!(
                matches!(
                    AlertTranslator::default().translate(body.as_bytes()),
                    Err(ValidationError::InvalidFormat(_))
                ),
                "{body:?} should be rejected as invalid format"
            );
        }
    }

    #[test]
    fn missing_action() {
        assert_eq!(
            translate(&json!({"instrument": "EURUSD", "units": 1})),
            Err(ValidationError::MissingField("action"))
        );
        assert_eq!(
            translate(&json!({"action": "  ", "instrument": "EURUSD", "units": 1})),
            Err(ValidationError::MissingField("action"))
        );
    }

    #[test]
    fn unknown_action_is_reported() {
        assert_eq!(
            translate(&json!({"action": "hold", "instrument": "EURUSD", "units": 1})),
            Err(ValidationError::UnknownAction("hold".to_string()))
        );
        assert_eq!(
            translate(&json!({"action": 7, "instrument": "EURUSD", "units": 1})),
            Err(ValidationError::UnknownAction("7".to_string()))
        );
    }

    #[test]
    fn missing_instrument() {
        assert_eq!(
            translate(&json!({"action": "buy", "units": 1})),
            Err(ValidationError::MissingField("instrument"))
        );
    }

    #[test]
    fn invalid_instrument() {
        assert_eq!(
            translate(&json!({"action": "buy", "instrument": "EU", "units": 1})),
            Err(ValidationError::InvalidInstrument("EU".to_string()))
        );
    }

    #[test]
    fn entry_requires_positive_units() {
        for units in [json!(0), json!(-5), json!("0"), json!(0.4)] {
            assert!(
                matches!(
                    translate(&json!({"action": "buy", "instrument": "EURUSD", "units": units})),
                    Err(ValidationError::InvalidUnits(_))
                ),
                "{units} should be rejected"
            );
        }
    }

    #[test]
    fn entry_rejects_non_numeric_units() {
        assert!(matches!(
            translate(&json!({"action": "sell", "instrument": "EURUSD", "units": "lots"})),
            Err(ValidationError::InvalidUnits(_))
        ));
    }

    #[test]
    fn entry_without_units_or_risk_is_missing_units() {
        assert_eq!(
            translate(&json!({"action": "buy", "instrument": "EURUSD"})),
            Err(ValidationError::MissingField("units"))
        );
    }

    #[test]
    fn close_without_units_closes_all() {
        let intent = translate(&json!({"action": "close_buy", "instrument": "EUR_USD"})).unwrap();
        assert_eq!(intent.action(), AlertAction::CloseBuy);
        assert_eq!(intent.sizing(), SizingMode::CloseAll);
    }

    #[test]
    fn close_with_zero_units_closes_all() {
        let intent =
            translate(&json!({"action": "close_sell", "instrument": "EURUSD", "units": 0})).unwrap();
        assert_eq!(intent.sizing(), SizingMode::CloseAll);
    }

    #[test]
    fn close_with_units_is_partial() {
        let intent =
            translate(&json!({"action": "close_buy", "instrument": "EURUSD", "units": 25})).unwrap();
        assert_eq!(intent.sizing(), SizingMode::Explicit(Units::new(25).unwrap()));
    }

    #[test]
    fn close_all_ignores_units() {
        let intent =
            translate(&json!({"action": "close_all", "instrument": "EURUSD", "units": "junk"}))
                .unwrap();
        assert_eq!(intent.sizing(), SizingMode::CloseAll);
    }

    #[test]
    fn risk_pct_selects_risk_sizing() {
        let intent =
            translate(&json!({"action": "buy", "instrument": "EURUSD", "risk_pct": 0.02})).unwrap();
        assert_eq!(intent.sizing(), SizingMode::RiskPercent(dec!(0.02)));
    }

    #[test]
    fn explicit_units_win_over_risk_pct() {
        let intent = translate(&json!({
            "action": "buy", "instrument": "EURUSD", "units": 3, "risk_pct": 0.02
        }))
        .unwrap();
        assert_eq!(intent.sizing(), SizingMode::Explicit(Units::new(3).unwrap()));
    }

    #[test]
    fn default_risk_fraction_applies() {
        let translator = AlertTranslator::new(Some(dec!(0.01)));
        let body = json!({"action": "sell", "instrument": "EURUSD"}).to_string();
        let intent = translator.translate(body.as_bytes()).unwrap();
        assert_eq!(intent.sizing(), SizingMode::RiskPercent(dec!(0.01)));
    }

    #[test]
    fn risk_pct_out_of_range() {
        for risk in [json!(0), json!(1.5), json!("-0.1"), json!("abc")] {
            assert!(
                matches!(
                    translate(&json!({"action": "buy", "instrument": "EURUSD", "risk_pct": risk})),
                    Err(ValidationError::InvalidRiskFraction(_))
                ),
                "{risk} should be rejected"
            );
        }
    }
}
