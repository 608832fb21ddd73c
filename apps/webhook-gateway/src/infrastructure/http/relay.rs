//! Response relay: turns an alert outcome into the HTTP response.
//!
//! Completed broker exchanges are forwarded with the broker's own status and
//! body. Everything else becomes a JSON error body with the status from
//! [`ErrorCode::http_status`](crate::error::ErrorCode::http_status).

use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::application::ports::{BrokerError, BrokerReply};
use crate::application::use_cases::ExecutionReport;
use crate::domain::order_mapping::PositionSide;
use crate::error::GatewayError;

/// Added when an opposing position was closed before the order.
pub const POSITION_FLATTENED_HEADER: &str = "x-position-flattened";

/// HTTP response for one alert.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedResponse {
    status: StatusCode,
    body: Value,
    flattened: Option<PositionSide>,
}

impl RelayedResponse {
    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// JSON body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Side flattened before the order, if any.
    #[must_use]
    pub const fn flattened(&self) -> Option<PositionSide> {
        self.flattened
    }

    fn from_broker(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            body: broker_body(body),
            flattened: None,
        }
    }
}

/// Map an alert outcome to its HTTP response.
#[must_use]
pub fn relay(outcome: Result<ExecutionReport, GatewayError>) -> RelayedResponse {
    match outcome {
        Ok(report) => {
            let BrokerReply { status, body } = &report.reply;
            RelayedResponse {
                flattened: report.flattened,
                ..RelayedResponse::from_broker(*status, body)
            }
        }
        Err(GatewayError::Broker(BrokerError::Rejected { status, body })) => {
            RelayedResponse::from_broker(status, &body)
        }
        Err(err) => RelayedResponse {
            status: err.code().http_status(),
            body: json!(err.to_http_response()),
            flattened: None,
        },
    }
}

/// Broker JSON passes through; anything else is wrapped as text.
fn broker_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| json!({ "text": raw }))
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(side) = self.flattened {
            response.headers_mut().insert(
                POSITION_FLATTENED_HEADER,
                HeaderValue::from_static(side.as_str()),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TransportKind;
    use crate::domain::order_mapping::MappingError;
    use crate::domain::shared::ValidationError;

    fn report(status: u16, body: &str, flattened: Option<PositionSide>) -> ExecutionReport {
        ExecutionReport {
            reply: BrokerReply::new(status, body),
            flattened,
            order_aborted: false,
        }
    }

    #[test]
    fn broker_json_is_forwarded() {
        let response = relay(Ok(report(201, r#"{"orderFillTransaction":{"id":"7"}}"#, None)));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body()["orderFillTransaction"]["id"], "7");
    }

    #[test]
    fn broker_error_status_is_kept() {
        let response = relay(Ok(report(400, r#"{"errorMessage":"bad units"}"#, None)));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body()["errorMessage"], "bad units");
    }

    #[test]
    fn non_json_body_is_wrapped() {
        let response = relay(Ok(report(503, "upstream maintenance", None)));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.body(), &json!({"text": "upstream maintenance"}));
    }

    #[test]
    fn flatten_sets_header() {
        let response = relay(Ok(report(201, "{}", Some(PositionSide::Short)))).into_response();
        assert_eq!(
            response.headers().get(POSITION_FLATTENED_HEADER).unwrap(),
            "short"
        );
    }

    #[test]
    fn transport_failure_is_bad_gateway() {
        let response = relay(Err(
            BrokerError::transport(TransportKind::Timeout, "deadline").into()
        ));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.body()["error"], "BROKER_TIMEOUT");
    }

    #[test]
    fn lookup_rejection_is_relayed() {
        let response = relay(Err(BrokerError::Rejected {
            status: 403,
            body: r#"{"errorMessage":"forbidden"}"#.to_string(),
        }
        .into()));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.body()["errorMessage"], "forbidden");
    }

    #[test]
    fn local_errors_use_code_table() {
        let response = relay(Err(ValidationError::MissingField("action").into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body()["error"], "MISSING_FIELD");

        let response = relay(Err(MappingError::MissingAccountData("equity").into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = relay(Err(GatewayError::Unauthorized));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.body()["error"], "UNAUTHORIZED");
    }
}
