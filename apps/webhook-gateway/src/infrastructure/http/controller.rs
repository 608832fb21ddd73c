//! HTTP Controller (Driver Adapter)
//!
//! Axum-based webhook endpoint that delegates to the execute-alert use case.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::get,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::BrokerPort;
use crate::application::use_cases::{ExecuteAlertUseCase, ExecutionReport};
use crate::domain::alert::{AlertTranslator, RawAlert};
use crate::error::GatewayError;
use crate::observability::record_alert;

use super::relay::{RelayedResponse, relay};
use super::response::{HealthResponse, LIVENESS_TEXT};

/// Header carrying the webhook secret when it is not in the body.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Application state shared across handlers.
pub struct AppState<B>
where
    B: BrokerPort,
{
    /// Use case for executing alerts.
    pub execute_alert: Arc<ExecuteAlertUseCase<B>>,
    /// Shared secret callers must present, if configured.
    pub webhook_secret: Option<Arc<str>>,
    /// Application version.
    pub version: String,
    /// Broker environment name.
    pub environment: String,
}

impl<B> Clone for AppState<B>
where
    B: BrokerPort,
{
    fn clone(&self) -> Self {
        Self {
            execute_alert: Arc::clone(&self.execute_alert),
            webhook_secret: self.webhook_secret.clone(),
            version: self.version.clone(),
            environment: self.environment.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<B>(state: AppState<B>) -> Router
where
    B: BrokerPort + 'static,
{
    Router::new()
        .route("/", get(liveness).post(receive_alert))
        .route("/webhook", get(liveness).post(receive_alert))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Liveness endpoint.
async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// Health check endpoint.
async fn health_check<B>(State(state): State<AppState<B>>) -> impl IntoResponse
where
    B: BrokerPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        environment: state.environment.clone(),
    })
}

/// Alert webhook endpoint.
///
/// The body is read as raw bytes so alerts posted as `text/plain` are
/// accepted alongside `application/json`.
async fn receive_alert<B>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
    body: Bytes,
) -> RelayedResponse
where
    B: BrokerPort + 'static,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("alert", %request_id);

    async move {
        let outcome = handle_alert(&state, &headers, &body).await;

        let label = match &outcome {
            Ok(report) if report.order_aborted => "flatten_failed",
            Ok(_) => "forwarded",
            Err(err) => {
                tracing::warn!(code = %err.code(), error = %err, "Alert not forwarded");
                err.outcome()
            }
        };
        record_alert(label);

        let response = relay(outcome);
        tracing::info!(status = response.status().as_u16(), outcome = label, "Alert handled");
        response
    }
    .instrument(span)
    .await
}

async fn handle_alert<B>(
    state: &AppState<B>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<ExecutionReport, GatewayError>
where
    B: BrokerPort,
{
    let parsed = AlertTranslator::parse_body(body);

    let header_secret = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    let presented = header_secret.or_else(|| parsed.as_ref().ok().and_then(RawAlert::secret));
    authorize(state.webhook_secret.as_deref(), presented)?;

    let alert = parsed?;
    state.execute_alert.execute(&alert).await
}

/// Check the presented secret against the configured one.
///
/// Without a configured secret every caller is accepted.
fn authorize(expected: Option<&str>, presented: Option<&str>) -> Result<(), GatewayError> {
    match expected {
        None => Ok(()),
        Some(expected) if presented.is_some_and(|p| constant_time_eq(p, expected)) => Ok(()),
        Some(_) => Err(GatewayError::Unauthorized),
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
