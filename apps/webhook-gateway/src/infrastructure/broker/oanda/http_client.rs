//! HTTP client wrapper for the OANDA v20 REST API.
//!
//! One attempt per call; the client-wide timeout bounds every request.

use std::fmt;
use std::time::Instant;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::config::OandaConfig;
use super::error::OandaError;
use crate::observability::record_broker_request;

/// Raw outcome of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl RawResponse {
    const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP client for the OANDA API.
#[derive(Clone)]
pub struct OandaHttpClient {
    client: Client,
    account_url: String,
}

impl OandaHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &OandaConfig) -> Result<Self, OandaError> {
        if config.account_id.trim().is_empty() || config.api_token.trim().is_empty() {
            return Err(OandaError::Client("missing OANDA credentials".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| OandaError::Client("API token is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| OandaError::Client(e.to_string()))?;

        Ok(Self {
            client,
            account_url: format!("{}/v3/accounts/{}", config.base_url(), config.account_id),
        })
    }

    /// GET an account resource and decode a 2xx body.
    ///
    /// Non-2xx statuses become [`OandaError::Status`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        path: &str,
    ) -> Result<T, OandaError> {
        let response = self.send(kind, Method::GET, path, None::<&()>).await?;
        if !response.is_success() {
            return Err(OandaError::Status {
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| OandaError::JsonParse(e.to_string()))
    }

    /// Issue a request and return the exchange whatever its status.
    #[allow(clippy::future_not_send)]
    pub async fn send<B: Serialize>(
        &self,
        kind: &'static str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse, OandaError> {
        let url = format!("{}{path}", self.account_url);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(b) = body {
            request = request.json(b);
        }

        let started = Instant::now();
        let result = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(RawResponse { status, body })
        }
        .await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(response) => {
                record_broker_request(kind, &response.status.to_string(), elapsed);
                tracing::debug!(
                    kind,
                    %method,
                    path,
                    status = response.status,
                    elapsed_ms = elapsed * 1000.0,
                    "Broker responded"
                );
                Ok(response)
            }
            Err(e) => {
                let err = OandaError::from(e);
                let label = match &err {
                    OandaError::Network { kind, .. } => kind.as_str(),
                    _ => "error",
                };
                record_broker_request(kind, label, elapsed);
                tracing::warn!(kind, %method, path, error = %err, "Broker call failed");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for OandaHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OandaHttpClient")
            .field("account_url", &self.account_url)
            .finish_non_exhaustive()
    }
}

/// Extract a readable message from an OANDA error body, for logs.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<super::api_types::OandaErrorResponse>(body)
        .ok()
        .and_then(|e| e.error_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::broker::oanda::OandaEnvironment;

    #[test]
    fn rejects_empty_credentials() {
        let config = OandaConfig::new("", "token", OandaEnvironment::Practice);
        assert!(matches!(
            OandaHttpClient::new(&config),
            Err(OandaError::Client(_))
        ));
    }

    #[test]
    fn debug_omits_token() {
        let config = OandaConfig::new("101-001-1", "tok-123", OandaEnvironment::Practice);
        let client = OandaHttpClient::new(&config).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("api-fxpractice.oanda.com/v3/accounts/101-001-1"));
        assert!(!debug.contains("tok-123"));
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            error_message(r#"{"errorMessage":"Invalid value specified for 'units'"}"#).as_deref(),
            Some("Invalid value specified for 'units'")
        );
        assert_eq!(error_message("<html>"), None);
    }
}
