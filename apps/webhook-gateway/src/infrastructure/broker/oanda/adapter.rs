//! OANDA broker adapter implementing BrokerPort.

use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;

use crate::application::ports::{BrokerError, BrokerPort, BrokerReply};
use crate::domain::order_mapping::{ClosePositionRequest, PositionSnapshot, SignedOrder};
use crate::domain::shared::Instrument;

use super::api_types::{
    AccountSummaryResponse, ClosePositionBody, OrderRequestBody, PositionResponse,
    PricingResponse,
};
use super::config::{OandaConfig, OandaEnvironment};
use super::error::OandaError;
use super::http_client::{OandaHttpClient, RawResponse, error_message};

/// OANDA v20 broker adapter.
///
/// Implements `BrokerPort` for the OANDA REST API.
#[derive(Debug, Clone)]
pub struct OandaBrokerAdapter {
    client: OandaHttpClient,
    environment: OandaEnvironment,
}

impl OandaBrokerAdapter {
    /// Create a new OANDA broker adapter.
    pub fn new(config: &OandaConfig) -> Result<Self, OandaError> {
        let client = OandaHttpClient::new(config)?;
        Ok(Self {
            client,
            environment: config.environment,
        })
    }

    /// Check if we're in live trading mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.environment.is_live()
    }

    fn reply(kind: &'static str, response: RawResponse) -> BrokerReply {
        if response.status >= 400 {
            tracing::warn!(
                kind,
                status = response.status,
                error = error_message(&response.body).as_deref(),
                "Broker rejected request"
            );
        }
        BrokerReply::new(response.status, response.body)
    }
}

#[async_trait]
impl BrokerPort for OandaBrokerAdapter {
    async fn place_order(&self, order: &SignedOrder) -> Result<BrokerReply, BrokerError> {
        tracing::info!(
            instrument = %order.instrument,
            units = order.signed_units,
            position_fill = %order.position_fill,
            time_in_force = %order.time_in_force,
            live = self.is_live(),
            "Placing market order"
        );

        let body = OrderRequestBody::from(order);
        let response = self
            .client
            .send("place_order", Method::POST, "/orders", Some(&body))
            .await?;
        Ok(Self::reply("place_order", response))
    }

    async fn close_position(
        &self,
        request: &ClosePositionRequest,
    ) -> Result<BrokerReply, BrokerError> {
        tracing::info!(
            instrument = %request.instrument,
            side = request.side().as_str(),
            live = self.is_live(),
            "Closing position"
        );

        let body = ClosePositionBody::from(request);
        let path = format!("/positions/{}/close", request.instrument);
        let response = self
            .client
            .send("close_position", Method::PUT, &path, Some(&body))
            .await?;
        Ok(Self::reply("close_position", response))
    }

    async fn get_position(
        &self,
        instrument: &Instrument,
    ) -> Result<PositionSnapshot, BrokerError> {
        let path = format!("/positions/{instrument}");
        match self
            .client
            .get_json::<PositionResponse>("get_position", &path)
            .await
        {
            Ok(response) => Ok(PositionSnapshot {
                long_units: response.position.long.units,
                short_units: response.position.short.units,
            }),
            // No position has ever been opened for this instrument
            Err(OandaError::Status { status: 404, .. }) => Ok(PositionSnapshot::FLAT),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_equity(&self) -> Result<Decimal, BrokerError> {
        let response: AccountSummaryResponse =
            self.client.get_json("get_equity", "/summary").await?;
        Ok(response
            .account
            .equity()
            .ok_or(OandaError::MissingValue("account NAV"))?)
    }

    async fn get_mid_price(&self, instrument: &Instrument) -> Result<Decimal, BrokerError> {
        let path = format!("/pricing?instruments={instrument}");
        let response: PricingResponse = self.client.get_json("get_mid_price", &path).await?;
        let mid = response
            .prices
            .iter()
            .find(|p| p.instrument.as_deref().is_none_or(|i| i == instrument.as_str()))
            .and_then(|p| p.mid())
            .ok_or(OandaError::MissingValue("price"))?;
        Ok(mid)
    }
}
