//! Execute Alert Use Case

use std::sync::Arc;

use crate::application::ports::{BrokerError, BrokerPort, BrokerReply};
use crate::domain::alert::{AlertTranslator, OrderIntent, RawAlert};
use crate::domain::order_mapping::{
    AccountSnapshot, BrokerRequest, MappingError, OrderMapper, PositionSide,
};
use crate::error::GatewayError;

/// Result of dispatching an alert to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Reply of the last broker call issued.
    pub reply: BrokerReply,
    /// Side closed before the order, when a flip was flattened.
    pub flattened: Option<PositionSide>,
    /// True when a flatten close failed and the order was not sent.
    pub order_aborted: bool,
}

/// Use case for turning a webhook alert into broker calls.
pub struct ExecuteAlertUseCase<B>
where
    B: BrokerPort,
{
    broker: Arc<B>,
    translator: AlertTranslator,
    mapper: OrderMapper,
}

impl<B> ExecuteAlertUseCase<B>
where
    B: BrokerPort,
{
    /// Create a new ExecuteAlertUseCase.
    pub const fn new(broker: Arc<B>, translator: AlertTranslator, mapper: OrderMapper) -> Self {
        Self {
            broker,
            translator,
            mapper,
        }
    }

    /// Execute the use case.
    ///
    /// Validation and mapping failures return before any order is sent.
    /// Requests are issued strictly in order; a failed flatten close stops
    /// the sequence and its reply is returned.
    pub async fn execute(&self, alert: &RawAlert) -> Result<ExecutionReport, GatewayError> {
        // 1. Validate
        let intent = self.translator.translate_raw(alert)?;
        tracing::info!(
            action = %intent.action(),
            instrument = %intent.instrument(),
            sizing = ?intent.sizing(),
            "Alert accepted"
        );

        // 2. Look up only what the mapping needs
        let account = self.lookup_account(&intent).await?;

        // 3. Map
        let requests = self.mapper.map(&intent, &account)?;

        // 4. Dispatch
        self.dispatch(&requests).await
    }

    async fn lookup_account(&self, intent: &OrderIntent) -> Result<AccountSnapshot, BrokerError> {
        let needs = self.mapper.requirements(intent);
        let instrument = intent.instrument();
        let mut account = AccountSnapshot::empty();

        if needs.position {
            account.position = Some(self.broker.get_position(instrument).await?);
        }
        if needs.equity {
            account.equity = Some(self.broker.get_equity().await?);
        }
        if needs.mid_price {
            account.mid_price = Some(self.broker.get_mid_price(instrument).await?);
        }

        tracing::debug!(?account, "Account lookups complete");
        Ok(account)
    }

    async fn dispatch(&self, requests: &[BrokerRequest]) -> Result<ExecutionReport, GatewayError> {
        let Some((last, preceding)) = requests.split_last() else {
            return Err(MappingError::UnknownAction("no broker requests produced".to_string()).into());
        };

        let mut flattened = None;
        for request in preceding {
            let reply = self.broker.send(request).await?;
            let side = match request {
                BrokerRequest::ClosePosition(close) => Some(close.side()),
                BrokerRequest::PlaceOrder(_) => None,
            };

            if !reply.is_success() {
                tracing::warn!(
                    kind = request.kind(),
                    instrument = %request.instrument(),
                    status = reply.status,
                    "Flatten failed, order not sent"
                );
                return Ok(ExecutionReport {
                    reply,
                    flattened: None,
                    order_aborted: true,
                });
            }

            tracing::info!(
                instrument = %request.instrument(),
                side = side.map(|s| s.as_str()),
                "Opposing position flattened"
            );
            flattened = side;
        }

        let reply = self.broker.send(last).await?;
        tracing::info!(
            kind = last.kind(),
            instrument = %last.instrument(),
            status = reply.status,
            "Broker request completed"
        );

        Ok(ExecutionReport {
            reply,
            flattened,
            order_aborted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TransportKind;
    use crate::domain::order_mapping::{
        ClosePositionRequest, MapperPolicy, PositionSnapshot, SignedOrder,
    };
    use crate::domain::shared::Instrument;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Mutex;

    // Mock broker recording every call in order
    struct MockBroker {
        position: PositionSnapshot,
        close_status: u16,
        order_result: Result<u16, TransportKind>,
        calls: Mutex<Vec<String>>,
    }

    impl MockBroker {
        fn new() -> Self {
            Self {
                position: PositionSnapshot::FLAT,
                close_status: 200,
                order_result: Ok(201),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BrokerPort for MockBroker {
        async fn place_order(&self, order: &SignedOrder) -> Result<BrokerReply, BrokerError> {
            self.record(format!(
                "order {} {} {}",
                order.instrument, order.signed_units, order.position_fill
            ));
            match self.order_result {
                Ok(status) => Ok(BrokerReply::new(status, r#"{"orderFillTransaction":{}}"#)),
                Err(kind) => Err(BrokerError::transport(kind, "mock failure")),
            }
        }

        async fn close_position(
            &self,
            request: &ClosePositionRequest,
        ) -> Result<BrokerReply, BrokerError> {
            self.record(format!(
                "close {} {}",
                request.instrument,
                request.side().as_str()
            ));
            Ok(BrokerReply::new(self.close_status, r#"{"relatedTransactionIDs":[]}"#))
        }

        async fn get_position(
            &self,
            instrument: &Instrument,
        ) -> Result<PositionSnapshot, BrokerError> {
            self.record(format!("position {instrument}"));
            Ok(self.position)
        }

        async fn get_equity(&self) -> Result<Decimal, BrokerError> {
            self.record("equity");
            Ok(dec!(10000))
        }

        async fn get_mid_price(&self, instrument: &Instrument) -> Result<Decimal, BrokerError> {
            self.record(format!("price {instrument}"));
            Ok(dec!(1.10))
        }
    }

    fn use_case(broker: &Arc<MockBroker>) -> ExecuteAlertUseCase<MockBroker> {
        ExecuteAlertUseCase::new(
            Arc::clone(broker),
            AlertTranslator::default(),
            OrderMapper::new(MapperPolicy::default()),
        )
    }

    fn alert(value: serde_json::Value) -> RawAlert {
        AlertTranslator::parse_value(value).unwrap()
    }

    #[tokio::test]
    async fn buy_checks_position_then_orders() {
        let broker = Arc::new(MockBroker::new());

        let report = use_case(&broker)
            .execute(&alert(json!({"action": "buy", "instrument": "EUR_USD", "units": 100})))
            .await
            .unwrap();

        assert_eq!(report.reply.status, 201);
        assert_eq!(report.flattened, None);
        assert!(!report.order_aborted);
        assert_eq!(
            broker.calls(),
            vec!["position EUR_USD", "order EUR_USD 100 DEFAULT"]
        );
    }

    #[tokio::test]
    async fn close_skips_lookups() {
        let broker = Arc::new(MockBroker::new());

        use_case(&broker)
            .execute(&alert(json!({"action": "close_all", "symbol": "EURUSD"})))
            .await
            .unwrap();

        assert_eq!(broker.calls(), vec!["close EUR_USD both"]);
    }

    #[tokio::test]
    async fn flip_flattens_before_order() {
        let broker = Arc::new(MockBroker {
            position: PositionSnapshot {
                long_units: Decimal::ZERO,
                short_units: dec!(-500),
            },
            ..MockBroker::new()
        });

        let report = use_case(&broker)
            .execute(&alert(json!({"action": "buy", "instrument": "EUR_USD", "units": 100})))
            .await
            .unwrap();

        assert_eq!(report.flattened, Some(PositionSide::Short));
        assert_eq!(
            broker.calls(),
            vec![
                "position EUR_USD",
                "close EUR_USD short",
                "order EUR_USD 100 DEFAULT"
            ]
        );
    }

    #[tokio::test]
    async fn failed_flatten_aborts_order() {
        let broker = Arc::new(MockBroker {
            position: PositionSnapshot {
                long_units: dec!(500),
                short_units: Decimal::ZERO,
            },
            close_status: 400,
            ..MockBroker::new()
        });

        let report = use_case(&broker)
            .execute(&alert(json!({"action": "sell", "instrument": "EUR_USD", "units": 100})))
            .await
            .unwrap();

        assert!(report.order_aborted);
        assert_eq!(report.reply.status, 400);
        assert_eq!(
            broker.calls(),
            vec!["position EUR_USD", "close EUR_USD long"]
        );
    }

    #[tokio::test]
    async fn risk_sizing_looks_up_equity_and_price() {
        let broker = Arc::new(MockBroker::new());

        use_case(&broker)
            .execute(&alert(
                json!({"action": "sell", "instrument": "EUR_USD", "risk_pct": "0.02"}),
            ))
            .await
            .unwrap();

        assert_eq!(
            broker.calls(),
            vec![
                "position EUR_USD",
                "equity",
                "price EUR_USD",
                "order EUR_USD -181 DEFAULT"
            ]
        );
    }

    #[tokio::test]
    async fn invalid_alert_makes_no_calls() {
        let broker = Arc::new(MockBroker::new());

        let err = use_case(&broker)
            .execute(&alert(json!({"action": "hold", "instrument": "EUR_USD"})))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(broker.calls().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        let broker = Arc::new(MockBroker {
            order_result: Err(TransportKind::Timeout),
            ..MockBroker::new()
        });

        let err = use_case(&broker)
            .execute(&alert(
                json!({"action": "close_buy", "instrument": "EUR_USD", "units": 25}),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Broker(BrokerError::Transport {
                kind: TransportKind::Timeout,
                ..
            })
        ));
        assert_eq!(broker.calls(), vec!["order EUR_USD -25 REDUCE_ONLY"]);
    }
}
