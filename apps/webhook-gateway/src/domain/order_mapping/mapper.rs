//! Order Mapper (Domain Service)
//!
//! Applies the action table to an [`OrderIntent`]:
//!
//! | action | units | request | position fill |
//! |--------|-------|---------|---------------|
//! | buy | n | order `+n` | DEFAULT |
//! | sell | n | order `-n` | DEFAULT |
//! | close_buy | n | order `-n` | REDUCE_ONLY |
//! | close_buy | none | close long ALL | - |
//! | close_sell | n | order `+n` | REDUCE_ONLY |
//! | close_sell | none | close short ALL | - |
//! | close_all | - | close long + short ALL | - |
//!
//! With flip protection enabled, a `buy` against an open short (or a `sell`
//! against an open long) is preceded by a close of the opposing side.

use super::account::{AccountContext, AccountRequirements};
use super::errors::MappingError;
use super::requests::{
    BrokerRequest, ClosePositionRequest, PositionFill, PositionSide, SignedOrder, TimeInForce,
};
use super::sizing::risk_units;
use crate::domain::alert::{AlertAction, OrderIntent, SizingMode};
use crate::domain::shared::{Instrument, Units};

/// Mapper behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperPolicy {
    /// Close an opposing position before a new entry.
    pub flatten_on_flip: bool,
    /// Time in force for market orders.
    pub time_in_force: TimeInForce,
}

impl Default for MapperPolicy {
    fn default() -> Self {
        Self {
            flatten_on_flip: true,
            time_in_force: TimeInForce::Fok,
        }
    }
}

/// Maps order intents to broker requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderMapper {
    policy: MapperPolicy,
}

impl OrderMapper {
    /// Create a mapper.
    #[must_use]
    pub const fn new(policy: MapperPolicy) -> Self {
        Self { policy }
    }

    /// Mapper policy.
    #[must_use]
    pub const fn policy(&self) -> MapperPolicy {
        self.policy
    }

    /// Account lookups [`Self::map`] will consult for this intent.
    #[must_use]
    pub fn requirements(&self, intent: &OrderIntent) -> AccountRequirements {
        let sized = matches!(intent.sizing(), SizingMode::RiskPercent(_));
        AccountRequirements {
            position: self.policy.flatten_on_flip && intent.action().is_entry(),
            equity: sized,
            mid_price: sized,
        }
    }

    /// Build the ordered broker requests for an intent.
    ///
    /// When two requests are returned the first is a close that must be
    /// issued (and succeed) before the second.
    pub fn map(
        &self,
        intent: &OrderIntent,
        account: &impl AccountContext,
    ) -> Result<Vec<BrokerRequest>, MappingError> {
        let instrument = intent.instrument();

        match (intent.action(), intent.sizing()) {
            (AlertAction::CloseAll, _) => Ok(vec![close(instrument, PositionSide::Both)]),
            (AlertAction::CloseBuy, SizingMode::CloseAll) => {
                Ok(vec![close(instrument, PositionSide::Long)])
            }
            (AlertAction::CloseSell, SizingMode::CloseAll) => {
                Ok(vec![close(instrument, PositionSide::Short)])
            }
            (AlertAction::CloseBuy, SizingMode::Explicit(units)) => {
                Ok(vec![self.order(instrument, units, true, PositionFill::ReduceOnly)])
            }
            (AlertAction::CloseSell, SizingMode::Explicit(units)) => {
                Ok(vec![self.order(instrument, units, false, PositionFill::ReduceOnly)])
            }
            (action @ (AlertAction::Buy | AlertAction::Sell), sizing) => {
                let units = resolve_units(action, sizing, instrument, account)?;
                let selling = action == AlertAction::Sell;

                let mut requests = Vec::with_capacity(2);
                if self.policy.flatten_on_flip {
                    let position = account
                        .current_position(instrument)
                        .ok_or(MappingError::MissingAccountData("position"))?;
                    if selling && position.has_long() {
                        requests.push(close(instrument, PositionSide::Long));
                    } else if !selling && position.has_short() {
                        requests.push(close(instrument, PositionSide::Short));
                    }
                }
                requests.push(self.order(instrument, units, selling, PositionFill::Default));
                Ok(requests)
            }
            (action, sizing) => Err(MappingError::UnknownAction(format!(
                "{action} with {sizing:?}"
            ))),
        }
    }

    fn order(
        &self,
        instrument: &Instrument,
        units: Units,
        negative: bool,
        position_fill: PositionFill,
    ) -> BrokerRequest {
        BrokerRequest::PlaceOrder(SignedOrder {
            instrument: instrument.clone(),
            signed_units: units.signed(negative),
            position_fill,
            time_in_force: self.policy.time_in_force,
        })
    }
}

fn close(instrument: &Instrument, side: PositionSide) -> BrokerRequest {
    BrokerRequest::ClosePosition(ClosePositionRequest::new(instrument.clone(), side))
}

fn resolve_units(
    action: AlertAction,
    sizing: SizingMode,
    instrument: &Instrument,
    account: &impl AccountContext,
) -> Result<Units, MappingError> {
    match sizing {
        SizingMode::Explicit(units) => Ok(units),
        SizingMode::RiskPercent(fraction) => {
            let equity = account
                .equity()
                .ok_or(MappingError::MissingAccountData("equity"))?;
            let mid = account
                .mid_price(instrument)
                .ok_or(MappingError::MissingAccountData("mid_price"))?;
            risk_units(equity, fraction, mid)
        }
        SizingMode::CloseAll => Err(MappingError::UnknownAction(format!(
            "{action} without a size"
        ))),
    }
}
