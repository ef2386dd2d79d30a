use common::models::{
    EntryOrderType, OrderLeg, OrderPlan, OrderType, PositionSide, Signal, SymbolFilters,
    TimeInForce,
};
use common::{BridgeError, BridgeResult};
use rust_decimal::Decimal;

use crate::calculator::round_to;

/// Signal prices rounded to the instrument's tick precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketPrices {
    pub entry: Decimal,
    pub take_profit: Decimal,
    pub stop: Decimal,
}

impl BracketPrices {
    pub fn rounded(signal: &Signal, filters: &SymbolFilters) -> Self {
        let places = filters.price_precision();
        Self {
            entry: round_to(signal.order_price, places),
            take_profit: round_to(signal.limit_price, places),
            stop: round_to(signal.stop_price, places),
        }
    }
}

/// Entry plus opposite-side take-profit and stop, all for `quantity`.
pub fn build_plan(
    signal: &Signal,
    quantity: Decimal,
    prices: &BracketPrices,
    entry_type: EntryOrderType,
) -> BridgeResult<OrderPlan> {
    let exit_side = signal
        .side
        .opposite()
        .ok_or_else(|| BridgeError::InvalidSide(signal.side.to_string()))?;

    let leg = |side, order_type| OrderLeg {
        symbol: signal.symbol.clone(),
        side,
        position_side: PositionSide::Both,
        order_type,
        quantity,
        price: None,
        stop_price: None,
        reduce_only: false,
        close_position: false,
        time_in_force: None,
        price_protect: false,
    };

    let entry = match entry_type {
        EntryOrderType::Market => leg(signal.side, OrderType::Market),
        EntryOrderType::Limit => OrderLeg {
            price: Some(prices.entry),
            time_in_force: Some(TimeInForce::GoodTillCancel),
            ..leg(signal.side, OrderType::Limit)
        },
    };

    let take_profit = OrderLeg {
        price: Some(prices.take_profit),
        reduce_only: true,
        time_in_force: Some(TimeInForce::GoodTillCancel),
        price_protect: true,
        ..leg(exit_side, OrderType::Limit)
    };

    let stop = OrderLeg {
        stop_price: Some(prices.stop),
        close_position: true,
        time_in_force: Some(TimeInForce::GoodTillCancel),
        price_protect: true,
        ..leg(exit_side, OrderType::StopMarket)
    };

    Ok(OrderPlan {
        entry,
        take_profit,
        stop,
    })
}
