use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::BridgeError;
use crate::models::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
}

/// How the entry leg of a bracket is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrderType {
    Market,
    Limit,
}

impl FromStr for EntryOrderType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MARKET" => Ok(Self::Market),
            "LIMIT" => Ok(Self::Limit),
            other => Err(BridgeError::Config(format!(
                "entry order type must be MARKET or LIMIT, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    GoodTillCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PositionSide {
    #[serde(rename = "BOTH")]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginType {
    Crossed,
}

impl MarginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crossed => "CROSSED",
        }
    }
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One order of a bracket, serialized the way the batch-order endpoint
/// expects it: every value a string, flags as `"TRUE"`, absent fields omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    pub symbol: String,
    pub side: Side,
    pub position_side: PositionSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(serialize_with = "upper_flag", skip_serializing_if = "is_false")]
    pub reduce_only: bool,
    #[serde(serialize_with = "upper_flag", skip_serializing_if = "is_false")]
    pub close_position: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(serialize_with = "upper_flag", skip_serializing_if = "is_false")]
    pub price_protect: bool,
}

fn upper_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "TRUE" } else { "FALSE" })
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Entry, take-profit and stop legs for one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    pub entry: OrderLeg,
    pub take_profit: OrderLeg,
    pub stop: OrderLeg,
}

impl OrderPlan {
    pub fn legs(&self) -> [&OrderLeg; 3] {
        [&self.entry, &self.take_profit, &self.stop]
    }

    pub fn symbol(&self) -> &str {
        &self.entry.symbol
    }

    pub fn quantity(&self) -> Decimal {
        self.entry.quantity
    }

    /// JSON array for the `batchOrders` parameter.
    pub fn to_batch_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.legs())
    }
}
