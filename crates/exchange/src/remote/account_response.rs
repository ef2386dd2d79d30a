use common::models::{AccountSnapshot, Position};
use common::{BridgeError, BridgeResult};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::traits::RemoteResponse;

#[derive(Deserialize, Debug)]
pub struct AccountResponse {
    #[serde(rename(deserialize = "availableBalance"))]
    pub available_balance: String,
    pub positions: Vec<PositionResponse>,
}

#[derive(Deserialize, Debug)]
pub struct PositionResponse {
    pub symbol: String,
    #[serde(rename(deserialize = "initialMargin"))]
    pub initial_margin: String,
    pub leverage: String,
    pub isolated: bool,
}

impl RemoteResponse<AccountSnapshot> for AccountResponse {
    fn to_model(&self) -> BridgeResult<AccountSnapshot> {
        let positions = self
            .positions
            .iter()
            .map(|p| {
                Ok(Position {
                    symbol: p.symbol.clone(),
                    initial_margin: parse_field(&p.initial_margin, "initialMargin")?,
                    leverage: p.leverage.trim().parse().map_err(|_| {
                        BridgeError::Decode(format!("leverage {} is not an integer", p.leverage))
                    })?,
                    isolated: p.isolated,
                })
            })
            .collect::<BridgeResult<Vec<_>>>()?;

        Ok(AccountSnapshot {
            available_margin: parse_field(&self.available_balance, "availableBalance")?,
            positions,
        })
    }
}

fn parse_field(raw: &str, field: &str) -> BridgeResult<Decimal> {
    raw.trim()
        .parse()
        .map_err(|_| BridgeError::Decode(format!("{field} {raw} is not a decimal")))
}
