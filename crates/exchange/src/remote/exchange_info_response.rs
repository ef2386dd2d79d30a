use common::models::SymbolFilters;
use common::{BridgeError, BridgeResult};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ExchangeInfoResponse {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Deserialize, Debug)]
pub struct SymbolInfo {
    pub symbol: String,
    pub filters: Vec<FilterEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "filterType")]
pub enum FilterEntry {
    #[serde(rename = "PRICE_FILTER")]
    Price {
        #[serde(rename = "tickSize")]
        tick_size: String,
    },
    #[serde(rename = "LOT_SIZE")]
    LotSize {
        #[serde(rename = "stepSize")]
        step_size: String,
        #[serde(rename = "minQty")]
        min_qty: String,
    },
    #[serde(rename = "MARKET_LOT_SIZE")]
    MarketLotSize {
        #[serde(rename = "stepSize")]
        step_size: String,
        #[serde(rename = "minQty")]
        min_qty: String,
    },
    #[serde(other)]
    Other,
}

impl ExchangeInfoResponse {
    /// Filters for `symbol`. Quantities follow `MARKET_LOT_SIZE`, falling back
    /// to `LOT_SIZE` for instruments that do not publish it.
    pub fn filters_for(&self, symbol: &str) -> BridgeResult<SymbolFilters> {
        let info = self
            .symbols
            .iter()
            .find(|s| s.symbol == symbol)
            .ok_or_else(|| BridgeError::Validation(format!("unknown symbol {symbol}")))?;

        let mut tick_size = None;
        let mut lot = None;
        let mut market_lot = None;

        for filter in &info.filters {
            match filter {
                FilterEntry::Price { tick_size: tick } => tick_size = Some(tick),
                FilterEntry::LotSize { step_size, min_qty } => lot = Some((step_size, min_qty)),
                FilterEntry::MarketLotSize { step_size, min_qty } => {
                    market_lot = Some((step_size, min_qty))
                }
                FilterEntry::Other => {}
            }
        }

        let tick_size = tick_size
            .ok_or_else(|| BridgeError::Decode(format!("{symbol} has no PRICE_FILTER")))?;
        let (step_size, min_qty) = market_lot
            .filter(|(step, _)| is_positive(step))
            .or(lot)
            .ok_or_else(|| BridgeError::Decode(format!("{symbol} has no lot size filter")))?;

        Ok(SymbolFilters {
            symbol: info.symbol.clone(),
            tick_size: parse_increment(tick_size, "tickSize")?,
            step_size: parse_increment(step_size, "stepSize")?,
            min_qty: min_qty
                .parse()
                .map_err(|_| BridgeError::Decode(format!("minQty {min_qty} is not a decimal")))?,
        })
    }
}

fn is_positive(raw: &str) -> bool {
    raw.parse::<Decimal>().is_ok_and(|d| d > Decimal::ZERO)
}

fn parse_increment(raw: &str, field: &str) -> BridgeResult<Decimal> {
    match raw.parse::<Decimal>() {
        Ok(value) if value > Decimal::ZERO => Ok(value),
        _ => Err(BridgeError::Decode(format!(
            "{field} {raw} is not a positive decimal"
        ))),
    }
}
