use async_trait::async_trait;
use common::BridgeResult;
use common::models::{AccountSnapshot, MarginType, OrderPlan, SymbolFilters};
use serde_json::Value;

use crate::clock::RequestClock;

/// Wire representation that converts into a domain model.
pub trait RemoteResponse<T> {
    fn to_model(&self) -> BridgeResult<T>;
}

/// The exchange operations an order request needs.
///
/// Every method is a single HTTP call. Non-2xx answers come back as
/// `BridgeError::Exchange` with the body untouched; nothing is retried.
#[async_trait]
pub trait FuturesExchange: Send + Sync {
    async fn server_time(&self) -> BridgeResult<u64>;

    async fn symbol_filters(&self, symbol: &str) -> BridgeResult<SymbolFilters>;

    async fn account(&self, clock: &RequestClock) -> BridgeResult<AccountSnapshot>;

    async fn set_margin_type(
        &self,
        clock: &RequestClock,
        symbol: &str,
        margin_type: MarginType,
    ) -> BridgeResult<()>;

    async fn set_leverage(
        &self,
        clock: &RequestClock,
        symbol: &str,
        leverage: u32,
    ) -> BridgeResult<()>;

    async fn cancel_open_orders(&self, clock: &RequestClock, symbol: &str) -> BridgeResult<()>;

    /// Submits all legs in one request and returns the raw per-leg result.
    async fn place_batch_orders(
        &self,
        clock: &RequestClock,
        plan: &OrderPlan,
    ) -> BridgeResult<Value>;
}
