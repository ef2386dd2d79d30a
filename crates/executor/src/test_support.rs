use std::time::Duration;

use async_trait::async_trait;
use common::models::{
    AccountSnapshot, EntryOrderType, MarginType, OrderPlan, Position, SymbolFilters,
};
use common::{BridgeResult, Config};
use exchange::{FuturesExchange, RequestClock};
use mockall::mock;
use rust_decimal::Decimal;
use serde_json::{Value, json};

pub const PASSWORD: &str = "hunter2";

mock! {
    pub Exchange {}

    #[async_trait]
    impl FuturesExchange for Exchange {
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
        async fn place_batch_orders(
            &self,
            clock: &RequestClock,
            plan: &OrderPlan,
        ) -> BridgeResult<Value>;
    }
}

/// Every exchange call must happen zero times.
pub fn forbid_all_calls(mock: &mut MockExchange) {
    mock.expect_server_time().never();
    mock.expect_symbol_filters().never();
    mock.expect_account().never();
    mock.expect_set_margin_type().never();
    mock.expect_set_leverage().never();
    mock.expect_cancel_open_orders().never();
    mock.expect_place_batch_orders().never();
}

pub fn test_config() -> Config {
    Config {
        webhook_password: PASSWORD.to_string(),
        api_key: "test-key".to_string(),
        secret_key: "test-secret".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        port: 0,
        http_timeout: Duration::from_secs(1),
        recv_window: 5000,
        manage_margin: true,
        cancel_open_orders: true,
        entry_order_type: EntryOrderType::Market,
    }
}

/// Alert for BTC at 100 with take-profit 110, stop 95, 10x, half a slot of 5.
pub fn webhook_body(side: &str, password: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "PASSWORD": password,
        "TICKER": "BTC_USDTPERP",
        "SIDE": side,
        "ORDER_PRICE": 100,
        "LIMIT_PRICE": 110,
        "STOP_PRICE": 95,
        "LEVER": 10,
        "ORDER_PERC": 0.5,
        "TOTAL_ORDER": 5,
        "ORDER_TIME": 1_700_000_000_000_i64,
    }))
    .unwrap()
}

pub fn btc_filters() -> SymbolFilters {
    SymbolFilters {
        symbol: "BTCUSDT".to_string(),
        tick_size: "0.1".parse().unwrap(),
        step_size: "0.01".parse().unwrap(),
        min_qty: "0.01".parse().unwrap(),
    }
}

/// 1000 USDT free, `open` positions on other symbols, and a flat BTCUSDT entry
/// with the given margin mode and leverage.
pub fn account(open: u32, btc_isolated: bool, btc_leverage: u32) -> AccountSnapshot {
    let mut positions: Vec<Position> = (0..open)
        .map(|i| Position {
            symbol: format!("ALT{i}USDT"),
            initial_margin: Decimal::from(10),
            leverage: 5,
            isolated: false,
        })
        .collect();
    positions.push(Position {
        symbol: "BTCUSDT".to_string(),
        initial_margin: Decimal::ZERO,
        leverage: btc_leverage,
        isolated: btc_isolated,
    });

    AccountSnapshot {
        available_margin: Decimal::from(1000),
        positions,
    }
}
