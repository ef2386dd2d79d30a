use std::sync::Arc;

use common::models::{AccountSnapshot, EntryOrderType, MarginType, Side, Signal};
use common::{BridgeError, BridgeResult, Config};
use exchange::{FuturesExchange, RequestClock};
use serde_json::Value;
use sizing::{BracketPrices, SizingInput, build_plan, size_order};
use tracing::{debug, info, warn};

/// Turns one authenticated alert into one bracket batch on the exchange.
///
/// Steps run strictly in order and the first failure is returned as is:
/// nothing is retried and nothing already sent is rolled back. Submitting the
/// same alert twice places two independent batches.
pub struct ExecutionService {
    exchange: Arc<dyn FuturesExchange>,
    webhook_password: String,
    manage_margin: bool,
    cancel_open_orders: bool,
    entry_order_type: EntryOrderType,
}

impl ExecutionService {
    pub fn new(exchange: Arc<dyn FuturesExchange>, config: &Config) -> Self {
        Self {
            exchange,
            webhook_password: config.webhook_password.clone(),
            manage_margin: config.manage_margin,
            cancel_open_orders: config.cancel_open_orders,
            entry_order_type: config.entry_order_type,
        }
    }

    pub async fn handle_webhook(&self, body: &[u8]) -> BridgeResult<Value> {
        let signal = Signal::parse(body, &self.webhook_password)?;
        info!(
            "RECEIVED SIGNAL: {} {} @ {} (tp {}, sl {}, x{}, {} of {} slots, sent {:?})",
            signal.side,
            signal.symbol,
            signal.order_price,
            signal.limit_price,
            signal.stop_price,
            signal.leverage,
            signal.order_percent,
            signal.total_slots,
            signal.timestamp
        );
        self.execute(&signal).await
    }

    pub async fn execute(&self, signal: &Signal) -> BridgeResult<Value> {
        let clock = RequestClock::anchored(self.exchange.server_time().await?);

        if signal.side == Side::Close {
            // Resting exits are still cleared; only the new bracket is refused.
            let account = self.exchange.account(&clock).await?;
            self.prepare_symbol(&clock, signal, &account).await?;
            warn!("CLOSE signal for {} rejected after clearing orders", signal.symbol);
            return Err(BridgeError::InvalidSide(signal.side.to_string()));
        }

        let filters = self.exchange.symbol_filters(&signal.symbol).await?;
        let prices = BracketPrices::rounded(signal, &filters);

        let account = self.exchange.account(&clock).await?;
        let quantity = size_order(
            &SizingInput {
                available_margin: account.available_margin,
                open_positions: account.open_positions(),
                total_slots: signal.total_slots,
                order_percent: signal.order_percent,
                leverage: signal.leverage,
                entry_price: prices.entry,
            },
            &filters,
        )?;

        self.prepare_symbol(&clock, signal, &account).await?;

        let plan = build_plan(signal, quantity, &prices, self.entry_order_type)?;
        let response = self.exchange.place_batch_orders(&clock, &plan).await?;
        info!(
            "ORDER BATCH SUBMITTED: {} {} x{}: {}",
            signal.side, signal.symbol, quantity, response
        );
        Ok(response)
    }

    /// Margin/leverage and open-order cleanup, each behind its own toggle.
    async fn prepare_symbol(
        &self,
        clock: &RequestClock,
        signal: &Signal,
        account: &AccountSnapshot,
    ) -> BridgeResult<()> {
        if self.manage_margin {
            self.configure_position(clock, signal, account).await?;
        }
        if self.cancel_open_orders {
            self.exchange
                .cancel_open_orders(clock, &signal.symbol)
                .await?;
        }
        Ok(())
    }

    /// Switches the symbol to cross margin and the requested leverage when
    /// the account says otherwise. A symbol the account does not list yet
    /// only gets its leverage set.
    async fn configure_position(
        &self,
        clock: &RequestClock,
        signal: &Signal,
        account: &AccountSnapshot,
    ) -> BridgeResult<()> {
        let position = account.position(&signal.symbol);

        if position.is_some_and(|p| p.isolated) {
            self.exchange
                .set_margin_type(clock, &signal.symbol, MarginType::Crossed)
                .await?;
        } else {
            debug!("Margin type for {}: nothing to change", signal.symbol);
        }

        if position.is_none_or(|p| p.leverage != signal.leverage) {
            self.exchange
                .set_leverage(clock, &signal.symbol, signal.leverage)
                .await?;
        } else {
            debug!("Leverage for {}: nothing to change", signal.symbol);
        }
        Ok(())
    }
}
