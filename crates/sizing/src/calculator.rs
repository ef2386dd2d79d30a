use common::models::SymbolFilters;
use common::{BridgeError, BridgeResult};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Everything the quantity formula reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingInput {
    pub available_margin: Decimal,
    pub open_positions: u32,
    pub total_slots: u32,
    pub order_percent: Decimal,
    pub leverage: u32,
    pub entry_price: Decimal,
}

/// Rounds half-to-even to `places` decimals and pads with zeros, so the
/// string form always carries exactly `places` digits after the point.
pub fn round_to(value: Decimal, places: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(places);
    rounded
}

/// Order quantity for one new position.
///
/// The free margin is split evenly over the slots still available, scaled by
/// the requested fraction and the leverage, and converted to contracts at the
/// entry price:
///
/// `round(margin / (slots - open) * percent * leverage / price, step precision)`
pub fn size_order(input: &SizingInput, filters: &SymbolFilters) -> BridgeResult<Decimal> {
    let free_slots = input.total_slots.saturating_sub(input.open_positions);
    if free_slots < 1 {
        return Err(BridgeError::SlotsExhausted {
            open: input.open_positions,
            total: input.total_slots,
        });
    }
    if input.entry_price <= Decimal::ZERO {
        return Err(BridgeError::Validation(format!(
            "entry price must be positive, got {}",
            input.entry_price
        )));
    }

    let raw = input
        .available_margin
        .checked_div(Decimal::from(free_slots))
        .and_then(|per_slot| per_slot.checked_mul(input.order_percent))
        .and_then(|notional| notional.checked_mul(Decimal::from(input.leverage)))
        .and_then(|notional| notional.checked_div(input.entry_price))
        .ok_or_else(|| BridgeError::Validation("order size overflows".to_string()))?;

    let quantity = round_to(raw, filters.quantity_precision());
    debug!(
        "Sizing {}: margin={} free_slots={} raw={} quantity={}",
        filters.symbol, input.available_margin, free_slots, raw, quantity
    );

    if quantity <= Decimal::ZERO || quantity < filters.min_qty {
        return Err(BridgeError::InsufficientBalance {
            quantity,
            min_qty: filters.min_qty,
        });
    }
    Ok(quantity)
}
