use rust_decimal::Decimal;

/// Trading rules for one instrument, taken from exchange metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFilters {
    pub symbol: String,
    pub tick_size: Decimal,
    pub step_size: Decimal,
    pub min_qty: Decimal,
}

impl SymbolFilters {
    /// Decimal places allowed in a price (`0.10` -> 1).
    pub fn price_precision(&self) -> u32 {
        decimal_places(self.tick_size)
    }

    /// Decimal places allowed in a quantity (`0.001` -> 3, `1` -> 0).
    pub fn quantity_precision(&self) -> u32 {
        decimal_places(self.step_size)
    }
}

// Rounding goes to this many places, not to a multiple of the increment.
// Exact only while increments are powers of ten, as on USD-M futures.
fn decimal_places(increment: Decimal) -> u32 {
    increment.normalize().scale()
}
