pub mod account;
pub mod filters;
pub mod order;
pub mod signal;

pub use account::{AccountSnapshot, Position};
pub use filters::SymbolFilters;
pub use order::{
    EntryOrderType, MarginType, OrderLeg, OrderPlan, OrderType, PositionSide, TimeInForce,
};
pub use signal::{Side, Signal, normalize_ticker};
