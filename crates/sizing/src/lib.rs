pub mod bracket;
pub mod calculator;

pub use bracket::{BracketPrices, build_plan};
pub use calculator::{SizingInput, round_to, size_order};
