use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub initial_margin: Decimal,
    pub leverage: u32,
    pub isolated: bool,
}

impl Position {
    /// A position counts as open while it holds any initial margin.
    pub fn is_open(&self) -> bool {
        !self.initial_margin.is_zero()
    }
}

/// Balance and positions as reported by the exchange for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub available_margin: Decimal,
    pub positions: Vec<Position>,
}

impl AccountSnapshot {
    pub fn open_positions(&self) -> u32 {
        self.positions.iter().filter(|p| p.is_open()).count() as u32
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(symbol: &str, margin: &str) -> Position {
        Position {
            symbol: symbol.to_string(),
            initial_margin: margin.parse().unwrap(),
            leverage: 20,
            isolated: false,
        }
    }

    #[test]
    fn only_positions_with_margin_are_open() {
        let account = AccountSnapshot {
            available_margin: Decimal::from(1000),
            positions: vec![
                position("BTCUSDT", "12.5"),
                position("ETHUSDT", "0"),
                position("SOLUSDT", "0.00000000"),
                position("XRPUSDT", "3"),
            ],
        };

        assert_eq!(account.open_positions(), 2);
        assert!(account.position("ETHUSDT").is_some());
        assert!(account.position("DOGEUSDT").is_none());
    }
}
