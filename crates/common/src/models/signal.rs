use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
    Close,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Close => "CLOSE",
        }
    }

    /// Side of the take-profit and stop legs. `Close` has none.
    pub fn opposite(&self) -> Option<Side> {
        match self {
            Self::Buy => Some(Self::Sell),
            Self::Sell => Some(Self::Buy),
            Self::Close => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "CLOSE" => Ok(Self::Close),
            other => Err(BridgeError::Validation(format!("unknown SIDE {other}"))),
        }
    }
}

/// Alert payload exactly as the charting platform posts it. Every field is
/// optional here so that a missing one becomes a named validation error.
/// Numbers stay as raw JSON values until `decimal` reads their exact text.
#[derive(Debug, Default, Deserialize)]
struct RawSignal {
    #[serde(rename = "TICKER")]
    ticker: Option<String>,
    #[serde(rename = "SIDE")]
    side: Option<String>,
    #[serde(rename = "ORDER_PRICE")]
    order_price: Option<Value>,
    #[serde(rename = "LIMIT_PRICE")]
    limit_price: Option<Value>,
    #[serde(rename = "STOP_PRICE")]
    stop_price: Option<Value>,
    #[serde(rename = "LEVER")]
    leverage: Option<Value>,
    #[serde(rename = "ORDER_PERC")]
    order_percent: Option<Value>,
    #[serde(rename = "TOTAL_ORDER")]
    total_slots: Option<Value>,
    #[serde(rename = "ORDER_TIME")]
    order_time: Option<Value>,
}

/// A validated trading alert. Built once per webhook call and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub side: Side,
    pub order_price: Decimal,
    /// Take-profit price.
    pub limit_price: Decimal,
    pub stop_price: Decimal,
    pub leverage: u32,
    pub order_percent: Decimal,
    pub total_slots: u32,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Signal {
    /// Authenticates and validates a webhook body.
    ///
    /// The shared secret is checked before anything else is looked at, so a
    /// caller without the password only ever learns that it was wrong.
    pub fn parse(body: &[u8], expected_password: &str) -> BridgeResult<Self> {
        let mut payload: Value = serde_json::from_slice(body)
            .map_err(|e| BridgeError::Validation(format!("body is not valid JSON: {e}")))?;

        let password = match payload.as_object_mut() {
            Some(map) => map.remove("PASSWORD"),
            None => {
                return Err(BridgeError::Validation(
                    "body must be a JSON object".to_string(),
                ));
            }
        };
        verify_password(password, expected_password)?;

        let raw: RawSignal = serde_json::from_value(payload)
            .map_err(|e| BridgeError::Validation(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSignal) -> BridgeResult<Self> {
        let ticker = required(raw.ticker, "TICKER")?;
        let symbol = normalize_ticker(&ticker)
            .ok_or_else(|| BridgeError::Validation(format!("unrecognised TICKER {ticker}")))?;

        Ok(Self {
            symbol,
            side: required(raw.side, "SIDE")?.parse()?,
            order_price: positive(decimal(raw.order_price, "ORDER_PRICE")?, "ORDER_PRICE")?,
            limit_price: positive(decimal(raw.limit_price, "LIMIT_PRICE")?, "LIMIT_PRICE")?,
            stop_price: positive(decimal(raw.stop_price, "STOP_PRICE")?, "STOP_PRICE")?,
            leverage: whole(decimal(raw.leverage, "LEVER")?, "LEVER")?,
            order_percent: positive(decimal(raw.order_percent, "ORDER_PERC")?, "ORDER_PERC")?,
            total_slots: whole(decimal(raw.total_slots, "TOTAL_ORDER")?, "TOTAL_ORDER")?,
            timestamp: raw.order_time.as_ref().and_then(parse_order_time),
        })
    }
}

fn verify_password(supplied: Option<Value>, expected: &str) -> BridgeResult<()> {
    let supplied = match supplied {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Null) | Some(Value::String(_)) | None => {
            return Err(BridgeError::Auth("Password Empty".to_string()));
        }
        Some(other) => other.to_string(),
    };

    if supplied == expected {
        Ok(())
    } else {
        Err(BridgeError::Auth("Nice try".to_string()))
    }
}

fn required<T>(value: Option<T>, field: &str) -> BridgeResult<T> {
    value.ok_or_else(|| BridgeError::Validation(format!("missing field {field}")))
}

/// Reads a JSON number or numeric string into a `Decimal` from its literal
/// text, so no digit ever passes through `f64`.
fn decimal(value: Option<Value>, field: &str) -> BridgeResult<Decimal> {
    let text = match required(value, field)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(BridgeError::Validation(format!(
                "{field} must be a number, got {other}"
            )));
        }
    };
    Decimal::from_str_exact(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| BridgeError::Validation(format!("{field} is not a decimal: {text}")))
}

fn positive(value: Decimal, field: &str) -> BridgeResult<Decimal> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(BridgeError::Validation(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

fn whole(value: Decimal, field: &str) -> BridgeResult<u32> {
    let value = positive(value, field)?;
    if !value.fract().is_zero() {
        return Err(BridgeError::Validation(format!(
            "{field} must be a whole number, got {value}"
        )));
    }
    value
        .to_u32()
        .ok_or_else(|| BridgeError::Validation(format!("{field} is out of range: {value}")))
}

/// `ORDER_TIME` arrives either as epoch milliseconds or as an RFC 3339
/// string, depending on the alert template. Anything else is ignored.
fn parse_order_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => match s.parse::<i64>() {
            Ok(ms) => Utc.timestamp_millis_opt(ms).single(),
            Err(_) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        },
        _ => None,
    }
}

/// Pulls a USDT-margined symbol out of a free-form ticker.
///
/// Looks for the leftmost run of two or more uppercase letters followed by an
/// optional `_` and `USDT` (a trailing `PERP` is ignored), preferring the
/// longest run at that position: `BTC_USDTPERP` and `BINANCE:BTCUSDT.P` both
/// give `BTCUSDT`.
pub fn normalize_ticker(ticker: &str) -> Option<String> {
    let bytes = ticker.as_bytes();

    for start in 0..bytes.len() {
        let run = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_uppercase())
            .count();

        for len in (2..=run).rev() {
            let rest = &bytes[start + len..];
            let rest = rest.strip_prefix(b"_").unwrap_or(rest);
            if rest.starts_with(b"USDT") {
                return Some(format!("{}USDT", &ticker[start..start + len]));
            }
        }
    }
    None
}
