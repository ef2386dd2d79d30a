use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// `{code, message}` body returned to the webhook caller for every failure
/// the bridge produces itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Invalid signal: {0}")]
    Validation(String),
    #[error("Side {0} cannot be used to place orders")]
    InvalidSide(String),
    #[error("No trading slot left: {open} of {total} positions already open")]
    SlotsExhausted { open: u32, total: u32 },
    #[error("Order quantity {quantity} is below the minimum tradable size {min_qty}")]
    InsufficientBalance { quantity: Decimal, min_qty: Decimal },
    /// Non-2xx answer from the exchange; `body` is kept exactly as received.
    #[error("Exchange responded with HTTP {status}: {body}")]
    Exchange { status: u16, body: String },
    #[error("Exchange request failed: {0}")]
    Transport(String),
    #[error("Unexpected exchange response: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth_error",
            Self::Validation(_) => "validation_error",
            Self::InvalidSide(_) => "invalid_side",
            Self::SlotsExhausted { .. } => "slots_exhausted",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::Exchange { .. } => "exchange_error",
            Self::Transport(_) => "transport_error",
            Self::Decode(_) => "decode_error",
            Self::Config(_) => "config_error",
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        }
    }

    /// True for failures caused by the alert itself rather than the exchange.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Auth(_) | Self::Validation(_) | Self::InvalidSide(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_code_and_message() {
        let err = BridgeError::SlotsExhausted { open: 5, total: 5 };
        let payload = err.payload();

        assert_eq!(payload.code, "slots_exhausted");
        assert_eq!(
            payload.message,
            "No trading slot left: 5 of 5 positions already open"
        );
    }

    #[test]
    fn exchange_error_keeps_body_verbatim() {
        let body = r#"{"code":-2019,"msg":"Margin is insufficient."}"#;
        let err = BridgeError::Exchange {
            status: 400,
            body: body.to_string(),
        };

        assert!(err.to_string().ends_with(body));
        assert!(!err.is_rejection());
    }

    #[test]
    fn payload_serializes_as_code_message_object() {
        let payload = BridgeError::Auth("Nice try".into()).payload();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["code"], "auth_error");
        assert_eq!(json["message"], "Authentication failed: Nice try");
    }
}
