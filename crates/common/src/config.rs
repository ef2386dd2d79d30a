use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{BridgeError, BridgeResult};
use crate::models::EntryOrderType;

const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RECV_WINDOW: u64 = 5000;

/// Process-wide settings, read once at startup and handed to the exchange
/// client and the signal validator.
#[derive(Clone)]
pub struct Config {
    pub webhook_password: String,
    pub api_key: String,
    pub secret_key: String,
    pub base_url: String,
    pub port: u16,
    pub http_timeout: Duration,
    pub recv_window: u64,
    pub manage_margin: bool,
    pub cancel_open_orders: bool,
    pub entry_order_type: EntryOrderType,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("webhook_password", &"***")
            .field("api_key", &mask(&self.api_key))
            .field("secret_key", &"***")
            .field("base_url", &self.base_url)
            .field("port", &self.port)
            .field("http_timeout", &self.http_timeout)
            .field("recv_window", &self.recv_window)
            .field("manage_margin", &self.manage_margin)
            .field("cancel_open_orders", &self.cancel_open_orders)
            .field("entry_order_type", &self.entry_order_type)
            .finish()
    }
}

fn mask(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}

impl Config {
    pub fn from_env() -> BridgeResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> BridgeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| BridgeError::Config(format!("{key} must be set")))
        };

        Ok(Self {
            webhook_password: required("WEBHOOK_PASSWORD")?,
            api_key: required("BINANCE_API_KEY")?,
            secret_key: required("BINANCE_SECRET_KEY")?,
            base_url: lookup("BINANCE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            http_timeout: Duration::from_secs(parse_or(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            recv_window: parse_or(&lookup, "RECV_WINDOW", DEFAULT_RECV_WINDOW)?,
            manage_margin: flag_or(&lookup, "MANAGE_MARGIN", true)?,
            cancel_open_orders: flag_or(&lookup, "CANCEL_OPEN_ORDERS", true)?,
            entry_order_type: parse_or(&lookup, "ENTRY_ORDER_TYPE", EntryOrderType::Market)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> BridgeResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| BridgeError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> BridgeResult<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(BridgeError::Config(format!(
                "{key} must be a boolean, got {raw}"
            ))),
        },
    }
}
