pub mod account_response;
pub mod binance_client;
pub mod exchange_info_response;
pub mod server_time_response;

pub use account_response::{AccountResponse, PositionResponse};
pub use binance_client::BinanceClient;
pub use exchange_info_response::{ExchangeInfoResponse, FilterEntry, SymbolInfo};
pub use server_time_response::ServerTimeResponse;
