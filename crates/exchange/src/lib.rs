pub mod clock;
pub mod remote;
pub mod traits;

pub use clock::RequestClock;
pub use remote::BinanceClient;
pub use traits::FuturesExchange;
