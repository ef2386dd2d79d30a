use async_trait::async_trait;
use common::models::{AccountSnapshot, MarginType, OrderPlan, SymbolFilters};
use common::{BridgeError, BridgeResult, Config};
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::Sha256;
use tracing::{debug, error, info};
use url::form_urlencoded;

use crate::clock::RequestClock;
use crate::remote::{AccountResponse, ExchangeInfoResponse, ServerTimeResponse};
use crate::traits::{FuturesExchange, RemoteResponse};

type HmacSha256 = Hmac<Sha256>;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Signed REST access to Binance USDⓈ-M futures.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
    recv_window: u64,
}

impl BinanceClient {
    pub fn new(config: &Config) -> BridgeResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("alert-bridge/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| BridgeError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            recv_window: config.recv_window,
        })
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// URL-encodes `params` plus `recvWindow` and `timestamp`, then appends the
    /// signature computed over exactly that encoded string.
    fn signed_payload(&self, clock: &RequestClock, params: &[(&str, String)]) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            serializer.append_pair(key, value);
        }
        serializer.append_pair("recvWindow", &self.recv_window.to_string());
        serializer.append_pair("timestamp", &clock.now_ms().to_string());
        let payload = serializer.finish();

        let signature = self.sign(&payload);
        format!("{payload}&signature={signature}")
    }

    async fn public_get<T: DeserializeOwned>(&self, endpoint: &str) -> BridgeResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", endpoint);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        Self::handle_response(endpoint, resp).await
    }

    async fn signed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        clock: &RequestClock,
        params: &[(&str, String)],
    ) -> BridgeResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let payload = self.signed_payload(clock, params);
        debug!("{} (signed) {}", method, endpoint);

        let request = if method == Method::POST {
            self.client
                .post(&url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(payload)
        } else {
            self.client.request(method, format!("{url}?{payload}"))
        };

        let resp = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        Self::handle_response(endpoint, resp).await
    }

    async fn handle_response<T: DeserializeOwned>(endpoint: &str, resp: Response) -> BridgeResult<T> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| transport_error(endpoint, e))?;

        if !status.is_success() {
            error!("Binance {} failed with {}: {}", endpoint, status, body);
            return Err(BridgeError::Exchange {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse {} response: {} - Body: {}", endpoint, e, body);
            BridgeError::Decode(format!("{endpoint}: {e}"))
        })
    }
}

fn transport_error(endpoint: &str, e: reqwest::Error) -> BridgeError {
    error!("Request to {} failed: {}", endpoint, e);
    BridgeError::Transport(format!("{endpoint}: {e}"))
}

#[async_trait]
impl FuturesExchange for BinanceClient {
    async fn server_time(&self) -> BridgeResult<u64> {
        let resp: ServerTimeResponse = self.public_get("/fapi/v1/time").await?;
        Ok(resp.server_time)
    }

    async fn symbol_filters(&self, symbol: &str) -> BridgeResult<SymbolFilters> {
        let info: ExchangeInfoResponse = self.public_get("/fapi/v1/exchangeInfo").await?;
        info.filters_for(symbol)
    }

    async fn account(&self, clock: &RequestClock) -> BridgeResult<AccountSnapshot> {
        let resp: AccountResponse = self
            .signed_request(Method::GET, "/fapi/v2/account", clock, &[])
            .await?;
        resp.to_model()
    }

    async fn set_margin_type(
        &self,
        clock: &RequestClock,
        symbol: &str,
        margin_type: MarginType,
    ) -> BridgeResult<()> {
        let params = [
            ("symbol", symbol.to_string()),
            ("marginType", margin_type.to_string()),
        ];
        let resp: Value = self
            .signed_request(Method::POST, "/fapi/v1/marginType", clock, &params)
            .await?;
        info!("Margin type for {} set to {}: {}", symbol, margin_type, resp);
        Ok(())
    }

    async fn set_leverage(
        &self,
        clock: &RequestClock,
        symbol: &str,
        leverage: u32,
    ) -> BridgeResult<()> {
        let params = [
            ("symbol", symbol.to_string()),
            ("leverage", leverage.to_string()),
        ];
        let resp: Value = self
            .signed_request(Method::POST, "/fapi/v1/leverage", clock, &params)
            .await?;
        info!("Leverage for {} set to {}: {}", symbol, leverage, resp);
        Ok(())
    }

    async fn cancel_open_orders(&self, clock: &RequestClock, symbol: &str) -> BridgeResult<()> {
        let params = [("symbol", symbol.to_string())];
        let resp: Value = self
            .signed_request(Method::DELETE, "/fapi/v1/allOpenOrders", clock, &params)
            .await?;
        info!("Open orders for {} cancelled: {}", symbol, resp);
        Ok(())
    }

    async fn place_batch_orders(
        &self,
        clock: &RequestClock,
        plan: &OrderPlan,
    ) -> BridgeResult<Value> {
        let batch = plan
            .to_batch_json()
            .map_err(|e| BridgeError::Validation(format!("order plan did not serialize: {e}")))?;

        info!(
            "Placing bracket: {} {} x{}",
            plan.entry.side,
            plan.symbol(),
            plan.quantity()
        );
        self.signed_request(
            Method::POST,
            "/fapi/v1/batchOrders",
            clock,
            &[("batchOrders", batch)],
        )
        .await
    }
}
