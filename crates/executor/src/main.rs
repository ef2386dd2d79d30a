use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{debug, info};

use common::Config;
use common::logger;
use exchange::BinanceClient;

use crate::api::state::ApiState;
use crate::services::execution_service::ExecutionService;

mod api;
mod services;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = Config::from_env()?;
    debug!("Using {:?}", config);

    let client = BinanceClient::new(&config)?;
    let execution = ExecutionService::new(Arc::new(client), &config);
    let state = Arc::new(ApiState { execution });

    info!("Forwarding alerts to {}", config.base_url);
    api::serve(state, config.port).await
}
