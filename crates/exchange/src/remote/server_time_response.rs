use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ServerTimeResponse {
    #[serde(rename(deserialize = "serverTime"))]
    pub server_time: u64,
}
