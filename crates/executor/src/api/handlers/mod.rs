pub mod heartbeat;
pub mod webhook;
