// daikin-api: Async Rust client for the Daikin Wi-Fi adapter key-value API

pub mod client;
pub mod error;
pub mod payload;
pub mod transport;

pub use client::{DaikinClient, Endpoint};
pub use error::Error;
pub use payload::{BasicInfo, ControlInfo, ControlParams, Payload, SUCCESS_MARKER, SensorInfo};
pub use transport::TransportConfig;
