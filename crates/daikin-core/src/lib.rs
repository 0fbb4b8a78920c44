// daikin-core: Device controller and status codec for Daikin Wi-Fi air conditioners

pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod fleet;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::WireCode;
pub use config::DeviceConfig;
pub use controller::{
    DeviceController, DeviceState, MAX_COOLING_TEMPERATURE, MAX_HEATING_TEMPERATURE,
    MAX_ROTATION_SPEED, MIN_COOLING_TEMPERATURE, MIN_HEATING_TEMPERATURE, WriteOutcome, device_id,
};
pub use error::CoreError;
pub use fleet::{Fleet, SetupFailure};
pub use model::{
    Active, CurrentHeaterCoolerState, DeviceInfo, FanDirection, FanSpeed, Mode, Status, SwingMode,
    TargetHeaterCoolerState,
};
