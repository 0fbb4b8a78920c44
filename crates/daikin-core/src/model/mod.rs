// ── Domain model ──
//
// Typed device state and the characteristic values bridge integrations
// read and write.

pub mod characteristic;
pub mod info;
pub mod status;

pub use characteristic::{Active, CurrentHeaterCoolerState, SwingMode, TargetHeaterCoolerState};
pub use info::DeviceInfo;
pub use status::{FanDirection, FanSpeed, Mode, Status};
