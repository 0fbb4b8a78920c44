// ── Status codec ──
//
// Pure translation between the adapter's wire codes and typed `Status`.
// No I/O, no locking. Each enumeration has exactly one code table which is
// read left-to-right for decoding and right-to-left for encoding, so the two
// directions cannot drift apart.

use tracing::debug;

use daikin_api::{ControlInfo, ControlParams, SensorInfo};

use crate::model::{FanDirection, FanSpeed, Mode, Status};

/// An enumeration with a short wire code per known variant.
pub trait WireCode: Copy + PartialEq + Sized + 'static {
    /// `(code, variant)` pairs. Every known variant appears exactly once.
    const TABLE: &'static [(&'static str, Self)];
    /// Sentinel for codes missing from the table.
    const UNKNOWN: Self;

    /// Decode a wire code; unrecognized or absent codes map to `UNKNOWN`.
    fn from_wire(code: Option<&str>) -> Self {
        let Some(code) = code else {
            return Self::UNKNOWN;
        };
        match Self::TABLE.iter().find(|(wire, _)| *wire == code) {
            Some((_, variant)) => *variant,
            None => {
                debug!(code, "unrecognized wire code");
                Self::UNKNOWN
            }
        }
    }

    /// Encode to a wire code; `UNKNOWN` encodes to the empty string.
    fn to_wire(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, variant)| *variant == self)
            .map_or("", |(wire, _)| *wire)
    }
}

impl WireCode for Mode {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("0", Self::Auto),
        ("2", Self::Dry),
        ("3", Self::Cool),
        ("4", Self::Heat),
        ("6", Self::Fan),
    ];
    const UNKNOWN: Self = Self::Unknown;
}

impl WireCode for FanSpeed {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("A", Self::Auto),
        ("B", Self::Night),
        ("3", Self::S1),
        ("4", Self::S2),
        ("5", Self::S3),
        ("6", Self::S4),
        ("7", Self::S5),
    ];
    const UNKNOWN: Self = Self::Unknown;
}

impl WireCode for FanDirection {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("0", Self::Off),
        ("1", Self::Vertical),
        ("2", Self::Horizontal),
        ("3", Self::Both),
    ];
    const UNKNOWN: Self = Self::Unknown;
}

const POWER_ON: &str = "1";
const POWER_OFF: &str = "0";

/// Parse a temperature field; absent or unparseable values read as 0.0.
///
/// Adapters report `--` or `M` in temperature fields that do not apply to
/// the current mode.
fn parse_temperature(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

impl Status {
    /// Apply a validated control/sensor pair and mark the update successful.
    pub fn update(&mut self, control: &ControlInfo, sensor: &SensorInfo) {
        self.fan_speed = FanSpeed::from_wire(control.f_rate.as_deref());
        self.mode = Mode::from_wire(control.mode.as_deref());
        self.fan_direction = FanDirection::from_wire(control.f_dir.as_deref());
        self.power = control.pow.as_deref() == Some(POWER_ON);

        self.heat_target_temperature = parse_temperature(control.dt4.as_deref());
        self.cool_target_temperature = parse_temperature(control.dt3.as_deref());
        self.room_temperature = parse_temperature(sensor.htemp.as_deref());

        self.success_update = true;
    }

    /// Record a failed decode attempt, keeping every previous value.
    pub fn reject_update(&mut self) {
        self.success_update = false;
    }

    /// Encode into `set_control_info` parameters.
    pub fn to_params(&self) -> ControlParams {
        ControlParams {
            f_dir: self.fan_direction.to_wire().into(),
            f_rate: self.fan_speed.to_wire().into(),
            stemp: format!("{:.1}", self.target_temperature()),
            mode: self.mode.to_wire().into(),
            pow: if self.power { POWER_ON } else { POWER_OFF }.into(),
            shum: String::new(),
        }
    }

    /// Encode into the fixed-order `set_control_info` query string.
    pub fn to_query(&self) -> String {
        self.to_params().to_query()
    }
}
