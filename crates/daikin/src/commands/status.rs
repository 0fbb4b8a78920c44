//! `daikin status`: one row per device from the setup refresh.

use serde::Serialize;
use tabled::Tabled;

use daikin_core::{CurrentHeaterCoolerState, DeviceController, Fleet, Status, SwingMode};

use crate::cli::GlobalOpts;
use crate::output;

#[derive(Serialize)]
struct DeviceStatus {
    address: String,
    name: String,
    #[serde(flatten)]
    status: Status,
    target_temperature: f64,
    swing: SwingMode,
    running_state: CurrentHeaterCoolerState,
}

impl From<&DeviceController> for DeviceStatus {
    fn from(device: &DeviceController) -> Self {
        let status = device.status();
        Self {
            address: device.address().to_owned(),
            name: device.info().name,
            target_temperature: status.target_temperature(),
            status,
            swing: device.swing_mode(),
            running_state: device.current_heater_cooler_state(),
        }
    }
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Fan")]
    fan: String,
    #[tabled(rename = "Swing")]
    swing: String,
    #[tabled(rename = "State")]
    state: String,
}

fn row(d: &DeviceStatus) -> StatusRow {
    StatusRow {
        name: d.name.clone(),
        address: d.address.clone(),
        power: if d.status.power { "on" } else { "off" }.into(),
        mode: d.status.mode.to_string(),
        target: output::temperature(d.target_temperature),
        room: output::temperature(d.status.room_temperature),
        fan: d.status.fan_speed.to_string(),
        swing: d.swing.to_string(),
        state: d.running_state.to_string(),
    }
}

pub fn handle(fleet: &Fleet, global: &GlobalOpts) {
    let statuses: Vec<DeviceStatus> = fleet.devices().iter().map(DeviceStatus::from).collect();
    let out = output::render_list(&global.output, &statuses, row, |d| {
        d.address.clone()
    });
    output::print_output(&out, global.quiet);
}
