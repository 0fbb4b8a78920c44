//! `daikin info`: adapter identity from the setup probe.

use serde::Serialize;
use tabled::Tabled;

use daikin_core::{DeviceController, Fleet};

use crate::cli::GlobalOpts;
use crate::output;

#[derive(Serialize)]
struct DeviceIdentity {
    id: String,
    address: String,
    name: String,
    mac: String,
    kind: Option<String>,
}

impl From<&DeviceController> for DeviceIdentity {
    fn from(device: &DeviceController) -> Self {
        let info = device.info();
        Self {
            id: device.id().to_string(),
            address: device.address().to_owned(),
            name: info.name,
            mac: info.mac,
            kind: info.kind,
        }
    }
}

#[derive(Tabled)]
struct IdentityRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn row(d: &DeviceIdentity) -> IdentityRow {
    IdentityRow {
        name: d.name.clone(),
        address: d.address.clone(),
        mac: d.mac.clone(),
        kind: d.kind.clone().unwrap_or_else(|| "-".into()),
        id: d.id.clone(),
    }
}

pub fn handle(fleet: &Fleet, global: &GlobalOpts) {
    let identities: Vec<DeviceIdentity> =
        fleet.devices().iter().map(DeviceIdentity::from).collect();
    let out = output::render_list(&global.output, &identities, row, |d| d.mac.clone());
    output::print_output(&out, global.quiet);
}
