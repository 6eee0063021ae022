use std::collections::HashMap;

use serde::Serialize;

use crate::network::{ConnectedDevice, MacKey};

/// A VLAN and the devices observed in it, keyed by MAC address.
///
/// A `Vlan` attached to a `Port` is always a value copy of the definition
/// obtained from the switch's VLAN catalog: `Clone` deep-copies the device
/// lists, so mutating the per-port copy never affects the catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vlan {
    id: i32,
    name: String,
    macs: HashMap<MacKey, Vec<ConnectedDevice>>,
}

impl Vlan {
    /// Reserved id of the synthetic pseudo-VLAN holding neighbor-discovery
    /// data which can not be attributed to a real VLAN.
    pub const NEIGHBORS: i32 = -1;

    pub fn new(id: i32, name: &str) -> Self {
        Vlan {
            id,
            name: name.trim().to_string(),
            macs: HashMap::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn macs(&self) -> &HashMap<MacKey, Vec<ConnectedDevice>> {
        &self.macs
    }

    pub fn devices(&self, mac: &MacKey) -> Option<&[ConnectedDevice]> {
        self.macs.get(mac).map(Vec::as_slice)
    }

    /// Returns the device list for `mac`, creating an empty one if the MAC
    /// was not yet known in this VLAN.
    pub fn devices_mut(&mut self, mac: MacKey) -> &mut Vec<ConnectedDevice> {
        self.macs.entry(mac).or_default()
    }
}
