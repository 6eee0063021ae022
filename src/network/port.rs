use serde::Serialize;

use crate::network::{ModelError, PoeConfig, Vlan};

/// A switch port and everything the aggregation attached to it.
///
/// The VLAN list is ordered by first attachment and owns value copies of the
/// catalog definitions. `mode` and `trunk` are either unset or non-empty;
/// an empty string is never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    name: String,
    enabled: bool,
    mode: Option<String>,
    trunk: Option<String>,
    poe: Option<PoeConfig>,
    vlans: Vec<Vlan>,
}

impl Port {
    pub fn new(
        name: &str,
        enabled: bool,
        mode: Option<&str>,
        trunk: Option<&str>,
    ) -> Result<Self, ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyField("port name"));
        }
        let mut port = Port {
            name: name.to_string(),
            enabled,
            mode: None,
            trunk: None,
            poe: None,
            vlans: Vec::new(),
        };
        if let Some(mode) = mode {
            port.set_mode(mode)?;
        }
        if let Some(trunk) = trunk {
            port.set_trunk(trunk)?;
        }
        Ok(port)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the operating mode is known. Unknown is expressed as unset,
    /// never as an empty string.
    pub fn has_known_mode(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<(), ModelError> {
        let mode = mode.trim();
        if mode.is_empty() {
            return Err(ModelError::EmptyField("port mode"));
        }
        self.mode = Some(mode.to_string());
        Ok(())
    }

    pub fn is_in_trunk(&self) -> bool {
        self.trunk.is_some()
    }

    pub fn trunk(&self) -> Option<&str> {
        self.trunk.as_deref()
    }

    pub fn set_trunk(&mut self, trunk: &str) -> Result<(), ModelError> {
        let trunk = trunk.trim();
        if trunk.is_empty() {
            return Err(ModelError::EmptyField("trunk name"));
        }
        self.trunk = Some(trunk.to_string());
        Ok(())
    }

    pub fn poe(&self) -> Option<&PoeConfig> {
        self.poe.as_ref()
    }

    /// Attaches a PoE config. The config is cloned so two ports never share
    /// one instance.
    pub fn set_poe(&mut self, poe: &PoeConfig) {
        self.poe = Some(poe.clone());
    }

    pub fn vlans(&self) -> &[Vlan] {
        &self.vlans
    }

    pub fn vlan(&self, id: i32) -> Option<&Vlan> {
        self.vlans.iter().find(|vlan| vlan.id() == id)
    }

    pub fn vlan_mut(&mut self, id: i32) -> Option<&mut Vlan> {
        self.vlans.iter_mut().find(|vlan| vlan.id() == id)
    }

    /// Attaches a deep copy of a VLAN definition. Attaching an id that is
    /// already present keeps the existing copy untouched.
    pub fn attach_vlan(&mut self, vlan: &Vlan) {
        if self.vlan(vlan.id()).is_none() {
            self.vlans.push(vlan.clone());
        }
    }
}
