/*!
Switch capability interface.

This module defines:
- the typed records produced by the per-command parsers and crossing the
  vendor boundary (`VlanDefinition`, `MacTableEntry`, `NeighborRecord`,
  `ArpObservation`),
- `NetSwitch`: the capability trait one vendor/family implementation
  provides, with `ArpProvider` split off for devices that only contribute
  ARP data,
- `SwitchError`: the error type of every capability call.

Concrete implementations (e.g. the HP family in `hp`) hold model-specific
constants as injected configuration, not as subclass state.
*/

pub mod hp;

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;

use crate::data_aquisition::core::{SessionError, TelemetryError};
use crate::network::{IpDevice, MacAddress, ModelError, PoeConfig, Port, Vlan};

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Membership of one port in a VLAN, as listed by the per-VLAN detail
/// command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanMember {
    pub port: String,
    pub mode: String,
}

/// A VLAN definition from the switch's catalog together with its member
/// ports.
#[derive(Debug, Clone)]
pub struct VlanDefinition {
    pub vlan: Vlan,
    pub members: Vec<VlanMember>,
}

/// One learned MAC under a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacTableEntry {
    pub mac: MacAddress,
    pub vlan_id: i32,
}

/// Learned MAC addresses keyed by the port they were seen on.
pub type MacTable = HashMap<String, Vec<MacTableEntry>>;

/// One neighbor-discovery observation on a local port. Both protocols
/// (CDP, LLDP) fill the same record; which fields are present depends on
/// what the neighbor advertised.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborRecord {
    pub port: String,
    pub ip: Option<IpAddr>,
    pub sysname: Option<String>,
    pub remote_port: Option<String>,
    pub mac: Option<MacAddress>,
    pub time: SystemTime,
}

impl NeighborRecord {
    pub fn new(port: &str, time: SystemTime) -> Self {
        NeighborRecord {
            port: port.to_string(),
            ip: None,
            sysname: None,
            remote_port: None,
            mac: None,
            time,
        }
    }
}

/// One ARP table entry observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ArpObservation {
    pub ip: IpAddr,
    pub port: Option<String>,
    pub sysname: Option<String>,
    pub time: SystemTime,
}

/// An ARP table: MAC to IP to observation.
pub type ArpTable = HashMap<MacAddress, HashMap<IpAddr, ArpObservation>>;

/// An object which can provide an ARP table.
#[async_trait]
pub trait ArpProvider: Send {
    async fn arp_table(&mut self) -> Result<ArpTable, SwitchError>;
}

/// The capability interface of a managed switch. One implementation per
/// vendor/family; every call gathers one kind of data for one device.
#[async_trait]
pub trait NetSwitch: ArpProvider {
    /// The interfaces defined on the switch, in declaration order.
    ///
    /// Interfaces can be defined on the switch without being physically in
    /// the switch; see [`NetSwitch::physical_interfaces`].
    async fn interfaces(&mut self) -> Result<Vec<Port>, SwitchError>;

    /// The VLAN catalog with per-VLAN port membership.
    async fn vlans(&mut self) -> Result<Vec<VlanDefinition>, SwitchError>;

    /// The learned MAC address table keyed by port.
    async fn mac_address_table(&mut self) -> Result<MacTable, SwitchError>;

    /// Power-over-ethernet status keyed by port.
    async fn poe_status(&mut self) -> Result<HashMap<String, PoeConfig>, SwitchError>;

    /// CDP neighbor observations keyed by local port.
    async fn cdp_neighbors(&mut self) -> Result<HashMap<String, NeighborRecord>, SwitchError>;

    /// LLDP neighbor observations keyed by local port.
    async fn lldp_neighbors(&mut self) -> Result<HashMap<String, NeighborRecord>, SwitchError>;

    /// The names of the interfaces physically present in the switch.
    async fn physical_interfaces(&mut self) -> Result<Vec<String>, SwitchError>;

    fn model(&self) -> &str;

    fn device(&self) -> &IpDevice;
}
