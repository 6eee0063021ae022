use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::network::{
    ConnectedDevice, DataSource, DataSourceKind, MacAddress, MacKey, ModelError, PoeConfig, Port,
    Vlan,
};
use crate::switch::{MacTable, NeighborRecord, NetSwitch, SwitchError, VlanDefinition};

/// A failure of one polling cycle. Any error fails the whole device; there
/// is no partial port list.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error(transparent)]
    Switch(#[from] SwitchError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Every input of one aggregation run, gathered from one switch. The run
/// starts only once all of them are present.
#[derive(Debug)]
pub struct SwitchSnapshot {
    pub vlans: Vec<VlanDefinition>,
    pub lldp: HashMap<String, NeighborRecord>,
    pub cdp: HashMap<String, NeighborRecord>,
    pub poe: HashMap<String, PoeConfig>,
    pub mac_table: MacTable,
    pub interfaces: Vec<Port>,
    pub physical: Vec<String>,
}

/// Reconciles one switch's snapshot with the registered enrichment sources
/// into the normalized per-port topology.
#[derive(Debug, Default)]
pub struct Aggregator {
    mac_sources: Vec<DataSource>,
    ip_sources: Vec<DataSource>,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator::default()
    }

    /// Registers an enrichment source, routed by its kind.
    pub fn add_source(&mut self, source: DataSource) {
        match source.kind() {
            DataSourceKind::Mac => self.mac_sources.push(source),
            DataSourceKind::Ip => self.ip_sources.push(source),
        }
    }

    pub fn reset_sources(&mut self) {
        self.mac_sources.clear();
        self.ip_sources.clear();
    }

    /// Gathers every input from the switch, sequentially: the CLI session
    /// allows no pipelining, and the telemetry fetches come last.
    pub async fn snapshot<S: NetSwitch>(
        &self,
        switch: &mut S,
    ) -> Result<SwitchSnapshot, AggregationError> {
        debug!(
            device = switch.device().hostname(),
            model = switch.model(),
            "gathering switch snapshot"
        );
        Ok(SwitchSnapshot {
            vlans: switch.vlans().await?,
            lldp: switch.lldp_neighbors().await?,
            cdp: switch.cdp_neighbors().await?,
            poe: switch.poe_status().await?,
            mac_table: switch.mac_address_table().await?,
            interfaces: switch.interfaces().await?,
            physical: switch.physical_interfaces().await?,
        })
    }

    /// Assembles the per-port topology from a snapshot.
    ///
    /// Ports are kept in their declaration order; a port defined on the
    /// switch but not physically present is excluded. Each kept port gets
    /// its PoE config, value copies of its VLANs, the learned MAC slots,
    /// the LLDP and CDP observations, then the MAC-keyed and IP-keyed
    /// enrichment passes.
    pub fn aggregate(&self, snapshot: SwitchSnapshot) -> Result<Vec<Port>, AggregationError> {
        let physical: HashSet<&str> = snapshot.physical.iter().map(String::as_str).collect();
        let mut result = Vec::new();

        for mut port in snapshot.interfaces {
            let name = port.name().to_string();
            if !physical.contains(name.as_str()) {
                continue;
            }

            if let Some(config) = snapshot.poe.get(&name) {
                port.set_poe(config);
            }
            for definition in &snapshot.vlans {
                if definition.members.iter().any(|member| member.port == name) {
                    port.attach_vlan(&definition.vlan);
                }
            }
            if let Some(entries) = snapshot.mac_table.get(&name) {
                for entry in entries {
                    match port.vlan_mut(entry.vlan_id) {
                        Some(vlan) => {
                            vlan.devices_mut(MacKey::Known(entry.mac));
                        }
                        None => warn!(
                            port = %name,
                            vlan_id = entry.vlan_id,
                            mac = %entry.mac,
                            "mac learned in a vlan the port is not a member of"
                        ),
                    }
                }
            }
            Self::attach_neighbor(&mut port, snapshot.lldp.get(&name), "LLDP")?;
            Self::attach_neighbor(&mut port, snapshot.cdp.get(&name), "CDP")?;

            let pending = self.enrich_from_mac_sources(&mut port)?;
            self.enrich_from_ip_sources(&mut port, pending)?;

            result.push(port);
        }
        Ok(result)
    }

    /// One full polling cycle: snapshot, then aggregation.
    pub async fn poll<S: NetSwitch>(&self, switch: &mut S) -> Result<Vec<Port>, AggregationError> {
        let snapshot = self.snapshot(switch).await?;
        self.aggregate(snapshot)
    }

    /// Attaches one neighbor observation to a port.
    ///
    /// With exactly one VLAN on the port the observation is attributed to
    /// it; otherwise it goes to the reserved neighbors pseudo-VLAN. A
    /// neighbor without a MAC lands under the sentinel unknown key.
    fn attach_neighbor(
        port: &mut Port,
        record: Option<&NeighborRecord>,
        source: &str,
    ) -> Result<(), AggregationError> {
        let Some(record) = record else {
            return Ok(());
        };
        let vlan_id = if port.vlans().len() == 1 {
            port.vlans()[0].id()
        } else {
            port.attach_vlan(&Vlan::new(Vlan::NEIGHBORS, ""));
            Vlan::NEIGHBORS
        };
        let device = ConnectedDevice::from_parts(
            source,
            record.mac,
            record.ip,
            record.remote_port.as_deref(),
            record.sysname.as_deref(),
            Some(record.time),
        )?;
        if let Some(vlan) = port.vlan_mut(vlan_id) {
            vlan.devices_mut(MacKey::from(record.mac)).push(device);
        }
        Ok(())
    }

    /// MAC-keyed pass: looks every known MAC on the port up in the MAC
    /// sources and appends the matching records. Sources flagged for IP
    /// lookup register their record IPs for the second pass, deduplicated
    /// per (MAC, VLAN, IP).
    fn enrich_from_mac_sources(
        &self,
        port: &mut Port,
    ) -> Result<Vec<(MacAddress, i32, IpAddr)>, AggregationError> {
        let mut pending = Vec::new();
        for index in 0..port.vlans().len() {
            let vlan_id = port.vlans()[index].id();
            let macs: Vec<MacAddress> = port.vlans()[index]
                .macs()
                .keys()
                .filter_map(MacKey::mac)
                .collect();

            for mac in macs {
                for source in &self.mac_sources {
                    let Some(records) = source.lookup_mac(&mac) else {
                        continue;
                    };
                    let mut devices = Vec::with_capacity(records.len());
                    for record in records {
                        if source.need_ip_lookup()
                            && let Some(ip) = record.ip
                        {
                            let key = (mac, vlan_id, ip);
                            if !pending.contains(&key) {
                                pending.push(key);
                            }
                        }
                        devices.push(ConnectedDevice::from_parts(
                            source.name(),
                            Some(mac),
                            record.ip,
                            None,
                            record.sysname.as_deref(),
                            record.time,
                        )?);
                    }
                    if let Some(vlan) = port.vlan_mut(vlan_id) {
                        vlan.devices_mut(MacKey::Known(mac)).extend(devices);
                    }
                }
            }
        }
        Ok(pending)
    }

    /// IP-keyed pass over the IPs registered by the MAC pass. The resulting
    /// observations keep the original MAC and never carry a remote port.
    fn enrich_from_ip_sources(
        &self,
        port: &mut Port,
        pending: Vec<(MacAddress, i32, IpAddr)>,
    ) -> Result<(), AggregationError> {
        for (mac, vlan_id, ip) in pending {
            for source in &self.ip_sources {
                let Some(records) = source.lookup_ip(&ip) else {
                    continue;
                };
                let mut devices = Vec::with_capacity(records.len());
                for record in records {
                    devices.push(ConnectedDevice::from_parts(
                        source.name(),
                        Some(mac),
                        record.ip,
                        None,
                        record.sysname.as_deref(),
                        record.time,
                    )?);
                }
                if let Some(vlan) = port.vlan_mut(vlan_id) {
                    vlan.devices_mut(MacKey::Known(mac)).extend(devices);
                }
            }
        }
        Ok(())
    }
}
