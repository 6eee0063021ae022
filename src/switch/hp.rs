use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use snmp2::Version;
use tracing::debug;

use crate::data_aquisition::core::{SessionTransport, TelemetryTransport};
use crate::data_aquisition::session::{RemoteSession, ScanItem, SessionConfig};
use crate::data_aquisition::snmp::SnmpClient;
use crate::data_aquisition::ssh::SshTransport;
use crate::network::{IpDevice, MacAddress, PoeConfig, Port, Vlan};
use crate::parsers::hp as parsers;
use crate::switch::{
    ArpProvider, ArpTable, MacTable, MacTableEntry, NeighborRecord, NetSwitch, SwitchError,
    VlanDefinition, VlanMember,
};

const PORT_OID: &str = "1.3.6.1.2.1.47.1.1.1.1.7";
const ARP_OID: &str = "1.3.6.1.2.1.4.22.1.2";
const PROMPT_PATTERN: &str = "PROC[a-zA-Z0-9-]+[#>]";
const MORE_PATTERN: &str = "-- MORE --";
const BANNER_PATTERN: &str = "continue";
const SSH_PORT: u16 = 22;
const SNMP_PORT: u16 = 161;

/// Model-specific constants of one HP switch family member. Injected at
/// construction; the family defaults cover the ProCurve line and individual
/// patterns can be overridden per deployment.
#[derive(Debug, Clone)]
pub struct HpModel {
    name: String,
    prompt_pattern: String,
    more_pattern: String,
    port_oid: String,
    arp_oid: String,
}

impl HpModel {
    fn family(name: &str) -> Self {
        HpModel {
            name: name.to_string(),
            prompt_pattern: PROMPT_PATTERN.to_string(),
            more_pattern: MORE_PATTERN.to_string(),
            port_oid: PORT_OID.to_string(),
            arp_oid: ARP_OID.to_string(),
        }
    }

    pub fn hp_3800() -> Self {
        HpModel::family("HP 3800")
    }

    pub fn hp_e5406zl() -> Self {
        HpModel::family("HP E5406 ZL")
    }

    pub fn with_prompt_pattern(mut self, pattern: &str) -> Self {
        self.prompt_pattern = pattern.to_string();
        self
    }

    pub fn with_more_pattern(mut self, pattern: &str) -> Self {
        self.more_pattern = pattern.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An HP ProCurve switch polled through a CLI session and a telemetry walk.
///
/// CLI commands connect the session lazily and run strictly one at a time;
/// telemetry fetches never touch the CLI session.
pub struct HpSwitch<T: SessionTransport, W: TelemetryTransport> {
    device: IpDevice,
    model: HpModel,
    session: RemoteSession<T>,
    telemetry: W,
}

impl<T: SessionTransport, W: TelemetryTransport> HpSwitch<T, W> {
    pub fn new(
        device: IpDevice,
        model: HpModel,
        transport: T,
        telemetry: W,
        read_timeout: Duration,
    ) -> Result<Self, SwitchError> {
        let config = SessionConfig::new(
            &model.prompt_pattern,
            &model.more_pattern,
            BANNER_PATTERN,
            read_timeout,
        )?;
        Ok(HpSwitch {
            device,
            model,
            session: RemoteSession::new(transport, config),
            telemetry,
        })
    }

    pub async fn close(&mut self) -> Result<(), SwitchError> {
        Ok(self.session.close().await?)
    }
}

impl HpSwitch<SshTransport, SnmpClient> {
    /// Builds a switch over the shipped SSH and SNMP adapters.
    pub fn over_ssh_and_snmp(
        device: IpDevice,
        model: HpModel,
        user: &str,
        password: &str,
        community: &str,
        snmp_version: Version,
        read_timeout: Duration,
    ) -> Result<Self, SwitchError> {
        let transport = SshTransport::new_with_password(
            user.to_string(),
            device.ip().to_string(),
            password.to_string(),
            SSH_PORT,
        )?;
        let telemetry = SnmpClient::new(
            SocketAddr::new(device.ip(), SNMP_PORT),
            community,
            snmp_version,
        )?
        .with_timeout(read_timeout);
        HpSwitch::new(device, model, transport, telemetry, read_timeout)
    }
}

#[async_trait]
impl<T: SessionTransport, W: TelemetryTransport> ArpProvider for HpSwitch<T, W> {
    async fn arp_table(&mut self) -> Result<ArpTable, SwitchError> {
        let entries = self.telemetry.walk(&self.model.arp_oid).await?;
        Ok(parsers::parse_arp_walk(&entries, SystemTime::now()))
    }
}

#[async_trait]
impl<T: SessionTransport, W: TelemetryTransport> NetSwitch for HpSwitch<T, W> {
    async fn interfaces(&mut self) -> Result<Vec<Port>, SwitchError> {
        self.session.connect().await?;
        let scan = self
            .session
            .run_paged_command::<(), Port, _>("show interface config", |line| {
                parsers::parse_interface_line(line).map(ScanItem::Sequential)
            })
            .await?;
        Ok(scan.seq)
    }

    async fn vlans(&mut self) -> Result<Vec<VlanDefinition>, SwitchError> {
        self.session.connect().await?;
        let catalog = self
            .session
            .run_paged_command::<(), Vlan, _>("show vlans", |line| {
                parsers::parse_vlan_line(line).map(ScanItem::Sequential)
            })
            .await?;

        let mut definitions = Vec::with_capacity(catalog.seq.len());
        for vlan in catalog.seq {
            let members = self
                .session
                .run_paged_command::<(), VlanMember, _>(
                    &format!("show vlans {}", vlan.id()),
                    |line| parsers::parse_vlan_member_line(line).map(ScanItem::Sequential),
                )
                .await?;
            definitions.push(VlanDefinition {
                vlan,
                members: members.seq,
            });
        }
        Ok(definitions)
    }

    async fn mac_address_table(&mut self) -> Result<MacTable, SwitchError> {
        self.session.connect().await?;
        let scan = self
            .session
            .run_paged_command::<(), (String, MacTableEntry), _>("show mac-address", |line| {
                parsers::parse_mac_table_line(line).map(ScanItem::Sequential)
            })
            .await?;

        let mut table = MacTable::new();
        for (port, entry) in scan.seq {
            table.entry(port).or_default().push(entry);
        }
        Ok(table)
    }

    async fn poe_status(&mut self) -> Result<HashMap<String, PoeConfig>, SwitchError> {
        self.session.connect().await?;
        let scan = self
            .session
            .run_paged_command("show power-over-ethernet brief", |line| {
                parsers::parse_poe_line(line).map(|(port, config)| ScanItem::Keyed(port, config))
            })
            .await?;
        Ok(scan.keyed)
    }

    async fn cdp_neighbors(&mut self) -> Result<HashMap<String, NeighborRecord>, SwitchError> {
        let time = SystemTime::now();
        self.session.connect().await?;
        let transcript = self
            .session
            .run_paged_command::<(), String, _>("show cdp neighbor detail", |line| {
                Some(ScanItem::Sequential(line.to_string()))
            })
            .await?;
        Ok(parsers::parse_cdp_transcript(&transcript.seq, time))
    }

    async fn lldp_neighbors(&mut self) -> Result<HashMap<String, NeighborRecord>, SwitchError> {
        let time = SystemTime::now();
        self.session.connect().await?;
        let scan = self
            .session
            .run_paged_command("show lldp info remote-device", move |line| {
                parsers::parse_lldp_line(line, time)
                    .map(|(port, record)| ScanItem::Keyed(port, record))
            })
            .await?;
        let mut records = scan.keyed;

        // A neighbor advertising no MAC in the overview often carries one in
        // the PortId property of the per-port detail.
        let missing: Vec<String> = records
            .iter()
            .filter(|(_, record)| record.mac.is_none())
            .map(|(port, _)| port.clone())
            .collect();
        for port in missing {
            let detail = self
                .session
                .run_paged_command::<(), String, _>(
                    &format!("show lldp info remote-device {port}"),
                    |line| parsers::parse_lldp_port_id(line).map(ScanItem::Sequential),
                )
                .await?;
            let Some(candidate) = detail.seq.first() else {
                continue;
            };
            match MacAddress::parse(candidate) {
                Ok(mac) => {
                    if let Some(record) = records.get_mut(&port) {
                        record.mac = Some(mac);
                    }
                }
                Err(_) => {
                    debug!(port = %port, candidate = %candidate, "lldp port id is not a mac address")
                }
            }
        }
        Ok(records)
    }

    async fn physical_interfaces(&mut self) -> Result<Vec<String>, SwitchError> {
        let entries = self.telemetry.walk(&self.model.port_oid).await?;
        Ok(parsers::parse_physical_walk(&entries))
    }

    fn model(&self) -> &str {
        &self.model.name
    }

    fn device(&self) -> &IpDevice {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data_aquisition::testing::{walk_entry, ScriptedTelemetry, ScriptedTransport};

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn device() -> IpDevice {
        IpDevice::new("10.0.0.2", "sw-core").unwrap()
    }

    fn switch(reads: Vec<&str>) -> HpSwitch<ScriptedTransport, ScriptedTelemetry> {
        let reads = reads.into_iter().map(str::to_string).collect();
        HpSwitch::new(
            device(),
            HpModel::hp_3800(),
            ScriptedTransport::new(reads),
            ScriptedTelemetry::empty(),
            TIMEOUT,
        )
        .unwrap()
    }

    fn telemetry_switch(
        walks: HashMap<String, Vec<crate::data_aquisition::core::WalkEntry>>,
    ) -> HpSwitch<ScriptedTransport, ScriptedTelemetry> {
        HpSwitch::new(
            device(),
            HpModel::hp_3800(),
            ScriptedTransport::new(vec![]),
            ScriptedTelemetry::new(walks),
            TIMEOUT,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_interfaces_across_pages() {
        let mut switch = switch(vec![
            "Press any key to continue",
            "PROCURVE-A#",
            "  A1    100/1000T  | Yes     Auto          MDIX\n-- MORE --",
            "  A2-Trk1 100/1000T| Yes     Auto          MDIX\n  A3    100/1000T  | No                    MDIX\nPROCURVE-A#",
        ]);
        let ports = switch.interfaces().await.unwrap();

        let names: Vec<&str> = ports.iter().map(Port::name).collect();
        assert_eq!(names, vec!["A1", "A2", "A3"]);
        assert_eq!(ports[1].trunk(), Some("Trk1"));
        assert!(!ports[2].is_enabled());
    }

    #[tokio::test]
    async fn test_vlans_fetch_membership_per_vlan() {
        let mut switch = switch(vec![
            "Press any key to continue",
            "PROCURVE-A#",
            "  10     DATA         | Port-based   No    No\n  20     VOICE        | Port-based   No    No\nPROCURVE-A#",
            "  A1    Untagged\n  A2    Tagged\nPROCURVE-A#",
            "  A2    Untagged\nPROCURVE-A#",
        ]);
        let definitions = switch.vlans().await.unwrap();

        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].vlan.id(), 10);
        assert_eq!(
            definitions[0].members,
            vec![
                VlanMember {
                    port: "A1".to_string(),
                    mode: "Untagged".to_string()
                },
                VlanMember {
                    port: "A2".to_string(),
                    mode: "Tagged".to_string()
                },
            ]
        );
        assert_eq!(definitions[1].vlan.name(), "VOICE");
        assert_eq!(definitions[1].members.len(), 1);
    }

    #[tokio::test]
    async fn test_mac_table_grouped_by_port() {
        let mut switch = switch(vec![
            "Press any key to continue",
            "PROCURVE-A#",
            "  3417eb-a1b2c3   A7       10\n  3417eb-ffeedd   A7       20\n  001b3f-04ee09   A9       10\nPROCURVE-A#",
        ]);
        let table = switch.mac_address_table().await.unwrap();

        assert_eq!(table["A7"].len(), 2);
        assert_eq!(table["A9"][0].vlan_id, 10);
        assert_eq!(table["A9"][0].mac.to_string(), "00:1b:3f:04:ee:09");
    }

    #[tokio::test]
    async fn test_poe_status_keyed_by_port() {
        let mut switch = switch(vec![
            "Press any key to continue",
            "PROCURVE-A#",
            "  A5   | Yes    low       15.4 W     6.7 W    Delivering\nPROCURVE-A#",
        ]);
        let status = switch.poe_status().await.unwrap();

        assert_eq!(status.len(), 1);
        assert!(status["A5"].is_enabled());
        assert_eq!(status["A5"].usage(), 6.7);
    }

    #[tokio::test]
    async fn test_lldp_missing_mac_follow_up() {
        let mut switch = switch(vec![
            "Press any key to continue",
            "PROCURVE-A#",
            "  A1        | 10.0.0.9                         Gi0/1     edge-sw\nPROCURVE-A#",
            "  PortId   : 34 17 eb a1 b2 c3\nPROCURVE-A#",
        ]);
        let records = switch.lldp_neighbors().await.unwrap();

        let record = &records["A1"];
        assert_eq!(record.ip.unwrap().to_string(), "10.0.0.9");
        assert_eq!(record.mac.unwrap().to_string(), "34:17:eb:a1:b2:c3");

        let writes = switch.session.transport_ref().writes();
        assert!(writes.contains(&b"show lldp info remote-device A1\n".to_vec()));
    }

    #[tokio::test]
    async fn test_cdp_neighbors_from_transcript() {
        let mut switch = switch(vec![
            "Press any key to continue",
            "PROCURVE-A#",
            "  Port : A4\n  Device ID : 3417eb-a1b2c3\n  Address Type : IP\n  Address : 10.0.0.17\n  Platform : cisco WS-C2960\n  Device Port : Gi0/1\nPROCURVE-A#",
        ]);
        let records = switch.cdp_neighbors().await.unwrap();

        assert_eq!(records["A4"].mac.unwrap().to_string(), "34:17:eb:a1:b2:c3");
        assert_eq!(records["A4"].remote_port.as_deref(), Some("Gi0/1"));
    }

    #[tokio::test]
    async fn test_physical_interfaces_via_telemetry_only() {
        let mut walks = HashMap::new();
        walks.insert(
            PORT_OID.to_string(),
            vec![
                walk_entry("1.3.6.1.2.1.47.1.1.1.1.7.1", "A1 Port"),
                walk_entry("1.3.6.1.2.1.47.1.1.1.1.7.2", "Fan Tray"),
                walk_entry("1.3.6.1.2.1.47.1.1.1.1.7.3", "A2 Port"),
            ],
        );
        let mut switch = telemetry_switch(walks);

        assert_eq!(switch.physical_interfaces().await.unwrap(), vec!["A1", "A2"]);
        // No CLI traffic for a telemetry fetch.
        assert!(switch.session.transport_ref().writes().is_empty());
    }

    #[tokio::test]
    async fn test_arp_table_via_telemetry() {
        let mut walks = HashMap::new();
        walks.insert(
            ARP_OID.to_string(),
            vec![walk_entry(
                "1.3.6.1.2.1.4.22.1.2.1.10.0.0.9",
                "34:17:eb:a1:b2:c3",
            )],
        );
        let mut switch = telemetry_switch(walks);
        let table = switch.arp_table().await.unwrap();

        let mac = MacAddress::parse("3417eba1b2c3").unwrap();
        assert!(table[&mac].contains_key(&"10.0.0.9".parse::<std::net::IpAddr>().unwrap()));
    }

    #[tokio::test]
    async fn test_model_names() {
        assert_eq!(HpModel::hp_3800().name(), "HP 3800");
        assert_eq!(HpModel::hp_e5406zl().name(), "HP E5406 ZL");
    }
}
