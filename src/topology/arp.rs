use crate::switch::ArpTable;

/// Accumulates ARP tables gathered from any number of providers.
///
/// Merging is first-write-wins per (MAC, IP) pair: the earliest observation
/// of a pair is kept and later batches never overwrite it. The aggregator is
/// single-writer; concurrent pollers feeding one instance must serialize
/// their `add` calls behind a lock.
#[derive(Debug, Default)]
pub struct ArpAggregator {
    data: ArpTable,
}

impl ArpAggregator {
    pub fn new() -> Self {
        ArpAggregator::default()
    }

    /// Merges one provider's table into the accumulated data.
    pub fn add(&mut self, table: ArpTable) {
        for (mac, observations) in table {
            let merged = self.data.entry(mac).or_default();
            for (ip, observation) in observations {
                merged.entry(ip).or_insert(observation);
            }
        }
    }

    pub fn data(&self) -> &ArpTable {
        &self.data
    }

    pub fn into_data(self) -> ArpTable {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::time::{Duration, SystemTime};

    use crate::network::MacAddress;
    use crate::switch::ArpObservation;

    fn table(mac: &str, ip: &str, sysname: Option<&str>, time: SystemTime) -> ArpTable {
        let mac = MacAddress::parse(mac).unwrap();
        let ip: IpAddr = ip.parse().unwrap();
        let mut table = ArpTable::new();
        table.entry(mac).or_default().insert(
            ip,
            ArpObservation {
                ip,
                port: None,
                sysname: sysname.map(str::to_string),
                time,
            },
        );
        table
    }

    #[test]
    fn test_add_merges_distinct_pairs() {
        let mut aggregator = ArpAggregator::new();
        aggregator.add(table("aabbccddeeff", "10.0.0.9", None, SystemTime::UNIX_EPOCH));
        aggregator.add(table("aabbccddeeff", "10.0.0.10", None, SystemTime::UNIX_EPOCH));
        aggregator.add(table("001b3f04ee09", "10.0.0.9", None, SystemTime::UNIX_EPOCH));

        let mac = MacAddress::parse("aabbccddeeff").unwrap();
        assert_eq!(aggregator.data().len(), 2);
        assert_eq!(aggregator.data()[&mac].len(), 2);
    }

    #[test]
    fn test_first_write_wins_per_pair() {
        let early = SystemTime::UNIX_EPOCH;
        let late = early + Duration::from_secs(60);

        let mut aggregator = ArpAggregator::new();
        aggregator.add(table("aabbccddeeff", "10.0.0.9", Some("first"), early));
        aggregator.add(table("aabbccddeeff", "10.0.0.9", Some("second"), late));

        let mac = MacAddress::parse("aabbccddeeff").unwrap();
        let ip: IpAddr = "10.0.0.9".parse().unwrap();
        let observation = &aggregator.data()[&mac][&ip];
        assert_eq!(observation.sysname.as_deref(), Some("first"));
        assert_eq!(observation.time, early);
    }
}
