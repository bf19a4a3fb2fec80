use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use crate::net::addr::{self, Family};

/// Hostname to address-set mapping for every known host in a zone.
///
/// Hostnames follow the dot-terminated FQDN convention and may carry
/// addresses of both families; the ordered containers make every
/// enumeration below a deterministic function of the mapping.
pub type HostMapping = BTreeMap<String, BTreeSet<IpAddr>>;

/// An SRV record entry. The target may be a hostname or a literal
/// address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvRecord {
    pub service: String,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// The target as a literal address if it parses as one, otherwise as a
/// dot-terminated hostname.
pub fn fqdn_or_ip(target: &str) -> String {
    match target.parse::<IpAddr>() {
        Ok(ip) => ip.to_string(),
        Err(_) => format!("{}.", target.trim_end_matches('.')),
    }
}

/// `(hostname, ip)` pairs of a mapping, flattened in mapping order.
fn enumerate_mapping(mapping: &HostMapping) -> impl Iterator<Item = (&str, IpAddr)> {
    mapping
        .iter()
        .flat_map(|(hostname, ips)| ips.iter().map(move |ip| (hostname.as_str(), *ip)))
}

/// Address records (A or AAAA, by `family`) for a forward zone.
///
/// The name server's own record comes first, then every mapping entry of
/// the requested family. Addresses of the other family are dropped, not
/// reported.
pub fn address_records(
    mapping: &HostMapping,
    domain: &str,
    dns_ip: Option<IpAddr>,
    family: Family,
) -> Vec<(String, String)> {
    let mut records = Vec::new();
    if let Some(ip) = dns_ip
        && Family::of(&ip) == family
    {
        records.push((format!("{domain}."), ip.to_string()));
    }
    for (hostname, ip) in enumerate_mapping(mapping) {
        if Family::of(&ip) == family {
            records.push((hostname.to_string(), ip.to_string()));
        }
    }
    records
}

/// PTR records for a reverse zone: reverse owner names to hostnames.
///
/// Addresses outside `network` are silently dropped; the mapping covers
/// the whole estate while each zone file only publishes its own chunk.
pub fn ptr_records(mapping: &HostMapping, network: &IpNetwork) -> Vec<(String, String)> {
    enumerate_mapping(mapping)
        .filter(|(_, ip)| network.contains(*ip))
        .map(|(hostname, ip)| {
            (
                addr::reverse_name(&ip),
                format!("{}.", hostname.trim_end_matches('.')),
            )
        })
        .collect()
}

/// SRV records as `(service, "priority weight port target")` pairs.
pub fn srv_records(records: &[SrvRecord]) -> Vec<(String, String)> {
    records
        .iter()
        .map(|record| {
            let target = fqdn_or_ip(&record.target);
            (
                record.service.clone(),
                format!(
                    "{} {} {} {}",
                    record.priority, record.weight, record.port, target
                ),
            )
        })
        .collect()
}
