use std::net::IpAddr;
use std::path::PathBuf;

use chrono::{Datelike, Local};
use ipnetwork::IpNetwork;
use serde::Serialize;
use tracing::debug;

use super::generate::{self, GenerateDirective};
use super::rdns::{self, DomainInfo};
use super::records::{self, HostMapping, SrvRecord};
use crate::net::addr::Family;
use crate::net::range::IpRange;

/// Record tables of one zone file, keyed by record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordTables {
    #[serde(rename = "A")]
    pub a: Vec<(String, String)>,
    #[serde(rename = "AAAA")]
    pub aaaa: Vec<(String, String)>,
    #[serde(rename = "SRV")]
    pub srv: Vec<(String, String)>,
    #[serde(rename = "PTR")]
    pub ptr: Vec<(String, String)>,
}

/// $GENERATE directive tables of one zone file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectiveTables {
    #[serde(rename = "A")]
    pub a: Vec<GenerateDirective>,
    #[serde(rename = "PTR")]
    pub ptr: Vec<GenerateDirective>,
}

/// Everything the renderer needs for one zone file.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneFileData {
    /// Domain the name server is authoritative for
    pub domain: String,
    /// Name of this zone (equals `domain` for forward zones)
    pub zone_name: String,
    pub serial: u32,
    /// Generation timestamp, informational only
    pub modified: String,
    pub records: RecordTables,
    pub directives: DirectiveTables,
    #[serde(skip)]
    pub target_path: PathBuf,
}

/// Serial in the conventional YYYYMMDDNN form for today, sequence 00.
pub fn date_serial() -> u32 {
    let now = Local::now();
    now.year() as u32 * 1_000_000 + now.month() * 10_000 + now.day() * 100
}

fn modified_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Builds the forward zone of a domain.
///
/// The zone carries "A"/"AAAA" records for every mapped host, an address
/// record for the name server itself, optional "SRV" records, and
/// $GENERATE directives compressing IPv4 dynamic ranges.
#[derive(Debug, Clone)]
pub struct ForwardZone {
    domain: String,
    serial: u32,
    dns_ip: Option<IpAddr>,
    mapping: HostMapping,
    srv_records: Vec<SrvRecord>,
    dynamic_ranges: Vec<IpRange>,
    zone_info: Vec<DomainInfo>,
}

impl ForwardZone {
    pub fn new(domain: impl Into<String>, serial: u32) -> Self {
        let domain = domain.into();
        let zone_info = vec![DomainInfo::new(None, domain.clone())];
        Self {
            domain,
            serial,
            dns_ip: None,
            mapping: HostMapping::new(),
            srv_records: Vec::new(),
            dynamic_ranges: Vec::new(),
            zone_info,
        }
    }

    /// Address of the name server authoritative for this zone.
    pub fn with_dns_ip(mut self, dns_ip: IpAddr) -> Self {
        self.dns_ip = Some(dns_ip);
        self
    }

    pub fn with_mapping(mut self, mapping: HostMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_srv_records(mut self, srv_records: Vec<SrvRecord>) -> Self {
        self.srv_records = srv_records;
        self
    }

    pub fn with_dynamic_ranges(mut self, dynamic_ranges: Vec<IpRange>) -> Self {
        self.dynamic_ranges = dynamic_ranges;
        self
    }

    pub fn zone_info(&self) -> &[DomainInfo] {
        &self.zone_info
    }

    /// Assemble the record and directive tables for every zone file.
    pub fn build(&self) -> Vec<ZoneFileData> {
        let modified = modified_timestamp();
        self.zone_info
            .iter()
            .map(|info| {
                let directives = DirectiveTables {
                    a: self
                        .dynamic_ranges
                        .iter()
                        .filter(|range| range.family() == Family::V4)
                        .flat_map(generate::forward_directives)
                        .collect(),
                    ptr: Vec::new(),
                };
                let records = RecordTables {
                    a: records::address_records(
                        &self.mapping,
                        &self.domain,
                        self.dns_ip,
                        Family::V4,
                    ),
                    aaaa: records::address_records(
                        &self.mapping,
                        &self.domain,
                        self.dns_ip,
                        Family::V6,
                    ),
                    srv: records::srv_records(&self.srv_records),
                    ptr: Vec::new(),
                };
                debug!(
                    "forward zone {}: {} A, {} AAAA, {} SRV records",
                    info.zone_name,
                    records.a.len(),
                    records.aaaa.len(),
                    records.srv.len()
                );
                ZoneFileData {
                    domain: self.domain.clone(),
                    zone_name: info.zone_name.clone(),
                    serial: self.serial,
                    modified: modified.clone(),
                    records,
                    directives,
                    target_path: info.target_path.clone(),
                }
            })
            .collect()
    }
}

/// Builds the reverse zones of a network.
///
/// The network is decomposed into delegation chunks first; every chunk
/// becomes its own zone file holding the "PTR" records for addresses
/// inside it, plus $GENERATE directives for the dynamic-range blocks it
/// contains. `domain` is the forward domain generated hostnames point
/// into.
#[derive(Debug, Clone)]
pub struct ReverseZone {
    domain: String,
    serial: u32,
    network: IpNetwork,
    mapping: HostMapping,
    dynamic_ranges: Vec<IpRange>,
    zone_info: Vec<DomainInfo>,
}

impl ReverseZone {
    pub fn new(domain: impl Into<String>, serial: u32, network: IpNetwork) -> Self {
        let zone_info = rdns::compose_zone_info(&network);
        Self {
            domain: domain.into(),
            serial,
            network,
            mapping: HostMapping::new(),
            dynamic_ranges: Vec::new(),
            zone_info,
        }
    }

    pub fn with_mapping(mut self, mapping: HostMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_dynamic_ranges(mut self, dynamic_ranges: Vec<IpRange>) -> Self {
        self.dynamic_ranges = dynamic_ranges;
        self
    }

    pub fn network(&self) -> IpNetwork {
        self.network
    }

    pub fn zone_info(&self) -> &[DomainInfo] {
        &self.zone_info
    }

    /// Assemble the record and directive tables for every chunk's file.
    pub fn build(&self) -> Vec<ZoneFileData> {
        let modified = modified_timestamp();
        self.zone_info
            .iter()
            .map(|info| {
                let ptr = info
                    .subnetwork
                    .map(|subnetwork| records::ptr_records(&self.mapping, &subnetwork))
                    .unwrap_or_default();
                let directives = DirectiveTables {
                    a: Vec::new(),
                    ptr: self
                        .dynamic_ranges
                        .iter()
                        .filter(|range| range.family() == Family::V4)
                        .flat_map(|range| {
                            generate::reverse_directives(range, &self.domain, info)
                        })
                        .collect(),
                };
                debug!(
                    "reverse zone {}: {} PTR records, {} directives",
                    info.zone_name,
                    ptr.len(),
                    directives.ptr.len()
                );
                ZoneFileData {
                    domain: self.domain.clone(),
                    zone_name: info.zone_name.clone(),
                    serial: self.serial,
                    modified: modified.clone(),
                    records: RecordTables {
                        ptr,
                        ..Default::default()
                    },
                    directives,
                    target_path: info.target_path.clone(),
                }
            })
            .collect()
    }
}
