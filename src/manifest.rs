use std::fs;
use std::net::IpAddr;
use std::path::Path;

use ipnetwork::IpNetwork;
use serde::Deserialize;
use thiserror::Error;

use crate::net::{IpRange, NetError};
use crate::zone::records::{HostMapping, SrvRecord};

/// Manifest loading errors
#[derive(Debug, Clone, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse manifest {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error(transparent)]
    Net(#[from] NetError),
}

/// A dynamic allocation range, not necessarily prefix aligned.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeEntry {
    pub first: IpAddr,
    pub last: IpAddr,
}

/// One generation pass, as described by the operator.
///
/// The manifest is the whole input contract: a domain, the serial, the
/// host mapping and service records, the networks that get reverse
/// zones, and the dynamic ranges eligible for $GENERATE compression.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Forward domain name
    pub domain: String,

    /// Zone serial; defaults to today's date serial when absent
    pub serial: Option<u32>,

    /// Zone TTL override in seconds
    pub ttl: Option<u32>,

    /// Address of the authoritative name server
    pub dns_address: Option<IpAddr>,

    /// Hostname to address-set mapping
    #[serde(default)]
    pub hosts: HostMapping,

    /// SRV records published in the forward zone
    #[serde(default)]
    pub srv: Vec<SrvRecord>,

    /// Networks that get reverse zones
    #[serde(default)]
    pub reverse_networks: Vec<IpNetwork>,

    /// Dynamic ranges eligible for $GENERATE compression
    #[serde(default)]
    pub dynamic_ranges: Vec<RangeEntry>,
}

impl Manifest {
    /// Load and parse a TOML manifest.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|err| ManifestError::Read {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        toml::from_str(&content).map_err(|err| ManifestError::Parse {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }

    /// The dynamic ranges with their invariants checked.
    pub fn dynamic_ranges(&self) -> Result<Vec<IpRange>, ManifestError> {
        self.dynamic_ranges
            .iter()
            .map(|entry| IpRange::new(entry.first, entry.last).map_err(ManifestError::from))
            .collect()
    }
}
