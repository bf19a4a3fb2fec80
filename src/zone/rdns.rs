use std::path::PathBuf;

use ipnetwork::IpNetwork;
use tracing::debug;

use crate::config::compose_config_path;
use crate::net::addr::{self, Family};
use crate::net::range::network_last;

/// Information about a single DNS zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainInfo {
    /// Network chunk this zone covers. `None` for forward zones.
    pub subnetwork: Option<IpNetwork>,
    /// Fully-qualified zone name
    pub zone_name: String,
    /// File the rendered zone is written to
    pub target_path: PathBuf,
}

impl DomainInfo {
    pub fn new(subnetwork: Option<IpNetwork>, zone_name: impl Into<String>) -> Self {
        let zone_name = zone_name.into();
        let target_path = compose_config_path(&format!("zone.{zone_name}"));
        Self {
            subnetwork,
            zone_name,
            target_path,
        }
    }

    /// Same as [`DomainInfo::new`] with the target path overridden.
    pub fn with_target_path(
        subnetwork: Option<IpNetwork>,
        zone_name: impl Into<String>,
        target_path: PathBuf,
    ) -> Self {
        Self {
            subnetwork,
            zone_name: zone_name.into(),
            target_path,
        }
    }
}

/// Decompose a network into the reverse zones that publish it.
///
/// Each returned entry covers one delegation chunk: networks aligned to an
/// octet/nibble boundary get the canonical `base.<rest>` name, unaligned
/// ones get the RFC 2317 classless `base-<prefixlen>.<rest>` name. The
/// chunks partition the network exactly, in address order.
pub fn compose_zone_info(network: &IpNetwork) -> Vec<DomainInfo> {
    let first = network.network();
    let family = Family::of(&first);
    let unit = family.unit_bits();
    let width = family.width();
    let prefix = u32::from(network.prefix());

    // How many low-order reverse-DNS labels the zone file itself supplies.
    // One label of granularity always comes back as the zone's base label,
    // hence the extra unit in the numerator.
    let rest_limit = ((width + unit - prefix) / unit).clamp(1, family.label_count());

    // Prefix of each inner chunk: the next unit boundary. At full address
    // width there is nothing left to subdivide, so the network's own
    // prefix is kept and the base label carries it (RFC 2317 style).
    let mut chunk_prefix = prefix.div_ceil(unit) * unit;
    if chunk_prefix == width {
        chunk_prefix = prefix;
    }

    // Distance between chunk starts. Classless delegation never steps in
    // increments smaller than one full label.
    let shift = (width - prefix) / unit * unit;
    let mut step = if shift >= 128 { u128::MAX } else { 1u128 << shift };
    let label_step = 1u128 << unit;
    if step < label_step {
        step = label_step;
    }

    let labels = addr::reverse_labels(&first);
    let mut rest: Vec<&str> = labels[rest_limit as usize..]
        .iter()
        .map(String::as_str)
        .collect();
    rest.push(family.rdns_root());
    let zone_rest = rest.join(".");

    let mut base = addr::unit_label(&first, rest_limit - 1);
    let last = addr::to_u128(&network_last(network));
    let mut cursor = addr::to_u128(&first);
    let mut info = Vec::new();
    loop {
        // With labels stripped the base alone names the next chunk of the
        // reverse tree; with nothing stripped the original prefix length
        // rides along in the label.
        let zone_name = if rest_limit > 1 {
            format!("{}.{}", family.format_label(base), zone_rest)
        } else {
            format!("{}-{}.{}", family.format_label(base), prefix, zone_rest)
        };
        let chunk = IpNetwork::new(addr::from_u128(family, cursor), chunk_prefix as u8)
            .expect("chunk prefix is within the address width");
        info.push(DomainInfo::new(Some(chunk), zone_name));
        base += 1;
        match cursor.checked_add(step) {
            // Walking off the top of the address space means the network
            // is exhausted, same as passing its last address.
            Some(next) if next <= last => cursor = next,
            _ => break,
        }
    }
    debug!(
        "network {} decomposed into {} reverse zone(s)",
        network,
        info.len()
    );
    info
}
