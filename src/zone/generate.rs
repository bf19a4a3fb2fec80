use ipnetwork::IpNetwork;
use serde::Serialize;
use tracing::debug;

use super::rdns::DomainInfo;
use crate::net::addr::{self, Family};
use crate::net::range::{self, IpRange};

/// Largest dynamic range eligible for $GENERATE compression (one /16).
pub const MAX_GENERATE_SIZE: u128 = 65536;

/// One `$GENERATE` zone-file directive: an iterator over the low-order
/// octet, an owner-name template and a value template, `$` standing in
/// for the iterated value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GenerateDirective {
    pub iterator: String,
    pub name: String,
    pub value: String,
}

/// Whether a sane set of $GENERATEs can be issued for this range.
///
/// Anything larger than a /16, or spanning two /16s, is refused rather
/// than risking an ambiguous expansion; the caller falls back to plain
/// per-host records. Only IPv4 ranges are compressed.
fn eligible(dynamic_range: &IpRange) -> bool {
    if dynamic_range.family() != Family::V4 {
        return false;
    }
    if dynamic_range.size() > MAX_GENERATE_SIZE {
        debug!(
            "dynamic range {}-{} too large for $GENERATE",
            dynamic_range.first(),
            dynamic_range.last()
        );
        return false;
    }
    let slash_16 = IpNetwork::new(dynamic_range.first(), 16)
        .expect("/16 is a valid IPv4 prefix");
    range::range_within_network(dynamic_range, &slash_16)
}

fn dedup_and_sort(mut directives: Vec<GenerateDirective>) -> Vec<GenerateDirective> {
    directives.sort_by(|a, b| {
        (&a.value, &a.iterator, &a.name).cmp(&(&b.value, &b.iterator, &b.name))
    });
    directives.dedup();
    directives
}

/// The $GENERATE directives for the forward zone of a dynamic range.
///
/// Each natural block becomes one directive mapping generated hostnames
/// (`192-168-1-$`) to the matching addresses (`192.168.1.$`).
pub fn forward_directives(dynamic_range: &IpRange) -> Vec<GenerateDirective> {
    if !eligible(dynamic_range) {
        return Vec::new();
    }

    let details = range::range_details(dynamic_range);
    let mut directives = Vec::new();
    for block in &details.blocks {
        let iterator = format!(
            "{}-{}",
            addr::unit_label(&block.first(), 0),
            addr::unit_label(&block.last(), 0)
        );
        // Third octet of this block, 10.0.X.1 style.
        let octet_three = addr::unit_label(&block.first(), 1);
        let name = format!("{}-{}-$", details.prefix.replace('.', "-"), octet_three);
        let value = format!("{}.{}.$", details.prefix, octet_three);
        directives.push(GenerateDirective {
            iterator,
            name,
            value,
        });
    }
    dedup_and_sort(directives)
}

/// The $GENERATE directives for one reverse zone of a dynamic range.
///
/// `domain` is the forward domain generated hostnames live under. Only
/// blocks inside `zone_info`'s subnetwork contribute. For zones of /24
/// or coarser granularity the owner name is written out fully; finer
/// (classless) zones already encode the block in the zone name, so a
/// bare `$` label suffices.
pub fn reverse_directives(
    dynamic_range: &IpRange,
    domain: &str,
    zone_info: &DomainInfo,
) -> Vec<GenerateDirective> {
    if !eligible(dynamic_range) {
        return Vec::new();
    }
    let Some(subnetwork) = zone_info.subnetwork else {
        return Vec::new();
    };

    let details = range::range_details(dynamic_range);
    let mut directives = Vec::new();
    for block in &details.blocks {
        if !subnetwork.contains(block.first()) {
            continue;
        }
        let iterator = format!(
            "{}-{}",
            addr::unit_label(&block.first(), 0),
            addr::unit_label(&block.last(), 0)
        );
        let octet_three = addr::unit_label(&block.first(), 1);
        let hostname = format!("{}-{}-$", details.prefix.replace('.', "-"), octet_three);
        let name = if subnetwork.prefix() <= 24 {
            format!("$.{}.{}", octet_three, details.rdns_suffix)
        } else {
            "$".to_string()
        };
        directives.push(GenerateDirective {
            iterator,
            name,
            value: format!("{hostname}.{domain}."),
        });
    }
    dedup_and_sort(directives)
}
