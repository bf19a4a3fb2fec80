use std::net::IpAddr;

use ipnetwork::IpNetwork;
use thiserror::Error;

use super::addr::{self, Family};

/// Errors from range construction and address arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    #[error("range endpoints belong to different address families")]
    MixedAddressFamilies,

    #[error("range first address {first} is after last address {last}")]
    InvertedRange { first: IpAddr, last: IpAddr },
}

/// A contiguous, inclusive span of addresses within one family.
///
/// Unlike a network, a range does not have to be aligned to any prefix
/// boundary; dynamic allocation pools usually are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpRange {
    first: IpAddr,
    last: IpAddr,
}

impl IpRange {
    pub fn new(first: IpAddr, last: IpAddr) -> Result<Self, NetError> {
        if Family::of(&first) != Family::of(&last) {
            return Err(NetError::MixedAddressFamilies);
        }
        if addr::to_u128(&first) > addr::to_u128(&last) {
            return Err(NetError::InvertedRange { first, last });
        }
        Ok(Self { first, last })
    }

    /// The degenerate range holding exactly one address.
    pub fn single(ip: IpAddr) -> Self {
        Self { first: ip, last: ip }
    }

    /// The range covering every address of `network`, base included.
    pub fn from_network(network: &IpNetwork) -> Self {
        Self {
            first: network.network(),
            last: network_last(network),
        }
    }

    pub fn first(&self) -> IpAddr {
        self.first
    }

    pub fn last(&self) -> IpAddr {
        self.last
    }

    pub fn family(&self) -> Family {
        Family::of(&self.first)
    }

    /// Number of addresses in the range, saturating at `u128::MAX` for the
    /// full IPv6 space.
    pub fn size(&self) -> u128 {
        (addr::to_u128(&self.last) - addr::to_u128(&self.first)).saturating_add(1)
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        Family::of(ip) == self.family()
            && addr::to_u128(&self.first) <= addr::to_u128(ip)
            && addr::to_u128(ip) <= addr::to_u128(&self.last)
    }
}

/// Mask selecting the host bits below `prefix`.
pub(crate) fn host_mask(family: Family, prefix: u32) -> u128 {
    let host_bits = family.width() - prefix;
    if host_bits == 0 {
        0
    } else {
        (1u128 << host_bits) - 1
    }
}

/// Last address of a network (the broadcast address for IPv4).
pub fn network_last(network: &IpNetwork) -> IpAddr {
    let base = network.network();
    let family = Family::of(&base);
    let value = addr::to_u128(&base) | host_mask(family, u32::from(network.prefix()));
    addr::from_u128(family, value)
}

/// The smallest network that contains the whole range.
pub fn spanning_network(range: &IpRange) -> IpNetwork {
    let family = range.family();
    let width = family.width();
    let first = addr::to_u128(&range.first());
    let last = addr::to_u128(&range.last());
    let diff = first ^ last;
    let prefix = if diff == 0 {
        width
    } else {
        // Leading zeros within the family width.
        diff.leading_zeros() - (128 - width)
    };
    let base = first & !host_mask(family, prefix);
    IpNetwork::new(addr::from_u128(family, base), prefix as u8)
        .expect("spanning prefix is within the address width")
}

/// Intersection of a network with a range, or `None` when they are
/// disjoint (or from different families).
pub fn intersect_with_network(network: &IpNetwork, range: &IpRange) -> Option<IpRange> {
    let net_range = IpRange::from_network(network);
    if net_range.family() != range.family() {
        return None;
    }
    let first = addr::to_u128(&net_range.first()).max(addr::to_u128(&range.first()));
    let last = addr::to_u128(&net_range.last()).min(addr::to_u128(&range.last()));
    if first > last {
        return None;
    }
    let family = range.family();
    Some(IpRange {
        first: addr::from_u128(family, first),
        last: addr::from_u128(family, last),
    })
}

/// Whether the range falls entirely inside the network.
pub fn range_within_network(range: &IpRange, network: &IpNetwork) -> bool {
    network.contains(range.first()) && network.contains(range.last())
}

/// Partition a range into its natural aligned blocks.
///
/// A natural block is the largest block whose low-order reverse-DNS label
/// is the only part that varies: a /24 for IPv4, a /124 for IPv6 (or
/// smaller when the spanning network itself is smaller). Each returned
/// range is the intersection of one such block with the input, so edge
/// blocks may be partial.
pub fn natural_blocks(range: &IpRange) -> Vec<IpRange> {
    let family = range.family();
    let span = spanning_network(range);
    let block_prefix = (family.width() - family.unit_bits()).max(u32::from(span.prefix()));
    let block_size = 1u128 << (family.width() - block_prefix);

    // There are at most 256 /24s in the /16 the directive synthesizer
    // allows, so this walk stays short for every eligible range.
    let span_last = addr::to_u128(&network_last(&span));
    let mut cursor = addr::to_u128(&span.network());
    let mut blocks = Vec::new();
    loop {
        let block = IpRange {
            first: addr::from_u128(family, cursor),
            last: addr::from_u128(family, cursor + (block_size - 1)),
        };
        let subnet = IpNetwork::new(block.first(), block_prefix as u8)
            .expect("block prefix is within the address width");
        if let Some(intersection) = intersect_with_network(&subnet, range) {
            blocks.push(intersection);
        }
        match cursor.checked_add(block_size) {
            Some(next) if next <= span_last => cursor = next,
            _ => break,
        }
    }
    blocks
}

/// Natural blocks of an IPv4 range plus the naming context derived from
/// the first two octets of its spanning network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDetails {
    /// Natural blocks covering the range, partial blocks included.
    pub blocks: Vec<IpRange>,
    /// First two octets in dotted form, e.g. `192.168`.
    pub prefix: String,
    /// Reverse-DNS suffix for those octets, e.g. `168.192.in-addr.arpa.`.
    pub rdns_suffix: String,
}

/// Details for an IPv4 dynamic range.
///
/// Only meaningful for ranges inside a single /16; the caller enforces
/// that before asking.
pub fn range_details(range: &IpRange) -> RangeDetails {
    let span = spanning_network(range);
    let base = span.network();
    let octet_one = addr::unit_label(&base, 3);
    let octet_two = addr::unit_label(&base, 2);
    RangeDetails {
        blocks: natural_blocks(range),
        prefix: format!("{octet_one}.{octet_two}"),
        rdns_suffix: format!("{octet_two}.{octet_one}.in-addr.arpa."),
    }
}
