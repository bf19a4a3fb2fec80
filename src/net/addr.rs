use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family, with the reverse-DNS geometry attached.
///
/// Reverse delegation works in fixed-size units: whole octets under
/// `in-addr.arpa` and single hex nibbles under `ip6.arpa`. Every piece of
/// bit arithmetic in the generator goes through these accessors instead of
/// masking by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// Bits covered by one reverse-DNS label: an octet or a nibble.
    pub const fn unit_bits(self) -> u32 {
        match self {
            Family::V4 => 8,
            Family::V6 => 4,
        }
    }

    /// Total address width in bits.
    pub const fn width(self) -> u32 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Number of address labels in a reverse-DNS name (4 or 32).
    pub const fn label_count(self) -> u32 {
        self.width() / self.unit_bits()
    }

    /// Root of the reverse-DNS tree for this family.
    pub const fn rdns_root(self) -> &'static str {
        match self {
            Family::V4 => "in-addr.arpa",
            Family::V6 => "ip6.arpa",
        }
    }

    /// Render a single label value: decimal octets, lowercase hex nibbles.
    pub fn format_label(self, value: u128) -> String {
        match self {
            Family::V4 => format!("{value}"),
            Family::V6 => format!("{value:x}"),
        }
    }
}

/// Address value as an unsigned integer in the low bits.
pub fn to_u128(ip: &IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u128::from(u32::from(*v4)),
        IpAddr::V6(v6) => u128::from(*v6),
    }
}

/// Inverse of [`to_u128`]; bits above the family width are discarded.
pub fn from_u128(family: Family, value: u128) -> IpAddr {
    match family {
        Family::V4 => IpAddr::V4(Ipv4Addr::from(value as u32)),
        Family::V6 => IpAddr::V6(Ipv6Addr::from(value)),
    }
}

/// Value of the reverse-DNS label at unit index `index`, where index 0 is
/// the least significant octet/nibble.
pub fn unit_label(ip: &IpAddr, index: u32) -> u128 {
    let family = Family::of(ip);
    let unit = family.unit_bits();
    let mask = (1u128 << unit) - 1;
    (to_u128(ip) >> (unit * index)) & mask
}

/// The address labels of the reverse-DNS name, least significant first.
///
/// `192.168.1.10` yields `["10", "1", "168", "192"]`.
pub fn reverse_labels(ip: &IpAddr) -> Vec<String> {
    let family = Family::of(ip);
    (0..family.label_count())
        .map(|index| family.format_label(unit_label(ip, index)))
        .collect()
}

/// The full reverse-DNS owner name, dot terminated.
///
/// `192.168.1.10` yields `10.1.168.192.in-addr.arpa.`.
pub fn reverse_name(ip: &IpAddr) -> String {
    let family = Family::of(ip);
    let mut labels = reverse_labels(ip);
    labels.push(family.rdns_root().to_string());
    format!("{}.", labels.join("."))
}
