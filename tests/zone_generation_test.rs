use std::fs;

use skald::config::GeneratorConfig;
use skald::manifest::Manifest;
use skald::zone::builder::{ForwardZone, ReverseZone};
use skald::zone::render::render_zone;
use skald::zone::writer::ZoneFileWriter;

const MANIFEST: &str = r#"
domain = "example.com"
serial = 2026080500
ttl = 300
dns_address = "192.168.1.1"
reverse_networks = ["192.168.1.0/24"]

[hosts]
"host1.example.com." = ["192.168.1.10"]
"host2.example.com." = ["192.168.1.11", "2001:db8::11"]
"roamer.example.com." = ["10.99.0.5"]

[[srv]]
service = "_ldap._tcp"
priority = 10
weight = 5
port = 389
target = "ldap.example.com"

[[dynamic_ranges]]
first = "192.168.1.128"
last = "192.168.1.191"
"#;

fn build_zones(manifest: &Manifest) -> Vec<skald::zone::builder::ZoneFileData> {
    let serial = manifest.serial.unwrap();
    let dynamic_ranges = manifest.dynamic_ranges().unwrap();

    let mut forward = ForwardZone::new(&manifest.domain, serial)
        .with_mapping(manifest.hosts.clone())
        .with_srv_records(manifest.srv.clone())
        .with_dynamic_ranges(dynamic_ranges.clone());
    if let Some(dns_ip) = manifest.dns_address {
        forward = forward.with_dns_ip(dns_ip);
    }

    let mut zones = forward.build();
    for network in &manifest.reverse_networks {
        zones.extend(
            ReverseZone::new(&manifest.domain, serial, *network)
                .with_mapping(manifest.hosts.clone())
                .with_dynamic_ranges(dynamic_ranges.clone())
                .build(),
        );
    }
    zones
}

#[test]
fn test_manifest_to_zone_files() {
    let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
    let zones = build_zones(&manifest);

    // One forward zone plus one reverse zone for the aligned /24.
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].zone_name, "example.com");
    assert_eq!(zones[1].zone_name, "1.168.192.in-addr.arpa");

    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        config_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let mut writer = ZoneFileWriter::new();
    for zone in &zones {
        let text = render_zone(zone, manifest.ttl.unwrap()).unwrap();
        let path = config.compose_path(&format!("zone.{}", zone.zone_name));
        writer.write(&path, &text).unwrap();
    }

    let forward = fs::read_to_string(dir.path().join("zone.example.com")).unwrap();
    assert!(forward.contains("$TTL 300"));
    assert!(forward.contains("2026080500 ; serial"));
    assert!(forward.contains("example.com. IN A 192.168.1.1"));
    assert!(forward.contains("host1.example.com. IN A 192.168.1.10"));
    assert!(forward.contains("host2.example.com. IN AAAA 2001:db8::11"));
    assert!(forward.contains("_ldap._tcp IN SRV 10 5 389 ldap.example.com."));
    assert!(forward.contains("$GENERATE 128-191 192-168-1-$ A 192.168.1.$"));

    let reverse = fs::read_to_string(dir.path().join("zone.1.168.192.in-addr.arpa")).unwrap();
    assert!(reverse.contains(
        "10.1.168.192.in-addr.arpa. IN PTR host1.example.com."
    ));
    assert!(reverse.contains(
        "11.1.168.192.in-addr.arpa. IN PTR host2.example.com."
    ));
    // The host outside 192.168.1.0/24 must not leak into this zone.
    assert!(!reverse.contains("roamer.example.com."));
    assert!(reverse.contains(
        "$GENERATE 128-191 $.1.168.192.in-addr.arpa. PTR 192-168-1-$.example.com."
    ));
}

#[test]
fn test_regeneration_is_idempotent() {
    let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
    let first = build_zones(&manifest);
    let second = build_zones(&manifest);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.records, b.records);
        assert_eq!(a.directives, b.directives);
        assert_eq!(a.serial, b.serial);
    }
}

#[test]
fn test_classless_reverse_zone_end_to_end() {
    let manifest: Manifest = toml::from_str(
        r#"
domain = "example.com"
serial = 1
reverse_networks = ["192.168.1.16/28"]

[hosts]
"pocket.example.com." = ["192.168.1.17"]
"#,
    )
    .unwrap();

    let zones = build_zones(&manifest);
    assert_eq!(zones.len(), 2);
    let reverse = &zones[1];
    assert_eq!(reverse.zone_name, "16-28.1.168.192.in-addr.arpa");
    assert_eq!(
        reverse.records.ptr,
        vec![(
            "17.1.168.192.in-addr.arpa.".to_string(),
            "pocket.example.com.".to_string()
        )]
    );
}

#[test]
fn test_rewrites_keep_mtimes_strictly_increasing() {
    let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
    let zones = build_zones(&manifest);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zone.example.com");
    let mut writer = ZoneFileWriter::new();

    let mut mtimes = Vec::new();
    for _ in 0..3 {
        let text = render_zone(&zones[0], 300).unwrap();
        writer.write(&path, &text).unwrap();
        mtimes.push(fs::metadata(&path).unwrap().modified().unwrap());
    }
    assert!(mtimes[0] < mtimes[1]);
    assert!(mtimes[1] < mtimes[2]);
}
