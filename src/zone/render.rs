use handlebars::{Handlebars, no_escape};
use lazy_static::lazy_static;
use serde_json::{Value, json};

use super::builder::ZoneFileData;
use super::errors::{Result, ZoneError};
use crate::registry;

/// Built-in zone file template. Record and directive rows arrive
/// pre-flattened in registry order, so the template stays type-agnostic.
const ZONE_TEMPLATE: &str = "\
; Zone file modified: {{modified}}.
$TTL {{ttl}}
@   IN  SOA {{domain}}. nobody.example.com. (
        {{serial}} ; serial
        600 ; refresh
        600 ; retry
        604800 ; expire
        {{ttl}} ; default ttl
        )

@   IN  NS  {{domain}}.

{{#each records}}
{{name}} IN {{type}} {{value}}
{{/each}}
{{#each directives}}
$GENERATE {{iterator}} {{name}} {{type}} {{value}}
{{/each}}
";

lazy_static! {
    static ref TEMPLATES: Handlebars<'static> = {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry
            .register_template_string("zone", ZONE_TEMPLATE)
            .expect("built-in zone template parses");
        registry
    };
}

fn flatten_rows(zone: &ZoneFileData) -> (Vec<Value>, Vec<Value>) {
    let mut records = Vec::new();
    let mut directives = Vec::new();
    for descriptor in registry::descriptors() {
        for (name, value) in (descriptor.record_rows)(&zone.records) {
            records.push(json!({
                "type": descriptor.key,
                "name": name,
                "value": value,
            }));
        }
        for directive in (descriptor.directive_rows)(&zone.directives) {
            directives.push(json!({
                "type": descriptor.key,
                "iterator": directive.iterator,
                "name": directive.name,
                "value": directive.value,
            }));
        }
    }
    (records, directives)
}

/// Render one zone file to its final text.
pub fn render_zone(zone: &ZoneFileData, ttl: u32) -> Result<String> {
    let (records, directives) = flatten_rows(zone);
    let parameters = json!({
        "domain": zone.domain,
        "serial": zone.serial,
        "modified": zone.modified,
        "ttl": ttl,
        "records": records,
        "directives": directives,
    });
    TEMPLATES
        .render("zone", &parameters)
        .map_err(|err| ZoneError::Render {
            zone: zone.zone_name.clone(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::builder::{DirectiveTables, RecordTables};
    use crate::zone::generate::GenerateDirective;
    use std::path::PathBuf;

    fn sample_zone() -> ZoneFileData {
        ZoneFileData {
            domain: "example.com".to_string(),
            zone_name: "example.com".to_string(),
            serial: 2026080500,
            modified: "2026-08-05 10:00:00".to_string(),
            records: RecordTables {
                a: vec![
                    ("example.com.".to_string(), "192.168.1.1".to_string()),
                    ("host1.".to_string(), "192.168.1.10".to_string()),
                ],
                srv: vec![(
                    "_ldap._tcp".to_string(),
                    "10 5 389 ldap.example.com.".to_string(),
                )],
                ..Default::default()
            },
            directives: DirectiveTables {
                a: vec![GenerateDirective {
                    iterator: "0-255".to_string(),
                    name: "192-168-2-$".to_string(),
                    value: "192.168.2.$".to_string(),
                }],
                ptr: Vec::new(),
            },
            target_path: PathBuf::from("zone.example.com"),
        }
    }

    #[test]
    fn test_render_forward_zone() {
        let text = render_zone(&sample_zone(), 300).unwrap();
        assert!(text.starts_with("; Zone file modified: 2026-08-05 10:00:00."));
        assert!(text.contains("$TTL 300"));
        assert!(text.contains("2026080500 ; serial"));
        assert!(text.contains("@   IN  NS  example.com."));
        assert!(text.contains("example.com. IN A 192.168.1.1"));
        assert!(text.contains("host1. IN A 192.168.1.10"));
        assert!(text.contains("_ldap._tcp IN SRV 10 5 389 ldap.example.com."));
        assert!(text.contains("$GENERATE 0-255 192-168-2-$ A 192.168.2.$"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let zone = sample_zone();
        assert_eq!(render_zone(&zone, 300).unwrap(), render_zone(&zone, 300).unwrap());
    }

    #[test]
    fn test_record_sections_in_registry_order() {
        let mut zone = sample_zone();
        zone.records.ptr = vec![(
            "10.1.168.192.in-addr.arpa.".to_string(),
            "host1.".to_string(),
        )];
        let text = render_zone(&zone, 300).unwrap();
        let a_at = text.find(" IN A ").unwrap();
        let srv_at = text.find(" IN SRV ").unwrap();
        let ptr_at = text.find(" IN PTR ").unwrap();
        assert!(a_at < srv_at && srv_at < ptr_at);
    }
}
