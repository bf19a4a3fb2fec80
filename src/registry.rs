use lazy_static::lazy_static;

use crate::zone::builder::{DirectiveTables, RecordTables};
use crate::zone::generate::GenerateDirective;

/// Descriptor for one record type the generator can publish.
///
/// The key is the stable zone-file type token; the function pointers are
/// the fixed operation set the renderer needs to pull that type's rows
/// out of a built zone. Everything is registered below at process start
/// and looked up by key; there is no dynamic discovery.
pub struct RecordTypeDescriptor {
    pub key: &'static str,
    pub record_rows: fn(&RecordTables) -> &[(String, String)],
    pub directive_rows: fn(&DirectiveTables) -> &[GenerateDirective],
}

fn no_directives(_: &DirectiveTables) -> &[GenerateDirective] {
    &[]
}

lazy_static! {
    static ref RECORD_TYPES: Vec<RecordTypeDescriptor> = vec![
        RecordTypeDescriptor {
            key: "A",
            record_rows: |tables| &tables.a,
            directive_rows: |tables| &tables.a,
        },
        RecordTypeDescriptor {
            key: "AAAA",
            record_rows: |tables| &tables.aaaa,
            directive_rows: no_directives,
        },
        RecordTypeDescriptor {
            key: "SRV",
            record_rows: |tables| &tables.srv,
            directive_rows: no_directives,
        },
        RecordTypeDescriptor {
            key: "PTR",
            record_rows: |tables| &tables.ptr,
            directive_rows: |tables| &tables.ptr,
        },
    ];
}

/// All registered record types, in rendering order.
pub fn descriptors() -> &'static [RecordTypeDescriptor] {
    &RECORD_TYPES
}

/// Look a record type up by its key.
pub fn lookup(key: &str) -> Option<&'static RecordTypeDescriptor> {
    RECORD_TYPES.iter().find(|descriptor| descriptor.key == key)
}
