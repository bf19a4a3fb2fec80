pub mod builder;
pub mod errors;
pub mod generate;
pub mod rdns;
pub mod records;
pub mod render;
pub mod writer;

pub use builder::{ForwardZone, ReverseZone, ZoneFileData, date_serial};
pub use errors::{Result, ZoneError};
pub use generate::GenerateDirective;
pub use rdns::{DomainInfo, compose_zone_info};
pub use records::{HostMapping, SrvRecord};
pub use render::render_zone;
pub use writer::ZoneFileWriter;
