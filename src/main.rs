use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use skald::config::GeneratorConfig;
use skald::manifest::Manifest;
use skald::zone::builder::{ForwardZone, ReverseZone, ZoneFileData, date_serial};
use skald::zone::render::render_zone;
use skald::zone::writer::ZoneFileWriter;

/// Generate BIND zone configuration from a host-mapping manifest.
#[derive(Debug, Parser)]
#[command(name = "skald", version)]
struct Cli {
    /// Path to the generation manifest (TOML)
    manifest: PathBuf,

    /// Write zone files into this directory instead of the configured one
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Print the rendered zones to stdout instead of writing files
    #[arg(long)]
    check: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("zone generation failed: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::load(&cli.manifest)?;
    let mut config = GeneratorConfig::from_env()?;
    if let Some(dir) = &cli.config_dir {
        config.config_dir = dir.clone();
    }

    let serial = manifest.serial.unwrap_or_else(date_serial);
    let ttl = manifest.ttl.unwrap_or(config.default_ttl);
    let dynamic_ranges = manifest.dynamic_ranges()?;

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

    info!(
        "generating {} zone file(s) for {} (serial {serial})",
        zones.len(),
        manifest.domain
    );

    let mut writer = ZoneFileWriter::new();
    for zone in &zones {
        let text = render_zone(zone, ttl)?;
        let path = target_path(&config, cli, zone);
        if cli.check {
            println!("; --- {} ---", path.display());
            print!("{text}");
        } else {
            writer.write(&path, &text)?;
        }
    }
    Ok(())
}

/// Zone files land next to each other; `--config-dir` redirects the whole
/// set without touching the per-zone names.
fn target_path(config: &GeneratorConfig, cli: &Cli, zone: &ZoneFileData) -> PathBuf {
    if cli.config_dir.is_some() {
        config.compose_path(&format!("zone.{}", zone.zone_name))
    } else {
        zone.target_path.clone()
    }
}
