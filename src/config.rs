use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Directory zone files are written to unless overridden
pub const DEFAULT_CONFIG_DIR: &str = "/etc/bind/skald";

/// Default zone TTL in seconds
pub const DEFAULT_TTL: u32 = 300;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("invalid TTL value: {0}")]
    InvalidTtl(String),
}

/// Settings for one generator process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory that receives the `zone.<name>` files
    pub config_dir: PathBuf,

    /// TTL applied when the manifest does not set one
    pub default_ttl: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            default_ttl: DEFAULT_TTL,
        }
    }
}

impl GeneratorConfig {
    /// Create a GeneratorConfig from environment variables.
    /// Returns Err if an override is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("SKALD_CONFIG_DIR") {
            config.config_dir = PathBuf::from(dir);
        }

        if let Ok(ttl) = env::var("SKALD_DEFAULT_TTL") {
            config.default_ttl = ttl
                .parse()
                .map_err(|_| ConfigError::InvalidTtl(ttl))?;
        }

        Ok(config)
    }

    /// Path of a configuration file inside the configured directory.
    pub fn compose_path(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }
}

/// Path of a configuration file inside the process-wide config directory
/// (`SKALD_CONFIG_DIR`, falling back to [`DEFAULT_CONFIG_DIR`]).
pub fn compose_config_path(name: &str) -> PathBuf {
    let dir = env::var("SKALD_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
    dir.join(name)
}
