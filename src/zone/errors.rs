use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::net::NetError;

/// Zone generation and write errors
#[derive(Debug, Clone, Error)]
pub enum ZoneError {
    /// Address arithmetic error
    #[error(transparent)]
    Net(#[from] NetError),

    /// Target configuration directory is missing
    #[error("zone configuration directory {0} does not exist")]
    MissingConfigDir(PathBuf),

    /// Writing a zone file failed
    #[error("failed to write zone file {path}: {source}")]
    Write {
        path: PathBuf,
        source: Arc<std::io::Error>,
    },

    /// Rendering a zone file failed
    #[error("failed to render zone {zone}: {reason}")]
    Render { zone: String, reason: String },
}

impl ZoneError {
    pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        ZoneError::Write {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;
