use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::errors::{Result, ZoneError};

/// Mode zone files are written with: owner read/write, world read.
pub const ZONE_FILE_MODE: u32 = 0o644;

/// Writes rendered zone files with strictly increasing modification
/// times.
///
/// BIND decides whether a zone changed by comparing file timestamps, and
/// some filesystems only resolve them to one second. The writer tracks
/// the last timestamp it produced per path and, whenever a rewrite lands
/// on the same (or an earlier) clock tick, stamps the file one second
/// past the previous write instead of trusting the wall clock.
#[derive(Debug, Default)]
pub struct ZoneFileWriter {
    last_mtime: HashMap<PathBuf, SystemTime>,
}

impl ZoneFileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace `path` with `content`.
    ///
    /// The target directory must already exist; a missing configuration
    /// directory is reported as an error, never papered over.
    pub fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(ZoneError::MissingConfigDir(dir.to_path_buf()));
        }

        let previous = fs::metadata(path).and_then(|meta| meta.modified()).ok();

        let mut staged = NamedTempFile::new_in(dir).map_err(|err| ZoneError::write(path, err))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|err| ZoneError::write(path, err))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(fs::Permissions::from_mode(ZONE_FILE_MODE))
                .map_err(|err| ZoneError::write(path, err))?;
        }
        staged
            .persist(path)
            .map_err(|err| ZoneError::write(path, err.error))?;

        self.advance_mtime(path, previous)?;
        info!("wrote zone file {}", path.display());
        Ok(())
    }

    /// Keep the on-disk mtime strictly later than every earlier write.
    fn advance_mtime(&mut self, path: &Path, previous: Option<SystemTime>) -> Result<()> {
        let floor = match (previous, self.last_mtime.get(path).copied()) {
            (Some(disk), Some(tracked)) => Some(disk.max(tracked)),
            (Some(disk), None) => Some(disk),
            (None, tracked) => tracked,
        };
        let current = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|err| ZoneError::write(path, err))?;
        let effective = match floor {
            Some(floor) if current <= floor => {
                let bumped = floor + Duration::from_secs(1);
                let file = fs::OpenOptions::new()
                    .write(true)
                    .open(path)
                    .map_err(|err| ZoneError::write(path, err))?;
                file.set_modified(bumped)
                    .map_err(|err| ZoneError::write(path, err))?;
                debug!(
                    "bumped mtime of {} ahead of a coarse filesystem clock",
                    path.display()
                );
                bumped
            }
            _ => current,
        };
        self.last_mtime.insert(path.to_path_buf(), effective);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_file_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone.example.com");
        let mut writer = ZoneFileWriter::new();
        writer.write(&path, "$TTL 300\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "$TTL 300\n");
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("zone.example.com");
        let mut writer = ZoneFileWriter::new();
        let err = writer.write(&path, "content").unwrap_err();
        assert!(matches!(err, ZoneError::MissingConfigDir(_)));
    }

    #[test]
    fn test_rapid_rewrites_have_increasing_mtimes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone.example.com");
        let mut writer = ZoneFileWriter::new();

        writer.write(&path, "first\n").unwrap();
        let first = fs::metadata(&path).unwrap().modified().unwrap();
        writer.write(&path, "second\n").unwrap();
        let second = fs::metadata(&path).unwrap().modified().unwrap();
        writer.write(&path, "third\n").unwrap();
        let third = fs::metadata(&path).unwrap().modified().unwrap();

        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_rewrite_of_preexisting_file_moves_mtime_forward() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone.example.com");
        fs::write(&path, "older\n").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        // A fresh writer has no memory of the path; the on-disk
        // timestamp alone must be enough to stay monotonic.
        let mut writer = ZoneFileWriter::new();
        writer.write(&path, "newer\n").unwrap();
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert!(after > before);
    }

    #[cfg(unix)]
    #[test]
    fn test_zone_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone.example.com");
        let mut writer = ZoneFileWriter::new();
        writer.write(&path, "content\n").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, ZONE_FILE_MODE);
    }
}
