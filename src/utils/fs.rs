//! File system utility functions
//!
//! Provides the whole-file read/write primitives the alias store and the
//! editor workflow are built on.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;
use tempfile::Builder;
use tracing::{debug, instrument};

/// Utility struct for file system operations
#[derive(Debug)]
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// Create a new file system utilities instance
    pub fn new() -> Self {
        Self
    }

    /// Read a file as UTF-8, returning `None` when it does not exist
    #[instrument(skip(self))]
    pub fn read_optional<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
    ) -> io::Result<Option<String>> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                debug!("Read {} bytes from {}", content.len(), path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("File does not exist: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace a file's contents without ever leaving it half-written
    ///
    /// The data goes to a temporary file next to the real target which is
    /// then renamed over it. Symlinks are followed, so a linked file is
    /// updated in place of the link, and an existing file keeps its
    /// permissions.
    #[instrument(skip(self, contents))]
    pub fn write_atomic<P: AsRef<Path> + std::fmt::Debug, C: AsRef<[u8]>>(
        &self,
        path: P,
        contents: C,
    ) -> io::Result<()> {
        let target = match fs::canonicalize(path.as_ref()) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == io::ErrorKind::NotFound => path.as_ref().to_path_buf(),
            Err(e) => return Err(e),
        };
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let existing = match fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        debug!("Writing file atomically: {}", target.display());

        let mut builder = Builder::new();
        if existing.is_none() {
            if let Some(perms) = new_file_permissions() {
                builder.permissions(perms);
            }
        }
        let mut tmp = builder.tempfile_in(dir)?;
        if let Some(perms) = existing {
            tmp.as_file().set_permissions(perms)?;
        }
        tmp.write_all(contents.as_ref())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;

        debug!("File written successfully");
        Ok(())
    }

    /// Create a file with the given contents, failing if it already exists
    #[instrument(skip(self, contents))]
    pub fn create_new<P: AsRef<Path> + std::fmt::Debug, C: AsRef<[u8]>>(
        &self,
        path: P,
        contents: C,
    ) -> io::Result<()> {
        let path = path.as_ref();
        debug!("Creating file: {}", path.display());

        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(contents.as_ref())?;
        file.flush()
    }

    /// Remove a file if it exists
    #[instrument(skip(self))]
    pub fn remove_file_if_exists<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
    ) -> io::Result<bool> {
        let path = path.as_ref();

        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed file: {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("File does not exist: {}", path.display());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Check if a path exists and is a file
    pub fn is_file<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().is_file()
    }

    /// Last modification time of a file
    pub fn modified<P: AsRef<Path>>(&self, path: P) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }
}

/// Mode for freshly created files, narrowed by the process umask
#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

impl Default for FileSystemUtils {
    fn default() -> Self {
        Self::new()
    }
}
