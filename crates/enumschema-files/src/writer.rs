//! Temp file plus rename writer.

use enumschema_core::{Error, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomic writer for a single destination file.
///
/// # Examples
///
/// ```
/// use enumschema_files::AtomicWriter;
/// # use tempfile::TempDir;
///
/// # let temp = TempDir::new().unwrap();
/// let path = temp.path().join("fruit.json");
/// AtomicWriter::new(&path)
///     .with_prefix("Fruit-schema-enum.json")
///     .write(b"{\"enum\":[]}\n")
///     .unwrap();
/// assert!(path.exists());
/// ```
#[derive(Debug, Clone)]
pub struct AtomicWriter {
    path: PathBuf,
    prefix: String,
}

impl AtomicWriter {
    /// Creates a writer for `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            prefix: ".enumschema-".to_string(),
        }
    }

    /// Sets the name prefix of the temporary file.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `bytes` to the destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the temporary file cannot be created,
    /// written, synced or renamed.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        self.write_with(|file| file.write_all(bytes))
    }

    /// Runs `write` against the temporary file, then commits it.
    ///
    /// If `write` fails the temporary file is removed and the destination
    /// is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if any step fails, including `write` itself.
    pub fn write_with<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(&self.prefix)
            .tempfile_in(dir)
            .map_err(|e| self.io_error(dir, e))?;

        tracing::debug!(
            "Writing {} through {}",
            self.path.display(),
            temp.path().display()
        );

        write(temp.as_file_mut()).map_err(|e| self.io_error(temp.path(), e))?;
        temp.as_file().sync_all().map_err(|e| self.io_error(temp.path(), e))?;

        commit(temp, &self.path)?;
        tracing::info!("Wrote {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, path: &Path, source: io::Error) -> Error {
        tracing::debug!("Atomic write of {} failed: {}", self.path.display(), source);
        Error::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Renames the temporary file onto `path`. The temporary file is dropped,
/// and so deleted, when the rename fails.
fn commit(temp: NamedTempFile, path: &Path) -> Result<()> {
    temp.persist(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        source: e.error,
    })?;
    Ok(())
}

/// Writes `bytes` to `path` atomically.
///
/// # Errors
///
/// Returns [`Error::Io`] if any step of the write fails.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    AtomicWriter::new(path).write(bytes)
}

/// Atomically writes `path` with a caller-supplied write step.
///
/// # Errors
///
/// Returns [`Error::Io`] if any step of the write fails.
pub fn write_atomic_with<F>(path: impl AsRef<Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    AtomicWriter::new(path).write_with(write)
}
