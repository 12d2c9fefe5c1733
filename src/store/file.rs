use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::{SessionStore, StoredSession};

/// A session store backed by a JSON file.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new
/// snapshot and never a partial one.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a new `FileStore` at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<StoredSession> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredSession::default()),
            Err(e) => return Err(e.into()),
        };

        match sonic_rs::from_str(&contents) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(
                    "⚠️ Unreadable session file {}: {}, treating as signed out",
                    self.path.display(),
                    e
                );
                Ok(StoredSession::default())
            }
        }
    }

    fn persist(&self, state: &StoredSession) -> Result<()> {
        let json = sonic_rs::to_string_pretty(state)?;

        let directory = self.directory();
        fs::create_dir_all(directory)?;

        let mut temp = tempfile::NamedTempFile::new_in(directory)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Session file written: {}", self.path.display());
        Ok(())
    }
}
