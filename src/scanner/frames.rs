use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::scanner::session::{FrameSource, ScanError};

/// How often a watched directory is listed while no new frame is there.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Frames dropped as image files into a directory, e.g. by a capture tool
/// taking periodic snapshots. Files are read once each, in name order.
pub struct DirectoryFrames {
    dir: PathBuf,
    poll_interval: Duration,
    seen: HashSet<PathBuf>,
}

impl DirectoryFrames {
    /// Watches `dir`. Files already present are read first.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            seen: HashSet::new(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn next_unseen(&self) -> Result<Option<PathBuf>, ScanError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ScanError::Source(format!("{}: {}", self.dir.display(), e)))?;

        let mut fresh = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && !self.seen.contains(&path) {
                fresh.push(path);
            }
        }

        fresh.sort();
        Ok(fresh.into_iter().next())
    }
}

impl FrameSource for DirectoryFrames {
    async fn next_frame(&mut self) -> Result<Vec<u8>, ScanError> {
        loop {
            if let Some(path) = self.next_unseen().await? {
                tracing::debug!("📷 Frame: {}", path.display());
                let frame = tokio::fs::read(&path).await?;
                self.seen.insert(path);
                return Ok(frame);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn stop(&mut self) {
        tracing::debug!("Stopped watching {}", self.dir.display());
    }
}
