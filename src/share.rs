// =============================================================================
// Share Target — Exporting the rendered verdict card
// =============================================================================
//
// Sharing a verdict card means writing the rendered text into a share
// directory and handing back the path (the download fallback).  Failures here
// are degraded functionality, never a request failure; callers log and move
// on.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

/// Somewhere a rendered card can be pushed to.
pub trait ShareTarget: Send + Sync {
    /// Share the card text under the given file stem; returns the artifact
    /// location.
    fn share(&self, file_stem: &str, card: &str) -> Result<PathBuf>;
}

// =============================================================================
// File-backed target (the download fallback)
// =============================================================================

pub struct FileShareTarget {
    dir: PathBuf,
}

impl FileShareTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ShareTarget for FileShareTarget {
    fn share(&self, file_stem: &str, card: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create share dir {}", self.dir.display()))?;

        let path = self.dir.join(format!("{file_stem}.txt"));
        let tmp_path = path.with_extension("txt.tmp");

        std::fs::write(&tmp_path, card)
            .with_context(|| format!("failed to write tmp card to {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("failed to rename tmp card to {}", path.display()))?;

        info!(path = %path.display(), "verdict card shared");
        Ok(path)
    }
}
