// =============================================================================
// Preference Store — The single persisted user flag (sound on/off)
// =============================================================================
//
// One boolean, default true, kept in a tiny JSON file with the same atomic
// tmp + rename write the runtime config uses.  Reads come from an in-memory
// cache so the hot path never touches disk.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Preferences {
    #[serde(default = "default_true")]
    sound_on: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { sound_on: true }
    }
}

/// Read/write access to the persisted sound preference.
pub trait PreferenceStore: Send + Sync {
    fn sound_on(&self) -> bool;
    fn set_sound_on(&self, on: bool) -> Result<()>;
}

// =============================================================================
// JSON-file-backed store
// =============================================================================

pub struct JsonPreferenceStore {
    path: PathBuf,
    cached: RwLock<Preferences>,
}

impl JsonPreferenceStore {
    /// Open the store at `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "unreadable preferences, using defaults");
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        };
        Self {
            path,
            cached: RwLock::new(prefs),
        }
    }

    fn persist(&self, prefs: &Preferences) -> Result<()> {
        let content =
            serde_json::to_string_pretty(prefs).context("failed to serialise preferences")?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp preferences to {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path).with_context(|| {
            format!("failed to rename tmp preferences to {}", self.path.display())
        })?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn sound_on(&self) -> bool {
        self.cached.read().sound_on
    }

    fn set_sound_on(&self, on: bool) -> Result<()> {
        let mut prefs = self.cached.write();
        prefs.sound_on = on;
        self.persist(&prefs)
    }
}
