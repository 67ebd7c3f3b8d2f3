//! Preference loading with change-invalidated caching.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::PrefsResult;
use crate::preferences::Preferences;
use crate::template::Replacements;

/// General preference document.
pub const PREFERENCES_FILE: &str = "preferences.toml";

/// Presence preference document.
pub const PRESENCE_FILE: &str = "presence.toml";

/// Modification stamp of one document (`None` when missing).
type FileStamp = Option<(SystemTime, u64)>;

#[derive(Debug)]
struct CachedVersion {
    stamps: (FileStamp, FileStamp),
    prefs: Arc<Preferences>,
}

/// Loads preference documents from a directory.
///
/// Each call to [`snapshot`](Self::snapshot) returns a complete, immutable
/// version. Documents are re-read only when their modification time or size
/// changes.
#[derive(Debug)]
pub struct PreferenceStore {
    dir: PathBuf,
    cache: RwLock<Option<CachedVersion>>,
}

impl PreferenceStore {
    /// Create a store reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(None),
        }
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn general_path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }

    fn presence_path(&self) -> PathBuf {
        self.dir.join(PRESENCE_FILE)
    }

    /// Current preference version.
    pub fn snapshot(&self) -> Arc<Preferences> {
        let general_path = self.general_path();
        let presence_path = self.presence_path();
        let stamps = (file_stamp(&general_path), file_stamp(&presence_path));

        if let Some(cached) = self.cache.read().as_ref() {
            if cached.stamps == stamps {
                return cached.prefs.clone();
            }
        }

        let prefs = Arc::new(Preferences::from_documents(
            load_document(&general_path),
            load_document(&presence_path),
        ));
        debug!(dir = %self.dir.display(), "Preferences reloaded");

        *self.cache.write() = Some(CachedVersion {
            stamps,
            prefs: prefs.clone(),
        });
        prefs
    }

    /// Resolve the template named `key` against the current version.
    pub fn resolve(&self, key: &str, replacements: &Replacements) -> String {
        self.snapshot().resolve(key, replacements)
    }

    /// Replace the presence document.
    ///
    /// The new document is written to a temporary file and renamed over the
    /// old one, so readers see either the previous or the new version.
    pub fn save_presence(&self, values: &BTreeMap<String, String>) -> PrefsResult<()> {
        let content = toml::to_string(values)?;
        std::fs::create_dir_all(&self.dir)?;

        let target = self.presence_path();
        let tmp = target.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &target)?;

        *self.cache.write() = None;
        info!(path = %target.display(), "Presence preferences saved");
        Ok(())
    }
}

fn file_stamp(path: &Path) -> FileStamp {
    let meta = std::fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

/// Load a flat document, degrading to an empty one on any failure.
fn load_document(path: &Path) -> BTreeMap<String, String> {
    match read_document(path) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable preference document");
            BTreeMap::new()
        }
    }
}

fn read_document(path: &Path) -> PrefsResult<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Preference document not found");
            return Ok(BTreeMap::new());
        }
        Err(e) => return Err(e.into()),
    };

    let table: toml::Table = toml::from_str(&content)?;
    let mut doc = BTreeMap::new();
    for (key, value) in table {
        match value {
            toml::Value::String(s) => {
                doc.insert(key, s);
            }
            other => {
                warn!(
                    path = %path.display(),
                    key = %key,
                    kind = other.type_str(),
                    "Skipping non-string preference"
                );
            }
        }
    }
    Ok(doc)
}
