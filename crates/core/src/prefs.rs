use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::Result;

/// The one durable client record: last-used dictionary and strategy. Mutated
/// only by explicit user selection, never by analysis results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    pub dictionary: String,
    pub strategy: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dictionary: "YAWL".to_string(),
            strategy: "bold97".to_string(),
        }
    }
}

/// JSON-file-backed store for [`Preferences`]. Loads the stored record on
/// open (falling back to defaults if the file is missing or unreadable) and
/// persists on every update. Changes are broadcast on a watch channel so
/// views can observe the store without knowing about the rendering layer.
pub struct PreferenceStore {
    path: PathBuf,
    data: RwLock<Preferences>,
    changes: watch::Sender<Preferences>,
}

impl PreferenceStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                debug!("preference file unreadable, using defaults: {err}");
                Preferences::default()
            })
        } else {
            Preferences::default()
        };
        let (changes, _) = watch::channel(data.clone());
        Ok(Self {
            path,
            data: RwLock::new(data),
            changes,
        })
    }

    pub fn current(&self) -> Preferences {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, prefs: Preferences) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = prefs.clone();
            let serialized = serde_json::to_string_pretty(&*guard)?;
            fs::write(&self.path, serialized)?;
        }
        let _ = self.changes.send(prefs);
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("prefs.json")).unwrap();
        assert_eq!(store.current(), Preferences::default());
        assert_eq!(store.current().dictionary, "YAWL");
    }

    #[test]
    fn update_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        {
            let store = PreferenceStore::open(path.clone()).unwrap();
            store
                .update(Preferences {
                    dictionary: "TWL".to_string(),
                    strategy: "plain".to_string(),
                })
                .unwrap();
        }
        let reopened = PreferenceStore::open(path).unwrap();
        assert_eq!(reopened.current().dictionary, "TWL");
        assert_eq!(reopened.current().strategy, "plain");
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        let store = PreferenceStore::open(path).unwrap();
        assert_eq!(store.current(), Preferences::default());
    }

    #[test]
    fn updates_are_observable() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("prefs.json")).unwrap();
        let mut rx = store.subscribe();
        store
            .update(Preferences {
                dictionary: "TWL".to_string(),
                strategy: "bold97".to_string(),
            })
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().dictionary, "TWL");
    }
}
