use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

/// Shared mapping from post identifier to title.
///
/// One exclusive lock serializes every read and write. The snapshot write
/// in [`persist`](Self::persist) runs after the lock is released, so the
/// on-disk view can briefly trail the in-memory map under concurrent
/// mutation.
pub struct BlogIndex {
    entries: Mutex<BTreeMap<u64, String>>,
    snapshot_path: PathBuf,
}

impl BlogIndex {
    /// Loads the index snapshot, starting empty when none exists yet.
    pub fn load(snapshot_path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&snapshot_path) {
            Ok(raw) => match serde_yaml::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Unreadable blog index snapshot, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            entries: Mutex::new(entries),
            snapshot_path,
        }
    }

    /// Snapshot of all entries in identifier order.
    pub fn list(&self) -> Vec<(u64, String)> {
        self.lock()
            .iter()
            .map(|(id, title)| (*id, title.clone()))
            .collect()
    }

    /// Inserts a new entry and returns its identifier.
    ///
    /// Identifiers are assigned as `len + 1`, so a deletion followed by a
    /// creation can reuse a live identifier and replace its entry. Kept
    /// as observed behavior; see DESIGN.md.
    pub fn create(&self, title: &str) -> u64 {
        let mut entries = self.lock();
        let id = entries.len() as u64 + 1;
        entries.insert(id, title.to_string());
        drop(entries);

        self.persist();
        id
    }

    /// Removes an entry, reporting whether it existed.
    pub fn destroy(&self, id: u64) -> bool {
        let mut entries = self.lock();
        let removed = entries.remove(&id).is_some();
        drop(entries);

        self.persist();
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Best-effort snapshot write; failures are logged and absorbed.
    fn persist(&self) {
        let snapshot = self.lock().clone();
        match serde_yaml::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(&self.snapshot_path, raw) {
                    warn!(error = %e, "Failed to persist blog index");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize blog index"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u64, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
