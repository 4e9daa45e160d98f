use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::event::EventRecord;

/// Default capacity, matching the dashboard's display window.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded, newest-first journal of site events, persisted as a single JSON
/// document on disk.
///
/// The journal is display-only: it must never be the system of record for a
/// financial or enrollment decision. Accordingly, persistence failures are
/// logged and swallowed — `record` cannot fail observably — and a corrupt or
/// absent file loads as an empty journal.
#[derive(Clone)]
pub struct EventJournal {
    entries: Arc<RwLock<Vec<EventRecord>>>,
    path: PathBuf,
    capacity: usize,
}

impl EventJournal {
    /// Opens the journal at `path`, truncating anything beyond `capacity`.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut entries = load_entries(&path);
        entries.truncate(capacity);
        Self {
            entries: Arc::new(RwLock::new(entries)),
            path,
            capacity,
        }
    }

    /// Prepends a record and evicts from the tail past capacity.
    pub async fn record(&self, record: EventRecord) {
        let mut entries = self.entries.write().await;
        entries.insert(0, record);
        entries.truncate(self.capacity);
        self.persist(&entries).await;
    }

    /// Snapshot copy of the full journal, newest-first.
    pub async fn list(&self) -> Vec<EventRecord> {
        self.entries.read().await.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.entries.read().await.iter().filter(|e| !e.read).count()
    }

    /// Marks the first record with `id` as read. Returns whether a record
    /// changed; marking an already-read record is a no-op.
    pub async fn mark_read(&self, id: i64) -> bool {
        let mut entries = self.entries.write().await;
        let changed = match entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if !entry.read => {
                entry.read = true;
                true
            }
            _ => false,
        };
        if changed {
            self.persist(&entries).await;
        }
        changed
    }

    /// Idempotent: returns how many records flipped from unread to read.
    pub async fn mark_all_read(&self) -> usize {
        let mut entries = self.entries.write().await;
        let mut changed = 0;
        for entry in entries.iter_mut().filter(|e| !e.read) {
            entry.read = true;
            changed += 1;
        }
        if changed > 0 {
            self.persist(&entries).await;
        }
        changed
    }

    /// Serializes under the lock, writes without blocking the runtime.
    /// Failures leave the entry in memory only.
    async fn persist(&self, entries: &[EventRecord]) {
        let json = match serde_json::to_vec_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("journal serialize failed, entry kept in memory only: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = tokio::fs::create_dir_all(parent).await;
            }
        }
        if let Err(e) = tokio::fs::write(&self.path, json).await {
            tracing::warn!(
                path = %self.path.display(),
                "journal write failed, entry kept in memory only: {}", e
            );
        }
    }
}

fn load_entries(path: &Path) -> Vec<EventRecord> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "journal read failed, starting empty: {}", e);
            return Vec::new();
        }
    };
    match serde_json::from_slice(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), "journal corrupt, starting empty: {}", e);
            Vec::new()
        }
    }
}
