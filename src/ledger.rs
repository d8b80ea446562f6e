//! Per-email logging ledger.
//!
//! Tracks, for each email, which records already had it logged against them.
//! One JSON document per `message_id` lives in an injected key/value store:
//!
//! ```text
//! logging:<message_id>  →  {"partners": [42], "projects": [], "tasks": [7]}
//! ```
//!
//! Entries are created on first access and never evicted. The ledger takes no
//! lock across check and mark: duplicate concurrent clicks are only caught on a
//! later re-check or by the server itself.

#[cfg(test)]
mod memory;
mod sqlite;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors that can occur while reading or writing the ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ledger store lock poisoned")]
    Poisoned,
}

pub type Result<T> = core::result::Result<T, LedgerError>;

/// Keyed string storage backing the ledger.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The kind of record an email can be logged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Partners,
    Projects,
    Tasks,
}

impl RecordKind {
    /// Model name of the record on the business server.
    pub fn model(self) -> &'static str {
        match self {
            Self::Partners => "res.partner",
            Self::Projects => "project.project",
            Self::Tasks => "project.task",
        }
    }
}

/// Records an email has been logged against, by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingState {
    #[serde(default)]
    pub partners: BTreeSet<i64>,
    #[serde(default)]
    pub projects: BTreeSet<i64>,
    #[serde(default)]
    pub tasks: BTreeSet<i64>,
}

impl LoggingState {
    pub fn contains(&self, kind: RecordKind, id: i64) -> bool {
        self.ids(kind).contains(&id)
    }

    fn ids(&self, kind: RecordKind) -> &BTreeSet<i64> {
        match kind {
            RecordKind::Partners => &self.partners,
            RecordKind::Projects => &self.projects,
            RecordKind::Tasks => &self.tasks,
        }
    }

    fn ids_mut(&mut self, kind: RecordKind) -> &mut BTreeSet<i64> {
        match kind {
            RecordKind::Partners => &mut self.partners,
            RecordKind::Projects => &mut self.projects,
            RecordKind::Tasks => &mut self.tasks,
        }
    }
}

/// The logging ledger over an injected store.
pub struct Ledger {
    store: Box<dyn KeyValueStore>,
}

impl Ledger {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// A ledger backed by a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Everything logged for this email so far.
    ///
    /// The empty entry is written on first access.
    pub fn logged(&self, message_id: &str) -> Result<LoggingState> {
        let key = key(message_id);
        match self.store.get(&key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                let state = LoggingState::default();
                self.store.set(&key, &serde_json::to_string(&state)?)?;
                Ok(state)
            }
        }
    }

    /// Like [`Ledger::logged`], but never writes: an unknown email reads as
    /// an empty state and stays absent from the store.
    pub fn peek(&self, message_id: &str) -> Result<LoggingState> {
        match self.store.get(&key(message_id))? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(LoggingState::default()),
        }
    }

    /// Returns `true` if the email has not been logged on this record yet.
    pub fn check(&self, message_id: &str, kind: RecordKind, id: i64) -> Result<bool> {
        Ok(!self.logged(message_id)?.contains(kind, id))
    }

    /// Remember that the email was logged on this record.
    ///
    /// Call only after the remote log succeeded.
    pub fn mark_logged(&self, message_id: &str, kind: RecordKind, id: i64) -> Result<()> {
        let mut state = self.logged(message_id)?;
        if state.ids_mut(kind).insert(id) {
            self.store
                .set(&key(message_id), &serde_json::to_string(&state)?)?;
            debug!(message_id, ?kind, id, "marked email as logged");
        }
        Ok(())
    }
}

fn key(message_id: &str) -> String {
    format!("logging:{message_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_true_until_marked() {
        let ledger = Ledger::in_memory();

        assert!(ledger.check("m1", RecordKind::Partners, 42).unwrap());
        ledger.mark_logged("m1", RecordKind::Partners, 42).unwrap();
        assert!(!ledger.check("m1", RecordKind::Partners, 42).unwrap());
    }

    #[test]
    fn marking_one_key_leaves_others_open() {
        let ledger = Ledger::in_memory();
        ledger.mark_logged("m1", RecordKind::Partners, 42).unwrap();

        assert!(ledger.check("m1", RecordKind::Partners, 43).unwrap());
        assert!(ledger.check("m1", RecordKind::Tasks, 42).unwrap());
        assert!(ledger.check("m2", RecordKind::Partners, 42).unwrap());
    }

    #[test]
    fn first_access_creates_empty_entry() {
        let store = MemoryStore::default();
        let ledger = Ledger::new(store.clone());

        assert_eq!(store.get("logging:m1").unwrap(), None);
        let state = ledger.logged("m1").unwrap();
        assert_eq!(state, LoggingState::default());
        assert!(store.get("logging:m1").unwrap().is_some());
    }

    #[test]
    fn peek_does_not_create_entry() {
        let store = MemoryStore::default();
        let ledger = Ledger::new(store.clone());

        assert_eq!(ledger.peek("m1").unwrap(), LoggingState::default());
        assert_eq!(store.get("logging:m1").unwrap(), None);

        ledger.mark_logged("m1", RecordKind::Tasks, 7).unwrap();
        assert!(ledger.peek("m1").unwrap().contains(RecordKind::Tasks, 7));
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let ledger = Ledger::in_memory();
        ledger.mark_logged("m1", RecordKind::Tasks, 7).unwrap();
        ledger.mark_logged("m1", RecordKind::Tasks, 7).unwrap();

        let state = ledger.logged("m1").unwrap();
        assert_eq!(state.tasks.len(), 1);
    }

    #[test]
    fn reads_documents_missing_kinds() {
        let store = MemoryStore::default();
        store.set("logging:m1", r#"{"partners":[1]}"#).unwrap();
        let ledger = Ledger::new(store);

        assert!(!ledger.check("m1", RecordKind::Partners, 1).unwrap());
        assert!(ledger.check("m1", RecordKind::Projects, 1).unwrap());
    }

    #[test]
    fn record_kind_models() {
        assert_eq!(RecordKind::Partners.model(), "res.partner");
        assert_eq!(RecordKind::Tasks.model(), "project.task");
    }
}
