//! In-memory implementation of the KeyPathStore trait.
//!
//! This is primarily for testing. It has the same path semantics as SQLite
//! but keeps the whole tree in memory with no persistence.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Map;
use statedb_core::{get_at_path, set_at_path, KeyPath, Value};

use crate::error::{Result, StoreError};
use crate::traits::KeyPathStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// The whole tree including staged writes. Always an object at the root.
    document: Value,

    /// The tree as of the last commit.
    committed: Value,

    /// Writes staged since the last commit.
    pending: usize,

    /// Number of commits performed.
    commits: u64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                document: Value::Object(Map::new()),
                committed: Value::Object(Map::new()),
                pending: 0,
                commits: 0,
            }),
        }
    }

    /// Create a store pre-populated with `document`.
    ///
    /// A non-object document is wrapped as the empty tree.
    pub fn with_document(document: Value) -> Self {
        let store = Self::new();
        if document.is_object() {
            if let Ok(mut inner) = store.inner.write() {
                inner.committed = document.clone();
                inner.document = document;
            }
        }
        store
    }

    /// Number of commits performed so far.
    pub fn commit_count(&self) -> Result<u64> {
        Ok(self.read_inner()?.commits)
    }

    /// Number of writes staged since the last commit.
    pub fn pending_writes(&self) -> Result<usize> {
        Ok(self.read_inner()?.pending)
    }

    fn read_inner(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_inner(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPathStore for MemoryStore {
    fn read(&self, path: &KeyPath) -> Result<Option<Value>> {
        let inner = self.read_inner()?;
        Ok(get_at_path(&inner.document, path).cloned())
    }

    fn write(&self, path: &KeyPath, value: Value) -> Result<()> {
        if path.is_root() && !value.is_object() {
            return Err(StoreError::InvalidData(
                "store root must be an object".into(),
            ));
        }

        let mut inner = self.write_inner()?;
        set_at_path(&mut inner.document, path, value)?;
        inner.pending += 1;
        tracing::trace!(%path, "memory store write staged");
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut inner = self.write_inner()?;
        inner.committed = inner.document.clone();
        inner.commits += 1;
        tracing::trace!(pending = inner.pending, "memory store commit");
        inner.pending = 0;
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        let mut inner = self.write_inner()?;
        inner.document = inner.committed.clone();
        tracing::trace!(discarded = inner.pending, "memory store rollback");
        inner.pending = 0;
        Ok(())
    }

    fn snapshot(&self) -> Result<Value> {
        Ok(self.read_inner()?.document.clone())
    }
}
