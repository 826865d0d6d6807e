//! Store trait: the abstract interface for key-path persistence.
//!
//! This trait lets the database layer stay storage-agnostic. Implementations
//! include SQLite (persistent) and in-memory (for tests).

use std::sync::Arc;

use statedb_core::{KeyPath, Value};

use crate::error::Result;

/// A persistent JSON tree addressed by key paths.
///
/// # Design Notes
///
/// - **Staged writes**: `write` updates the tree immediately; reads observe it.
///   Nothing is durable until `commit`.
/// - **Atomic commit**: `commit` persists every staged write at once, or none.
/// - **Nested addressing**: intermediate containers are created on write and
///   existing ones are never replaced, see [`statedb_core::set_at_path`].
/// - **Last write wins**: there is no versioning or conflict detection.
pub trait KeyPathStore: Send + Sync {
    /// Read the value at `path`, or `None` when nothing is stored there.
    fn read(&self, path: &KeyPath) -> Result<Option<Value>>;

    /// Stage `value` at `path`.
    ///
    /// Writing the root path replaces the whole tree and requires an object.
    fn write(&self, path: &KeyPath, value: Value) -> Result<()>;

    /// Persist all staged writes.
    ///
    /// On failure the staged writes are still in place; call `rollback` to
    /// drop them.
    fn commit(&self) -> Result<()>;

    /// Discard all staged writes, returning to the last committed tree.
    fn rollback(&self) -> Result<()>;

    /// The full tree, including staged writes.
    fn snapshot(&self) -> Result<Value>;
}

/// Extension trait for common store patterns.
pub trait KeyPathStoreExt: KeyPathStore {
    /// Stage a write and commit it immediately.
    ///
    /// A failed commit rolls the staged writes back, so reads never observe
    /// data that did not become durable.
    fn write_and_commit(&self, path: &KeyPath, value: Value) -> Result<()> {
        self.write(path, value)?;
        if let Err(err) = self.commit() {
            if let Err(rollback) = self.rollback() {
                tracing::warn!(%rollback, "rollback after failed commit also failed");
            }
            return Err(err);
        }
        Ok(())
    }

    /// True when a value (including `null`) is stored at `path`.
    fn contains(&self, path: &KeyPath) -> Result<bool> {
        Ok(self.read(path)?.is_some())
    }
}

impl<S: KeyPathStore + ?Sized> KeyPathStoreExt for S {}

impl<S: KeyPathStore + ?Sized> KeyPathStore for Arc<S> {
    fn read(&self, path: &KeyPath) -> Result<Option<Value>> {
        (**self).read(path)
    }

    fn write(&self, path: &KeyPath, value: Value) -> Result<()> {
        (**self).write(path, value)
    }

    fn commit(&self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&self) -> Result<()> {
        (**self).rollback()
    }

    fn snapshot(&self) -> Result<Value> {
        (**self).snapshot()
    }
}

impl<S: KeyPathStore + ?Sized> KeyPathStore for &S {
    fn read(&self, path: &KeyPath) -> Result<Option<Value>> {
        (**self).read(path)
    }

    fn write(&self, path: &KeyPath, value: Value) -> Result<()> {
        (**self).write(path, value)
    }

    fn commit(&self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&self) -> Result<()> {
        (**self).rollback()
    }

    fn snapshot(&self) -> Result<Value> {
        (**self).snapshot()
    }
}
