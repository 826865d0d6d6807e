//! SQLite implementation of the KeyPathStore trait.
//!
//! This is the persistent storage backend. Each top-level namespace (the
//! first path segment) is one row holding the JSON tree below it. Writes are
//! staged per namespace and flushed in a single transaction on `commit`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Map;

use statedb_core::{get_at_path, set_at_path, KeyPath, Value};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::KeyPathStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    inner: Mutex<SqliteInner>,
}

struct SqliteInner {
    /// The SQLite connection.
    conn: Connection,

    /// Namespace documents written since the last commit.
    /// `None` marks a namespace for deletion.
    staged: BTreeMap<String, Option<Value>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file (and its parent directory) and runs migrations if it
    /// doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migration::migrate(&mut conn)?;
        Ok(Self {
            inner: Mutex::new(SqliteInner {
                conn,
                staged: BTreeMap::new(),
            }),
        })
    }

    /// Number of namespaces with uncommitted changes.
    pub fn staged_namespaces(&self) -> Result<usize> {
        Ok(self.lock()?.staged.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqliteInner>> {
        self.inner
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl SqliteInner {
    /// Current document for a namespace, staged changes first.
    fn load(&self, name: &str) -> Result<Option<Value>> {
        if let Some(staged) = self.staged.get(name) {
            return Ok(staged.clone());
        }

        let text: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM namespaces WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        text.map(|t| serde_json::from_str(&t).map_err(StoreError::from))
            .transpose()
    }

    /// Every namespace name, committed or staged.
    fn names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM namespaces ORDER BY name")?;
        let mut names: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for (name, doc) in &self.staged {
            match doc {
                Some(_) if !names.contains(name) => names.push(name.clone()),
                None => names.retain(|n| n != name),
                _ => {}
            }
        }
        names.sort();
        Ok(names)
    }

    fn snapshot(&self) -> Result<Value> {
        let mut root = Map::new();
        for name in self.names()? {
            if let Some(doc) = self.load(&name)? {
                root.insert(name, doc);
            }
        }
        Ok(Value::Object(root))
    }
}

impl KeyPathStore for SqliteStore {
    fn read(&self, path: &KeyPath) -> Result<Option<Value>> {
        let inner = self.lock()?;

        let Some((name, rest)) = path.split_first() else {
            return inner.snapshot().map(Some);
        };

        let doc = inner.load(name)?;
        let rest = KeyPath::from_segments(rest.iter().cloned());
        Ok(doc.and_then(|d| get_at_path(&d, &rest).cloned()))
    }

    fn write(&self, path: &KeyPath, value: Value) -> Result<()> {
        let mut inner = self.lock()?;

        let Some((name, rest)) = path.split_first() else {
            let Value::Object(entries) = value else {
                return Err(StoreError::InvalidData(
                    "store root must be an object".into(),
                ));
            };
            for existing in inner.names()? {
                inner.staged.insert(existing, None);
            }
            for (name, doc) in entries {
                inner.staged.insert(name, Some(doc));
            }
            tracing::trace!("sqlite store root replaced");
            return Ok(());
        };

        let doc = if rest.is_empty() {
            value
        } else {
            let mut doc = inner
                .load(name)?
                .unwrap_or_else(|| Value::Object(Map::new()));
            set_at_path(&mut doc, &KeyPath::from_segments(rest.iter().cloned()), value)?;
            doc
        };
        inner.staged.insert(name.to_string(), Some(doc));
        tracing::trace!(%path, "sqlite store write staged");
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut guard = self.lock()?;
        let SqliteInner { conn, staged } = &mut *guard;
        if staged.is_empty() {
            return Ok(());
        }

        let now = now_millis();
        let tx = conn.transaction()?;
        for (name, doc) in staged.iter() {
            match doc {
                Some(doc) => {
                    tx.execute(
                        "INSERT INTO namespaces (name, document, updated_at)
                         VALUES (?1, ?2, ?3)
                         ON CONFLICT(name) DO UPDATE SET
                            document = excluded.document,
                            updated_at = excluded.updated_at",
                        params![name, serde_json::to_string(doc)?, now],
                    )?;
                }
                None => {
                    tx.execute("DELETE FROM namespaces WHERE name = ?1", params![name])?;
                }
            }
        }
        tx.commit()?;

        tracing::trace!(namespaces = staged.len(), "sqlite store commit");
        staged.clear();
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        let mut inner = self.lock()?;
        tracing::trace!(namespaces = inner.staged.len(), "sqlite store rollback");
        inner.staged.clear();
        Ok(())
    }

    fn snapshot(&self) -> Result<Value> {
        self.lock()?.snapshot()
    }
}
