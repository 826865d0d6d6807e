//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use statedb::{StateDb, StateDbConfig, StaticIdentity};
use statedb_core::{CanonicalPath, KeyPath, Namespace, SubPath, UserScope};
use statedb_store::{KeyPathStore, KeyPathStoreExt, MemoryStore, Result, StoreError};

/// Identity used by [`TestFixture::new`].
pub const TEST_IDENTITY: &str = "test-user";

/// A test fixture with a fixed identity and a memory store.
pub struct TestFixture {
    pub identity: Option<String>,
    pub db: StateDb<MemoryStore>,
}

impl TestFixture {
    /// Create a fixture signed in as [`TEST_IDENTITY`].
    pub fn new() -> Self {
        Self::with_identity(TEST_IDENTITY)
    }

    /// Create a fixture signed in as `identity`.
    pub fn with_identity(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self {
            db: StateDb::new(
                MemoryStore::new(),
                StaticIdentity::new(identity.clone()),
                StateDbConfig::default(),
            ),
            identity: Some(identity),
        }
    }

    /// Create a fixture nobody is signed in to.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            db: StateDb::new(
                MemoryStore::new(),
                StaticIdentity::anonymous(),
                StateDbConfig::default(),
            ),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &MemoryStore {
        self.db.store()
    }

    /// Resolve a location for this fixture's identity.
    pub fn path(&self, namespace: &str, sub_path: &str, scope: UserScope) -> CanonicalPath {
        self.db
            .resolve(&Namespace::from(namespace), &SubPath::from(sub_path), scope)
    }

    /// Write `value` straight into the store, bypassing the initializer.
    ///
    /// Used to simulate data left behind by another writer.
    pub fn seed(&self, namespace: &str, sub_path: &str, scope: UserScope, value: Value) {
        let path = self.path(namespace, sub_path, scope);
        self.store()
            .write_and_commit(&path.key_path(), value)
            .unwrap_or_else(|e| panic!("seeding {} failed: {}", path, e));
    }

    /// The whole persisted tree.
    pub fn snapshot(&self) -> Value {
        self.store()
            .snapshot()
            .unwrap_or_else(|e| panic!("snapshot failed: {}", e))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create databases for several users sharing one store.
///
/// User `i` is signed in as `user-<i>`.
pub fn multi_user_fixtures(count: usize) -> (Arc<MemoryStore>, Vec<StateDb<MemoryStore>>) {
    let store = Arc::new(MemoryStore::new());
    let users = (0..count)
        .map(|i| {
            StateDb::from_shared(
                Arc::clone(&store),
                Arc::new(StaticIdentity::new(format!("user-{}", i))),
                StateDbConfig::default(),
            )
        })
        .collect();
    (store, users)
}

/// Which store operations a [`FailingStore`] rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Read,
    Write,
    Commit,
}

/// Store test double that fails selected operations with an I/O error.
///
/// Operations that are not failing delegate to an in-memory store.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_commits: AtomicBool,
}

impl FailingStore {
    /// A store that fails nothing until told to.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails `op` from the start.
    pub fn failing(op: FailOn) -> Self {
        let store = Self::new();
        store.set_failing(op, true);
        store
    }

    /// Start or stop failing `op`.
    pub fn set_failing(&self, op: FailOn, failing: bool) {
        self.flag(op).store(failing, Ordering::SeqCst);
    }

    /// The delegate store.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn flag(&self, op: FailOn) -> &AtomicBool {
        match op {
            FailOn::Read => &self.fail_reads,
            FailOn::Write => &self.fail_writes,
            FailOn::Commit => &self.fail_commits,
        }
    }

    fn check(&self, op: FailOn) -> Result<()> {
        if self.flag(op).load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("injected {:?} failure", op),
            )));
        }
        Ok(())
    }
}

impl KeyPathStore for FailingStore {
    fn read(&self, path: &KeyPath) -> Result<Option<Value>> {
        self.check(FailOn::Read)?;
        self.inner.read(path)
    }

    fn write(&self, path: &KeyPath, value: Value) -> Result<()> {
        self.check(FailOn::Write)?;
        self.inner.write(path, value)
    }

    fn commit(&self) -> Result<()> {
        self.check(FailOn::Commit)?;
        self.inner.commit()
    }

    fn rollback(&self) -> Result<()> {
        self.inner.rollback()
    }

    fn snapshot(&self) -> Result<Value> {
        self.check(FailOn::Read)?;
        self.inner.snapshot()
    }
}
