//! Async handle over a shared StateDb.
//!
//! StateDb calls are synchronous. When the store is disk-backed they block
//! on I/O, so async callers go through [`SharedStateDb`], which runs each
//! call on tokio's blocking pool.

use std::sync::Arc;

use serde_json::Value;

use statedb_store::KeyPathStore;

use crate::db::StateDb;
use crate::error::{DbError, Result};
use crate::init::{Initialized, PathInit};
use crate::request::{GetRequest, SetRequest};

/// Cloneable async handle to a [`StateDb`].
pub struct SharedStateDb<S: KeyPathStore + 'static> {
    db: Arc<StateDb<S>>,
}

impl<S: KeyPathStore + 'static> Clone for SharedStateDb<S> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

impl<S: KeyPathStore + 'static> SharedStateDb<S> {
    /// Wrap a database for async use.
    pub fn new(db: StateDb<S>) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Borrow the synchronous database.
    pub fn inner(&self) -> &StateDb<S> {
        &self.db
    }

    /// Async [`StateDb::path_init`].
    pub async fn path_init(&self, init: PathInit) -> Result<Initialized> {
        self.run(move |db| db.path_init(init)).await
    }

    /// Async [`StateDb::set`].
    pub async fn set(&self, request: SetRequest) -> Result<()> {
        self.run(move |db| db.set(request)).await
    }

    /// Async [`StateDb::set_by_user`].
    pub async fn set_by_user(&self, request: SetRequest) -> Result<()> {
        self.run(move |db| db.set_by_user(request)).await
    }

    /// Async [`StateDb::get`].
    pub async fn get(&self, request: GetRequest) -> Result<Value> {
        self.run(move |db| db.get(request)).await
    }

    /// Async [`StateDb::get_by_user`].
    pub async fn get_by_user(&self, request: GetRequest) -> Result<Value> {
        self.run(move |db| db.get_by_user(request)).await
    }

    /// Async [`StateDb::database`].
    pub async fn database(&self) -> Result<Value> {
        self.run(|db| db.database()).await
    }

    /// Async [`StateDb::database_clear`].
    pub async fn database_clear(&self) -> Result<Value> {
        self.run(|db| db.database_clear()).await
    }

    /// Async [`StateDb::database_by_user`].
    pub async fn database_by_user(&self) -> Result<Value> {
        self.run(|db| db.database_by_user()).await
    }

    /// Async [`StateDb::database_by_user_clear`].
    pub async fn database_by_user_clear(&self) -> Result<Value> {
        self.run(|db| db.database_by_user_clear()).await
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StateDb<S>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| DbError::Task(e.to_string()))?
    }
}

impl<S: KeyPathStore + 'static> From<StateDb<S>> for SharedStateDb<S> {
    fn from(db: StateDb<S>) -> Self {
        Self::new(db)
    }
}
