//! # StateDB Store
//!
//! Storage abstraction for StateDB. Provides a trait-based interface for a
//! JSON tree addressed by key paths, with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts persistence behind the [`KeyPathStore`] trait,
//! allowing the database layer to be storage-agnostic. The persistent
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`KeyPathStore`] - The trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use statedb_core::KeyPath;
//! use statedb_store::{KeyPathStore, KeyPathStoreExt, SqliteStore};
//!
//! let store = SqliteStore::open("state.db").unwrap();
//! let path = KeyPath::parse("db.public.theme");
//! store.write_and_commit(&path, "dark".into()).unwrap();
//! assert_eq!(store.read(&path).unwrap(), Some("dark".into()));
//! ```
//!
//! ## Design Notes
//!
//! - **Staged writes**: reads see writes immediately; `commit` makes them durable
//! - **Atomic commit**: all staged namespaces are flushed in one transaction
//! - **One row per namespace**: the first path segment selects the SQLite row

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyPathStore, KeyPathStoreExt};
