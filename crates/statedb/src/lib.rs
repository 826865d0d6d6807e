//! # StateDB
//!
//! Path-addressed, self-initializing persistence for application state.
//!
//! ## Overview
//!
//! StateDB stores arbitrary JSON under a namespace, either publicly or
//! partitioned by the current user's identity. Every access first makes sure
//! the location holds acceptable data, writing a default when it is missing
//! or fails validation, so callers never see "not found".
//!
//! - **Set / Get**: write and read values at public locations
//! - **By user**: the same operations partitioned by identity
//! - **Database object**: a per-scope `{}` under a fixed namespace, with clear
//!
//! ## Key Concepts
//!
//! - **Canonical path**: `<namespace>.public.<sub>` or
//!   `<namespace>.user.<identity>.<sub>`
//! - **Identity fallback**: anonymous callers resolve under `ghost-uuid`
//! - **Validator**: decides whether stored data is kept or replaced
//! - **Forced clear**: a validator that rejects everything
//!
//! ## Usage
//!
//! ```rust,no_run
//! use statedb::{GetRequest, SetRequest, StateDb, StateDbConfig, StaticIdentity};
//! use statedb::store::SqliteStore;
//!
//! fn example() -> statedb::Result<()> {
//!     // Open storage
//!     let store = SqliteStore::open("state.db")?;
//!
//!     // Create the database
//!     let db = StateDb::new(store, StaticIdentity::new("user-1"), StateDbConfig::default());
//!
//!     // Write and read a public value
//!     db.set(SetRequest::new("db", "ui.theme", "dark"))?;
//!     let theme = db.get(GetRequest::new("db", "ui.theme", "light"))?;
//!     assert_eq!(theme, "dark");
//!
//!     // Reset the current user's database object
//!     let cleared = db.database_by_user_clear()?;
//!     assert!(cleared.as_object().map_or(false, |o| o.is_empty()));
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `statedb::core` - Paths, scopes and validators
//! - `statedb::store` - Storage abstraction, SQLite and in-memory stores

pub mod db;
pub mod error;
pub mod identity;
pub mod init;
pub mod request;
pub mod resolver;
pub mod shared;

// Re-export component crates
pub use statedb_core as core;
pub use statedb_store as store;

// Re-export main types for convenience
pub use db::{StateDb, StateDbConfig};
pub use error::{DbError, Result};
pub use identity::{CookieIdentity, IdentityProvider, StaticIdentity};
pub use init::{ensure_initialized, InitOutcome, Initialized, PathInit};
pub use request::{GetRequest, SetRequest};
pub use resolver::PathResolver;
pub use shared::SharedStateDb;

// Re-export commonly used core types
pub use statedb_core::{
    CanonicalPath, Identity, KeyPath, Namespace, SubPath, UserScope, Validator, Value,
};
