//! # StateDB Core
//!
//! Pure primitives for StateDB: namespaces, scopes, canonical paths,
//! validators, and nested-document addressing.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! path strings and JSON trees.
//!
//! ## Key Types
//!
//! - [`CanonicalPath`] - The resolved storage key for one logical location
//! - [`KeyPath`] - A path split into segments for tree traversal
//! - [`Validator`] - Acceptance rule for data already stored at a path
//! - [`UserScope`] - Public or per-identity partitioning
//!
//! ## Path Layout
//!
//! Every location resolves to `<namespace>.public[.<sub>]` or
//! `<namespace>.user.<identity>[.<sub>]`. See the [`path`] module.

pub mod error;
pub mod path;
pub mod tree;
pub mod types;
pub mod validation;

pub use error::PathError;
pub use path::{as_index, CanonicalPath, KeyPath};
pub use tree::{get_at_path, set_at_path, MAX_ARRAY_PADDING};
pub use types::{
    Identity, Namespace, SubPath, UserScope, DATABASE_NAMESPACE, DEFAULT_NAMESPACE,
    FALLBACK_IDENTITY,
};
pub use validation::{Predicate, Validator};

pub use serde_json::Value;
