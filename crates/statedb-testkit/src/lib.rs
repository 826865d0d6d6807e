//! # StateDB Testkit
//!
//! Testing utilities for StateDB.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Scenario vectors**: Operation sequences with expected results and final trees
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//! - **Failing store**: A store double that injects I/O failures
//!
//! ## Scenario Vectors
//!
//! Scenario vectors pin down the persisted layout for every store backend:
//!
//! ```rust
//! use statedb_store::MemoryStore;
//! use statedb_testkit::vectors::verify_all_vectors;
//!
//! for (name, passed, detail) in verify_all_vectors(MemoryStore::new) {
//!     assert!(passed, "{}: {}", name, detail);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use statedb_testkit::generators::{db_from_params, LocationParams};
//!
//! proptest! {
//!     #[test]
//!     fn resolution_is_deterministic(params: LocationParams) {
//!         let db = db_from_params(&params);
//!         let a = db.resolve(&params.namespace, &params.sub_path, params.scope);
//!         let b = db.resolve(&params.namespace, &params.sub_path, params.scope);
//!         prop_assert_eq!(a, b);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use statedb_core::UserScope;
//! use statedb_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.seed("db", "theme", UserScope::Public, "dark".into());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_user_fixtures, FailOn, FailingStore, TestFixture, TEST_IDENTITY};
pub use generators::{db_from_params, indexed_sub_path, LocationParams};
pub use vectors::{all_vectors, run_vector, verify_all_vectors, ScenarioVector};
