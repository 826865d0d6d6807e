//! Initializer: guarantees a path holds acceptable data before it is used.
//!
//! Every operation funnels through [`ensure_initialized`]. Per path the
//! states are:
//!
//! ```text
//! Uninitialized --first access--------------> Valid (default written)
//! Valid         --mutation------------------> Valid (never re-validated)
//! Invalid       --next access---------------> Valid (default rewritten)
//! any           --access with NeverValid----> Valid (default, forced clear)
//! ```

use serde_json::Value;
use statedb_core::{CanonicalPath, Namespace, SubPath, UserScope, Validator};
use statedb_store::{KeyPathStore, KeyPathStoreExt};

use crate::error::Result;

/// What the initializer found at a path and did about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A value was present and accepted; nothing was written.
    Kept,
    /// Nothing was stored; the default was written.
    Created,
    /// The stored value was rejected; the default was written over it.
    Repaired,
}

impl InitOutcome {
    /// True when the default was written.
    pub fn wrote_default(self) -> bool {
        !matches!(self, InitOutcome::Kept)
    }
}

/// A path that is known to hold acceptable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initialized {
    /// The canonical path, unchanged from the input.
    pub path: CanonicalPath,
    /// What the initializer did.
    pub outcome: InitOutcome,
}

/// Parameters for resolving and initializing one location.
///
/// Defaults: namespace `"db"`, root sub-path, [`UserScope::User`],
/// [`Validator::AlwaysValid`], default value `""`.
#[derive(Debug, Clone)]
pub struct PathInit {
    /// Top-level grouping key.
    pub namespace: Namespace,
    /// Location within the namespace and scope.
    pub path: SubPath,
    /// Public or per-identity.
    pub scope: UserScope,
    /// Acceptance rule for data already present.
    pub validator: Validator,
    /// Written when data is missing or rejected.
    pub default_value: Value,
}

impl Default for PathInit {
    fn default() -> Self {
        Self {
            namespace: Namespace::default(),
            path: SubPath::root(),
            scope: UserScope::User,
            validator: Validator::AlwaysValid,
            default_value: Value::String(String::new()),
        }
    }
}

impl PathInit {
    /// Initialize `path` inside `namespace` with the remaining defaults.
    pub fn new(namespace: impl Into<Namespace>, path: impl Into<SubPath>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the scope.
    pub fn scope(mut self, scope: UserScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the validator.
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }
}

/// Ensure `path` holds data accepted by `validator`.
///
/// Reads the current value. If nothing is stored, or `validator` rejects it,
/// writes `default_value` and commits. Otherwise performs no write. The path
/// is returned unchanged either way.
pub fn ensure_initialized<S>(
    store: &S,
    path: CanonicalPath,
    validator: &Validator,
    default_value: Value,
) -> Result<Initialized>
where
    S: KeyPathStore + ?Sized,
{
    let key = path.key_path();

    let outcome = match store.read(&key)? {
        Some(current) if validator.accepts(&current) => InitOutcome::Kept,
        Some(_) => InitOutcome::Repaired,
        None => InitOutcome::Created,
    };

    if outcome.wrote_default() {
        store.write_and_commit(&key, default_value)?;
        tracing::debug!(
            %path,
            ?outcome,
            clear = validator.is_clear(),
            "path initialized"
        );
    }

    Ok(Initialized { path, outcome })
}
