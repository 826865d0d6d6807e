//! Request types for the set and get operation families.

use serde_json::Value;
use statedb_core::{Namespace, SubPath};

/// Arguments for `set` / `set_by_user`.
///
/// Defaults: namespace `"db"`, root sub-path, value `""`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRequest {
    /// Top-level grouping key.
    pub namespace: Namespace,
    /// Location within the namespace and scope.
    pub path: SubPath,
    /// Value to store.
    pub value: Value,
}

impl Default for SetRequest {
    fn default() -> Self {
        Self {
            namespace: Namespace::default(),
            path: SubPath::root(),
            value: Value::String(String::new()),
        }
    }
}

impl SetRequest {
    /// Store `value` at `path` inside `namespace`.
    pub fn new(
        namespace: impl Into<Namespace>,
        path: impl Into<SubPath>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Arguments for `get` / `get_by_user`.
///
/// Defaults: namespace `"db"`, root sub-path, default value `""`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    /// Top-level grouping key.
    pub namespace: Namespace,
    /// Location within the namespace and scope.
    pub path: SubPath,
    /// Stored and returned if the location is empty on first access.
    pub default_value: Value,
}

impl Default for GetRequest {
    fn default() -> Self {
        Self {
            namespace: Namespace::default(),
            path: SubPath::root(),
            default_value: Value::String(String::new()),
        }
    }
}

impl GetRequest {
    /// Read `path` inside `namespace`, initializing it to `default_value`.
    pub fn new(
        namespace: impl Into<Namespace>,
        path: impl Into<SubPath>,
        default_value: impl Into<Value>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            default_value: default_value.into(),
        }
    }
}
