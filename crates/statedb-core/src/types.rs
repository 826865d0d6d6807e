//! Strong type definitions for StateDB.
//!
//! Namespaces, sub-paths and identities are all strings on the wire. They are
//! newtypes here so a sub-path can never be passed where a namespace belongs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace used when the caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "db";

/// Namespace reserved for the "database object" helpers.
pub const DATABASE_NAMESPACE: &str = "database";

/// Identity used when no session identity is available.
pub const FALLBACK_IDENTITY: &str = "ghost-uuid";

/// Top-level grouping key for related stored data.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Create a namespace from any string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the namespace as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_string())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dot-delimited field location inside a namespace and scope.
///
/// The empty sub-path addresses the scope root itself.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubPath(String);

impl SubPath {
    /// Create a sub-path from any string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The empty sub-path.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Borrow the sub-path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this sub-path addresses the scope root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubPath({:?})", self.0)
    }
}

impl fmt::Display for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A user identifier as reported by the identity provider.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Create an identity from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The sentinel identity used when nobody is signed in.
    pub fn fallback() -> Self {
        Self(FALLBACK_IDENTITY.to_string())
    }

    /// Borrow the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Whether data is shared publicly or partitioned per identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserScope {
    /// Stored under `<namespace>.public`.
    Public,
    /// Stored under `<namespace>.user.<identity>`.
    User,
}

impl UserScope {
    /// True for the per-identity scope.
    pub fn is_user(self) -> bool {
        matches!(self, UserScope::User)
    }
}

impl From<bool> for UserScope {
    fn from(by_user: bool) -> Self {
        if by_user {
            UserScope::User
        } else {
            UserScope::Public
        }
    }
}
