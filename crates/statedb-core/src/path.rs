//! Paths: canonical storage keys and their segment form.
//!
//! A [`CanonicalPath`] is the dot-delimited string every read and write
//! against one logical location is addressed by:
//!
//! ```text
//! <namespace>.public[.<sub_path>]
//! <namespace>.user.<identity>[.<sub_path>]
//! ```
//!
//! Stores never see the string form directly; they walk a [`KeyPath`], the
//! parsed list of segments. Parsing follows the usual JavaScript property-path
//! rules: `.` separates keys, `[n]` is an index, and empty keys between dots
//! are kept.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Identity, Namespace, SubPath, UserScope};

/// Fully resolved, dot-delimited storage key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Derive the canonical path for a location.
    ///
    /// `identity` is only consulted for [`UserScope::User`]. The derivation is
    /// total: every input combination yields a path, and identical inputs
    /// always yield the identical path.
    pub fn derive(
        namespace: &Namespace,
        sub_path: &SubPath,
        scope: UserScope,
        identity: &Identity,
    ) -> Self {
        let mut path = String::with_capacity(
            namespace.as_str().len() + identity.as_str().len() + sub_path.as_str().len() + 8,
        );
        path.push_str(namespace.as_str());
        path.push('.');
        match scope {
            UserScope::User => {
                path.push_str("user.");
                path.push_str(identity.as_str());
            }
            UserScope::Public => path.push_str("public"),
        }
        if !sub_path.is_root() {
            path.push('.');
            path.push_str(sub_path.as_str());
        }
        Self(path)
    }

    /// Wrap an already-resolved path string.
    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Borrow the path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into segments for store traversal.
    pub fn key_path(&self) -> KeyPath {
        KeyPath::parse(&self.0)
    }
}

impl fmt::Debug for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalPath({})", self.0)
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A path split into its individual keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Parse a property path such as `a.b[0].c`.
    ///
    /// The empty string parses to the root path (no segments). A bracket
    /// group that is not closed is kept verbatim as a key.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        let mut segments = Vec::new();
        for part in path.split('.') {
            push_part(part, &mut segments);
        }
        Self(segments)
    }

    /// Build a path from pre-split segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split off the first segment.
    pub fn split_first(&self) -> Option<(&str, &[String])> {
        self.0
            .split_first()
            .map(|(head, rest)| (head.as_str(), rest))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Interpret a segment as an array index.
///
/// Only canonical decimal forms count: `0`, `7`, `42`, not `07` or `+1`.
pub fn as_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    match bytes {
        [] => None,
        [b'0'] => Some(0),
        [b'0', ..] => None,
        _ if bytes.iter().all(u8::is_ascii_digit) => segment.parse().ok(),
        _ => None,
    }
}

fn push_part(part: &str, out: &mut Vec<String>) {
    let Some(open) = part.find('[') else {
        out.push(part.to_string());
        return;
    };

    let (head, mut rest) = part.split_at(open);
    let mut indices = Vec::new();
    while let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                indices.push(inner[..close].to_string());
                rest = &inner[close + 1..];
            }
            None => {
                out.push(part.to_string());
                return;
            }
        }
    }
    if !rest.is_empty() {
        out.push(part.to_string());
        return;
    }

    if !head.is_empty() {
        out.push(head.to_string());
    }
    out.extend(indices);
}
