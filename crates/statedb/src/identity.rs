//! Identity providers: where the current user identifier comes from.
//!
//! The database only asks "who is the current user?" and tolerates "nobody".
//! Sessions are usually carried in a cookie, so [`CookieIdentity`] reads one
//! named cookie out of a `Cookie` header; [`StaticIdentity`] and plain
//! closures cover tests and embedded use.

use std::sync::RwLock;

/// Default cookie holding the session identifier.
pub const DEFAULT_IDENTITY_COOKIE: &str = "uuid";

/// Source of the current user identifier.
pub trait IdentityProvider: Send + Sync {
    /// The current identity, or `None` when no session is available.
    fn current_identity(&self) -> Option<String>;
}

impl<F> IdentityProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn current_identity(&self) -> Option<String> {
        self()
    }
}

/// A fixed identity, or a fixed absence of one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    /// Always report `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    /// Never report an identity.
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Reads the identity from a named cookie in a `Cookie` header.
///
/// The header can be swapped at runtime as sessions start and end.
#[derive(Debug)]
pub struct CookieIdentity {
    name: String,
    header: RwLock<String>,
}

impl CookieIdentity {
    /// Read the `uuid` cookie from `header`.
    pub fn new(header: impl Into<String>) -> Self {
        Self::with_name(DEFAULT_IDENTITY_COOKIE, header)
    }

    /// Read cookie `name` from `header`.
    pub fn with_name(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: RwLock::new(header.into()),
        }
    }

    /// Name of the cookie being read.
    pub fn cookie_name(&self) -> &str {
        &self.name
    }

    /// Replace the header, e.g. after sign-in or sign-out.
    pub fn set_header(&self, header: impl Into<String>) {
        if let Ok(mut current) = self.header.write() {
            *current = header.into();
        }
    }
}

impl IdentityProvider for CookieIdentity {
    fn current_identity(&self) -> Option<String> {
        let header = self.header.read().ok()?;
        cookie_value(&header, &self.name).map(str::to_string)
    }
}

/// Extract the value of cookie `name` from a `Cookie` header.
///
/// Pairs are `;`-separated, whitespace around names and values is ignored,
/// and surrounding double quotes are stripped. Empty values count as absent.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
        .filter(|value| !value.is_empty())
}
