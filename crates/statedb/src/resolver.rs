//! PathResolver: turns (namespace, sub-path, scope) into a canonical path.

use std::fmt;
use std::sync::Arc;

use statedb_core::{CanonicalPath, Identity, Namespace, SubPath, UserScope};

use crate::identity::IdentityProvider;

/// Derives canonical paths, consulting the identity provider for user scope.
///
/// Resolution is total. When the provider reports no identity (or an empty
/// one) the fallback identity is used, so anonymous callers share one stable
/// per-user partition.
#[derive(Clone)]
pub struct PathResolver {
    provider: Arc<dyn IdentityProvider>,
    fallback: Identity,
}

impl PathResolver {
    /// Create a resolver over `provider` with the given fallback identity.
    pub fn new(provider: Arc<dyn IdentityProvider>, fallback: Identity) -> Self {
        Self { provider, fallback }
    }

    /// The identity user-scoped paths resolve under right now.
    pub fn current_identity(&self) -> Identity {
        match self.provider.current_identity() {
            Some(id) if !id.is_empty() => Identity::new(id),
            _ => {
                tracing::debug!(fallback = %self.fallback, "no identity available, using fallback");
                self.fallback.clone()
            }
        }
    }

    /// The identity used when no session is available.
    pub fn fallback_identity(&self) -> &Identity {
        &self.fallback
    }

    /// Resolve a location to its canonical path.
    pub fn resolve(
        &self,
        namespace: &Namespace,
        sub_path: &SubPath,
        scope: UserScope,
    ) -> CanonicalPath {
        match scope {
            UserScope::User => {
                let identity = self.current_identity();
                CanonicalPath::derive(namespace, sub_path, scope, &identity)
            }
            UserScope::Public => CanonicalPath::derive(namespace, sub_path, scope, &self.fallback),
        }
    }
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathResolver")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
