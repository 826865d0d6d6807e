//! StateDb: path-addressed, self-initializing persistence.
//!
//! StateDb brings together a key-path store, an identity provider and the
//! initializer into the operation families applications call.

use std::sync::Arc;

use serde_json::{Map, Value};
use statedb_core::{
    CanonicalPath, Identity, Namespace, SubPath, UserScope, Validator, DATABASE_NAMESPACE,
};
use statedb_store::{KeyPathStore, KeyPathStoreExt, StoreError};

use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::init::{ensure_initialized, Initialized, PathInit};
use crate::request::{GetRequest, SetRequest};
use crate::resolver::PathResolver;

/// Configuration for StateDb.
#[derive(Debug, Clone)]
pub struct StateDbConfig {
    /// Namespace used by the database-object helpers.
    pub database_namespace: Namespace,
    /// Identity user-scoped paths resolve under when nobody is signed in.
    pub fallback_identity: Identity,
}

impl Default for StateDbConfig {
    fn default() -> Self {
        Self {
            database_namespace: Namespace::new(DATABASE_NAMESPACE),
            fallback_identity: Identity::fallback(),
        }
    }
}

/// The main StateDb struct.
///
/// Provides:
/// - `set` / `set_by_user`: write a value at an initialized location
/// - `get` / `get_by_user`: read a location, initializing it on first access
/// - `database*`: fetch or clear the per-scope database object
/// - `path_init`: the underlying resolve-and-initialize step
pub struct StateDb<S: KeyPathStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Path derivation, including the identity provider.
    resolver: PathResolver,
    /// Configuration.
    config: StateDbConfig,
}

impl<S: KeyPathStore> StateDb<S> {
    /// Create a new database over `store`.
    pub fn new(
        store: S,
        identity: impl IdentityProvider + 'static,
        config: StateDbConfig,
    ) -> Self {
        Self::from_shared(Arc::new(store), Arc::new(identity), config)
    }

    /// Create a database over a store and provider shared with other owners.
    pub fn from_shared(
        store: Arc<S>,
        identity: Arc<dyn IdentityProvider>,
        config: StateDbConfig,
    ) -> Self {
        let resolver = PathResolver::new(identity, config.fallback_identity.clone());
        Self {
            store,
            resolver,
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the path resolver.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Get the configuration.
    pub fn config(&self) -> &StateDbConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution and Initialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve a location to its canonical path.
    pub fn resolve(
        &self,
        namespace: &Namespace,
        sub_path: &SubPath,
        scope: UserScope,
    ) -> CanonicalPath {
        self.resolver.resolve(namespace, sub_path, scope)
    }

    /// Ensure an already-resolved path holds acceptable data.
    pub fn ensure_initialized(
        &self,
        path: CanonicalPath,
        validator: &Validator,
        default_value: Value,
    ) -> Result<Initialized> {
        ensure_initialized(self.store.as_ref(), path, validator, default_value)
    }

    /// Resolve a location and ensure it holds acceptable data.
    pub fn path_init(&self, init: PathInit) -> Result<Initialized> {
        let path = self.resolve(&init.namespace, &init.path, init.scope);
        self.ensure_initialized(path, &init.validator, init.default_value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a value at a public location.
    pub fn set(&self, request: SetRequest) -> Result<()> {
        self.set_scoped(request, UserScope::Public)
    }

    /// Store a value at a location owned by the current identity.
    pub fn set_by_user(&self, request: SetRequest) -> Result<()> {
        self.set_scoped(request, UserScope::User)
    }

    fn set_scoped(&self, request: SetRequest, scope: UserScope) -> Result<()> {
        // Pre-initialize with "" before overwriting.
        let init = self.path_init(PathInit {
            namespace: request.namespace,
            path: request.path,
            scope,
            ..PathInit::default()
        })?;

        self.store
            .write_and_commit(&init.path.key_path(), request.value)?;
        tracing::trace!(path = %init.path, "value set");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read a public location, initializing it to the default on first access.
    pub fn get(&self, request: GetRequest) -> Result<Value> {
        self.get_scoped(request, UserScope::Public)
    }

    /// Read a location owned by the current identity, initializing it to the
    /// default on first access.
    pub fn get_by_user(&self, request: GetRequest) -> Result<Value> {
        self.get_scoped(request, UserScope::User)
    }

    fn get_scoped(&self, request: GetRequest, scope: UserScope) -> Result<Value> {
        let init = self.path_init(PathInit {
            namespace: request.namespace,
            path: request.path,
            scope,
            validator: Validator::AlwaysValid,
            default_value: request.default_value,
        })?;
        self.read_initialized(&init.path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Database Object Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// The public database object, `{}` on first access.
    pub fn database(&self) -> Result<Value> {
        self.database_object(UserScope::Public, Validator::AlwaysValid)
    }

    /// Reset the public database object to `{}` and return it.
    pub fn database_clear(&self) -> Result<Value> {
        self.database_object(UserScope::Public, Validator::NeverValid)
    }

    /// The current identity's database object, `{}` on first access.
    pub fn database_by_user(&self) -> Result<Value> {
        self.database_object(UserScope::User, Validator::AlwaysValid)
    }

    /// Reset the current identity's database object to `{}` and return it.
    pub fn database_by_user_clear(&self) -> Result<Value> {
        self.database_object(UserScope::User, Validator::NeverValid)
    }

    fn database_object(&self, scope: UserScope, validator: Validator) -> Result<Value> {
        let init = self.path_init(PathInit {
            namespace: self.config.database_namespace.clone(),
            path: SubPath::root(),
            scope,
            validator,
            default_value: Value::Object(Map::new()),
        })?;
        self.read_initialized(&init.path)
    }

    /// Read a path the initializer has just guaranteed is populated.
    fn read_initialized(&self, path: &CanonicalPath) -> Result<Value> {
        let value = self.store.read(&path.key_path())?.ok_or_else(|| {
            StoreError::InvalidData(format!("{} is empty after initialization", path))
        })?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::identity::StaticIdentity;
    use crate::init::InitOutcome;
    use serde_json::json;
    use statedb_store::MemoryStore;

    fn db(identity: StaticIdentity) -> StateDb<MemoryStore> {
        StateDb::new(MemoryStore::new(), identity, StateDbConfig::default())
    }

    #[test]
    fn test_set_then_get() {
        let db = db(StaticIdentity::new("u1"));
        db.set(SetRequest::new("db", "a.b", "x")).unwrap();

        let value = db.get(GetRequest::new("db", "a.b", "default")).unwrap();
        assert_eq!(value, json!("x"));
    }

    #[test]
    fn test_get_fixes_default_on_first_access() {
        let db = db(StaticIdentity::new("u1"));

        let first = db.get(GetRequest::new("db", "fresh", "D")).unwrap();
        let second = db.get(GetRequest::new("db", "fresh", "other")).unwrap();

        assert_eq!(first, json!("D"));
        assert_eq!(second, json!("D"));
    }

    #[test]
    fn test_set_pre_initializes_with_empty_string() {
        let db = db(StaticIdentity::new("u1"));
        db.set(SetRequest::new("db", "k", json!(5))).unwrap();

        // One commit for the "" pre-initialization, one for the value.
        assert_eq!(db.store().commit_count().unwrap(), 2);
        assert_eq!(db.get(GetRequest::new("db", "k", 0)).unwrap(), json!(5));
    }

    #[test]
    fn test_set_overwrite_does_not_reinitialize() {
        let db = db(StaticIdentity::new("u1"));
        db.set(SetRequest::new("db", "k", "first")).unwrap();
        let before = db.store().commit_count().unwrap();

        db.set(SetRequest::new("db", "k", "second")).unwrap();
        assert_eq!(db.store().commit_count().unwrap(), before + 1);
        assert_eq!(db.get(GetRequest::new("db", "k", "")).unwrap(), json!("second"));
    }

    #[test]
    fn test_user_and_public_are_independent() {
        let db = db(StaticIdentity::new("u1"));
        db.set(SetRequest::new("db", "theme", "light")).unwrap();
        db.set_by_user(SetRequest::new("db", "theme", "dark")).unwrap();

        assert_eq!(db.get(GetRequest::new("db", "theme", "")).unwrap(), json!("light"));
        assert_eq!(
            db.get_by_user(GetRequest::new("db", "theme", "")).unwrap(),
            json!("dark")
        );
        assert_eq!(
            db.store().snapshot().unwrap(),
            json!({"db": {"public": {"theme": "light"}, "user": {"u1": {"theme": "dark"}}}})
        );
    }

    #[test]
    fn test_database_lifecycle() {
        let db = db(StaticIdentity::new("u1"));
        assert_eq!(db.database().unwrap(), json!({}));

        let path = db.resolve(&"database".into(), &SubPath::root(), UserScope::Public);
        db.store()
            .write_and_commit(&path.key_path(), json!({"k": 1}))
            .unwrap();
        assert_eq!(db.database().unwrap(), json!({"k": 1}));

        assert_eq!(db.database_clear().unwrap(), json!({}));
        assert_eq!(db.database().unwrap(), json!({}));
    }

    #[test]
    fn test_database_by_user_uses_fallback() {
        let db = db(StaticIdentity::anonymous());
        assert_eq!(db.database_by_user().unwrap(), json!({}));
        assert_eq!(
            db.store().snapshot().unwrap(),
            json!({"database": {"user": {"ghost-uuid": {}}}})
        );
    }

    #[test]
    fn test_path_init_reports_outcome() {
        let db = db(StaticIdentity::new("u1"));
        let init = PathInit::new("db", "list")
            .scope(UserScope::Public)
            .validator(Validator::array())
            .default_value(json!([]));

        let first = db.path_init(init.clone()).unwrap();
        assert_eq!(first.outcome, InitOutcome::Created);
        assert_eq!(first.path.as_str(), "db.public.list");

        let second = db.path_init(init.clone()).unwrap();
        assert_eq!(second.outcome, InitOutcome::Kept);

        db.set(SetRequest::new("db", "list", "oops")).unwrap();
        let third = db.path_init(init).unwrap();
        assert_eq!(third.outcome, InitOutcome::Repaired);
        assert_eq!(db.get(GetRequest::new("db", "list", "")).unwrap(), json!([]));
    }

    #[test]
    fn test_max_index_sub_path_is_stored_as_key() {
        let db = db(StaticIdentity::new("u1"));
        db.set(SetRequest::new("db", "list[18446744073709551615]", 1)).unwrap();
        db.set(SetRequest::new("db", "big[10000000000]", 2)).unwrap();

        assert_eq!(
            db.get(GetRequest::new("db", "list[18446744073709551615]", 0)).unwrap(),
            json!(1)
        );
        assert_eq!(
            db.store().snapshot().unwrap(),
            json!({"db": {"public": {
                "list": {"18446744073709551615": 1},
                "big": {"10000000000": 2}
            }}})
        );
    }

    #[test]
    fn test_far_index_into_existing_array_is_rejected() {
        let db = db(StaticIdentity::new("u1"));
        db.set(SetRequest::new("db", "list", json!([1, 2, 3]))).unwrap();

        let err = db
            .set(SetRequest::new("db", "list[18446744073709551615]", 1))
            .unwrap_err();
        assert!(matches!(err, DbError::StoreIo(StoreError::Path(_))));
        assert_eq!(db.get(GetRequest::new("db", "list", "")).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_get_below_array_keeps_array() {
        let db = db(StaticIdentity::new("u1"));
        db.set(SetRequest::new("db", "list", json!([1, 2, 3]))).unwrap();

        let err = db.get(GetRequest::new("db", "list.name", "d")).unwrap_err();
        assert!(matches!(err, DbError::StoreIo(StoreError::Path(_))));

        assert_eq!(db.get(GetRequest::new("db", "list", "")).unwrap(), json!([1, 2, 3]));
        assert_eq!(db.get(GetRequest::new("db", "list[1]", "")).unwrap(), json!(2));
        assert_eq!(
            db.store().snapshot().unwrap(),
            json!({"db": {"public": {"list": [1, 2, 3]}}})
        );
    }

    #[test]
    fn test_custom_database_namespace() {
        let config = StateDbConfig {
            database_namespace: "app-db".into(),
            ..StateDbConfig::default()
        };
        let db = StateDb::new(MemoryStore::new(), StaticIdentity::new("u1"), config);
        db.database_by_user().unwrap();
        assert_eq!(
            db.store().snapshot().unwrap(),
            json!({"app-db": {"user": {"u1": {}}}})
        );
    }
}
