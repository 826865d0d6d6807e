//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use statedb::{StateDb, StateDbConfig, StaticIdentity};
use statedb_core::{Namespace, SubPath, UserScope};
use statedb_store::MemoryStore;

/// Generate a namespace name.
pub fn namespace() -> impl Strategy<Value = Namespace> {
    "[a-z][a-z0-9_-]{0,15}".prop_map(Namespace::from)
}

/// Generate a dotted sub-path of one to four plain segments.
pub fn sub_path() -> impl Strategy<Value = SubPath> {
    prop::collection::vec("[a-z][a-z0-9]{0,7}", 1..=4)
        .prop_map(|segments| SubPath::from(segments.join(".")))
}

/// Generate a sub-path mixing keys, dotted indices, and bracketed indices,
/// such as `items[2].name` or `grid.0[1]`.
pub fn indexed_sub_path() -> impl Strategy<Value = SubPath> {
    let piece = prop_oneof![
        "[a-z]{1,6}".prop_map(|key| (key, false)),
        (0usize..8, any::<bool>()).prop_map(|(index, bracket)| (index.to_string(), bracket)),
    ];
    prop::collection::vec(piece, 1..=5).prop_map(|pieces| {
        let mut path = String::new();
        for (i, (segment, bracket)) in pieces.into_iter().enumerate() {
            if bracket && i > 0 {
                path.push('[');
                path.push_str(&segment);
                path.push(']');
            } else {
                if i > 0 {
                    path.push('.');
                }
                path.push_str(&segment);
            }
        }
        SubPath::from(path)
    })
}

/// Generate an identity string.
pub fn identity() -> impl Strategy<Value = String> {
    "[a-f0-9]{8}(-[a-f0-9]{4}){0,2}".prop_map(String::from)
}

/// Generate a scope.
pub fn scope() -> impl Strategy<Value = UserScope> {
    prop_oneof![Just(UserScope::Public), Just(UserScope::User)]
}

/// Generate an arbitrary JSON value, nested up to three levels.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Parameters for addressing one location.
#[derive(Debug, Clone)]
pub struct LocationParams {
    pub namespace: Namespace,
    pub sub_path: SubPath,
    pub scope: UserScope,
    pub identity: Option<String>,
}

impl Arbitrary for LocationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (namespace(), sub_path(), scope(), prop::option::of(identity()))
            .prop_map(|(namespace, sub_path, scope, identity)| LocationParams {
                namespace,
                sub_path,
                scope,
                identity,
            })
            .boxed()
    }
}

/// Build an in-memory database signed in as the params' identity.
pub fn db_from_params(params: &LocationParams) -> StateDb<MemoryStore> {
    let identity = match &params.identity {
        Some(id) => StaticIdentity::new(id.clone()),
        None => StaticIdentity::anonymous(),
    };
    StateDb::new(MemoryStore::new(), identity, StateDbConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::test_runner::TestCaseError;
    use statedb::{DbError, GetRequest, SetRequest};
    use statedb_core::{KeyPath, FALLBACK_IDENTITY};
    use statedb_store::{KeyPathStore, SqliteStore, StoreError};

    /// JSON without floats, which SQLite text storage may round by one ulp.
    fn stored_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[ -~]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(2, 16, 3, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..3)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    fn db_on<S: KeyPathStore>(store: S) -> StateDb<S> {
        StateDb::new(store, StaticIdentity::new("u1"), StateDbConfig::default())
    }

    fn check_set_then_get<S: KeyPathStore>(
        store: S,
        path: &SubPath,
        value: &Value,
    ) -> Result<(), TestCaseError> {
        let db = db_on(store);
        db.set(SetRequest::new("db", path.clone(), value.clone()))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let got = db
            .get(GetRequest::new("db", path.clone(), "unused"))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&got, value);
        Ok(())
    }

    fn overlaps(a: &SubPath, b: &SubPath) -> bool {
        let a = KeyPath::parse(a.as_str());
        let b = KeyPath::parse(b.as_str());
        a.segments().starts_with(b.segments()) || b.segments().starts_with(a.segments())
    }

    /// Writing `b` never disturbs an unrelated value at `a`. A rejected write
    /// leaves the tree exactly as it was.
    fn check_sibling_survives<S: KeyPathStore>(
        store: S,
        (a, first): (&SubPath, &Value),
        (b, second): (&SubPath, &Value),
    ) -> Result<(), TestCaseError> {
        let db = db_on(store);
        db.set(SetRequest::new("db", a.clone(), first.clone()))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let before = db
            .store()
            .snapshot()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        match db.set(SetRequest::new("db", b.clone(), second.clone())) {
            Ok(()) => {
                let got = db
                    .get(GetRequest::new("db", b.clone(), "unused"))
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(&got, second);
                if !overlaps(a, b) {
                    let kept = db
                        .get(GetRequest::new("db", a.clone(), "unused"))
                        .map_err(|e| TestCaseError::fail(e.to_string()))?;
                    prop_assert_eq!(&kept, first);
                }
            }
            Err(DbError::StoreIo(StoreError::Path(_))) => {
                let after = db
                    .store()
                    .snapshot()
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(after, before);
            }
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn test_resolution_deterministic(params: LocationParams) {
            let db = db_from_params(&params);

            let p1 = db.resolve(&params.namespace, &params.sub_path, params.scope);
            let p2 = db.resolve(&params.namespace, &params.sub_path, params.scope);

            prop_assert_eq!(p1, p2);
        }

        #[test]
        fn test_resolution_shape(params: LocationParams) {
            let db = db_from_params(&params);
            let path = db.resolve(&params.namespace, &params.sub_path, params.scope);

            let prefix = match (params.scope, &params.identity) {
                (UserScope::Public, _) => format!("{}.public", params.namespace),
                (UserScope::User, Some(id)) => format!("{}.user.{}", params.namespace, id),
                (UserScope::User, None) => {
                    format!("{}.user.{}", params.namespace, FALLBACK_IDENTITY)
                }
            };
            prop_assert_eq!(path.as_str(), format!("{}.{}", prefix, params.sub_path));
        }

        #[test]
        fn test_set_then_get_in_any_scope(
            params in any::<LocationParams>(),
            value in json_value(),
        ) {
            let db = db_from_params(&params);
            let set = SetRequest {
                namespace: params.namespace.clone(),
                path: params.sub_path.clone(),
                value: value.clone(),
            };
            let get = GetRequest {
                namespace: params.namespace.clone(),
                path: params.sub_path.clone(),
                ..GetRequest::default()
            };

            let got = match params.scope {
                UserScope::Public => {
                    db.set(set).unwrap();
                    db.get(get).unwrap()
                }
                UserScope::User => {
                    db.set_by_user(set).unwrap();
                    db.get_by_user(get).unwrap()
                }
            };
            prop_assert_eq!(got, value);
        }

        #[test]
        fn test_indexed_set_then_get_on_both_stores(
            path in indexed_sub_path(),
            value in stored_value(),
        ) {
            check_set_then_get(MemoryStore::new(), &path, &value)?;
            check_set_then_get(SqliteStore::open_memory().unwrap(), &path, &value)?;
        }

        #[test]
        fn test_indexed_writes_keep_siblings_on_both_stores(
            a in indexed_sub_path(),
            b in indexed_sub_path(),
            first in stored_value(),
            second in stored_value(),
        ) {
            check_sibling_survives(MemoryStore::new(), (&a, &first), (&b, &second))?;
            check_sibling_survives(
                SqliteStore::open_memory().unwrap(),
                (&a, &first),
                (&b, &second),
            )?;
        }

        #[test]
        fn test_indexed_paths_parse_to_their_pieces(path in indexed_sub_path()) {
            let parsed = KeyPath::parse(path.as_str());
            let expected: Vec<String> = path
                .as_str()
                .split(|c| c == '.' || c == '[' || c == ']')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            prop_assert_eq!(parsed.segments(), expected.as_slice());
        }

        #[test]
        fn test_different_identities_different_paths(
            ns in namespace(),
            path in sub_path(),
            a in identity(),
            b in identity(),
        ) {
            prop_assume!(a != b);

            let pa = db_from_params(&LocationParams {
                namespace: ns.clone(),
                sub_path: path.clone(),
                scope: UserScope::User,
                identity: Some(a),
            })
            .resolve(&ns, &path, UserScope::User);
            let pb = db_from_params(&LocationParams {
                namespace: ns.clone(),
                sub_path: path.clone(),
                scope: UserScope::User,
                identity: Some(b),
            })
            .resolve(&ns, &path, UserScope::User);

            prop_assert_ne!(pa, pb);
        }
    }
}
