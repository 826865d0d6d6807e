//! Nested-document helpers: read and write a JSON tree by [`KeyPath`].
//!
//! Both store backends keep data as one JSON tree (or one tree per
//! namespace) and address into it with these two functions, so nested
//! addressing behaves identically everywhere.

use serde_json::{Map, Value};

use crate::error::PathError;
use crate::path::{as_index, KeyPath};

/// Look up the value at `path`.
///
/// Objects are indexed by key, arrays by decimal index. Any other node on the
/// way, or a missing key, yields `None`. A stored `null` is a present value.
pub fn get_at_path<'a>(root: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, key| match node {
            Value::Object(map) => map.get(key),
            Value::Array(items) => as_index(key).and_then(|index| items.get(index)),
            _ => None,
        })
}

/// Most `null` slots one write may append to an array.
///
/// A fresh intermediate is only created as an array when the index below it
/// is within this bound; larger indices become object keys.
pub const MAX_ARRAY_PADDING: usize = 1024;

/// Write `value` at `path`, creating intermediate containers.
///
/// A missing or scalar intermediate becomes an array when the key below it is
/// a small index and an object otherwise. Existing containers are kept: a
/// non-index key, or an index more than [`MAX_ARRAY_PADDING`] past the end,
/// addressed into an existing array is a [`PathError`]. Errors are raised
/// before the tree is modified. The root path replaces the whole tree.
pub fn set_at_path(root: &mut Value, path: &KeyPath, value: Value) -> Result<(), PathError> {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for (depth, key) in parents.iter().enumerate() {
        let child = slot(node, key)?;
        if !(child.is_object() || child.is_array()) {
            *child = empty_container_for(&segments[depth + 1]);
        }
        node = child;
    }
    *slot(node, last)? = value;
    Ok(())
}

fn empty_container_for(next: &str) -> Value {
    match as_index(next) {
        Some(index) if index <= MAX_ARRAY_PADDING => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}

/// Validate `key` as a position in an array of length `len`.
fn array_index(len: usize, key: &str) -> Result<usize, PathError> {
    let index = as_index(key).ok_or_else(|| PathError::KeyInArray {
        key: key.to_string(),
    })?;
    if index > len.saturating_add(MAX_ARRAY_PADDING) {
        return Err(PathError::IndexTooFar { index, len });
    }
    Ok(index)
}

/// Mutable reference to `node[key]`, inserting `null` if absent.
///
/// A scalar `node` is replaced by an object first. Nothing is modified when
/// an error is returned, and every node below a modified one is fresh, so a
/// failing walk leaves the tree untouched.
fn slot<'a>(node: &'a mut Value, key: &str) -> Result<&'a mut Value, PathError> {
    if !(node.is_object() || node.is_array()) {
        *node = Value::Object(Map::new());
    }
    let index = match node.as_array() {
        Some(items) => Some(array_index(items.len(), key)?),
        None => None,
    };

    match (node, index) {
        (Value::Array(items), Some(index)) => {
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            Ok(&mut items[index])
        }
        (Value::Object(map), _) => Ok(map.entry(key.to_string()).or_insert(Value::Null)),
        _ => Err(PathError::KeyInArray {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(s: &str) -> KeyPath {
        KeyPath::parse(s)
    }

    #[test]
    fn test_get_nested() {
        let doc = json!({"db": {"public": {"a": {"b": "x"}}}});
        assert_eq!(get_at_path(&doc, &p("db.public.a.b")), Some(&json!("x")));
        assert_eq!(get_at_path(&doc, &p("db.public.a")), Some(&json!({"b": "x"})));
        assert_eq!(get_at_path(&doc, &p("db.public.missing")), None);
        assert_eq!(get_at_path(&doc, &p("db.public.a.b.c")), None);
    }

    #[test]
    fn test_get_root() {
        let doc = json!({"k": 1});
        assert_eq!(get_at_path(&doc, &KeyPath::root()), Some(&doc));
    }

    #[test]
    fn test_get_array_index() {
        let doc = json!({"list": [10, 20, 30]});
        assert_eq!(get_at_path(&doc, &p("list[1]")), Some(&json!(20)));
        assert_eq!(get_at_path(&doc, &p("list.2")), Some(&json!(30)));
        assert_eq!(get_at_path(&doc, &p("list[3]")), None);
        assert_eq!(get_at_path(&doc, &p("list.x")), None);
    }

    #[test]
    fn test_null_is_present() {
        let doc = json!({"k": null});
        assert_eq!(get_at_path(&doc, &p("k")), Some(&Value::Null));
    }

    #[test]
    fn test_set_creates_objects() {
        let mut doc = json!({});
        set_at_path(&mut doc, &p("db.public.a.b"), json!("x")).unwrap();
        assert_eq!(doc, json!({"db": {"public": {"a": {"b": "x"}}}}));
    }

    #[test]
    fn test_set_keeps_siblings() {
        let mut doc = json!({"db": {"public": {"a": 1}}});
        set_at_path(&mut doc, &p("db.public.b"), json!(2)).unwrap();
        assert_eq!(doc, json!({"db": {"public": {"a": 1, "b": 2}}}));
    }

    #[test]
    fn test_set_creates_array_for_index() {
        let mut doc = json!({});
        set_at_path(&mut doc, &p("items[2].name"), json!("c")).unwrap();
        assert_eq!(doc, json!({"items": [null, null, {"name": "c"}]}));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let mut doc = json!({"db": {"public": ""}});
        set_at_path(&mut doc, &p("db.public.a"), json!(true)).unwrap();
        assert_eq!(doc, json!({"db": {"public": {"a": true}}}));
    }

    #[test]
    fn test_set_object_key_on_array_is_rejected() {
        let mut doc = json!({"a": [1, 2]});
        let err = set_at_path(&mut doc, &p("a.name"), json!("n")).unwrap_err();
        assert_eq!(err, PathError::KeyInArray { key: "name".into() });
        assert_eq!(doc, json!({"a": [1, 2]}));

        let err = set_at_path(&mut doc, &p("a.name.deeper"), json!("n")).unwrap_err();
        assert!(matches!(err, PathError::KeyInArray { .. }));
        assert_eq!(doc, json!({"a": [1, 2]}));
    }

    #[test]
    fn test_set_index_on_array_keeps_items() {
        let mut doc = json!({"a": [1, 2]});
        set_at_path(&mut doc, &p("a[1]"), json!(20)).unwrap();
        set_at_path(&mut doc, &p("a[3]"), json!(4)).unwrap();
        assert_eq!(doc, json!({"a": [1, 20, null, 4]}));
    }

    #[test]
    fn test_set_max_index_on_fresh_path_is_key() {
        let mut doc = json!({});
        set_at_path(&mut doc, &p("list[18446744073709551615]"), json!(1)).unwrap();
        set_at_path(&mut doc, &p("big[10000000000].x"), json!(2)).unwrap();
        assert_eq!(
            doc,
            json!({
                "list": {"18446744073709551615": 1},
                "big": {"10000000000": {"x": 2}}
            })
        );
        assert_eq!(
            get_at_path(&doc, &p("list[18446744073709551615]")),
            Some(&json!(1))
        );
    }

    #[test]
    fn test_set_far_index_on_existing_array_is_rejected() {
        let mut doc = json!({"list": [0]});
        for path in ["list[18446744073709551615]", "list[10000000000]", "list[1026]"] {
            let err = set_at_path(&mut doc, &p(path), json!(1)).unwrap_err();
            assert!(matches!(err, PathError::IndexTooFar { len: 1, .. }), "{}", path);
        }
        assert_eq!(doc, json!({"list": [0]}));

        set_at_path(&mut doc, &p("list[1025]"), json!(1)).unwrap();
        assert_eq!(doc["list"].as_array().map(Vec::len), Some(1026));
    }

    #[test]
    fn test_set_index_on_object_is_key() {
        let mut doc = json!({"a": {}});
        set_at_path(&mut doc, &p("a.0"), json!("zero")).unwrap();
        assert_eq!(doc, json!({"a": {"0": "zero"}}));
    }

    #[test]
    fn test_set_root_replaces() {
        let mut doc = json!({"old": true});
        set_at_path(&mut doc, &KeyPath::root(), json!({"new": true})).unwrap();
        assert_eq!(doc, json!({"new": true}));
    }

    #[test]
    fn test_set_then_get() {
        let mut doc = Value::Null;
        set_at_path(&mut doc, &p("database.user.u1"), json!({})).unwrap();
        assert_eq!(get_at_path(&doc, &p("database.user.u1")), Some(&json!({})));
    }
}
