//! Scenario vectors for deterministic verification.
//!
//! Each vector is a sequence of operations against a fresh store, the value
//! every step must return, and the tree left behind. Any store backend must
//! reproduce them exactly.

use serde_json::{json, Value};

use statedb::{GetRequest, Result, SetRequest, StateDb, StateDbConfig, StaticIdentity};
use statedb_store::KeyPathStore;

/// One operation in a scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Set(&'static str, &'static str, Value),
    SetByUser(&'static str, &'static str, Value),
    Get(&'static str, &'static str, Value),
    GetByUser(&'static str, &'static str, Value),
    Database,
    DatabaseClear,
    DatabaseByUser,
    DatabaseByUserClear,
}

/// A step: the operation and what it must return.
///
/// Mutations return nothing; their `expect` is `None`.
#[derive(Debug, Clone)]
pub struct Step {
    pub op: Op,
    pub expect: Option<Value>,
}

/// A scenario vector.
#[derive(Debug, Clone)]
pub struct ScenarioVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Signed-in identity, `None` for anonymous.
    pub identity: Option<&'static str>,
    /// Operations, in order.
    pub steps: Vec<Step>,
    /// Expected tree after the last step.
    pub expected_tree: Value,
}

fn mutate(op: Op) -> Step {
    Step { op, expect: None }
}

fn query(op: Op, expect: Value) -> Step {
    Step {
        op,
        expect: Some(expect),
    }
}

/// Get all scenario vectors.
pub fn all_vectors() -> Vec<ScenarioVector> {
    vec![
        ScenarioVector {
            name: "set then get",
            identity: Some("u1"),
            steps: vec![
                mutate(Op::Set("db", "a.b", json!("x"))),
                query(Op::Get("db", "a.b", json!("default")), json!("x")),
            ],
            expected_tree: json!({"db": {"public": {"a": {"b": "x"}}}}),
        },
        ScenarioVector {
            name: "first default is kept",
            identity: Some("u1"),
            steps: vec![
                query(Op::Get("db", "fresh", json!("D")), json!("D")),
                query(Op::Get("db", "fresh", json!("other")), json!("D")),
            ],
            expected_tree: json!({"db": {"public": {"fresh": "D"}}}),
        },
        ScenarioVector {
            name: "public and user are separate",
            identity: Some("u1"),
            steps: vec![
                mutate(Op::Set("prefs", "theme", json!("light"))),
                mutate(Op::SetByUser("prefs", "theme", json!("dark"))),
                query(Op::Get("prefs", "theme", json!("")), json!("light")),
                query(Op::GetByUser("prefs", "theme", json!("")), json!("dark")),
            ],
            expected_tree: json!({"prefs": {
                "public": {"theme": "light"},
                "user": {"u1": {"theme": "dark"}}
            }}),
        },
        ScenarioVector {
            name: "anonymous user data lands under the fallback",
            identity: None,
            steps: vec![
                mutate(Op::SetByUser("db", "cart[0]", json!({"sku": 7}))),
                query(Op::GetByUser("db", "cart", json!([])), json!([{"sku": 7}])),
            ],
            expected_tree: json!({"db": {"user": {"ghost-uuid": {"cart": [{"sku": 7}]}}}}),
        },
        ScenarioVector {
            name: "database object lifecycle",
            identity: Some("u1"),
            steps: vec![
                query(Op::Database, json!({})),
                mutate(Op::Set("database", "k", json!(1))),
                query(Op::Database, json!({"k": 1})),
                query(Op::DatabaseClear, json!({})),
                query(Op::Database, json!({})),
            ],
            expected_tree: json!({"database": {"public": {}}}),
        },
        ScenarioVector {
            name: "user database object clear leaves public alone",
            identity: Some("u2"),
            steps: vec![
                mutate(Op::Set("database", "shared", json!(true))),
                mutate(Op::SetByUser("database", "mine", json!(true))),
                query(Op::DatabaseByUser, json!({"mine": true})),
                query(Op::DatabaseByUserClear, json!({})),
                query(Op::Database, json!({"shared": true})),
            ],
            expected_tree: json!({"database": {
                "public": {"shared": true},
                "user": {"u2": {}}
            }}),
        },
    ]
}

/// Run one operation.
pub fn apply<S: KeyPathStore>(db: &StateDb<S>, op: &Op) -> Result<Option<Value>> {
    let value = match op {
        Op::Set(ns, path, value) => {
            db.set(SetRequest::new(*ns, *path, value.clone()))?;
            return Ok(None);
        }
        Op::SetByUser(ns, path, value) => {
            db.set_by_user(SetRequest::new(*ns, *path, value.clone()))?;
            return Ok(None);
        }
        Op::Get(ns, path, default) => db.get(GetRequest::new(*ns, *path, default.clone()))?,
        Op::GetByUser(ns, path, default) => {
            db.get_by_user(GetRequest::new(*ns, *path, default.clone()))?
        }
        Op::Database => db.database()?,
        Op::DatabaseClear => db.database_clear()?,
        Op::DatabaseByUser => db.database_by_user()?,
        Op::DatabaseByUserClear => db.database_by_user_clear()?,
    };
    Ok(Some(value))
}

/// Run a vector against `store` and check every step and the final tree.
///
/// Returns a description of the first mismatch.
pub fn run_vector<S: KeyPathStore>(
    vector: &ScenarioVector,
    store: S,
) -> std::result::Result<(), String> {
    let identity = match vector.identity {
        Some(id) => StaticIdentity::new(id),
        None => StaticIdentity::anonymous(),
    };
    let db = StateDb::new(store, identity, StateDbConfig::default());

    for (i, step) in vector.steps.iter().enumerate() {
        let got = apply(&db, &step.op).map_err(|e| format!("step {}: {}", i, e))?;
        if got != step.expect {
            return Err(format!(
                "step {} ({:?}): expected {:?}, got {:?}",
                i, step.op, step.expect, got
            ));
        }
    }

    let tree = db.store().snapshot().map_err(|e| e.to_string())?;
    if tree != vector.expected_tree {
        return Err(format!(
            "final tree: expected {}, got {}",
            vector.expected_tree, tree
        ));
    }
    Ok(())
}

/// Verify all vectors against stores produced by `make_store`.
///
/// Returns `(name, passed, detail)` per vector.
pub fn verify_all_vectors<S, F>(mut make_store: F) -> Vec<(String, bool, String)>
where
    S: KeyPathStore,
    F: FnMut() -> S,
{
    all_vectors()
        .iter()
        .map(|v| match run_vector(v, make_store()) {
            Ok(()) => (v.name.to_string(), true, String::new()),
            Err(detail) => (v.name.to_string(), false, detail),
        })
        .collect()
}
