// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerloop::error::LedgerError;
use ledgerloop::models::User;
use ledgerloop::store::{EntityKind, Fields, MemoryStore, RecordStore, Records, SqliteStore};
use serde_json::{Value, json};

fn fields(v: Value) -> Fields {
    match v {
        Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

fn contract<S: RecordStore>(store: &mut S) {
    let a = store
        .insert(EntityKind::Users, fields(json!({"id": "ignored", "name": "Ana"})))
        .unwrap();
    let a_id = a["id"].as_str().unwrap().to_string();
    assert_ne!(a_id, "ignored");
    let b = store
        .insert(
            EntityKind::Users,
            fields(json!({"name": "Bruno", "email": "b@x.io"})),
        )
        .unwrap();
    let b_id = b["id"].as_str().unwrap().to_string();
    assert_ne!(a_id, b_id);

    // insertion order, and kinds are separate collections
    let all = store.all(EntityKind::Users).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["name"], "Ana");
    assert!(store.all(EntityKind::Categories).unwrap().is_empty());

    // a missing field matches null
    let no_email = store
        .query_by_field(EntityKind::Users, "email", &Value::Null)
        .unwrap();
    assert_eq!(no_email.len(), 1);
    assert_eq!(no_email[0]["id"], a_id.as_str());

    // update merges and never touches the id
    assert!(
        store
            .update(
                EntityKind::Users,
                &a_id,
                fields(json!({"id": "other", "email": "a@x.io"})),
            )
            .unwrap()
    );
    let got = store.get(EntityKind::Users, &a_id).unwrap().unwrap();
    assert_eq!(got["email"], "a@x.io");
    assert_eq!(got["name"], "Ana");
    assert_eq!(got["id"], a_id.as_str());
    assert!(!store.update(EntityKind::Users, "missing", Fields::new()).unwrap());

    // deletes are idempotent
    assert!(store.delete(EntityKind::Users, &b_id).unwrap());
    assert!(!store.delete(EntityKind::Users, &b_id).unwrap());
    assert!(store.get(EntityKind::Users, &b_id).unwrap().is_none());
    assert!(!store.delete(EntityKind::Categories, &a_id).unwrap());
}

#[test]
fn memory_store_honours_contract() {
    contract(&mut MemoryStore::new());
}

#[test]
fn sqlite_store_honours_contract() {
    contract(&mut SqliteStore::open_in_memory().unwrap());
}

#[test]
fn sqlite_matches_booleans_and_numbers() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .insert(
            EntityKind::Transactions,
            fields(json!({"isRecurring": true, "recurringMonths": 3})),
        )
        .unwrap();
    store
        .insert(EntityKind::Transactions, fields(json!({"isRecurring": false})))
        .unwrap();
    let recurring = store
        .query_by_field(EntityKind::Transactions, "isRecurring", &json!(true))
        .unwrap();
    assert_eq!(recurring.len(), 1);
    let three = store
        .query_by_field(EntityKind::Transactions, "recurringMonths", &json!(3))
        .unwrap();
    assert_eq!(three.len(), 1);
}

#[test]
fn colliding_id_source_is_rejected() {
    let mut store = MemoryStore::new().with_id_source(|| "same".to_string());
    store
        .insert(EntityKind::Users, fields(json!({"name": "A"})))
        .unwrap();
    let err = store
        .insert(EntityKind::Users, fields(json!({"name": "B"})))
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateId(id) if id == "same"));
    assert_eq!(store.all(EntityKind::Users).unwrap().len(), 1);
}

#[test]
fn malformed_document_loads_empty() {
    let store = MemoryStore::from_json("{ not json");
    for kind in EntityKind::ALL {
        assert!(store.all(kind).unwrap().is_empty());
    }
}

#[test]
fn document_round_trips_through_json() {
    let mut store = MemoryStore::new();
    let user = store
        .insert_record(&User {
            id: String::new(),
            name: "Ana".into(),
            email: String::new(),
        })
        .unwrap();
    let reloaded = MemoryStore::from_json(&store.to_json().unwrap());
    let found: Option<User> = reloaded.find_record(&user.id).unwrap();
    assert_eq!(found, Some(user));
    assert!(reloaded.to_json().unwrap().contains("scheduledBillInstances"));
}

#[test]
fn save_and_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    let mut store = MemoryStore::new();
    store
        .insert(EntityKind::Users, fields(json!({"name": "Ana"})))
        .unwrap();
    store.save(&path).unwrap();
    let loaded = MemoryStore::load(&path);
    assert_eq!(loaded.all(EntityKind::Users).unwrap().len(), 1);
    assert_eq!(loaded.document(), store.document());
    assert!(
        MemoryStore::load(&dir.path().join("missing.json"))
            .all(EntityKind::Users)
            .unwrap()
            .is_empty()
    );
}
