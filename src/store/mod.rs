// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record store: a flat, schema-less collection of entities keyed by
//! generated identifiers.
//!
//! `RecordStore` is the untyped contract (JSON objects per entity kind).
//! `Records` layers typed access on top through serde, so the engine works
//! with `Transaction`, `ScheduledBill`, ... while stores only ever see field
//! maps.

pub mod memory;
pub mod sqlite;

pub use memory::{Document, MemoryStore};
pub use sqlite::SqliteStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::error::{LedgerError, Result};

pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Users,
    Categories,
    Transactions,
    ScheduledBills,
    ScheduledBillInstances,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Users,
        EntityKind::Categories,
        EntityKind::Transactions,
        EntityKind::ScheduledBills,
        EntityKind::ScheduledBillInstances,
    ];

    /// Collection name in the persisted document.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Categories => "categories",
            EntityKind::Transactions => "transactions",
            EntityKind::ScheduledBills => "scheduledBills",
            EntityKind::ScheduledBillInstances => "scheduledBillInstances",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait RecordStore {
    /// Assigns a fresh identifier (any `id` in `fields` is replaced),
    /// persists and returns the stored record.
    fn insert(&mut self, kind: EntityKind, fields: Fields) -> Result<Fields>;

    /// Merges `patch` into the record. Returns `false` when the record does
    /// not exist. The `id` field is never overwritten.
    fn update(&mut self, kind: EntityKind, id: &str, patch: Fields) -> Result<bool>;

    /// Returns `false` when there was nothing to delete.
    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<bool>;

    /// All records whose `field` equals `value`, in insertion order. A missing
    /// field compares equal to `null`.
    fn query_by_field(&self, kind: EntityKind, field: &str, value: &Value) -> Result<Vec<Fields>>;

    fn all(&self, kind: EntityKind) -> Result<Vec<Fields>>;

    fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Fields>> {
        Ok(self
            .query_by_field(kind, "id", &Value::from(id))?
            .into_iter()
            .next())
    }
}

/// A typed entity living in one collection of the store.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn to_fields<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(LedgerError::Corrupt(other.to_string())),
    }
}

pub(crate) fn merge(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        if key != "id" {
            target.insert(key, value);
        }
    }
}

fn from_fields<R: Record>(fields: Fields) -> Result<R> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Typed access for any `RecordStore`.
pub trait Records: RecordStore {
    fn insert_record<R: Record>(&mut self, record: &R) -> Result<R> {
        let stored = self.insert(R::KIND, to_fields(record)?)?;
        from_fields(stored)
    }

    fn update_record<R: Record, P: Serialize>(&mut self, id: &str, patch: &P) -> Result<bool> {
        self.update(R::KIND, id, to_fields(patch)?)
    }

    fn delete_record<R: Record>(&mut self, id: &str) -> Result<bool> {
        self.delete(R::KIND, id)
    }

    fn find_record<R: Record>(&self, id: &str) -> Result<Option<R>> {
        self.get(R::KIND, id)?.map(from_fields).transpose()
    }

    fn find_by<R: Record>(&self, field: &str, value: impl Into<Value>) -> Result<Vec<R>> {
        self.query_by_field(R::KIND, field, &value.into())?
            .into_iter()
            .map(from_fields)
            .collect()
    }

    fn all_records<R: Record>(&self) -> Result<Vec<R>> {
        self.all(R::KIND)?.into_iter().map(from_fields).collect()
    }
}

impl<S: RecordStore + ?Sized> Records for S {}
