// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::{EntityKind, Fields, RecordStore, merge, new_id};
use crate::error::{LedgerError, Result};

/// The whole persisted state: one flat list of records per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub users: Vec<Fields>,
    #[serde(default)]
    pub categories: Vec<Fields>,
    #[serde(default)]
    pub transactions: Vec<Fields>,
    #[serde(default)]
    pub scheduled_bills: Vec<Fields>,
    #[serde(default)]
    pub scheduled_bill_instances: Vec<Fields>,
}

impl Document {
    pub fn collection(&self, kind: EntityKind) -> &Vec<Fields> {
        match kind {
            EntityKind::Users => &self.users,
            EntityKind::Categories => &self.categories,
            EntityKind::Transactions => &self.transactions,
            EntityKind::ScheduledBills => &self.scheduled_bills,
            EntityKind::ScheduledBillInstances => &self.scheduled_bill_instances,
        }
    }

    fn collection_mut(&mut self, kind: EntityKind) -> &mut Vec<Fields> {
        match kind {
            EntityKind::Users => &mut self.users,
            EntityKind::Categories => &mut self.categories,
            EntityKind::Transactions => &mut self.transactions,
            EntityKind::ScheduledBills => &mut self.scheduled_bills,
            EntityKind::ScheduledBillInstances => &mut self.scheduled_bill_instances,
        }
    }
}

fn id_of(fields: &Fields) -> Option<&str> {
    fields.get("id").and_then(Value::as_str)
}

/// In-memory store over a `Document`. Used by the tests and for loading or
/// saving a whole document as JSON.
pub struct MemoryStore {
    doc: Document,
    ids: HashSet<String>,
    next_id: Box<dyn FnMut() -> String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::from_document(Document::default())
    }

    pub fn from_document(doc: Document) -> Self {
        let ids = EntityKind::ALL
            .iter()
            .flat_map(|kind| doc.collection(*kind).iter())
            .filter_map(|f| id_of(f).map(str::to_string))
            .collect();
        MemoryStore {
            doc,
            ids,
            next_id: Box::new(new_id),
        }
    }

    /// Replaces the identifier generator.
    pub fn with_id_source(mut self, source: impl FnMut() -> String + 'static) -> Self {
        self.next_id = Box::new(source);
        self
    }

    /// Parses a persisted document. A malformed document is replaced by an
    /// empty one; whatever it held is lost for this session.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Document>(text) {
            Ok(doc) => MemoryStore::from_document(doc),
            Err(err) => {
                warn!("discarding malformed document: {}", err);
                MemoryStore::new()
            }
        }
    }

    /// Loads a document file. A missing or unreadable file yields an empty store.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => MemoryStore::from_json(&text),
            Err(err) => {
                debug!("no document at {}: {}", path.display(), err);
                MemoryStore::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }
}

impl RecordStore for MemoryStore {
    fn insert(&mut self, kind: EntityKind, mut fields: Fields) -> Result<Fields> {
        let id = (self.next_id)();
        if !self.ids.insert(id.clone()) {
            return Err(LedgerError::DuplicateId(id));
        }
        fields.insert("id".into(), Value::String(id.clone()));
        self.doc.collection_mut(kind).push(fields.clone());
        debug!(%kind, %id, "inserted record");
        Ok(fields)
    }

    fn update(&mut self, kind: EntityKind, id: &str, patch: Fields) -> Result<bool> {
        let found = self
            .doc
            .collection_mut(kind)
            .iter_mut()
            .find(|f| id_of(f) == Some(id));
        match found {
            Some(record) => {
                merge(record, patch);
                debug!(%kind, %id, "updated record");
                Ok(true)
            }
            None => {
                debug!(%kind, %id, "update skipped, record not found");
                Ok(false)
            }
        }
    }

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<bool> {
        let records = self.doc.collection_mut(kind);
        let before = records.len();
        records.retain(|f| id_of(f) != Some(id));
        let removed = records.len() != before;
        if removed {
            self.ids.remove(id);
            debug!(%kind, %id, "deleted record");
        } else {
            debug!(%kind, %id, "delete skipped, record not found");
        }
        Ok(removed)
    }

    fn query_by_field(&self, kind: EntityKind, field: &str, value: &Value) -> Result<Vec<Fields>> {
        Ok(self
            .doc
            .collection(kind)
            .iter()
            .filter(|f| f.get(field).unwrap_or(&Value::Null) == value)
            .cloned()
            .collect())
    }

    fn all(&self, kind: EntityKind) -> Result<Vec<Fields>> {
        Ok(self.doc.collection(kind).clone())
    }
}
