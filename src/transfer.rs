// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-user backup documents.
//!
//! Import gives every record a fresh id under the target user. Category and
//! bill references are rewritten to the new ids; series ids are kept as they
//! are, so an imported series stays one series.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::error::Result;
use crate::models::{Category, ScheduledBill, ScheduledBillInstance, Transaction};
use crate::store::{RecordStore, Records};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub scheduled_bills: Vec<ScheduledBill>,
    #[serde(default)]
    pub scheduled_bill_instances: Vec<ScheduledBillInstance>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub categories: usize,
    pub transactions: usize,
    pub scheduled_bills: usize,
    pub scheduled_bill_instances: usize,
}

pub fn export_user<S: RecordStore + ?Sized>(store: &S, user_id: &str) -> Result<ExportDocument> {
    Ok(ExportDocument {
        categories: store.find_by("userId", user_id)?,
        transactions: store.find_by("userId", user_id)?,
        scheduled_bills: store.find_by("userId", user_id)?,
        scheduled_bill_instances: store.find_by("userId", user_id)?,
    })
}

pub fn export_json<S: RecordStore + ?Sized>(store: &S, user_id: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export_user(store, user_id)?)?)
}

fn remap(ids: &HashMap<String, String>, old: &str) -> String {
    ids.get(old).cloned().unwrap_or_else(|| old.to_string())
}

/// Parses the whole document before writing anything; a malformed document
/// is an error and leaves the store untouched.
pub fn import_json<S: RecordStore + ?Sized>(
    store: &mut S,
    user_id: &str,
    text: &str,
) -> Result<ImportReport> {
    let doc: ExportDocument = serde_json::from_str(text)?;
    import_document(store, user_id, doc)
}

pub fn import_document<S: RecordStore + ?Sized>(
    store: &mut S,
    user_id: &str,
    doc: ExportDocument,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let mut category_ids = HashMap::new();
    let mut bill_ids = HashMap::new();

    for cat in doc.categories {
        let old = cat.id.clone();
        let stored = store.insert_record(&Category {
            user_id: user_id.to_string(),
            ..cat
        })?;
        category_ids.insert(old, stored.id);
        report.categories += 1;
    }
    for t in doc.transactions {
        store.insert_record(&Transaction {
            user_id: user_id.to_string(),
            category_id: remap(&category_ids, &t.category_id),
            ..t
        })?;
        report.transactions += 1;
    }
    for bill in doc.scheduled_bills {
        let old = bill.id.clone();
        let stored = store.insert_record(&ScheduledBill {
            user_id: user_id.to_string(),
            category_id: remap(&category_ids, &bill.category_id),
            ..bill
        })?;
        bill_ids.insert(old, stored.id);
        report.scheduled_bills += 1;
    }
    for inst in doc.scheduled_bill_instances {
        store.insert_record(&ScheduledBillInstance {
            user_id: user_id.to_string(),
            category_id: remap(&category_ids, &inst.category_id),
            bill_id: remap(&bill_ids, &inst.bill_id),
            ..inst
        })?;
        report.scheduled_bill_instances += 1;
    }
    info!(user = %user_id, ?report, "imported document");
    Ok(report)
}
