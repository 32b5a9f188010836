// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, ScheduledBill, ScheduledBillInstance, Transaction};
use crate::schedule::delete_bill;
use crate::store::{RecordStore, Records};
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::HashSet;

pub const ORPHAN_INSTANCE: &str = "instance_without_bill";
pub const EMPTY_BILL: &str = "bill_without_instances";
pub const UNLINKED_RECURRING: &str = "recurring_without_series";
pub const UNKNOWN_CATEGORY: &str = "unknown_category";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub record_id: String,
    pub detail: String,
}

/// Scans every user's records for leftovers of interrupted batches.
pub fn check<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let categories: HashSet<(String, String)> = store
        .all_records::<Category>()?
        .into_iter()
        .map(|c| (c.user_id, c.id))
        .collect();
    let known_category =
        |user_id: &str, id: &str| categories.contains(&(user_id.to_string(), id.to_string()));

    let bills = store.all_records::<ScheduledBill>()?;
    let instances = store.all_records::<ScheduledBillInstance>()?;
    let bill_ids: HashSet<&str> = bills.iter().map(|b| b.id.as_str()).collect();
    let used_bills: HashSet<&str> = instances.iter().map(|i| i.bill_id.as_str()).collect();

    for i in &instances {
        if !bill_ids.contains(i.bill_id.as_str()) {
            issues.push(Issue {
                kind: ORPHAN_INSTANCE,
                record_id: i.id.clone(),
                detail: format!("{} '{}' -> bill {}", i.due_date, i.description, i.bill_id),
            });
        }
        if !known_category(&i.user_id, &i.category_id) {
            issues.push(Issue {
                kind: UNKNOWN_CATEGORY,
                record_id: i.id.clone(),
                detail: format!("bill '{}' -> category {}", i.description, i.category_id),
            });
        }
    }
    for b in &bills {
        if !used_bills.contains(b.id.as_str()) {
            issues.push(Issue {
                kind: EMPTY_BILL,
                record_id: b.id.clone(),
                detail: format!("'{}' starting {}", b.description, b.start_date),
            });
        }
    }
    for t in store.all_records::<Transaction>()? {
        if t.is_recurring && t.recurring_series_id.as_deref().is_none_or(str::is_empty) {
            issues.push(Issue {
                kind: UNLINKED_RECURRING,
                record_id: t.id.clone(),
                detail: format!("{} '{}'", t.date, t.description),
            });
        }
        if !known_category(&t.user_id, &t.category_id) {
            issues.push(Issue {
                kind: UNKNOWN_CATEGORY,
                record_id: t.id.clone(),
                detail: format!("transaction '{}' -> category {}", t.description, t.category_id),
            });
        }
    }
    Ok(issues)
}

pub fn handle<S: RecordStore + ?Sized>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let issues = check(store)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
        return Ok(());
    }
    let rows = issues
        .iter()
        .map(|i| vec![i.kind.to_string(), i.detail.clone(), i.record_id.clone()])
        .collect();
    println!("{}", pretty_table(&["Issue", "Detail", "ID"], rows));

    if sub.get_flag("fix") {
        let mut fixed = 0;
        for issue in issues.iter().filter(|i| i.kind == EMPTY_BILL) {
            delete_bill(store, &issue.record_id)?;
            fixed += 1;
        }
        println!("Removed {} empty bill definition(s)", fixed);
    }
    Ok(())
}
