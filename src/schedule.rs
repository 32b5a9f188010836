// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Scheduled bills: a definition plus one pending instance per month.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{LedgerError, Result};
use crate::models::{
    BillInstancePatch, BillStatus, ScheduledBill, ScheduledBillInstance,
};
use crate::recurrence::{bill_due_dates, new_series_id};
use crate::scope::{BillScope, Outcome, classify_bill};
use crate::store::{RecordStore, Records};

#[derive(Debug, Clone, PartialEq)]
pub struct BillInput {
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: String,
    pub due_day: u32,
    pub recurring_months: u32,
    pub start_date: NaiveDate,
}

impl BillInput {
    fn validate(&self) -> Result<()> {
        for (value, what) in [
            (&self.user_id, "User"),
            (&self.description, "Description"),
            (&self.category_id, "Category"),
        ] {
            if value.trim().is_empty() {
                return Err(LedgerError::validation(format!("{} is required", what)));
            }
        }
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::validation(format!(
                "Amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Stores the bill definition, then one pending instance per month.
/// Dates are computed before anything is written.
pub fn create_bill<S: RecordStore + ?Sized>(
    store: &mut S,
    input: &BillInput,
) -> Result<(ScheduledBill, Vec<ScheduledBillInstance>)> {
    input.validate()?;
    let dates = bill_due_dates(input.start_date, input.due_day, input.recurring_months)?;
    let series_id = new_series_id();
    let description = input.description.trim().to_string();

    let bill = store.insert_record(&ScheduledBill {
        id: String::new(),
        user_id: input.user_id.clone(),
        description: description.clone(),
        amount: input.amount,
        category_id: input.category_id.clone(),
        due_day: input.due_day,
        recurring_months: input.recurring_months,
        start_date: input.start_date,
        series_id: series_id.clone(),
    })?;

    let mut instances = Vec::with_capacity(dates.len());
    for due_date in dates {
        instances.push(store.insert_record(&ScheduledBillInstance {
            id: String::new(),
            bill_id: bill.id.clone(),
            user_id: bill.user_id.clone(),
            description: description.clone(),
            amount: bill.amount,
            category_id: bill.category_id.clone(),
            due_date,
            status: BillStatus::Pending,
            series_id: series_id.clone(),
        })?);
    }
    info!(bill = %bill.id, series = %series_id, count = instances.len(), "scheduled bill");
    Ok((bill, instances))
}

/// Changes one instance's description. Blank or unchanged text writes nothing.
pub fn rename_instance<S: RecordStore + ?Sized>(
    store: &mut S,
    id: &str,
    description: &str,
) -> Result<Outcome> {
    let description = description.trim();
    if description.is_empty() {
        return Err(LedgerError::validation("Description is required"));
    }
    let Some(instance) = store.find_record::<ScheduledBillInstance>(id)? else {
        return Ok(Outcome::NotFound);
    };
    if instance.description == description {
        return Ok(Outcome::Applied(0));
    }
    let patch = BillInstancePatch {
        description: Some(description.to_string()),
        ..Default::default()
    };
    let n = store.update_record::<ScheduledBillInstance, _>(id, &patch)?;
    Ok(Outcome::Applied(usize::from(n)))
}

pub fn mark_paid<S: RecordStore + ?Sized>(store: &mut S, id: &str) -> Result<Outcome> {
    let Some(instance) = store.find_record::<ScheduledBillInstance>(id)? else {
        return Ok(Outcome::NotFound);
    };
    if instance.status == BillStatus::Paid {
        return Ok(Outcome::Applied(0));
    }
    let patch = BillInstancePatch {
        status: Some(BillStatus::Paid),
        ..Default::default()
    };
    let n = store.update_record::<ScheduledBillInstance, _>(id, &patch)?;
    Ok(Outcome::Applied(usize::from(n)))
}

/// Instances sharing `series_id` for `user_id`, in insertion order.
pub fn series_instances<S: RecordStore + ?Sized>(
    store: &S,
    series_id: &str,
    user_id: &str,
) -> Result<Vec<ScheduledBillInstance>> {
    Ok(store
        .find_by::<ScheduledBillInstance>("seriesId", series_id)?
        .into_iter()
        .filter(|i| i.user_id == user_id)
        .collect())
}

/// Deletes one instance (`Single`) or the whole schedule it belongs to
/// (`Series`: every instance and bill definition with its series id).
/// Without a scope nothing is deleted.
pub fn delete_instance<S: RecordStore + ?Sized>(
    store: &mut S,
    id: &str,
    scope: Option<BillScope>,
) -> Result<Outcome> {
    let Some(anchor) = store.find_record::<ScheduledBillInstance>(id)? else {
        return Ok(Outcome::NotFound);
    };
    let Some(scope) = scope else {
        return Ok(Outcome::ScopeRequired);
    };
    match scope {
        BillScope::Single => {
            let n = store.delete_record::<ScheduledBillInstance>(id)?;
            Ok(Outcome::Applied(usize::from(n)))
        }
        BillScope::Series => {
            let members = series_instances(store, &anchor.series_id, &anchor.user_id)?;
            let targets: Vec<String> = classify_bill(scope, &anchor, &members)
                .into_iter()
                .map(|i| i.id.clone())
                .collect();
            let removed = delete_definitions(store, &anchor.series_id, &anchor.user_id)?
                + delete_each(store, &targets)?;
            info!(series = %anchor.series_id, removed, "deleted bill series");
            Ok(Outcome::Applied(removed))
        }
    }
}

/// Deletes a bill definition together with all of its instances.
pub fn delete_bill<S: RecordStore + ?Sized>(store: &mut S, bill_id: &str) -> Result<Outcome> {
    let Some(bill) = store.find_record::<ScheduledBill>(bill_id)? else {
        return Ok(Outcome::NotFound);
    };
    let targets: Vec<String> = series_instances(store, &bill.series_id, &bill.user_id)?
        .into_iter()
        .map(|i| i.id)
        .collect();
    let removed = delete_definitions(store, &bill.series_id, &bill.user_id)?
        + delete_each(store, &targets)?;
    info!(bill = %bill.id, removed, "deleted bill");
    Ok(Outcome::Applied(removed))
}

fn delete_definitions<S: RecordStore + ?Sized>(
    store: &mut S,
    series_id: &str,
    user_id: &str,
) -> Result<usize> {
    let ids: Vec<String> = store
        .find_by::<ScheduledBill>("seriesId", series_id)?
        .into_iter()
        .filter(|b| b.user_id == user_id)
        .map(|b| b.id)
        .collect();
    let mut removed = 0;
    for id in &ids {
        if store.delete_record::<ScheduledBill>(id)? {
            removed += 1;
        }
    }
    Ok(removed)
}

fn delete_each<S: RecordStore + ?Sized>(store: &mut S, ids: &[String]) -> Result<usize> {
    let mut removed = 0;
    for id in ids {
        if store.delete_record::<ScheduledBillInstance>(id)? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// All bill instances of a user, earliest due date first.
pub fn user_instances<S: RecordStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Vec<ScheduledBillInstance>> {
    let mut rows = store.find_by::<ScheduledBillInstance>("userId", user_id)?;
    rows.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    Ok(rows)
}

pub fn user_bills<S: RecordStore + ?Sized>(store: &S, user_id: &str) -> Result<Vec<ScheduledBill>> {
    store.find_by::<ScheduledBill>("userId", user_id)
}
