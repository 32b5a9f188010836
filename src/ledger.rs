// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transactions: creation (with month-by-month expansion of recurring
//! entries) and scoped edit/delete across a recurring series.
//!
//! Series writes are a loop of independent store calls. A failure part way
//! through leaves the members written so far in place.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{LedgerError, Result};
use crate::models::{EntryType, Transaction, TransactionPatch};
use crate::recurrence::{expand, new_series_id};
use crate::scope::{EditScope, Outcome, classify};
use crate::store::{RecordStore, Records};

/// A new transaction as entered by the user. `recurring_months` turns it
/// into a series of that many monthly members.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub user_id: String,
    pub r#type: EntryType,
    pub amount: Decimal,
    pub description: String,
    pub category_id: String,
    pub date: NaiveDate,
    pub recurring_months: Option<u32>,
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(format!("{} is required", what)));
    }
    Ok(())
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

impl TransactionInput {
    fn validate(&self) -> Result<()> {
        require(&self.user_id, "User")?;
        require(&self.description, "Description")?;
        require(&self.category_id, "Category")?;
        require_positive(self.amount)?;
        if self.recurring_months == Some(0) {
            return Err(LedgerError::validation(
                "Recurrence count must be at least 1",
            ));
        }
        Ok(())
    }

    fn template(&self, date: NaiveDate) -> Transaction {
        Transaction {
            id: String::new(),
            user_id: self.user_id.clone(),
            r#type: self.r#type,
            amount: self.amount,
            description: self.description.trim().to_string(),
            category_id: self.category_id.clone(),
            date,
            is_recurring: false,
            recurring_months: None,
            recurring_series_id: None,
        }
    }
}

fn validate_patch(patch: &TransactionPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(LedgerError::validation("Nothing to change"));
    }
    if let Some(d) = &patch.description {
        require(d, "Description")?;
    }
    if let Some(c) = &patch.category_id {
        require(c, "Category")?;
    }
    if let Some(a) = patch.amount {
        require_positive(a)?;
    }
    Ok(())
}

/// Records a transaction. A recurring input is expanded into one member
/// per month, all sharing a fresh `recurringSeriesId`.
pub fn create_transaction<S: RecordStore + ?Sized>(
    store: &mut S,
    input: &TransactionInput,
) -> Result<Vec<Transaction>> {
    input.validate()?;
    let Some(months) = input.recurring_months else {
        let stored = store.insert_record(&input.template(input.date))?;
        return Ok(vec![stored]);
    };

    let dates = expand(input.date, months)?;
    let series_id = new_series_id();
    let mut created = Vec::with_capacity(dates.len());
    for date in dates {
        let member = Transaction {
            is_recurring: true,
            recurring_months: Some(months),
            recurring_series_id: Some(series_id.clone()),
            ..input.template(date)
        };
        created.push(store.insert_record(&member)?);
    }
    info!(series = %series_id, count = created.len(), "created recurring transaction");
    Ok(created)
}

/// Members of the anchor's series belonging to the anchor's user, in
/// insertion order. A transaction outside any series is its own only member.
pub fn series_members<S: RecordStore + ?Sized>(
    store: &S,
    anchor: &Transaction,
) -> Result<Vec<Transaction>> {
    let Some(series_id) = anchor.recurring_series_id.as_deref() else {
        return Ok(vec![anchor.clone()]);
    };
    Ok(store
        .find_by::<Transaction>("recurringSeriesId", series_id)?
        .into_iter()
        .filter(|t| t.user_id == anchor.user_id)
        .collect())
}

/// Applies `patch` to the transaction `id` and, for a recurring one, to the
/// siblings selected by `scope`.
///
/// A non-recurring transaction is updated directly (its date included). A
/// recurring one needs a scope; without it nothing is written and
/// `Outcome::ScopeRequired` is returned. Series edits never move dates, so a
/// date-only patch on a recurring transaction is rejected before any scope
/// is asked for.
pub fn edit_transaction<S: RecordStore + ?Sized>(
    store: &mut S,
    id: &str,
    patch: &TransactionPatch,
    scope: Option<EditScope>,
) -> Result<Outcome> {
    validate_patch(patch)?;
    let Some(anchor) = store.find_record::<Transaction>(id)? else {
        return Ok(Outcome::NotFound);
    };
    if !anchor.in_series() {
        let n = store.update_record::<Transaction, _>(id, patch)?;
        return Ok(Outcome::Applied(usize::from(n)));
    }
    let series_patch = patch.without_date();
    if series_patch.is_empty() {
        return Err(LedgerError::validation(
            "The date of a recurring transaction cannot be changed",
        ));
    }
    let Some(scope) = scope else {
        return Ok(Outcome::ScopeRequired);
    };

    let members = series_members(store, &anchor)?;
    let targets: Vec<String> = classify(scope, &anchor, &members)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    let mut written = 0;
    for target in &targets {
        if store.update_record::<Transaction, _>(target, &series_patch)? {
            written += 1;
        }
    }
    info!(%scope, written, "edited recurring transaction");
    Ok(Outcome::Applied(written))
}

/// Deletes the transaction `id` and, for a recurring one, the siblings
/// selected by `scope`. Deleting a missing id is a no-op.
pub fn delete_transaction<S: RecordStore + ?Sized>(
    store: &mut S,
    id: &str,
    scope: Option<EditScope>,
) -> Result<Outcome> {
    let Some(anchor) = store.find_record::<Transaction>(id)? else {
        return Ok(Outcome::NotFound);
    };
    if !anchor.in_series() {
        let n = store.delete_record::<Transaction>(id)?;
        return Ok(Outcome::Applied(usize::from(n)));
    }
    let Some(scope) = scope else {
        return Ok(Outcome::ScopeRequired);
    };

    let members = series_members(store, &anchor)?;
    let targets: Vec<String> = classify(scope, &anchor, &members)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    let mut removed = 0;
    for target in &targets {
        if store.delete_record::<Transaction>(target)? {
            removed += 1;
        }
    }
    info!(%scope, removed, "deleted recurring transaction");
    Ok(Outcome::Applied(removed))
}

/// All transactions of a user, newest first.
pub fn user_transactions<S: RecordStore + ?Sized>(store: &S, user_id: &str) -> Result<Vec<Transaction>> {
    let mut rows = store.find_by::<Transaction>("userId", user_id)?;
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(rows)
}
