// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Which members of a series an edit or delete applies to.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::models::{ScheduledBillInstance, Transaction};

/// Scope of an edit/delete on a recurring transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditScope {
    /// Only the anchor.
    Single,
    /// The anchor and every member dated on or after it.
    Future,
    /// Every member of the series.
    All,
}

/// Scope of a delete on a scheduled bill instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillScope {
    Single,
    Series,
}

impl FromStr for EditScope {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(EditScope::Single),
            "future" => Ok(EditScope::Future),
            "all" => Ok(EditScope::All),
            other => Err(LedgerError::validation(format!(
                "Invalid scope '{}', expected single|future|all",
                other
            ))),
        }
    }
}

impl FromStr for BillScope {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(BillScope::Single),
            "series" => Ok(BillScope::Series),
            other => Err(LedgerError::validation(format!(
                "Invalid scope '{}', expected single|series",
                other
            ))),
        }
    }
}

impl fmt::Display for EditScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditScope::Single => write!(f, "single"),
            EditScope::Future => write!(f, "future"),
            EditScope::All => write!(f, "all"),
        }
    }
}

impl fmt::Display for BillScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillScope::Single => write!(f, "single"),
            BillScope::Series => write!(f, "series"),
        }
    }
}

/// Result of an edit/delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Number of records written.
    Applied(usize),
    /// The anchor is part of a series and no scope was given; nothing was written.
    ScopeRequired,
    /// The anchor does not exist; nothing was written.
    NotFound,
}

/// A dated record that may belong to a series.
pub trait SeriesMember {
    fn member_id(&self) -> &str;
    fn series_id(&self) -> Option<&str>;
    fn member_date(&self) -> NaiveDate;
}

impl SeriesMember for Transaction {
    fn member_id(&self) -> &str {
        &self.id
    }
    fn series_id(&self) -> Option<&str> {
        self.recurring_series_id.as_deref()
    }
    fn member_date(&self) -> NaiveDate {
        self.date
    }
}

impl SeriesMember for ScheduledBillInstance {
    fn member_id(&self) -> &str {
        &self.id
    }
    fn series_id(&self) -> Option<&str> {
        Some(&self.series_id)
    }
    fn member_date(&self) -> NaiveDate {
        self.due_date
    }
}

fn same_series<T: SeriesMember>(anchor: &T, other: &T) -> bool {
    match anchor.series_id() {
        Some(sid) => other.series_id() == Some(sid),
        // a record outside any series is only ever its own sibling
        None => other.member_id() == anchor.member_id(),
    }
}

/// Members of `members` an edit/delete with `scope` applies to.
///
/// The anchor itself is always part of the result, whether or not it was
/// present in `members`. `Future` compares dates, not positions.
pub fn classify<'a, T: SeriesMember>(scope: EditScope, anchor: &'a T, members: &'a [T]) -> Vec<&'a T> {
    let mut picked: Vec<&T> = match scope {
        EditScope::Single => Vec::new(),
        EditScope::Future => members
            .iter()
            .filter(|m| same_series(anchor, *m) && m.member_date() >= anchor.member_date())
            .collect(),
        EditScope::All => members.iter().filter(|m| same_series(anchor, *m)).collect(),
    };
    if !picked.iter().any(|m| m.member_id() == anchor.member_id()) {
        picked.insert(0, anchor);
    }
    picked
}

/// Bill-instance variant: `Single` is the anchor, `Series` every instance
/// sharing its series id regardless of status.
pub fn classify_bill<'a>(
    scope: BillScope,
    anchor: &'a ScheduledBillInstance,
    members: &'a [ScheduledBillInstance],
) -> Vec<&'a ScheduledBillInstance> {
    match scope {
        BillScope::Single => classify(EditScope::Single, anchor, members),
        BillScope::Series => classify(EditScope::All, anchor, members),
    }
}
