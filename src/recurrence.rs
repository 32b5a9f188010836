// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-stepped date expansion for recurring transactions and bills.
//!
//! The day-of-month is held fixed while the month advances. A day that does
//! not exist in the target month rolls forward into the next month by the
//! overflow (Feb 31 2024 is Mar 2 2024); it is never clamped to month end.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{LedgerError, Result};

pub const MAX_DUE_DAY: u32 = 31;

/// Identifier shared by every member of a newly expanded series.
pub fn new_series_id() -> String {
    crate::store::new_id()
}

/// `day` of the month that is `offset` months after `year`-`month`,
/// rolling forward past the end of short months.
pub fn roll_date(year: i32, month: u32, day: u32, offset: u32) -> Option<NaiveDate> {
    let months = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(offset);
    let y = i32::try_from(months.div_euclid(12)).ok()?;
    let m = u32::try_from(months.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(y, m, 1)?;
    first.checked_add_days(Days::new(u64::from(day.checked_sub(1)?)))
}

fn check_count(count: u32) -> Result<()> {
    if count == 0 {
        return Err(LedgerError::validation(
            "Recurrence count must be at least 1",
        ));
    }
    Ok(())
}

fn out_of_range(base: impl std::fmt::Display, i: u32) -> LedgerError {
    LedgerError::validation(format!("Date {} + {} months is out of range", base, i))
}

/// `count` dates, the i-th being `base` advanced by i months.
pub fn expand(base: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    check_count(count)?;
    (0..count)
        .map(|i| {
            roll_date(base.year(), base.month(), base.day(), i).ok_or_else(|| out_of_range(base, i))
        })
        .collect()
}

/// Due dates of a scheduled bill: the start month with its day replaced by
/// `due_day`, advanced one month per instance.
pub fn bill_due_dates(start: NaiveDate, due_day: u32, count: u32) -> Result<Vec<NaiveDate>> {
    if !(1..=MAX_DUE_DAY).contains(&due_day) {
        return Err(LedgerError::validation(format!(
            "Due day {} is outside 1..={}",
            due_day, MAX_DUE_DAY
        )));
    }
    check_count(count)?;
    (0..count)
        .map(|i| {
            roll_date(start.year(), start.month(), due_day, i).ok_or_else(|| out_of_range(start, i))
        })
        .collect()
}
