// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{BillStatus, Category, EntryType, ScheduledBillInstance, Transaction};

pub const UNCATEGORIZED: &str = "(uncategorized)";

/// A calendar month, `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub transactions: usize,
    pub scheduled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

pub fn in_month(transactions: &[Transaction], month: Month) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| month.contains(t.date))
        .cloned()
        .collect()
}

pub fn summarize(
    month: Month,
    transactions: &[Transaction],
    instances: &[ScheduledBillInstance],
) -> MonthSummary {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut count = 0;
    for t in transactions.iter().filter(|t| month.contains(t.date)) {
        count += 1;
        match t.r#type {
            EntryType::Income => income += t.amount,
            EntryType::Expense => expenses += t.amount,
        }
    }
    MonthSummary {
        month: month.to_string(),
        income,
        expenses,
        balance: income - expenses,
        transactions: count,
        scheduled: instances.iter().filter(|i| month.contains(i.due_date)).count(),
    }
}

fn category_name<'a>(categories: &'a [Category], id: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
        .unwrap_or(UNCATEGORIZED)
}

/// Expense totals per category, largest first.
pub fn expenses_by_category(transactions: &[Transaction], categories: &[Category]) -> Vec<CategoryTotal> {
    let mut agg: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for t in transactions.iter().filter(|t| t.r#type == EntryType::Expense) {
        let e = agg
            .entry(category_name(categories, &t.category_id))
            .or_insert((Decimal::ZERO, 0));
        e.0 += t.amount;
        e.1 += 1;
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Case-insensitive match on description or category name.
pub fn search(transactions: &[Transaction], categories: &[Category], term: &str) -> Vec<Transaction> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return transactions.to_vec();
    }
    transactions
        .iter()
        .filter(|t| {
            t.description.to_lowercase().contains(&needle)
                || categories
                    .iter()
                    .find(|c| c.id == t.category_id)
                    .is_some_and(|c| c.name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Pending instances due between `today` and `today + days`, inclusive.
/// A window reaching past the last representable date is open-ended.
pub fn upcoming(instances: &[ScheduledBillInstance], today: NaiveDate, days: u32) -> Vec<ScheduledBillInstance> {
    let until = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    let mut due: Vec<ScheduledBillInstance> = instances
        .iter()
        .filter(|i| i.status == BillStatus::Pending && i.due_date >= today && i.due_date <= until)
        .cloned()
        .collect();
    due.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    due
}
