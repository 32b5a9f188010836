// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::store::{EntityKind, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Income => write!(f, "income"),
            EntryType::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for EntryType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            other => Err(LedgerError::validation(format!(
                "Invalid type '{}', expected income|expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillStatus::Pending => write!(f, "pending"),
            BillStatus::Paid => write!(f, "paid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub r#type: EntryType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub r#type: EntryType,
    pub amount: Decimal,
    pub description: String,
    pub category_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_series_id: Option<String>,
}

impl Transaction {
    /// A recurring transaction always needs a scope before it can be mutated.
    pub fn in_series(&self) -> bool {
        self.is_recurring && self.recurring_series_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBill {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: String,
    pub due_day: u32,
    pub recurring_months: u32,
    pub start_date: NaiveDate,
    pub series_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBillInstance {
    #[serde(default)]
    pub id: String,
    pub bill_id: String,
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: String,
    pub due_date: NaiveDate,
    pub status: BillStatus,
    pub series_id: String,
}

/// Field changes for a transaction. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<EntryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.r#type.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
    }

    /// Same changes minus the date; series members keep their own dates.
    pub fn without_date(&self) -> Self {
        TransactionPatch {
            date: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillInstancePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BillStatus>,
}

impl Record for User {
    const KIND: EntityKind = EntityKind::Users;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Category {
    const KIND: EntityKind = EntityKind::Categories;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Transaction {
    const KIND: EntityKind = EntityKind::Transactions;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ScheduledBill {
    const KIND: EntityKind = EntityKind::ScheduledBills;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ScheduledBillInstance {
    const KIND: EntityKind = EntityKind::ScheduledBillInstances;
    fn id(&self) -> &str {
        &self.id
    }
}
