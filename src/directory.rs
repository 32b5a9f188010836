// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local user records and their categories.

use crate::error::{LedgerError, Result};
use crate::models::{Category, EntryType, User};
use crate::store::{RecordStore, Records};

pub const GUEST_NAME: &str = "Guest";

const DEFAULT_CATEGORIES: &[(&str, EntryType)] = &[
    ("Salary", EntryType::Income),
    ("Freelance", EntryType::Income),
    ("Investments", EntryType::Income),
    ("Other Income", EntryType::Income),
    ("Food", EntryType::Expense),
    ("Transport", EntryType::Expense),
    ("Housing", EntryType::Expense),
    ("Health", EntryType::Expense),
    ("Education", EntryType::Expense),
    ("Leisure", EntryType::Expense),
    ("Clothing", EntryType::Expense),
    ("Bills", EntryType::Expense),
    ("Other Expenses", EntryType::Expense),
];

/// Creates a user and seeds the default categories.
pub fn create_user<S: RecordStore + ?Sized>(store: &mut S, name: &str, email: &str) -> Result<User> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("Name is required"));
    }
    let email = email.trim();
    if !email.is_empty() && !store.find_by::<User>("email", email)?.is_empty() {
        return Err(LedgerError::validation(format!(
            "A user with email '{}' already exists",
            email
        )));
    }
    let user = store.insert_record(&User {
        id: String::new(),
        name: name.to_string(),
        email: email.to_string(),
    })?;
    for (cat, kind) in DEFAULT_CATEGORIES {
        store.insert_record(&Category {
            id: String::new(),
            user_id: user.id.clone(),
            name: (*cat).to_string(),
            r#type: *kind,
        })?;
    }
    Ok(user)
}

pub fn create_guest<S: RecordStore + ?Sized>(store: &mut S) -> Result<User> {
    create_user(store, GUEST_NAME, "")
}

/// Finds a user by id, then email, then name.
pub fn find_user<S: RecordStore + ?Sized>(store: &S, key: &str) -> Result<Option<User>> {
    let key = key.trim();
    for field in ["id", "email", "name"] {
        if let Some(u) = store.find_by::<User>(field, key)?.into_iter().next() {
            return Ok(Some(u));
        }
    }
    Ok(None)
}

pub fn user_categories<S: RecordStore + ?Sized>(store: &S, user_id: &str) -> Result<Vec<Category>> {
    store.find_by::<Category>("userId", user_id)
}

/// Case-insensitive lookup by name among the user's categories.
pub fn find_category<S: RecordStore + ?Sized>(
    store: &S,
    user_id: &str,
    name: &str,
) -> Result<Option<Category>> {
    let name = name.trim();
    Ok(user_categories(store, user_id)?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(name)))
}

pub fn add_category<S: RecordStore + ?Sized>(
    store: &mut S,
    user_id: &str,
    name: &str,
    kind: EntryType,
) -> Result<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("Category name is required"));
    }
    if find_category(store, user_id, name)?.is_some() {
        return Err(LedgerError::validation(format!(
            "Category '{}' already exists",
            name
        )));
    }
    store.insert_record(&Category {
        id: String::new(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        r#type: kind,
    })
}

pub fn remove_category<S: RecordStore + ?Sized>(store: &mut S, category_id: &str) -> Result<bool> {
    store.delete_record::<Category>(category_id)
}
