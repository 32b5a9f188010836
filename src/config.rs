// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};

use crate::tips::TipsEndpoint;

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_UPCOMING_DAYS: &str = "upcoming_days";
pub const KEY_TIPS_ENDPOINT: &str = "tips_endpoint";
pub const KEY_TIPS_API_KEY: &str = "tips_api_key";
pub const TIPS_KEY_ENV: &str = "LEDGERLOOP_TIPS_KEY";

pub const KNOWN_KEYS: &[&str] = &[
    KEY_CURRENCY,
    KEY_UPCOMING_DAYS,
    KEY_TIPS_ENDPOINT,
    KEY_TIPS_API_KEY,
];

const DEFAULT_CURRENCY: &str = "R$";
const DEFAULT_UPCOMING_DAYS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub currency: String,
    pub upcoming_days: u32,
    pub tips: Option<TipsEndpoint>,
}

impl Config {
    pub fn load(conn: &Connection) -> Result<Self> {
        let currency = get_setting(conn, KEY_CURRENCY)?.unwrap_or_else(|| DEFAULT_CURRENCY.into());
        let upcoming_days = match get_setting(conn, KEY_UPCOMING_DAYS)? {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid {} '{}'", KEY_UPCOMING_DAYS, v))?,
            None => DEFAULT_UPCOMING_DAYS,
        };
        let api_key = std::env::var(TIPS_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or(get_setting(conn, KEY_TIPS_API_KEY)?);
        let tips = get_setting(conn, KEY_TIPS_ENDPOINT)?
            .filter(|u| !u.trim().is_empty())
            .map(|url| TipsEndpoint { url, api_key });
        Ok(Config {
            currency,
            upcoming_days,
            tips,
        })
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        return Err(anyhow!(
            "Unknown setting '{}' (known: {})",
            key,
            KNOWN_KEYS.join(", ")
        ));
    }
    if key == KEY_UPCOMING_DAYS {
        value
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid {} '{}', expected a non-negative day count", key, value))?;
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn list_settings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
