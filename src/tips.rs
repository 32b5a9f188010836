// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Savings tips for a month of transactions.
//!
//! When an endpoint is configured the tips come from a remote
//! `generateContent`-style text service; any failure there falls back to
//! tips computed locally from the month's aggregates. There is no retry.

use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::models::{Category, EntryType, Transaction};
use crate::summary::{CategoryTotal, expenses_by_category};
use crate::utils::http_client;

pub const TIP_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipsEndpoint {
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipSource {
    Remote,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tips {
    pub source: TipSource,
    pub tips: Vec<String>,
}

fn starter_tips() -> Vec<String> {
    vec![
        "Start recording your expenses to get personalised tips.".to_string(),
        "Organise your finances with categories that match how you spend.".to_string(),
        "Set a monthly savings goal.".to_string(),
    ]
}

/// Tips derived from the month's own numbers.
pub fn heuristic_tips(expense_count: usize, by_category: &[CategoryTotal], total: Decimal) -> Vec<String> {
    let Some(top) = by_category.first() else {
        return starter_tips();
    };
    let share = if total.is_zero() {
        Decimal::ZERO
    } else {
        (top.total / total * Decimal::ONE_HUNDRED).round_dp(0)
    };
    vec![
        format!(
            "Your largest expense is {} ({}% of the total). Consider reviewing it.",
            top.category, share
        ),
        format!(
            "You had {} expense transactions this month. Try consolidating purchases to save.",
            expense_count
        ),
        "Set a monthly limit for each category and track your progress.".to_string(),
    ]
}

fn prompt(by_category: &[CategoryTotal], total: Decimal) -> String {
    let lines: Vec<String> = by_category
        .iter()
        .take(5)
        .map(|c| format!("- {}: {:.2} ({} transactions)", c.category, c.total, c.count))
        .collect();
    format!(
        "Analyse this month of personal finance data and give exactly {} short, practical saving tips.\n\n\
         Total spent: {:.2}\nTop expense categories:\n{}\n\n\
         Answer with {} lines only, one tip per line, no numbering, no introduction.",
        TIP_COUNT,
        total,
        lines.join("\n"),
        TIP_COUNT
    )
}

fn fetch_remote(endpoint: &TipsEndpoint, prompt: &str) -> Result<Vec<String>> {
    let body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": { "temperature": 0.7, "maxOutputTokens": 200 }
    });
    let mut req = http_client()?.post(&endpoint.url).json(&body);
    if let Some(key) = endpoint.api_key.as_deref() {
        req = req.query(&[("key", key)]);
    }
    let resp = req
        .send()
        .with_context(|| format!("Request to {}", endpoint.url))?
        .error_for_status()?;
    let payload: Value = resp.json().context("Decode tips response")?;
    let text = payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Tips response has no text"))?;
    let tips: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(TIP_COUNT)
        .map(str::to_string)
        .collect();
    if tips.is_empty() {
        return Err(anyhow!("Tips response was empty"));
    }
    Ok(tips)
}

/// Tips for `transactions` (already narrowed to one month).
pub fn generate_tips(
    transactions: &[Transaction],
    categories: &[Category],
    endpoint: Option<&TipsEndpoint>,
) -> Tips {
    let expense_count = transactions
        .iter()
        .filter(|t| t.r#type == EntryType::Expense)
        .count();
    if expense_count == 0 {
        return Tips {
            source: TipSource::Heuristic,
            tips: starter_tips(),
        };
    }
    let by_category = expenses_by_category(transactions, categories);
    let total: Decimal = by_category.iter().map(|c| c.total).sum();

    if let Some(ep) = endpoint {
        match fetch_remote(ep, &prompt(&by_category, total)) {
            Ok(tips) => {
                return Tips {
                    source: TipSource::Remote,
                    tips,
                };
            }
            Err(err) => warn!("tips service unavailable, using local tips: {:#}", err),
        }
    }
    Tips {
        source: TipSource::Heuristic,
        tips: heuristic_tips(expense_count, &by_category, total),
    }
}
