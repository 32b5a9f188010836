// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerloop::models::{
    BillStatus, Category, EntryType, ScheduledBillInstance, Transaction,
};
use ledgerloop::summary::{
    Month, UNCATEGORIZED, expenses_by_category, in_month, search, summarize, upcoming,
};
use ledgerloop::tips::{TIP_COUNT, TipSource, TipsEndpoint, generate_tips, heuristic_tips};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn cat(id: &str, name: &str, kind: EntryType) -> Category {
    Category {
        id: id.into(),
        user_id: "u".into(),
        name: name.into(),
        r#type: kind,
    }
}

fn tx(kind: EntryType, amount: i64, desc: &str, category: &str, date: &str) -> Transaction {
    Transaction {
        id: format!("{}-{}", desc, date),
        user_id: "u".into(),
        r#type: kind,
        amount: Decimal::from(amount),
        description: desc.into(),
        category_id: category.into(),
        date: d(date),
        is_recurring: false,
        recurring_months: None,
        recurring_series_id: None,
    }
}

fn bill(id: &str, due: &str, status: BillStatus) -> ScheduledBillInstance {
    ScheduledBillInstance {
        id: id.into(),
        bill_id: "b".into(),
        user_id: "u".into(),
        description: "Power".into(),
        amount: Decimal::from(80),
        category_id: "c-bills".into(),
        due_date: d(due),
        status,
        series_id: "s".into(),
    }
}

fn fixture() -> (Vec<Category>, Vec<Transaction>) {
    let cats = vec![
        cat("c-salary", "Salary", EntryType::Income),
        cat("c-food", "Food", EntryType::Expense),
        cat("c-home", "Housing", EntryType::Expense),
    ];
    let txs = vec![
        tx(EntryType::Income, 3000, "Pay", "c-salary", "2024-03-01"),
        tx(EntryType::Expense, 1200, "Rent", "c-home", "2024-03-05"),
        tx(EntryType::Expense, 40, "Groceries", "c-food", "2024-03-07"),
        tx(EntryType::Expense, 60, "Market", "c-food", "2024-03-20"),
        tx(EntryType::Expense, 15, "Snack", "gone", "2024-03-21"),
        tx(EntryType::Expense, 999, "Rent", "c-home", "2024-04-05"),
    ];
    (cats, txs)
}

#[test]
fn month_summary_counts_only_that_month() {
    let (_, txs) = fixture();
    let bills = vec![
        bill("1", "2024-03-10", BillStatus::Pending),
        bill("2", "2024-04-10", BillStatus::Pending),
    ];
    let s = summarize(Month::of(d("2024-03-15")), &txs, &bills);
    assert_eq!(s.month, "2024-03");
    assert_eq!(s.income, Decimal::from(3000));
    assert_eq!(s.expenses, Decimal::from(1315));
    assert_eq!(s.balance, Decimal::from(1685));
    assert_eq!(s.transactions, 5);
    assert_eq!(s.scheduled, 1);
}

#[test]
fn expenses_grouped_largest_first() {
    let (cats, txs) = fixture();
    let march = in_month(&txs, Month { year: 2024, month: 3 });
    let totals = expenses_by_category(&march, &cats);
    let names: Vec<_> = totals.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["Housing", "Food", UNCATEGORIZED]);
    assert_eq!(totals[1].total, Decimal::from(100));
    assert_eq!(totals[1].count, 2);
}

#[test]
fn search_matches_description_or_category() {
    let (cats, txs) = fixture();
    assert_eq!(search(&txs, &cats, "rent").len(), 2);
    assert_eq!(search(&txs, &cats, "FOOD").len(), 2);
    assert_eq!(search(&txs, &cats, " ").len(), txs.len());
    assert!(search(&txs, &cats, "zzz").is_empty());
}

#[test]
fn upcoming_window_is_inclusive_and_pending_only() {
    let today = d("2024-03-10");
    let bills = vec![
        bill("late", "2024-03-16", BillStatus::Pending),
        bill("edge", "2024-03-15", BillStatus::Pending),
        bill("today", "2024-03-10", BillStatus::Pending),
        bill("paid", "2024-03-11", BillStatus::Paid),
        bill("past", "2024-03-09", BillStatus::Pending),
    ];
    let ids: Vec<_> = upcoming(&bills, today, 5)
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec!["today", "edge"]);
}

#[test]
fn heuristic_tips_name_the_top_category() {
    let (cats, txs) = fixture();
    let march = in_month(&txs, Month { year: 2024, month: 3 });
    let totals = expenses_by_category(&march, &cats);
    let tips = heuristic_tips(4, &totals, Decimal::from(1315));
    assert_eq!(tips.len(), TIP_COUNT);
    assert!(tips[0].contains("Housing"));
    assert!(tips[0].contains("91%"));
    assert!(tips[1].contains('4'));
}

#[test]
fn no_expenses_gives_starter_tips() {
    let tips = generate_tips(&[], &[], None);
    assert_eq!(tips.source, TipSource::Heuristic);
    assert_eq!(tips.tips.len(), TIP_COUNT);
}

#[test]
fn unreachable_service_falls_back_to_local_tips() {
    let (cats, txs) = fixture();
    let endpoint = TipsEndpoint {
        url: "http://127.0.0.1:9/generate".into(),
        api_key: Some("k".into()),
    };
    let tips = generate_tips(&txs, &cats, Some(&endpoint));
    assert_eq!(tips.source, TipSource::Heuristic);
    assert!(tips.tips[0].contains("Housing"));
}

#[test]
fn window_past_the_calendar_end_stays_open() {
    let bills = vec![
        bill("far", "2300-01-01", BillStatus::Pending),
        bill("past", "2024-01-01", BillStatus::Pending),
    ];
    let ids: Vec<_> = upcoming(&bills, d("2024-03-10"), u32::MAX)
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec!["far"]);
    assert!(upcoming(&[], d("2024-01-01"), 1_000_000_000).is_empty());
}
