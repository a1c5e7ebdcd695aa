// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ardoise::engine::{
    DEFAULT_MAX_BAR_HEIGHT, categories_for_kind, compute_ardoise_balance,
    compute_available_balance, compute_weekly_stats, compute_weekly_totals, group_by_date,
    resolve_category_link, sorted_date_keys,
};
use ardoise::models::TransactionType::{Expense, Income};
use ardoise::models::{Category, Transaction, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn tx(id: i64, date: &str, amount: i64, kind: TransactionType, ardoise: Option<i64>) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount: Decimal::from(amount),
        kind,
        category_id: None,
        ardoise_id: ardoise,
        note: None,
    }
}

#[test]
fn group_by_date_keeps_every_transaction_once() {
    let input = vec![
        tx(1, "2024-07-02", 10, Expense, None),
        tx(2, "2024-07-01", 20, Income, None),
        tx(3, "2024-07-02", 30, Expense, None),
        tx(4, "2024-06-30", 5, Expense, None),
    ];
    let groups = group_by_date(&input);
    let total: usize = groups.values().map(Vec::len).sum();
    assert_eq!(total, input.len());
    for t in &input {
        let key = t.date.format("%Y-%m-%d").to_string();
        let hits = groups
            .iter()
            .filter(|(_, g)| g.iter().any(|x| x.id == t.id))
            .collect::<Vec<_>>();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, &key);
    }
    // stable within a day
    let ids: Vec<i64> = groups["2024-07-02"].iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn group_by_date_empty_input() {
    assert!(group_by_date(&[]).is_empty());
}

#[test]
fn two_days_sorted_newest_first() {
    let input = vec![
        tx(1, "2024-07-01", 10, Expense, None),
        tx(2, "2024-07-15", 20, Income, None),
        tx(3, "2024-07-01", 5, Income, None),
    ];
    let groups = group_by_date(&input);
    assert_eq!(groups.len(), 2);
    assert_eq!(sorted_date_keys(&groups), vec!["2024-07-15", "2024-07-01"]);
}

#[test]
fn sorted_keys_cross_year_boundary() {
    let input = vec![
        tx(1, "2023-12-31", 1, Expense, None),
        tx(2, "2024-01-01", 1, Expense, None),
        tx(3, "2023-02-10", 1, Expense, None),
    ];
    let groups = group_by_date(&input);
    assert_eq!(
        sorted_date_keys(&groups),
        vec!["2024-01-01", "2023-12-31", "2023-02-10"]
    );
}

#[test]
fn weekly_stats_empty_is_all_zero() {
    let stats = compute_weekly_stats(&[], None);
    assert_eq!(stats.expense, [0.0; 7]);
    assert_eq!(stats.income, [0.0; 7]);
}

#[test]
fn sunday_only_expenses_fill_first_bucket() {
    // 2024-07-07 and 2024-06-30 are Sundays
    let input = vec![
        tx(1, "2024-07-07", 10, Expense, None),
        tx(2, "2024-06-30", 30, Expense, None),
    ];
    let stats = compute_weekly_stats(&input, None);
    assert_eq!(stats.expense, [140.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(stats.income, [0.0; 7]);
}

#[test]
fn weekly_series_are_normalized_independently() {
    let input = vec![
        tx(1, "2024-07-01", 50, Expense, None),  // Monday
        tx(2, "2024-07-03", 100, Expense, None), // Wednesday
        tx(3, "2024-07-06", 7, Income, None),    // Saturday
    ];
    let stats = compute_weekly_stats(&input, None);
    assert_eq!(stats.expense[1], 70.0);
    assert_eq!(stats.expense[3], DEFAULT_MAX_BAR_HEIGHT);
    assert_eq!(stats.income[6], DEFAULT_MAX_BAR_HEIGHT);
    let max_income = stats.income.iter().copied().fold(0.0, f64::max);
    assert_eq!(max_income, DEFAULT_MAX_BAR_HEIGHT);
}

#[test]
fn weekly_stats_custom_height_and_order_independent() {
    let mut input = vec![
        tx(1, "2024-07-01", 25, Expense, None),
        tx(2, "2024-07-08", 75, Expense, None), // also a Monday, other week
        tx(3, "2024-07-02", 50, Expense, None),
    ];
    let a = compute_weekly_stats(&input, Some(200.0));
    input.reverse();
    let b = compute_weekly_stats(&input, Some(200.0));
    assert_eq!(a, b);
    assert_eq!(a.expense[1], 200.0);
    assert_eq!(a.expense[2], 100.0);

    let totals = compute_weekly_totals(&input);
    assert_eq!(totals.expense[1], Decimal::from(100));
}

#[test]
fn ardoise_balance_expense_adds_income_subtracts() {
    let input = vec![
        tx(1, "2024-07-01", 100, Expense, Some(5)),
        tx(2, "2024-07-01", 40, Income, Some(5)),
        tx(3, "2024-07-01", 999, Expense, Some(6)),
        tx(4, "2024-07-01", 999, Expense, None),
    ];
    assert_eq!(compute_ardoise_balance(5, &input), Decimal::from(60));
}

#[test]
fn ardoise_balance_zero_without_links() {
    assert_eq!(compute_ardoise_balance(5, &[]), Decimal::ZERO);
    let input = vec![tx(1, "2024-07-01", 100, Expense, Some(2))];
    assert_eq!(compute_ardoise_balance(5, &input), Decimal::ZERO);
}

#[test]
fn available_uses_opposite_sign() {
    let input = vec![
        tx(1, "2024-07-01", 100, Expense, Some(5)),
        tx(2, "2024-07-01", 250, Income, None),
    ];
    assert_eq!(compute_available_balance(&input), Decimal::from(150));
}

#[test]
fn category_link_lookup_is_total() {
    let cats = vec![
        Category {
            id: 1,
            name: "Transportation".into(),
            kind: Some(Expense),
            link: Some("bus".into()),
            src: None,
        },
        Category {
            id: 2,
            name: "Allowance".into(),
            kind: Some(Income),
            link: None,
            src: None,
        },
    ];
    assert_eq!(resolve_category_link(Some(1), &cats), Some("bus"));
    assert_eq!(resolve_category_link(Some(2), &cats), None);
    assert_eq!(resolve_category_link(Some(42), &cats), None);
    assert_eq!(resolve_category_link(None, &cats), None);

    let income: Vec<i64> = categories_for_kind(&cats, Income).iter().map(|c| c.id).collect();
    assert_eq!(income, vec![2]);
}

#[test]
fn huge_sums_saturate_instead_of_overflowing() {
    let huge: Decimal = "50000000000000000000000000000".parse().unwrap();
    let mut input = vec![
        tx(1, "2024-07-07", 0, Expense, Some(1)),
        tx(2, "2024-07-07", 0, Expense, Some(1)),
        tx(3, "2024-07-07", 0, Income, None),
    ];
    for t in input.iter_mut() {
        t.amount = huge;
    }
    assert_eq!(compute_ardoise_balance(1, &input), Decimal::MAX);
    assert_eq!(compute_available_balance(&input), -Decimal::MAX + huge);
    assert_eq!(compute_weekly_totals(&input).expense[0], Decimal::MAX);
    let stats = compute_weekly_stats(&input, None);
    assert_eq!(stats.expense[0], DEFAULT_MAX_BAR_HEIGHT);
}
