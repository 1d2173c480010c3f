// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use khata::errors::Error;
use khata::models::{Day, NewTransaction, PaymentType, Reason, TransactionPatch, TxnKind};
use khata::{cli, commands, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, i64) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let user_id = store::users::resolve(&conn, "tester").unwrap();
    (conn, user_id)
}

fn expense(amount: &str, payment: PaymentType, date: &str) -> NewTransaction {
    let english_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    NewTransaction {
        day: Day::from_date(english_date),
        nepali_date: "2083-04-16".into(),
        english_date,
        kind: TxnKind::Expense,
        amount: amount.parse().unwrap(),
        reason: Reason::Food,
        payment_type: payment,
        notes: None,
    }
}

fn income(amount: &str, payment: PaymentType, date: &str) -> NewTransaction {
    NewTransaction {
        kind: TxnKind::Income,
        reason: Reason::Salary,
        ..expense(amount, payment, date)
    }
}

fn balance_of(conn: &Connection, user_id: i64, name: PaymentType) -> Decimal {
    store::wallets::get_by_name(conn, user_id, name)
        .unwrap()
        .balance
}

#[test]
fn round_trip_preserves_submitted_fields() {
    let (mut conn, user_id) = setup();
    let new = NewTransaction {
        notes: Some("momo with friends".into()),
        ..expense("240.50", PaymentType::Esewa, "2026-08-01")
    };
    let created = store::transactions::create(&mut conn, user_id, &new).unwrap();
    let fetched = store::transactions::get(&conn, user_id, created.id).unwrap();

    assert_eq!(fetched.day, new.day);
    assert_eq!(fetched.nepali_date, new.nepali_date);
    assert_eq!(fetched.english_date, new.english_date);
    assert_eq!(fetched.kind, new.kind);
    assert_eq!(fetched.amount, new.amount);
    assert_eq!(fetched.reason, new.reason);
    assert_eq!(fetched.payment_type, new.payment_type);
    assert_eq!(fetched.notes, new.notes);
    assert!(!fetched.created_at.is_empty());
}

#[test]
fn expense_decrements_wallet_balance() {
    let (mut conn, user_id) = setup();
    store::transactions::create(&mut conn, user_id, &expense("500", PaymentType::Cash, "2026-08-01"))
        .unwrap();

    assert_eq!(balance_of(&conn, user_id, PaymentType::Cash), Decimal::from(-500));
    let summary = store::summary::summarize(&conn, user_id).unwrap();
    assert_eq!(summary.total_expense, Decimal::from(500));
    assert_eq!(summary.total_income, Decimal::ZERO);
}

#[test]
fn moving_wallet_reverts_old_and_charges_new() {
    let (mut conn, user_id) = setup();
    let created = store::transactions::create(
        &mut conn,
        user_id,
        &expense("500", PaymentType::Cash, "2026-08-01"),
    )
    .unwrap();

    let patch = TransactionPatch {
        payment_type: Some(PaymentType::Esewa),
        ..Default::default()
    };
    let updated = store::transactions::update(&mut conn, user_id, created.id, &patch).unwrap();

    assert_eq!(updated.payment_type, PaymentType::Esewa);
    assert_eq!(updated.amount, Decimal::from(500));
    assert_eq!(balance_of(&conn, user_id, PaymentType::Cash), Decimal::ZERO);
    assert_eq!(balance_of(&conn, user_id, PaymentType::Esewa), Decimal::from(-500));
}

#[test]
fn delete_reverts_balance() {
    let (mut conn, user_id) = setup();
    let created = store::transactions::create(
        &mut conn,
        user_id,
        &expense("500", PaymentType::Esewa, "2026-08-01"),
    )
    .unwrap();
    store::transactions::delete(&mut conn, user_id, created.id).unwrap();

    assert_eq!(balance_of(&conn, user_id, PaymentType::Esewa), Decimal::ZERO);
    assert!(store::transactions::list(&conn, user_id).unwrap().is_empty());
}

#[test]
fn rejects_non_positive_amounts() {
    let (mut conn, user_id) = setup();
    for bad in ["0", "-25"] {
        let err = store::transactions::create(
            &mut conn,
            user_id,
            &expense(bad, PaymentType::Cash, "2026-08-01"),
        )
        .unwrap_err();
        match err {
            Error::Validation(issues) => {
                assert!(issues.iter().any(|i| i.field == "amount"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
    // nothing persisted, nothing applied to the ledger
    assert!(store::transactions::list(&conn, user_id).unwrap().is_empty());
    assert_eq!(balance_of(&conn, user_id, PaymentType::Cash), Decimal::ZERO);
}

#[test]
fn rejects_blank_nepali_date() {
    let (mut conn, user_id) = setup();
    let new = NewTransaction {
        nepali_date: "  ".into(),
        ..expense("100", PaymentType::Cash, "2026-08-01")
    };
    let err = store::transactions::create(&mut conn, user_id, &new).unwrap_err();
    match err {
        Error::Validation(issues) => assert!(issues.iter().any(|i| i.field == "nepali_date")),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn update_without_ledger_fields_leaves_balances_alone() {
    let (mut conn, user_id) = setup();
    let created = store::transactions::create(
        &mut conn,
        user_id,
        &expense("150", PaymentType::Khalti, "2026-08-01"),
    )
    .unwrap();

    let patch = TransactionPatch {
        notes: Some("refiled".into()),
        reason: Some(Reason::Festival),
        ..Default::default()
    };
    let updated = store::transactions::update(&mut conn, user_id, created.id, &patch).unwrap();

    assert_eq!(updated.notes.as_deref(), Some("refiled"));
    assert_eq!(updated.reason, Reason::Festival);
    assert_eq!(balance_of(&conn, user_id, PaymentType::Khalti), Decimal::from(-150));
}

#[test]
fn update_kind_flips_the_sign() {
    let (mut conn, user_id) = setup();
    let created = store::transactions::create(
        &mut conn,
        user_id,
        &expense("200", PaymentType::Cash, "2026-08-01"),
    )
    .unwrap();

    let patch = TransactionPatch {
        kind: Some(TxnKind::Income),
        ..Default::default()
    };
    store::transactions::update(&mut conn, user_id, created.id, &patch).unwrap();

    assert_eq!(balance_of(&conn, user_id, PaymentType::Cash), Decimal::from(200));
}

#[test]
fn missing_ids_are_not_found() {
    let (mut conn, user_id) = setup();
    assert!(matches!(
        store::transactions::get(&conn, user_id, 42),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        store::transactions::update(&mut conn, user_id, 42, &TransactionPatch::default()),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        store::transactions::delete(&mut conn, user_id, 42),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn owners_cannot_see_each_other() {
    let (mut conn, user_id) = setup();
    let other = store::users::resolve(&conn, "someone-else").unwrap();
    let created = store::transactions::create(
        &mut conn,
        user_id,
        &expense("75", PaymentType::Cash, "2026-08-01"),
    )
    .unwrap();

    assert!(store::transactions::get(&conn, other, created.id)
        .unwrap_err()
        .is_not_found());
    assert!(store::transactions::list(&conn, other).unwrap().is_empty());
    assert_eq!(balance_of(&conn, other, PaymentType::Cash), Decimal::ZERO);
}

#[test]
fn list_is_newest_first_with_insertion_order_ties() {
    let (mut conn, user_id) = setup();
    let first = store::transactions::create(
        &mut conn,
        user_id,
        &expense("10", PaymentType::Cash, "2026-08-03"),
    )
    .unwrap();
    let second = store::transactions::create(
        &mut conn,
        user_id,
        &expense("20", PaymentType::Cash, "2026-08-03"),
    )
    .unwrap();
    let newest = store::transactions::create(
        &mut conn,
        user_id,
        &expense("30", PaymentType::Cash, "2026-08-05"),
    )
    .unwrap();

    let ids: Vec<i64> = store::transactions::list(&conn, user_id)
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![newest.id, first.id, second.id]);
}

#[test]
fn cli_list_limit_respected() {
    let (mut conn, user_id) = setup();
    for day in ["2026-08-01", "2026-08-02", "2026-08-03"] {
        store::transactions::create(&mut conn, user_id, &expense("10", PaymentType::Cash, day))
            .unwrap();
    }

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["khata", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = commands::transactions::list_rows(&conn, user_id, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].english_date.to_string(), "2026-08-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn cli_add_derives_day_from_date() {
    let (mut conn, user_id) = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "khata",
        "tx",
        "add",
        "--kind",
        "Expense",
        "--amount",
        "120",
        "--reason",
        "Transportation",
        "--payment",
        "CASH",
        "--date",
        "2026-08-07", // a Friday
        "--nepali-date",
        "2083-04-22",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        commands::transactions::handle(&mut conn, user_id, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let listed = store::transactions::list(&conn, user_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].day, Day::Friday);
}
