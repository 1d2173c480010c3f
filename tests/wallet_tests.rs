// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use khata::errors::Error;
use khata::models::PaymentType;
use khata::{cli, commands, db, store};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn setup() -> (Connection, i64) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let user_id = store::users::resolve(&conn, "tester").unwrap();
    (conn, user_id)
}

#[test]
fn provisioning_creates_the_fixed_wallet_set() {
    let (conn, user_id) = setup();
    let wallets = store::wallets::list(&conn, user_id).unwrap();
    assert_eq!(wallets.len(), 7);
    assert!(wallets.iter().all(|w| w.balance == Decimal::ZERO));
}

#[test]
fn provisioning_twice_is_a_noop() {
    let (conn, user_id) = setup();
    store::wallets::set_balance(&conn, user_id, PaymentType::Cash, Decimal::from(321)).unwrap();

    store::wallets::ensure_provisioned(&conn, user_id).unwrap();
    store::wallets::ensure_provisioned(&conn, user_id).unwrap();

    let wallets = store::wallets::list(&conn, user_id).unwrap();
    assert_eq!(wallets.len(), 7, "re-provisioning must not duplicate rows");
    let cash = store::wallets::get_by_name(&conn, user_id, PaymentType::Cash).unwrap();
    assert_eq!(cash.balance, Decimal::from(321), "balances survive re-provisioning");
}

#[test]
fn set_balance_overrides_directly() {
    let (conn, user_id) = setup();
    let updated =
        store::wallets::set_balance(&conn, user_id, PaymentType::NicAsia, Decimal::from(-50))
            .unwrap();
    assert_eq!(updated.balance, Decimal::from(-50));
    assert_eq!(updated.name, PaymentType::NicAsia);
}

#[test]
fn set_balance_on_a_missing_row_is_not_found() {
    let (conn, _) = setup();
    // an owner provisioned by hand, without wallets
    conn.execute("INSERT INTO users(name) VALUES ('bare')", params![])
        .unwrap();
    let bare: i64 = conn
        .query_row("SELECT id FROM users WHERE name='bare'", [], |r| r.get(0))
        .unwrap();

    let err =
        store::wallets::set_balance(&conn, bare, PaymentType::Cash, Decimal::ZERO).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn unknown_wallet_name_is_a_validation_error_not_a_missing_row() {
    let (conn, user_id) = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["khata", "wallet", "get", "FONEPAY"]);
    let Some(("wallet", wallet_m)) = matches.subcommand() else {
        panic!("no wallet subcommand");
    };

    let err = commands::wallets::handle(&conn, user_id, wallet_m).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::Validation(issues)) => {
            assert!(issues.iter().any(|i| i.field == "name"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn wallet_names_parse_only_from_the_fixed_set() {
    for name in ["CASH", "ESEWA", "KHALTI", "LAXMIBANK", "IMEPAY", "NIC ASIA", "MACHA BL"] {
        assert!(name.parse::<PaymentType>().is_ok(), "{name} should parse");
    }
    let err = "FONEPAY".parse::<PaymentType>().unwrap_err();
    assert!(err.to_string().contains("expected one of"));
}
