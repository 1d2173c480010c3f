// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::errors::{Error, FieldIssue, Result};

/// A string that is not a member of one of the closed enumerations below.
#[derive(Debug, Error, PartialEq)]
#[error("unknown {what} '{given}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub what: &'static str,
    pub given: String,
    pub expected: String,
}

fn unknown<T: fmt::Display>(what: &'static str, given: &str, all: &[T]) -> UnknownVariant {
    let expected = all
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    UnknownVariant {
        what,
        given: given.to_string(),
        expected,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    pub const ALL: [TxnKind; 2] = [TxnKind::Income, TxnKind::Expense];

    pub fn as_str(self) -> &'static str {
        match self {
            TxnKind::Income => "Income",
            TxnKind::Expense => "Expense",
        }
    }
}

/// One of the seven fixed wallets/banks a transaction settles against.
/// Each carries a cached running balance; see `store::ledger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentType {
    Cash,
    Esewa,
    Khalti,
    LaxmiBank,
    ImePay,
    NicAsia,
    MachaBl,
}

impl PaymentType {
    pub const ALL: [PaymentType; 7] = [
        PaymentType::Cash,
        PaymentType::Esewa,
        PaymentType::Khalti,
        PaymentType::LaxmiBank,
        PaymentType::ImePay,
        PaymentType::NicAsia,
        PaymentType::MachaBl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Cash => "CASH",
            PaymentType::Esewa => "ESEWA",
            PaymentType::Khalti => "KHALTI",
            PaymentType::LaxmiBank => "LAXMIBANK",
            PaymentType::ImePay => "IMEPAY",
            PaymentType::NicAsia => "NIC ASIA",
            PaymentType::MachaBl => "MACHA BL",
        }
    }
}

/// Why money moved. One fixed list backs the CLI, validation and the TEXT
/// column in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Transportation,
    Food,
    Salary,
    Internet,
    Tv,
    HouseRentIncome,
    DadMom,
    GamesApps,
    PhoneRecharge,
    Festival,
    OnlineToCash,
    CashToOnline,
    Stationary,
    BankWalletInterest,
    Loan,
    Emi,
    TransferToAnotherApp,
    GivenByOthers,
    GiftToOthers,
    Tech,
    Lost,
    Entertainment,
    ClothesShoes,
    CashWithdrawal,
    Medicine,
    Haircut,
    CardGame,
}

impl Reason {
    pub const ALL: [Reason; 27] = [
        Reason::Transportation,
        Reason::Food,
        Reason::Salary,
        Reason::Internet,
        Reason::Tv,
        Reason::HouseRentIncome,
        Reason::DadMom,
        Reason::GamesApps,
        Reason::PhoneRecharge,
        Reason::Festival,
        Reason::OnlineToCash,
        Reason::CashToOnline,
        Reason::Stationary,
        Reason::BankWalletInterest,
        Reason::Loan,
        Reason::Emi,
        Reason::TransferToAnotherApp,
        Reason::GivenByOthers,
        Reason::GiftToOthers,
        Reason::Tech,
        Reason::Lost,
        Reason::Entertainment,
        Reason::ClothesShoes,
        Reason::CashWithdrawal,
        Reason::Medicine,
        Reason::Haircut,
        Reason::CardGame,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Transportation => "Transportation",
            Reason::Food => "Food",
            Reason::Salary => "Salary",
            Reason::Internet => "Internet",
            Reason::Tv => "TV",
            Reason::HouseRentIncome => "House Rent Income",
            Reason::DadMom => "Dad / Mom",
            Reason::GamesApps => "Games / Apps",
            Reason::PhoneRecharge => "Phone Recharge",
            Reason::Festival => "Festival",
            Reason::OnlineToCash => "Online to Cash",
            Reason::CashToOnline => "Cash to Online",
            Reason::Stationary => "Stationary",
            Reason::BankWalletInterest => "Bank / Wallet Interest",
            Reason::Loan => "Loan",
            Reason::Emi => "EMI",
            Reason::TransferToAnotherApp => "Transfer to Another App",
            Reason::GivenByOthers => "Given by Others",
            Reason::GiftToOthers => "Gift to Others",
            Reason::Tech => "Tech",
            Reason::Lost => "Lost",
            Reason::Entertainment => "Entertainment",
            Reason::ClothesShoes => "Clothes / Shoes",
            Reason::CashWithdrawal => "Cash Withdrawal",
            Reason::Medicine => "Medicine",
            Reason::Haircut => "Haircut",
            Reason::CardGame => "Card Game",
        }
    }
}

/// Day-of-week label recorded with a transaction. Stored verbatim; it is
/// not cross-checked against the Gregorian date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    pub fn from_date(date: NaiveDate) -> Day {
        match date.weekday() {
            chrono::Weekday::Sun => Day::Sunday,
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
        }
    }
}

macro_rules! string_repr {
    ($ty:ident, $what:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == trimmed)
                    .ok_or_else(|| unknown($what, trimmed, &$ty::ALL))
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(d)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_repr!(TxnKind, "transaction kind");
string_repr!(PaymentType, "payment method");
string_repr!(Reason, "reason");
string_repr!(Day, "day");

/// A recorded income or expense, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub day: Day,
    pub nepali_date: String,
    pub english_date: NaiveDate,
    pub kind: TxnKind,
    pub amount: Decimal,
    pub reason: Reason,
    pub payment_type: PaymentType,
    pub notes: Option<String>,
    pub created_at: String,
}

/// A wallet/bank row carrying the cached balance for one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: i64,
    pub user_id: i64,
    pub name: PaymentType,
    pub balance: Decimal,
    pub updated_at: String,
}

/// On-demand aggregate view. `total_balance` sums the cached wallet
/// balances, which a manual override may have moved away from
/// `total_income - total_expense`.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_balance: Decimal,
    pub last_updated: String,
}

/// Payload for creating a transaction. The server assigns id and
/// created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub day: Day,
    pub nepali_date: String,
    pub english_date: NaiveDate,
    pub kind: TxnKind,
    pub amount: Decimal,
    pub reason: Reason,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Field-level validation applied before anything reaches storage.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();
        check_amount(&mut issues, self.amount);
        check_nepali_date(&mut issues, &self.nepali_date);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(issues))
        }
    }
}

/// Partial payload for updating a transaction. Absent fields keep their
/// current value; present fields are validated exactly as on creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default)]
    pub day: Option<Day>,
    #[serde(default)]
    pub nepali_date: Option<String>,
    #[serde(default)]
    pub english_date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: Option<TxnKind>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub reason: Option<Reason>,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionPatch {
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();
        if let Some(amount) = self.amount {
            check_amount(&mut issues, amount);
        }
        if let Some(ref nepali) = self.nepali_date {
            check_nepali_date(&mut issues, nepali);
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(issues))
        }
    }

    /// True when applying this patch would change any field the balance
    /// ledger derives deltas from.
    pub fn touches_ledger(&self) -> bool {
        self.payment_type.is_some() || self.amount.is_some() || self.kind.is_some()
    }

    /// The existing row with the patch's present fields layered on top.
    pub fn merged_over(&self, existing: &Transaction) -> Transaction {
        Transaction {
            id: existing.id,
            user_id: existing.user_id,
            day: self.day.unwrap_or(existing.day),
            nepali_date: self
                .nepali_date
                .clone()
                .unwrap_or_else(|| existing.nepali_date.clone()),
            english_date: self.english_date.unwrap_or(existing.english_date),
            kind: self.kind.unwrap_or(existing.kind),
            amount: self.amount.unwrap_or(existing.amount),
            reason: self.reason.unwrap_or(existing.reason),
            payment_type: self.payment_type.unwrap_or(existing.payment_type),
            notes: self.notes.clone().or_else(|| existing.notes.clone()),
            created_at: existing.created_at.clone(),
        }
    }
}

fn check_amount(issues: &mut Vec<FieldIssue>, amount: Decimal) {
    if amount <= Decimal::ZERO {
        issues.push(FieldIssue::new("amount", "must be greater than 0"));
    }
}

fn check_nepali_date(issues: &mut Vec<FieldIssue>, nepali_date: &str) {
    if nepali_date.trim().is_empty() {
        issues.push(FieldIssue::new("nepali_date", "is required"));
    }
}
