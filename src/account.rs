//! Defines financial accounts and their supporting types.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{money, user::UserID};

/// An alias for the integer type used for account IDs.
pub type AccountId = i64;

/// What an account is for.
///
/// These are domain labels for the account itself, not transaction types: an
/// `Expense` account is a wallet money is spent from, an `Income` account is
/// a wallet money arrives into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// An account used to keep money aside.
    Savings,
    /// A wallet that money is spent from.
    Expense,
    /// A wallet that money arrives into.
    Income,
}

impl AccountKind {
    /// The label stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Savings => "savings",
            AccountKind::Expense => "expense",
            AccountKind::Income => "income",
        }
    }
}

impl ToSql for AccountKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for AccountKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "savings" => Ok(AccountKind::Savings),
            "expense" => Ok(AccountKind::Expense),
            "income" => Ok(AccountKind::Income),
            other => Err(FromSqlError::Other(
                format!("unknown account kind \"{other}\"").into(),
            )),
        }
    }
}

/// A financial account owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The user that owns the account.
    pub user_id: UserID,
    /// The display name of the account.
    pub name: String,
    /// What the account is for.
    pub kind: AccountKind,
    /// The current balance.
    pub balance: Decimal,
    /// Whether this is the user's default account.
    ///
    /// Each user has exactly one default account once they own any account at
    /// all; the account stores enforce this.
    pub is_default: bool,
}

impl Account {
    /// The balance as a plain number, for display only.
    ///
    /// Aggregation must use the exact [Decimal] balance.
    pub fn balance_display(&self) -> f64 {
        money::to_display(self.balance)
    }
}

/// The details a caller submits to create an account.
///
/// The balance is kept as the raw submitted text; it is validated when the
/// account is created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// What the account is for.
    pub kind: AccountKind,
    /// The opening balance as submitted, e.g. "100.00".
    pub balance: String,
    /// Whether the caller asked for this account to become the default.
    ///
    /// A user's first account becomes the default regardless of this flag.
    pub is_default: bool,
}
