//! Defines transactions as this crate sees them.
//!
//! Transactions are created and edited elsewhere; the spending aggregator
//! only ever reads them.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::user::UserID;

/// An alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// The label used to group expenses that have no category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Whether a transaction adds to or takes from a user's money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The label stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind \"{other}\"").into(),
            )),
        }
    }
}

/// A single income or expense record.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The id for the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money involved.
    pub amount: Decimal,
    /// The free-text category, if the user assigned one.
    pub category: Option<String>,
    /// The date the transaction happened.
    pub date: Date,
}

/// The details needed to record a new transaction.
///
/// Used by seeding tools and tests; the production writers of transaction
/// data live outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money involved.
    pub amount: Decimal,
    /// The free-text category, if any.
    pub category: Option<String>,
    /// The date the transaction happened.
    pub date: Date,
}
