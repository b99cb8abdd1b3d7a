//! Implements a SQLite backed account store.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, TransactionBehavior, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error,
    account::{Account, AccountKind},
    db::{CreateTable, MapRow},
    stores::AccountStore,
    user::UserID,
};

/// Stores accounts in a SQLite database.
///
/// Note that because an account belongs to a [User](crate::user::User), the
/// user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteAccountStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteAccountStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl AccountStore for SQLiteAccountStore {
    /// Create a new account in the database, enforcing the single-default
    /// invariant.
    ///
    /// The count of the user's accounts, the demotion of the previous default
    /// and the insert run inside one `IMMEDIATE` transaction, so concurrent
    /// creations for the same user serialize at the database level.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the transaction could not be executed.
    fn create(
        &mut self,
        user_id: UserID,
        name: &str,
        kind: AccountKind,
        balance: Decimal,
        requested_default: bool,
    ) -> Result<Account, Error> {
        let mut connection = self.connection.lock().unwrap();
        let tx = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: i64 = tx.query_row(
            "SELECT COUNT(id) FROM account WHERE user_id = ?1",
            (user_id.as_i64(),),
            |row| row.get(0),
        )?;

        // The user's first account is always the default.
        let is_default = count == 0 || requested_default;

        if is_default {
            tx.execute(
                "UPDATE account SET is_default = 0 WHERE user_id = ?1",
                (user_id.as_i64(),),
            )?;
        }

        let account = tx
            .prepare(
                "INSERT INTO account (user_id, name, kind, balance, is_default)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, user_id, name, kind, balance, is_default",
            )?
            .query_row(
                (
                    user_id.as_i64(),
                    name,
                    kind,
                    balance.to_string(),
                    is_default,
                ),
                Self::map_row,
            )?;

        tx.commit()?;

        tracing::debug!(
            "created account {} for user {} (default: {})",
            account.id,
            user_id,
            account.is_default
        );

        Ok(account)
    }

    /// Get the number of accounts owned by `user_id`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is some SQL error.
    fn count_by_user(&self, user_id: UserID) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT COUNT(id) FROM account WHERE user_id = ?1",
                (user_id.as_i64(),),
                |row| row.get::<_, i64>(0).map(|count| count as usize),
            )
            .map_err(|error| error.into())
    }

    /// Retrieve the accounts owned by `user_id` in insertion order.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is some SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Account>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, kind, balance, is_default FROM account
                 WHERE user_id = :user_id
                 ORDER BY id ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_account| maybe_account.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteAccountStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS account (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    balance TEXT NOT NULL,
                    is_default INTEGER NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteAccountStore {
    type ReturnType = Account;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id: i64 = row.get(offset + 1)?;
        let name = row.get(offset + 2)?;
        let kind = row.get(offset + 3)?;
        let balance_text: String = row.get(offset + 4)?;
        let is_default = row.get(offset + 5)?;

        let balance = Decimal::from_str(&balance_text).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 4, Type::Text, Box::new(error))
        })?;

        Ok(Account {
            id,
            user_id: UserID::new(user_id),
            name,
            kind,
            balance,
            is_default,
        })
    }
}
