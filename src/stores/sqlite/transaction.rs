//! Implements a SQLite backed transaction store.

use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    stores::TransactionStore,
    transaction::{NewTransaction, Transaction, TransactionKind},
    user::UserID,
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction belongs to a [User](crate::user::User),
/// the user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Record a new transaction in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is some SQL error.
    fn insert(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO \"transaction\" (user_id, kind, amount, category, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, user_id, kind, amount, category, date",
            )?
            .query_row(
                (
                    transaction.user_id.as_i64(),
                    transaction.kind,
                    transaction.amount.to_string(),
                    transaction.category,
                    transaction.date,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve the expense transactions of `user_id` dated within
    /// `date_range`, endpoints included, in insertion order.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is some SQL error.
    fn expenses_in_range(
        &self,
        user_id: UserID,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, kind, amount, category, date FROM \"transaction\"
                 WHERE user_id = ?1 AND kind = ?2 AND date BETWEEN ?3 AND ?4
                 ORDER BY id ASC",
            )?
            .query_map(
                (
                    user_id.as_i64(),
                    TransactionKind::Expense,
                    date_range.start(),
                    date_range.end(),
                ),
                Self::map_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    kind TEXT NOT NULL,
                    amount TEXT NOT NULL,
                    category TEXT,
                    date TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id: i64 = row.get(offset + 1)?;
        let kind = row.get(offset + 2)?;
        let amount_text: String = row.get(offset + 3)?;
        let category = row.get(offset + 4)?;
        let date = row.get(offset + 5)?;

        let amount = Decimal::from_str(&amount_text).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 3, Type::Text, Box::new(error))
        })?;

        Ok(Transaction {
            id,
            user_id: UserID::new(user_id),
            kind,
            amount,
            category,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        auth::ExternalUserId,
        db::initialize,
        stores::{TransactionStore, UserStore, sqlite::SQLiteUserStore},
        transaction::{NewTransaction, TransactionKind},
        user::UserID,
    };

    use super::SQLiteTransactionStore;

    fn get_test_store() -> (SQLiteTransactionStore, UserID) {
        let conn =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        let connection = Arc::new(Mutex::new(conn));
        let user = SQLiteUserStore::new(connection.clone())
            .insert(ExternalUserId::new("auth0|alice"))
            .unwrap();

        (SQLiteTransactionStore::new(connection), user.id)
    }

    fn expense(
        user_id: UserID,
        amount: i64,
        category: Option<&str>,
        date: time::Date,
    ) -> NewTransaction {
        NewTransaction {
            user_id,
            kind: TransactionKind::Expense,
            amount: Decimal::new(amount, 0),
            category: category.map(str::to_owned),
            date,
        }
    }

    #[test]
    fn returns_expenses_within_range_inclusive() {
        let (mut store, user_id) = get_test_store();

        store
            .insert(expense(user_id, 10, Some("Food"), date!(2024 - 03 - 01)))
            .unwrap();
        store
            .insert(expense(user_id, 20, Some("Food"), date!(2024 - 05 - 31)))
            .unwrap();
        // One day before the range starts.
        store
            .insert(expense(user_id, 30, Some("Food"), date!(2024 - 02 - 29)))
            .unwrap();

        let results = store
            .expenses_in_range(user_id, date!(2024 - 03 - 01)..=date!(2024 - 05 - 31))
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].amount, Decimal::new(10, 0));
        assert_eq!(results[1].amount, Decimal::new(20, 0));
    }

    #[test]
    fn ignores_income_transactions() {
        let (mut store, user_id) = get_test_store();

        store
            .insert(NewTransaction {
                user_id,
                kind: TransactionKind::Income,
                amount: Decimal::new(1000, 0),
                category: Some("Salary".to_owned()),
                date: date!(2024 - 03 - 15),
            })
            .unwrap();
        store
            .insert(expense(user_id, 50, Some("Food"), date!(2024 - 03 - 15)))
            .unwrap();

        let results = store
            .expenses_in_range(user_id, date!(2024 - 03 - 01)..=date!(2024 - 03 - 31))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, TransactionKind::Expense);
    }

    #[test]
    fn ignores_other_users_transactions() {
        let (mut store, user_id) = get_test_store();

        store
            .insert(expense(user_id, 50, Some("Food"), date!(2024 - 03 - 15)))
            .unwrap();

        let results = store
            .expenses_in_range(UserID::new(999), date!(2024 - 03 - 01)..=date!(2024 - 03 - 31))
            .unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn preserves_missing_category_and_exact_amounts() {
        let (mut store, user_id) = get_test_store();

        store
            .insert(NewTransaction {
                user_id,
                kind: TransactionKind::Expense,
                amount: Decimal::new(12345, 2),
                category: None,
                date: date!(2024 - 03 - 15),
            })
            .unwrap();

        let results = store
            .expenses_in_range(user_id, date!(2024 - 03 - 01)..=date!(2024 - 03 - 31))
            .unwrap();

        assert_eq!(results[0].category, None);
        assert_eq!(results[0].amount, Decimal::new(12345, 2));
    }
}
