//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::ExternalUserId,
    db::{CreateTable, MapRow},
    stores::UserStore,
    user::{User, UserID},
};

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if `external_id` is already taken or if
    /// there is some other SQL error.
    fn insert(&mut self, external_id: ExternalUserId) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO user (external_id) VALUES (?1)
                 RETURNING id, external_id",
            )?
            .query_row((external_id.as_str(),), Self::map_row)?;

        Ok(user)
    }

    /// Retrieve the user with the identity provider id `external_id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if no user has that id, or an
    /// [Error::SqlError] if there is some other SQL error.
    fn get_by_external_id(&self, external_id: &ExternalUserId) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, external_id FROM user WHERE external_id = :external_id")?
            .query_row(&[(":external_id", external_id.as_str())], Self::map_row)?;

        Ok(user)
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    external_id TEXT NOT NULL UNIQUE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let external_id = row.get(offset + 1)?;

        Ok(User {
            id: UserID::new(id),
            external_id,
        })
    }
}
