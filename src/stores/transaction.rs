//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    transaction::{NewTransaction, Transaction},
    user::UserID,
};

/// Handles the retrieval of transactions.
///
/// Transaction data is owned by external writers; the only mutation this
/// crate performs is [TransactionStore::insert], which exists for seeding
/// tools and tests.
pub trait TransactionStore {
    /// Record a new transaction in the store.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the insert could not be executed.
    fn insert(&mut self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve the expense transactions of `user_id` dated within
    /// `date_range` (inclusive on both ends), in insertion order.
    ///
    /// Income transactions are never returned.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query could not be executed.
    fn expenses_in_range(
        &self,
        user_id: UserID,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<Transaction>, Error>;
}
