//! Defines the account store trait.

use rust_decimal::Decimal;

use crate::{
    Error,
    account::{Account, AccountKind},
    user::UserID,
};

/// Handles the creation and retrieval of accounts.
pub trait AccountStore {
    /// Create a new account for `user_id`.
    ///
    /// This is a single named transactional operation: counting the user's
    /// accounts, demoting the previous default and inserting the new row must
    /// happen atomically so that two concurrent creations for the same user
    /// cannot both end up as the default account.
    ///
    /// Implementations must guarantee that after the call commits:
    /// - the user's first account is the default regardless of
    ///   `requested_default`, and
    /// - if `requested_default` is true, every other account of the user has
    ///   its default flag cleared.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the transaction could not be executed. No
    /// partial account is created on failure.
    fn create(
        &mut self,
        user_id: UserID,
        name: &str,
        kind: AccountKind,
        balance: Decimal,
        requested_default: bool,
    ) -> Result<Account, Error>;

    /// Count how many accounts `user_id` owns.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query could not be executed.
    fn count_by_user(&self, user_id: UserID) -> Result<usize, Error>;

    /// Get all accounts owned by `user_id`, in insertion order.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query could not be executed.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Account>, Error>;
}
