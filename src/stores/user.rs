//! Defines the user store trait.

use crate::{Error, auth::ExternalUserId, user::User};

/// Handles the retrieval of users.
///
/// Users are provisioned by the identity layer; this crate looks them up by
/// the id the identity provider issued. [UserStore::insert] exists for
/// seeding tools and tests.
pub trait UserStore {
    /// Record a new user in the store.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the insert could not be executed, e.g.
    /// if `external_id` is already taken.
    fn insert(&mut self, external_id: ExternalUserId) -> Result<User, Error>;

    /// Look up the user the identity provider knows as `external_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such user exists. Callers treat this
    /// as a data integrity fault and do not retry.
    fn get_by_external_id(&self, external_id: &ExternalUserId) -> Result<User, Error>;
}
