//! Pocketbook keeps track of financial accounts and transactions and answers
//! the question "where did my money go?" with a rolling spending breakdown.
//!
//! The crate exposes two services intended to be called in-process by a
//! presentation layer:
//!
//! - [AccountLedger](crate::ledger::AccountLedger) creates accounts and
//!   guarantees that each user has exactly one default account.
//! - [SpendingAggregator](crate::spending::SpendingAggregator) sums expense
//!   transactions by category over the current and two preceding calendar
//!   months, caching the result per user.
//!
//! Callers are authenticated through the
//! [IdentityResolver](crate::auth::IdentityResolver) trait, which is
//! implemented outside this crate.

#![warn(missing_docs)]

pub mod account;
pub mod auth;
pub mod cache;
pub mod db;
pub mod ledger;
pub mod money;
pub mod spending;
pub mod stores;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountId, AccountKind, NewAccount};
pub use db::initialize as initialize_db;
pub use ledger::AccountLedger;
pub use spending::{SpendingAggregator, SpendingSnapshot};
pub use user::{User, UserID};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The caller's identity could not be established.
    ///
    /// The client should prompt the user to authenticate again.
    #[error("the caller could not be authenticated")]
    Unauthorized,

    /// The requested resource could not be found.
    ///
    /// This also covers the case where a caller authenticates successfully
    /// but has no backing user record. That state indicates a data integrity
    /// fault and callers should not retry.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A monetary amount could not be parsed as a decimal number.
    ///
    /// The client should re-prompt the user with a validation message.
    #[error("\"{0}\" is not a valid decimal amount")]
    InvalidBalance(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
