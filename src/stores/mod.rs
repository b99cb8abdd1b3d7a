//! Contains traits and implementations for objects that store the domain
//! models.

mod account;
mod transaction;
mod user;

pub mod sqlite;

pub use account::AccountStore;
pub use transaction::TransactionStore;
pub use user::UserStore;
