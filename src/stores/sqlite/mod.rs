//! SQLite backed implementations of the store traits.
//!
//! All stores share a single [Connection](rusqlite::Connection) behind an
//! `Arc<Mutex<..>>` so that they can be cloned into services freely.

pub mod account;
pub mod transaction;
pub mod user;

pub use account::SQLiteAccountStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;
