//! The account ledger service.
//!
//! Owns account creation, including the rule that every user with at least
//! one account has exactly one default account.

use crate::{
    Error,
    account::{Account, NewAccount},
    auth::IdentityResolver,
    money,
    stores::{AccountStore, UserStore},
};

/// Creates accounts on behalf of authenticated callers.
pub struct AccountLedger<A, U> {
    accounts: A,
    users: U,
}

impl<A, U> AccountLedger<A, U>
where
    A: AccountStore,
    U: UserStore,
{
    /// Create a ledger backed by `accounts` and `users`.
    pub fn new(accounts: A, users: U) -> Self {
        Self { accounts, users }
    }

    /// Create a new account for the caller.
    ///
    /// The caller's first account becomes their default account regardless of
    /// what `new_account` requests. If the new account is the default, any
    /// previous default is demoted in the same store transaction.
    ///
    /// # Errors
    /// Returns [Error::Unauthorized] if the caller cannot be authenticated,
    /// [Error::NotFound] if the caller has no backing user record,
    /// [Error::InvalidBalance] if the submitted balance does not parse as a
    /// decimal number, or [Error::SqlError] if the store transaction fails.
    /// No account is created on failure.
    pub fn create_account(
        &mut self,
        resolver: &impl IdentityResolver,
        new_account: NewAccount,
    ) -> Result<Account, Error> {
        let external_id = resolver.resolve_caller()?;
        let user = self.users.get_by_external_id(&external_id)?;
        let balance = money::parse_amount(&new_account.balance)?;

        let account = self.accounts.create(
            user.id,
            &new_account.name,
            new_account.kind,
            balance,
            new_account.is_default,
        )?;

        tracing::info!(
            "user {} created account \"{}\" (default: {})",
            user.id,
            account.name,
            account.is_default
        );

        Ok(account)
    }
}

#[cfg(test)]
mod create_account_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::{
        Error,
        account::{AccountKind, NewAccount},
        auth::{ExternalUserId, IdentityResolver, StaticResolver},
        db::initialize,
        stores::{
            AccountStore, UserStore,
            sqlite::{SQLiteAccountStore, SQLiteUserStore},
        },
        user::UserID,
    };

    use super::AccountLedger;

    struct AnonymousResolver;

    impl IdentityResolver for AnonymousResolver {
        fn resolve_caller(&self) -> Result<ExternalUserId, Error> {
            Err(Error::Unauthorized)
        }
    }

    fn get_test_ledger() -> (
        AccountLedger<SQLiteAccountStore, SQLiteUserStore>,
        SQLiteAccountStore,
    ) {
        let conn =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        let connection = Arc::new(Mutex::new(conn));
        let mut users = SQLiteUserStore::new(connection.clone());
        users.insert(ExternalUserId::new("auth0|alice")).unwrap();
        let accounts = SQLiteAccountStore::new(connection);

        (AccountLedger::new(accounts.clone(), users), accounts)
    }

    fn new_account(name: &str, kind: AccountKind, balance: &str, is_default: bool) -> NewAccount {
        NewAccount {
            name: name.to_owned(),
            kind,
            balance: balance.to_owned(),
            is_default,
        }
    }

    #[test]
    fn first_account_becomes_default_despite_request() {
        let (mut ledger, _) = get_test_ledger();
        let resolver = StaticResolver::new("auth0|alice");

        let account = ledger
            .create_account(
                &resolver,
                new_account("Cash", AccountKind::Savings, "100.00", false),
            )
            .unwrap();

        assert!(account.is_default);
        assert_eq!(account.balance, Decimal::new(10000, 2));
        assert_eq!(account.name, "Cash");
        assert_eq!(account.kind, AccountKind::Savings);
    }

    #[test]
    fn requested_default_demotes_previous_default() {
        let (mut ledger, accounts) = get_test_ledger();
        let resolver = StaticResolver::new("auth0|alice");

        let first = ledger
            .create_account(
                &resolver,
                new_account("Cash", AccountKind::Savings, "100.00", false),
            )
            .unwrap();
        let second = ledger
            .create_account(
                &resolver,
                new_account("Travel", AccountKind::Expense, "0", true),
            )
            .unwrap();

        assert!(second.is_default);

        let all = accounts.get_by_user(first.user_id).unwrap();
        let first_after = all.iter().find(|account| account.id == first.id).unwrap();
        assert!(!first_after.is_default);

        let defaults = all.iter().filter(|account| account.is_default).count();
        assert_eq!(defaults, 1);
    }

    #[test]
    fn invalid_balance_is_rejected_and_nothing_is_created() {
        let (mut ledger, accounts) = get_test_ledger();
        let resolver = StaticResolver::new("auth0|alice");

        let result = ledger.create_account(
            &resolver,
            new_account("Cash", AccountKind::Savings, "lots", false),
        );

        assert_eq!(result, Err(Error::InvalidBalance("lots".to_owned())));

        let all = accounts.get_by_user(UserID::new(1)).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn unauthenticated_caller_is_rejected() {
        let (mut ledger, _) = get_test_ledger();

        let result = ledger.create_account(
            &AnonymousResolver,
            new_account("Cash", AccountKind::Savings, "0", false),
        );

        assert_eq!(result, Err(Error::Unauthorized));
    }

    #[test]
    fn caller_without_user_record_is_not_found() {
        let (mut ledger, _) = get_test_ledger();
        let resolver = StaticResolver::new("auth0|stranger");

        let result = ledger.create_account(
            &resolver,
            new_account("Cash", AccountKind::Savings, "0", false),
        );

        assert_eq!(result, Err(Error::NotFound));
    }
}
