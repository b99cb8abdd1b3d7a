//! Computes the rolling spending breakdown by category.
//!
//! The breakdown covers the current calendar month plus the two preceding
//! months, counts only expense transactions and sums amounts exactly with
//! [Decimal]. Results are cached per user in a [SpendingCache].

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};

use crate::{
    Error,
    auth::IdentityResolver,
    cache::{CacheKey, SpendingCache, TAG_SPENDING, TAG_STATISTICS},
    stores::{TransactionStore, UserStore},
    transaction::{Transaction, UNCATEGORIZED_LABEL},
};

/// The cache operation name under which snapshots are stored.
const OPERATION: &str = "spending_by_category";

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The summed expense amount for the category.
    pub total: Decimal,
}

/// A point-in-time spending breakdown, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSnapshot {
    /// Per-category totals, sorted by descending total.
    pub categories: Vec<CategoryTotal>,
    /// The sum of all category totals.
    pub total: Decimal,
    /// The category with the highest total, absent if no expenses matched.
    pub top_category: Option<String>,
}

/// The date range the spending breakdown covers: from the first day of the
/// month two months before `today` through `today`, both ends included.
pub fn spending_window(today: Date) -> RangeInclusive<Date> {
    let mut year = today.year();
    let mut month = today.month();

    for _ in 0..2 {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    let start = Date::from_calendar_date(year, month, 1).unwrap();

    start..=today
}

/// Group `transactions` by category and sum their amounts exactly.
///
/// Transactions without a category (or with a blank one) are grouped under
/// [UNCATEGORIZED_LABEL]. Categories are sorted by descending total; ties
/// keep the order in which the categories were first seen, so the result is
/// deterministic for a fixed input.
pub fn aggregate_by_category(transactions: &[Transaction]) -> SpendingSnapshot {
    let mut seen_order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, Decimal> = HashMap::new();

    for transaction in transactions {
        let category = match &transaction.category {
            Some(category) if !category.trim().is_empty() => category.clone(),
            _ => UNCATEGORIZED_LABEL.to_owned(),
        };

        if !totals.contains_key(&category) {
            seen_order.push(category.clone());
        }

        *totals.entry(category).or_insert(Decimal::ZERO) += transaction.amount;
    }

    let mut categories: Vec<CategoryTotal> = seen_order
        .into_iter()
        .map(|category| {
            let total = totals[&category];
            CategoryTotal { category, total }
        })
        .collect();

    // Stable sort, so tied categories stay in first-seen order.
    categories.sort_by(|a, b| b.total.cmp(&a.total));

    let total = categories
        .iter()
        .fold(Decimal::ZERO, |sum, category| sum + category.total);
    let top_category = categories.first().map(|entry| entry.category.clone());

    SpendingSnapshot {
        categories,
        total,
        top_category,
    }
}

/// Computes rolling spending breakdowns for authenticated callers.
pub struct SpendingAggregator<T, U> {
    transactions: T,
    users: U,
    cache: Arc<SpendingCache>,
}

impl<T, U> SpendingAggregator<T, U>
where
    T: TransactionStore,
    U: UserStore,
{
    /// Create an aggregator reading from `transactions` and `users`, caching
    /// results in `cache`.
    pub fn new(transactions: T, users: U, cache: Arc<SpendingCache>) -> Self {
        Self {
            transactions,
            users,
            cache,
        }
    }

    /// Compute the caller's spending breakdown for the window ending today.
    ///
    /// # Errors
    /// Returns [Error::Unauthorized] if the caller cannot be authenticated,
    /// [Error::NotFound] if the caller has no backing user record, or
    /// [Error::SqlError] if the store query fails. No partial snapshot is
    /// ever returned.
    pub fn spending_by_category(
        &self,
        resolver: &impl IdentityResolver,
    ) -> Result<SpendingSnapshot, Error> {
        self.spending_by_category_on(resolver, OffsetDateTime::now_utc().date())
    }

    /// Compute the caller's spending breakdown for the window ending on
    /// `today`.
    ///
    /// The evaluation date is a parameter so that callers with their own
    /// notion of "today" (tests, report tools working in a local timezone)
    /// can pin it.
    ///
    /// # Errors
    /// See [SpendingAggregator::spending_by_category].
    pub fn spending_by_category_on(
        &self,
        resolver: &impl IdentityResolver,
        today: Date,
    ) -> Result<SpendingSnapshot, Error> {
        let external_id = resolver.resolve_caller()?;
        let user = self.users.get_by_external_id(&external_id)?;

        let key = CacheKey::new(user.id, OPERATION);
        if let Some(snapshot) = self.cache.get(&key) {
            tracing::debug!("returning cached spending snapshot for user {}", user.id);
            return Ok(snapshot);
        }

        let transactions = self
            .transactions
            .expenses_in_range(user.id, spending_window(today))?;
        let snapshot = aggregate_by_category(&transactions);

        self.cache
            .put(key, snapshot.clone(), &[TAG_STATISTICS, TAG_SPENDING]);

        Ok(snapshot)
    }
}

#[cfg(test)]
mod spending_window_tests {
    use time::macros::date;

    use super::spending_window;

    #[test]
    fn spans_current_and_two_preceding_months() {
        let window = spending_window(date!(2024 - 05 - 15));

        assert_eq!(*window.start(), date!(2024 - 03 - 01));
        assert_eq!(*window.end(), date!(2024 - 05 - 15));
    }

    #[test]
    fn crosses_year_boundaries() {
        let window = spending_window(date!(2025 - 01 - 10));

        assert_eq!(*window.start(), date!(2024 - 11 - 01));
        assert_eq!(*window.end(), date!(2025 - 01 - 10));
    }

    #[test]
    fn includes_start_day_and_excludes_the_day_before() {
        let window = spending_window(date!(2024 - 05 - 15));

        assert!(window.contains(&date!(2024 - 03 - 01)));
        assert!(!window.contains(&date!(2024 - 02 - 29)));
    }
}

#[cfg(test)]
mod aggregate_by_category_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        transaction::{Transaction, TransactionKind, UNCATEGORIZED_LABEL},
        user::UserID,
    };

    use super::aggregate_by_category;

    fn expense(id: i64, amount: i64, category: Option<&str>) -> Transaction {
        Transaction {
            id,
            user_id: UserID::new(1),
            kind: TransactionKind::Expense,
            amount: Decimal::new(amount, 0),
            category: category.map(str::to_owned),
            date: date!(2024 - 05 - 01),
        }
    }

    #[test]
    fn groups_and_sorts_by_descending_total() {
        let transactions = vec![
            expense(1, 50, Some("Food")),
            expense(2, 30, Some("Food")),
            expense(3, 20, Some("Transport")),
        ];

        let snapshot = aggregate_by_category(&transactions);

        assert_eq!(snapshot.categories.len(), 2);
        assert_eq!(snapshot.categories[0].category, "Food");
        assert_eq!(snapshot.categories[0].total, Decimal::new(80, 0));
        assert_eq!(snapshot.categories[1].category, "Transport");
        assert_eq!(snapshot.categories[1].total, Decimal::new(20, 0));
        assert_eq!(snapshot.total, Decimal::new(100, 0));
        assert_eq!(snapshot.top_category.as_deref(), Some("Food"));
    }

    #[test]
    fn grand_total_equals_sum_of_category_totals() {
        let transactions = vec![
            expense(1, 12, Some("Food")),
            expense(2, 34, Some("Transport")),
            expense(3, 5, None),
        ];

        let snapshot = aggregate_by_category(&transactions);

        let summed = snapshot
            .categories
            .iter()
            .fold(Decimal::ZERO, |sum, entry| sum + entry.total);
        assert_eq!(snapshot.total, summed);
    }

    #[test]
    fn missing_or_blank_categories_fall_back_to_uncategorized() {
        let transactions = vec![
            expense(1, 10, None),
            expense(2, 15, Some("")),
            expense(3, 20, Some("   ")),
        ];

        let snapshot = aggregate_by_category(&transactions);

        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.categories[0].category, UNCATEGORIZED_LABEL);
        assert_eq!(snapshot.categories[0].total, Decimal::new(45, 0));
    }

    #[test]
    fn empty_input_produces_empty_snapshot() {
        let snapshot = aggregate_by_category(&[]);

        assert!(snapshot.categories.is_empty());
        assert_eq!(snapshot.total, Decimal::ZERO);
        assert_eq!(snapshot.top_category, None);
    }

    #[test]
    fn tied_totals_keep_first_seen_order() {
        let transactions = vec![
            expense(1, 20, Some("Transport")),
            expense(2, 20, Some("Food")),
        ];

        let snapshot = aggregate_by_category(&transactions);

        assert_eq!(snapshot.categories[0].category, "Transport");
        assert_eq!(snapshot.categories[1].category, "Food");
        assert_eq!(snapshot.top_category.as_deref(), Some("Transport"));
    }

    #[test]
    fn sums_are_penny_exact() {
        let transactions: Vec<_> = (0..1000)
            .map(|i| Transaction {
                id: i,
                user_id: UserID::new(1),
                kind: TransactionKind::Expense,
                amount: Decimal::new(10, 2), // 0.10
                category: Some("Coffee".to_owned()),
                date: date!(2024 - 05 - 01),
            })
            .collect();

        let snapshot = aggregate_by_category(&transactions);

        assert_eq!(snapshot.total, Decimal::new(100, 0));
    }
}
