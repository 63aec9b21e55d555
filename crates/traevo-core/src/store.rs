//! Collaborator interfaces consumed by the analysis engine
//!
//! Analysis code never touches the database directly: callers inject
//! implementations of these traits (the SQLite [`crate::db::Database`]
//! implements all of them). Every computation is a pure function over
//! whatever snapshot the backing store returns at call time; the engine
//! holds no shared mutable state and takes no locks of its own.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::analysis::{NewPrediction, Prediction};
use crate::error::Result;
use crate::models::{
    Budget, Category, EntryKind, LedgerEntry, MonthTotals, NewBudget, NewLedgerEntry, Period,
};

/// Optional filters for ledger queries
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub kind: Option<EntryKind>,
}

/// Transaction history and aggregates
pub trait LedgerStore {
    /// Create an entry after validating that the category is available to
    /// the user
    fn insert_entry(&self, user_id: i64, entry: &NewLedgerEntry) -> Result<LedgerEntry>;

    /// Entries matching the filter, most recent first
    fn list_entries(&self, user_id: i64, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>>;

    /// Per-direction totals for one period
    fn month_totals(&self, user_id: i64, period: Period) -> Result<MonthTotals>;

    /// Outflow total for one category in one period
    fn category_outflow(&self, user_id: i64, category_id: i64, period: Period) -> Result<Decimal>;

    /// Trailing-window history for the statistics calculator, oldest first
    fn entries_since(&self, user_id: i64, from: NaiveDate) -> Result<Vec<LedgerEntry>>;

    /// Delete an entry owned by the user; `NotFound` otherwise
    fn delete_entry(&self, user_id: i64, entry_id: i64) -> Result<()>;
}

/// Budget definitions per (user, category, period)
pub trait BudgetStore {
    /// Create a budget, enforcing category availability and the
    /// one-budget-per-(user, category, month, year) invariant
    fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<Budget>;

    /// Budgets active in the given period
    fn budgets_for_period(&self, user_id: i64, period: Period) -> Result<Vec<Budget>>;

    /// Whether a budget already exists for (user, category, period)
    fn budget_exists(&self, user_id: i64, category_id: i64, period: Period) -> Result<bool>;

    /// Replace the limit of an existing budget owned by the user
    fn update_budget_limit(&self, user_id: i64, budget_id: i64, limit: Decimal) -> Result<Budget>;

    /// Delete a budget owned by the user; `NotFound` otherwise
    fn delete_budget(&self, user_id: i64, budget_id: i64) -> Result<()>;
}

/// Category resolution
pub trait CategoryStore {
    /// Resolve a category id; `None` when it does not exist
    fn category_by_id(&self, category_id: i64) -> Result<Option<Category>>;

    /// Whether the category is user-owned or shared/global
    fn category_available(&self, category_id: i64, user_id: i64) -> Result<bool>;

    /// All categories visible to the user (own plus shared)
    fn categories_for_user(&self, user_id: i64) -> Result<Vec<Category>>;
}

/// Persisted engine predictions
pub trait PredictionStore {
    /// Persist a freshly generated prediction
    fn create_prediction(&self, user_id: i64, prediction: &NewPrediction) -> Result<Prediction>;

    /// Most recently generated prediction for the user, if any
    fn latest_prediction(&self, user_id: i64) -> Result<Option<Prediction>>;

    /// Most recent prediction targeting the given period, if any
    fn prediction_for_period(&self, user_id: i64, period: Period) -> Result<Option<Prediction>>;

    /// Delete predictions generated before the cutoff; returns the count
    fn prune_predictions_before(&self, user_id: i64, cutoff: DateTime<Utc>) -> Result<usize>;
}
