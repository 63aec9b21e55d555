//! Domain models for Traevo
//!
//! Records are plain values that reference each other by id only; every
//! relationship is resolved through a store lookup, never an object graph.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest year a budget period may reference.
pub const BUDGET_EPOCH_YEAR: i32 = 2025;

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Money coming in (income)
    Inflow,
    /// Money going out (expense)
    Outflow,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Inflow => "inflow",
            EntryKind::Outflow => "outflow",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inflow" => Ok(EntryKind::Inflow),
            "outflow" => Ok(EntryKind::Outflow),
            _ => Err(format!("Unknown entry kind: {}", s)),
        }
    }
}

/// Recurrence tag on a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    OneTime,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::OneTime => "one_time",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_time" => Ok(Recurrence::OneTime),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(format!("Unknown recurrence: {}", s)),
        }
    }
}

/// A budgeting cycle: (month, year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Month 1-12
    pub month: u32,
    /// Year >= [`BUDGET_EPOCH_YEAR`]
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    /// Period containing the given date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    /// Validate the month range and year epoch
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=12).contains(&self.month) {
            return Err(format!("Month out of range: {}", self.month));
        }
        if self.year < BUDGET_EPOCH_YEAR {
            return Err(format!(
                "Year {} precedes budget epoch {}",
                self.year, BUDGET_EPOCH_YEAR
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A transaction category
///
/// `user_id = None` marks a shared/global category available to every user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
}

impl Category {
    /// Shared categories have no owner
    pub fn is_shared(&self) -> bool {
        self.user_id.is_none()
    }
}

/// A recorded inflow or outflow transaction
///
/// Immutable once created; the only mutation is deletion by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub description: String,
    /// Positive amount with 2 fractional digits
    pub amount: Decimal,
    pub kind: EntryKind,
    pub entry_date: NaiveDate,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a ledger entry
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub category_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub entry_date: NaiveDate,
    pub recurrence: Recurrence,
}

/// A monthly spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    /// Optional reference to the income source funding this budget
    pub income_source_id: Option<i64>,
    pub period: Period,
    /// Positive limit amount
    pub limit: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a budget
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category_id: i64,
    pub income_source_id: Option<i64>,
    pub period: Period,
    pub limit: Decimal,
}

/// Per-direction totals for one (user, month, year)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub inflow: Decimal,
    pub outflow: Decimal,
    /// inflow - outflow; negative when the month ran a deficit
    pub net: Decimal,
}

impl MonthTotals {
    pub fn zero() -> Self {
        Self {
            inflow: Decimal::ZERO,
            outflow: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }
}

/// Derived budget-consumption view; computed on demand, never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub period_month: u32,
    pub period_year: i32,
    pub limit: Decimal,
    pub actual_spend: Decimal,
    /// actual_spend / limit * 100
    pub percent_used: Decimal,
    /// limit - actual_spend; negative signals overspend
    pub remaining_balance: Decimal,
}
