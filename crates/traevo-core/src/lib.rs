//! Traevo Core Library
//!
//! Shared functionality for the Traevo personal finance backend:
//! - Database access and migrations (SQLite with optional SQLCipher encryption)
//! - Ledger, budget, category, and prediction stores
//! - Financial risk projection engine (historical statistics, spend
//!   projection, ordered risk classification, insight composition)
//! - Budget status and dashboard view assembly

pub mod analysis;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod models;
pub mod status;
pub mod store;

pub use analysis::{
    AnalysisContext, MonthlyStats, NewPrediction, Prediction, PredictionEngine, RiskTier, Trend,
};
pub use dashboard::DashboardOverview;
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    Budget, BudgetStatus, Category, EntryKind, LedgerEntry, MonthTotals, NewBudget, NewLedgerEntry,
    Period, Recurrence,
};
pub use store::{BudgetStore, CategoryStore, LedgerFilter, LedgerStore, PredictionStore};
