//! Dashboard overview assembly
//!
//! One call returns everything the home screen needs: month KPIs, budget
//! statuses, the current prediction, and a few derived figures. All of it
//! is computed from the same store snapshot; nothing here holds state.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::analysis::{days_in_month, AnalysisContext, Prediction, PredictionEngine};
use crate::models::{BudgetStatus, MonthTotals};
use crate::status::budget_statuses;
use crate::Result;

/// Consolidated view for the dashboard home screen
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub totals: MonthTotals,
    pub budgets: Vec<BudgetStatus>,
    pub prediction: Prediction,
    /// Month outflow as a percentage of all budget limits combined, 2 dp
    pub overall_percent_used: Decimal,
    pub days_remaining: u32,
    /// Average outflow per elapsed day, 2 dp
    pub daily_average_spend: Decimal,
}

/// Assemble the dashboard overview for the context's current period
///
/// Uses the lazy get-or-generate path for the prediction, so the first
/// dashboard load after signup is what triggers the initial engine run.
pub fn overview(ctx: &AnalysisContext<'_>, engine: &PredictionEngine) -> Result<DashboardOverview> {
    use chrono::Datelike;

    let period = ctx.current_period();
    let totals = ctx.ledger.month_totals(ctx.user_id, period)?;
    let budgets = budget_statuses(ctx, period)?;
    let prediction = engine.latest_or_generate(ctx)?;

    let combined_limit: Decimal = budgets.iter().map(|b| b.limit).sum();
    let overall_percent_used = if combined_limit > Decimal::ZERO {
        (totals.outflow / combined_limit * Decimal::from(100))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    let elapsed = ctx.today.day();
    let days_remaining = days_in_month(period.year, period.month).saturating_sub(elapsed);
    let daily_average_spend = if elapsed > 0 {
        (totals.outflow / Decimal::from(elapsed))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    Ok(DashboardOverview {
        totals,
        budgets,
        prediction,
        overall_percent_used,
        days_remaining,
        daily_average_spend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{EntryKind, NewBudget, NewLedgerEntry, Period, Recurrence};
    use crate::store::{BudgetStore, LedgerStore};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overview_combines_totals_budgets_and_prediction() {
        let db = Database::in_memory().unwrap();
        let category = db.create_category(Some(1), "Alimentação").unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();

        db.create_budget(
            1,
            &NewBudget {
                category_id: category.id,
                income_source_id: None,
                period: Period::new(6, 2026),
                limit: dec!(1000.00),
            },
        )
        .unwrap();
        db.insert_entry(
            1,
            &NewLedgerEntry {
                category_id: category.id,
                description: "salário".to_string(),
                amount: dec!(3000.00),
                kind: EntryKind::Inflow,
                entry_date: today,
                recurrence: Recurrence::Monthly,
            },
        )
        .unwrap();
        db.insert_entry(
            1,
            &NewLedgerEntry {
                category_id: category.id,
                description: "mercado".to_string(),
                amount: dec!(250.00),
                kind: EntryKind::Outflow,
                entry_date: today,
                recurrence: Recurrence::OneTime,
            },
        )
        .unwrap();

        let ctx = AnalysisContext::for_database(&db, 1, today);
        let engine = PredictionEngine::new();
        let view = overview(&ctx, &engine).unwrap();

        assert_eq!(view.totals.inflow, dec!(3000.00));
        assert_eq!(view.totals.outflow, dec!(250.00));
        assert_eq!(view.totals.net, dec!(2750.00));
        assert_eq!(view.budgets.len(), 1);
        assert_eq!(view.overall_percent_used, dec!(25.00));
        assert_eq!(view.days_remaining, 20); // June has 30 days
        assert_eq!(view.daily_average_spend, dec!(25.00));
        assert_eq!(view.prediction.target_month, 6);
    }

    #[test]
    fn test_overview_without_budgets_has_zero_percent() {
        let db = Database::in_memory().unwrap();
        db.create_category(Some(1), "Alimentação").unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();

        let ctx = AnalysisContext::for_database(&db, 1, today);
        let view = overview(&ctx, &PredictionEngine::new()).unwrap();

        assert!(view.budgets.is_empty());
        assert_eq!(view.overall_percent_used, Decimal::ZERO);
        // No budgets: the engine's cautious default shows through
        assert_eq!(view.prediction.risk_tier, crate::analysis::RiskTier::Medium);
    }

    #[test]
    fn test_overview_reuses_existing_prediction() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let ctx = AnalysisContext::for_database(&db, 1, today);
        let engine = PredictionEngine::new();

        let first = overview(&ctx, &engine).unwrap();
        let second = overview(&ctx, &engine).unwrap();
        assert_eq!(first.prediction.id, second.prediction.id);
    }
}
