//! Prediction engine - orchestrates the projection pipeline and persistence

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::models::Period;
use crate::store::{BudgetStore, CategoryStore, LedgerStore, PredictionStore};
use crate::Result;

use super::insight::compose_insight;
use super::projector::{days_in_month, project_month_spend};
use super::risk::classify_risk;
use super::stats::monthly_statistics;
use super::types::{NewPrediction, Prediction};

/// Context provided to the analysis functions
///
/// Bundles the injected store interfaces with the user being analyzed and
/// an explicit `today`, so every run is reproducible from its inputs.
pub struct AnalysisContext<'a> {
    pub ledger: &'a dyn LedgerStore,
    pub budgets: &'a dyn BudgetStore,
    pub categories: &'a dyn CategoryStore,
    pub predictions: &'a dyn PredictionStore,
    pub user_id: i64,
    pub today: NaiveDate,
}

impl<'a> AnalysisContext<'a> {
    /// Create a context from individually injected stores
    pub fn new(
        ledger: &'a dyn LedgerStore,
        budgets: &'a dyn BudgetStore,
        categories: &'a dyn CategoryStore,
        predictions: &'a dyn PredictionStore,
        user_id: i64,
        today: NaiveDate,
    ) -> Self {
        Self {
            ledger,
            budgets,
            categories,
            predictions,
            user_id,
            today,
        }
    }

    /// Convenience constructor backing every store with the same database
    pub fn for_database(db: &'a Database, user_id: i64, today: NaiveDate) -> Self {
        Self::new(db, db, db, db, user_id, today)
    }

    /// The period containing `today`
    pub fn current_period(&self) -> Period {
        Period::of(self.today)
    }
}

/// The projection engine
///
/// Deterministic heuristic, not a statistical model: identical store
/// snapshots and `today` always produce the same prediction.
pub struct PredictionEngine {
    /// Trailing history window in months (default 6)
    history_months: u32,
    /// Prediction retention in days (default 90)
    retention_days: i64,
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionEngine {
    pub fn new() -> Self {
        Self {
            history_months: 6,
            retention_days: 90,
        }
    }

    pub fn with_history_months(mut self, months: u32) -> Self {
        self.history_months = months;
        self
    }

    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    /// Generate and persist a prediction for the current period
    ///
    /// Runs statistics -> projection -> classification -> insight over a
    /// snapshot read from the stores, then persists the result. This is
    /// also the "refresh" action: it always writes a new record, even if
    /// one was generated moments earlier.
    pub fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Prediction> {
        let period = ctx.current_period();

        // Months are approximated as 30 days for the window cutoff
        let window_start = ctx.today - Duration::days(self.history_months as i64 * 30);
        let history = ctx.ledger.entries_since(ctx.user_id, window_start)?;
        let stats = monthly_statistics(&history);

        let totals = ctx.ledger.month_totals(ctx.user_id, period)?;
        let elapsed_days = ctx.today.day();
        let projected = project_month_spend(
            totals.outflow,
            elapsed_days,
            days_in_month(period.year, period.month),
            &stats,
        );

        let budgets = ctx.budgets.budgets_for_period(ctx.user_id, period)?;
        let total_limit = if budgets.is_empty() {
            None
        } else {
            Some(budgets.iter().map(|b| b.limit).sum::<Decimal>())
        };

        let tier = classify_risk(projected, total_limit, totals.outflow, elapsed_days, stats.trend);
        let message = compose_insight(tier, projected, stats.trend);

        let prediction = ctx.predictions.create_prediction(
            ctx.user_id,
            &NewPrediction {
                projected_amount: projected,
                risk_tier: tier,
                message,
                target: period,
            },
        )?;

        tracing::info!(
            user_id = ctx.user_id,
            period = %period,
            tier = tier.as_str(),
            projected = %projected,
            trend = stats.trend.as_str(),
            "Prediction generated"
        );

        Ok(prediction)
    }

    /// Return the latest persisted prediction, generating one if none exists
    ///
    /// The only cache-like behavior in the system: there is no TTL and no
    /// invalidation when new ledger entries arrive - staleness is resolved
    /// only by an explicit [`PredictionEngine::generate`]. Two concurrent
    /// calls with no existing prediction may each compute and persist; the
    /// store's transactional guarantees keep the records consistent, but no
    /// deduplication is attempted.
    pub fn latest_or_generate(&self, ctx: &AnalysisContext<'_>) -> Result<Prediction> {
        match ctx.predictions.latest_prediction(ctx.user_id)? {
            Some(prediction) => Ok(prediction),
            None => self.generate(ctx),
        }
    }

    /// Delete predictions older than the retention window
    pub fn prune_stale(&self, ctx: &AnalysisContext<'_>) -> Result<usize> {
        let cutoff = (ctx.today - Duration::days(self.retention_days))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        let pruned = ctx
            .predictions
            .prune_predictions_before(ctx.user_id, cutoff)?;
        if pruned > 0 {
            tracing::debug!(user_id = ctx.user_id, pruned, "Stale predictions pruned");
        }
        Ok(pruned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RiskTier;
    use crate::models::{EntryKind, NewBudget, NewLedgerEntry, Recurrence};
    use rust_decimal_macros::dec;

    fn fixture() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let category = db.create_category(Some(1), "Alimentação").unwrap();
        (db, category.id)
    }

    fn outflow(category_id: i64, date: NaiveDate, amount: Decimal) -> NewLedgerEntry {
        NewLedgerEntry {
            category_id,
            description: "mercado".to_string(),
            amount,
            kind: EntryKind::Outflow,
            entry_date: date,
            recurrence: Recurrence::OneTime,
        }
    }

    #[test]
    fn test_no_budgets_no_history_is_zero_projection_medium_tier() {
        let (db, _) = fixture();
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let ctx = AnalysisContext::for_database(&db, 1, today);

        let prediction = PredictionEngine::new().generate(&ctx).unwrap();
        assert_eq!(prediction.projected_amount, dec!(0.00));
        assert_eq!(prediction.risk_tier, RiskTier::Medium);
        assert_eq!(prediction.target_month, 6);
        assert_eq!(prediction.target_year, 2026);
    }

    #[test]
    fn test_generate_projects_current_pace_against_budget() {
        let (db, category_id) = fixture();
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();

        // 300 spent over the first 15 days of a 30-day month -> 600 projected
        db.insert_entry(
            1,
            &outflow(
                category_id,
                NaiveDate::from_ymd_opt(2026, 6, 10).unwrap(),
                dec!(300.00),
            ),
        )
        .unwrap();
        db.create_budget(
            1,
            &NewBudget {
                category_id,
                income_source_id: None,
                period: Period::new(6, 2026),
                limit: dec!(1000.00),
            },
        )
        .unwrap();

        let ctx = AnalysisContext::for_database(&db, 1, today);
        let prediction = PredictionEngine::new().generate(&ctx).unwrap();

        // 600 / 1000 = 60% projected, 30% current -> low risk
        assert_eq!(prediction.projected_amount, dec!(600.00));
        assert_eq!(prediction.risk_tier, RiskTier::Low);
        assert!(prediction.message.contains("R$ 600.00"));
    }

    #[test]
    fn test_latest_or_generate_persists_once_then_reuses() {
        let (db, _) = fixture();
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let ctx = AnalysisContext::for_database(&db, 1, today);
        let engine = PredictionEngine::new();

        let first = engine.latest_or_generate(&ctx).unwrap();
        let second = engine.latest_or_generate(&ctx).unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_refresh_always_persists_a_new_record() {
        let (db, _) = fixture();
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let ctx = AnalysisContext::for_database(&db, 1, today);
        let engine = PredictionEngine::new();

        let first = engine.generate(&ctx).unwrap();
        let second = engine.generate(&ctx).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_new_entries_do_not_invalidate_cached_prediction() {
        let (db, category_id) = fixture();
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let ctx = AnalysisContext::for_database(&db, 1, today);
        let engine = PredictionEngine::new();

        let cached = engine.latest_or_generate(&ctx).unwrap();

        // Known staleness gap: the cached prediction survives new entries
        db.insert_entry(1, &outflow(category_id, today, dec!(500.00)))
            .unwrap();
        let still_cached = engine.latest_or_generate(&ctx).unwrap();
        assert_eq!(cached.id, still_cached.id);
        assert_eq!(cached.projected_amount, still_cached.projected_amount);
    }

    #[test]
    fn test_prune_stale_respects_retention_window() {
        let (db, _) = fixture();
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let ctx = AnalysisContext::for_database(&db, 1, today);
        let engine = PredictionEngine::new();

        let prediction = engine.generate(&ctx).unwrap();

        // Fresh prediction survives
        assert_eq!(engine.prune_stale(&ctx).unwrap(), 0);

        // Backdate it past the 90-day retention window
        let conn = db.conn().unwrap();
        conn.execute(
            "UPDATE predictions SET generated_at = '2026-01-01 00:00:00' WHERE id = ?",
            rusqlite::params![prediction.id],
        )
        .unwrap();
        drop(conn);

        assert_eq!(engine.prune_stale(&ctx).unwrap(), 1);
        assert!(db.latest_prediction(1).unwrap().is_none());
    }
}
