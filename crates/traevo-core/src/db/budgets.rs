//! Budget operations
//!
//! Business-rule validation lives here, not in the engine: the engine reads
//! already-committed budgets and never re-validates uniqueness.

use rusqlite::{params, Row};
use rust_decimal::Decimal;

use super::{parse_amount, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, NewBudget, Period};
use crate::store::{BudgetStore, CategoryStore};

const BUDGET_COLUMNS: &str =
    "id, user_id, category_id, income_source_id, month, year, limit_amount, created_at";

fn map_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let limit: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        income_source_id: row.get(3)?,
        period: Period::new(row.get(4)?, row.get(5)?),
        limit: parse_amount(&limit),
        created_at: parse_datetime(&created_at),
    })
}

impl BudgetStore for Database {
    fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<Budget> {
        budget.period.validate().map_err(Error::Validation)?;
        if budget.limit <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Budget limit must be positive, got {}",
                budget.limit
            )));
        }
        if !self.category_available(budget.category_id, user_id)? {
            return Err(Error::Validation(format!(
                "Category {} not found or not available",
                budget.category_id
            )));
        }
        if self.budget_exists(user_id, budget.category_id, budget.period)? {
            return Err(Error::Validation(format!(
                "Budget already exists for category {} in {}",
                budget.category_id, budget.period
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (user_id, category_id, income_source_id, month, year, limit_amount)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                budget.category_id,
                budget.income_source_id,
                budget.period.month,
                budget.period.year,
                budget.limit.to_string(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        let inserted = conn.query_row(
            &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
            params![id],
            map_budget,
        )?;
        Ok(inserted)
    }

    fn budgets_for_period(&self, user_id: i64, period: Period) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE user_id = ? AND month = ? AND year = ? ORDER BY id",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![user_id, period.month, period.year], map_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    fn budget_exists(&self, user_id: i64, category_id: i64, period: Period) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM budgets WHERE user_id = ? AND category_id = ? AND month = ? AND year = ?",
            params![user_id, category_id, period.month, period.year],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn update_budget_limit(&self, user_id: i64, budget_id: i64, limit: Decimal) -> Result<Budget> {
        if limit <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Budget limit must be positive, got {}",
                limit
            )));
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE budgets SET limit_amount = ? WHERE id = ? AND user_id = ?",
            params![limit.to_string(), budget_id, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Budget {}", budget_id)));
        }

        let budget = conn.query_row(
            &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
            params![budget_id],
            map_budget,
        )?;
        Ok(budget)
    }

    fn delete_budget(&self, user_id: i64, budget_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![budget_id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget {}", budget_id)));
        }
        Ok(())
    }
}
