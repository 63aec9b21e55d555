//! Persisted prediction operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_amount, parse_datetime, Database};
use crate::analysis::{NewPrediction, Prediction, RiskTier};
use crate::error::Result;
use crate::models::Period;
use crate::store::PredictionStore;

const PREDICTION_COLUMNS: &str =
    "id, user_id, generated_at, projected_amount, risk_tier, message, target_month, target_year";

fn map_prediction(row: &Row<'_>) -> rusqlite::Result<Prediction> {
    let generated_at: String = row.get(2)?;
    let projected: String = row.get(3)?;
    let tier: String = row.get(4)?;

    Ok(Prediction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        generated_at: parse_datetime(&generated_at),
        projected_amount: parse_amount(&projected),
        risk_tier: tier.parse().unwrap_or(RiskTier::Medium),
        message: row.get(5)?,
        target_month: row.get(6)?,
        target_year: row.get(7)?,
    })
}

impl PredictionStore for Database {
    fn create_prediction(&self, user_id: i64, prediction: &NewPrediction) -> Result<Prediction> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO predictions (user_id, projected_amount, risk_tier, message, target_month, target_year)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                prediction.projected_amount.to_string(),
                prediction.risk_tier.as_str(),
                prediction.message,
                prediction.target.month,
                prediction.target.year,
            ],
        )?;
        let id = conn.last_insert_rowid();

        let inserted = conn.query_row(
            &format!("SELECT {} FROM predictions WHERE id = ?", PREDICTION_COLUMNS),
            params![id],
            map_prediction,
        )?;
        Ok(inserted)
    }

    fn latest_prediction(&self, user_id: i64) -> Result<Option<Prediction>> {
        let conn = self.conn()?;
        let prediction = conn
            .query_row(
                &format!(
                    "SELECT {} FROM predictions WHERE user_id = ?
                     ORDER BY generated_at DESC, id DESC LIMIT 1",
                    PREDICTION_COLUMNS
                ),
                params![user_id],
                map_prediction,
            )
            .optional()?;
        Ok(prediction)
    }

    fn prediction_for_period(&self, user_id: i64, period: Period) -> Result<Option<Prediction>> {
        let conn = self.conn()?;
        let prediction = conn
            .query_row(
                &format!(
                    "SELECT {} FROM predictions
                     WHERE user_id = ? AND target_month = ? AND target_year = ?
                     ORDER BY generated_at DESC, id DESC LIMIT 1",
                    PREDICTION_COLUMNS
                ),
                params![user_id, period.month, period.year],
                map_prediction,
            )
            .optional()?;
        Ok(prediction)
    }

    fn prune_predictions_before(&self, user_id: i64, cutoff: DateTime<Utc>) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM predictions WHERE user_id = ? AND generated_at < ?",
            params![user_id, cutoff.format("%Y-%m-%d %H:%M:%S").to_string()],
        )?;
        Ok(deleted)
    }
}
