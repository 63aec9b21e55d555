//! Ledger entry operations and period aggregates

use chrono::NaiveDate;
use rusqlite::{params, Row};
use rust_decimal::Decimal;

use super::{parse_amount, parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{EntryKind, LedgerEntry, MonthTotals, NewLedgerEntry, Period, Recurrence};
use crate::store::{CategoryStore, LedgerFilter, LedgerStore};

const ENTRY_COLUMNS: &str =
    "id, user_id, category_id, description, amount, kind, entry_date, recurrence, created_at";

fn map_entry(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    let amount: String = row.get(4)?;
    let kind: String = row.get(5)?;
    let entry_date: String = row.get(6)?;
    let recurrence: String = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(LedgerEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        description: row.get(3)?,
        amount: parse_amount(&amount),
        kind: kind.parse().unwrap_or(EntryKind::Outflow),
        entry_date: parse_date(&entry_date),
        recurrence: recurrence.parse().unwrap_or(Recurrence::OneTime),
        created_at: parse_datetime(&created_at),
    })
}

impl LedgerStore for Database {
    fn insert_entry(&self, user_id: i64, entry: &NewLedgerEntry) -> Result<LedgerEntry> {
        if entry.amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Entry amount must be positive, got {}",
                entry.amount
            )));
        }
        if !self.category_available(entry.category_id, user_id)? {
            return Err(Error::Validation(format!(
                "Category {} not found or not available",
                entry.category_id
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO ledger_entries (user_id, category_id, description, amount, kind, entry_date, recurrence)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                entry.category_id,
                entry.description,
                entry.amount.to_string(),
                entry.kind.as_str(),
                entry.entry_date.to_string(),
                entry.recurrence.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        let inserted = conn.query_row(
            &format!("SELECT {} FROM ledger_entries WHERE id = ?", ENTRY_COLUMNS),
            params![id],
            map_entry,
        )?;
        Ok(inserted)
    }

    fn list_entries(&self, user_id: i64, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>> {
        let conn = self.conn()?;

        // Build dynamic WHERE clause
        let mut conditions = vec!["user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(from) = filter.from {
            conditions.push("entry_date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }
        if let Some(to) = filter.to {
            conditions.push("entry_date <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            conditions.push("category_id = ?".to_string());
            params.push(Box::new(category_id));
        }
        if let Some(kind) = filter.kind {
            conditions.push("kind = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        let sql = format!(
            "SELECT {} FROM ledger_entries WHERE {} ORDER BY entry_date DESC, id DESC",
            ENTRY_COLUMNS,
            conditions.join(" AND ")
        );
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(param_refs.as_slice(), map_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn month_totals(&self, user_id: i64, period: Period) -> Result<MonthTotals> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT amount, kind FROM ledger_entries
            WHERE user_id = ?
              AND CAST(strftime('%m', entry_date) AS INTEGER) = ?
              AND CAST(strftime('%Y', entry_date) AS INTEGER) = ?
            "#,
        )?;

        // Sum in Rust: SQLite's SUM would coerce the text amounts to floats
        let rows = stmt
            .query_map(params![user_id, period.month, period.year], |row| {
                let amount: String = row.get(0)?;
                let kind: String = row.get(1)?;
                Ok((parse_amount(&amount), kind))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut totals = MonthTotals::zero();
        for (amount, kind) in rows {
            match kind.parse().unwrap_or(EntryKind::Outflow) {
                EntryKind::Inflow => totals.inflow += amount,
                EntryKind::Outflow => totals.outflow += amount,
            }
        }
        totals.net = totals.inflow - totals.outflow;

        Ok(totals)
    }

    fn category_outflow(&self, user_id: i64, category_id: i64, period: Period) -> Result<Decimal> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT amount FROM ledger_entries
            WHERE user_id = ? AND category_id = ? AND kind = 'outflow'
              AND CAST(strftime('%m', entry_date) AS INTEGER) = ?
              AND CAST(strftime('%Y', entry_date) AS INTEGER) = ?
            "#,
        )?;

        let amounts = stmt
            .query_map(
                params![user_id, category_id, period.month, period.year],
                |row| {
                    let amount: String = row.get(0)?;
                    Ok(parse_amount(&amount))
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(amounts.into_iter().sum())
    }

    fn entries_since(&self, user_id: i64, from: NaiveDate) -> Result<Vec<LedgerEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM ledger_entries
             WHERE user_id = ? AND entry_date >= ?
             ORDER BY entry_date ASC, id ASC",
            ENTRY_COLUMNS
        ))?;

        let entries = stmt
            .query_map(params![user_id, from.to_string()], map_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn delete_entry(&self, user_id: i64, entry_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM ledger_entries WHERE id = ? AND user_id = ?",
            params![entry_id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Ledger entry {}", entry_id)));
        }
        Ok(())
    }
}
