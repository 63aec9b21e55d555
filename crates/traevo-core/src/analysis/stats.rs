//! Historical statistics calculator
//!
//! Reduces a trailing window of ledger entries to per-month outflow totals
//! and derives the statistics the projector and classifier consume.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, MathematicalOps};

use crate::models::{EntryKind, LedgerEntry};

use super::types::{MonthlyStats, Trend};

/// Compute monthly statistics over a trailing window of ledger entries
///
/// Only outflow entries contribute. Entries are grouped into per-month sums
/// keyed by (year, month); the sums are then processed in chronological
/// order. An empty history yields all-zero, stable defaults - this function
/// never fails.
pub fn monthly_statistics(entries: &[LedgerEntry]) -> MonthlyStats {
    let mut by_month: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for entry in entries {
        if entry.kind == EntryKind::Outflow {
            use chrono::Datelike;
            let key = (entry.entry_date.year(), entry.entry_date.month());
            *by_month.entry(key).or_insert(Decimal::ZERO) += entry.amount;
        }
    }

    // BTreeMap iteration order is (year, month) ascending, i.e. chronological
    let values: Vec<Decimal> = by_month.into_values().collect();
    if values.is_empty() {
        return MonthlyStats::zeroed();
    }

    let count = Decimal::from(values.len());
    let total: Decimal = values.iter().copied().sum();
    let mean = total / count;

    // Population standard deviation; 0 with fewer than 2 values
    let std_dev = if values.len() > 1 {
        let variance: Decimal = values
            .iter()
            .map(|v| (*v - mean) * (*v - mean))
            .sum::<Decimal>()
            / count;
        variance.sqrt().unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    MonthlyStats {
        mean,
        std_dev,
        trend: detect_trend(&values),
        total_historical: total,
    }
}

/// Classify the trend from the last three monthly totals
///
/// Rising when the last exceeds the first by more than 10%, falling when it
/// is more than 10% below. Fewer than three months is always stable.
fn detect_trend(values: &[Decimal]) -> Trend {
    if values.len() < 3 {
        return Trend::Stable;
    }
    let window = &values[values.len() - 3..];
    let first = window[0];
    let last = window[2];
    if last > first * Decimal::new(11, 1) {
        Trend::Rising
    } else if last < first * Decimal::new(9, 1) {
        Trend::Falling
    } else {
        Trend::Stable
    }
}
