//! Spend projector
//!
//! Extrapolates the current month's spending pace to a month-end total and
//! adjusts the projection by the historical trend.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{MonthlyStats, Trend};

/// Project the month-end outflow total
///
/// With at least one elapsed day the daily pace (`actual / elapsed_days`) is
/// scaled to the full month; with no elapsed days the historical mean stands
/// in. A rising trend inflates the base by 10%, a falling trend deflates it
/// by 10%. The result is rounded to 2 fractional digits, half-up.
///
/// Pure and deterministic; non-negative inputs produce a non-negative
/// projection.
pub fn project_month_spend(
    actual: Decimal,
    elapsed_days: u32,
    total_days_in_month: u32,
    stats: &MonthlyStats,
) -> Decimal {
    let base = if elapsed_days > 0 {
        let daily_rate = actual / Decimal::from(elapsed_days);
        daily_rate * Decimal::from(total_days_in_month)
    } else {
        stats.mean
    };

    let multiplier = match stats.trend {
        Trend::Rising => Decimal::new(11, 1),
        Trend::Falling => Decimal::new(9, 1),
        Trend::Stable => Decimal::ONE,
    };

    (base * multiplier).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of calendar days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| chrono::Datelike::day(&d))
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stable_stats(mean: Decimal) -> MonthlyStats {
        MonthlyStats {
            mean,
            ..MonthlyStats::zeroed()
        }
    }

    fn stats_with_trend(trend: Trend) -> MonthlyStats {
        MonthlyStats {
            trend,
            ..MonthlyStats::zeroed()
        }
    }

    #[test]
    fn test_pace_extrapolation() {
        // 300 spent in 10 days of a 30-day month -> 900 projected
        let projected = project_month_spend(dec!(300.00), 10, 30, &stats_with_trend(Trend::Stable));
        assert_eq!(projected, dec!(900.00));
    }

    #[test]
    fn test_zero_elapsed_days_falls_back_to_mean() {
        let projected = project_month_spend(dec!(0.00), 0, 30, &stable_stats(dec!(450.00)));
        assert_eq!(projected, dec!(450.00));
    }

    #[test]
    fn test_rising_trend_inflates_ten_percent() {
        let projected = project_month_spend(dec!(300.00), 10, 30, &stats_with_trend(Trend::Rising));
        assert_eq!(projected, dec!(990.00));
    }

    #[test]
    fn test_falling_trend_deflates_ten_percent() {
        let projected =
            project_month_spend(dec!(300.00), 10, 30, &stats_with_trend(Trend::Falling));
        assert_eq!(projected, dec!(810.00));
    }

    #[test]
    fn test_half_up_rounding() {
        // 100 / 3 * 3 reconstructs 100 exactly; pick values that need rounding:
        // 10.00 over 3 days, 31-day month -> 103.3333... -> 103.33
        let projected = project_month_spend(dec!(10.00), 3, 31, &stats_with_trend(Trend::Stable));
        assert_eq!(projected, dec!(103.33));

        // Midpoint rounds away from zero: 0.125 * 1 day ratio setup
        // 0.25 over 2 days, 1-day "month" -> 0.125 -> 0.13
        let projected = project_month_spend(dec!(0.25), 2, 1, &stats_with_trend(Trend::Stable));
        assert_eq!(projected, dec!(0.13));
    }

    #[test]
    fn test_non_negative_for_non_negative_inputs() {
        let projected = project_month_spend(dec!(0.00), 15, 30, &stats_with_trend(Trend::Falling));
        assert!(projected >= Decimal::ZERO);
    }

    #[test]
    fn test_deterministic() {
        let stats = stats_with_trend(Trend::Rising);
        let a = project_month_spend(dec!(123.45), 7, 31, &stats);
        let b = project_month_spend(dec!(123.45), 7, 31, &stats);
        assert_eq!(a, b);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2028, 2), 29); // leap year
        assert_eq!(days_in_month(2026, 12), 31);
    }
}
