//! Risk classifier
//!
//! Maps the projection, the current pace, the calendar day, and the trend
//! to a discrete risk tier through an ordered rule chain.

use rust_decimal::Decimal;

use super::types::{RiskTier, Trend};

/// Classify the risk tier for the current period
///
/// `total_limit` is `None` when no budgets exist for the period; that case
/// short-circuits to a cautious medium before any ratio is computed.
///
/// The remaining rules form an ordered chain evaluated top to bottom; the
/// first match wins and the order encodes precedence. This is a stateless
/// classification re-evaluated fresh on every call - there is no memory of
/// a prior tier.
pub fn classify_risk(
    projected: Decimal,
    total_limit: Option<Decimal>,
    actual_spend: Decimal,
    day_of_month: u32,
    trend: Trend,
) -> RiskTier {
    let total_limit = match total_limit {
        Some(limit) => limit,
        // No budgets defined: cautious default
        None => return RiskTier::Medium,
    };

    let projected_pct = percent_of(projected, total_limit);
    let current_pct = percent_of(actual_spend, total_limit);

    if projected_pct > Decimal::from(90) {
        return RiskTier::High;
    }
    if current_pct > Decimal::from(70) && day_of_month < 20 {
        return RiskTier::High;
    }
    if projected_pct > Decimal::from(70) {
        return RiskTier::Medium;
    }
    if trend == Trend::Rising && current_pct > Decimal::from(50) {
        return RiskTier::Medium;
    }

    RiskTier::Low
}

/// part / whole * 100, with zero and negative denominators yielding zero
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        part / whole * Decimal::from(100)
    }
}
