//! Core types for the projection engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Period;

/// Direction of the last three monthly spend totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Last monthly total exceeds the first by more than 10%
    Rising,
    /// Last monthly total is more than 10% below the first
    Falling,
    /// Anything else, including fewer than three months of history
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rising" => Ok(Trend::Rising),
            "falling" => Ok(Trend::Falling),
            "stable" => Ok(Trend::Stable),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

/// Projected financial risk for the current period
///
/// The stored and displayed labels keep the product's traffic-light names:
/// VERDE (low), AMARELO (medium), VERMELHO (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "VERDE")]
    Low,
    #[serde(rename = "AMARELO")]
    Medium,
    #[serde(rename = "VERMELHO")]
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "VERDE",
            RiskTier::Medium => "AMARELO",
            RiskTier::High => "VERMELHO",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VERDE" => Ok(RiskTier::Low),
            "AMARELO" => Ok(RiskTier::Medium),
            "VERMELHO" => Ok(RiskTier::High),
            _ => Err(format!("Unknown risk tier: {}", s)),
        }
    }
}

/// Derived statistics over a trailing window of monthly outflow totals
///
/// Ephemeral by design: recomputed on every engine run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Arithmetic mean of the monthly outflow totals
    pub mean: Decimal,
    /// Population standard deviation of the monthly totals
    pub std_dev: Decimal,
    pub trend: Trend,
    /// Sum of all monthly totals in the window
    pub total_historical: Decimal,
}

impl MonthlyStats {
    /// All-zero, stable defaults for an empty history
    pub fn zeroed() -> Self {
        Self {
            mean: Decimal::ZERO,
            std_dev: Decimal::ZERO,
            trend: Trend::Stable,
            total_historical: Decimal::ZERO,
        }
    }
}

/// A prediction produced by the engine (before persistence)
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub projected_amount: Decimal,
    pub risk_tier: RiskTier,
    pub message: String,
    pub target: Period,
}

/// A persisted prediction
///
/// Created only by the engine; never updated, only superseded by a newer
/// record or pruned by the retention policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    pub user_id: i64,
    pub generated_at: DateTime<Utc>,
    pub projected_amount: Decimal,
    pub risk_tier: RiskTier,
    pub message: String,
    pub target_month: u32,
    pub target_year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_labels() {
        assert_eq!(RiskTier::Low.as_str(), "VERDE");
        assert_eq!(RiskTier::Medium.as_str(), "AMARELO");
        assert_eq!(RiskTier::High.as_str(), "VERMELHO");
        assert_eq!(RiskTier::from_str("VERMELHO").unwrap(), RiskTier::High);
        assert!(RiskTier::from_str("ROXO").is_err());
    }

    #[test]
    fn test_risk_tier_json_uses_product_labels() {
        assert_eq!(
            serde_json::to_string(&RiskTier::Medium).unwrap(),
            "\"AMARELO\""
        );
        let tier: RiskTier = serde_json::from_str("\"VERDE\"").unwrap();
        assert_eq!(tier, RiskTier::Low);
    }

    #[test]
    fn test_trend_codec() {
        assert_eq!(Trend::from_str("rising").unwrap(), Trend::Rising);
        assert_eq!(Trend::Stable.to_string(), "stable");
    }

    #[test]
    fn test_zeroed_stats() {
        let stats = MonthlyStats::zeroed();
        assert_eq!(stats.mean, Decimal::ZERO);
        assert_eq!(stats.std_dev, Decimal::ZERO);
        assert_eq!(stats.trend, Trend::Stable);
    }
}
