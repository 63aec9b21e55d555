//! Financial risk projection engine
//!
//! The pipeline runs in four stages, each a pure function over data read
//! from the stores at call time:
//! - `stats` - groups trailing outflow history into monthly totals and
//!   derives mean, population standard deviation, and a trend
//! - `projector` - extrapolates the current month's pace to a month-end
//!   projection, adjusted by the trend
//! - `risk` - maps projection, pace, calendar day, and trend to a tier
//!   through an ordered rule chain
//! - `insight` - renders the tier and projection into a user-facing message
//!
//! `engine` orchestrates the stages and owns the get-or-generate and
//! retention policies for persisted predictions.

pub mod engine;
pub mod insight;
pub mod projector;
pub mod risk;
pub mod stats;
pub mod types;

pub use engine::{AnalysisContext, PredictionEngine};
pub use insight::compose_insight;
pub use projector::{days_in_month, project_month_spend};
pub use risk::classify_risk;
pub use stats::monthly_statistics;
pub use types::{MonthlyStats, NewPrediction, Prediction, RiskTier, Trend};
