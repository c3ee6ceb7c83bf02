//! Flight delay risk scoring core.
//!
//! A deterministic weighted heuristic over static lookup tables and the
//! flight's own attributes; explicitly not a trained model. The engine is a
//! pure function of its input plus the immutable [`KnowledgeTables`], so a
//! single instance can serve any number of concurrent callers.

pub mod batch;
pub mod domain;
pub mod feedback;
pub(crate) mod factors;
pub(crate) mod insights;
pub mod knowledge;
pub mod manifest;

#[cfg(test)]
mod tests;

pub use batch::{BatchError, BatchOptions, BatchOutcome, BatchPrediction, BatchSummary};
pub use domain::{
    ActionTier, FactorContribution, FactorKind, FlightAttributes, FlightStatus, Insight,
    InsightCategory, InsightSeverity, PredictionResult, Recommendation, RiskTier, ScoringError,
};
pub use feedback::{record_outcome, FeedbackOutcome, OutcomeAccuracy};
pub use knowledge::{AirlineProfile, DepartureWindow, KnowledgeTables, Season};
pub use manifest::{FlightManifest, ManifestError};

use chrono::{DateTime, Utc};

const CONFIDENCE_BASE: f64 = 40.0;

/// Stateless scoring service over the immutable knowledge tables.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    tables: KnowledgeTables,
}

impl ScoringEngine {
    pub fn new(tables: KnowledgeTables) -> Self {
        Self { tables }
    }

    /// Engine backed by the standard shipped tables.
    pub fn standard() -> Self {
        Self::new(KnowledgeTables::standard())
    }

    pub fn tables(&self) -> &KnowledgeTables {
        &self.tables
    }

    /// Scores one flight as of `now`.
    ///
    /// `now` is caller-supplied so identical inputs always produce identical
    /// output; the service layer passes `Utc::now()`. Malformed input comes
    /// back as `Err`, which callers must treat as "no usable prediction",
    /// never as a zero-risk one.
    pub fn predict(
        &self,
        flight: &FlightAttributes,
        now: DateTime<Utc>,
    ) -> Result<PredictionResult, ScoringError> {
        let (factor_list, totals) = factors::evaluate(flight, &self.tables, now)?;

        let delay_probability = totals.probability_points.clamp(0.0, 100.0).round() as u8;
        let estimated_delay_minutes = totals.delay_minute_points.max(0.0).round() as u32;

        let status_confidence = match flight.status {
            FlightStatus::Delayed | FlightStatus::Boarding => 30.0,
            _ => 15.0,
        };
        let confidence = (CONFIDENCE_BASE + totals.lead_time_confidence + status_confidence)
            .clamp(0.0, 100.0)
            .round() as u8;

        let risk = RiskTier::from_probability(delay_probability);

        let insights = insights::generate(
            delay_probability,
            estimated_delay_minutes,
            &factor_list,
            totals.hours_until_departure,
        );
        let recommendation = insights::recommend(delay_probability, estimated_delay_minutes);

        Ok(PredictionResult {
            flight_number: flight.flight_number.clone(),
            delay_probability,
            estimated_delay_minutes,
            risk,
            risk_color: risk.color(),
            confidence,
            generated_at: now,
            factors: factor_list,
            insights,
            recommendation,
        })
    }
}
