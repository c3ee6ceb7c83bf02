//! Outcome feedback against earlier predictions.
//!
//! A reporting hook only: classifying an outcome never feeds back into the
//! knowledge tables or future scores.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Predictions within this many minutes of the observed delay count as accurate.
pub const ACCURACY_TOLERANCE_MINUTES: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeAccuracy {
    Accurate,
    NeedsImprovement,
}

impl OutcomeAccuracy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accurate => "accurate",
            Self::NeedsImprovement => "needs improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackOutcome {
    pub flight_number: String,
    pub accuracy: OutcomeAccuracy,
    /// Absolute gap between predicted and observed delay, in minutes.
    pub improvement_minutes: u64,
}

/// Compares a prior prediction with the observed delay.
pub fn record_outcome(
    flight_number: &str,
    predicted_minutes: i64,
    actual_minutes: i64,
) -> FeedbackOutcome {
    // abs_diff keeps the gap well-defined even for extreme reported delays
    // where the plain subtraction would overflow.
    let improvement_minutes = predicted_minutes.abs_diff(actual_minutes);
    let accuracy = if improvement_minutes <= ACCURACY_TOLERANCE_MINUTES {
        OutcomeAccuracy::Accurate
    } else {
        OutcomeAccuracy::NeedsImprovement
    };

    info!(
        flight_number,
        predicted_minutes,
        actual_minutes,
        improvement_minutes,
        accuracy = accuracy.label(),
        "recorded prediction outcome"
    );

    FeedbackOutcome {
        flight_number: flight_number.to_string(),
        accuracy,
        improvement_minutes,
    }
}
