//! Batch scoring with bounded fan-out.
//!
//! Flights in a batch are independent, so they are scored on a pool of
//! tokio tasks gated by a semaphore. Results are collected by input index:
//! the i-th prediction always corresponds to the i-th submitted flight, so
//! callers can zip predictions back onto their own records by position.
//! One malformed flight becomes a failed entry at its position and never
//! aborts its siblings.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::debug;

use super::domain::{FlightAttributes, PredictionResult, RiskTier};
use super::ScoringEngine;

/// Caller-tunable limits for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Largest batch accepted; bigger submissions are rejected whole.
    pub max_flights: usize,
    /// Concurrent scoring tasks; values below 1 are treated as 1.
    pub concurrency: usize,
    /// Deadline for the whole batch, if any.
    pub timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_flights: 100,
            concurrency: 8,
            timeout: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("batch of {submitted} flights exceeds the limit of {limit}")]
    TooManyFlights { submitted: usize, limit: usize },
    #[error("batch scoring timed out after {0:?}")]
    Timeout(Duration),
    #[error("batch scoring task failed: {0}")]
    Worker(#[from] JoinError),
}

/// Per-position outcome: either a prediction or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPrediction {
    pub flight_number: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate view over one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_flights: usize,
    pub analyzed: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    /// Mean probability over analyzed flights; `None` when nothing analyzed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_delay_probability: Option<f64>,
    /// High plus medium risk flights.
    pub requires_attention: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub total_flights: usize,
    pub predictions: Vec<BatchPrediction>,
    pub summary: BatchSummary,
}

impl ScoringEngine {
    /// Scores a collection of flights, preserving input order in the output.
    pub async fn batch_predict(
        &self,
        flights: Vec<FlightAttributes>,
        now: DateTime<Utc>,
        options: &BatchOptions,
    ) -> Result<BatchOutcome, BatchError> {
        let engine = Arc::new(self.clone());
        run_batch(flights, options, move |flight| {
            let engine = Arc::clone(&engine);
            async move { score_one(&engine, &flight, now) }
        })
        .await
    }
}

/// Fans `flights` out over gated tasks and collects per-position results.
///
/// The scorer is a parameter so the deadline path can be driven with a
/// slow scorer in tests; production batches always go through
/// [`ScoringEngine::batch_predict`]. When the deadline fires, the task set
/// is dropped, which aborts every still-running scorer.
pub(crate) async fn run_batch<S, Fut>(
    flights: Vec<FlightAttributes>,
    options: &BatchOptions,
    scorer: S,
) -> Result<BatchOutcome, BatchError>
where
    S: Fn(FlightAttributes) -> Fut,
    Fut: Future<Output = BatchPrediction> + Send + 'static,
{
    if flights.len() > options.max_flights {
        return Err(BatchError::TooManyFlights {
            submitted: flights.len(),
            limit: options.max_flights,
        });
    }

    let total_flights = flights.len();
    debug!(total_flights, concurrency = options.concurrency, "scoring batch");

    let permits = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (index, flight) in flights.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        let fut = scorer(flight);
        tasks.spawn(async move {
            // The semaphore is never closed; a failed acquire just
            // means the task runs ungated.
            let _permit = permits.acquire_owned().await.ok();
            (index, fut.await)
        });
    }

    let run = collect_in_order(tasks, total_flights);
    let predictions = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| BatchError::Timeout(limit))??,
        None => run.await?,
    };

    let summary = summarize(&predictions);
    Ok(BatchOutcome {
        total_flights,
        predictions,
        summary,
    })
}

/// Drains the task set into index slots so the i-th prediction lines up
/// with the i-th submitted flight regardless of completion order. Owning
/// the set here means an abandoned collection (deadline expiry) drops it
/// and aborts the outstanding tasks with it.
async fn collect_in_order(
    mut tasks: JoinSet<(usize, BatchPrediction)>,
    total_flights: usize,
) -> Result<Vec<BatchPrediction>, JoinError> {
    let mut slots: Vec<Option<BatchPrediction>> = Vec::with_capacity(total_flights);
    slots.resize_with(total_flights, || None);

    while let Some(joined) = tasks.join_next().await {
        let (index, prediction) = joined?;
        slots[index] = Some(prediction);
    }

    Ok(slots.into_iter().flatten().collect())
}

fn score_one(
    engine: &ScoringEngine,
    flight: &FlightAttributes,
    now: DateTime<Utc>,
) -> BatchPrediction {
    match engine.predict(flight, now) {
        Ok(prediction) => BatchPrediction {
            flight_number: flight.flight_number.clone(),
            success: true,
            prediction: Some(prediction),
            error: None,
        },
        Err(err) => BatchPrediction {
            flight_number: flight.flight_number.clone(),
            success: false,
            prediction: None,
            error: Some(err.to_string()),
        },
    }
}

fn summarize(predictions: &[BatchPrediction]) -> BatchSummary {
    let mut analyzed = 0usize;
    let mut high_risk = 0usize;
    let mut medium_risk = 0usize;
    let mut low_risk = 0usize;
    let mut probability_total = 0u64;

    for entry in predictions {
        if let Some(prediction) = &entry.prediction {
            analyzed += 1;
            probability_total += u64::from(prediction.delay_probability);
            match prediction.risk {
                RiskTier::High => high_risk += 1,
                RiskTier::Medium => medium_risk += 1,
                RiskTier::Low => low_risk += 1,
            }
        }
    }

    let average_delay_probability =
        (analyzed > 0).then(|| probability_total as f64 / analyzed as f64);

    BatchSummary {
        total_flights: predictions.len(),
        analyzed,
        high_risk,
        medium_risk,
        low_risk,
        average_delay_probability,
        requires_attention: high_risk + medium_risk,
    }
}
