//! HTTP endpoints for single, batch, and feedback scoring.
//!
//! Per the scoring contract, a flight that cannot be scored is not an HTTP
//! error: the prediction endpoints answer 200 with `success: false` and a
//! message, and callers are expected to check the flag. Request-shape
//! problems (oversize batches, timeouts) do map to HTTP statuses.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::AppError;
use crate::scoring::{
    record_outcome, BatchOptions, BatchPrediction, BatchSummary, FlightAttributes,
    OutcomeAccuracy, PredictionResult, ScoringEngine, ScoringError,
};

/// Shared state for the prediction routes.
#[derive(Clone)]
pub struct PredictionState {
    pub engine: Arc<ScoringEngine>,
    pub batch: BatchOptions,
}

/// Router builder exposing the prediction endpoints.
pub fn prediction_router(state: PredictionState) -> Router {
    Router::new()
        .route("/api/v1/predictions/flight", post(predict_flight_handler))
        .route("/api/v1/predictions/batch", post(predict_batch_handler))
        .route("/api/v1/predictions/feedback", post(feedback_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    pub(crate) fn from_result(result: Result<PredictionResult, ScoringError>) -> Self {
        match result {
            Ok(prediction) => Self {
                success: true,
                prediction: Some(prediction),
                error: None,
            },
            Err(err) => Self {
                success: false,
                prediction: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub(crate) async fn predict_flight_handler(
    State(state): State<PredictionState>,
    Json(flight): Json<FlightAttributes>,
) -> Json<PredictResponse> {
    debug!(flight_number = %flight.flight_number, "scoring flight");
    let result = state.engine.predict(&flight, Utc::now());
    Json(PredictResponse::from_result(result))
}

#[derive(Debug, Deserialize)]
pub struct BatchPredictRequest {
    pub flights: Vec<FlightAttributes>,
    /// Optional per-request deadline; overrides the configured default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictResponse {
    pub success: bool,
    pub total_flights: usize,
    pub predictions: Vec<BatchPrediction>,
    pub summary: BatchSummary,
}

pub(crate) async fn predict_batch_handler(
    State(state): State<PredictionState>,
    Json(request): Json<BatchPredictRequest>,
) -> Result<Json<BatchPredictResponse>, AppError> {
    let mut options = state.batch.clone();
    if let Some(ms) = request.timeout_ms {
        options.timeout = Some(Duration::from_millis(ms));
    }

    let outcome = state
        .engine
        .batch_predict(request.flights, Utc::now(), &options)
        .await?;

    Ok(Json(BatchPredictResponse {
        success: true,
        total_flights: outcome.total_flights,
        predictions: outcome.predictions,
        summary: outcome.summary,
    }))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub flight_number: String,
    pub predicted_minutes: i64,
    pub actual_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub flight_number: String,
    pub accuracy: OutcomeAccuracy,
    pub improvement_minutes: u64,
}

pub(crate) async fn feedback_handler(
    Json(request): Json<FeedbackRequest>,
) -> Json<FeedbackResponse> {
    let outcome = record_outcome(
        &request.flight_number,
        request.predicted_minutes,
        request.actual_minutes,
    );

    Json(FeedbackResponse {
        success: true,
        flight_number: outcome.flight_number,
        accuracy: outcome.accuracy,
        improvement_minutes: outcome.improvement_minutes,
    })
}
