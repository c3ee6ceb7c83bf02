use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use flightcast::api::{prediction_router, PredictionState};
use flightcast::config::AppConfig;
use flightcast::error::AppError;
use flightcast::scoring::{
    record_outcome, BatchOptions, BatchOutcome, FlightAttributes, FlightManifest, FlightStatus,
    PredictionResult, ScoringEngine,
};
use flightcast::telemetry;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "flightcast",
    about = "Score flight delay risk for logistics handoffs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score flights from the command line
    Predict {
        #[command(subcommand)]
        command: PredictCommand,
    },
    /// Record an observed outcome against an earlier prediction
    Feedback(FeedbackArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum PredictCommand {
    /// Score a single flight
    Flight(FlightArgs),
    /// Score a CSV manifest of flights
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct FlightArgs {
    /// Flight number, carrier code included (e.g. UA1432)
    #[arg(long)]
    flight_number: String,
    /// Airline display name
    #[arg(long, default_value = "")]
    airline: String,
    /// Departure airport code
    #[arg(long = "from")]
    departure_airport: String,
    /// Arrival airport code
    #[arg(long = "to")]
    arrival_airport: String,
    /// Scheduled departure (RFC 3339)
    #[arg(long)]
    departure: String,
    /// Scheduled arrival (RFC 3339)
    #[arg(long)]
    arrival: String,
    /// Current status as reported by the feed
    #[arg(long, default_value = "scheduled")]
    status: String,
    /// Fixed evaluation instant for reproducible output (RFC 3339)
    #[arg(long, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Flight manifest CSV to score
    #[arg(long)]
    csv: PathBuf,
    /// Concurrent scoring tasks
    #[arg(long)]
    concurrency: Option<usize>,
    /// Deadline for the whole batch, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct FeedbackArgs {
    #[arg(long)]
    flight_number: String,
    /// Delay minutes the engine predicted
    #[arg(long)]
    predicted: i64,
    /// Delay minutes actually observed
    #[arg(long)]
    actual: i64,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Predict {
            command: PredictCommand::Flight(args),
        } => run_predict_flight(args),
        Command::Predict {
            command: PredictCommand::Batch(args),
        } => run_predict_batch(args).await,
        Command::Feedback(args) => run_feedback(args),
    }
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as RFC 3339 ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let prediction_state = PredictionState {
        engine: Arc::new(ScoringEngine::standard()),
        batch: BatchOptions {
            max_flights: config.batch.max_flights,
            concurrency: config.batch.concurrency,
            timeout: config.batch.timeout(),
        },
    };

    let ops = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let app = Router::new()
        .merge(ops)
        .merge(prediction_router(prediction_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "flight delay scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_predict_flight(args: FlightArgs) -> Result<(), AppError> {
    let FlightArgs {
        flight_number,
        airline,
        departure_airport,
        arrival_airport,
        departure,
        arrival,
        status,
        now,
    } = args;

    let flight = FlightAttributes {
        flight_number,
        airline,
        departure_airport: departure_airport.to_ascii_uppercase(),
        arrival_airport: arrival_airport.to_ascii_uppercase(),
        departure_time: departure,
        arrival_time: arrival,
        status: FlightStatus::from_feed(&status),
    };

    let engine = ScoringEngine::standard();
    match engine.predict(&flight, now.unwrap_or_else(Utc::now)) {
        Ok(prediction) => render_prediction(&prediction),
        Err(err) => println!("No usable prediction: {err}"),
    }

    Ok(())
}

async fn run_predict_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let flights = FlightManifest::from_path(&args.csv)?;

    let options = BatchOptions {
        max_flights: config.batch.max_flights,
        concurrency: args.concurrency.unwrap_or(config.batch.concurrency),
        timeout: args
            .timeout_ms
            .map(Duration::from_millis)
            .or_else(|| config.batch.timeout()),
    };

    let engine = ScoringEngine::standard();
    let outcome = engine
        .batch_predict(flights, Utc::now(), &options)
        .await?;

    render_batch(&outcome);
    Ok(())
}

fn run_feedback(args: FeedbackArgs) -> Result<(), AppError> {
    let outcome = record_outcome(&args.flight_number, args.predicted, args.actual);
    println!(
        "Flight {}: prediction was {} (off by {} minute{})",
        outcome.flight_number,
        outcome.accuracy.label(),
        outcome.improvement_minutes,
        if outcome.improvement_minutes == 1 { "" } else { "s" }
    );
    Ok(())
}

fn render_prediction(prediction: &PredictionResult) {
    println!("Flight {}", prediction.flight_number);
    println!(
        "Delay probability: {}% ({} risk)",
        prediction.delay_probability,
        prediction.risk.label()
    );
    println!(
        "Estimated delay: {} minutes",
        prediction.estimated_delay_minutes
    );
    println!("Confidence: {}%", prediction.confidence);

    println!("\nContributing factors");
    for factor in &prediction.factors {
        println!(
            "- {}: {:+.1} pts at {:.0}% weight ({})",
            factor.factor_label,
            factor.impact,
            factor.weight * 100.0,
            factor.detail
        );
    }

    println!("\nInsights");
    for insight in &prediction.insights {
        println!("- {} {}", insight.icon, insight.message);
    }

    println!(
        "\nRecommendation: {} [{}]",
        prediction.recommendation.title,
        prediction.recommendation.tier.label()
    );
    for (index, step) in prediction.recommendation.steps.iter().enumerate() {
        println!("  {}. {step}", index + 1);
    }
}

fn render_batch(outcome: &BatchOutcome) {
    println!("Scored {} flight(s)", outcome.total_flights);

    for entry in &outcome.predictions {
        match &entry.prediction {
            Some(prediction) => println!(
                "- {}: {}% ({} risk), est. {} min, confidence {}%",
                prediction.flight_number,
                prediction.delay_probability,
                prediction.risk.label(),
                prediction.estimated_delay_minutes,
                prediction.confidence
            ),
            None => println!(
                "- {}: no prediction ({})",
                entry.flight_number,
                entry.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    let summary = &outcome.summary;
    println!("\nSummary");
    println!("- analyzed: {}/{}", summary.analyzed, summary.total_flights);
    println!(
        "- risk mix: {} high, {} medium, {} low",
        summary.high_risk, summary.medium_risk, summary.low_risk
    );
    match summary.average_delay_probability {
        Some(average) => println!("- average delay probability: {average:.1}%"),
        None => println!("- average delay probability: n/a"),
    }
    println!("- requiring attention: {}", summary.requires_attention);
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
