//! End-to-end batch scoring behavior through the public engine facade:
//! order preservation, per-item failure isolation, and summary invariants.

use std::time::Duration;

use chrono::{DateTime, Utc};
use flightcast::scoring::{
    BatchError, BatchOptions, FlightAttributes, FlightStatus, RiskTier, ScoringEngine,
};

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-04-15T07:00:00Z")
        .expect("valid instant")
        .with_timezone(&Utc)
}

fn flight(number: &str) -> FlightAttributes {
    FlightAttributes {
        flight_number: number.to_string(),
        airline: "Test Carrier".to_string(),
        departure_airport: "PIA".to_string(),
        arrival_airport: "FSD".to_string(),
        departure_time: "2025-04-16T13:00:00Z".to_string(),
        arrival_time: "2025-04-16T16:30:00Z".to_string(),
        status: FlightStatus::OnTime,
    }
}

fn malformed_flight(number: &str) -> FlightAttributes {
    FlightAttributes {
        departure_time: "not-a-timestamp".to_string(),
        ..flight(number)
    }
}

#[tokio::test]
async fn batch_preserves_input_order_and_isolates_failures() {
    let engine = ScoringEngine::standard();
    let flights = vec![
        flight("ZZ100"),
        flight("ZZ101"),
        malformed_flight("ZZ102"),
        flight("ZZ103"),
        flight("ZZ104"),
    ];

    let outcome = engine
        .batch_predict(flights, fixed_now(), &BatchOptions::default())
        .await
        .expect("batch scores");

    assert_eq!(outcome.total_flights, 5);
    assert_eq!(outcome.predictions.len(), 5);
    for (index, expected) in ["ZZ100", "ZZ101", "ZZ102", "ZZ103", "ZZ104"]
        .iter()
        .enumerate()
    {
        assert_eq!(&outcome.predictions[index].flight_number, expected);
    }

    let failed = &outcome.predictions[2];
    assert!(!failed.success);
    assert!(failed.prediction.is_none());
    assert!(failed
        .error
        .as_deref()
        .expect("failure carries a message")
        .contains("departure_time"));

    assert_eq!(outcome.summary.analyzed, 4);
    assert_eq!(outcome.summary.total_flights, 5);
}

#[tokio::test]
async fn summary_risk_counts_partition_the_analyzed_flights() {
    let engine = ScoringEngine::standard();
    let flights = vec![flight("ZZ100"), flight("NK456"), flight("AA12")];

    let outcome = engine
        .batch_predict(flights, fixed_now(), &BatchOptions::default())
        .await
        .expect("batch scores");

    let summary = &outcome.summary;
    assert_eq!(
        summary.high_risk + summary.medium_risk + summary.low_risk,
        summary.analyzed
    );
    assert_eq!(
        summary.requires_attention,
        summary.high_risk + summary.medium_risk
    );
    assert!(summary.analyzed <= summary.total_flights);

    let average = summary
        .average_delay_probability
        .expect("analyzed flights produce an average");
    assert!(average >= 0.0 && average <= 100.0);
}

#[tokio::test]
async fn empty_batch_has_no_average() {
    let engine = ScoringEngine::standard();
    let outcome = engine
        .batch_predict(Vec::new(), fixed_now(), &BatchOptions::default())
        .await
        .expect("empty batch is fine");

    assert_eq!(outcome.total_flights, 0);
    assert_eq!(outcome.summary.analyzed, 0);
    assert_eq!(outcome.summary.average_delay_probability, None);
}

#[tokio::test]
async fn oversize_batches_are_rejected_whole() {
    let engine = ScoringEngine::standard();
    let options = BatchOptions {
        max_flights: 2,
        ..BatchOptions::default()
    };
    let flights = vec![flight("ZZ100"), flight("ZZ101"), flight("ZZ102")];

    let err = engine
        .batch_predict(flights, fixed_now(), &options)
        .await
        .expect_err("oversize batch rejected");
    assert!(matches!(
        err,
        BatchError::TooManyFlights { submitted: 3, limit: 2 }
    ));
}

#[tokio::test]
async fn generous_timeout_does_not_interfere() {
    let engine = ScoringEngine::standard();
    let options = BatchOptions {
        timeout: Some(Duration::from_secs(5)),
        concurrency: 2,
        ..BatchOptions::default()
    };

    let outcome = engine
        .batch_predict(vec![flight("ZZ100"), flight("ZZ101")], fixed_now(), &options)
        .await
        .expect("batch completes within deadline");
    assert_eq!(outcome.summary.analyzed, 2);
}

#[tokio::test]
async fn batch_results_match_single_flight_scoring() {
    let engine = ScoringEngine::standard();
    let single = engine
        .predict(&flight("ZZ104"), fixed_now())
        .expect("single scores");

    let outcome = engine
        .batch_predict(vec![flight("ZZ104")], fixed_now(), &BatchOptions::default())
        .await
        .expect("batch scores");

    let batched = outcome.predictions[0]
        .prediction
        .as_ref()
        .expect("batched prediction present");
    assert_eq!(batched, &single);
    assert_eq!(batched.risk, RiskTier::Low);
}
