use super::common::*;
use chrono::Duration;

use crate::scoring::domain::{FactorKind, FlightStatus, RiskTier, ScoringError};

#[test]
fn neutral_baseline_matches_hand_arithmetic() {
    // Airline default: (1 - 0.80) * 100 * 0.25 = 5.0 probability points and
    // 15.0 * 0.25 = 3.75 delay minutes. Day of week adds 5 * 0.05 = 0.25
    // points. Everything else is at baseline, 30h out adds nothing.
    let prediction = engine()
        .predict(&neutral_flight(), thirty_hours_out())
        .expect("neutral flight scores");

    assert_eq!(prediction.delay_probability, 5); // round(5.25)
    assert_eq!(prediction.estimated_delay_minutes, 4); // round(3.75)
    assert_eq!(prediction.confidence, 60); // 40 base + 5 lead + 15 status
    assert_eq!(prediction.risk, RiskTier::Low);
    assert_eq!(prediction.risk_color, "green");
    assert_eq!(prediction.factors.len(), 7);
}

#[test]
fn delayed_status_shifts_score_by_its_weighted_constants() {
    let now = thirty_hours_out();
    let baseline = engine()
        .predict(&neutral_flight(), now)
        .expect("baseline scores");
    let delayed = engine()
        .predict(&neutral_flight_with_status(FlightStatus::Delayed), now)
        .expect("delayed flight scores");

    // Status contributes 40 * 0.20 = 8 probability points and
    // 30 * 0.20 = 6 delay minutes on top of the baseline.
    assert_eq!(
        delayed.delay_probability,
        baseline.delay_probability + 8
    );
    assert_eq!(
        delayed.estimated_delay_minutes,
        baseline.estimated_delay_minutes + 6
    );
}

#[test]
fn identical_input_produces_identical_output() {
    let now = thirty_hours_out();
    let first = engine().predict(&neutral_flight(), now).expect("scores");
    let second = engine().predict(&neutral_flight(), now).expect("scores");

    assert_eq!(first, second);
    assert_eq!(first.generated_at, now);
}

#[test]
fn worst_case_flight_stays_within_bounds() {
    // NK (0.70 on time): 7.5. ORD/EWR both 1.35: 35 * 0.20 = 7.0.
    // Evening window 1.25: 25 * 0.20 = 5.0. Winter 1.3: 30 * 0.15 = 4.5.
    // Delayed: 8.0. Day of week: 0.25. One hour out: 15 * 0.05 = 0.75.
    let flight = worst_case_flight();
    let departure = chrono::DateTime::parse_from_rfc3339(&flight.departure_time)
        .expect("fixture timestamp")
        .with_timezone(&chrono::Utc);
    let prediction = engine()
        .predict(&flight, departure - Duration::hours(1))
        .expect("worst case scores");

    assert_eq!(prediction.delay_probability, 33);
    assert_eq!(prediction.confidence, 95); // 40 + 25 lead + 30 delayed
    assert!(prediction.delay_probability <= 100);
    assert!(prediction.confidence <= 100);
}

#[test]
fn unknown_airline_scores_like_the_default_entry() {
    let prediction = engine()
        .predict(&neutral_flight(), thirty_hours_out())
        .expect("scores");

    let default_profile = engine().tables().default_airline();
    let expected_impact = (1.0 - default_profile.on_time_rate) * 100.0 * 0.25;

    let airline_factor = prediction
        .factors
        .iter()
        .find(|f| f.factor == FactorKind::AirlinePerformance)
        .expect("airline factor present");
    assert!((airline_factor.impact - expected_impact).abs() < 1e-9);
}

#[test]
fn nominal_weights_still_sum_to_one_hundred_ten_percent() {
    // The shipped weight set over-counts by design; every stored score
    // depends on the 1.10 total, so a rebalance must show up here first.
    let prediction = engine()
        .predict(&neutral_flight(), thirty_hours_out())
        .expect("scores");

    let weight_total: f64 = prediction.factors.iter().map(|f| f.weight).sum();
    assert!((weight_total - 1.10).abs() < 1e-9);
}

#[test]
fn risk_tier_thresholds_are_exact() {
    assert_eq!(RiskTier::from_probability(39), RiskTier::Low);
    assert_eq!(RiskTier::from_probability(40), RiskTier::Medium);
    assert_eq!(RiskTier::from_probability(69), RiskTier::Medium);
    assert_eq!(RiskTier::from_probability(70), RiskTier::High);
    assert_eq!(RiskTier::from_probability(0), RiskTier::Low);
    assert_eq!(RiskTier::from_probability(100), RiskTier::High);
}

#[test]
fn blank_flight_number_is_a_missing_field() {
    let mut flight = neutral_flight();
    flight.flight_number = "  ".to_string();

    let err = engine()
        .predict(&flight, thirty_hours_out())
        .expect_err("blank flight number rejected");
    assert_eq!(err, ScoringError::MissingField("flight_number"));
}

#[test]
fn malformed_departure_is_a_per_call_failure() {
    let mut flight = neutral_flight();
    flight.departure_time = "tomorrow-ish".to_string();

    let err = engine()
        .predict(&flight, thirty_hours_out())
        .expect_err("malformed timestamp rejected");
    assert!(matches!(
        err,
        ScoringError::InvalidTimestamp { field: "departure_time", .. }
    ));
}

#[test]
fn boarding_status_raises_confidence_like_delayed() {
    let now = thirty_hours_out();
    let boarding = engine()
        .predict(&neutral_flight_with_status(FlightStatus::Boarding), now)
        .expect("boarding flight scores");

    // 40 base + 5 lead + 30 for live status.
    assert_eq!(boarding.confidence, 75);
}
