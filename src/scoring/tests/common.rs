use chrono::{DateTime, Duration, Utc};

use crate::scoring::domain::{FlightAttributes, FlightStatus};
use crate::scoring::ScoringEngine;

/// Midday (13:00) on a spring Wednesday, so the departure-window, season,
/// and day-of-week factors all sit at their neutral baselines.
pub(super) const NEUTRAL_DEPARTURE: &str = "2025-04-16T13:00:00Z";

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::standard()
}

pub(super) fn departure_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(NEUTRAL_DEPARTURE)
        .expect("valid departure fixture")
        .with_timezone(&Utc)
}

/// 30 hours out: lead-time factor contributes zero probability points.
pub(super) fn thirty_hours_out() -> DateTime<Utc> {
    departure_instant() - Duration::hours(30)
}

/// Unknown carrier (ZZ), unlisted airports, neutral departure window.
/// Only the default airline profile and the day-of-week constant add
/// probability points.
pub(super) fn neutral_flight() -> FlightAttributes {
    FlightAttributes {
        flight_number: "ZZ104".to_string(),
        airline: "Zephyr Air".to_string(),
        departure_airport: "PIA".to_string(),
        arrival_airport: "FSD".to_string(),
        departure_time: NEUTRAL_DEPARTURE.to_string(),
        arrival_time: "2025-04-16T16:30:00Z".to_string(),
        status: FlightStatus::OnTime,
    }
}

pub(super) fn neutral_flight_with_status(status: FlightStatus) -> FlightAttributes {
    FlightAttributes {
        status,
        ..neutral_flight()
    }
}

/// Everything stacked against the flight: worst carrier in the table,
/// two congested hubs, winter evening departure, already delayed.
pub(super) fn worst_case_flight() -> FlightAttributes {
    FlightAttributes {
        flight_number: "NK456".to_string(),
        airline: "Spirit".to_string(),
        departure_airport: "ORD".to_string(),
        arrival_airport: "EWR".to_string(),
        departure_time: "2025-01-15T19:30:00Z".to_string(),
        arrival_time: "2025-01-15T22:45:00Z".to_string(),
        status: FlightStatus::Delayed,
    }
}
