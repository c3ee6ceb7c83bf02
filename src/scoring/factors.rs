//! Per-category factor evaluation.
//!
//! Each factor owns a fixed nominal weight and contributes additively to
//! the probability, delay-minute, and confidence accumulators. The weights
//! are part of the scoring contract: the shipped set sums to 110%, and the
//! published scores depend on that total, so rebalancing is a breaking
//! change to every stored prediction.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use super::domain::{FactorContribution, FactorKind, FlightAttributes, FlightStatus, ScoringError};
use super::knowledge::{DepartureWindow, KnowledgeTables, Season};

pub(crate) const AIRLINE_WEIGHT: f64 = 0.25;
pub(crate) const CONGESTION_WEIGHT: f64 = 0.20;
pub(crate) const DEPARTURE_WINDOW_WEIGHT: f64 = 0.20;
pub(crate) const SEASON_WEIGHT: f64 = 0.15;
pub(crate) const STATUS_WEIGHT: f64 = 0.20;
pub(crate) const DAY_OF_WEEK_WEIGHT: f64 = 0.05;
pub(crate) const LEAD_TIME_WEIGHT: f64 = 0.05;

/// Running totals accumulated across the seven factors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FactorTotals {
    pub probability_points: f64,
    pub delay_minute_points: f64,
    /// Lead-time confidence bonus, consumed by the confidence formula.
    pub lead_time_confidence: f64,
    pub hours_until_departure: f64,
}

/// Extracts the carrier code by stripping digits from the flight number
/// and upper-casing whatever remains ("ua1432" -> "UA").
pub(crate) fn airline_code(flight_number: &str) -> String {
    flight_number
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .to_ascii_uppercase()
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ScoringError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScoringError::MissingField(field));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ScoringError::InvalidTimestamp {
            field,
            value: trimmed.to_string(),
        })
}

pub(crate) fn evaluate(
    flight: &FlightAttributes,
    tables: &KnowledgeTables,
    now: DateTime<Utc>,
) -> Result<(Vec<FactorContribution>, FactorTotals), ScoringError> {
    if flight.flight_number.trim().is_empty() {
        return Err(ScoringError::MissingField("flight_number"));
    }

    let departure = parse_timestamp("departure_time", &flight.departure_time)?;
    // Arrival only needs to be well-formed; its value does not enter the score.
    parse_timestamp("arrival_time", &flight.arrival_time)?;

    let mut contributions = Vec::with_capacity(7);
    let mut probability_points = 0.0;
    let mut delay_minute_points = 0.0;

    // 1. Airline performance.
    let code = airline_code(&flight.flight_number);
    let profile = tables.airline(&code);
    let airline_impact = (1.0 - profile.on_time_rate) * 100.0 * AIRLINE_WEIGHT;
    probability_points += airline_impact;
    delay_minute_points += profile.average_delay_minutes * AIRLINE_WEIGHT;
    contributions.push(contribution(
        FactorKind::AirlinePerformance,
        airline_impact,
        AIRLINE_WEIGHT,
        format!(
            "{} arrives on time {:.0}% of the time, averaging {:.0} min when late",
            if code.is_empty() { flight.airline.as_str() } else { code.as_str() },
            profile.on_time_rate * 100.0,
            profile.average_delay_minutes
        ),
    ));

    // 2. Airport congestion, averaged over both endpoints.
    let departure_congestion = tables.congestion(&flight.departure_airport);
    let arrival_congestion = tables.congestion(&flight.arrival_airport);
    let avg_congestion = (departure_congestion + arrival_congestion) / 2.0;
    let congestion_factor = (avg_congestion - 1.0) * 100.0;
    let congestion_impact = congestion_factor * CONGESTION_WEIGHT;
    probability_points += congestion_impact;
    delay_minute_points += congestion_factor * 0.5 * CONGESTION_WEIGHT;
    contributions.push(contribution(
        FactorKind::AirportCongestion,
        congestion_impact,
        CONGESTION_WEIGHT,
        format!(
            "{} ({:.2}x) and {} ({:.2}x) congestion vs. 1.00x baseline",
            flight.departure_airport, departure_congestion,
            flight.arrival_airport, arrival_congestion
        ),
    ));

    // 3. Departure time of day.
    let window = DepartureWindow::from_hour(departure.hour());
    let time_factor = (window.multiplier() - 1.0) * 100.0;
    let window_impact = time_factor.abs() * DEPARTURE_WINDOW_WEIGHT;
    probability_points += window_impact;
    delay_minute_points += (time_factor * 0.3).max(0.0) * DEPARTURE_WINDOW_WEIGHT;
    contributions.push(contribution(
        FactorKind::DepartureWindow,
        window_impact,
        DEPARTURE_WINDOW_WEIGHT,
        format!(
            "{} departure carries a {:.2}x delay multiplier",
            window.label(),
            window.multiplier()
        ),
    ));

    // 4. Season, from the departure month.
    let season = Season::from_month(departure.month());
    let season_factor = (season.multiplier() - 1.0) * 100.0;
    let season_impact = season_factor.abs() * SEASON_WEIGHT;
    probability_points += season_impact;
    delay_minute_points += (season_factor * 0.4).max(0.0) * SEASON_WEIGHT;
    contributions.push(contribution(
        FactorKind::Season,
        season_impact,
        SEASON_WEIGHT,
        format!(
            "{} travel carries a {:.2}x delay multiplier",
            season.label(),
            season.multiplier()
        ),
    ));

    // 5. Current operational status.
    let (status_points, status_delay_minutes) = match flight.status {
        FlightStatus::Delayed => (40.0, 30.0),
        FlightStatus::Boarding | FlightStatus::Departed => (10.0, 0.0),
        _ => (0.0, 0.0),
    };
    let status_impact = status_points * STATUS_WEIGHT;
    probability_points += status_impact;
    delay_minute_points += status_delay_minutes * STATUS_WEIGHT;
    contributions.push(contribution(
        FactorKind::OperationalStatus,
        status_impact,
        STATUS_WEIGHT,
        format!("flight is currently reported as {}", flight.status.label()),
    ));

    // 6. Day of week. Weekends were meant to score lower, but the magnitude
    // is taken as-is either way and the published scores depend on that.
    let weekday = departure.weekday();
    let weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);
    let day_impact = 5.0 * DAY_OF_WEEK_WEIGHT;
    probability_points += day_impact;
    contributions.push(contribution(
        FactorKind::DayOfWeek,
        day_impact,
        DAY_OF_WEEK_WEIGHT,
        format!(
            "{} departure ({})",
            weekday,
            if weekend { "weekend" } else { "weekday" }
        ),
    ));

    // 7. Lead time until departure. Also feeds the confidence score:
    // the closer to departure, the more the live picture can be trusted.
    let hours_until_departure =
        (departure - now).num_seconds() as f64 / 3600.0;
    let (lead_points, lead_confidence) = if hours_until_departure < 2.0 {
        (15.0, 25.0)
    } else if hours_until_departure < 12.0 {
        (8.0, 15.0)
    } else if hours_until_departure < 24.0 {
        (5.0, 10.0)
    } else {
        (0.0, 5.0)
    };
    let lead_impact = lead_points * LEAD_TIME_WEIGHT;
    probability_points += lead_impact;
    contributions.push(contribution(
        FactorKind::LeadTime,
        lead_impact,
        LEAD_TIME_WEIGHT,
        format!("{hours_until_departure:.1} hours until scheduled departure"),
    ));

    let totals = FactorTotals {
        probability_points,
        delay_minute_points,
        lead_time_confidence: lead_confidence,
        hours_until_departure,
    };

    Ok((contributions, totals))
}

fn contribution(
    factor: FactorKind,
    impact: f64,
    weight: f64,
    detail: String,
) -> FactorContribution {
    FactorContribution {
        factor,
        factor_label: factor.label(),
        impact,
        weight,
        detail,
    }
}
