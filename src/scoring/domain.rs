use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational status reported by the upstream flight feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Scheduled,
    OnTime,
    Boarding,
    Departed,
    Delayed,
    Arrived,
    Cancelled,
}

impl FlightStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::OnTime => "On Time",
            Self::Boarding => "Boarding",
            Self::Departed => "Departed",
            Self::Delayed => "Delayed",
            Self::Arrived => "Arrived",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Maps free-text feed values ("On Time", "DELAYED", …) onto a status.
    /// Unrecognized or blank values fall back to `Scheduled`.
    pub fn from_feed(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "on_time" | "ontime" => Self::OnTime,
            "boarding" => Self::Boarding,
            "departed" | "in_air" | "enroute" | "en_route" => Self::Departed,
            "delayed" => Self::Delayed,
            "arrived" | "landed" => Self::Arrived,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Scheduled,
        }
    }
}

/// Flight metadata the scoring core reads. Richer caller objects carry more
/// fields; only these seven matter here.
///
/// Timestamps arrive as RFC 3339 strings and are parsed inside the engine so
/// that a malformed value surfaces as a per-call scoring failure rather than
/// a transport-level rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightAttributes {
    pub flight_number: String,
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub status: FlightStatus,
}

/// Input problems detected while scoring a single flight.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid {field} '{value}': expected an RFC 3339 timestamp")]
    InvalidTimestamp { field: &'static str, value: String },
}

/// Named input category carrying a fixed share of the scoring mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    AirlinePerformance,
    AirportCongestion,
    DepartureWindow,
    Season,
    OperationalStatus,
    DayOfWeek,
    LeadTime,
}

impl FactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AirlinePerformance => "Airline performance",
            Self::AirportCongestion => "Airport congestion",
            Self::DepartureWindow => "Departure time of day",
            Self::Season => "Season",
            Self::OperationalStatus => "Current status",
            Self::DayOfWeek => "Day of week",
            Self::LeadTime => "Lead time",
        }
    }
}

/// Discrete contribution to a prediction, allowing transparent audits.
///
/// `impact` is the weighted delay-probability points this factor added;
/// its magnitude is only meaningful relative to the other factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub factor: FactorKind,
    pub factor_label: &'static str,
    pub impact: f64,
    pub weight: f64,
    pub detail: String,
}

/// Coarse classification of a delay probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Fixed 70/40 thresholds; not configurable.
    pub const fn from_probability(probability: u8) -> Self {
        if probability >= 70 {
            Self::High
        } else if probability >= 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "orange",
            Self::High => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Risk,
    TopFactor,
    Timing,
}

/// Human-readable observation derived from a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub severity: InsightSeverity,
    pub message: String,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTier {
    Immediate,
    Monitor,
    Standard,
}

impl ActionTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Immediate => "Immediate action",
            Self::Monitor => "Monitor",
            Self::Standard => "Standard handling",
        }
    }
}

/// Tiered action plan attached to every prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub tier: ActionTier,
    pub title: &'static str,
    pub steps: Vec<String>,
}

/// Full scoring output for one flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub flight_number: String,
    /// Always within [0, 100].
    pub delay_probability: u8,
    pub estimated_delay_minutes: u32,
    pub risk: RiskTier,
    pub risk_color: &'static str,
    /// Always within [0, 100].
    pub confidence: u8,
    pub generated_at: DateTime<Utc>,
    pub factors: Vec<FactorContribution>,
    pub insights: Vec<Insight>,
    pub recommendation: Recommendation,
}
