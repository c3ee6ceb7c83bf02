//! Static reference data behind the scoring factors.
//!
//! Every table resolves unknown keys to an explicit default entry, so a
//! carrier or airport the tables have never seen scores at the baseline
//! rather than failing the lookup.

use std::collections::HashMap;

/// Historical punctuality profile for one carrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirlineProfile {
    /// Share of flights arriving on time, in [0, 1].
    pub on_time_rate: f64,
    pub average_delay_minutes: f64,
}

/// Six fixed departure-hour buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureWindow {
    EarlyMorning,
    Morning,
    Midday,
    Afternoon,
    Evening,
    Night,
}

impl DepartureWindow {
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            5..=6 => Self::EarlyMorning,
            7..=10 => Self::Morning,
            11..=14 => Self::Midday,
            15..=17 => Self::Afternoon,
            18..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EarlyMorning => "early morning",
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::EarlyMorning => 0.85,
            Self::Morning => 1.1,
            Self::Midday => 1.0,
            Self::Afternoon => 1.2,
            Self::Evening => 1.25,
            Self::Night => 0.9,
        }
    }
}

/// Meteorological seasons keyed by departure month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Fall,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Winter => 1.3,
            Self::Spring => 1.0,
            Self::Summer => 1.15,
            Self::Fall => 1.05,
        }
    }
}

/// Immutable lookup tables shared by every scoring call.
///
/// Constructed once and never written to afterward, so concurrent callers
/// need no synchronization. Feedback recording deliberately does not touch
/// these tables.
#[derive(Debug, Clone)]
pub struct KnowledgeTables {
    airlines: HashMap<&'static str, AirlineProfile>,
    default_airline: AirlineProfile,
    airport_congestion: HashMap<&'static str, f64>,
    default_congestion: f64,
}

impl KnowledgeTables {
    /// The standard table set shipped with the service.
    pub fn standard() -> Self {
        let airlines = HashMap::from([
            ("AA", AirlineProfile { on_time_rate: 0.78, average_delay_minutes: 22.0 }),
            ("DL", AirlineProfile { on_time_rate: 0.84, average_delay_minutes: 14.0 }),
            ("UA", AirlineProfile { on_time_rate: 0.80, average_delay_minutes: 18.0 }),
            ("WN", AirlineProfile { on_time_rate: 0.76, average_delay_minutes: 25.0 }),
            ("AS", AirlineProfile { on_time_rate: 0.86, average_delay_minutes: 12.0 }),
            ("B6", AirlineProfile { on_time_rate: 0.72, average_delay_minutes: 28.0 }),
            ("NK", AirlineProfile { on_time_rate: 0.70, average_delay_minutes: 30.0 }),
            ("F9", AirlineProfile { on_time_rate: 0.71, average_delay_minutes: 27.0 }),
        ]);

        let airport_congestion = HashMap::from([
            ("ATL", 1.3),
            ("ORD", 1.35),
            ("DFW", 1.2),
            ("DEN", 1.15),
            ("LAX", 1.25),
            ("JFK", 1.3),
            ("EWR", 1.35),
            ("SFO", 1.3),
            ("SEA", 1.1),
            ("MIA", 1.2),
        ]);

        Self {
            airlines,
            default_airline: AirlineProfile {
                on_time_rate: 0.80,
                average_delay_minutes: 15.0,
            },
            airport_congestion,
            default_congestion: 1.0,
        }
    }

    pub fn airline(&self, code: &str) -> AirlineProfile {
        self.airlines
            .get(code)
            .copied()
            .unwrap_or(self.default_airline)
    }

    pub fn congestion(&self, airport: &str) -> f64 {
        self.airport_congestion
            .get(airport)
            .copied()
            .unwrap_or(self.default_congestion)
    }

    pub fn default_airline(&self) -> AirlineProfile {
        self.default_airline
    }
}
