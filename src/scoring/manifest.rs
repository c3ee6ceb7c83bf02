//! CSV flight manifest ingestion for batch scoring.
//!
//! Accepts the column layout produced by the dispatch tooling's export:
//! `Flight Number, Airline, Origin, Destination, Departure Time,
//! Arrival Time, Status`. Status is optional; blank or unrecognized values
//! fall back to `scheduled`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{FlightAttributes, FlightStatus};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read flight manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid flight manifest data: {0}")]
    Csv(#[from] csv::Error),
    #[error("flight manifest contains no flights")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    #[serde(rename = "Flight Number")]
    flight_number: String,
    #[serde(rename = "Airline", default)]
    airline: String,
    #[serde(rename = "Origin")]
    origin: String,
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "Departure Time")]
    departure_time: String,
    #[serde(rename = "Arrival Time")]
    arrival_time: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

impl ManifestRow {
    fn into_attributes(self) -> FlightAttributes {
        let status = self
            .status
            .as_deref()
            .map(FlightStatus::from_feed)
            .unwrap_or(FlightStatus::Scheduled);

        FlightAttributes {
            flight_number: self.flight_number.trim().to_string(),
            airline: self.airline.trim().to_string(),
            departure_airport: self.origin.trim().to_ascii_uppercase(),
            arrival_airport: self.destination.trim().to_ascii_uppercase(),
            departure_time: self.departure_time.trim().to_string(),
            arrival_time: self.arrival_time.trim().to_string(),
            status,
        }
    }
}

pub struct FlightManifest;

impl FlightManifest {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<FlightAttributes>, ManifestError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<FlightAttributes>, ManifestError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut flights = Vec::new();
        for row in csv_reader.deserialize::<ManifestRow>() {
            flights.push(row?.into_attributes());
        }

        if flights.is_empty() {
            return Err(ManifestError::Empty);
        }

        Ok(flights)
    }
}
