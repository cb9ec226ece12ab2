use std::{collections::BTreeSet, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{calendar::Scheduled, RequestStatus};

/// A coarse trip grouping: several travelers going to one destination over
/// a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelBatch {
    /// Unique identifier within the batch collection.
    pub id: String,
    /// Free-text name, e.g. "Salon Tech Paris 2024".
    pub name: String,
    /// Destination written as "City, Country".
    pub destination: String,
    /// Identifiers of the travelers taking part.
    #[serde(default)]
    pub travelers: BTreeSet<String>,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
    /// Planning status.
    pub status: BatchStatus,
    /// Budget in whole currency units.
    #[serde(default)]
    pub budget: u64,
}

impl Scheduled for TravelBatch {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// Planning status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchStatus {
    /// Being organised.
    Planning,
    /// Bookings confirmed.
    Confirmed,
    /// Travelers are on the road.
    InProgress,
    /// Trip is over.
    Completed,
}

impl BatchStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Planning,
        Self::Confirmed,
        Self::InProgress,
        Self::Completed,
    ];

    /// The request status a batch in this status is shown with.
    ///
    /// `InProgress` and `Completed` both map to `Validated`, so the request
    /// views cannot tell a running trip from a finished one.
    #[must_use]
    #[allow(clippy::match_same_arms, reason = "one arm per batch status")]
    pub const fn request_status(self) -> RequestStatus {
        match self {
            Self::Planning => RequestStatus::Draft,
            Self::Confirmed => RequestStatus::Sent,
            Self::InProgress => RequestStatus::Validated,
            Self::Completed => RequestStatus::Validated,
        }
    }

    /// The wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planification",
            Self::Confirmed => "Confirmé",
            Self::InProgress => "En cours",
            Self::Completed => "Terminé",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Somebody who travels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    /// Unique identifier within the traveler collection.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Department the traveler belongs to.
    #[serde(default)]
    pub department: String,
    /// Trips currently under way.
    #[serde(default)]
    pub current_trips: u32,
    /// Trips taken overall.
    #[serde(default)]
    pub total_trips: u32,
}

impl Traveler {
    /// The first letter of each word of the traveler's name.
    #[must_use]
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// A traveler attached to one request, as shown in the table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identifier of the participant entry.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Role on the trip.
    #[serde(default)]
    pub role: String,
    /// Whether the participant confirmed.
    pub status: ParticipantStatus,
}

impl Participant {
    /// The first letter of each word of the participant's name.
    #[must_use]
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Whether a participant confirmed their place on a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantStatus {
    /// Going.
    Confirmed,
    /// Not answered yet.
    Pending,
    /// Not going.
    Declined,
}

impl ParticipantStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmé",
            Self::Pending => "En attente",
            Self::Declined => "Décliné",
        }
    }
}

/// A piece of equipment lent for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalAsset {
    /// Identifier of the asset entry.
    pub id: String,
    /// What kind of device it is.
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Make and model, e.g. "ThinkPad X1".
    pub model: String,
    /// Manufacturer serial number.
    pub serial_number: String,
    /// Name of the person holding the device.
    #[serde(default)]
    pub assigned_to: String,
    /// Availability.
    pub status: AssetStatus,
}

/// Kind of device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    /// A laptop computer.
    Laptop,
    /// A tablet.
    Tablet,
    /// A mobile phone.
    Phone,
}

impl AssetKind {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Laptop => "Ordinateur portable",
            Self::Tablet => "Tablette",
            Self::Phone => "Téléphone",
        }
    }
}

/// Availability of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetStatus {
    /// Handed out to someone.
    Assigned,
    /// In stock.
    Available,
    /// Being repaired.
    Maintenance,
}

impl AssetStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assigned => "Assigné",
            Self::Available => "Disponible",
            Self::Maintenance => "Maintenance",
        }
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn batch(start: NaiveDate, end: NaiveDate) -> TravelBatch {
        TravelBatch {
            id: "1".to_string(),
            name: "Salon Tech Paris 2024".to_string(),
            destination: "Paris, France".to_string(),
            travelers: BTreeSet::new(),
            start_date: start,
            end_date: end,
            status: BatchStatus::Confirmed,
            budget: 8500,
        }
    }

    #[test_case(BatchStatus::Planning, RequestStatus::Draft)]
    #[test_case(BatchStatus::Confirmed, RequestStatus::Sent)]
    #[test_case(BatchStatus::InProgress, RequestStatus::Validated)]
    #[test_case(BatchStatus::Completed, RequestStatus::Validated)]
    fn request_status_mapping(status: BatchStatus, expected: RequestStatus) {
        assert_eq!(status.request_status(), expected);
    }

    #[test]
    fn occupancy_is_inclusive() {
        let batch = batch(day(3, 15), day(3, 18));
        assert!(!batch.occupies(day(3, 14)));
        assert!(batch.occupies(day(3, 15)));
        assert!(batch.occupies(day(3, 18)));
        assert!(!batch.occupies(day(3, 19)));
    }

    #[test]
    fn reversed_batch_occupies_nothing() {
        let batch = batch(day(3, 18), day(3, 15));
        assert!(!batch.occupies(day(3, 16)));
        assert!(!batch.occupies(day(3, 15)));
    }

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let status: BatchStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, BatchStatus::InProgress);
        assert_eq!(status.to_string(), "in-progress");
    }

    #[test_case("Marie Dubois", "MD")]
    #[test_case("Sophie  Laurent", "SL")]
    #[test_case("Cher", "C")]
    #[test_case("", ""; "empty name")]
    fn traveler_initials(name: &str, expected: &str) {
        let traveler = Traveler {
            id: "1".to_string(),
            name: name.to_string(),
            email: String::new(),
            department: String::new(),
            current_trips: 0,
            total_trips: 0,
        };
        assert_eq!(traveler.initials(), expected);
    }

    #[test]
    fn asset_wire_names() {
        let asset: DigitalAsset = serde_json::from_str(
            r#"{"id":"d1","type":"laptop","model":"ThinkPad X1","serialNumber":"TP2023002","assignedTo":"Pierre Martin","status":"maintenance"}"#,
        )
        .unwrap();
        assert_eq!(asset.kind, AssetKind::Laptop);
        assert_eq!(asset.serial_number, "TP2023002");
        assert_eq!(asset.status.label(), "Maintenance");
    }
}
