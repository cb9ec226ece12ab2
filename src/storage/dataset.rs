//! Read-only travel datasets.
//!
//! A dataset is a YAML document listing travelers, batches, requests, and the
//! participants and equipment of each request. Nothing is ever written back; the shell
//! keeps its working copy in memory.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    request::{
        ArrivalPreference, ClockTime, DateRange, DeparturePreference, Hotel, Leg, Location, Needs,
    },
    AssetKind, AssetStatus, BatchStatus, DigitalAsset, Participant, ParticipantStatus, Purpose,
    RequestStatus, TravelBatch, TravelRequest, Traveler,
};

/// Everything the dashboard displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Known travelers.
    #[serde(default)]
    pub travelers: Vec<Traveler>,
    /// Travel batches.
    #[serde(default)]
    pub batches: Vec<TravelBatch>,
    /// Individual travel requests.
    #[serde(default)]
    pub requests: Vec<TravelRequest>,
    /// Participants of each request, keyed by request id.
    #[serde(default)]
    pub participants: BTreeMap<String, Vec<Participant>>,
    /// Equipment lent for each request, keyed by request id.
    #[serde(default)]
    pub assets: BTreeMap<String, Vec<DigitalAsset>>,
}

impl Dataset {
    /// Loads and validates a dataset from a YAML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or if it does not pass
    /// [`Dataset::validate`].
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_yaml(&content)?;
        tracing::debug!(
            "Loaded dataset from {}: {} travelers, {} batches, {} requests",
            path.display(),
            dataset.travelers.len(),
            dataset.batches.len(),
            dataset.requests.len()
        );
        Ok(dataset)
    }

    /// Parses and validates a dataset from YAML text.
    ///
    /// # Errors
    ///
    /// Fails if the text is not a valid dataset document, or if it does not
    /// pass [`Dataset::validate`].
    pub fn from_yaml(content: &str) -> Result<Self, DatasetError> {
        let dataset: Self = serde_yaml::from_str(content)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Checks the dataset's integrity.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::DuplicateId`] if two travelers, two batches, two
    ///   requests or two assets share an id.
    /// - [`DatasetError::UnknownTraveler`] if a batch references a traveler
    ///   that is not in the dataset.
    pub fn validate(&self) -> Result<(), DatasetError> {
        check_unique("traveler", self.travelers.iter().map(|t| t.id.as_str()))?;
        check_unique("batch", self.batches.iter().map(|b| b.id.as_str()))?;
        check_unique("request", self.requests.iter().map(|r| r.id.as_str()))?;
        check_unique(
            "asset",
            self.assets.values().flatten().map(|a| a.id.as_str()),
        )?;

        for batch in &self.batches {
            if let Some(missing) = batch
                .travelers
                .iter()
                .find(|id| self.traveler(id).is_none())
            {
                return Err(DatasetError::UnknownTraveler {
                    batch: batch.id.clone(),
                    traveler: missing.clone(),
                });
            }
            if batch.end_date < batch.start_date {
                tracing::warn!(
                    "Batch {} ends ({}) before it starts ({}); it will not appear in the calendar",
                    batch.id,
                    batch.end_date,
                    batch.start_date
                );
            }
        }
        Ok(())
    }

    /// Looks up a traveler by id.
    #[must_use]
    pub fn traveler(&self, id: &str) -> Option<&Traveler> {
        self.travelers.iter().find(|t| t.id == id)
    }

    /// Looks up a batch by id.
    #[must_use]
    pub fn batch(&self, id: &str) -> Option<&TravelBatch> {
        self.batches.iter().find(|b| b.id == id)
    }

    /// The travelers taking part in a batch.
    pub fn travelers_of<'a>(
        &'a self,
        batch: &'a TravelBatch,
    ) -> impl Iterator<Item = &'a Traveler> {
        batch.travelers.iter().filter_map(|id| self.traveler(id))
    }

    /// The participants of a request; empty if none are recorded.
    #[must_use]
    pub fn participants(&self, request_id: &str) -> &[Participant] {
        self.participants
            .get(request_id)
            .map_or(&[], Vec::as_slice)
    }

    /// The equipment lent for a request; empty if none is recorded.
    #[must_use]
    pub fn assets(&self, request_id: &str) -> &[DigitalAsset] {
        self.assets.get(request_id).map_or(&[], Vec::as_slice)
    }

    /// The built-in demo data.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            travelers: sample_travelers(),
            batches: sample_batches(),
            requests: vec![sample_request()],
            participants: sample_participants(),
            assets: sample_assets(),
        }
    }
}

/// Errors loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        /// The dataset file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid dataset document.
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Two entries of the same collection share an id.
    #[error("duplicate {collection} id '{id}'")]
    DuplicateId {
        /// Which collection.
        collection: &'static str,
        /// The repeated id.
        id: String,
    },

    /// A batch references a traveler that does not exist.
    #[error("batch '{batch}' references unknown traveler '{traveler}'")]
    UnknownTraveler {
        /// The referencing batch.
        batch: String,
        /// The missing traveler id.
        traveler: String,
    },
}

fn check_unique<'a>(
    collection: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), DatasetError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DatasetError::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn sample_travelers() -> Vec<Traveler> {
    vec![
        traveler("1", "Marie Dubois", "Commercial", 2, 15),
        traveler("2", "Pierre Martin", "Marketing", 1, 8),
        traveler("3", "Sophie Laurent", "R&D", 0, 12),
    ]
}

fn sample_batches() -> Vec<TravelBatch> {
    vec![
        batch(
            "1",
            "Salon Tech Paris 2024",
            "Paris, France",
            &["1", "2"],
            (date(2024, 3, 15), date(2024, 3, 18)),
            BatchStatus::Confirmed,
            8500,
        ),
        batch(
            "2",
            "Visite Client London",
            "Londres, UK",
            &["3"],
            (date(2024, 3, 22), date(2024, 3, 24)),
            BatchStatus::Planning,
            3200,
        ),
        batch(
            "3",
            "Conférence Berlin",
            "Berlin, Allemagne",
            &["1"],
            (date(2024, 4, 5), date(2024, 4, 7)),
            BatchStatus::InProgress,
            4100,
        ),
    ]
}

fn sample_request() -> TravelRequest {
    let mut request = TravelRequest {
        id: "1".to_string(),
        purpose: Purpose::TradeShow,
        location: Location {
            district: "La Défense".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
        },
        dates: DateRange::between(date(2024, 3, 15), date(2024, 3, 18)),
        arrival: Leg {
            date: Some(date(2024, 3, 15)),
            time: ClockTime::from_hm(9, 0),
            preference: ArrivalPreference::Morning,
            precise_time: ClockTime::from_hm(8, 30),
        },
        departure: Leg {
            date: Some(date(2024, 3, 18)),
            time: ClockTime::from_hm(17, 0),
            preference: DeparturePreference::Evening,
            precise_time: ClockTime::from_hm(18, 0),
        },
        hotel: Hotel {
            near: "Centre de congrès".to_string(),
        },
        needs: Needs {
            sim_card: true,
            travel_laptop: false,
        },
        status: RequestStatus::Validated,
        comments: Vec::new(),
    };
    for (author, text, day) in [
        ("Intermédiaire", "Hôtel réservé au Marriott La Défense", 10),
        ("Vous", "Parfait, merci !", 11),
    ] {
        request
            .add_comment(author, text, morning(2024, 2, day))
            .expect("sample comments are not blank");
    }
    request
}

fn sample_participants() -> BTreeMap<String, Vec<Participant>> {
    BTreeMap::from([
        (
            "1".to_string(),
            vec![
                participant("t1", "Marie Dubois", "Chef de projet", ParticipantStatus::Confirmed),
                participant("t2", "Pierre Martin", "Développeur", ParticipantStatus::Confirmed),
            ],
        ),
        (
            "2".to_string(),
            vec![participant("t3", "Sophie Laurent", "Designer", ParticipantStatus::Confirmed)],
        ),
        (
            "3".to_string(),
            vec![participant("t4", "Marie Dubois", "Chef de projet", ParticipantStatus::Confirmed)],
        ),
    ])
}

fn sample_assets() -> BTreeMap<String, Vec<DigitalAsset>> {
    BTreeMap::from([(
        "1".to_string(),
        vec![
            laptop("d1", "MacBook Pro 16\"", "MBP2023001", "Marie Dubois"),
            laptop("d2", "ThinkPad X1", "TP2023002", "Pierre Martin"),
        ],
    )])
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("sample dates are valid")
}

fn morning(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("sample timestamps are valid")
}

fn traveler(id: &str, name: &str, department: &str, current: u32, total: u32) -> Traveler {
    let email = format!("{}@company.com", name.to_lowercase().replace(' ', "."));
    Traveler {
        id: id.to_string(),
        name: name.to_string(),
        email,
        department: department.to_string(),
        current_trips: current,
        total_trips: total,
    }
}

fn batch(
    id: &str,
    name: &str,
    destination: &str,
    travelers: &[&str],
    (start_date, end_date): (NaiveDate, NaiveDate),
    status: BatchStatus,
    budget: u64,
) -> TravelBatch {
    TravelBatch {
        id: id.to_string(),
        name: name.to_string(),
        destination: destination.to_string(),
        travelers: travelers.iter().map(ToString::to_string).collect(),
        start_date,
        end_date,
        status,
        budget,
    }
}

fn participant(id: &str, name: &str, role: &str, status: ParticipantStatus) -> Participant {
    Participant {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        status,
    }
}

fn laptop(id: &str, model: &str, serial_number: &str, assigned_to: &str) -> DigitalAsset {
    DigitalAsset {
        id: id.to_string(),
        kind: AssetKind::Laptop,
        model: model.to_string(),
        serial_number: serial_number.to_string(),
        assigned_to: assigned_to.to_string(),
        status: AssetStatus::Assigned,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::{projection, DashboardStats, ProjectionPolicy};

    const YAML: &str = r#"
travelers:
  - id: "1"
    name: Marie Dubois
    department: Commercial
    currentTrips: 2
    totalTrips: 15
batches:
  - id: "1"
    name: Salon Tech Paris 2024
    destination: Paris, France
    travelers: ["1"]
    startDate: 2024-03-15
    endDate: 2024-03-18
    status: confirmed
    budget: 8500
participants:
  "1":
    - id: t1
      name: Marie Dubois
      role: Chef de projet
      status: confirmed
assets:
  "1":
    - id: d1
      type: tablet
      model: iPad Air
      serialNumber: IPA2024001
      assignedTo: Marie Dubois
      status: available
"#;

    #[test]
    fn sample_is_valid() {
        let sample = Dataset::sample();
        sample.validate().unwrap();
        assert_eq!(sample.travelers.len(), 3);
        assert_eq!(sample.batches.len(), 3);
        assert_eq!(sample.requests[0].comments.len(), 2);
        assert_eq!(sample.participants("1").len(), 2);
        assert!(sample.participants("unknown").is_empty());
    }

    #[test]
    fn sample_participants_match_the_dashboard() {
        let sample = Dataset::sample();
        let berlin = sample.participants("3");
        assert_eq!(berlin.len(), 1);
        assert_eq!(berlin[0].name, "Marie Dubois");
        assert_eq!(berlin[0].status, ParticipantStatus::Confirmed);
    }

    #[test]
    fn sample_lends_two_laptops() {
        let sample = Dataset::sample();
        let assets = sample.assets("1");

        let serials: Vec<_> = assets.iter().map(|a| a.serial_number.as_str()).collect();
        assert_eq!(serials, ["MBP2023001", "TP2023002"]);
        assert!(assets.iter().all(|a| a.kind == AssetKind::Laptop));
        assert!(assets.iter().all(|a| a.status == AssetStatus::Assigned));
        assert_eq!(assets[1].assigned_to, "Pierre Martin");
        assert!(sample.assets("2").is_empty());
    }

    #[test]
    fn sample_statistics() {
        let stats = DashboardStats::collect(&Dataset::sample().batches);
        assert_eq!(stats.total_budget, 15_800);
        assert_eq!(stats.active_travelers, 3);
        assert_eq!(stats.count(BatchStatus::Planning), 1);
    }

    #[test]
    fn sample_projection() {
        let sample = Dataset::sample();
        let requests = projection::project(&sample.batches, &ProjectionPolicy::default());
        let purposes: Vec<_> = requests.iter().map(|r| r.purpose).collect();
        assert_eq!(
            purposes,
            [Purpose::TradeShow, Purpose::ClientVisit, Purpose::Other]
        );
    }

    #[test]
    fn parses_yaml() {
        let dataset = Dataset::from_yaml(YAML).unwrap();

        assert_eq!(dataset.traveler("1").unwrap().initials(), "MD");
        let batch = dataset.batch("1").unwrap();
        assert_eq!(batch.start_date, date(2024, 3, 15));
        assert_eq!(batch.status, BatchStatus::Confirmed);
        let names: Vec<_> = dataset.travelers_of(batch).map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Marie Dubois"]);
        assert!(dataset.requests.is_empty());

        let asset = &dataset.assets("1")[0];
        assert_eq!(asset.kind, AssetKind::Tablet);
        assert_eq!(asset.status, AssetStatus::Available);
        assert!(dataset.assets("2").is_empty());
    }

    #[test]
    fn empty_document_is_an_empty_dataset() {
        assert_eq!(Dataset::from_yaml("{}").unwrap(), Dataset::default());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut dataset = Dataset::sample();
        dataset.batches.push(dataset.batches[0].clone());

        let error = dataset.validate().unwrap_err();
        assert!(matches!(
            error,
            DatasetError::DuplicateId { collection: "batch", ref id } if id == "1"
        ));
    }

    #[test]
    fn duplicate_asset_ids_are_rejected() {
        let mut dataset = Dataset::sample();
        let lent = dataset.assets("1")[0].clone();
        dataset.assets.insert("3".to_string(), vec![lent]);

        let error = dataset.validate().unwrap_err();
        assert!(matches!(
            error,
            DatasetError::DuplicateId { collection: "asset", ref id } if id == "d1"
        ));
    }

    #[test]
    fn unknown_traveler_is_rejected() {
        let mut dataset = Dataset::sample();
        dataset.batches[1].travelers.insert("99".to_string());

        let error = dataset.validate().unwrap_err();
        assert!(matches!(
            error,
            DatasetError::UnknownTraveler { ref batch, ref traveler } if batch == "2" && traveler == "99"
        ));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.batches.len(), 1);
    }

    #[test]
    fn load_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let error = Dataset::load(&tmp.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(error, DatasetError::Io { .. }));
    }

    #[test]
    fn load_malformed_file_fails() {
        let error = Dataset::from_yaml("batches: [{ id: 1 }]").unwrap_err();
        assert!(matches!(error, DatasetError::Parse(_)));
    }
}
