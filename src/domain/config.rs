use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{
    request::{ArrivalPreference, ClockTime, DeparturePreference, Needs},
    ProjectionPolicy,
};

/// Configuration for the travel dashboard.
///
/// This struct holds the settings that control the views: how many weeks
/// the calendar shows and the defaults a batch projection fills in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Number of weeks in the calendar grid.
    weeks: usize,

    /// Defaults for request fields that batches carry no data for.
    projection: ProjectionPolicy,

    /// Name used as the author of comments written from this machine.
    pub author: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weeks: default_weeks(),
            projection: ProjectionPolicy::default(),
            author: default_author(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the number of weeks the calendar shows.
    #[must_use]
    pub const fn weeks(&self) -> usize {
        self.weeks
    }

    /// Sets the number of weeks the calendar shows.
    pub const fn set_weeks(&mut self, weeks: usize) {
        self.weeks = weeks;
    }

    /// Returns the projection defaults.
    #[must_use]
    pub const fn projection(&self) -> &ProjectionPolicy {
        &self.projection
    }
}

const fn default_weeks() -> usize {
    4
}

fn default_author() -> String {
    "Vous".to_string()
}

fn default_hotel() -> String {
    ProjectionPolicy::default().hotel_near
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// Number of weeks in the calendar grid.
        #[serde(default = "default_weeks")]
        weeks: usize,

        #[serde(default = "default_author")]
        author: String,

        /// Default need flags for projected requests.
        #[serde(default)]
        sim_card: bool,

        #[serde(default)]
        travel_laptop: bool,

        #[serde(default = "default_hotel")]
        hotel: String,

        #[serde(default)]
        arrival: LegDefaults<ArrivalPreference>,

        #[serde(default)]
        departure: LegDefaults<DeparturePreference>,
    },
}

/// Default times and preference for one leg of a projected request.
///
/// Missing times fall back to the built-in defaults; an empty string clears
/// them.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LegDefaults<P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    precise_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preference: Option<P>,
}

/// Applies a configured time over a default: absent keeps the default,
/// blank clears it, anything else must parse as `HH:MM`.
fn configured_time(configured: Option<&str>, default: Option<ClockTime>) -> Option<ClockTime> {
    match configured.map(str::trim) {
        None => default,
        Some("") => None,
        Some(value) => value.parse().map_or_else(
            |e| {
                tracing::warn!("ignoring invalid time '{value}' in config: {e}");
                default
            },
            Some,
        ),
    }
}

/// An unset time is written as a blank string so it stays cleared on reload.
fn time_string(time: Option<ClockTime>) -> String {
    time.map_or_else(String::new, |t| t.to_string())
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                weeks,
                author,
                sim_card,
                travel_laptop,
                hotel,
                arrival,
                departure,
            } => {
                let defaults = ProjectionPolicy::default();
                let projection = ProjectionPolicy {
                    needs: Needs {
                        sim_card,
                        travel_laptop,
                    },
                    arrival_time: configured_time(arrival.time.as_deref(), defaults.arrival_time),
                    arrival_preference: arrival
                        .preference
                        .unwrap_or(defaults.arrival_preference),
                    arrival_precise_time: configured_time(
                        arrival.precise_time.as_deref(),
                        defaults.arrival_precise_time,
                    ),
                    departure_time: configured_time(
                        departure.time.as_deref(),
                        defaults.departure_time,
                    ),
                    departure_preference: departure
                        .preference
                        .unwrap_or(defaults.departure_preference),
                    departure_precise_time: configured_time(
                        departure.precise_time.as_deref(),
                        defaults.departure_precise_time,
                    ),
                    hotel_near: hotel,
                };
                Self {
                    weeks,
                    projection,
                    author,
                }
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        let projection = config.projection;
        Self::V1 {
            weeks: config.weeks,
            author: config.author,
            sim_card: projection.needs.sim_card,
            travel_laptop: projection.needs.travel_laptop,
            hotel: projection.hotel_near,
            arrival: LegDefaults {
                time: Some(time_string(projection.arrival_time)),
                precise_time: Some(time_string(projection.arrival_precise_time)),
                preference: Some(projection.arrival_preference),
            },
            departure: LegDefaults {
                time: Some(time_string(projection.departure_time)),
                precise_time: Some(time_string(projection.departure_precise_time)),
                preference: Some(projection.departure_preference),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nweeks = 6\nauthor = \"Marie\"\nsim_card = true\nhotel = \"Gare\"\n\n[arrival]\ntime = \"10:00\"\npreference = \"veille-soir\"\n\n[departure]\nprecise_time = \"\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.weeks(), 6);
        assert_eq!(config.author, "Marie");
        let projection = config.projection();
        assert!(projection.needs.sim_card);
        assert!(!projection.needs.travel_laptop);
        assert_eq!(projection.hotel_near, "Gare");
        assert_eq!(projection.arrival_time, ClockTime::from_hm(10, 0));
        assert_eq!(
            projection.arrival_preference,
            ArrivalPreference::EveningBefore
        );
        assert_eq!(projection.arrival_precise_time, ClockTime::from_hm(8, 30));
        assert_eq!(projection.departure_precise_time, None);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nweeks = \"four\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn invalid_time_keeps_default() {
        let config: Config =
            toml::from_str("_version = \"1\"\n[departure]\ntime = \"5pm\"\n").unwrap();
        assert_eq!(config.projection().departure_time, ClockTime::from_hm(17, 0));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config: Config =
            toml::from_str("_version = \"1\"\ntravel_laptop = true\n[arrival]\nprecise_time = \"\"\n")
                .unwrap();
        config.set_weeks(2);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
