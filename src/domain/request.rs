use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A travel request, as edited through the request form.
///
/// Serialized field names follow the form's wire names (`location.ville`,
/// `arrival.preciseTime`, `needs.carteSIM`, ...), so they double as the
/// addressable paths of [`RequestForm`](crate::RequestForm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequest {
    /// Unique identifier within the request collection.
    pub id: String,
    /// Why the trip happens.
    pub purpose: Purpose,
    /// Where the traveler needs to be.
    pub location: Location,
    /// The overall travel period.
    pub dates: DateRange,
    /// Arrival details.
    pub arrival: Leg<ArrivalPreference>,
    /// Departure details.
    pub departure: Leg<DeparturePreference>,
    /// Hotel preferences.
    pub hotel: Hotel,
    /// Equipment the traveler needs.
    pub needs: Needs,
    /// Where the request is in its lifecycle.
    pub status: RequestStatus,
    /// Discussion thread, oldest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl TravelRequest {
    /// A blank draft request with the given identifier.
    ///
    /// This is the state of a freshly opened form.
    #[must_use]
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            purpose: Purpose::TradeShow,
            location: Location::default(),
            dates: DateRange::default(),
            arrival: Leg::default(),
            departure: Leg::default(),
            hotel: Hotel::default(),
            needs: Needs::default(),
            status: RequestStatus::Draft,
            comments: Vec::new(),
        }
    }

    /// A blank draft request with a freshly generated identifier.
    #[must_use]
    pub fn new_draft() -> Self {
        Self::blank(Uuid::new_v4().to_string())
    }

    /// Marks the request as sent.
    pub const fn mark_sent(&mut self) {
        self.status = RequestStatus::Sent;
    }

    /// Appends a comment to the request's thread.
    ///
    /// Surrounding whitespace is trimmed from `text`.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCommentError`] if the text is blank.
    pub fn add_comment(
        &mut self,
        author: impl Into<String>,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<&Comment, EmptyCommentError> {
        let text = NonEmptyString::new(text.trim().to_string()).map_err(|_| EmptyCommentError)?;
        let index = self.comments.len();
        self.comments.push(Comment {
            id: Uuid::new_v4().to_string(),
            author: author.into(),
            text,
            date: at,
        });
        Ok(&self.comments[index])
    }
}

/// Error returned when a comment has no visible text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("comment text must not be blank")]
pub struct EmptyCommentError;

/// The purpose of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Purpose {
    /// Attending a trade show.
    #[serde(rename = "salon")]
    TradeShow,
    /// Visiting a client.
    #[serde(rename = "visite-client")]
    ClientVisit,
    /// Anything else.
    #[serde(rename = "autres")]
    Other,
}

impl Purpose {
    /// The wire name of the purpose.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TradeShow => "salon",
            Self::ClientVisit => "visite-client",
            Self::Other => "autres",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TradeShow => "Salon",
            Self::ClientVisit => "Visite client",
            Self::Other => "Autres",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a request.
///
/// The normal flow is `draft -> sent -> validated`; nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    /// Being written.
    Draft,
    /// Submitted for handling.
    Sent,
    /// Accepted.
    Validated,
}

impl RequestStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Draft, Self::Sent, Self::Validated];

    /// The wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Validated => "validated",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Brouillon",
            Self::Sent => "Envoyé",
            Self::Validated => "Validé",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError(s.to_string()))
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown status '{0}'")]
pub struct UnknownStatusError(pub(crate) String);

/// Where the traveler needs to be.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// District or neighbourhood.
    #[serde(rename = "quartier")]
    pub district: String,
    /// City.
    #[serde(rename = "ville")]
    pub city: String,
    /// Country.
    #[serde(rename = "pays")]
    pub country: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.city.is_empty(), self.country.is_empty()) {
            (false, false) => write!(f, "{}, {}", self.city, self.country),
            (false, true) => f.write_str(&self.city),
            (true, false) => f.write_str(&self.country),
            (true, true) => Ok(()),
        }
    }
}

/// A travel period. Either bound may be unset while the form is incomplete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day.
    #[serde(rename = "du")]
    pub from: Option<NaiveDate>,
    /// Last day.
    #[serde(rename = "au")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// A range with both bounds set.
    #[must_use]
    pub const fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether the bounds are in order.
    ///
    /// A range with a missing bound is considered ordered.
    #[must_use]
    pub fn is_ordered(self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }
}

/// Arrival or departure details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg<P> {
    /// The day the traveler must be on site (arrival) or is done (departure).
    pub date: Option<NaiveDate>,
    /// Time of the engagement on that day.
    #[serde(default, with = "optional_time")]
    pub time: Option<ClockTime>,
    /// When the traveler prefers to travel.
    pub preference: P,
    /// An exact travel time, if the traveler has one in mind.
    #[serde(default, with = "optional_time")]
    pub precise_time: Option<ClockTime>,
}

/// When the traveler prefers to arrive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalPreference {
    /// The morning of the first day.
    #[default]
    #[serde(rename = "matin")]
    Morning,
    /// The evening before.
    #[serde(rename = "veille-soir")]
    EveningBefore,
    /// Either.
    #[serde(rename = "les-deux")]
    Either,
}

impl ArrivalPreference {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Le matin",
            Self::EveningBefore => "La veille au soir",
            Self::Either => "Les deux",
        }
    }
}

/// When the traveler prefers to leave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeparturePreference {
    /// The evening of the last day.
    #[default]
    #[serde(rename = "soir")]
    Evening,
    /// The day after.
    #[serde(rename = "lendemain")]
    NextDay,
    /// Either.
    #[serde(rename = "les-deux")]
    Either,
}

impl DeparturePreference {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Evening => "Le soir",
            Self::NextDay => "Le lendemain",
            Self::Either => "Les deux",
        }
    }
}

/// Hotel preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    /// A landmark the hotel should be close to.
    #[serde(rename = "proche")]
    pub near: String,
}

/// Equipment the traveler needs for the trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Needs {
    /// A local SIM card.
    #[serde(rename = "carteSIM")]
    pub sim_card: bool,
    /// A travel laptop.
    #[serde(rename = "ordinateurVoyage")]
    pub travel_laptop: bool,
}

/// A comment on a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier within the request.
    pub id: String,
    /// Who wrote it.
    pub author: String,
    /// What they wrote.
    pub text: NonEmptyString,
    /// When it was written.
    pub date: DateTime<Utc>,
}

/// A wall-clock time with minute precision, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    const FORMAT: &'static str = "%H:%M";

    /// Creates a time from hours and minutes.
    ///
    /// Returns `None` if either component is out of range.
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// The underlying time.
    #[must_use]
    pub const fn time(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for ClockTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), Self::FORMAT).map(Self)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Optional times accept `null` or `""` for "not set".
mod optional_time {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ClockTime;

    #[allow(clippy::ref_option, reason = "signature required by `serde(with)`")]
    pub fn serialize<S: Serializer>(
        value: &Option<ClockTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ClockTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use test_case::test_case;

    use super::*;

    #[test]
    fn blank_request_is_an_empty_draft() {
        let request = TravelRequest::blank("42");
        assert_eq!(request.id, "42");
        assert_eq!(request.purpose, Purpose::TradeShow);
        assert_eq!(request.status, RequestStatus::Draft);
        assert_eq!(request.arrival.preference, ArrivalPreference::Morning);
        assert_eq!(request.departure.preference, DeparturePreference::Evening);
        assert!(request.dates.from.is_none());
        assert!(request.comments.is_empty());
    }

    #[test]
    fn serializes_with_form_field_names() {
        let mut request = TravelRequest::blank("1");
        request.arrival.precise_time = ClockTime::from_hm(8, 30);
        request.needs.sim_card = true;

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["arrival"]["preciseTime"], "08:30");
        assert_eq!(json["arrival"]["preference"], "matin");
        assert_eq!(json["needs"]["carteSIM"], true);
        assert_eq!(json["needs"]["ordinateurVoyage"], false);
        assert_eq!(json["location"]["ville"], "");
        assert_eq!(json["dates"]["du"], serde_json::Value::Null);
        assert_eq!(json["purpose"], "salon");
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn blank_time_strings_deserialize_as_unset() {
        let json = serde_json::json!({
            "date": "2024-03-15",
            "time": "",
            "preference": "veille-soir",
            "preciseTime": "07:45"
        });
        let leg: Leg<ArrivalPreference> = serde_json::from_value(json).unwrap();
        assert_eq!(leg.time, None);
        assert_eq!(leg.precise_time, ClockTime::from_hm(7, 45));
        assert_eq!(leg.preference, ArrivalPreference::EveningBefore);
    }

    #[test]
    fn malformed_time_is_rejected() {
        let json = serde_json::json!({
            "date": null,
            "time": "quarter past nine",
            "preference": "soir",
            "preciseTime": null
        });
        assert!(serde_json::from_value::<Leg<DeparturePreference>>(json).is_err());
    }

    #[test]
    fn comments_are_appended_in_order() {
        let mut request = TravelRequest::blank("1");
        let first = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 2, 11, 9, 0, 0).unwrap();

        request
            .add_comment("Intermédiaire", "Hôtel réservé", first)
            .unwrap();
        let comment = request.add_comment("Vous", "  Parfait, merci !  ", second).unwrap();
        assert_eq!(comment.text.as_str(), "Parfait, merci !");

        let texts: Vec<_> = request.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["Hôtel réservé", "Parfait, merci !"]);
        assert_ne!(request.comments[0].id, request.comments[1].id);
    }

    #[test]
    fn add_comment_returns_the_stored_comment() {
        let mut request = TravelRequest::blank("1");
        let at = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        request.add_comment("Vous", "Premier", at).unwrap();

        let returned = request.add_comment("Intermédiaire", "Second", at).unwrap().clone();

        assert_eq!(request.comments.last(), Some(&returned));
        assert_eq!(returned.author, "Intermédiaire");
        assert_eq!(returned.date, at);
    }

    #[test]
    fn blank_comment_is_rejected() {
        let mut request = TravelRequest::blank("1");
        assert_eq!(
            request.add_comment("Vous", "   ", Utc::now()).unwrap_err(),
            EmptyCommentError
        );
        assert!(request.comments.is_empty());
    }

    #[test_case("draft", RequestStatus::Draft)]
    #[test_case("sent", RequestStatus::Sent)]
    #[test_case("validated", RequestStatus::Validated)]
    fn status_parses_wire_names(input: &str, expected: RequestStatus) {
        assert_eq!(input.parse::<RequestStatus>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        assert!("archived".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn date_range_order() {
        let early = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        assert!(DateRange::between(early, late).is_ordered());
        assert!(!DateRange::between(late, early).is_ordered());
        assert!(DateRange::default().is_ordered());
    }

    #[test]
    fn location_display_skips_missing_parts() {
        let mut location = Location {
            district: String::new(),
            city: "Berlin".to_string(),
            country: String::new(),
        };
        assert_eq!(location.to_string(), "Berlin");
        location.country = "Allemagne".to_string();
        assert_eq!(location.to_string(), "Berlin, Allemagne");
    }
}
