//! Projection of travel batches into request-shaped rows.
//!
//! The table and card views only know how to display [`TravelRequest`]s.
//! Batches carry less detail than a request, so the projection derives what
//! it can (purpose, location, dates, status) and takes the rest from an
//! explicit [`ProjectionPolicy`].

use serde::{Deserialize, Serialize};

use crate::domain::{
    request::{
        ArrivalPreference, ClockTime, DateRange, DeparturePreference, Hotel, Leg, Location, Needs,
    },
    Purpose, TravelBatch, TravelRequest,
};

/// Values a projected request gets for fields a batch has no data for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPolicy {
    /// Equipment needs.
    pub needs: Needs,
    /// Time of the engagement on arrival day.
    pub arrival_time: Option<ClockTime>,
    /// Preferred arrival.
    pub arrival_preference: ArrivalPreference,
    /// Exact arrival time.
    pub arrival_precise_time: Option<ClockTime>,
    /// Time of the last engagement on departure day.
    pub departure_time: Option<ClockTime>,
    /// Preferred departure.
    pub departure_preference: DeparturePreference,
    /// Exact departure time.
    pub departure_precise_time: Option<ClockTime>,
    /// Landmark the hotel should be close to.
    pub hotel_near: String,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            needs: Needs::default(),
            arrival_time: ClockTime::from_hm(9, 0),
            arrival_preference: ArrivalPreference::Morning,
            arrival_precise_time: ClockTime::from_hm(8, 30),
            departure_time: ClockTime::from_hm(17, 0),
            departure_preference: DeparturePreference::Evening,
            departure_precise_time: ClockTime::from_hm(18, 0),
            hotel_near: "Centre-ville".to_string(),
        }
    }
}

/// Projects batches into requests, preserving order.
#[must_use]
pub fn project(batches: &[TravelBatch], policy: &ProjectionPolicy) -> Vec<TravelRequest> {
    let requests: Vec<_> = batches
        .iter()
        .map(|batch| project_batch(batch, policy))
        .collect();
    tracing::debug!(count = requests.len(), "projected batches into requests");
    requests
}

/// Projects a single batch into a request.
///
/// The request keeps the batch's id, has no comments, and takes its needs,
/// times and hotel from `policy`.
#[must_use]
pub fn project_batch(batch: &TravelBatch, policy: &ProjectionPolicy) -> TravelRequest {
    TravelRequest {
        id: batch.id.clone(),
        purpose: classify_purpose(&batch.name),
        location: split_destination(&batch.destination),
        dates: DateRange::between(batch.start_date, batch.end_date),
        arrival: Leg {
            date: Some(batch.start_date),
            time: policy.arrival_time,
            preference: policy.arrival_preference,
            precise_time: policy.arrival_precise_time,
        },
        departure: Leg {
            date: Some(batch.end_date),
            time: policy.departure_time,
            preference: policy.departure_preference,
            precise_time: policy.departure_precise_time,
        },
        hotel: Hotel {
            near: policy.hotel_near.clone(),
        },
        needs: policy.needs,
        status: batch.status.request_status(),
        comments: Vec::new(),
    }
}

/// Guesses the purpose of a trip from its name.
///
/// Matching is case-insensitive. "salon" is checked before "visite", so a
/// name containing both is a trade show.
#[must_use]
pub fn classify_purpose(name: &str) -> Purpose {
    let name = name.to_lowercase();
    if name.contains("salon") {
        Purpose::TradeShow
    } else if name.contains("visite") {
        Purpose::ClientVisit
    } else {
        Purpose::Other
    }
}

/// Splits a "City, Country" destination on its first comma.
///
/// Without a comma the whole string is the city and the country is empty.
/// The district is never known at this granularity.
#[must_use]
pub fn split_destination(destination: &str) -> Location {
    let (city, country) = destination
        .split_once(',')
        .unwrap_or((destination, ""));
    Location {
        district: String::new(),
        city: city.trim().to_string(),
        country: country.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use test_case::test_case;

    use super::*;
    use crate::domain::{BatchStatus, RequestStatus};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn batch(id: &str, name: &str, destination: &str, status: BatchStatus) -> TravelBatch {
        TravelBatch {
            id: id.to_string(),
            name: name.to_string(),
            destination: destination.to_string(),
            travelers: BTreeSet::new(),
            start_date: day(3, 22),
            end_date: day(3, 24),
            status,
            budget: 3200,
        }
    }

    #[test]
    fn empty_input_projects_to_nothing() {
        assert!(project(&[], &ProjectionPolicy::default()).is_empty());
    }

    #[test_case("Salon Tech Paris 2024", Purpose::TradeShow)]
    #[test_case("SALON de l'auto", Purpose::TradeShow; "uppercase")]
    #[test_case("Visite Client London", Purpose::ClientVisit)]
    #[test_case("Salon puis visite", Purpose::TradeShow; "salon wins over visite")]
    #[test_case("Conférence Berlin", Purpose::Other; "unrelated name")]
    #[test_case("", Purpose::Other; "empty name")]
    fn purpose_classification(name: &str, expected: Purpose) {
        assert_eq!(classify_purpose(name), expected);
    }

    #[test_case("Paris, France", "Paris", "France")]
    #[test_case("  Londres ,UK ", "Londres", "UK"; "untrimmed")]
    #[test_case("Berlin", "Berlin", ""; "no comma")]
    #[test_case("Washington, D.C., USA", "Washington", "D.C., USA"; "splits on first comma")]
    #[test_case("", "", ""; "empty")]
    fn destination_split(destination: &str, city: &str, country: &str) {
        let location = split_destination(destination);
        assert_eq!(location.district, "");
        assert_eq!(location.city, city);
        assert_eq!(location.country, country);
    }

    #[test]
    fn salon_batch_projection() {
        let batch = batch("1", "Salon Tech Paris 2024", "Paris, France", BatchStatus::Confirmed);
        let request = project_batch(&batch, &ProjectionPolicy::default());

        assert_eq!(request.id, "1");
        assert_eq!(request.purpose, Purpose::TradeShow);
        assert_eq!(request.location.city, "Paris");
        assert_eq!(request.location.country, "France");
        assert_eq!(request.location.district, "");
        assert_eq!(request.status, RequestStatus::Sent);
    }

    #[test]
    fn client_visit_scenario() {
        let batches = [batch(
            "2",
            "Visite Client London",
            "Londres, UK",
            BatchStatus::Planning,
        )];
        let requests = project(&batches, &ProjectionPolicy::default());

        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.purpose, Purpose::ClientVisit);
        assert_eq!(
            request.location,
            Location {
                district: String::new(),
                city: "Londres".to_string(),
                country: "UK".to_string(),
            }
        );
        assert_eq!(request.status, RequestStatus::Draft);
        assert_eq!(request.dates, DateRange::between(day(3, 22), day(3, 24)));
        assert_eq!(request.arrival.date, Some(day(3, 22)));
        assert_eq!(request.departure.date, Some(day(3, 24)));
        assert!(request.comments.is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let batches = [
            batch("b", "Conférence", "Berlin", BatchStatus::InProgress),
            batch("a", "Salon", "Paris", BatchStatus::Completed),
        ];
        let ids: Vec<_> = project(&batches, &ProjectionPolicy::default())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn needs_come_from_the_policy() {
        let batch = batch("1", "Salon", "Paris, France", BatchStatus::Planning);

        let default = project_batch(&batch, &ProjectionPolicy::default());
        assert_eq!(default.needs, Needs::default());

        let policy = ProjectionPolicy {
            needs: Needs {
                sim_card: true,
                travel_laptop: false,
            },
            ..ProjectionPolicy::default()
        };
        let first = project_batch(&batch, &policy);
        let second = project_batch(&batch, &policy);
        assert!(first.needs.sim_card);
        assert!(!first.needs.travel_laptop);
        assert_eq!(first, second);
    }

    #[test]
    fn default_leg_details() {
        let batch = batch("1", "Salon", "Paris, France", BatchStatus::Planning);
        let request = project_batch(&batch, &ProjectionPolicy::default());

        assert_eq!(request.arrival.time, ClockTime::from_hm(9, 0));
        assert_eq!(request.arrival.precise_time, ClockTime::from_hm(8, 30));
        assert_eq!(request.arrival.preference, ArrivalPreference::Morning);
        assert_eq!(request.departure.time, ClockTime::from_hm(17, 0));
        assert_eq!(request.departure.precise_time, ClockTime::from_hm(18, 0));
        assert_eq!(request.departure.preference, DeparturePreference::Evening);
        assert_eq!(request.hotel.near, "Centre-ville");
    }
}
