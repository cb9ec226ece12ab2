//! Calendar grid bucketing.
//!
//! The calendar view shows a few consecutive weeks, Monday first, with every
//! trip listed in each day cell it covers.

use chrono::{Datelike, Days, NaiveDate};

/// Something that occupies an inclusive range of days.
pub trait Scheduled {
    /// Unique identifier.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// First day.
    fn start_date(&self) -> NaiveDate;

    /// Last day.
    fn end_date(&self) -> NaiveDate;

    /// Whether the range covers `day`, bounds inclusive.
    ///
    /// A range whose end precedes its start covers nothing.
    fn occupies(&self, day: NaiveDate) -> bool {
        self.start_date() <= day && day <= self.end_date()
    }
}

/// One cell of the calendar grid.
#[derive(Debug)]
pub struct Day<'a, T> {
    /// The calendar date.
    pub date: NaiveDate,
    /// Everything scheduled on this day, in input order.
    pub batches: Vec<&'a T>,
    /// Whether this is the reference day.
    pub is_today: bool,
}

/// Seven consecutive days, Monday first.
#[derive(Debug)]
pub struct Week<'a, T> {
    monday: NaiveDate,
    days: Vec<Day<'a, T>>,
}

impl<'a, T> Week<'a, T> {
    /// The days of the week, Monday first. Always seven.
    #[must_use]
    pub fn days(&self) -> &[Day<'a, T>] {
        &self.days
    }

    /// The Monday the week starts on.
    #[must_use]
    pub const fn monday(&self) -> NaiveDate {
        self.monday
    }
}

/// The Monday on or before `date`.
///
/// `None` when that Monday falls before [`NaiveDate::MIN`].
#[must_use]
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(
        date.weekday().num_days_from_monday(),
    )))
}

/// Buckets `batches` into a grid of `week_count` weeks.
///
/// The grid starts on the Monday on or before `reference`, and the day equal
/// to `reference` is flagged as today. A batch appears in every day its
/// inclusive range covers; a batch with reversed dates appears nowhere.
///
/// Only whole weeks are emitted. Near the ends of the representable date
/// range the grid stops at the last week whose seven days all exist, so it
/// may hold fewer than `week_count` weeks (or none).
#[must_use]
pub fn build_weeks<T: Scheduled>(
    reference: NaiveDate,
    batches: &[T],
    week_count: usize,
) -> Vec<Week<'_, T>> {
    let Some(start) = week_start(reference) else {
        tracing::debug!(%reference, "no representable week start");
        return Vec::new();
    };

    let mut weeks = Vec::new();
    for index in 0..week_count {
        let Some(monday) = week_at(start, index) else {
            tracing::debug!(%start, index, "calendar grid cut at the last whole week");
            break;
        };
        weeks.push(fill_week(monday, reference, batches));
    }
    tracing::debug!(%start, weeks = weeks.len(), "built calendar grid");
    weeks
}

/// The Monday `index` weeks after `start`, if its Sunday is representable.
fn week_at(start: NaiveDate, index: usize) -> Option<NaiveDate> {
    let offset = u64::try_from(index).ok()?.checked_mul(7)?;
    let monday = start.checked_add_days(Days::new(offset))?;
    monday.checked_add_days(Days::new(6))?;
    Some(monday)
}

fn fill_week<'a, T: Scheduled>(
    monday: NaiveDate,
    reference: NaiveDate,
    batches: &'a [T],
) -> Week<'a, T> {
    let days = (0..7)
        .filter_map(|offset| monday.checked_add_days(Days::new(offset)))
        .map(|date| Day {
            date,
            batches: batches.iter().filter(|b| b.occupies(date)).collect(),
            is_today: date == reference,
        })
        .collect();
    Week { monday, days }
}
