//! This bench test projects a large set of travel batches into requests and
//! buckets them into a calendar grid.

#![allow(missing_docs)]

use std::hint::black_box;

use chrono::{Days, NaiveDate};
use criterion::{criterion_group, criterion_main, Criterion};
use travel_desk::{
    domain::{calendar, projection},
    BatchStatus, TravelBatch,
};

/// Generates batches spread over a year, a few days each.
fn preseed_batches(count: u64) -> Vec<TravelBatch> {
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            let start = origin + Days::new(i % 365);
            let name = match i % 3 {
                0 => format!("Salon {i}"),
                1 => format!("Visite client {i}"),
                _ => format!("Conférence {i}"),
            };
            TravelBatch {
                id: i.to_string(),
                name,
                destination: "Paris, France".to_string(),
                travelers: (0..i % 5).map(|n| n.to_string()).collect(),
                start_date: start,
                end_date: start + Days::new(i % 4),
                status: BatchStatus::ALL[usize::try_from(i % 4).unwrap()],
                budget: 1000 + i,
            }
        })
        .collect()
}

fn project_batches(c: &mut Criterion) {
    let batches = preseed_batches(10_000);
    let policy = projection::ProjectionPolicy::default();

    c.bench_function("project batches", |b| {
        b.iter(|| projection::project(black_box(&batches), &policy));
    });
}

fn build_calendar(c: &mut Criterion) {
    let batches = preseed_batches(1_000);
    let reference = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

    c.bench_function("build calendar", |b| {
        b.iter(|| calendar::build_weeks(black_box(reference), &batches, 8).len());
    });
}

criterion_group!(benches, project_batches, build_calendar);
criterion_main!(benches);
