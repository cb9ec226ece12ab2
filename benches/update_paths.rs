//! This bench test applies a long run of field edits to a request form, each
//! edit producing a new structurally shared record.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use travel_desk::{domain::path, Record, RequestForm, TravelRequest, Value};

const EDITS: [(&str, &str); 6] = [
    ("location.ville", "Lyon"),
    ("location.pays", "France"),
    ("hotel.proche", "Part-Dieu"),
    ("arrival.time", "09:00"),
    ("departure.preciseTime", "18:30"),
    ("purpose", "visite-client"),
];

fn update_record(c: &mut Criterion) {
    let record = Record::from_serialize(&TravelRequest::blank("bench")).unwrap();

    c.bench_function("update record paths", |b| {
        b.iter(|| {
            EDITS.iter().fold(record.clone(), |record, (field, value)| {
                path::update(&record, field, Value::from(*value)).unwrap()
            })
        });
    });
}

fn update_form(c: &mut Criterion) {
    c.bench_function("update form fields", |b| {
        b.iter_batched(
            || RequestForm::blank("bench").unwrap(),
            |form| {
                EDITS.iter().fold(form, |form, (field, value)| {
                    form.with(field, Value::from(*value)).unwrap()
                })
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, update_record, update_form);
criterion_main!(benches);
