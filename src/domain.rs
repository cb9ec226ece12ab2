//! Domain models for travel request management.
//!
//! This module contains the request and batch models, the path-addressed
//! record used by the request form, and the pure views derived from batches
//! (request projection, calendar grid, dashboard statistics).

/// Travel request model.
pub mod request;
pub use request::{Comment, Purpose, RequestStatus, TravelRequest};

/// Travel batches, travelers, and the participants and equipment of each request.
pub mod batch;
pub use batch::{
    AssetKind, AssetStatus, BatchStatus, DigitalAsset, Participant, ParticipantStatus,
    TravelBatch, Traveler,
};

/// Immutable, structurally shared records.
pub mod record;
pub use record::{Record, RecordError, Value};

/// Dot-delimited field paths and the copy-on-write updater.
pub mod path;
pub use path::{FieldPath, InvalidPathError};

/// Projection of travel batches into request-shaped rows.
pub mod projection;
pub use projection::ProjectionPolicy;

/// Calendar grid bucketing.
pub mod calendar;

/// The request form reducer.
pub mod form;
pub use form::{FormError, RequestForm};

/// The caller-held collection of requests.
pub mod book;
pub use book::{BookError, Notice, Notifier, RequestBook};

/// Dashboard statistics.
pub mod stats;
pub use stats::DashboardStats;

mod config;
pub use config::Config;
