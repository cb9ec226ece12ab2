//! Corporate travel request management
//!
//! Travel requests are edited through an immutable form model, travel batches
//! are projected into request-shaped rows for the table and card views, and
//! batches are bucketed into a multi-week calendar grid.

pub mod domain;
pub use domain::{
    BatchStatus, Config, InvalidPathError, Purpose, Record, RequestBook, RequestForm,
    RequestStatus, TravelBatch, TravelRequest, Traveler, Value,
};

/// Read-only dataset loading and the built-in sample data.
pub mod storage;
pub use storage::Dataset;
