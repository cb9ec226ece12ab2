//! The request form reducer.
//!
//! A [`RequestForm`] pairs a [`TravelRequest`] with its [`Record`]
//! representation. Edits address fields by their wire path
//! (`location.ville`, `arrival.preciseTime`, ...) and go through the
//! copy-on-write [`update`](crate::domain::path::update); the result is then
//! read back into the typed model, so an edit that would produce an invalid
//! request is rejected and leaves the form as it was.

use crate::domain::{
    path::{self, FieldPath, InvalidPathError},
    Record, RecordError, TravelRequest, Value,
};

/// An immutable snapshot of the request form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestForm {
    record: Record,
    request: TravelRequest,
}

impl RequestForm {
    /// Opens the form on an existing request.
    ///
    /// # Errors
    ///
    /// Fails only if the request cannot be represented as a record.
    pub fn new(request: TravelRequest) -> Result<Self, FormError> {
        let record = Record::from_serialize(&request)?;
        Ok(Self { record, request })
    }

    /// Opens a blank form.
    ///
    /// # Errors
    ///
    /// See [`RequestForm::new`].
    pub fn blank(id: impl Into<String>) -> Result<Self, FormError> {
        Self::new(TravelRequest::blank(id))
    }

    /// Returns the form with the field at `path` set to `value`.
    ///
    /// `self` is unchanged whether or not the edit succeeds. Fields not on
    /// the path share storage with `self`.
    ///
    /// # Errors
    ///
    /// - [`FormError::Path`] if `path` does not address a field of the form.
    /// - [`FormError::Rejected`] if the edited form is not a valid request
    ///   (wrong value type, unknown enum value, malformed date or time).
    /// - [`FormError::DatesOutOfOrder`] if the edit puts the end of the
    ///   travel period before its start.
    pub fn with(&self, path: &str, value: Value) -> Result<Self, FormError> {
        let path: FieldPath = path.parse()?;
        let record = path::update_at(&self.record, &path, value)?;
        let request: TravelRequest =
            record
                .deserialize_into()
                .map_err(|source| FormError::Rejected {
                    path: path.to_string(),
                    source,
                })?;

        if !request.dates.is_ordered() {
            return Err(FormError::DatesOutOfOrder);
        }

        tracing::debug!(%path, id = %request.id, "form field updated");
        Ok(Self { record, request })
    }

    /// Reads the field at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Path`] if `path` does not address a field.
    pub fn get(&self, path: &str) -> Result<&Value, FormError> {
        let path: FieldPath = path.parse()?;
        Ok(path::get(&self.record, &path)?)
    }

    /// The typed request.
    #[must_use]
    pub const fn request(&self) -> &TravelRequest {
        &self.request
    }

    /// The record representation.
    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Consumes the form, returning the typed request.
    #[must_use]
    pub fn into_request(self) -> TravelRequest {
        self.request
    }
}

/// Errors editing a [`RequestForm`].
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The path does not address a field of the form.
    #[error(transparent)]
    Path(#[from] InvalidPathError),

    /// The edit produced something that is not a valid request.
    #[error("invalid value for '{path}': {source}")]
    Rejected {
        /// The edited path.
        path: String,
        /// Why the edited form could not be read back.
        source: RecordError,
    },

    /// The travel period ends before it starts.
    #[error("the travel period ends before it starts")]
    DatesOutOfOrder,

    /// The request could not be turned into a record.
    #[error(transparent)]
    Record(#[from] RecordError),
}
