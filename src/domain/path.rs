//! Dot-delimited field paths and the copy-on-write updater.
//!
//! A [`FieldPath`] such as `arrival.preciseTime` addresses a field reachable
//! by repeated field access from a root [`Record`]. [`update`] replaces that
//! one field and rebuilds only the records on the way down; everything off
//! the path is shared with the input.

use std::{fmt, str::FromStr};

use nonempty::NonEmpty;
use non_empty_string::NonEmptyString;

use crate::domain::{Record, Value};

/// A validated, non-empty sequence of non-empty field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(NonEmpty<NonEmptyString>);

impl FieldPath {
    /// The field names, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(NonEmptyString::as_str)
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a path has at least one segment.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The first `depth` segments joined with `.`.
    fn prefix(&self, depth: usize) -> String {
        self.segments().take(depth).collect::<Vec<_>>().join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix(self.len()))
    }
}

impl FromStr for FieldPath {
    type Err = InvalidPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InvalidPathError::Empty);
        }

        let segments = s
            .split('.')
            .map(|segment| {
                NonEmptyString::new(segment.to_string()).map_err(|_| InvalidPathError::EmptySegment {
                    path: s.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        NonEmpty::from_vec(segments)
            .map(Self)
            .ok_or(InvalidPathError::Empty)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = InvalidPathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Errors raised when a path does not address a field of the record.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InvalidPathError {
    /// The path is the empty string.
    #[error("path is empty")]
    Empty,

    /// The path has an empty segment (`a..b`, `.a`, `a.`).
    #[error("path '{path}' contains an empty segment")]
    EmptySegment {
        /// The offending path.
        path: String,
    },

    /// A segment names a field that does not exist.
    #[error("no field '{missing}' in path '{path}'")]
    Missing {
        /// The full path.
        path: String,
        /// The prefix of the path up to and including the missing field.
        missing: String,
    },

    /// A segment other than the last resolves to something that is not a
    /// record, so it cannot be descended into.
    #[error("'{at}' in path '{path}' is a {found}, not a record")]
    NotARecord {
        /// The full path.
        path: String,
        /// The prefix of the path that resolved to a non-record.
        at: String,
        /// What was found there.
        found: &'static str,
    },
}

/// Returns a copy of `root` with the field at `path` replaced by `value`.
///
/// Each record on the path is rebuilt with the next field replaced; every
/// other field, at every level, is shared with `root`. `root` itself is not
/// modified.
///
/// The addressed field must already exist: the updater replaces fields, it
/// does not add them.
///
/// # Errors
///
/// Returns [`InvalidPathError`] if the path is malformed, if any segment
/// names a missing field, or if an intermediate segment is not a record.
pub fn update(root: &Record, path: &str, value: Value) -> Result<Record, InvalidPathError> {
    let path: FieldPath = path.parse()?;
    update_at(root, &path, value)
}

/// Same as [`update`], for an already parsed path.
///
/// # Errors
///
/// See [`update`].
pub fn update_at(root: &Record, path: &FieldPath, value: Value) -> Result<Record, InvalidPathError> {
    let segments: Vec<&str> = path.segments().collect();
    let updated = rebuild(root, &segments, path, 1, value)?;
    tracing::trace!(%path, "updated record field");
    Ok(updated)
}

/// Looks up the value at `path`.
///
/// # Errors
///
/// Same conditions as [`update`].
pub fn get<'a>(root: &'a Record, path: &FieldPath) -> Result<&'a Value, InvalidPathError> {
    let segments: Vec<&str> = path.segments().collect();
    let Some((&leaf, parents)) = segments.split_last() else {
        return Err(InvalidPathError::Empty);
    };

    let mut record = root;
    for (index, &segment) in parents.iter().enumerate() {
        let field = lookup(record, segment, path, index + 1)?;
        record = descend(field, path, index + 1)?;
    }
    lookup(record, leaf, path, segments.len())
}

fn rebuild(
    record: &Record,
    segments: &[&str],
    path: &FieldPath,
    depth: usize,
    value: Value,
) -> Result<Record, InvalidPathError> {
    let Some((&head, rest)) = segments.split_first() else {
        return Err(InvalidPathError::Empty);
    };

    let current = lookup(record, head, path, depth)?;

    let replacement = if rest.is_empty() {
        value
    } else {
        let child = descend(current, path, depth)?;
        Value::Record(rebuild(child, rest, path, depth + 1, value)?)
    };

    Ok(record.with_field(head, replacement))
}

fn lookup<'a>(
    record: &'a Record,
    name: &str,
    path: &FieldPath,
    depth: usize,
) -> Result<&'a Value, InvalidPathError> {
    record.get(name).ok_or_else(|| InvalidPathError::Missing {
        path: path.to_string(),
        missing: path.prefix(depth),
    })
}

fn descend<'a>(
    field: &'a Value,
    path: &FieldPath,
    depth: usize,
) -> Result<&'a Record, InvalidPathError> {
    field.as_record().ok_or_else(|| InvalidPathError::NotARecord {
        path: path.to_string(),
        at: path.prefix(depth),
        found: field.kind(),
    })
}
