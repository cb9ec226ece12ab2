//! Immutable, structurally shared records.
//!
//! A [`Record`] is a reference-counted map from field names to [`Value`]s.
//! Cloning a record is a pointer copy, and an updated record shares every
//! untouched field with the record it was derived from, so observers can
//! detect unchanged subtrees with [`Record::ptr_eq`] instead of comparing
//! them field by field.
//!
//! Any [`Serialize`] type converts into a record, and a record deserializes
//! back into any [`DeserializeOwned`] type. This is the bridge between the
//! typed request model and path-addressed edits.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{
    de::DeserializeOwned,
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// A field value inside a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(serde_json::Number),
    /// A string.
    Text(String),
    /// An ordered sequence of values, shared between clones.
    List(Arc<[Value]>),
    /// A nested record.
    Record(Record),
}

impl Value {
    /// Interprets a user-supplied literal.
    ///
    /// JSON literals (`true`, `null`, `42`, `"quoted"`, `{"a": 1}`) are parsed
    /// as such; anything else is taken verbatim as text. This lets
    /// `09:30` or `Paris` be typed without quoting.
    #[must_use]
    pub fn parse_literal(input: &str) -> Self {
        serde_json::from_str::<serde_json::Value>(input)
            .map_or_else(|_| Self::Text(input.to_string()), Self::from)
    }

    /// Returns the nested record, if this value is one.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// A short name for the kind of value, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(fields) => Self::Record(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Record(record) => record.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => match serde_json::to_string(other) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

/// An immutable map of named fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(Arc<BTreeMap<String, Value>>);

impl Record {
    /// An empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a serializable value into a record.
    ///
    /// # Errors
    ///
    /// Fails if the value cannot be serialized, or if it does not serialize
    /// to a map (e.g. a bare string or number).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RecordError> {
        match Value::from(serde_json::to_value(value)?) {
            Value::Record(record) => Ok(record),
            other => Err(RecordError::NotARecord(other.kind())),
        }
    }

    /// Deserializes the record into a typed value.
    ///
    /// # Errors
    ///
    /// Fails if the record's shape does not match `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        let json = serde_json::to_value(self)?;
        Ok(serde_json::from_value(json)?)
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Iterates over fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new record with one field set to `value`.
    ///
    /// The new record shares every other field with `self`; `self` is left
    /// untouched.
    #[must_use]
    pub fn with_field(&self, name: impl Into<String>, value: Value) -> Self {
        let mut fields = BTreeMap::clone(&self.0);
        fields.insert(name.into(), value);
        Self(Arc::new(fields))
    }

    /// Whether both records are the same allocation.
    ///
    /// Records that are `ptr_eq` are always equal; the converse does not
    /// hold.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Record(record) => Ok(record),
            other => Err(serde::de::Error::custom(format!(
                "expected a record, found {}",
                other.kind()
            ))),
        }
    }
}

/// Errors converting between records and typed values.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The value serialized to something other than a map.
    #[error("expected a record, found {0}")]
    NotARecord(&'static str),

    /// Serialization or deserialization failed.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
