//! Cell value model shared by all loaded tables.
//!
//! # Responsibility
//! - Mirror SQLite storage classes without losing type information.
//! - Stay serializable so tables can be written to snapshots.

use rusqlite::types::ValueRef;
use serde::{Deserialize, Serialize};

/// Single table cell.
///
/// Serialized untagged, so a snapshot cell reads as plain JSON
/// (`null`, `42`, `1.5`, `"text"`, `[1, 2]`). JSON has no non-finite
/// numbers, so those reals are written as `{"real": "inf"}`,
/// `{"real": "-inf"}` or `{"real": "nan"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(#[serde(with = "real_cell")] f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns the integer payload, if this cell holds one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload, if this cell holds one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short storage-class name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(v) => Self::Integer(v),
            ValueRef::Real(v) => Self::Real(v),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

mod real_cell {
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    const TAG: &str = "real";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RealRepr {
        Number(f64),
        NonFinite(NonFinite),
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct NonFinite {
        real: String,
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            return serializer.serialize_f64(*value);
        }
        let tag = if value.is_nan() {
            "nan"
        } else if value.is_sign_positive() {
            "inf"
        } else {
            "-inf"
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(TAG, tag)?;
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match RealRepr::deserialize(deserializer)? {
            RealRepr::Number(value) => Ok(value),
            RealRepr::NonFinite(NonFinite { real }) => match real.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("unknown non-finite real `{other}`"))),
            },
        }
    }
}
