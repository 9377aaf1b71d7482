//! Dynamic field values
//!
//! Validators receive whatever value a form field currently holds. A field may
//! be a string, a number, a list of uploaded documents, or nothing at all, so
//! validators take a [`Value`] and skip any check that does not apply to the
//! variant they are given.

use crate::records::{DocumentRecord, SpecializationEntry};

/// Value of a single onboarding field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or explicitly cleared
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    /// Generic list of values
    List(Vec<Value>),
    Documents(Vec<DocumentRecord>),
    Specializations(Vec<SpecializationEntry>),
}

impl Value {
    /// Whether the value counts as "not provided".
    ///
    /// Null, `false`, zero, NaN and strings that are empty after trimming are
    /// falsy. Lists are never falsy, even when empty; cardinality is checked
    /// separately.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Integer(i) => *i == 0,
            Value::Decimal(d) => *d == 0.0 || d.is_nan(),
            Value::String(s) => s.trim().is_empty(),
            Value::List(_) | Value::Documents(_) | Value::Specializations(_) => false,
        }
    }

    /// Whether the value is null or a blank string.
    ///
    /// Blank values are validated immediately rather than debounced.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Borrow the string payload
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload, for integer and decimal values
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Number of elements, for any list-like value
    #[must_use]
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::Documents(docs) => Some(docs.len()),
            Value::Specializations(specs) => Some(specs.len()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_documents(&self) -> Option<&[DocumentRecord]> {
        match self {
            Value::Documents(docs) => Some(docs),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_specializations(&self) -> Option<&[SpecializationEntry]> {
        match self {
            Value::Specializations(specs) => Some(specs),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Decimal(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<DocumentRecord>> for Value {
    fn from(docs: Vec<DocumentRecord>) -> Self {
        Value::Documents(docs)
    }
}

impl From<Vec<SpecializationEntry>> for Value {
    fn from(specs: Vec<SpecializationEntry>) -> Self {
        Value::Specializations(specs)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
