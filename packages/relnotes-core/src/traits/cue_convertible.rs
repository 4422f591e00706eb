use chrono::NaiveDate;

use crate::types::{
    errors::{Error, Result},
    ChangeType, CommitSha, Fields, Value,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait CueConvertible {
    /// Converts a `Value` into the expected type.
    fn from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Converts the type back into a `Value`.
    fn into_value(self) -> Value;
}

pub(crate) fn mismatch(expected: &str, got: &Value) -> Error {
    Error::Decode {
        path: String::new(),
        msg: format!("expected {expected}, got {} {got}", got.kind()),
    }
}

impl CueConvertible for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }

    fn into_value(self) -> Value {
        self
    }
}

impl CueConvertible for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("a string", &other)),
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl CueConvertible for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("a bool", &other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl CueConvertible for u64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => u64::try_from(i).map_err(|_| Error::Decode {
                path: String::new(),
                msg: format!("expected a non-negative int, got {i}"),
            }),
            other => Err(mismatch("an int", &other)),
        }
    }

    fn into_value(self) -> Value {
        // Counts and PR numbers never get near i64::MAX.
        Value::Int(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl<T: CueConvertible> CueConvertible for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| T::from_value(item).map_err(|e| e.under(&format!("[{idx}]"))))
                .collect(),
            other => Err(mismatch("a list", &other)),
        }
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(CueConvertible::into_value).collect())
    }
}

/// `null` decodes to `None`.
impl<T: CueConvertible> CueConvertible for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn into_value(self) -> Value {
        self.map_or(Value::Null, CueConvertible::into_value)
    }
}

impl CueConvertible for ChangeType {
    fn from_value(value: Value) -> Result<Self> {
        String::from_value(value)?.parse()
    }

    fn into_value(self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

impl CueConvertible for CommitSha {
    fn from_value(value: Value) -> Result<Self> {
        String::from_value(value)?.parse()
    }

    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl CueConvertible for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        let s = String::from_value(value)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| Error::Decode {
            path: String::new(),
            msg: format!("`{s}` is not a YYYY-MM-DD date: {e}"),
        })
    }

    fn into_value(self) -> Value {
        Value::String(self.format(DATE_FORMAT).to_string())
    }
}

/// Pulls typed fields out of a struct value and rejects labels nobody asked for.
pub struct FieldReader {
    fields: Fields,
}

impl FieldReader {
    pub fn new(value: Value) -> Result<Self> {
        match value {
            Value::Struct(fields) => Ok(Self { fields }),
            other => Err(mismatch("a struct", &other)),
        }
    }

    pub fn required<T: CueConvertible>(&mut self, label: &str) -> Result<T> {
        let value = self.fields.take(label).ok_or_else(|| Error::Decode {
            path: label.to_string(),
            msg: "missing required field".to_string(),
        })?;

        T::from_value(value).map_err(|e| e.under(label))
    }

    pub fn optional<T: CueConvertible>(&mut self, label: &str) -> Result<Option<T>> {
        self.fields
            .take(label)
            .map(|value| T::from_value(value).map_err(|e| e.under(label)))
            .transpose()
    }

    pub fn or_default<T: CueConvertible + Default>(&mut self, label: &str) -> Result<T> {
        Ok(self.optional(label)?.unwrap_or_default())
    }

    pub fn finish(self) -> Result<()> {
        match self.fields.labels().next() {
            None => Ok(()),
            Some(label) => Err(Error::Decode {
                path: label.to_string(),
                msg: "unknown field".to_string(),
            }),
        }
    }
}
