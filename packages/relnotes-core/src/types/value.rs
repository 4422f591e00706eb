use std::fmt;

/// A decoded CUE value.
///
/// Only concrete values are represented: the release files never rely on
/// references, disjunctions or constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Struct(Fields),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Struct(_) => "struct",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Struct(_))
    }

    pub fn as_struct(&self) -> Option<&Fields> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => write!(f, "list of {} elements", items.len()),
            Value::Struct(fields) => write!(f, "struct with {} fields", fields.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Struct(fields)
    }
}

/// Struct fields in declaration order. Labels are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut Value> {
        self.0.iter_mut().find(|(l, _)| l == label).map(|(_, v)| v)
    }

    /// Sets `label` to `value`, replacing an existing field in place.
    pub fn insert(&mut self, label: impl Into<String>, value: Value) {
        let label = label.into();
        match self.get_mut(&label) {
            Some(existing) => *existing = value,
            None => self.0.push((label, value)),
        }
    }

    /// Builder flavour of [`Fields::insert`].
    pub fn with(mut self, label: impl Into<String>, value: Value) -> Self {
        self.insert(label, value);
        self
    }

    pub fn take(&mut self, label: &str) -> Option<Value> {
        let idx = self.0.iter().position(|(l, _)| l == label)?;
        Some(self.0.remove(idx).1)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v))
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut fields = Fields::new();
        for (label, value) in iter {
            fields.insert(label, value);
        }
        fields
    }
}
