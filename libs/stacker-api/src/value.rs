use crate::sparse::SparseRow;

/// One record, or one field of a record.
///
/// Strategy by variant:
/// - Scalars (`Null`, `Bool`, `Int64`, `Float64`, `String`): leaves of a dense block
/// - `Array`, `Tuple`: nested axes in a dense block; a top-level `Tuple` is blocked field-wise
/// - `Map`: one row of a table block, keys in insertion order
/// - `Sparse`: one row of a stacked sparse block
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),

    Array(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Vec<(String, Value)>),

    Sparse(SparseRow),
}

impl Value {
    /// Variant name, for error messages and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Sparse(_) => "sparse",
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Value::Sparse(_))
    }

    /// Numeric view. Booleans count as 0/1, like in most array libraries.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build a map record from `(key, value)` pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<SparseRow> for Value {
    fn from(v: SparseRow) -> Self {
        Value::Sparse(v)
    }
}

/// Native JSON mapping: objects become maps (key order preserved),
/// arrays become arrays, integral numbers that fit `i64` become `Int64`.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int64(i),
                None => Value::Float64(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
