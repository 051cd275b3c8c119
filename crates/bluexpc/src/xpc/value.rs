//! Dynamic values exchanged with the Bluetooth daemon
//!
//! The daemon speaks in untyped objects. `Value` is the closed set of shapes
//! the protocol uses, and `Dict` adds typed accessors with explicit failure
//! modes on top of a string-keyed map.

use crate::error::ValueError;
use crate::uuid::Uuid;
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed protocol value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absent value; a key mapped to `Null` reads as missing
    Null,
    Int64(i64),
    String(String),
    Data(Vec<u8>),
    Uuid(Uuid),
    Array(Vec<Value>),
    Dict(Dict),
}

impl Value {
    /// Short name of the shape, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int64(_) => "int64",
            Value::String(_) => "string",
            Value::Data(_) => "data",
            Value::Uuid(_) => "uuid",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Reads an identifier from either a UUID value or raw data.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(uuid) => Some(*uuid),
            Value::Data(d) => Uuid::from_prefix(d),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int64(v.into())
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int64(v.into())
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

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Data(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Data(v.to_vec())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Dict> for Value {
    fn from(v: Dict) -> Self {
        Value::Dict(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

/// Collects any convertible items into an array value.
impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

/// A string-keyed dictionary of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict(BTreeMap<String, Value>);

impl Dict {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of non-null entries
    pub fn len(&self) -> usize {
        self.0.values().filter(|v| !matches!(v, Value::Null)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| matches!(v, Value::Null))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, key: &str) -> Result<&Value, ValueError> {
        self.get(key)
            .ok_or_else(|| ValueError::MissingKey(key.to_string()))
    }

    fn wrong_type(key: &str, expected: &'static str, found: &Value) -> ValueError {
        ValueError::WrongType {
            key: key.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i64, ValueError> {
        let v = self.require(key)?;
        v.as_int().ok_or_else(|| Self::wrong_type(key, "int64", v))
    }

    /// Reads an integer that must fit an attribute handle or similar u16 field.
    pub fn get_u16(&self, key: &str) -> Result<u16, ValueError> {
        let v = self.get_int(key)?;
        u16::try_from(v).map_err(|_| ValueError::OutOfRange {
            key: key.to_string(),
            value: v,
        })
    }

    pub fn get_string(&self, key: &str) -> Result<&str, ValueError> {
        let v = self.require(key)?;
        v.as_str().ok_or_else(|| Self::wrong_type(key, "string", v))
    }

    pub fn get_bytes(&self, key: &str) -> Result<&[u8], ValueError> {
        let v = self.require(key)?;
        v.as_bytes().ok_or_else(|| Self::wrong_type(key, "data", v))
    }

    /// Reads raw data and renders it as lowercase hex.
    pub fn get_hex_bytes(&self, key: &str) -> Result<String, ValueError> {
        self.get_bytes(key).map(hex::encode)
    }

    pub fn get_array(&self, key: &str) -> Result<&[Value], ValueError> {
        let v = self.require(key)?;
        v.as_array().ok_or_else(|| Self::wrong_type(key, "array", v))
    }

    pub fn get_dict(&self, key: &str) -> Result<&Dict, ValueError> {
        let v = self.require(key)?;
        v.as_dict().ok_or_else(|| Self::wrong_type(key, "dictionary", v))
    }

    pub fn get_uuid(&self, key: &str) -> Result<Uuid, ValueError> {
        let v = self.require(key)?;
        match v {
            Value::Uuid(_) | Value::Data(_) => v
                .as_uuid()
                .ok_or_else(|| ValueError::InvalidUuid(format!("{}: {:?}", key, v))),
            _ => Err(Self::wrong_type(key, "uuid", v)),
        }
    }

    /// Optional integer; missing or malformed values yield `default`.
    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_int).unwrap_or(default)
    }

    /// Optional string; missing or malformed values yield `default`.
    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Optional data; missing or malformed values yield `None`.
    pub fn get_bytes_opt(&self, key: &str) -> Option<&[u8]> {
        self.get(key).and_then(Value::as_bytes)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int64(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Data(d) => write!(f, "<{}>", hex::encode(d)),
            Value::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Value::Array(a) => {
                f.write_str("[")?;
                for (i, v) in a.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Value::Dict(d) => write!(f, "{}", d),
        }
    }
}

impl fmt::Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        f.write_str("}")
    }
}
