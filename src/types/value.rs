use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A dynamically typed value flowing between resolvers: parents handed down
/// to child resolvers, leaves copied into the response, and coerced
/// argument values.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn string(s: String) -> Value {
        Value::String(s)
    }

    pub fn str(s: &str) -> Value {
        Value::String(s.to_string())
    }

    pub fn int(i: i64) -> Value {
        Value::Int(i)
    }

    pub fn float(f: f64) -> Value {
        Value::Float(f)
    }

    pub fn boolean(b: bool) -> Value {
        Value::Boolean(b)
    }

    pub fn none() -> Value {
        Value::Null
    }

    pub fn list(values: Vec<Value>) -> Value {
        Value::List(values)
    }

    /// Builds an object value, keeping the order the pairs are given in.
    pub fn object<K: Into<String>>(pairs: Vec<(K, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(*self, Value::Null)
    }

    pub fn coerce_string(&self) -> Option<String> {
        match *self {
            Value::String(ref s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn coerce_int(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn coerce_float(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f),
            Value::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn coerce_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// Looks up a property of an object value. Anything else has no
    /// properties.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match *self {
            Value::Object(ref fields) => fields.get(key),
            _ => None,
        }
    }

    /// A short name for the shape of the value, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match *self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(values) => {
                Value::List(values.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => {
                Value::Object(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        value.map_or(Value::Null, Into::into)
    }
}

/// Coerced argument values handed to a resolver, keyed by argument name in
/// the order the field declares them.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Arguments {
    values: IndexMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Arguments {
        Arguments { values: IndexMap::new() }
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::coerce_int)
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Value::coerce_string)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::coerce_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.values.iter()
    }
}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Arguments {
        Arguments { values: iter.into_iter().collect() }
    }
}
