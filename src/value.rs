//! Runtime field values as seen by the generator.
//!
//! Accessors hand back a [`Value`] for every field they are asked about. The
//! generator only needs two things from it: whether it is a map (and which
//! keys it holds), and its natural string form for a CSV cell, provided by
//! the [`Display`](fmt::Display) impl.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A field value read off a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value. Renders as an empty cell.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(MapValue),
}

impl Value {
    /// Borrow the map, if this value is one.
    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short name of the variant, used in shape-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(m) => write!(f, "{m}"),
        }
    }
}

/// An insertion-ordered string-keyed map.
///
/// Iteration order is the order keys were first inserted; this is the order
/// the scanner discovers them in. Inserting an existing key replaces its
/// value in place. Lookups go through a key index, so building a map and
/// reading a key are both constant time per key.
#[derive(Debug, Clone, Default)]
pub struct MapValue {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MapValue::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::UInt(u64::from(v))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<MapValue> for Value {
    fn from(v: MapValue) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for Value
where
    K: ToString,
    V: Into<Value>,
{
    fn from(m: HashMap<K, V, S>) -> Self {
        Value::Map(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

impl<K, V> From<BTreeMap<K, V>> for Value
where
    K: ToString,
    V: Into<Value>,
{
    fn from(m: BTreeMap<K, V>) -> Self {
        Value::Map(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

#[cfg(feature = "serde-records")]
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match v {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(obj) => Value::Map(obj.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_string_forms() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(42u32).to_string(), "42");
        assert_eq!(Value::from(-7i32).to_string(), "-7");
        assert_eq!(Value::from(2.5f64).to_string(), "2.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::from(vec![1u8, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from(None::<String>), Value::Null);
    }

    #[test]
    fn map_insert_keeps_first_position() {
        let mut m = MapValue::new();
        m.insert("b", 1u32);
        m.insert("a", 2u32);
        m.insert("b", 3u32);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(m.get("b"), Some(&Value::UInt(3)));
        assert_eq!(m.get("zzz"), None);
        assert_eq!(m.to_string(), "{b=3, a=2}");
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn large_maps_keep_order_and_lookups() {
        let m: MapValue = (0..5000u32).map(|i| (format!("k{i}"), i)).collect();
        assert_eq!(m.len(), 5000);
        assert_eq!(m.keys().next(), Some("k0"));
        assert_eq!(m.keys().last(), Some("k4999"));
        assert_eq!(m.get("k2500"), Some(&Value::UInt(2500)));

        let mut reordered = m.clone();
        reordered.insert("k0", 7u32);
        assert_eq!(reordered.keys().next(), Some("k0"));
        assert_eq!(reordered.get("k0"), Some(&Value::UInt(7)));
        assert_ne!(reordered, m);
    }

    #[test]
    fn btreemap_keys_are_stringified_in_order() {
        let mut src = BTreeMap::new();
        src.insert(2u32, "two");
        src.insert(1u32, "one");
        let v = Value::from(src);
        let keys: Vec<_> = v.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["1", "2"]);
    }

    #[cfg(feature = "serde-records")]
    #[test]
    fn json_objects_become_ordered_maps() {
        let json = serde_json::json!({"z": 1, "a": null, "m": "x"});
        let v = Value::from(json);
        let m = v.as_map().unwrap();
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(m.get("a"), Some(&Value::Null));
        assert_eq!(Value::from(serde_json::json!(-3)), Value::Int(-3));
    }
}
