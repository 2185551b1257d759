//! Dynamically typed nested value
//!
//! [`Value`] lets heterogeneous data be nested in the lockable containers,
//! e.g. a [`CaseInsensitiveDict`] holding numbers, plain mappings and sets
//! side by side. Freezing and unlocking dispatch on the variant: lockable
//! variants are frozen in place, and a [`CaseInsensitiveSet`] becomes a
//! [`CaseInsensitiveFrozenSet`] (and back on `get_unlocked`). The plain
//! `Seq` and `Map` variants are not lockable and are left untouched.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::containers::{
    CaseInsensitiveDict, CaseInsensitiveFrozenSet, CaseInsensitiveSet, Lockable, LockableDict,
    LockableList,
};
use crate::error::{Error, Result};
use crate::repr::{write_map, write_seq, write_str_literal, Repr};

/// A value that can be stored in any lockable container
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value
    #[default]
    None,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
    /// Plain sequence without a lock of its own; freezing reaches its items
    Seq(Vec<Value>),
    /// Plain ordered mapping without a lock of its own; freezing reaches its values
    Map(IndexMap<String, Value>),
    /// Lockable list
    List(LockableList<Value>),
    /// Lockable dict
    Dict(LockableDict<String, Value>),
    /// Case-insensitive lockable dict
    CaseDict(CaseInsensitiveDict<Value>),
    /// Immutable case-insensitive set
    FrozenSet(CaseInsensitiveFrozenSet),
    /// Mutable case-insensitive set
    Set(CaseInsensitiveSet),
}

impl Value {
    /// Name of the variant's kind, as used in printable forms
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Seq(_) => "list",
            Value::Map(_) => "dict",
            Value::List(_) => "LockableList",
            Value::Dict(_) => "LockableDict",
            Value::CaseDict(_) => "CaseInsensitiveDict",
            Value::FrozenSet(_) => "CaseInsensitiveFrozenSet",
            Value::Set(_) => "CaseInsensitiveSet",
        }
    }

    /// Check if this is `Value::None`
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Get the string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the lockable list, if this is one
    pub fn as_list(&self) -> Option<&LockableList<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get the case-insensitive dict, if this is one
    pub fn as_case_dict(&self) -> Option<&CaseInsensitiveDict<Value>> {
        match self {
            Value::CaseDict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Get the mutable set view, if this is one
    pub fn as_set_mut(&mut self) -> Option<&mut CaseInsensitiveSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Check membership in a set value, case-insensitively
    pub fn contains(&self, item: &str) -> bool {
        match self {
            Value::FrozenSet(set) => set.contains(item),
            Value::Set(set) => set.contains(item),
            _ => false,
        }
    }

    /// Look up a key in any mapping variant
    pub fn get(&self, key: &str) -> Result<&Value> {
        match self {
            Value::Dict(dict) => dict.get(key),
            Value::CaseDict(dict) => dict.get(key),
            Value::Map(map) => map.get(key).ok_or_else(|| Error::missing("dict", key)),
            other => Err(Error::InvalidValue(format!(
                "{} value has no key '{}'",
                other.kind(),
                key
            ))),
        }
    }

    /// Mutable lookup of a key in any mapping variant
    ///
    /// Fails with `ContainerFrozen` on frozen dicts.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value> {
        match self {
            Value::Dict(dict) => dict.get_mut(key),
            Value::CaseDict(dict) => dict.get_mut(key),
            Value::Map(map) => map.get_mut(key).ok_or_else(|| Error::missing("dict", key)),
            other => Err(Error::InvalidValue(format!(
                "{} value has no key '{}'",
                other.kind(),
                key
            ))),
        }
    }

    /// Convert to JSON-shaped data
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::None => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(x) => serde_json::Value::from(*x),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Seq(items) => items.iter().map(Value::to_json).collect(),
            Value::List(items) => items.iter().map(Value::to_json).collect(),
            Value::Map(map) => map_to_json(map.iter()),
            Value::Dict(dict) => map_to_json(dict.iter()),
            Value::CaseDict(dict) => map_to_json(dict.iter()),
            Value::FrozenSet(set) => set.iter().map(serde_json::Value::from).collect(),
            Value::Set(set) => set.iter().map(serde_json::Value::from).collect(),
        }
    }
}

fn map_to_json<'a, K, I>(entries: I) -> serde_json::Value
where
    K: AsRef<str> + 'a,
    I: Iterator<Item = (K, &'a Value)>,
{
    serde_json::Value::Object(
        entries
            .map(|(key, value)| (key.as_ref().to_string(), value.to_json()))
            .collect(),
    )
}

impl Lockable for Value {
    fn freeze(&mut self) {
        match self {
            Value::Seq(items) => items.iter_mut().for_each(Lockable::freeze),
            Value::Map(map) => map.values_mut().for_each(Lockable::freeze),
            Value::List(list) => list.freeze(),
            Value::Dict(dict) => dict.freeze(),
            Value::CaseDict(dict) => dict.freeze(),
            Value::Set(set) => *self = Value::FrozenSet(std::mem::take(set).into_frozen()),
            _ => {}
        }
    }

    fn is_frozen(&self) -> bool {
        match self {
            Value::Seq(items) => items.iter().all(Lockable::is_frozen),
            Value::Map(map) => map.values().all(Lockable::is_frozen),
            Value::List(list) => list.is_frozen(),
            Value::Dict(dict) => dict.is_frozen(),
            Value::CaseDict(dict) => dict.is_frozen(),
            Value::Set(_) => false,
            _ => true,
        }
    }

    fn get_unlocked(&self) -> Self {
        match self {
            Value::Seq(items) => Value::Seq(items.iter().map(Lockable::get_unlocked).collect()),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.get_unlocked()))
                    .collect(),
            ),
            Value::List(list) => Value::List(list.get_unlocked()),
            Value::Dict(dict) => Value::Dict(dict.get_unlocked()),
            Value::CaseDict(dict) => Value::CaseDict(dict.get_unlocked()),
            Value::FrozenSet(set) => Value::Set(set.to_mutable()),
            other => other.clone(),
        }
    }

    fn is_deeply_frozen(&self) -> bool {
        match self {
            Value::Seq(items) => items.iter().all(Lockable::is_deeply_frozen),
            Value::Map(map) => map.values().all(Lockable::is_deeply_frozen),
            Value::List(list) => list.is_deeply_frozen(),
            Value::Dict(dict) => dict.is_deeply_frozen(),
            Value::CaseDict(dict) => dict.is_deeply_frozen(),
            other => other.is_frozen(),
        }
    }
}

impl Repr for Value {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => b.fmt_repr(f),
            Value::Int(i) => i.fmt_repr(f),
            Value::Float(x) => x.fmt_repr(f),
            Value::Str(s) => write_str_literal(f, s),
            Value::Seq(items) => write_seq(f, items.iter()),
            Value::Map(map) => write_map(f, map.iter()),
            Value::List(list) => list.fmt_repr(f),
            Value::Dict(dict) => dict.fmt_repr(f),
            Value::CaseDict(dict) => dict.fmt_repr(f),
            Value::FrozenSet(set) => set.fmt_repr(f),
            Value::Set(set) => set.fmt_repr(f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_for_value!(
    bool => Bool,
    i32 => Int,
    i64 => Int,
    f64 => Float,
    &str => Str,
    String => Str,
    Vec<Value> => Seq,
    IndexMap<String, Value> => Map,
    LockableList<Value> => List,
    LockableDict<String, Value> => Dict,
    CaseInsensitiveDict<Value> => CaseDict,
    CaseInsensitiveFrozenSet => FrozenSet,
    CaseInsensitiveSet => Set,
);

/// JSON objects become lockable dicts and arrays become lockable lists
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Dict(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Seq(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::List(list) => list.serialize(serializer),
            Value::Dict(dict) => dict.serialize(serializer),
            Value::CaseDict(dict) => dict.serialize(serializer),
            Value::FrozenSet(set) => set.serialize(serializer),
            Value::Set(set) => set.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
