//! Mapping with case-insensitive string keys
//!
//! Keys are stored in normalized form. The spelling a key had when it was
//! first inserted is kept in a sibling `original_case` dict, keyed by the
//! normalized form, and is what iteration and printing show.

use std::fmt;
use std::ops::Index;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use tracing::{debug, trace};

use super::dict::LockableDict;
use super::lockable::Lockable;
use crate::error::{Error, Result};
use crate::normalize::NormalizationPolicy;
use crate::repr::{write_map, write_str_literal, Repr};

const NAME: &str = "CaseInsensitiveDict";

/// Lockable mapping whose string keys are matched case-insensitively
#[derive(Debug, Clone)]
pub struct CaseInsensitiveDict<V> {
    data: LockableDict<String, V>,
    original_case: LockableDict<String, String>,
    policy: NormalizationPolicy,
}

impl<V> CaseInsensitiveDict<V> {
    /// Create a new empty dict with the default (lower case) policy
    pub fn new() -> Self {
        Self::with_policy(NormalizationPolicy::default())
    }

    /// Create a new empty dict with the given policy
    pub fn with_policy(policy: NormalizationPolicy) -> Self {
        Self {
            data: LockableDict::new(),
            original_case: LockableDict::new(),
            policy,
        }
    }

    /// Create a dict from `(key, value)` pairs with the given policy
    ///
    /// Later pairs overwrite the values of earlier ones with the same
    /// normalized key; the first spelling is kept.
    pub fn from_pairs<I, S>(pairs: I, policy: NormalizationPolicy) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
    {
        let mut dict = Self::with_policy(policy);
        for (key, value) in pairs {
            dict.insert_unchecked(key.as_ref(), value);
        }
        dict
    }

    /// Normalization policy fixed at construction
    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Normalize a key with this dict's policy
    pub fn normalize(&self, key: &str) -> String {
        self.policy.normalize(key)
    }

    fn check_unlocked(&self, operation: &'static str, key: Option<&str>) -> Result<()> {
        if !self.data.locked() {
            return Ok(());
        }
        Err(match key {
            Some(key) => Error::frozen_normalized(NAME, operation, key, &self.normalize(key)),
            None => Error::frozen(NAME, operation),
        })
    }

    fn missing(&self, key: &str, normalized: &str) -> Error {
        Error::missing_normalized(NAME, key, normalized)
    }

    fn insert_unchecked(&mut self, key: &str, value: V) -> Option<V> {
        let normalized = self.policy.normalize(key);
        if !self.data.contains(normalized.as_str()) {
            self.original_case
                .insert_unchecked(normalized.clone(), key.to_string());
        }
        self.data.insert_unchecked(normalized, value)
    }

    /// Insert or overwrite a value, returning the previous one
    ///
    /// Overwriting keeps the spelling recorded at first insertion.
    pub fn set<S: AsRef<str>>(&mut self, key: S, value: V) -> Result<Option<V>> {
        let key = key.as_ref();
        self.check_unlocked("set", Some(key))?;
        Ok(self.insert_unchecked(key, value))
    }

    /// Get the value of `key`
    pub fn get(&self, key: &str) -> Result<&V> {
        let normalized = self.policy.normalize(key);
        self.data
            .as_map()
            .get(&normalized)
            .ok_or_else(|| self.missing(key, &normalized))
    }

    /// Get a mutable reference to the value of `key`
    ///
    /// Fails on a frozen dict.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut V> {
        self.check_unlocked("get_mut", Some(key))?;
        let normalized = self.policy.normalize(key);
        if !self.data.contains(normalized.as_str()) {
            return Err(self.missing(key, &normalized));
        }
        self.data.get_mut(normalized.as_str())
    }

    /// Check if the dict holds `key` in any spelling
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains(self.policy.normalize(key).as_str())
    }

    /// Remove an entry and its recorded spelling
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.pop(key).map(|_| ())
    }

    /// Remove an entry and its recorded spelling, returning the value
    pub fn pop(&mut self, key: &str) -> Result<V> {
        self.check_unlocked("pop", Some(key))?;
        let normalized = self.policy.normalize(key);
        let value = self
            .data
            .pop(normalized.as_str())
            .map_err(|_| self.missing(key, &normalized))?;
        self.original_case.delete(normalized.as_str())?;
        Ok(value)
    }

    /// Get the value of `key`, inserting `default` first if absent
    pub fn setdefault(&mut self, key: &str, default: V) -> Result<&V> {
        self.check_unlocked("setdefault", Some(key))?;
        let normalized = self.policy.normalize(key);
        if !self.data.contains(normalized.as_str()) {
            self.insert_unchecked(key, default);
        }
        self.data.get(normalized.as_str())
    }

    /// Apply `set` for every pair
    ///
    /// The frozen check happens before the first pair is applied.
    pub fn update<I, S>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
    {
        self.check_unlocked("update", None)?;
        for (key, value) in pairs {
            self.insert_unchecked(key.as_ref(), value);
        }
        Ok(())
    }

    /// Remove all entries
    pub fn clear(&mut self) -> Result<()> {
        self.check_unlocked("clear", None)?;
        self.data.clear()?;
        self.original_case.clear()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the dict is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over `(original key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.data
            .iter()
            .map(move |(normalized, value)| (self.original_of(normalized), value))
    }

    /// Iterate over the keys in their original spelling
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.keys().map(move |normalized| self.original_of(normalized))
    }

    /// Iterate over the keys in normalized form
    pub fn normalized_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.keys().map(String::as_str)
    }

    /// Iterate over the values in insertion order
    pub fn values(&self) -> indexmap::map::Values<'_, String, V> {
        self.data.values()
    }

    /// Spelling recorded for `key` at first insertion
    pub fn original_key(&self, key: &str) -> Option<&str> {
        self.original_case
            .as_map()
            .get(&self.policy.normalize(key))
            .map(String::as_str)
    }

    /// Mapping from normalized key to original spelling
    pub fn original_case(&self) -> &LockableDict<String, String> {
        &self.original_case
    }

    /// View the entries under their normalized keys
    pub fn as_dict(&self) -> &LockableDict<String, V> {
        &self.data
    }

    fn original_of<'a>(&'a self, normalized: &'a str) -> &'a str {
        self.original_case
            .as_map()
            .get(normalized)
            .map(String::as_str)
            .unwrap_or(normalized)
    }
}

impl<V: Clone> CaseInsensitiveDict<V> {
    /// Build a dict with `policy` from another case-insensitive dict
    ///
    /// Fails with `PolicyMismatch` when the policies differ.
    pub fn try_from_dict(other: &CaseInsensitiveDict<V>, policy: NormalizationPolicy) -> Result<Self> {
        if other.policy != policy {
            debug!(expected = %policy, found = %other.policy, "refusing to re-key dict");
            return Err(Error::PolicyMismatch {
                container: NAME,
                expected: policy,
                found: other.policy,
            });
        }
        Ok(Self::from_pairs(
            other.iter().map(|(key, value)| (key, value.clone())),
            policy,
        ))
    }

    /// Apply `set` for every entry of another case-insensitive dict
    ///
    /// Keys not yet present take the other dict's original spelling.
    pub fn update_from(&mut self, other: &CaseInsensitiveDict<V>) -> Result<()> {
        self.check_unlocked("update", None)?;
        if other.policy != self.policy {
            debug!(expected = %self.policy, found = %other.policy, "refusing to merge dicts");
            return Err(Error::PolicyMismatch {
                container: NAME,
                expected: self.policy,
                found: other.policy,
            });
        }
        for (key, value) in other.iter() {
            self.insert_unchecked(key, value.clone());
        }
        Ok(())
    }
}

impl<V: Repr> CaseInsensitiveDict<V> {
    /// Printable form using the stored, normalized keys
    pub fn normalized_repr(&self) -> String {
        struct Normalized<'a, V>(&'a CaseInsensitiveDict<V>);

        impl<V: Repr> fmt::Display for Normalized<'_, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", NAME)?;
                write_map(f, self.0.data.iter())?;
                write!(f, ")")
            }
        }

        Normalized(self).to_string()
    }
}

impl<V: Lockable> Lockable for CaseInsensitiveDict<V> {
    fn freeze(&mut self) {
        if !self.data.locked() {
            trace!(container = NAME, len = self.data.len(), "freezing");
        }
        self.data.freeze();
        self.original_case.freeze();
    }

    fn is_frozen(&self) -> bool {
        self.data.is_frozen()
    }

    fn get_unlocked(&self) -> Self {
        Self {
            data: self.data.get_unlocked(),
            original_case: self.original_case.get_unlocked(),
            policy: self.policy,
        }
    }

    fn is_deeply_frozen(&self) -> bool {
        self.data.is_deeply_frozen() && self.original_case.is_frozen()
    }
}

impl<V> Default for CaseInsensitiveDict<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>, V> FromIterator<(S, V)> for CaseInsensitiveDict<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Self::from_pairs(iter, NormalizationPolicy::default())
    }
}

impl<V> Index<&str> for CaseInsensitiveDict<V> {
    type Output = V;

    fn index(&self, key: &str) -> &V {
        &self.data.as_map()[&self.policy.normalize(key)]
    }
}

/// Equal when the normalized key sets and per-key values match
///
/// Dicts with different policies never compare equal.
impl<V: PartialEq> PartialEq for CaseInsensitiveDict<V> {
    fn eq(&self, other: &Self) -> bool {
        self.policy == other.policy && self.data == other.data
    }
}

impl<V: Eq> Eq for CaseInsensitiveDict<V> {}

impl<V: Repr> Repr for CaseInsensitiveDict<V> {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({{", NAME)?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_str_literal(f, key)?;
            write!(f, ": ")?;
            value.fmt_repr(f)?;
        }
        write!(f, "}})")
    }
}

impl<V: Repr> fmt::Display for CaseInsensitiveDict<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}

impl<V: Serialize> Serialize for CaseInsensitiveDict<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Deserializes with the default lower-case policy
///
/// The policy is not serialized; rebuild with
/// [`from_pairs`](CaseInsensitiveDict::from_pairs) to restore another.
impl<'de, V: Deserialize<'de>> Deserialize<'de> for CaseInsensitiveDict<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pairs = indexmap::IndexMap::<String, V>::deserialize(deserializer)?;
        Ok(Self::from_pairs(pairs, NormalizationPolicy::default()))
    }
}
