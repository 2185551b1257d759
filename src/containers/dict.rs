//! Insertion-ordered mapping with a one-way freeze transition

use std::fmt;
use std::hash::Hash;
use std::ops::Index;

use indexmap::{Equivalent, IndexMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use super::lockable::Lockable;
use crate::error::{Error, Result};
use crate::repr::{write_map, Repr};

const NAME: &str = "LockableDict";

/// Mapping that rejects every mutation once frozen
///
/// Iteration follows insertion order, before and after freezing.
///
/// [`get_unlocked`](Lockable::get_unlocked) unlocks every nested lockable
/// value. A [`CaseInsensitiveFrozenSet`](super::CaseInsensitiveFrozenSet)
/// value stays frozen; store a [`TagSet`](crate::schema::TagSet) to get a
/// mutable set back.
#[derive(Debug, Clone)]
pub struct LockableDict<K, V> {
    data: IndexMap<K, V>,
    frozen: bool,
}

impl<K, V> LockableDict<K, V> {
    /// Create a new empty, unlocked dict
    pub fn new() -> Self {
        Self {
            data: IndexMap::new(),
            frozen: false,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the dict is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.data.iter()
    }

    /// Same as [`iter`](Self::iter)
    pub fn items(&self) -> indexmap::map::Iter<'_, K, V> {
        self.data.iter()
    }

    /// Iterate over the keys in insertion order
    pub fn keys(&self) -> indexmap::map::Keys<'_, K, V> {
        self.data.keys()
    }

    /// Iterate over the values in insertion order
    pub fn values(&self) -> indexmap::map::Values<'_, K, V> {
        self.data.values()
    }

    /// Entry at a position in insertion order
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.data.get_index(index)
    }

    /// View the underlying ordered map
    pub fn as_map(&self) -> &IndexMap<K, V> {
        &self.data
    }

    /// Consume the dict, returning the underlying ordered map
    pub fn into_map(self) -> IndexMap<K, V> {
        self.data
    }

    pub(crate) fn locked(&self) -> bool {
        self.frozen
    }

    fn check_unlocked(&self, operation: &'static str) -> Result<()> {
        if self.frozen {
            Err(Error::frozen(NAME, operation))
        } else {
            Ok(())
        }
    }
}

impl<K: Hash + Eq + fmt::Debug, V> LockableDict<K, V> {
    /// Insert or overwrite a value, returning the previous one
    ///
    /// A new key is appended at the end; an existing key keeps its position.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        if self.frozen {
            return Err(Error::frozen_key(NAME, "set", &key));
        }
        Ok(self.data.insert(key, value))
    }

    /// Insert without the frozen check, for containers that check their own lock
    pub(crate) fn insert_unchecked(&mut self, key: K, value: V) -> Option<V> {
        self.data.insert(key, value)
    }

    /// Remove an entry
    pub fn delete<Q>(&mut self, key: &Q) -> Result<()>
    where
        Q: ?Sized + Hash + Equivalent<K> + fmt::Debug,
    {
        self.pop(key).map(|_| ())
    }

    /// Remove an entry, returning its value
    pub fn pop<Q>(&mut self, key: &Q) -> Result<V>
    where
        Q: ?Sized + Hash + Equivalent<K> + fmt::Debug,
    {
        if self.frozen {
            return Err(Error::frozen_key(NAME, "pop", key));
        }
        self.data
            .shift_remove(key)
            .ok_or_else(|| Error::missing(NAME, key))
    }

    /// Apply `set` for every pair
    pub fn update<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) -> Result<()> {
        self.check_unlocked("update")?;
        self.data.extend(pairs);
        Ok(())
    }

    /// Get the value of `key`, inserting `default` first if absent
    pub fn setdefault(&mut self, key: K, default: V) -> Result<&V> {
        if self.frozen {
            return Err(Error::frozen_key(NAME, "setdefault", &key));
        }
        Ok(self.data.entry(key).or_insert(default))
    }

    /// Remove all entries
    pub fn clear(&mut self) -> Result<()> {
        self.check_unlocked("clear")?;
        self.data.clear();
        Ok(())
    }

    /// Get the value of `key`
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        Q: ?Sized + Hash + Equivalent<K> + fmt::Debug,
    {
        self.data.get(key).ok_or_else(|| Error::missing(NAME, key))
    }

    /// Get a mutable reference to the value of `key`
    ///
    /// Fails on a frozen dict, since the reference could be used to mutate it.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K> + fmt::Debug,
    {
        if self.frozen {
            return Err(Error::frozen_key(NAME, "get_mut", key));
        }
        self.data.get_mut(key).ok_or_else(|| Error::missing(NAME, key))
    }

    /// Check if the dict holds `key`
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.data.contains_key(key)
    }
}

impl<K: Clone + Hash + Eq, V: Lockable> Lockable for LockableDict<K, V> {
    fn freeze(&mut self) {
        if !self.frozen {
            trace!(container = NAME, len = self.data.len(), "freezing");
            self.frozen = true;
        }
        for value in self.data.values_mut() {
            value.freeze();
        }
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn get_unlocked(&self) -> Self {
        Self {
            data: self
                .data
                .iter()
                .map(|(key, value)| (key.clone(), value.get_unlocked()))
                .collect(),
            frozen: false,
        }
    }

    fn is_deeply_frozen(&self) -> bool {
        self.frozen && self.data.values().all(Lockable::is_deeply_frozen)
    }
}

impl<K, V> Default for LockableDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<IndexMap<K, V>> for LockableDict<K, V> {
    fn from(data: IndexMap<K, V>) -> Self {
        Self {
            data,
            frozen: false,
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for LockableDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<IndexMap<_, _>>())
    }
}

impl<'a, K, V> IntoIterator for &'a LockableDict<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<K, V> IntoIterator for LockableDict<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<K, V, Q> Index<&Q> for LockableDict<K, V>
where
    K: Hash + Eq,
    Q: ?Sized + Hash + Equivalent<K>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        &self.data[key]
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for LockableDict<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<K: Hash + Eq, V: Eq> Eq for LockableDict<K, V> {}

impl<K: Repr, V: Repr> Repr for LockableDict<K, V> {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", NAME)?;
        write_map(f, self.data.iter())?;
        write!(f, ")")
    }
}

impl<K: Repr, V: Repr> fmt::Display for LockableDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}

impl<K: Serialize, V: Serialize> Serialize for LockableDict<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl<'de, K, V> Deserialize<'de> for LockableDict<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        IndexMap::<K, V>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::LockableList;

    fn sample() -> LockableDict<String, i64> {
        [("kmax", 4), ("gmax", 12), ("lmax", 10)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_basic_operations() {
        let mut dict = sample();
        assert_eq!(dict.len(), 3);
        assert_eq!(*dict.get("gmax").unwrap(), 12);
        assert!(dict.contains("lmax"));
        assert!(!dict.contains("Kmax"));

        assert_eq!(dict.set("kmax".to_string(), 5).unwrap(), Some(4));
        assert_eq!(dict["kmax"], 5);
        assert_eq!(*dict.setdefault("numbands".to_string(), 0).unwrap(), 0);
        assert_eq!(*dict.setdefault("numbands".to_string(), 7).unwrap(), 0);

        assert_eq!(dict.pop("gmax").unwrap(), 12);
        dict.delete("lmax").unwrap();
        let keys: Vec<&String> = dict.keys().collect();
        assert_eq!(keys, ["kmax", "numbands"]);
    }

    #[test]
    fn test_insertion_order_survives_freeze() {
        let mut dict = sample();
        dict.update(vec![("alpha".to_string(), 1)]).unwrap();
        dict.freeze();
        let keys: Vec<&str> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, ["kmax", "gmax", "lmax", "alpha"]);
    }

    #[test]
    fn test_missing_key() {
        let mut dict = sample();
        let err = dict.get("nope").unwrap_err();
        assert_eq!(err, Error::missing("LockableDict", "nope"));
        assert!(dict.pop("nope").unwrap_err().is_missing());
        assert!(dict.delete("nope").unwrap_err().is_missing());
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_frozen_rejects_every_mutation() {
        let mut dict = sample();
        dict.freeze();

        assert!(dict.set("kmax".to_string(), 1).unwrap_err().is_frozen());
        assert!(dict.delete("kmax").unwrap_err().is_frozen());
        assert!(dict.pop("kmax").unwrap_err().is_frozen());
        assert!(dict.update(vec![]).unwrap_err().is_frozen());
        assert!(dict.setdefault("x".to_string(), 1).unwrap_err().is_frozen());
        assert!(dict.clear().unwrap_err().is_frozen());
        assert!(dict.get_mut("kmax").unwrap_err().is_frozen());

        assert_eq!(dict, sample());
    }

    #[test]
    fn test_recursive_freeze() {
        let mut inner: LockableDict<String, LockableList<String>> = LockableDict::new();
        inner
            .set("order".to_string(), LockableList::from(vec!["a".to_string()]))
            .unwrap();
        let mut outer = LockableDict::new();
        outer.set("/root".to_string(), inner).unwrap();

        outer.freeze();
        assert!(outer.is_deeply_frozen());
        let order = outer.get("/root").unwrap().get("order").unwrap();
        assert!(order.is_frozen());
    }

    #[test]
    fn test_get_unlocked_is_isolated() {
        let mut inner: LockableDict<String, i64> = LockableDict::new();
        inner.set("numbands".to_string(), 0).unwrap();
        let mut outer = LockableDict::new();
        outer.set("/root".to_string(), inner).unwrap();
        outer.freeze();

        let mut copy = outer.get_unlocked();
        assert!(!copy.is_frozen());
        assert!(!copy.get("/root").unwrap().is_frozen());
        assert_eq!(copy, outer);

        copy.get_mut("/root")
            .unwrap()
            .set("numbands".to_string(), 8)
            .unwrap();
        assert_eq!(*outer.get("/root").unwrap().get("numbands").unwrap(), 0);

        copy.freeze();
        assert_ne!(copy, outer);
    }

    #[test]
    fn test_display() {
        let dict = sample();
        assert_eq!(
            dict.to_string(),
            "LockableDict({'kmax': 4, 'gmax': 12, 'lmax': 10})"
        );
    }

    #[test]
    fn test_serde() {
        let dict: LockableDict<String, i64> =
            serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        assert!(!dict.is_frozen());
        assert_eq!(serde_json::to_string(&dict).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
