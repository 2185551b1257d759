//! Ordered sequence with a one-way freeze transition

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use super::lockable::Lockable;
use crate::error::{Error, Result};
use crate::repr::{write_seq, Repr};

const NAME: &str = "LockableList";

/// Ordered sequence that rejects every mutation once frozen
///
/// Reads are unaffected by the frozen state. Freezing recursively freezes
/// every element that is itself lockable.
#[derive(Debug, Clone)]
pub struct LockableList<T> {
    items: Vec<T>,
    frozen: bool,
}

impl<T> LockableList<T> {
    /// Create a new empty, unlocked list
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            frozen: false,
        }
    }

    fn check_unlocked(&self, operation: &'static str) -> Result<()> {
        if self.frozen {
            Err(Error::frozen(NAME, operation))
        } else {
            Ok(())
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                container: NAME,
                index,
                len: self.items.len(),
            })
        }
    }

    /// Append a value at the end
    pub fn append(&mut self, value: T) -> Result<()> {
        self.check_unlocked("append")?;
        self.items.push(value);
        Ok(())
    }

    /// Append all values of an iterator
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<()> {
        self.check_unlocked("extend")?;
        self.items.extend(values);
        Ok(())
    }

    /// Insert a value before `index`; `index == len` appends
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.check_unlocked("insert")?;
        if index > self.items.len() {
            return Err(Error::IndexOutOfRange {
                container: NAME,
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, value);
        Ok(())
    }

    /// Replace the value at `index`, returning the previous one
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        self.check_unlocked("set")?;
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.items[index], value))
    }

    /// Remove and return the value at `index`
    pub fn pop(&mut self, index: usize) -> Result<T> {
        self.check_unlocked("pop")?;
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Remove and return the last value
    pub fn pop_last(&mut self) -> Result<T> {
        self.check_unlocked("pop")?;
        self.items.pop().ok_or(Error::IndexOutOfRange {
            container: NAME,
            index: 0,
            len: 0,
        })
    }

    /// Remove all values
    pub fn clear(&mut self) -> Result<()> {
        self.check_unlocked("clear")?;
        self.items.clear();
        Ok(())
    }

    /// Get the value at `index`
    pub fn get(&self, index: usize) -> Result<&T> {
        self.check_index(index)?;
        Ok(&self.items[index])
    }

    /// Get a mutable reference to the value at `index`
    ///
    /// Fails on a frozen list, since the reference could be used to mutate it.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.check_unlocked("get_mut")?;
        self.check_index(index)?;
        Ok(&mut self.items[index])
    }

    /// Get the first value
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Get the last value
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the values in order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// View the values as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume the list, returning its values
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: PartialEq + fmt::Debug> LockableList<T> {
    /// Check if the list holds a value
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Position of the first occurrence of a value
    pub fn index(&self, value: &T) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item == value)
            .ok_or_else(|| Error::ValueMissing {
                container: NAME,
                value: format!("{:?}", value),
            })
    }

    /// Number of occurrences of a value
    pub fn count(&self, value: &T) -> usize {
        self.items.iter().filter(|item| *item == value).count()
    }

    /// Remove the first occurrence of a value
    pub fn remove(&mut self, value: &T) -> Result<T> {
        if self.frozen {
            return Err(Error::frozen_key(NAME, "remove", value));
        }
        let index = self.index(value)?;
        Ok(self.items.remove(index))
    }
}

impl<T: Lockable> Lockable for LockableList<T> {
    fn freeze(&mut self) {
        if !self.frozen {
            trace!(container = NAME, len = self.items.len(), "freezing");
            self.frozen = true;
        }
        for item in &mut self.items {
            item.freeze();
        }
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn get_unlocked(&self) -> Self {
        Self {
            items: self.items.iter().map(Lockable::get_unlocked).collect(),
            frozen: false,
        }
    }

    fn is_deeply_frozen(&self) -> bool {
        self.frozen && self.items.iter().all(Lockable::is_deeply_frozen)
    }
}

impl<T> Default for LockableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for LockableList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            frozen: false,
        }
    }
}

impl<T> FromIterator<T> for LockableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> IntoIterator for LockableList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a LockableList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Index<usize> for LockableList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T: PartialEq> PartialEq for LockableList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for LockableList<T> {}

impl<T, U> PartialEq<Vec<U>> for LockableList<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.items.len() == other.len() && self.items.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for LockableList<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.items.len() == N && self.items.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<T: Repr> Repr for LockableList<T> {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", NAME)?;
        write_seq(f, self.items.iter())?;
        write!(f, ")")
    }
}

impl<T: Repr> fmt::Display for LockableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}

impl<T: Serialize> Serialize for LockableList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LockableList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LockableList<String> {
        ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mutation_while_unlocked() {
        let mut list = sample();
        list.append("d".to_string()).unwrap();
        list.insert(0, "z".to_string()).unwrap();
        list.extend(vec!["e".to_string()]).unwrap();
        assert_eq!(list, ["z", "a", "b", "c", "d", "e"]);

        let old = list.set(1, "A".to_string()).unwrap();
        assert_eq!(old, "a");
        assert_eq!(list.pop(0).unwrap(), "z");
        assert_eq!(list.remove(&"b".to_string()).unwrap(), "b");
        assert_eq!(list.pop_last().unwrap(), "e");
        assert_eq!(list, ["A", "c", "d"]);

        list.clear().unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_frozen_rejects_every_mutation() {
        let mut list = sample();
        list.freeze();
        assert!(list.is_frozen());

        assert!(list.append("d".to_string()).unwrap_err().is_frozen());
        assert!(list.extend(vec![]).unwrap_err().is_frozen());
        assert!(list.insert(0, "d".to_string()).unwrap_err().is_frozen());
        assert!(list.set(0, "d".to_string()).unwrap_err().is_frozen());
        assert!(list.pop(0).unwrap_err().is_frozen());
        assert!(list.pop_last().unwrap_err().is_frozen());
        assert!(list.remove(&"a".to_string()).unwrap_err().is_frozen());
        assert!(list.clear().unwrap_err().is_frozen());
        assert!(list.get_mut(0).unwrap_err().is_frozen());

        assert_eq!(list, ["a", "b", "c"]);
    }

    #[test]
    fn test_reads_after_freeze() {
        let mut list = sample();
        list.append("a".to_string()).unwrap();
        list.freeze();

        assert_eq!(list.len(), 4);
        assert_eq!(list.get(1).unwrap(), "b");
        assert_eq!(&list[2], "c");
        assert!(list.contains(&"c".to_string()));
        assert_eq!(list.index(&"b".to_string()).unwrap(), 1);
        assert_eq!(list.count(&"a".to_string()), 2);
        assert_eq!(list.iter().count(), 4);
    }

    #[test]
    fn test_bad_index() {
        let list = sample();
        let err = list.get(3).unwrap_err();
        assert_eq!(
            err,
            Error::IndexOutOfRange {
                container: "LockableList",
                index: 3,
                len: 3
            }
        );

        let mut list = sample();
        assert!(list.insert(4, "x".to_string()).is_err());
        assert!(list.insert(3, "x".to_string()).is_ok());
    }

    #[test]
    fn test_missing_value() {
        let mut list = sample();
        assert!(matches!(
            list.remove(&"q".to_string()),
            Err(Error::ValueMissing { .. })
        ));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_freeze_empty_and_idempotent() {
        let mut list: LockableList<i64> = LockableList::new();
        list.freeze();
        list.freeze();
        assert!(list.is_frozen());
        assert!(list.is_deeply_frozen());
    }

    #[test]
    fn test_recursive_freeze() {
        let inner: LockableList<i64> = vec![1, 2].into();
        let mut outer = LockableList::from(vec![inner.clone(), inner]);
        outer.freeze();
        assert!(outer.is_deeply_frozen());
        assert!(outer.get(0).unwrap().is_frozen());
    }

    #[test]
    fn test_get_unlocked() {
        let inner: LockableList<i64> = vec![1, 2].into();
        let mut outer = LockableList::from(vec![inner]);
        outer.freeze();

        let mut copy = outer.get_unlocked();
        assert!(!copy.is_frozen());
        assert_eq!(copy, outer);

        copy.get_mut(0).unwrap().append(3).unwrap();
        assert_eq!(outer.get(0).unwrap(), &vec![1i64, 2]);
        assert_eq!(copy.get(0).unwrap(), &vec![1i64, 2, 3]);
    }

    #[test]
    fn test_display() {
        let list = sample();
        assert_eq!(list.to_string(), "LockableList(['a', 'b', 'c'])");

        let nested = LockableList::from(vec![LockableList::from(vec![1i64])]);
        assert_eq!(nested.to_string(), "LockableList([LockableList([1])])");
    }

    #[test]
    fn test_serde() {
        let list: LockableList<String> = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert!(!list.is_frozen());
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
    }
}
