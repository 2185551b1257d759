//! Sets of tag and attribute names inside a tag record

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::containers::{CaseInsensitiveFrozenSet, CaseInsensitiveSet, Lockable};
use crate::error::{Error, Result};
use crate::normalize::NormalizationPolicy;
use crate::repr::Repr;

/// A set of names that is mutable while the schema is built and immutable after
///
/// Freezing converts the mutable view into a [`CaseInsensitiveFrozenSet`];
/// `get_unlocked` converts it back, keeping the recorded spellings.
#[derive(Debug, Clone)]
pub enum TagSet {
    /// Immutable set
    Frozen(CaseInsensitiveFrozenSet),
    /// Mutable set
    Unlocked(CaseInsensitiveSet),
}

impl TagSet {
    /// Create an empty, mutable set
    pub fn new() -> Self {
        TagSet::Unlocked(CaseInsensitiveSet::new())
    }

    /// Create an already frozen set
    pub fn frozen<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        TagSet::Frozen(items.into_iter().collect())
    }

    /// Normalization policy of the underlying set
    pub fn policy(&self) -> NormalizationPolicy {
        match self {
            TagSet::Frozen(set) => set.policy(),
            TagSet::Unlocked(set) => set.policy(),
        }
    }

    /// Check if the set holds `name` in any spelling
    pub fn contains(&self, name: &str) -> bool {
        match self {
            TagSet::Frozen(set) => set.contains(name),
            TagSet::Unlocked(set) => set.contains(name),
        }
    }

    /// Add a name; returns `false` if it was already present
    pub fn insert(&mut self, name: &str) -> Result<bool> {
        match self {
            TagSet::Frozen(set) => Err(Error::frozen_normalized(
                "CaseInsensitiveFrozenSet",
                "insert",
                name,
                &set.policy().normalize(name),
            )),
            TagSet::Unlocked(set) => Ok(set.insert(name)),
        }
    }

    /// Remove a name; returns `false` if it was absent
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        match self {
            TagSet::Frozen(set) => Err(Error::frozen_normalized(
                "CaseInsensitiveFrozenSet",
                "remove",
                name,
                &set.policy().normalize(name),
            )),
            TagSet::Unlocked(set) => Ok(set.remove(name)),
        }
    }

    /// Iterate over the names in their original spelling
    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            TagSet::Frozen(set) => Box::new(set.iter()),
            TagSet::Unlocked(set) => Box::new(set.iter()),
        }
    }

    /// Number of names
    pub fn len(&self) -> usize {
        self.original_case().len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mapping from normalized name to original spelling
    pub fn original_case(&self) -> &indexmap::IndexMap<String, String> {
        match self {
            TagSet::Frozen(set) => set.original_case(),
            TagSet::Unlocked(set) => set.original_case(),
        }
    }

    /// Frozen copy of the set, used as an operand of set algebra
    pub fn to_frozen(&self) -> CaseInsensitiveFrozenSet {
        match self {
            TagSet::Frozen(set) => set.clone(),
            TagSet::Unlocked(set) => set.to_frozen(),
        }
    }
}

impl Default for TagSet {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CaseInsensitiveFrozenSet> for TagSet {
    fn from(set: CaseInsensitiveFrozenSet) -> Self {
        TagSet::Frozen(set)
    }
}

impl From<CaseInsensitiveSet> for TagSet {
    fn from(set: CaseInsensitiveSet) -> Self {
        TagSet::Unlocked(set)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagSet::Unlocked(iter.into_iter().collect())
    }
}

/// Equal when the normalized names match, whether frozen or not
impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        let (left, right) = (self.original_case(), other.original_case());
        left.len() == right.len() && left.keys().all(|key| right.contains_key(key))
    }
}

impl Eq for TagSet {}

impl Lockable for TagSet {
    fn freeze(&mut self) {
        if let TagSet::Unlocked(set) = self {
            *self = TagSet::Frozen(std::mem::take(set).into_frozen());
        }
    }

    fn is_frozen(&self) -> bool {
        matches!(self, TagSet::Frozen(_))
    }

    fn get_unlocked(&self) -> Self {
        match self {
            TagSet::Frozen(set) => TagSet::Unlocked(set.to_mutable()),
            TagSet::Unlocked(set) => TagSet::Unlocked(set.clone()),
        }
    }
}

impl Repr for TagSet {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSet::Frozen(set) => set.fmt_repr(f),
            TagSet::Unlocked(set) => set.fmt_repr(f),
        }
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        CaseInsensitiveSet::deserialize(deserializer).map(TagSet::Unlocked)
    }
}
