//! Immutable set of strings with case-insensitive membership
//!
//! The set stores one entry per normalized element together with the
//! spelling seen first. Set algebra accepts any iterable of strings as the
//! other operand and recomputes the spellings of the result: a scratch map
//! is filled from `self` first and the other operand second, first sight
//! wins, and is then projected onto the elements of the result.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitAnd, BitOr, BitXor, Sub};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lockable::Lockable;
use crate::normalize::NormalizationPolicy;
use crate::repr::{write_set, Repr};

const FROZEN_NAME: &str = "CaseInsensitiveFrozenSet";
const MUTABLE_NAME: &str = "CaseInsensitiveSet";

/// Immutable, hashable set of strings compared case-insensitively
#[derive(Debug, Clone)]
pub struct CaseInsensitiveFrozenSet {
    original_case: IndexMap<String, String>,
    policy: NormalizationPolicy,
}

impl CaseInsensitiveFrozenSet {
    /// Create an empty set with the default (lower case) policy
    pub fn new() -> Self {
        Self::with_policy(Vec::<String>::new(), NormalizationPolicy::default())
    }

    /// Create a set from strings with the given policy
    ///
    /// For strings that normalize to the same element, the first one
    /// encountered is remembered as the original spelling.
    pub fn with_policy<I>(items: I, policy: NormalizationPolicy) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            original_case: collect_first_seen(items, policy),
            policy,
        }
    }

    /// Normalization policy fixed at construction
    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.original_case.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.original_case.is_empty()
    }

    /// Check if the set holds `item` in any spelling
    pub fn contains(&self, item: &str) -> bool {
        self.original_case.contains_key(&self.policy.normalize(item))
    }

    /// Iterate over the elements in their original spelling
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.original_case.values().map(String::as_str)
    }

    /// Iterate over the elements in normalized form
    pub fn normalized(&self) -> impl Iterator<Item = &str> + '_ {
        self.original_case.keys().map(String::as_str)
    }

    /// Mapping from normalized element to original spelling
    pub fn original_case(&self) -> &IndexMap<String, String> {
        &self.original_case
    }

    /// Original spelling of `item`, if the set holds it
    pub fn original(&self, item: &str) -> Option<&str> {
        self.original_case
            .get(&self.policy.normalize(item))
            .map(String::as_str)
    }

    fn normalized_set<I>(&self, other: I) -> HashSet<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        other
            .into_iter()
            .map(|item| self.policy.normalize(item.as_ref()))
            .collect()
    }

    fn combine<I, F>(&self, other: I, keep: F) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        F: Fn(bool, bool) -> bool,
    {
        let mut scratch = self.original_case.clone();
        let mut in_other = HashSet::new();
        for item in other {
            let item = item.as_ref();
            let normalized = self.policy.normalize(item);
            in_other.insert(normalized.clone());
            scratch
                .entry(normalized)
                .or_insert_with(|| item.to_string());
        }

        let original_case = scratch
            .into_iter()
            .filter(|(normalized, _)| {
                keep(
                    self.original_case.contains_key(normalized),
                    in_other.contains(normalized),
                )
            })
            .collect();

        Self {
            original_case,
            policy: self.policy,
        }
    }

    /// Elements in `self` or `other`
    pub fn union<I>(&self, other: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.combine(other, |a, b| a || b)
    }

    /// Elements in both `self` and `other`
    pub fn intersection<I>(&self, other: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.combine(other, |a, b| a && b)
    }

    /// Elements in `self` but not in `other`
    pub fn difference<I>(&self, other: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.combine(other, |a, b| a && !b)
    }

    /// Elements in exactly one of `self` and `other`
    pub fn symmetric_difference<I>(&self, other: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.combine(other, |a, b| a != b)
    }

    /// Check that no element of `other` is in `self`
    pub fn is_disjoint<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.normalized_set(other)
            .iter()
            .all(|item| !self.original_case.contains_key(item))
    }

    /// Check that every element of `self` is in `other`
    pub fn is_subset<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let other = self.normalized_set(other);
        self.original_case.keys().all(|item| other.contains(item))
    }

    /// Check that every element of `other` is in `self`
    pub fn is_superset<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.normalized_set(other)
            .iter()
            .all(|item| self.original_case.contains_key(item))
    }

    /// Check that `other` holds exactly the same normalized elements
    pub fn eq_normalized<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let other = self.normalized_set(other);
        other.len() == self.len() && other.iter().all(|item| self.original_case.contains_key(item))
    }

    /// Mutable ordered copy with the same elements and spellings
    pub fn to_mutable(&self) -> CaseInsensitiveSet {
        CaseInsensitiveSet {
            original_case: self.original_case.clone(),
            policy: self.policy,
        }
    }
}

fn collect_first_seen<I>(items: I, policy: NormalizationPolicy) -> IndexMap<String, String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut original_case = IndexMap::new();
    for item in items {
        let item = item.as_ref();
        original_case
            .entry(policy.normalize(item))
            .or_insert_with(|| item.to_string());
    }
    original_case
}

impl Default for CaseInsensitiveFrozenSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CaseInsensitiveFrozenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::with_policy(iter, NormalizationPolicy::default())
    }
}

impl<'a> IntoIterator for &'a CaseInsensitiveFrozenSet {
    type Item = &'a String;
    type IntoIter = indexmap::map::Values<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.original_case.values()
    }
}

/// Equal when the normalized element sets match, whatever the spellings
///
/// Sets are compared on their stored normalized forms, so sets with
/// different policies are only equal if no element has a cased letter.
impl PartialEq for CaseInsensitiveFrozenSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && other
                .original_case
                .keys()
                .all(|item| self.original_case.contains_key(item))
    }
}

impl Eq for CaseInsensitiveFrozenSet {}

impl<S: AsRef<str>> PartialEq<HashSet<S>> for CaseInsensitiveFrozenSet {
    fn eq(&self, other: &HashSet<S>) -> bool {
        self.eq_normalized(other)
    }
}

impl<S: AsRef<str>, const N: usize> PartialEq<[S; N]> for CaseInsensitiveFrozenSet {
    fn eq(&self, other: &[S; N]) -> bool {
        self.eq_normalized(other)
    }
}

impl Hash for CaseInsensitiveFrozenSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut elements: Vec<&String> = self.original_case.keys().collect();
        elements.sort();
        elements.len().hash(state);
        for element in elements {
            element.hash(state);
        }
    }
}

impl<I> BitOr<I> for &CaseInsensitiveFrozenSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    type Output = CaseInsensitiveFrozenSet;

    fn bitor(self, other: I) -> CaseInsensitiveFrozenSet {
        self.union(other)
    }
}

impl<I> BitAnd<I> for &CaseInsensitiveFrozenSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    type Output = CaseInsensitiveFrozenSet;

    fn bitand(self, other: I) -> CaseInsensitiveFrozenSet {
        self.intersection(other)
    }
}

impl<I> BitXor<I> for &CaseInsensitiveFrozenSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    type Output = CaseInsensitiveFrozenSet;

    fn bitxor(self, other: I) -> CaseInsensitiveFrozenSet {
        self.symmetric_difference(other)
    }
}

impl<I> Sub<I> for &CaseInsensitiveFrozenSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    type Output = CaseInsensitiveFrozenSet;

    fn sub(self, other: I) -> CaseInsensitiveFrozenSet {
        self.difference(other)
    }
}

/// A frozen set is always frozen; `get_unlocked` returns an equal frozen set
///
/// Containers that must hand out a mutable set after `get_unlocked` hold a
/// [`TagSet`](crate::schema::TagSet) or a [`Value`](crate::value::Value)
/// instead, which swap in a [`CaseInsensitiveSet`].
impl Lockable for CaseInsensitiveFrozenSet {
    fn freeze(&mut self) {}

    fn is_frozen(&self) -> bool {
        true
    }

    fn get_unlocked(&self) -> Self {
        self.clone()
    }
}

impl Repr for CaseInsensitiveFrozenSet {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", FROZEN_NAME)?;
        write_set(f, self.iter())?;
        write!(f, ")")
    }
}

impl fmt::Display for CaseInsensitiveFrozenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}

impl Serialize for CaseInsensitiveFrozenSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Deserializes with the default lower-case policy
///
/// The policy is not serialized; rebuild with
/// [`with_policy`](CaseInsensitiveFrozenSet::with_policy) to restore another.
impl<'de> Deserialize<'de> for CaseInsensitiveFrozenSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(|items| items.into_iter().collect())
    }
}

/// Mutable, insertion-ordered set of strings compared case-insensitively
///
/// This is the unlocked view of a [`CaseInsensitiveFrozenSet`]; freezing
/// turns it back into one.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveSet {
    original_case: IndexMap<String, String>,
    policy: NormalizationPolicy,
}

impl CaseInsensitiveSet {
    /// Create an empty set with the default (lower case) policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from strings with the given policy
    pub fn with_policy<I>(items: I, policy: NormalizationPolicy) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            original_case: collect_first_seen(items, policy),
            policy,
        }
    }

    /// Normalization policy fixed at construction
    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Add an element; returns `false` if it was already present
    ///
    /// An element already present keeps its recorded spelling.
    pub fn insert(&mut self, item: &str) -> bool {
        let normalized = self.policy.normalize(item);
        if self.original_case.contains_key(&normalized) {
            return false;
        }
        self.original_case.insert(normalized, item.to_string());
        true
    }

    /// Remove an element; returns `false` if it was absent
    pub fn remove(&mut self, item: &str) -> bool {
        self.original_case
            .shift_remove(&self.policy.normalize(item))
            .is_some()
    }

    /// Check if the set holds `item` in any spelling
    pub fn contains(&self, item: &str) -> bool {
        self.original_case.contains_key(&self.policy.normalize(item))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.original_case.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.original_case.is_empty()
    }

    /// Iterate over the elements in their original spelling, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.original_case.values().map(String::as_str)
    }

    /// Mapping from normalized element to original spelling
    pub fn original_case(&self) -> &IndexMap<String, String> {
        &self.original_case
    }

    /// Frozen copy with the same elements and spellings
    pub fn to_frozen(&self) -> CaseInsensitiveFrozenSet {
        CaseInsensitiveFrozenSet {
            original_case: self.original_case.clone(),
            policy: self.policy,
        }
    }

    /// Convert into a frozen set without copying
    pub fn into_frozen(self) -> CaseInsensitiveFrozenSet {
        CaseInsensitiveFrozenSet {
            original_case: self.original_case,
            policy: self.policy,
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for CaseInsensitiveSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::with_policy(iter, NormalizationPolicy::default())
    }
}

impl<'a> IntoIterator for &'a CaseInsensitiveSet {
    type Item = &'a String;
    type IntoIter = indexmap::map::Values<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.original_case.values()
    }
}

impl PartialEq for CaseInsensitiveSet {
    fn eq(&self, other: &Self) -> bool {
        self.to_frozen() == other.to_frozen()
    }
}

impl Eq for CaseInsensitiveSet {}

impl Repr for CaseInsensitiveSet {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", MUTABLE_NAME)?;
        write_set(f, self.iter())?;
        write!(f, ")")
    }
}

impl fmt::Display for CaseInsensitiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}

impl Serialize for CaseInsensitiveSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Deserializes with the default lower-case policy
impl<'de> Deserialize<'de> for CaseInsensitiveSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(|items| items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(set: &CaseInsensitiveFrozenSet) -> u64 {
        let mut hasher = DefaultHasher::new();
        set.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_first_spelling_wins() {
        let set: CaseInsensitiveFrozenSet = ["Kmax", "KMAX", "kmax", "gmax"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.original("kMAX"), Some("Kmax"));
        assert_eq!(set.iter().collect::<Vec<_>>(), ["Kmax", "gmax"]);
    }

    #[test]
    fn test_membership() {
        let set: CaseInsensitiveFrozenSet = ["spinUp", "snake_case"].into_iter().collect();
        assert!(set.contains("SPINUP"));
        assert!(!set.contains("snakecase"));
        assert!(!CaseInsensitiveFrozenSet::new().contains(""));
    }

    #[test]
    fn test_union_prefers_self_spelling() {
        let a: CaseInsensitiveFrozenSet = ["Kmax", "gmax"].into_iter().collect();
        let b: CaseInsensitiveFrozenSet = ["KMAX", "LMAX"].into_iter().collect();
        let union = &a | &b;
        assert_eq!(union, ["kmax", "gmax", "lmax"]);
        assert_eq!(union.original("kmax"), Some("Kmax"));
        assert_eq!(union.original("lmax"), Some("LMAX"));
    }

    #[test]
    fn test_operators_with_plain_iterables() {
        let a: CaseInsensitiveFrozenSet = ["Kmax", "gmax", "lmax"].into_iter().collect();
        let plain = vec!["GMAX", "numbands"];

        assert_eq!(&a & plain.iter(), ["gmax"]);
        assert_eq!(&a - plain.iter(), ["kmax", "lmax"]);
        assert_eq!(&a ^ plain.iter(), ["kmax", "lmax", "numbands"]);
        assert_eq!(&a | plain.iter(), ["kmax", "gmax", "lmax", "numbands"]);
        assert_eq!((&a & plain.iter()).original("gmax"), Some("gmax"));
    }

    #[test]
    fn test_predicates() {
        let a: CaseInsensitiveFrozenSet = ["Kmax", "gmax"].into_iter().collect();
        assert!(a.is_subset(["KMAX", "GMAX", "lmax"]));
        assert!(!a.is_subset(["KMAX"]));
        assert!(a.is_superset(["GMAX"]));
        assert!(a.is_disjoint(["lmax", "numbands"]));
        assert!(!a.is_disjoint(["kMax"]));
    }

    #[test]
    fn test_policy_of_result_follows_self() {
        let upper = CaseInsensitiveFrozenSet::with_policy(["spinUp"], NormalizationPolicy::Upper);
        let lower: CaseInsensitiveFrozenSet = ["SpinUp", "spinDown"].into_iter().collect();
        let union = upper.union(&lower);
        assert_eq!(union.policy(), NormalizationPolicy::Upper);
        assert_eq!(union.normalized().collect::<Vec<_>>(), ["SPINUP", "SPINDOWN"]);
        assert_eq!(union.original("spinup"), Some("spinUp"));
    }

    #[test]
    fn test_hash_ignores_spelling_and_order() {
        let a: CaseInsensitiveFrozenSet = ["Kmax", "gmax"].into_iter().collect();
        let b: CaseInsensitiveFrozenSet = ["GMAX", "kmax"].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut by_set = std::collections::HashMap::new();
        by_set.insert(a, "first");
        assert_eq!(by_set.get(&b), Some(&"first"));
    }

    #[test]
    fn test_equality_with_plain_set() {
        let a: CaseInsensitiveFrozenSet = ["Kmax", "gmax"].into_iter().collect();
        let plain: HashSet<&str> = ["KMAX", "Gmax"].into_iter().collect();
        assert_eq!(a, plain);
        let plain: HashSet<String> = ["kmax".to_string()].into_iter().collect();
        assert_ne!(a, plain);
    }

    #[test]
    fn test_display() {
        let a: CaseInsensitiveFrozenSet = ["Kmax", "gmax"].into_iter().collect();
        assert_eq!(a.to_string(), "CaseInsensitiveFrozenSet({'Kmax', 'gmax'})");
        assert_eq!(
            CaseInsensitiveFrozenSet::new().to_string(),
            "CaseInsensitiveFrozenSet()"
        );
    }

    #[test]
    fn test_mutable_view_round_trip() {
        let frozen: CaseInsensitiveFrozenSet = ["Kmax", "gmax"].into_iter().collect();
        let mut set = frozen.to_mutable();
        assert!(set.insert("X"));
        assert!(!set.insert("KMAX"));
        assert!(set.remove("GMAX"));
        assert!(!set.remove("gmax"));
        assert_eq!(set.iter().collect::<Vec<_>>(), ["Kmax", "X"]);
        assert_eq!(set.to_string(), "CaseInsensitiveSet({'Kmax', 'X'})");

        let refrozen = set.into_frozen();
        assert_eq!(refrozen, ["kmax", "x"]);
        assert_eq!(frozen, ["kmax", "gmax"]);
    }

    #[test]
    fn test_serde() {
        let set: CaseInsensitiveFrozenSet = serde_json::from_str(r#"["Kmax", "KMAX", "gmax"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["Kmax","gmax"]"#);
    }

    #[test]
    fn test_serde_restores_default_policy() {
        let upper =
            CaseInsensitiveFrozenSet::with_policy(["Kmax", "gmax"], NormalizationPolicy::Upper);
        let json = serde_json::to_string(&upper).unwrap();

        let back: CaseInsensitiveFrozenSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.policy(), NormalizationPolicy::Lower);
        assert_ne!(back, upper);

        let rebuilt =
            CaseInsensitiveFrozenSet::with_policy(back.iter(), NormalizationPolicy::Upper);
        assert_eq!(rebuilt, upper);
        assert_eq!(rebuilt.original("KMAX"), Some("Kmax"));
    }

    #[test]
    fn test_get_unlocked_keeps_frozen_set_values() {
        use crate::containers::LockableDict;
        use crate::schema::TagSet;

        let attribs: CaseInsensitiveFrozenSet = ["Kmax"].into_iter().collect();
        let mut sets: LockableDict<String, CaseInsensitiveFrozenSet> =
            [("/root".to_string(), attribs.clone())].into_iter().collect();
        let mut tags: LockableDict<String, TagSet> =
            [("/root".to_string(), TagSet::from(attribs))].into_iter().collect();
        sets.freeze();
        tags.freeze();

        let sets = sets.get_unlocked();
        assert!(!sets.is_frozen());
        assert!(sets["/root"].is_frozen());

        let mut tags = tags.get_unlocked();
        assert!(tags.get_mut("/root").unwrap().insert("gmax").unwrap());
    }
}
