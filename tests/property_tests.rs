//! Property tests for the container invariants

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;
use schemadict::{
    CaseInsensitiveDict, CaseInsensitiveFrozenSet, Lockable, LockableDict, LockableList,
    NormalizationPolicy,
};

fn any_policy() -> impl Strategy<Value = NormalizationPolicy> {
    prop_oneof![Just(NormalizationPolicy::Lower), Just(NormalizationPolicy::Upper)]
}

fn name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,7}"
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(name(), 0..12)
}

/// Flip the ASCII case of the characters selected by `flips`
fn recase(s: &str, flips: &[bool]) -> String {
    s.chars()
        .zip(flips.iter().copied().chain(std::iter::repeat(false)))
        .map(|(c, flip)| {
            if !flip {
                c
            } else if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

fn hash_of(set: &CaseInsensitiveFrozenSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    set.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn prop_normalize_idempotent(key in "[a-zA-Z0-9_\u{C0}-\u{FF}]{0,12}", policy in any_policy()) {
        let once = policy.normalize(&key);
        prop_assert_eq!(policy.normalize(&once), once.clone());
        prop_assert!(policy.is_normalized(&once));
    }

    #[test]
    fn prop_lookup_ignores_case(
        keys in names(),
        flips in prop::collection::vec(any::<bool>(), 8),
        policy in any_policy(),
    ) {
        let dict = CaseInsensitiveDict::from_pairs(
            keys.iter().enumerate().map(|(i, key)| (key.as_str(), i)),
            policy,
        );
        for key in &keys {
            let other = recase(key, &flips);
            prop_assert!(dict.contains(&other));
            prop_assert_eq!(dict.get(key).unwrap(), dict.get(&other).unwrap());
        }
    }

    #[test]
    fn prop_original_case_preserved(keys in names(), policy in any_policy()) {
        let mut dict = CaseInsensitiveDict::with_policy(policy);
        for key in &keys {
            if !dict.contains(key) {
                dict.set(key, ()).unwrap();
            }
        }
        let mut expected: Vec<&str> = Vec::new();
        for key in &keys {
            if !expected.iter().any(|seen| policy.matches(seen, key)) {
                expected.push(key);
            }
        }
        prop_assert_eq!(dict.keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_first_spelling_wins(keys in names(), policy in any_policy()) {
        let set = CaseInsensitiveFrozenSet::with_policy(&keys, policy);
        for key in &keys {
            let first = keys
                .iter()
                .find(|other| policy.matches(other, key))
                .unwrap();
            prop_assert_eq!(set.original(key), Some(first.as_str()));
        }
    }

    #[test]
    fn prop_frozen_stays_frozen(values in prop::collection::vec(any::<i64>(), 0..8)) {
        let mut list: LockableList<i64> = values.iter().copied().collect();
        list.freeze();
        list.freeze();

        prop_assert!(list.is_frozen());
        prop_assert!(list.append(1).unwrap_err().is_frozen());
        prop_assert!(list.extend(vec![1, 2]).unwrap_err().is_frozen());
        prop_assert!(list.insert(0, 1).unwrap_err().is_frozen());
        prop_assert!(list.clear().unwrap_err().is_frozen());
        prop_assert!(list.pop_last().unwrap_err().is_frozen());
        prop_assert!(list.is_frozen());
        prop_assert_eq!(list.as_slice(), values.as_slice());
    }

    #[test]
    fn prop_freeze_reaches_every_nested_container(
        entries in prop::collection::vec((name(), prop::collection::vec(any::<u8>(), 0..4)), 0..6),
    ) {
        let mut outer: LockableDict<String, LockableDict<String, LockableList<u8>>> =
            LockableDict::new();
        for (key, values) in entries {
            let inner: LockableDict<String, LockableList<u8>> =
                [(key.clone(), values.into_iter().collect::<LockableList<u8>>())].into_iter().collect();
            outer.set(key, inner).unwrap();
        }
        outer.freeze();

        prop_assert!(outer.is_deeply_frozen());
        for inner in outer.values() {
            prop_assert!(inner.is_frozen());
            prop_assert!(inner.values().all(|list| list.is_frozen()));
        }
    }

    #[test]
    fn prop_set_algebra_laws(a in names(), b in names(), c in names()) {
        let a: CaseInsensitiveFrozenSet = a.into_iter().collect();
        let b: CaseInsensitiveFrozenSet = b.into_iter().collect();
        let c: CaseInsensitiveFrozenSet = c.into_iter().collect();

        prop_assert_eq!(&a | &b, &b | &a);
        prop_assert_eq!(&(&a | &b) | &c, &a | &(&b | &c));
        prop_assert_eq!(&a & &b, &b & &a);

        // De Morgan relative to a universe holding all three sets
        let universe = &(&a | &b) | &c;
        prop_assert_eq!(
            &universe - &(&a | &b),
            &(&universe - &a) & &(&universe - &b)
        );
        prop_assert_eq!(
            &universe - &(&a & &b),
            &(&universe - &a) | &(&universe - &b)
        );

        prop_assert!((&a - &a).is_empty());
        prop_assert!((&a ^ &a).is_empty());
        prop_assert_eq!(&a | &a, a.clone());
        prop_assert_eq!(&a & &a, a.clone());
    }

    #[test]
    fn prop_equal_sets_hash_equal(keys in names(), flips in prop::collection::vec(any::<bool>(), 8)) {
        let set: CaseInsensitiveFrozenSet = keys.iter().collect();
        let mut recased: Vec<String> = keys.iter().map(|key| recase(key, &flips)).collect();
        recased.reverse();
        let other: CaseInsensitiveFrozenSet = recased.into_iter().collect();

        prop_assert_eq!(&set, &other);
        prop_assert_eq!(hash_of(&set), hash_of(&other));
    }

    #[test]
    fn prop_round_trip_clone(keys in names(), values in prop::collection::vec(any::<i32>(), 0..6)) {
        let mut dict: CaseInsensitiveDict<LockableList<i32>> = keys
            .iter()
            .map(|key| (key.as_str(), values.iter().copied().collect::<LockableList<i32>>()))
            .collect();
        dict.freeze();

        let mut copy = dict.get_unlocked();
        prop_assert!(!copy.is_frozen());
        copy.freeze();
        prop_assert_eq!(copy, dict);
    }
}
