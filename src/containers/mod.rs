//! Lockable and case-insensitive containers
//!
//! This module contains the containers schema descriptions are built from:
//!
//! - [`LockableList`] and [`LockableDict`]: ordered containers with a
//!   one-way freeze transition that propagates to everything they own
//! - [`CaseInsensitiveDict`]: a lockable dict with normalized string keys
//!   that remembers the first spelling of each key
//! - [`CaseInsensitiveFrozenSet`]: an immutable, hashable string set closed
//!   under set algebra, and [`CaseInsensitiveSet`], its mutable view

pub mod case_dict;
pub mod dict;
pub mod frozen_set;
pub mod list;
pub mod lockable;

pub use case_dict::CaseInsensitiveDict;
pub use dict::LockableDict;
pub use frozen_set::{CaseInsensitiveFrozenSet, CaseInsensitiveSet};
pub use list::LockableList;
pub use lockable::Lockable;
