//! # schemadict
//!
//! Case-insensitive, lockable containers and the schema-dictionary model
//! for the XML input/output dialect of DFT codes.
//!
//! Schemas of that dialect have hundreds of tag and attribute names that
//! differ only in letter case between versions (`Kmax` vs `kmax`). This
//! crate provides the containers such schema descriptions are built from:
//!
//! - Lookups by any casing that keep the original spelling for reporting
//! - A one-way, recursive freeze so a finished description can be shared
//!   read-only
//! - Set algebra over case-insensitive name sets
//! - Arbitrary nesting of these containers
//!
//! Parsing XML schemas is not part of this crate; an external parser
//! fills a [`SchemaDescription`] and freezes it.
//!
//! ## Example
//!
//! ```rust
//! use schemadict::{CaseInsensitiveDict, CaseInsensitiveFrozenSet, Lockable};
//!
//! let mut attribs = CaseInsensitiveDict::new();
//! attribs.set("Kmax", 4.0).unwrap();
//! assert_eq!(*attribs.get("KMAX").unwrap(), 4.0);
//! assert_eq!(attribs.keys().collect::<Vec<_>>(), vec!["Kmax"]);
//!
//! attribs.freeze();
//! assert!(attribs.set("kmax", 5.0).is_err());
//!
//! let tags: CaseInsensitiveFrozenSet = ["spinUp", "SpinUp", "lmax"].into_iter().collect();
//! assert_eq!(tags.len(), 2);
//! assert_eq!(tags.original("SPINUP"), Some("spinUp"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod normalize;
pub mod repr;

// Containers
pub mod containers;
pub mod value;

// Schema model
pub mod paths;
pub mod schema;

// Re-exports for convenience
pub use containers::{
    CaseInsensitiveDict, CaseInsensitiveFrozenSet, CaseInsensitiveSet, Lockable, LockableDict,
    LockableList,
};
pub use error::{Error, Result, SchemaError};
pub use normalize::NormalizationPolicy;
pub use repr::Repr;
pub use schema::{
    Length, SchemaDescription, SetOperation, SimpleElement, TagInfo, TagPath, TagSet,
};
pub use value::Value;

/// Version of the schemadict library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
