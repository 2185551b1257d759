//! Schema descriptions
//!
//! A [`SchemaDescription`] is the typed shape an external schema parser
//! fills for one schema version: which tag names exist and where, which
//! attributes each tag allows and with what types, and how the children of
//! each tag are constrained. It is built unlocked, frozen once, and then
//! shared read-only.

/// Getters plus `*_mut` accessors that fail on a frozen record
///
/// The record must provide `check_unlocked(&self, operation)`.
macro_rules! field_accessors {
    ($($field:ident, $field_mut:ident: $ty:ty;)*) => {
        $(
            #[doc = concat!("Get `", stringify!($field), "`")]
            pub fn $field(&self) -> &$ty {
                &self.$field
            }

            #[doc = concat!("Get `", stringify!($field), "` for modification")]
            pub fn $field_mut(&mut self) -> Result<&mut $ty> {
                self.check_unlocked(concat!("modify ", stringify!($field)))?;
                Ok(&mut self.$field)
            }
        )*
    };
}

pub mod description;
pub mod simple;
pub mod tag_info;
pub mod tag_path;
pub mod tag_set;

pub use description::SchemaDescription;
pub use simple::{Length, SimpleElement, UNBOUNDED};
pub use tag_info::{SetOperation, TagInfo, UNSPECIFIED};
pub use tag_path::TagPath;
pub use tag_set::TagSet;

/// Type tag of string-valued attributes; listed last among allowed types
pub const STRING_TYPE: &str = "string";
