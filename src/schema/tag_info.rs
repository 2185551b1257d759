//! Per-path tag records

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tag_set::TagSet;
use crate::containers::{
    CaseInsensitiveDict, CaseInsensitiveFrozenSet, CaseInsensitiveSet, Lockable, LockableList,
};
use crate::error::{Error, Result};
use crate::repr::{write_str_literal, Repr};

/// Default value recorded for optional attributes without a default
pub const UNSPECIFIED: &str = "unspecified";

/// Operation used to combine two schema descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperation {
    /// Everything in either description
    Union,
    /// Only what both descriptions share
    Intersection,
    /// What the first description has and the second lacks
    Difference,
}

impl SetOperation {
    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "union" => Ok(SetOperation::Union),
            "intersection" => Ok(SetOperation::Intersection),
            "difference" => Ok(SetOperation::Difference),
            _ => Err(Error::InvalidValue(format!("invalid set operation: '{}'", s))),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperation::Union => "union",
            SetOperation::Intersection => "intersection",
            SetOperation::Difference => "difference",
        }
    }

    /// Apply to two frozen sets
    pub fn apply(
        &self,
        left: &CaseInsensitiveFrozenSet,
        right: &CaseInsensitiveFrozenSet,
    ) -> CaseInsensitiveFrozenSet {
        match self {
            SetOperation::Union => left | right,
            SetOperation::Intersection => left & right,
            SetOperation::Difference => left - right,
        }
    }

    /// Whether an entry present on the given sides is kept
    fn keeps(&self, in_left: bool, in_right: bool) -> bool {
        match self {
            SetOperation::Union => in_left || in_right,
            SetOperation::Intersection => in_left && in_right,
            SetOperation::Difference => in_left && !in_right,
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const NAME: &str = "TagInfo";

/// Everything the schema says about the tag at one path
///
/// The name sets hold child tag names except `attribs`, which holds
/// attribute names. `order` is empty unless the children must appear in a
/// fixed sequence.
///
/// Records are assembled with the `with_*` builders and then filled or
/// changed through the `*_mut` accessors, which fail once the record is
/// frozen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TagInfo {
    attribs: TagSet,
    optional_attribs: CaseInsensitiveDict<String>,
    optional: TagSet,
    order: LockableList<String>,
    several: TagSet,
    simple: TagSet,
    text: TagSet,
    complex: TagSet,
    #[serde(skip)]
    frozen: bool,
}

macro_rules! field_builders {
    ($($with:ident, $field:ident: $ty:ty;)*) => {
        $(
            #[doc = concat!("Set `", stringify!($field), "`; a frozen record freezes the new value")]
            pub fn $with(mut self, $field: $ty) -> Self {
                self.$field = $field;
                if self.frozen {
                    self.$field.freeze();
                }
                self
            }
        )*
    };
}

impl TagInfo {
    /// Create an empty, unlocked record
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unlocked(&self, operation: &'static str) -> Result<()> {
        if self.frozen {
            Err(Error::frozen(NAME, operation))
        } else {
            Ok(())
        }
    }

    field_accessors! {
        attribs, attribs_mut: TagSet;
        optional_attribs, optional_attribs_mut: CaseInsensitiveDict<String>;
        optional, optional_mut: TagSet;
        order, order_mut: LockableList<String>;
        several, several_mut: TagSet;
        simple, simple_mut: TagSet;
        text, text_mut: TagSet;
        complex, complex_mut: TagSet;
    }

    field_builders! {
        with_attribs, attribs: TagSet;
        with_optional_attribs, optional_attribs: CaseInsensitiveDict<String>;
        with_optional, optional: TagSet;
        with_order, order: LockableList<String>;
        with_several, several: TagSet;
        with_simple, simple: TagSet;
        with_text, text: TagSet;
        with_complex, complex: TagSet;
    }

    /// Name sets of the record paired with their field names
    pub fn tag_sets(&self) -> [(&'static str, &TagSet); 6] {
        [
            ("attribs", &self.attribs),
            ("optional", &self.optional),
            ("several", &self.several),
            ("simple", &self.simple),
            ("text", &self.text),
            ("complex", &self.complex),
        ]
    }

    /// Combine with the record of the same path from another description
    ///
    /// Sets are combined with set algebra. `order` keeps the entries of
    /// `self` that the operation keeps, followed for a union by the entries
    /// only `other` has. For `optional_attribs` the value of `self` wins.
    /// The result is unlocked.
    pub fn combine(&self, other: &TagInfo, op: SetOperation) -> TagInfo {
        let sets = |left: &TagSet, right: &TagSet| {
            TagSet::Unlocked(op.apply(&left.to_frozen(), &right.to_frozen()).to_mutable())
        };

        TagInfo {
            attribs: sets(&self.attribs, &other.attribs),
            optional_attribs: combine_defaults(&self.optional_attribs, &other.optional_attribs, op),
            optional: sets(&self.optional, &other.optional),
            order: combine_order(&self.order, &other.order, op),
            several: sets(&self.several, &other.several),
            simple: sets(&self.simple, &other.simple),
            text: sets(&self.text, &other.text),
            complex: sets(&self.complex, &other.complex),
            frozen: false,
        }
    }
}

fn combine_order(
    left: &LockableList<String>,
    right: &LockableList<String>,
    op: SetOperation,
) -> LockableList<String> {
    let in_left: CaseInsensitiveSet = left.iter().collect();
    let in_right: CaseInsensitiveSet = right.iter().collect();

    let mut order: Vec<String> = left
        .iter()
        .filter(|tag| op.keeps(true, in_right.contains(tag)))
        .cloned()
        .collect();
    if op == SetOperation::Union {
        order.extend(right.iter().filter(|tag| !in_left.contains(tag)).cloned());
    }
    order.into()
}

fn combine_defaults(
    left: &CaseInsensitiveDict<String>,
    right: &CaseInsensitiveDict<String>,
    op: SetOperation,
) -> CaseInsensitiveDict<String> {
    let mut pairs: Vec<(&str, String)> = left
        .iter()
        .filter(|(name, _)| op.keeps(true, right.contains(name)))
        .map(|(name, value)| (name, value.clone()))
        .collect();
    if op == SetOperation::Union {
        pairs.extend(
            right
                .iter()
                .filter(|(name, _)| !left.contains(name))
                .map(|(name, value)| (name, value.clone())),
        );
    }
    CaseInsensitiveDict::from_pairs(pairs, left.policy())
}

impl Lockable for TagInfo {
    fn freeze(&mut self) {
        self.frozen = true;
        self.attribs.freeze();
        self.optional_attribs.freeze();
        self.optional.freeze();
        self.order.freeze();
        self.several.freeze();
        self.simple.freeze();
        self.text.freeze();
        self.complex.freeze();
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn get_unlocked(&self) -> Self {
        TagInfo {
            attribs: self.attribs.get_unlocked(),
            optional_attribs: self.optional_attribs.get_unlocked(),
            optional: self.optional.get_unlocked(),
            order: self.order.get_unlocked(),
            several: self.several.get_unlocked(),
            simple: self.simple.get_unlocked(),
            text: self.text.get_unlocked(),
            complex: self.complex.get_unlocked(),
            frozen: false,
        }
    }

    fn is_deeply_frozen(&self) -> bool {
        self.frozen
            && self.optional_attribs.is_deeply_frozen()
            && self.order.is_deeply_frozen()
            && self.tag_sets().iter().all(|(_, set)| set.is_deeply_frozen())
    }
}

/// Equal when all fields are equal; the frozen state is ignored
impl PartialEq for TagInfo {
    fn eq(&self, other: &Self) -> bool {
        self.attribs == other.attribs
            && self.optional_attribs == other.optional_attribs
            && self.optional == other.optional
            && self.order == other.order
            && self.several == other.several
            && self.simple == other.simple
            && self.text == other.text
            && self.complex == other.complex
    }
}

impl Repr for TagInfo {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: [(&str, &dyn Repr); 8] = [
            ("attribs", &self.attribs),
            ("optional", &self.optional),
            ("optional_attribs", &self.optional_attribs),
            ("order", &self.order),
            ("several", &self.several),
            ("simple", &self.simple),
            ("text", &self.text),
            ("complex", &self.complex),
        ];

        write!(f, "{{")?;
        for (i, (name, value)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_str_literal(f, name)?;
            write!(f, ": ")?;
            value.fmt_repr(f)?;
        }
        write!(f, "}}")
    }
}
