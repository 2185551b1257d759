//! Simple elements: tags whose text is a vector of primitive values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::containers::{Lockable, LockableList};
use crate::error::{Error, Result};
use crate::repr::{write_str_literal, Repr};

/// Token used for a length without upper bound
pub const UNBOUNDED: &str = "unbounded";

/// Number of values in the text of a simple element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    /// Exactly this many values
    Fixed(usize),
    /// Any number of values
    Unbounded,
}

impl Length {
    /// Parse a length from an integer or the `unbounded` token
    pub fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(UNBOUNDED) {
            return Ok(Length::Unbounded);
        }
        s.parse::<usize>()
            .map(Length::Fixed)
            .map_err(|_| Error::InvalidValue(format!("invalid length: '{}'", s)))
    }

    /// The fixed length, if bounded
    pub fn fixed(&self) -> Option<usize> {
        match self {
            Length::Fixed(n) => Some(*n),
            Length::Unbounded => None,
        }
    }

    /// Check if the length is unbounded
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Length::Unbounded)
    }

    /// Check if `count` values satisfy this length
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Length::Fixed(n) => *n == count,
            Length::Unbounded => true,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Fixed(1)
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Length::from_str(s)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Fixed(n) => write!(f, "{}", n),
            Length::Unbounded => write!(f, "{}", UNBOUNDED),
        }
    }
}

impl Repr for Length {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Fixed(n) => write!(f, "{}", n),
            Length::Unbounded => write_str_literal(f, UNBOUNDED),
        }
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Length::Fixed(n) => serializer.serialize_u64(*n as u64),
            Length::Unbounded => serializer.serialize_str(UNBOUNDED),
        }
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(usize),
            Token(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Length::Fixed(n)),
            Raw::Token(token) => Length::from_str(&token).map_err(serde::de::Error::custom),
        }
    }
}

const NAME: &str = "SimpleElement";

/// Shape of the text content of one simple element
///
/// Serializes as `{"length": ..., "type": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleElement {
    length: Length,
    #[serde(rename = "type")]
    types: LockableList<String>,
    #[serde(skip)]
    frozen: bool,
}

impl SimpleElement {
    /// Create a simple element description
    pub fn new<I, S>(length: Length, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            length,
            types: types.into_iter().map(Into::into).collect(),
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

    /// Number of values
    pub fn length(&self) -> Length {
        self.length
    }

    /// Set the number of values
    pub fn set_length(&mut self, length: Length) -> Result<()> {
        self.check_unlocked("set length")?;
        self.length = length;
        Ok(())
    }

    field_accessors! {
        types, types_mut: LockableList<String>;
    }
}

impl Lockable for SimpleElement {
    fn freeze(&mut self) {
        self.frozen = true;
        self.types.freeze();
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn get_unlocked(&self) -> Self {
        Self {
            length: self.length,
            types: self.types.get_unlocked(),
            frozen: false,
        }
    }

    fn is_deeply_frozen(&self) -> bool {
        self.frozen && self.types.is_deeply_frozen()
    }
}

impl PartialEq for SimpleElement {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.types == other.types
    }
}

impl Eq for SimpleElement {}

impl Repr for SimpleElement {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{'length': ")?;
        self.length.fmt_repr(f)?;
        write!(f, ", 'type': ")?;
        self.types.fmt_repr(f)?;
        write!(f, "}}")
    }
}
