//! Paths a tag name resolves to

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::containers::{Lockable, LockableList};
use crate::repr::{write_str_literal, Repr};

/// The path, or paths, of all tags with one name
///
/// Most tag names occur once in a schema and map to a single path. Names
/// used at several places of the tag tree map to the ordered list of all
/// their paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagPath {
    /// Tag name with a unique path
    Single(String),
    /// Tag name occurring at several paths
    Multiple(LockableList<String>),
}

impl TagPath {
    /// All paths, in order
    pub fn paths(&self) -> Vec<&str> {
        match self {
            TagPath::Single(path) => vec![path.as_str()],
            TagPath::Multiple(paths) => paths.iter().map(String::as_str).collect(),
        }
    }

    /// Check if the tag name resolves to more than one path
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, TagPath::Multiple(paths) if paths.len() > 1)
    }

    /// The single path, if the tag name is not ambiguous
    pub fn unique(&self) -> Option<&str> {
        match self {
            TagPath::Single(path) => Some(path),
            TagPath::Multiple(paths) if paths.len() == 1 => paths.first().map(String::as_str),
            TagPath::Multiple(_) => None,
        }
    }

    /// Check if `path` is one of the paths
    pub fn contains(&self, path: &str) -> bool {
        self.paths().contains(&path)
    }
}

impl From<&str> for TagPath {
    fn from(path: &str) -> Self {
        TagPath::Single(path.to_string())
    }
}

impl From<String> for TagPath {
    fn from(path: String) -> Self {
        TagPath::Single(path)
    }
}

impl From<Vec<String>> for TagPath {
    fn from(paths: Vec<String>) -> Self {
        TagPath::Multiple(paths.into())
    }
}

impl Lockable for TagPath {
    fn freeze(&mut self) {
        if let TagPath::Multiple(paths) = self {
            paths.freeze();
        }
    }

    fn is_frozen(&self) -> bool {
        match self {
            TagPath::Single(_) => true,
            TagPath::Multiple(paths) => paths.is_frozen(),
        }
    }

    fn get_unlocked(&self) -> Self {
        match self {
            TagPath::Single(path) => TagPath::Single(path.clone()),
            TagPath::Multiple(paths) => TagPath::Multiple(paths.get_unlocked()),
        }
    }
}

impl Repr for TagPath {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagPath::Single(path) => write_str_literal(f, path),
            TagPath::Multiple(paths) => paths.fmt_repr(f),
        }
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}
