//! The composite description of one schema version

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::simple::SimpleElement;
use super::tag_info::{SetOperation, TagInfo};
use super::tag_path::TagPath;
use super::STRING_TYPE;
use crate::containers::{
    CaseInsensitiveDict, CaseInsensitiveFrozenSet, Lockable, LockableDict, LockableList,
};
use crate::error::{Error, Result, SchemaError};
use crate::paths::{is_valid_path, tag_name};
use crate::repr::{write_str_literal, Repr};

const NAME: &str = "SchemaDescription";

/// Everything known about one schema version
///
/// A description is filled by a schema parser through the `*_mut`
/// accessors, frozen once with [`Lockable::freeze`] and only read from
/// then on. Every `*_mut` accessor fails with `ContainerFrozen` on a
/// frozen description, and all nested containers reject mutation on their
/// own. Derived descriptions are built from [`Lockable::get_unlocked`].
///
/// Deserialized descriptions are unlocked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaDescription {
    version: String,
    root_tag: String,
    tag_paths: CaseInsensitiveDict<TagPath>,
    attrib_types: CaseInsensitiveDict<LockableList<String>>,
    unique_attribs: CaseInsensitiveDict<String>,
    unique_path_attribs: CaseInsensitiveDict<LockableList<String>>,
    other_attribs: CaseInsensitiveDict<LockableList<String>>,
    tag_info: LockableDict<String, TagInfo>,
    omitt_contained_tags: LockableList<String>,
    simple_elements: CaseInsensitiveDict<LockableList<SimpleElement>>,
    #[serde(skip)]
    frozen: bool,
}

impl SchemaDescription {
    /// Create an empty, unlocked description
    pub fn new(version: impl Into<String>, root_tag: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            root_tag: root_tag.into(),
            ..Self::default()
        }
    }

    fn check_unlocked(&self, operation: &'static str) -> Result<()> {
        if self.frozen {
            Err(Error::frozen(NAME, operation))
        } else {
            Ok(())
        }
    }

    /// Schema version, e.g. `"0.34"`
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Set the schema version
    pub fn set_version(&mut self, version: impl Into<String>) -> Result<()> {
        self.check_unlocked("set version")?;
        self.version = version.into();
        Ok(())
    }

    /// Name of the root tag
    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    /// Set the name of the root tag
    pub fn set_root_tag(&mut self, root_tag: impl Into<String>) -> Result<()> {
        self.check_unlocked("set root_tag")?;
        self.root_tag = root_tag.into();
        Ok(())
    }

    field_accessors! {
        tag_paths, tag_paths_mut: CaseInsensitiveDict<TagPath>;
        attrib_types, attrib_types_mut: CaseInsensitiveDict<LockableList<String>>;
        unique_attribs, unique_attribs_mut: CaseInsensitiveDict<String>;
        unique_path_attribs, unique_path_attribs_mut: CaseInsensitiveDict<LockableList<String>>;
        other_attribs, other_attribs_mut: CaseInsensitiveDict<LockableList<String>>;
        tag_info, tag_info_mut: LockableDict<String, TagInfo>;
        omitt_contained_tags, omitt_contained_tags_mut: LockableList<String>;
        simple_elements, simple_elements_mut: CaseInsensitiveDict<LockableList<SimpleElement>>;
    }

    /// Collect every structural inconsistency of the description
    pub fn check(&self) -> Vec<SchemaError> {
        let mut errors = Vec::new();
        self.check_tag_paths(&mut errors);
        self.check_attribs(&mut errors);
        self.check_tag_info(&mut errors);
        self.check_simple_elements(&mut errors);
        errors
    }

    /// Check the description for structural consistency
    ///
    /// Returns the first inconsistency found; use [`check`](Self::check)
    /// to get all of them.
    pub fn validate(&self) -> Result<()> {
        let errors = self.check();
        debug!(
            version = %self.version,
            errors = errors.len(),
            "validated schema description"
        );
        match errors.into_iter().next() {
            Some(error) => Err(Error::Schema(error)),
            None => Ok(()),
        }
    }

    fn check_tag_paths(&self, errors: &mut Vec<SchemaError>) {
        for (tag, paths) in self.tag_paths.iter() {
            for path in paths.paths() {
                if !is_valid_path(path) {
                    errors.push(
                        SchemaError::new("malformed tag path")
                            .with_name(tag)
                            .with_path(path),
                    );
                } else if self.tag_paths.normalize(tag_name(path)) != self.tag_paths.normalize(tag)
                {
                    errors.push(
                        SchemaError::new("tag path does not end with its tag name")
                            .with_name(tag)
                            .with_path(path),
                    );
                }
            }
        }
    }

    fn check_attribs(&self, errors: &mut Vec<SchemaError>) {
        for (name, types) in self.attrib_types.iter() {
            let position = types.iter().position(|t| t == STRING_TYPE);
            if matches!(position, Some(i) if i + 1 != types.len()) {
                errors.push(
                    SchemaError::new(format!("'{}' type must be listed last", STRING_TYPE))
                        .with_name(name),
                );
            }
        }

        for (name, path) in self.unique_attribs.iter() {
            if !is_valid_path(path) {
                errors.push(
                    SchemaError::new("malformed attribute path")
                        .with_name(name)
                        .with_path(path.as_str()),
                );
            }
        }
        let listed = self.unique_path_attribs.iter().chain(self.other_attribs.iter());
        for (name, paths) in listed {
            for path in paths.iter().filter(|path| !is_valid_path(path)) {
                errors.push(
                    SchemaError::new("malformed attribute path")
                        .with_name(name)
                        .with_path(path.as_str()),
                );
            }
        }

        for name in self.unique_attribs.keys() {
            if self.unique_path_attribs.contains(name) || self.other_attribs.contains(name) {
                errors.push(
                    SchemaError::new("attribute is listed in more than one partition")
                        .with_name(name),
                );
            }
        }
        for name in self.unique_path_attribs.keys() {
            if self.other_attribs.contains(name) {
                errors.push(
                    SchemaError::new("attribute is listed in more than one partition")
                        .with_name(name),
                );
            }
        }
    }

    fn check_tag_info(&self, errors: &mut Vec<SchemaError>) {
        for (path, info) in self.tag_info.iter() {
            if !is_valid_path(path) {
                errors.push(SchemaError::new("malformed tag path").with_path(path.as_str()));
            }

            for name in info.optional_attribs().keys() {
                if !info.attribs().contains(name) {
                    errors.push(
                        SchemaError::new("optional attribute is not an allowed attribute")
                            .with_name(name)
                            .with_path(path.as_str()),
                    );
                }
            }

            if info.order().is_empty() {
                continue;
            }
            let order: CaseInsensitiveFrozenSet = info.order().iter().collect();
            for (field, set) in info.tag_sets().iter().skip(1) {
                for tag in set.iter().filter(|tag| !order.contains(tag)) {
                    errors.push(
                        SchemaError::new(format!("'{}' tag is missing from order", field))
                            .with_name(tag)
                            .with_path(path.as_str()),
                    );
                }
            }
        }
    }

    fn check_simple_elements(&self, errors: &mut Vec<SchemaError>) {
        for (name, elements) in self.simple_elements.iter() {
            if elements.iter().any(|element| element.length().fixed() == Some(0)) {
                errors.push(
                    SchemaError::new("simple element length must be positive").with_name(name),
                );
            }
        }
    }

    /// Combine the tag records of two descriptions path by path
    ///
    /// Paths present in only one description are kept or dropped the way
    /// the operation keeps elements; records of shared paths are combined
    /// with [`TagInfo::combine`]. The result is unlocked.
    pub fn combine_tag_info(
        &self,
        other: &SchemaDescription,
        op: SetOperation,
    ) -> LockableDict<String, TagInfo> {
        let mut combined = IndexMap::new();
        for (path, info) in self.tag_info.iter() {
            match other.tag_info.get(path.as_str()) {
                Ok(other_info) => {
                    combined.insert(path.clone(), info.combine(other_info, op));
                }
                Err(_) if op != SetOperation::Intersection => {
                    combined.insert(path.clone(), info.get_unlocked());
                }
                Err(_) => {}
            }
        }
        if op == SetOperation::Union {
            for (path, info) in other.tag_info.iter() {
                if !self.tag_info.contains(path.as_str()) {
                    combined.insert(path.clone(), info.get_unlocked());
                }
            }
        }
        debug!(
            operation = %op,
            left = %self.version,
            right = %other.version,
            paths = combined.len(),
            "combined tag info"
        );
        LockableDict::from(combined)
    }
}

impl Lockable for SchemaDescription {
    fn freeze(&mut self) {
        if !self.frozen {
            debug!(
                version = %self.version,
                tags = self.tag_paths.len(),
                paths = self.tag_info.len(),
                "freezing schema description"
            );
            self.frozen = true;
        }
        self.tag_paths.freeze();
        self.attrib_types.freeze();
        self.unique_attribs.freeze();
        self.unique_path_attribs.freeze();
        self.other_attribs.freeze();
        self.tag_info.freeze();
        self.omitt_contained_tags.freeze();
        self.simple_elements.freeze();
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn get_unlocked(&self) -> Self {
        debug!(version = %self.version, "unlocked copy of schema description");
        Self {
            version: self.version.clone(),
            root_tag: self.root_tag.clone(),
            tag_paths: self.tag_paths.get_unlocked(),
            attrib_types: self.attrib_types.get_unlocked(),
            unique_attribs: self.unique_attribs.get_unlocked(),
            unique_path_attribs: self.unique_path_attribs.get_unlocked(),
            other_attribs: self.other_attribs.get_unlocked(),
            tag_info: self.tag_info.get_unlocked(),
            omitt_contained_tags: self.omitt_contained_tags.get_unlocked(),
            simple_elements: self.simple_elements.get_unlocked(),
            frozen: false,
        }
    }

    fn is_deeply_frozen(&self) -> bool {
        self.frozen
            && self.tag_paths.is_deeply_frozen()
            && self.attrib_types.is_deeply_frozen()
            && self.unique_attribs.is_deeply_frozen()
            && self.unique_path_attribs.is_deeply_frozen()
            && self.other_attribs.is_deeply_frozen()
            && self.tag_info.is_deeply_frozen()
            && self.omitt_contained_tags.is_deeply_frozen()
            && self.simple_elements.is_deeply_frozen()
    }
}

/// Equal when all fields are equal; the frozen state is ignored
impl PartialEq for SchemaDescription {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.root_tag == other.root_tag
            && self.tag_paths == other.tag_paths
            && self.attrib_types == other.attrib_types
            && self.unique_attribs == other.unique_attribs
            && self.unique_path_attribs == other.unique_path_attribs
            && self.other_attribs == other.other_attribs
            && self.tag_info == other.tag_info
            && self.omitt_contained_tags == other.omitt_contained_tags
            && self.simple_elements == other.simple_elements
    }
}

impl Repr for SchemaDescription {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: [(&str, &dyn Repr); 10] = [
            ("version", &self.version),
            ("root_tag", &self.root_tag),
            ("tag_paths", &self.tag_paths),
            ("attrib_types", &self.attrib_types),
            ("unique_attribs", &self.unique_attribs),
            ("unique_path_attribs", &self.unique_path_attribs),
            ("other_attribs", &self.other_attribs),
            ("tag_info", &self.tag_info),
            ("omitt_contained_tags", &self.omitt_contained_tags),
            ("simple_elements", &self.simple_elements),
        ];

        write!(f, "{}({{", NAME)?;
        for (i, (name, value)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_str_literal(f, name)?;
            write!(f, ": ")?;
            value.fmt_repr(f)?;
        }
        write!(f, "}})")
    }
}

impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_repr(f)
    }
}
