//! Tag path syntax
//!
//! Schema descriptions key their tag records by XPath-style paths such as
//! `/fleurInput/atomSpecies/species`. Absolute paths start at the root tag;
//! relative paths (`./lo`, `species/lo`) are resolved against a parent path.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result, SchemaError};

/// Path separator
pub const SEPARATOR: char = '/';

static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}][A-Za-z_0-9.\-\u{B7}\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}]*$")
        .unwrap()
});

/// Check if a string is a valid tag or attribute name
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Check if a path is relative, i.e. does not start at the root
pub fn is_relative(path: &str) -> bool {
    !path.starts_with(SEPARATOR)
}

/// Check if a string is a well-formed tag path
///
/// Every step must be a valid name; relative paths may additionally use
/// `.` and `..` steps. Empty steps (`//`, trailing `/`) are rejected.
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || path == "/" {
        return false;
    }
    let relative = is_relative(path);
    let body = path.strip_prefix(SEPARATOR).unwrap_or(path);
    body.split(SEPARATOR).all(|step| {
        is_valid_name(step) || (relative && (step == "." || step == ".."))
    })
}

/// Return an error if the path is not well-formed
pub fn validate_path(path: &str) -> Result<()> {
    if is_valid_path(path) {
        Ok(())
    } else {
        Err(Error::Schema(
            SchemaError::new("malformed tag path").with_path(path),
        ))
    }
}

/// Split a path into its steps
///
/// ```
/// use schemadict::paths::split_path;
///
/// assert_eq!(split_path("/root/a/b"), vec!["root", "a", "b"]);
/// assert_eq!(split_path("./a"), vec![".", "a"]);
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|step| !step.is_empty()).collect()
}

/// Name of the tag a path points to (its last step)
pub fn tag_name(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or(path)
}

/// Parent of a path, `None` for a single-step path
pub fn parent_path(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches(SEPARATOR);
    match trimmed.rfind(SEPARATOR) {
        Some(0) | None => None,
        Some(pos) => Some(&trimmed[..pos]),
    }
}

/// Join a child path onto a parent path
///
/// An absolute child replaces the parent. A leading `./` on the child is
/// dropped and each leading `../` removes one step from the parent.
pub fn join_path(parent: &str, child: &str) -> String {
    if !is_relative(child) {
        return child.to_string();
    }

    let mut steps = split_path(parent);
    for step in child.split(SEPARATOR).filter(|step| !step.is_empty()) {
        match step {
            "." => {}
            ".." => {
                steps.pop();
            }
            name => steps.push(name),
        }
    }

    let joined = steps.join("/");
    if is_relative(parent) {
        joined
    } else {
        format!("/{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("kPointList"));
        assert!(is_valid_name("spin-up"));
        assert!(is_valid_name("_private"));
        assert!(is_valid_name("lo.1"));

        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1st"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("a/b"));
    }

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/fleurInput"));
        assert!(is_valid_path("/fleurInput/atomSpecies/species"));
        assert!(is_valid_path("./lo"));
        assert!(is_valid_path("../species/lo"));
        assert!(is_valid_path("species"));

        assert!(!is_valid_path(""));
        assert!(!is_valid_path("/"));
        assert!(!is_valid_path("/a//b"));
        assert!(!is_valid_path("/a/b/"));
        assert!(!is_valid_path("/a/./b"));
        assert!(!is_valid_path("/a/b c"));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("/root").is_ok());
        let err = validate_path("/root//x").unwrap_err();
        assert!(err.to_string().contains("/root//x"));
    }

    #[test]
    fn test_is_relative() {
        assert!(is_relative("./a"));
        assert!(is_relative("a/b"));
        assert!(!is_relative("/a"));
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/root/a/b"), vec!["root", "a", "b"]);
        assert_eq!(split_path("a"), vec!["a"]);
        assert!(split_path("/").is_empty());
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("/root/a/species"), "species");
        assert_eq!(tag_name("species"), "species");
        assert_eq!(tag_name("/root/a/"), "a");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/root/a/b"), Some("/root/a"));
        assert_eq!(parent_path("a/b"), Some("a"));
        assert_eq!(parent_path("/root"), None);
        assert_eq!(parent_path("root"), None);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/root/a", "b"), "/root/a/b");
        assert_eq!(join_path("/root/a", "./b"), "/root/a/b");
        assert_eq!(join_path("/root/a", "../b"), "/root/b");
        assert_eq!(join_path("/root/a", "/other"), "/other");
        assert_eq!(join_path("a", "b/c"), "a/b/c");
    }
}
