//! Key normalization policy
//!
//! Case-insensitive containers fold every string key with a policy fixed at
//! construction time. Non-string keys are never normalized; the containers
//! that use a policy only accept string keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Case folding applied to string keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationPolicy {
    /// Fold keys to lower case
    #[default]
    Lower,
    /// Fold keys to upper case
    Upper,
}

impl NormalizationPolicy {
    /// Select the policy from an `upper` flag
    pub fn from_upper(upper: bool) -> Self {
        if upper {
            NormalizationPolicy::Upper
        } else {
            NormalizationPolicy::Lower
        }
    }

    /// Normalize a string key
    pub fn normalize(&self, key: &str) -> String {
        match self {
            NormalizationPolicy::Lower => key.to_lowercase(),
            NormalizationPolicy::Upper => key.to_uppercase(),
        }
    }

    /// Check whether a key is already in normalized form
    pub fn is_normalized(&self, key: &str) -> bool {
        self.normalize(key) == key
    }

    /// Check whether two keys normalize to the same form
    pub fn matches(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }

    /// Get the policy as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationPolicy::Lower => "lower",
            NormalizationPolicy::Upper => "upper",
        }
    }
}

impl FromStr for NormalizationPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lower" => Ok(NormalizationPolicy::Lower),
            "upper" => Ok(NormalizationPolicy::Upper),
            _ => Err(Error::InvalidValue(format!(
                "Invalid normalization policy: '{}'. Must be 'lower' or 'upper'",
                s
            ))),
        }
    }
}

impl fmt::Display for NormalizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
