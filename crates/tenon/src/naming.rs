//! Table naming conventions
//!
//! Converts a model type name into its default table name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How a model type name becomes a table name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `AnotherModel` -> `anothermodel`
    #[default]
    Lowercase,
    /// `AnotherModel` -> `another_model`
    SnakeCase,
    /// `AnotherModel` -> `AnotherModel`
    Verbatim,
}

impl NamingConvention {
    pub fn apply(&self, type_name: &str) -> String {
        match self {
            NamingConvention::Lowercase => type_name.to_lowercase(),
            NamingConvention::SnakeCase => to_snake_case(type_name),
            NamingConvention::Verbatim => type_name.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::Lowercase => "lowercase",
            NamingConvention::SnakeCase => "snake_case",
            NamingConvention::Verbatim => "verbatim",
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingConvention {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lowercase" | "lower" => Ok(NamingConvention::Lowercase),
            "snake_case" | "snake" => Ok(NamingConvention::SnakeCase),
            "verbatim" | "none" => Ok(NamingConvention::Verbatim),
            other => Err(ModelError::configuration(format!(
                "unknown naming convention '{}'",
                other
            ))),
        }
    }
}

/// Snake-case a type name, keeping acronyms together.
///
/// A separator goes before an uppercase letter that follows a lowercase
/// letter or digit, and before the last capital of an acronym that starts
/// a new word (`HTTPRequest` -> `http_request`).
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && prev != '_' {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }

    result
}
