// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

use serde::Serialize;
use std::fmt;

/// Type tag declared for every option in the schema
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text
    String,
    /// Signed decimal integer
    Integer,
    /// On/off flag
    Boolean,
    /// Ordered sequence of strings
    StringList,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::String => "string",
            OptionKind::Integer => "integer",
            OptionKind::Boolean => "boolean",
            OptionKind::StringList => "list",
        };
        f.write_str(name)
    }
}

/// Value held by a configuration option
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text value
    String(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// List of strings
    List(Vec<String>),
    /// No value set
    Unset,
}

impl Value {
    /// Returns the text if this is a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is an `Integer` value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Boolean` value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items if this is a `List` value
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Whether the option holds no value
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(l: Vec<String>) -> Self {
        Value::List(l)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::List(l) => f.write_str(&l.join(" ")),
            Value::Unset => Ok(()),
        }
    }
}

/// Source that provided the current value of an option.
///
/// Ordered by precedence: a value can only be replaced by one coming from
/// the same or a later source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    /// Compiled-in default
    Default,
    /// Configuration file
    File,
    /// Command-line section run
    CommandLine,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Origin::Default => "default",
            Origin::File => "configuration file",
            Origin::CommandLine => "command line",
        };
        f.write_str(name)
    }
}

/// Parse a boolean as written in INI files.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool(" yes "), Some(true));
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_origin_precedence() {
        assert!(Origin::Default < Origin::File);
        assert!(Origin::File < Origin::CommandLine);
    }

    #[test]
    fn test_serialize_untagged() {
        let list = Value::List(vec!["a:1".into(), "b:2".into()]);
        assert_eq!(
            serde_json::to_string(&list).expect("failed to serialize"),
            r#"["a:1","b:2"]"#
        );
        assert_eq!(
            serde_json::to_string(&Value::Unset)
                .expect("failed to serialize"),
            "null"
        );
        assert_eq!(
            serde_json::to_string(&Value::Integer(8082))
                .expect("failed to serialize"),
            "8082"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(5998).to_string(), "5998");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(
            Value::from(vec!["a".to_string(), "b".to_string()]).to_string(),
            "a b"
        );
        assert_eq!(Value::Unset.to_string(), "");
    }

    #[test]
    fn test_is_unset() {
        assert!(Value::Unset.is_unset());
        assert!(!Value::from("").is_unset());
        assert!(!Value::from(0).is_unset());
    }
}
