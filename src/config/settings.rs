// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

use crate::config::{schema, OptionKind, Origin, Section, Value};
use log::*;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Options of a single section, keyed by option name
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionOptions {
    values: BTreeMap<&'static str, Value>,
    #[serde(skip)]
    origins: BTreeMap<&'static str, Origin>,
}

impl SectionOptions {
    fn defaults(section: Section) -> Self {
        let mut options = SectionOptions::default();
        for spec in schema::options(section) {
            let _ = options.values.insert(spec.name, spec.default.to_value());
            let _ = options.origins.insert(spec.name, Origin::Default);
        }
        options
    }

    /// Value of `key`, if the option exists
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Source of the current value of `key`
    pub fn origin(&self, key: &str) -> Option<Origin> {
        self.origins.get(key).copied()
    }

    /// Iterate over all options in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Number of options in the section
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the section declares no options
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolved configuration, queried by section and option name.
///
/// Every section of the schema is always present. Values can only be
/// changed through [`ConfigLoader`](crate::config::ConfigLoader); the
/// resolved settings it returns are read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Settings {
    sections: BTreeMap<Section, SectionOptions>,
    #[serde(skip)]
    loaded_from: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sections: Section::ALL
                .iter()
                .map(|s| (*s, SectionOptions::defaults(*s)))
                .collect(),
            loaded_from: None,
        }
    }
}

impl Settings {
    /// Options of `section`
    pub fn section(&self, section: Section) -> &SectionOptions {
        // Every section is seeded on construction and never removed
        &self.sections[&section]
    }

    /// Value of `key` in `section`
    pub fn get(&self, section: Section, key: &str) -> Option<&Value> {
        self.section(section).get(key)
    }

    /// Source of the current value of `key` in `section`
    pub fn origin(&self, section: Section, key: &str) -> Option<Origin> {
        self.section(section).origin(key)
    }

    /// Text value of `key`, `None` if missing, unset or not a string
    pub fn get_str(&self, section: Section, key: &str) -> Option<&str> {
        self.get(section, key).and_then(Value::as_str)
    }

    /// Integer value of `key`
    pub fn get_integer(&self, section: Section, key: &str) -> Option<i64> {
        self.get(section, key).and_then(Value::as_integer)
    }

    /// Boolean value of `key`
    pub fn get_bool(&self, section: Section, key: &str) -> Option<bool> {
        self.get(section, key).and_then(Value::as_bool)
    }

    /// List value of `key`
    pub fn get_list(&self, section: Section, key: &str) -> Option<&[String]> {
        self.get(section, key).and_then(Value::as_list)
    }

    /// Configuration file merged into these settings, if any
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// Iterate over all sections in schema order
    pub fn iter(&self) -> impl Iterator<Item = (Section, &SectionOptions)> {
        self.sections.iter().map(|(s, o)| (*s, o))
    }

    pub(crate) fn set_loaded_from(&mut self, path: &Path) {
        self.loaded_from = Some(path.to_path_buf());
    }

    /// Store `value` for `key` unless the current value comes from a source
    /// of higher precedence. Returns whether the value was stored.
    pub(crate) fn merge(
        &mut self,
        section: Section,
        key: &'static str,
        value: Value,
        origin: Origin,
    ) -> bool {
        let options = self
            .sections
            .entry(section)
            .or_insert_with(|| SectionOptions::defaults(section));

        if let Some(current) =
            options.origins.get(key).copied().filter(|c| *c > origin)
        {
            debug!(
                "Ignoring {section}.{key} = '{value}' from {origin}, \
                 already set from {current}"
            );
            return false;
        }

        debug!("Setting {section}.{key} = '{value}' from {origin}");
        let _ = options.values.insert(key, value);
        let _ = options.origins.insert(key, origin);
        true
    }

    /// Split list options still holding a delimited string into items
    pub(crate) fn normalize(&mut self) {
        for (section, options) in self.sections.iter_mut() {
            for spec in schema::options(*section) {
                if spec.kind != OptionKind::StringList {
                    continue;
                }
                if let Some(value) = options.values.get_mut(spec.name) {
                    if let Value::String(raw) = value {
                        let items: Vec<String> =
                            raw.split_whitespace().map(String::from).collect();
                        trace!(
                            "Normalized {section}.{} to {items:?}",
                            spec.name
                        );
                        *value = Value::List(items);
                    }
                }
            }
        }
    }
}
