//! Line-oriented `key = value;` configuration records.
//!
//! One input file carries both the common simulation keys and the
//! model-specific keys, so the parser keeps every record and lets each
//! consumer pull the keys it needs. Unknown keys are never an error.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::ConfigError;

/// Parsed configuration records, in file order.
///
/// A key that appears more than once keeps its last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigRecords {
    entries: IndexMap<String, String>,
}

impl ConfigRecords {
    /// Parse configuration text.
    ///
    /// Each record has the form `KEY = VALUE;`. Blank lines and lines whose
    /// first non-blank character is `#` are skipped, as are lines without
    /// an `=`. The value runs up to the first `;` (or end of line) and is
    /// trimmed.
    pub fn parse(text: &str) -> Self {
        let mut entries = IndexMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, rest)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = rest.split(';').next().unwrap_or("").trim();
            entries.insert(key.to_string(), value.to_string());
        }
        Self { entries }
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::parse(&text))
    }

    /// Raw value text for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a record, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no records were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the value of a required key.
    pub fn require<T: FromStr>(&self, key: &str) -> Result<T, ConfigError> {
        let raw = self.get(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_string(),
        })?;
        parse_value(key, raw)
    }

    /// Parse the value of an optional key.
    pub fn optional<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get(key).map(|raw| parse_value(key, raw)).transpose()
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
