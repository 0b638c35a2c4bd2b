//! Key/value store behind every generated configuration type.
//!
//! A generated type owns one [`IniStore`] and forwards to it: loading the
//! backing file, membership queries, typed reads of raw values and the
//! read-modify-rewrite performed by every setter. The store is not
//! synchronised; callers sharing a backing file must serialise writes.

use crate::delimited::{self, LineReader, KEY_DELIMITER};
use crate::error::{ConfigError, Result};
use crate::field;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Raw `key=value` text loaded from a configuration file, plus the path it
/// was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniStore {
    values: BTreeMap<String, String>,
    file: Option<PathBuf>,
}

impl IniStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the store and repopulate it from `file`.
    ///
    /// Names and values are trimmed of spaces and tabs. Blank lines are
    /// skipped; when a key repeats, the last line wins.
    pub fn load(&mut self, file: &Path) -> Result<()> {
        self.values.clear();

        let reader = LineReader::open(file)
            .map_err(|source| ConfigError::FileOpen {
                path: file.to_path_buf(),
                source,
            })?
            .terminate_on_blank_line(false);
        self.file = Some(file.to_path_buf());

        for line in reader {
            let (_, line) = line.map_err(|source| ConfigError::FileRead {
                path: file.to_path_buf(),
                source,
            })?;
            let (name, value) = delimited::split_pair(&line);
            self.values.insert(
                delimited::trim(&name).to_string(),
                delimited::trim(&value).to_string(),
            );
        }

        debug!(file = %file.display(), entries = self.values.len(), "loaded configuration");
        Ok(())
    }

    /// The file most recently passed to [`load`](Self::load).
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Raw text of `name`, or [`ConfigError::MissingField`].
    pub fn require(&self, name: &str) -> Result<&str> {
        self.raw(name)
            .ok_or_else(|| ConfigError::MissingField(name.to_string()))
    }

    /// Parse the first whitespace-delimited token of `name` as `T`.
    pub fn parse_value<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.require(name)?;
        let token = raw.split_whitespace().next().unwrap_or("");
        token.parse::<T>().map_err(|e| ConfigError::Parse {
            field: name.to_string(),
            raw: raw.to_string(),
            message: e.to_string(),
        })
    }

    /// Read `name` as a boolean: `Y`, `1` and `true` are true, anything else
    /// is false.
    pub fn bool_value(&self, name: &str) -> Result<bool> {
        self.require(name).map(field::parse_bool_literal)
    }

    /// Whether the raw text of `name` is a recognised boolean literal.
    /// Absent fields are not.
    pub fn has_bool_literal(&self, name: &str) -> bool {
        self.raw(name).is_some_and(field::is_bool_literal)
    }

    /// Store `value` under `name` if it differs from the current text.
    ///
    /// Returns whether the store changed.
    pub fn set_raw(&mut self, name: &str, value: &str) -> bool {
        if self.raw(name) == Some(value) {
            return false;
        }
        self.values.insert(name.to_string(), value.to_string());
        true
    }

    /// Rewrite the backing file with `key` set to `value`.
    ///
    /// The file is read again so every other line keeps its current on-disk
    /// value. If no line has `key`, a new line is appended at the end.
    ///
    /// A `$$` in `value` reads back as `=` after a reload; see
    /// [`delimited::format_pair`].
    pub fn write_back(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file.as_deref().ok_or(ConfigError::NoBackingFile)?;
        let read_error = |source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        };

        let reader = LineReader::open(path)
            .map_err(read_error)?
            .terminate_on_blank_line(false);

        let mut pairs = Vec::new();
        let mut found = false;
        for line in reader {
            let (_, line) = line.map_err(read_error)?;
            let (name, mut current) = delimited::split_pair(&line);
            if delimited::trim(&name) == key {
                current = value.to_string();
                found = true;
            }
            pairs.push((name, current));
        }
        if !found {
            pairs.push((key.to_string(), value.to_string()));
        }

        delimited::write_pairs(
            path,
            pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())),
            KEY_DELIMITER,
        )
        .map_err(|source| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(file = %path.display(), key, appended = !found, "wrote configuration value");
        Ok(())
    }

    /// Loaded names and raw values, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
