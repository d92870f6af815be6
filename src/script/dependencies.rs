//! Inline libraries and declared dependencies
//!
//! An inline library is a named block of raw script text. Declaring a dependency only records
//! the name; the text is looked up and spliced into the document when the script is rendered.
//! Declarations are deduplicated and kept in first-declaration order.

use super::error::{Result, ScriptError};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File extension picked up by [`InlineLibraries::from_dir`]
pub const LIBRARY_EXTENSION: &str = "ahk";

/// Name → source table of inline libraries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineLibraries {
    sources: HashMap<String, String>,
}

impl InlineLibraries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a library
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }

    /// Load every `*.ahk` file in `dir`, keyed by file stem
    ///
    /// Subdirectories and files with other extensions are ignored.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut libraries = Self::new();
        let entries = fs::read_dir(dir).map_err(|e| ScriptError::io(dir, e))?;

        for entry in entries {
            let path = entry.map_err(|e| ScriptError::io(dir, e))?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(LIBRARY_EXTENSION)
            {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|e| ScriptError::io(&path, e))?;
            libraries.insert(name, source);
        }

        tracing::debug!(dir = %dir.display(), count = libraries.len(), "loaded inline libraries");
        Ok(libraries)
    }

    /// Merge `other` into this table; entries in `other` win
    pub fn extend(&mut self, other: InlineLibraries) {
        self.sources.extend(other.sources);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Library names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for InlineLibraries
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        InlineLibraries {
            sources: iter
                .into_iter()
                .map(|(name, source)| (name.into(), source.into()))
                .collect(),
        }
    }
}

/// Declared dependency names, deduplicated in first-declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    names: IndexSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; returns false if it was already declared
    pub fn declare(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up the source of every declared name, in declaration order
    ///
    /// Fails on the first name without a library; nothing is returned in that case.
    pub fn resolve<'a>(&self, libraries: &'a InlineLibraries) -> Result<Vec<&'a str>> {
        self.iter()
            .map(|name| {
                libraries
                    .get(name)
                    .ok_or_else(|| ScriptError::DependencyNotFound(name.to_string()))
            })
            .collect()
    }
}
