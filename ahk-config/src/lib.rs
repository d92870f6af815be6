//! Configuration loader for the ahk script builder.
//!
//! `defaults/ahk.default.toml` is embedded into every binary so that the documented defaults
//! and runtime behavior stay in sync. Applications layer user files and single-key overrides
//! on top of those defaults via [`Loader`] before deserializing into [`AhkConfig`], then turn
//! the result into [`ScriptOptions`] with [`AhkConfig::script_options`].

use ahk::{InlineLibraries, ScriptOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/ahk.default.toml");

/// Top-level configuration consumed by ahk applications.
#[derive(Debug, Clone, Deserialize)]
pub struct AhkConfig {
    pub output: OutputConfig,
    pub libraries: LibrariesConfig,
}

/// How scripts are laid out and where they are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub indent_unit: String,
    pub root_dir: PathBuf,
}

/// Where inline libraries come from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibrariesConfig {
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
    #[serde(default)]
    pub inline: HashMap<String, String>,
}

impl AhkConfig {
    /// Builder options for this configuration
    ///
    /// Every library directory is loaded in order, later directories replacing earlier
    /// libraries of the same name; inline entries are applied last.
    pub fn script_options(&self) -> ahk::Result<ScriptOptions> {
        let mut libraries = InlineLibraries::new();
        for dir in &self.libraries.dirs {
            libraries.extend(InlineLibraries::from_dir(dir)?);
        }
        libraries.extend(self.libraries.inline.clone().into_iter().collect());
        tracing::debug!(libraries = libraries.len(), "resolved script options");

        Ok(ScriptOptions {
            inline_libraries: libraries,
            indent_unit: self.output.indent_unit.clone(),
            root_dir: self.output.root_dir.clone(),
        })
    }
}

/// Layers user configuration over the embedded defaults
///
/// Sources apply in the order they are added, later ones winning: the defaults, then each
/// TOML file, then single-key overrides such as `output.indent_unit` or
/// `libraries.inline.add`.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file that must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists, e.g. an `ahk.toml` next to the manifest
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        tracing::debug!(path = %path.display(), required, "layering config file");
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Override one key from a `key=value` assignment
    ///
    /// The value is taken as text; `\t` and `\n` escapes are expanded so indent units and
    /// inline library sources can be given on a command line.
    pub fn set_assignment(self, assignment: &str) -> Result<Self, ConfigError> {
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(ConfigError::Message(format!(
                "expected KEY=VALUE, got '{assignment}'"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Message(format!(
                "missing key in '{assignment}'"
            )));
        }
        self.set_override(key, value.replace("\\t", "\t").replace("\\n", "\n"))
    }

    pub fn build(self) -> Result<AhkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AhkConfig, ConfigError> {
    Loader::new().build()
}
