//! Shared configuration loader for themebind.
//!
//! `defaults/themebind.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer user files and single key
//! overrides on top via [`Loader`] before deserializing into [`ThemebindConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use themebind::{RuleParameters, RuntimeConfig, StaticEnvironment};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/themebind.default.toml");

/// Top-level configuration consumed by themebind applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemebindConfig {
    pub theme: ThemeSection,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSection {
    pub template: String,
    #[serde(default)]
    pub stylesheet: Option<String>,
}

/// One explicitly requested rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// Site facts the pre-parse rules ask about.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub has_header_video: bool,
    #[serde(default)]
    pub icons: BTreeMap<String, String>,
}

impl ThemebindConfig {
    pub fn runtime_config(&self) -> RuntimeConfig {
        let mut runtime = RuntimeConfig::new(self.theme.template.clone());
        runtime.stylesheet = self
            .theme
            .stylesheet
            .clone()
            .filter(|stylesheet| !stylesheet.is_empty());
        runtime.explicit_rules = self
            .rules
            .iter()
            .map(|entry| (entry.name.clone(), RuleParameters::from(entry.params.clone())))
            .collect();
        runtime
    }

    pub fn environment(&self) -> StaticEnvironment {
        StaticEnvironment {
            has_header_video: self.environment.has_header_video,
            icons: self.environment.icons.clone(),
        }
    }
}

/// Builds a [`ThemebindConfig`] from the embedded defaults plus site files and flags.
///
/// Later layers win per key, so a site file can switch `[theme]`, add `rules` and state
/// `[environment]` facts, and a CLI flag still beats the file.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start from the Twenty Seventeen defaults: no explicit rules, no header video.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a site's TOML file. A missing file fails [`Loader::build`].
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a site's TOML file only when it exists, e.g. a per-project `themebind.toml`.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one key, e.g. `theme.template` from `--theme`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers. Fails on unreadable files or a section that no longer deserializes,
    /// such as a rule entry without a `name`.
    pub fn build(self) -> Result<ThemebindConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone, as a host without a site file sees them.
pub fn load_defaults() -> Result<ThemebindConfig, ConfigError> {
    Loader::new().build()
}
