//! Feature registry
//!
//! Maps a theme identifier to the rules that theme needs, in the order they should run. The
//! built-in table is created once and only read afterwards.

use crate::params::RuleParameters;
use crate::rules::Rule;
use crate::theme::{TWENTYFIFTEEN, TWENTYSEVENTEEN};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A rule and the default parameters a theme gives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFeature {
    pub rule: Rule,
    pub params: RuleParameters,
}

impl ThemeFeature {
    pub fn new(rule: Rule) -> Self {
        ThemeFeature {
            rule,
            params: RuleParameters::new(),
        }
    }

    pub fn with_params(rule: Rule, params: RuleParameters) -> Self {
        ThemeFeature { rule, params }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    themes: HashMap<String, Vec<ThemeFeature>>,
}

static BUILTIN: Lazy<FeatureRegistry> = Lazy::new(FeatureRegistry::with_defaults);

impl FeatureRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared built-in registry.
    pub fn builtin() -> &'static FeatureRegistry {
        &BUILTIN
    }

    /// Registry with the supported themes.
    pub fn with_defaults() -> Self {
        FeatureRegistry::new()
            .with_theme(
                TWENTYSEVENTEEN,
                [
                    Rule::ForceSvgSupport,
                    Rule::ForceFixedBackgroundSupport,
                    Rule::AddTwentyseventeenMastheadStyles,
                    Rule::AddHasHeaderVideoBodyClass,
                    Rule::AddNavMenuStyles,
                    Rule::AddNavMenuToggle,
                    Rule::AddNavSubMenuButtons,
                ]
                .into_iter()
                .map(ThemeFeature::new),
            )
            .with_theme(
                TWENTYFIFTEEN,
                [
                    Rule::AddNavMenuStyles,
                    Rule::AddNavMenuToggle,
                    Rule::AddNavSubMenuButtons,
                ]
                .into_iter()
                .map(ThemeFeature::new),
            )
    }

    /// Add or replace a theme's feature list.
    pub fn with_theme(
        mut self,
        theme: impl Into<String>,
        features: impl IntoIterator<Item = ThemeFeature>,
    ) -> Self {
        self.themes
            .insert(theme.into(), features.into_iter().collect());
        self
    }

    pub fn theme_features(&self, theme: &str) -> Option<&[ThemeFeature]> {
        self.themes.get(theme).map(Vec::as_slice)
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.contains_key(theme)
    }

    /// Registered theme identifiers (sorted).
    pub fn themes(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.themes.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes() {
        let registry = FeatureRegistry::builtin();
        assert_eq!(registry.themes(), vec![TWENTYFIFTEEN, TWENTYSEVENTEEN]);
        assert!(!registry.has_theme("twentytwenty"));
    }

    #[test]
    fn test_twentyfifteen_order() {
        let rules: Vec<Rule> = FeatureRegistry::builtin()
            .theme_features(TWENTYFIFTEEN)
            .unwrap()
            .iter()
            .map(|feature| feature.rule)
            .collect();
        assert_eq!(
            rules,
            vec![
                Rule::AddNavMenuStyles,
                Rule::AddNavMenuToggle,
                Rule::AddNavSubMenuButtons
            ]
        );
    }

    #[test]
    fn test_with_theme_replaces() {
        let registry = FeatureRegistry::new()
            .with_theme("custom", [ThemeFeature::new(Rule::ForceSvgSupport)])
            .with_theme("custom", [ThemeFeature::new(Rule::AddNavMenuToggle)]);
        let features = registry.theme_features("custom").unwrap();
        assert_eq!(features, &[ThemeFeature::new(Rule::AddNavMenuToggle)]);
    }
}
