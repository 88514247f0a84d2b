//! Feature resolution
//!
//! Decides which rules run for one document and with which parameters:
//!
//! 1. The theme defaults come from the first theme candidate (child theme, then parent theme)
//!    that has a registry entry; otherwise there are none.
//! 2. Rules the caller asked for explicitly come first, in the caller's order. Names that do
//!    not resolve to a [`Rule`] are dropped.
//! 3. Theme defaults follow in registry order. A rule that was also requested explicitly keeps
//!    its explicit position, and its parameters are the theme defaults overlaid with the
//!    explicit ones.
//! 4. Only rules of the requested [`Phase`] are kept.

use crate::params::RuleParameters;
use crate::registry::FeatureRegistry;
use crate::rules::{Phase, Rule};
use tracing::debug;

/// Per document configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Parent theme identifier; used for theme config and stylesheet handles.
    pub template: String,
    /// Active (child) theme identifier, if different from the template.
    pub stylesheet: Option<String>,
    /// Rules requested by name, in order, with their parameters.
    pub explicit_rules: Vec<(String, RuleParameters)>,
}

impl RuntimeConfig {
    pub fn new(template: impl Into<String>) -> Self {
        RuntimeConfig {
            template: template.into(),
            ..Default::default()
        }
    }

    pub fn with_stylesheet(mut self, stylesheet: impl Into<String>) -> Self {
        self.stylesheet = Some(stylesheet.into());
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, params: RuleParameters) -> Self {
        self.explicit_rules.push((name.into(), params));
        self
    }

    /// Theme identifiers to look up in the registry, in priority order.
    pub fn theme_candidates(&self) -> impl Iterator<Item = &str> {
        self.stylesheet
            .as_deref()
            .into_iter()
            .chain(std::iter::once(self.template.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRule {
    pub rule: Rule,
    pub params: RuleParameters,
}

/// Ordered rules, each rule at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRuleSet {
    rules: Vec<ResolvedRule>,
}

impl ResolvedRuleSet {
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> Vec<Rule> {
        self.rules.iter().map(|resolved| resolved.rule).collect()
    }

    pub fn get(&self, rule: Rule) -> Option<&ResolvedRule> {
        self.rules.iter().find(|resolved| resolved.rule == rule)
    }

    fn get_mut(&mut self, rule: Rule) -> Option<&mut ResolvedRule> {
        self.rules.iter_mut().find(|resolved| resolved.rule == rule)
    }
}

impl<'a> IntoIterator for &'a ResolvedRuleSet {
    type Item = &'a ResolvedRule;
    type IntoIter = std::slice::Iter<'a, ResolvedRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

pub fn resolve(registry: &FeatureRegistry, config: &RuntimeConfig, phase: Phase) -> ResolvedRuleSet {
    let theme_features = config
        .theme_candidates()
        .find_map(|candidate| registry.theme_features(candidate))
        .unwrap_or_default();

    let mut resolved = ResolvedRuleSet::default();

    for (name, params) in &config.explicit_rules {
        let Some(rule) = Rule::from_name(name) else {
            debug!(rule = %name, "dropping unknown rule");
            continue;
        };
        match resolved.get_mut(rule) {
            Some(existing) => existing.params = existing.params.clone().overlaid_with(params),
            None => resolved.rules.push(ResolvedRule {
                rule,
                params: params.clone(),
            }),
        }
    }

    for feature in theme_features {
        match resolved.get_mut(feature.rule) {
            Some(existing) => {
                existing.params = feature.params.clone().overlaid_with(&existing.params);
            }
            None => resolved.rules.push(ResolvedRule {
                rule: feature.rule,
                params: feature.params.clone(),
            }),
        }
    }

    resolved.rules.retain(|resolved| resolved.rule.phase() == phase);
    debug!(?phase, rules = ?resolved.rules(), "resolved rules");
    resolved
}
