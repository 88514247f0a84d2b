//! Property-based tests for feature resolution
//!
//! Whatever the caller asks for, resolution must:
//! - never yield a rule name that does not exist
//! - yield each rule at most once, and only rules of the requested phase
//! - put explicit rules before theme defaults
//! - let explicit parameters win while keeping theme defaults for other keys

use proptest::prelude::*;
use themebind::registry::ThemeFeature;
use themebind::{resolve, FeatureRegistry, Phase, Rule, RuleParameters, RuntimeConfig};

/// Rule names, real or misspelled
fn rule_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(Rule::ALL.to_vec()).prop_map(|rule| rule.name().to_string()),
        1 => "[a-z_]{1,24}",
        1 => Just("adjust_header_height".to_string()),
    ]
}

fn params_strategy() -> impl Strategy<Value = RuleParameters> {
    prop::collection::btree_map("[a-z_]{1,8}", "[a-z -]{0,8}", 0..4).prop_map(RuleParameters::from)
}

fn theme_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("twentyseventeen".to_string()),
        Just("twentyfifteen".to_string()),
        "[a-z]{3,12}",
    ]
}

fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop_oneof![Just(Phase::PreParse), Just(Phase::PostParse)]
}

fn config_strategy() -> impl Strategy<Value = RuntimeConfig> {
    (
        theme_strategy(),
        prop::collection::vec((rule_name_strategy(), params_strategy()), 0..6),
    )
        .prop_map(|(theme, rules)| {
            rules
                .into_iter()
                .fold(RuntimeConfig::new(theme), |config, (name, params)| {
                    config.with_rule(name, params)
                })
        })
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_resolved_rules_are_unique_and_in_phase(config in config_strategy(), phase in phase_strategy()) {
            let resolved = resolve(FeatureRegistry::builtin(), &config, phase);
            let rules = resolved.rules();
            for (index, rule) in rules.iter().enumerate() {
                prop_assert_eq!(rule.phase(), phase);
                prop_assert!(!rules[index + 1..].contains(rule), "{} repeated", rule);
                prop_assert!(Rule::from_name(rule.name()).is_some());
            }
        }

        #[test]
        fn test_unknown_theme_yields_only_explicit_rules(
            rules in prop::collection::vec((rule_name_strategy(), params_strategy()), 0..6),
            phase in phase_strategy(),
        ) {
            let config = rules
                .iter()
                .cloned()
                .fold(RuntimeConfig::new("not-a-core-theme"), |config, (name, params)| {
                    config.with_rule(name, params)
                });

            let mut expected: Vec<Rule> = Vec::new();
            for (name, _) in &rules {
                if let Some(rule) = Rule::from_name(name) {
                    if rule.phase() == phase && !expected.contains(&rule) {
                        expected.push(rule);
                    }
                }
            }
            prop_assert_eq!(resolve(FeatureRegistry::builtin(), &config, phase).rules(), expected);
        }

        #[test]
        fn test_explicit_rules_precede_theme_defaults(config in config_strategy(), phase in phase_strategy()) {
            let explicit: Vec<Rule> = config
                .explicit_rules
                .iter()
                .filter_map(|(name, _)| Rule::from_name(name))
                .filter(|rule| rule.phase() == phase)
                .collect();
            let rules = resolve(FeatureRegistry::builtin(), &config, phase).rules();
            let explicit_count = rules.iter().filter(|rule| explicit.contains(rule)).count();
            prop_assert!(rules[..explicit_count].iter().all(|rule| explicit.contains(rule)));
            prop_assert!(rules[explicit_count..].iter().all(|rule| !explicit.contains(rule)));
        }

        #[test]
        fn test_explicit_params_win_theme_keys_survive(
            theme_params in params_strategy(),
            explicit_params in params_strategy(),
        ) {
            let registry = FeatureRegistry::new().with_theme(
                "custom",
                [ThemeFeature::with_params(Rule::AddNavMenuToggle, theme_params.clone())],
            );
            let config = RuntimeConfig::new("custom")
                .with_rule(Rule::AddNavMenuToggle.name(), explicit_params.clone());

            let resolved = resolve(&registry, &config, Phase::PostParse);
            let params = &resolved.get(Rule::AddNavMenuToggle).unwrap().params;

            for (key, value) in explicit_params.iter() {
                prop_assert_eq!(params.get(key), Some(value));
            }
            for (key, value) in theme_params.iter() {
                if !explicit_params.contains_key(key) {
                    prop_assert_eq!(params.get(key), Some(value));
                }
            }
        }
    }
}
