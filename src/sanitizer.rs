//! Per document entry points
//!
//! [`CoreThemeSanitizer`] ties resolution and dispatch together. The host calls
//! [`CoreThemeSanitizer::add_buffering_hooks`] before it renders the page and
//! [`CoreThemeSanitizer::sanitize`] once on the parsed document.

use crate::dom::DomHandle;
use crate::error::Result;
use crate::hooks::{Hooks, ThemeEnvironment};
use crate::registry::FeatureRegistry;
use crate::resolver::{resolve, ResolvedRuleSet, RuntimeConfig};
use crate::rules::{self, nav_menu, Phase, PostParseContext, PreParseContext, Rule, RuleOutcome};
use tracing::debug;

/// Result of a post-parse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizeOutcome {
    /// The pass ran; every resolved rule with what it did, in run order.
    Completed(Vec<(Rule, RuleOutcome)>),
    /// The document has no `<body>`; nothing ran.
    MissingBody,
}

impl SanitizeOutcome {
    /// Rules that changed the document.
    pub fn applied(&self) -> Vec<Rule> {
        match self {
            SanitizeOutcome::Completed(outcomes) => outcomes
                .iter()
                .filter(|(_, outcome)| outcome.is_applied())
                .map(|(rule, _)| *rule)
                .collect(),
            SanitizeOutcome::MissingBody => Vec::new(),
        }
    }
}

pub struct CoreThemeSanitizer<'r> {
    registry: &'r FeatureRegistry,
    config: RuntimeConfig,
}

impl CoreThemeSanitizer<'static> {
    /// Sanitizer over the built-in registry.
    pub fn new(config: RuntimeConfig) -> Self {
        CoreThemeSanitizer::with_registry(FeatureRegistry::builtin(), config)
    }
}

impl<'r> CoreThemeSanitizer<'r> {
    pub fn with_registry(registry: &'r FeatureRegistry, config: RuntimeConfig) -> Self {
        CoreThemeSanitizer { registry, config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn resolve(&self, phase: Phase) -> ResolvedRuleSet {
        resolve(self.registry, &self.config, phase)
    }

    /// Check the resolved rule parameters before any document is rendered.
    ///
    /// At render time a bad menu button query only makes its rule skip. Loading configuration
    /// calls this to reject it instead.
    pub fn validate(&self) -> Result<()> {
        for resolved in self.resolve(Phase::PostParse).iter() {
            if resolved.rule == Rule::AddNavMenuToggle {
                nav_menu::menu_button_query(&self.config.template, &resolved.params)?;
            }
        }
        Ok(())
    }

    /// Register the pre-parse rules' callbacks. Returns the rules that registered.
    pub fn add_buffering_hooks(&self, hooks: &mut Hooks, env: &dyn ThemeEnvironment) -> Vec<Rule> {
        let mut ctx = PreParseContext {
            theme: &self.config.template,
            env,
            hooks,
        };
        self.resolve(Phase::PreParse)
            .iter()
            .filter_map(|resolved| {
                let outcome = rules::register(resolved.rule, &resolved.params, &mut ctx);
                debug!(rule = %resolved.rule, ?outcome, "pre-parse rule");
                outcome.is_applied().then_some(resolved.rule)
            })
            .collect()
    }

    /// Run the post-parse rules against `dom`, in resolution order.
    pub fn sanitize(&self, dom: &DomHandle) -> SanitizeOutcome {
        if dom.body().is_none() {
            debug!("document has no body, skipping");
            return SanitizeOutcome::MissingBody;
        }

        let ctx = PostParseContext {
            theme: &self.config.template,
            dom,
        };
        let outcomes = self
            .resolve(Phase::PostParse)
            .iter()
            .map(|resolved| {
                let outcome = rules::apply(resolved.rule, &resolved.params, &ctx);
                debug!(rule = %resolved.rule, ?outcome, "post-parse rule");
                (resolved.rule, outcome)
            })
            .collect();
        SanitizeOutcome::Completed(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{append_child, create_element, get_attribute, QueryError};
    use crate::error::RewriteError;
    use crate::hooks::{HookEvent, StaticEnvironment};
    use crate::params::RuleParameters;
    use markup5ever_rcdom::RcDom;

    #[test]
    fn test_missing_body_aborts() {
        let dom = RcDom::default();
        let html = create_element("html", vec![("class", "no-svg")]);
        append_child(&dom.document, html.clone());
        let dom = DomHandle::from_rcdom(dom);

        let sanitizer = CoreThemeSanitizer::new(RuntimeConfig::new("twentyseventeen"));
        assert_eq!(sanitizer.sanitize(&dom), SanitizeOutcome::MissingBody);
        assert_eq!(get_attribute(&html, "class").as_deref(), Some("no-svg"));
    }

    #[test]
    fn test_sanitize_reports_each_rule() {
        let dom = DomHandle::parse(r#"<html class="no-svg"><body></body></html>"#);
        let sanitizer = CoreThemeSanitizer::new(RuntimeConfig::new("twentyseventeen"));
        let outcome = sanitizer.sanitize(&dom);

        let SanitizeOutcome::Completed(outcomes) = &outcome else {
            panic!("expected a completed pass");
        };
        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcome.applied(),
            vec![Rule::ForceSvgSupport, Rule::ForceFixedBackgroundSupport]
        );
    }

    #[test]
    fn test_buffering_hooks_register_per_event() {
        let sanitizer = CoreThemeSanitizer::new(RuntimeConfig::new("twentyseventeen"));
        let mut hooks = Hooks::new();
        let registered = sanitizer.add_buffering_hooks(&mut hooks, &StaticEnvironment::default());

        assert_eq!(registered.len(), 4);
        assert_eq!(hooks.registered(HookEvent::BodyClass), 1);
        assert_eq!(hooks.registered(HookEvent::EnqueueScripts), 2);
        assert_eq!(hooks.registered(HookEvent::NavMenuStartElement), 1);
    }

    #[test]
    fn test_validate_accepts_builtin_queries() {
        for theme in ["twentyseventeen", "twentyfifteen", "unlisted"] {
            let sanitizer = CoreThemeSanitizer::new(RuntimeConfig::new(theme));
            assert!(sanitizer.validate().is_ok(), "{theme}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_menu_button_query() {
        let config = RuntimeConfig::new("twentyseventeen").with_rule(
            "add_nav_menu_toggle",
            RuleParameters::new().with("menu_button_query", "nav//button"),
        );
        let sanitizer = CoreThemeSanitizer::new(config);

        let err = sanitizer.validate().unwrap_err();
        assert!(matches!(
            err,
            RewriteError::Query(QueryError::Expected { offset: 0, .. })
        ));

        // sanitize still degrades to a skip for the same config
        let dom = DomHandle::parse(r#"<nav id="site-navigation"><button></button></nav>"#);
        let SanitizeOutcome::Completed(outcomes) = sanitizer.sanitize(&dom) else {
            panic!("expected a completed pass");
        };
        assert!(outcomes
            .iter()
            .any(|(rule, outcome)| *rule == Rule::AddNavMenuToggle && !outcome.is_applied()));
    }
}
