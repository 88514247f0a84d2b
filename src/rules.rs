//! Rule dispatch table
//!
//! Every rewrite rule is a [`Rule`] variant. The variant carries the rule's configuration name
//! and the phase it runs in, so resolving a configured name is a table lookup and the phase is
//! data rather than something discovered at runtime.
//!
//! | Rule                                  | Phase      | Effect                                  |
//! |---------------------------------------|------------|-----------------------------------------|
//! | `force_svg_support`                   | post-parse | `no-svg` -> `svg` on `<html>`           |
//! | `force_fixed_background_support`      | post-parse | append `background-fixed` on `<html>`   |
//! | `add_has_header_video_body_class`     | pre-parse  | body class filter                       |
//! | `add_twentyseventeen_masthead_styles` | pre-parse  | header media CSS                        |
//! | `add_nav_menu_styles`                 | pre-parse  | navigation CSS for the no-js context    |
//! | `add_nav_menu_toggle`                 | post-parse | state bound menu button                 |
//! | `add_nav_sub_menu_buttons`            | pre-parse  | menu item filter adding dropdown toggles |

pub mod header;
pub mod nav_menu;
pub mod root_class;

use crate::dom::DomHandle;
use crate::hooks::{Hooks, ThemeEnvironment};
use crate::params::RuleParameters;
use std::fmt;

/// Style actions run after the theme's own stylesheet is enqueued at the default priority.
pub const STYLE_PRIORITY: i32 = 11;

/// Handle of the theme stylesheet that inline CSS is attached to.
pub fn stylesheet_handle(theme: &str) -> String {
    format!("{theme}-style")
}

/// When a rule runs relative to DOM construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Registers callbacks before the document exists.
    PreParse,
    /// Mutates the parsed document.
    PostParse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    ForceSvgSupport,
    ForceFixedBackgroundSupport,
    AddTwentyseventeenMastheadStyles,
    AddHasHeaderVideoBodyClass,
    AddNavMenuStyles,
    AddNavMenuToggle,
    AddNavSubMenuButtons,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::ForceSvgSupport,
        Rule::ForceFixedBackgroundSupport,
        Rule::AddTwentyseventeenMastheadStyles,
        Rule::AddHasHeaderVideoBodyClass,
        Rule::AddNavMenuStyles,
        Rule::AddNavMenuToggle,
        Rule::AddNavSubMenuButtons,
    ];

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Rule::ForceSvgSupport => "force_svg_support",
            Rule::ForceFixedBackgroundSupport => "force_fixed_background_support",
            Rule::AddTwentyseventeenMastheadStyles => "add_twentyseventeen_masthead_styles",
            Rule::AddHasHeaderVideoBodyClass => "add_has_header_video_body_class",
            Rule::AddNavMenuStyles => "add_nav_menu_styles",
            Rule::AddNavMenuToggle => "add_nav_menu_toggle",
            Rule::AddNavSubMenuButtons => "add_nav_sub_menu_buttons",
        }
    }

    /// Look a rule up by configuration name. Unknown names are `None`.
    pub fn from_name(name: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|rule| rule.name() == name)
    }

    pub fn phase(self) -> Phase {
        match self {
            Rule::ForceSvgSupport | Rule::ForceFixedBackgroundSupport | Rule::AddNavMenuToggle => {
                Phase::PostParse
            }
            Rule::AddTwentyseventeenMastheadStyles
            | Rule::AddHasHeaderVideoBodyClass
            | Rule::AddNavMenuStyles
            | Rule::AddNavSubMenuButtons => Phase::PreParse,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a rule did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Applied,
    /// Nothing was changed; the reason is for logs and tests.
    Skipped(String),
}

impl RuleOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        RuleOutcome::Skipped(reason.into())
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, RuleOutcome::Applied)
    }
}

/// Inputs for a pre-parse rule.
pub struct PreParseContext<'a> {
    /// Theme identifier used for theme config and stylesheet handles.
    pub theme: &'a str,
    pub env: &'a dyn ThemeEnvironment,
    pub hooks: &'a mut Hooks,
}

/// Inputs for a post-parse rule.
pub struct PostParseContext<'a> {
    pub theme: &'a str,
    pub dom: &'a DomHandle,
}

/// Run a pre-parse rule. Post-parse rules are skipped.
pub fn register(rule: Rule, params: &RuleParameters, ctx: &mut PreParseContext<'_>) -> RuleOutcome {
    match rule {
        Rule::AddHasHeaderVideoBodyClass => header::add_has_header_video_body_class(params, ctx),
        Rule::AddTwentyseventeenMastheadStyles => header::add_masthead_styles(ctx),
        Rule::AddNavMenuStyles => nav_menu::add_nav_menu_styles(params, ctx),
        Rule::AddNavSubMenuButtons => nav_menu::add_nav_sub_menu_buttons(params, ctx),
        Rule::ForceSvgSupport | Rule::ForceFixedBackgroundSupport | Rule::AddNavMenuToggle => {
            RuleOutcome::skipped(format!("{rule} runs after parsing"))
        }
    }
}

/// Run a post-parse rule. Pre-parse rules are skipped.
pub fn apply(rule: Rule, params: &RuleParameters, ctx: &PostParseContext<'_>) -> RuleOutcome {
    match rule {
        Rule::ForceSvgSupport => root_class::force_svg_support(ctx.dom),
        Rule::ForceFixedBackgroundSupport => root_class::force_fixed_background_support(ctx.dom),
        Rule::AddNavMenuToggle => nav_menu::add_nav_menu_toggle(params, ctx),
        Rule::AddTwentyseventeenMastheadStyles
        | Rule::AddHasHeaderVideoBodyClass
        | Rule::AddNavMenuStyles
        | Rule::AddNavSubMenuButtons => RuleOutcome::skipped(format!("{rule} runs before parsing")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve_back() {
        for rule in Rule::ALL {
            assert_eq!(Rule::from_name(rule.name()), Some(rule));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Rule::from_name("adjust_header_height"), None);
        assert_eq!(Rule::from_name("force_svg_suport"), None);
        assert_eq!(Rule::from_name(""), None);
    }

    #[test]
    fn test_phases() {
        assert_eq!(Rule::ForceSvgSupport.phase(), Phase::PostParse);
        assert_eq!(Rule::AddNavMenuToggle.phase(), Phase::PostParse);
        assert_eq!(Rule::AddNavMenuStyles.phase(), Phase::PreParse);
        assert_eq!(Rule::AddNavSubMenuButtons.phase(), Phase::PreParse);
    }

    #[test]
    fn test_wrong_phase_dispatch_is_skipped() {
        let dom = DomHandle::parse(r#"<html class="no-svg"><body></body></html>"#);
        let ctx = PostParseContext {
            theme: "twentyseventeen",
            dom: &dom,
        };
        let outcome = apply(Rule::AddNavMenuStyles, &RuleParameters::new(), &ctx);
        assert!(!outcome.is_applied());
    }
}
