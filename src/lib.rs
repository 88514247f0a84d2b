//! Theme markup rewriting for script-free runtimes
//!
//!     Some front-end themes ship JavaScript for their interactive bits: a menu button that
//!     opens the navigation, sub-menu toggles, feature-detection classes on `<html>`. A runtime
//!     that forbids arbitrary scripts can still express this behavior with declarative state
//!     bindings (`<amp-state>`, `[class]`, `on="tap:AMP.setState(...)"`). This crate detects the
//!     theme specific markup and rewrites it into that form.
//!
//! Architecture
//!
//!     - FeatureRegistry: static table of theme identifier -> ordered rules (see registry.rs)
//!     - resolve(): merges caller requested rules over the theme defaults, per phase (resolver.rs)
//!     - theme_config(): selector ids, classes and labels for a theme (theme.rs)
//!     - Rule executors: one per [`Rule`] variant (rules.rs and rules/)
//!     - StateBinding: the shared encoder for declarative state (binding.rs)
//!
//!     Rules run in one of two phases. Pre-parse rules only register callbacks on [`Hooks`]
//!     (body classes, stylesheets, menu item markup) that the host invokes while it renders the
//!     page. Post-parse rules mutate the parsed [`DomHandle`] directly.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── dom.rs                  # RcDom wrapper and node helpers
//!     │   └── query.rs            # structural node queries
//!     │       └── lexer.rs        # logos tokens for queries
//!     ├── params.rs               # RuleParameters
//!     ├── theme.rs                # per theme parameters
//!     ├── template.rs             # slot based CSS templates
//!     ├── markup.rs               # small tag builder for generated markup
//!     ├── binding.rs              # declarative state bindings
//!     ├── hooks.rs                # pre-parse callback queues and collaborator traits
//!     ├── registry.rs
//!     ├── resolver.rs
//!     ├── rules.rs                # Rule dispatch table
//!     │   ├── root_class.rs
//!     │   ├── header.rs
//!     │   └── nav_menu.rs
//!     ├── sanitizer.rs            # CoreThemeSanitizer, the per document entry point
//!     └── pipeline.rs             # host glue: parse, hooks, sanitize, serialize
//!
//! Failure model
//!
//!     Nothing here aborts the host. Unknown rule names are dropped during resolution, rules
//!     whose target nodes are missing do nothing, and a document without a `<body>` is left
//!     untouched. The worst outcome is a page without the added interactivity. Hosts that want
//!     bad configuration rejected up front call [`CoreThemeSanitizer::validate`] once.

pub mod binding;
pub mod dom;
pub mod error;
pub mod hooks;
pub mod markup;
pub mod params;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod sanitizer;
pub mod template;
pub mod theme;

pub use binding::StateBinding;
pub use dom::{DomHandle, NodeQuery};
pub use error::RewriteError;
pub use hooks::{Hooks, InlineStyles, MenuItem, MenuRenderPass, StaticEnvironment, StyleSink, ThemeEnvironment};
pub use params::RuleParameters;
pub use pipeline::{DocumentPipeline, RenderedDocument};
pub use registry::FeatureRegistry;
pub use resolver::{resolve, ResolvedRule, ResolvedRuleSet, RuntimeConfig};
pub use rules::{Phase, Rule, RuleOutcome};
pub use sanitizer::{CoreThemeSanitizer, SanitizeOutcome};
pub use theme::{theme_config, Theme};
