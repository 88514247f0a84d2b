//! Host side glue
//!
//! A real host interleaves the two phases with its own rendering. [`DocumentPipeline`] plays
//! that host for a finished HTML string: it registers the pre-parse callbacks, parses the
//! document, feeds the body class and stylesheet callbacks into it, runs the post-parse rules
//! and serializes the result.

use crate::dom::{append_child, create_element, create_text, get_attribute, set_attribute, DomHandle};
use crate::error::Result;
use crate::hooks::{Hooks, InlineStyles, MenuItem, ThemeEnvironment};
use crate::rules::Rule;
use crate::sanitizer::{CoreThemeSanitizer, SanitizeOutcome};
use tracing::debug;

/// A rewritten document together with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    /// Pre-parse rules that registered callbacks.
    pub registered: Vec<Rule>,
    pub outcome: SanitizeOutcome,
}

pub struct DocumentPipeline<'r, E> {
    sanitizer: CoreThemeSanitizer<'r>,
    env: E,
}

impl<'r, E: ThemeEnvironment> DocumentPipeline<'r, E> {
    pub fn new(sanitizer: CoreThemeSanitizer<'r>, env: E) -> Self {
        DocumentPipeline { sanitizer, env }
    }

    pub fn sanitizer(&self) -> &CoreThemeSanitizer<'r> {
        &self.sanitizer
    }

    fn hooks(&self) -> (Hooks, Vec<Rule>) {
        let mut hooks = Hooks::new();
        let registered = self.sanitizer.add_buffering_hooks(&mut hooks, &self.env);
        (hooks, registered)
    }

    /// Rewrite a complete HTML document.
    pub fn render(&self, html: &str) -> Result<RenderedDocument> {
        let (hooks, registered) = self.hooks();
        let dom = DomHandle::parse(html);

        self.apply_body_classes(&hooks, &dom);
        self.inject_inline_styles(&hooks, &dom);

        let outcome = self.sanitizer.sanitize(&dom);
        Ok(RenderedDocument {
            html: dom.serialize()?,
            registered,
            outcome,
        })
    }

    /// Render every menu of one document, returning each item's filtered markup per menu.
    ///
    /// All menus share one [`crate::MenuRenderPass`], so sub-menu state ids keep counting
    /// across menus and never collide within the document. Each call is a new document and
    /// starts again at 1.
    pub fn render_menus(&self, menus: &[Vec<(String, MenuItem)>]) -> Vec<Vec<String>> {
        let (hooks, _) = self.hooks();
        let mut pass = hooks.begin_menu_pass();
        menus
            .iter()
            .map(|items| {
                items
                    .iter()
                    .map(|(html, item)| hooks.filter_menu_item(&mut pass, html.clone(), item))
                    .collect()
            })
            .collect()
    }

    /// Render a document's only menu. Use [`Self::render_menus`] when a document has several.
    pub fn render_menu(&self, items: &[(String, MenuItem)]) -> Vec<String> {
        self.render_menus(&[items.to_vec()])
            .pop()
            .unwrap_or_default()
    }

    fn apply_body_classes(&self, hooks: &Hooks, dom: &DomHandle) {
        let Some(body) = dom.body() else {
            return;
        };
        let current: Vec<String> = get_attribute(&body, "class")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let classes = hooks.body_classes(current.clone(), &self.env);
        if classes != current {
            debug!(?classes, "body classes changed");
            set_attribute(&body, "class", &classes.join(" "));
        }
    }

    fn inject_inline_styles(&self, hooks: &Hooks, dom: &DomHandle) {
        let mut styles = InlineStyles::new();
        hooks.enqueue_scripts(&self.env, &mut styles);
        if styles.is_empty() {
            return;
        }
        let Some(head) = dom.head() else {
            debug!("document has no head, dropping inline styles");
            return;
        };

        let mut handles: Vec<&str> = Vec::new();
        for style in styles.styles() {
            if !handles.contains(&style.handle.as_str()) {
                handles.push(&style.handle);
            }
        }
        for handle in handles {
            let id = format!("{handle}-inline-css");
            let element = create_element("style", vec![("id", id.as_str())]);
            append_child(&element, create_text(&styles.css_for(handle)));
            append_child(&head, element);
        }
    }
}
