//! Pre-parse hook registration
//!
//! Pre-parse rules never see the DOM. They register callbacks that the host invokes while it
//! produces the page: when it computes `<body>` classes, when it enqueues stylesheets, and
//! once per navigation menu item it renders. Each event has its own queue ordered by
//! priority (lower first) and then by registration order.
//!
//! The host side collaborators are traits: [`ThemeEnvironment`] answers questions about the
//! site (is there a header video, what does an icon look like) and [`StyleSink`] receives
//! inline CSS.

use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

pub const DEFAULT_PRIORITY: i32 = 10;

/// Events a callback can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    BodyClass,
    EnqueueScripts,
    NavMenuStartElement,
}

impl HookEvent {
    pub fn name(self) -> &'static str {
        match self {
            HookEvent::BodyClass => "body_class",
            HookEvent::EnqueueScripts => "wp_enqueue_scripts",
            HookEvent::NavMenuStartElement => "walker_nav_menu_start_el",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Site level facts queried by pre-parse callbacks.
pub trait ThemeEnvironment {
    fn has_header_video(&self) -> bool;

    /// Markup for a named theme icon, if the theme provides one.
    fn theme_icon(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Receiver for inline stylesheet text.
pub trait StyleSink {
    fn inject_styles(&mut self, handle: &str, css: &str);
}

/// A [`ThemeEnvironment`] backed by fixed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub has_header_video: bool,
    pub icons: BTreeMap<String, String>,
}

impl ThemeEnvironment for StaticEnvironment {
    fn has_header_video(&self) -> bool {
        self.has_header_video
    }

    fn theme_icon(&self, name: &str) -> Option<String> {
        self.icons.get(name).filter(|icon| !icon.is_empty()).cloned()
    }
}

/// One injected stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineStyle {
    pub handle: String,
    pub css: String,
}

/// A [`StyleSink`] that keeps everything it receives, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyles {
    styles: Vec<InlineStyle>,
}

impl InlineStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(&self) -> &[InlineStyle] {
        &self.styles
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// All CSS registered for `handle`, joined by newlines.
    pub fn css_for(&self, handle: &str) -> String {
        self.styles
            .iter()
            .filter(|style| style.handle == handle)
            .map(|style| style.css.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StyleSink for InlineStyles {
    fn inject_styles(&mut self, handle: &str, css: &str) {
        self.styles.push(InlineStyle {
            handle: handle.to_string(),
            css: css.to_string(),
        });
    }
}

/// Remove the `<style>` tags a CSS block was authored in; sinks want bare CSS.
pub fn strip_style_wrapper(css: &str) -> String {
    css.replace("<style>", "").replace("</style>", "")
}

/// A navigation menu item as seen by menu item filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItem {
    pub classes: Vec<String>,
}

impl MenuItem {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MenuItem {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// State for one menu rendering pass.
///
/// Menu item numbering restarts with every pass, so two renders of the same menu produce the
/// same state ids.
#[derive(Debug, Default)]
pub struct MenuRenderPass {
    items_numbered: u32,
}

impl MenuRenderPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number for the next item that needs one, starting at 1.
    pub fn next_item_number(&mut self) -> u32 {
        self.items_numbered += 1;
        self.items_numbered
    }

    pub fn items_numbered(&self) -> u32 {
        self.items_numbered
    }
}

pub type BodyClassFilter = dyn Fn(Vec<String>, &dyn ThemeEnvironment) -> Vec<String>;
pub type EnqueueAction = dyn Fn(&dyn ThemeEnvironment, &mut dyn StyleSink);
pub type MenuItemFilter = dyn Fn(String, &MenuItem, &mut MenuRenderPass) -> String;

struct HookEntry<F: ?Sized> {
    priority: i32,
    callback: Box<F>,
}

/// Callbacks for one event, kept sorted by priority then registration order.
pub struct HookQueue<F: ?Sized> {
    event: HookEvent,
    entries: Vec<HookEntry<F>>,
}

impl<F: ?Sized> HookQueue<F> {
    fn new(event: HookEvent) -> Self {
        HookQueue {
            event,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, priority: i32, callback: Box<F>) {
        // After every entry with the same or a lower priority.
        let index = self.entries.partition_point(|entry| entry.priority <= priority);
        trace!(event = %self.event, priority, position = index, "registering hook");
        self.entries.insert(index, HookEntry { priority, callback });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn callbacks(&self) -> impl Iterator<Item = &F> {
        self.entries.iter().map(|entry| entry.callback.as_ref())
    }
}

/// All pre-parse callback queues for one document.
pub struct Hooks {
    body_class: HookQueue<BodyClassFilter>,
    enqueue_scripts: HookQueue<EnqueueAction>,
    nav_menu_start_el: HookQueue<MenuItemFilter>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Hooks {
            body_class: HookQueue::new(HookEvent::BodyClass),
            enqueue_scripts: HookQueue::new(HookEvent::EnqueueScripts),
            nav_menu_start_el: HookQueue::new(HookEvent::NavMenuStartElement),
        }
    }

    pub fn add_body_class_filter<F>(&mut self, priority: i32, filter: F)
    where
        F: Fn(Vec<String>, &dyn ThemeEnvironment) -> Vec<String> + 'static,
    {
        self.body_class.add(priority, Box::new(filter));
    }

    pub fn add_enqueue_action<F>(&mut self, priority: i32, action: F)
    where
        F: Fn(&dyn ThemeEnvironment, &mut dyn StyleSink) + 'static,
    {
        self.enqueue_scripts.add(priority, Box::new(action));
    }

    pub fn add_menu_item_filter<F>(&mut self, priority: i32, filter: F)
    where
        F: Fn(String, &MenuItem, &mut MenuRenderPass) -> String + 'static,
    {
        self.nav_menu_start_el.add(priority, Box::new(filter));
    }

    /// Number of callbacks registered for `event`.
    pub fn registered(&self, event: HookEvent) -> usize {
        match event {
            HookEvent::BodyClass => self.body_class.len(),
            HookEvent::EnqueueScripts => self.enqueue_scripts.len(),
            HookEvent::NavMenuStartElement => self.nav_menu_start_el.len(),
        }
    }

    /// Run the body class filters over `classes`.
    pub fn body_classes(&self, classes: Vec<String>, env: &dyn ThemeEnvironment) -> Vec<String> {
        self.body_class
            .callbacks()
            .fold(classes, |classes, filter| filter(classes, env))
    }

    /// Run the stylesheet actions.
    pub fn enqueue_scripts(&self, env: &dyn ThemeEnvironment, sink: &mut dyn StyleSink) {
        for action in self.enqueue_scripts.callbacks() {
            action(env, sink);
        }
    }

    /// Start a menu rendering pass with fresh numbering.
    pub fn begin_menu_pass(&self) -> MenuRenderPass {
        MenuRenderPass::new()
    }

    /// Run the menu item filters over one rendered item.
    pub fn filter_menu_item(
        &self,
        pass: &mut MenuRenderPass,
        item_html: String,
        item: &MenuItem,
    ) -> String {
        self.nav_menu_start_el
            .callbacks()
            .fold(item_html, |html, filter| filter(html, item, pass))
    }
}
