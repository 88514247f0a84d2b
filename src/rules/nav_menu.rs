//! Navigation menu rules
//!
//! The themes open the main menu and expand sub-menus from script. Here the same behavior is
//! expressed with state bindings:
//!
//! - `add_nav_menu_styles`: CSS so the no-js page shows the toggle buttons and hides closed
//!   sub-menus (pre-parse)
//! - `add_nav_menu_toggle`: binds the menu button and the nav container to one
//!   `navMenuToggledOn` state (post-parse)
//! - `add_nav_sub_menu_buttons`: appends a state plus a dropdown button to every menu item
//!   that has children, as the host renders it (pre-parse)

use super::{stylesheet_handle, PostParseContext, PreParseContext, RuleOutcome, STYLE_PRIORITY};
use crate::binding::{ConditionalAttribute, StateBinding};
use crate::dom::{get_attribute, insert_before, parent_of, set_attribute, NodeQuery, QueryError};
use crate::hooks::{strip_style_wrapper, MenuItem, MenuRenderPass, DEFAULT_PRIORITY};
use crate::markup::Tag;
use crate::params::RuleParameters;
use crate::template::{Template, TemplateError};
use crate::theme::{theme_config, Theme};
use tracing::{debug, warn};

pub const NAV_MENU_TOGGLE_STATE: &str = "navMenuToggledOn";
pub const SUB_MENU_STATE_PREFIX: &str = "navMenuItemExpanded";
pub const HAS_CHILDREN_CLASS: &str = "menu-item-has-children";
pub const CURRENT_ANCESTOR_CLASS: &str = "current-menu-ancestor";
pub const SUB_MENU_ICON: &str = "angle-down";

const NAV_MENU_CSS: &str = include_str!("../../css/nav-menu.css");
const TWENTYSEVENTEEN_NAV_MENU_CSS: &str = include_str!("../../css/nav-menu-twentyseventeen.css");
const TWENTYFIFTEEN_NAV_MENU_CSS: &str = include_str!("../../css/nav-menu-twentyfifteen.css");

fn param<'a>(args: &'a RuleParameters, key: &str) -> &'a str {
    args.get(key).unwrap_or_default()
}

/// The nav menu stylesheet for `theme`: shared rules, then the theme's own breakpoints.
pub fn nav_menu_template(theme: &str) -> Result<Template, TemplateError> {
    let template = Template::parse(NAV_MENU_CSS)?;
    Ok(match Theme::from_slug(theme) {
        Some(Theme::TwentySeventeen) => template.then(Template::parse(TWENTYSEVENTEEN_NAV_MENU_CSS)?),
        Some(Theme::TwentyFifteen) => template.then(Template::parse(TWENTYFIFTEEN_NAV_MENU_CSS)?),
        None => template,
    })
}

/// The configured menu button query for `theme`, after explicit params are overlaid.
pub fn menu_button_query(theme: &str, params: &RuleParameters) -> Result<NodeQuery, QueryError> {
    let args = theme_config(theme).overlaid_with(params);
    NodeQuery::parse(param(&args, "menu_button_query"))
}

pub fn add_nav_menu_styles(params: &RuleParameters, ctx: &mut PreParseContext<'_>) -> RuleOutcome {
    let args = theme_config(ctx.theme).overlaid_with(params);

    let css = match nav_menu_template(ctx.theme).and_then(|template| template.render(&args)) {
        Ok(css) => strip_style_wrapper(&css),
        Err(err) => {
            warn!(theme = ctx.theme, %err, "nav menu styles not registered");
            return RuleOutcome::skipped(err.to_string());
        }
    };

    let handle = stylesheet_handle(ctx.theme);
    ctx.hooks.add_enqueue_action(STYLE_PRIORITY, move |_, sink| {
        sink.inject_styles(&handle, &css);
    });
    RuleOutcome::Applied
}

/// Bind the menu button and nav container to a shared toggle state.
///
/// Every lookup happens before the first mutation, so a document that lacks the container or
/// the button is left exactly as it was.
pub fn add_nav_menu_toggle(params: &RuleParameters, ctx: &PostParseContext<'_>) -> RuleOutcome {
    let args = theme_config(ctx.theme).overlaid_with(params);

    let nav_id = param(&args, "nav_container_id");
    let Some(nav) = ctx.dom.get_element_by_id(nav_id) else {
        debug!(nav_id, "nav container not found");
        return RuleOutcome::skipped(format!("no element with id `{nav_id}`"));
    };
    if parent_of(&nav).is_none() {
        return RuleOutcome::skipped("nav container is detached");
    }

    let query = match menu_button_query(ctx.theme, params) {
        Ok(query) => query,
        Err(err) => {
            warn!(%err, "unusable menu button query");
            return RuleOutcome::skipped(err.to_string());
        }
    };
    let Some(button) = query.first(&ctx.dom.document()) else {
        debug!(query = query.as_str(), "menu button not found");
        return RuleOutcome::skipped(format!("no match for `{}`", query.as_str()));
    };

    let state = StateBinding::new(NAV_MENU_TOGGLE_STATE, false);

    let nav_class = get_attribute(&nav, "class").unwrap_or_default();
    let nav_toggle = format!(" {}", param(&args, "nav_container_toggle_class"));
    for bound in state.bind(&[ConditionalAttribute {
        name: "class",
        static_value: &nav_class,
        when_true: &nav_toggle,
    }]) {
        set_attribute(&nav, &bound.name, &bound.expression);
    }

    insert_before(&nav, state.declaration());

    let button_class = get_attribute(&button, "class").unwrap_or_default();
    let button_toggle = format!(" {}", param(&args, "menu_button_toggle_class"));
    set_attribute(&button, "on", &state.toggle_action());
    set_attribute(&button, "aria-expanded", "false");
    set_attribute(&button, "[aria-expanded]", &state.boolean_expression());
    for bound in state.bind(&[ConditionalAttribute {
        name: "class",
        static_value: &button_class,
        when_true: &button_toggle,
    }]) {
        set_attribute(&button, &bound.name, &bound.expression);
    }

    debug!(nav_id, "nav menu toggle bound");
    RuleOutcome::Applied
}

/// Parameters for the sub-menu dropdown buttons, fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMenuButtons {
    dropdown_class: String,
    toggle_class: String,
    icon: Option<String>,
    /// (expand, collapse)
    labels: Option<(String, String)>,
}

impl SubMenuButtons {
    pub fn from_params(args: &RuleParameters) -> Self {
        let labels = match (args.get("expand_text"), args.get("collapse_text")) {
            (Some(expand), Some(collapse)) => Some((expand.to_string(), collapse.to_string())),
            _ => None,
        };
        SubMenuButtons {
            dropdown_class: param(args, "dropdown_class").to_string(),
            toggle_class: param(args, "sub_menu_toggle_class").to_string(),
            icon: args.get("icon").filter(|icon| !icon.is_empty()).map(str::to_string),
            labels,
        }
    }

    /// Append a state declaration and a dropdown button to items that have children.
    pub fn filter_item(&self, item_html: String, item: &MenuItem, pass: &mut MenuRenderPass) -> String {
        if !item.has_class(HAS_CHILDREN_CLASS) {
            return item_html;
        }
        let number = pass.next_item_number();
        let expanded = item.has_class(CURRENT_ANCESTOR_CLASS);
        let state = StateBinding::new(format!("{SUB_MENU_STATE_PREFIX}{number}"), expanded);

        let mut output = item_html;
        output.push_str(&state.declaration_markup());
        output.push_str(&self.button(&state).render());
        output
    }

    fn button(&self, state: &StateBinding) -> Tag {
        let static_class = if state.initial() {
            format!("{} {}", self.dropdown_class, self.toggle_class)
        } else {
            self.dropdown_class.clone()
        };

        let mut button = Tag::new("button")
            .attr("class", static_class)
            .attr("[class]", state.class_expression(&self.dropdown_class, &self.toggle_class))
            .attr("aria-expanded", state.initial_json())
            .attr("[aria-expanded]", state.boolean_expression())
            .attr("on", state.toggle_action());

        if let Some(icon) = &self.icon {
            button = button.raw(icon.as_str());
        }
        if let Some((expand, collapse)) = &self.labels {
            let label = if state.initial() { collapse } else { expand };
            button = button.child(
                Tag::new("span")
                    .attr("class", "screen-reader-text")
                    .attr("[text]", state.text_expression(collapse, expand))
                    .text(label.as_str()),
            );
        }
        button
    }
}

pub fn add_nav_sub_menu_buttons(params: &RuleParameters, ctx: &mut PreParseContext<'_>) -> RuleOutcome {
    let mut defaults = theme_config(ctx.theme);
    if Theme::from_slug(ctx.theme) == Some(Theme::TwentySeventeen) {
        if let Some(icon) = ctx.env.theme_icon(SUB_MENU_ICON) {
            defaults.insert("icon", icon);
        }
    }
    let buttons = SubMenuButtons::from_params(&defaults.overlaid_with(params));

    ctx.hooks
        .add_menu_item_filter(DEFAULT_PRIORITY, move |item_html, item, pass| {
            buttons.filter_item(item_html, item, pass)
        });
    RuleOutcome::Applied
}
