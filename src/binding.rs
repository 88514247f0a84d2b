//! Declarative state bindings
//!
//! Replaces script event handlers with a named boolean state plus expressions that read it:
//!
//! ```text
//! <amp-state id="navMenuToggledOn"><script type="application/json">false</script></amp-state>
//! <nav class="main-navigation" [class]="&quot;main-navigation&quot; + ( navMenuToggledOn ? &quot; toggled-on&quot; : '' )">
//! <button on="tap:AMP.setState( { navMenuToggledOn: ! navMenuToggledOn } )" ...>
//! ```
//!
//! String literals inside expressions are JSON encoded, so any class name or label survives
//! as a valid expression literal.

use crate::dom::{append_child, create_element, create_text};
use crate::markup::Tag;
use markup5ever_rcdom::Handle;
use serde_json::Value;

/// `[name]`, the binding attribute that mirrors `name`.
pub fn bound(name: &str) -> String {
    format!("[{name}]")
}

/// JSON string literal for `text`.
pub fn json_string(text: &str) -> String {
    Value::from(text).to_string()
}

/// An attribute whose value is `static_value`, with `when_true` appended while the state is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalAttribute<'a> {
    pub name: &'a str,
    pub static_value: &'a str,
    pub when_true: &'a str,
}

/// A `[name]` attribute and the expression it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundAttribute {
    pub name: String,
    pub expression: String,
}

/// A named boolean state cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBinding {
    id: String,
    initial: bool,
}

impl StateBinding {
    pub fn new(id: impl Into<String>, initial: bool) -> Self {
        StateBinding {
            id: id.into(),
            initial,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn initial(&self) -> bool {
        self.initial
    }

    /// The JSON encoded initial value.
    pub fn initial_json(&self) -> String {
        Value::Bool(self.initial).to_string()
    }

    /// `<amp-state>` declaration as a detached DOM node.
    pub fn declaration(&self) -> Handle {
        let state = create_element("amp-state", vec![("id", self.id.as_str())]);
        let script = create_element("script", vec![("type", "application/json")]);
        append_child(&script, create_text(&self.initial_json()));
        append_child(&state, script);
        state
    }

    /// `<amp-state>` declaration as markup.
    pub fn declaration_markup(&self) -> String {
        Tag::new("amp-state")
            .attr("id", self.id.as_str())
            .child(
                Tag::new("script")
                    .attr("type", "application/json")
                    .raw(self.initial_json()),
            )
            .render()
    }

    /// `"<static>" + ( <id> ? "<when_true>" : '' )`
    pub fn conditional_expression(&self, static_value: &str, when_true: &str) -> String {
        format!(
            "{} + ( {} ? {} : '' )",
            json_string(static_value),
            self.id,
            json_string(when_true)
        )
    }

    /// Class expression that appends `toggle_class` (space separated) while the state is on.
    pub fn class_expression(&self, static_class: &str, toggle_class: &str) -> String {
        self.conditional_expression(static_class, &format!(" {toggle_class}"))
    }

    /// One binding attribute per conditional attribute, in the given order.
    pub fn bind(&self, attributes: &[ConditionalAttribute<'_>]) -> Vec<BoundAttribute> {
        attributes
            .iter()
            .map(|attr| BoundAttribute {
                name: bound(attr.name),
                expression: self.conditional_expression(attr.static_value, attr.when_true),
            })
            .collect()
    }

    /// `'true'`/`'false'` mirror of the state, for ARIA attributes.
    pub fn boolean_expression(&self) -> String {
        format!("{} ? 'true' : 'false'", self.id)
    }

    /// Pick between two strings, for `[text]` bindings.
    pub fn text_expression(&self, when_true: &str, when_false: &str) -> String {
        format!(
            "{} ? {} : {}",
            self.id,
            json_string(when_true),
            json_string(when_false)
        )
    }

    /// `on` attribute value flipping the state on tap.
    pub fn toggle_action(&self) -> String {
        format!("tap:AMP.setState( {{ {id}: ! {id} }} )", id = self.id)
    }
}
