//! Slot based text templates
//!
//! Generated CSS is kept in `css/*.css` and embedded at compile time. A template is parsed
//! once into an ordered list of literal fragments and named `{{slot}}` substitution points,
//! which makes the set of values a stylesheet depends on explicit and checkable.

use crate::params::RuleParameters;
use std::borrow::Cow;
use thiserror::Error;

const SLOT_OPEN: &str = "{{";
const SLOT_CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template slot `{0}` has no value")]
    MissingSlot(String),

    #[error("unclosed template slot at offset {0}")]
    UnclosedSlot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(Cow<'static, str>),
    Slot(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    fragments: Vec<Fragment>,
}

impl Template {
    /// Split `source` into literal text and `{{name}}` slots.
    pub fn parse(source: &'static str) -> Result<Self, TemplateError> {
        let mut fragments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find(SLOT_OPEN) {
            if open > 0 {
                fragments.push(Fragment::Text(Cow::Borrowed(&rest[..open])));
            }
            let after_open = &rest[open + SLOT_OPEN.len()..];
            let close = after_open
                .find(SLOT_CLOSE)
                .ok_or(TemplateError::UnclosedSlot(offset + open))?;
            fragments.push(Fragment::Slot(after_open[..close].trim().to_string()));

            let consumed = open + SLOT_OPEN.len() + close + SLOT_CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            fragments.push(Fragment::Text(Cow::Borrowed(rest)));
        }

        Ok(Template { fragments })
    }

    /// Append another template's fragments after this one's.
    pub fn then(mut self, other: Template) -> Self {
        self.fragments.extend(other.fragments);
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Slot names in order of first appearance.
    pub fn slots(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for fragment in &self.fragments {
            if let Fragment::Slot(name) = fragment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Fill every slot from `params`, HTML-escaping the substituted values.
    pub fn render(&self, params: &RuleParameters) -> Result<String, TemplateError> {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Slot(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingSlot(name.clone()))?;
                    out.push_str(&html_escape::encode_text(value));
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragments() {
        let template = Template::parse(".no-js .{{ menu_button_class }} { display: block; }").unwrap();
        assert_eq!(
            template.fragments(),
            &[
                Fragment::Text(Cow::Borrowed(".no-js .")),
                Fragment::Slot("menu_button_class".to_string()),
                Fragment::Text(Cow::Borrowed(" { display: block; }")),
            ]
        );
    }

    #[test]
    fn test_render_substitutes_and_escapes() {
        let template = Template::parse("#{{id}}.{{class}} > ul").unwrap();
        let params = RuleParameters::new()
            .with("id", "site-navigation")
            .with("class", "a<b");
        assert_eq!(
            template.render(&params).unwrap(),
            "#site-navigation.a&lt;b > ul"
        );
    }

    #[test]
    fn test_missing_slot_is_an_error() {
        let template = Template::parse("{{absent}}").unwrap();
        assert_eq!(
            template.render(&RuleParameters::new()),
            Err(TemplateError::MissingSlot("absent".to_string()))
        );
    }

    #[test]
    fn test_unclosed_slot() {
        assert_eq!(
            Template::parse("a {{oops"),
            Err(TemplateError::UnclosedSlot(2))
        );
    }

    #[test]
    fn test_then_and_slots_dedupe() {
        let template = Template::parse("{{a}} {{b}}")
            .unwrap()
            .then(Template::parse(" {{a}}").unwrap());
        assert_eq!(template.slots(), vec!["a", "b"]);
    }

    #[test]
    fn test_plain_css_braces_are_literal() {
        let template = Template::parse("a { top: 0; }").unwrap();
        assert_eq!(template.slots(), Vec::<&str>::new());
        assert_eq!(template.render(&RuleParameters::new()).unwrap(), "a { top: 0; }");
    }
}
