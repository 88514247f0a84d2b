//! Markup builder for generated fragments
//!
//! Used where output is a markup string rather than DOM nodes (menu item filters run before
//! the document is parsed). Attribute values and text children are escaped; raw children are
//! emitted verbatim, for trusted fragments such as theme icons.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Child {
    Tag(Tag),
    Text(String),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Child>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attributes render in insertion order.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, tag: Tag) -> Self {
        self.children.push(Child::Tag(tag));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    pub fn raw(mut self, html: impl Into<String>) -> Self {
        self.children.push(Child::Raw(html.into()));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Child::Tag(tag) => tag.render_into(out),
                Child::Text(text) => out.push_str(&html_escape::encode_text(text)),
                Child::Raw(html) => out.push_str(html),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested() {
        let html = Tag::new("button")
            .attr("class", "dropdown-toggle")
            .raw("<svg></svg>")
            .child(Tag::new("span").attr("class", "screen-reader-text").text("expand"))
            .render();
        assert_eq!(
            html,
            r#"<button class="dropdown-toggle"><svg></svg><span class="screen-reader-text">expand</span></button>"#
        );
    }

    #[test]
    fn test_attribute_quotes_are_escaped() {
        let html = Tag::new("b").attr("[class]", r#""a" + x"#).render();
        assert_eq!(html, r#"<b [class]="&quot;a&quot; + x"></b>"#);
    }

    #[test]
    fn test_text_is_escaped_raw_is_not() {
        let html = Tag::new("p").text("a & b").raw("&amp;").render();
        assert_eq!(html, "<p>a &amp; b&amp;</p>");
    }
}
