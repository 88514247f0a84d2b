//! Structural node queries
//!
//! Theme configuration locates nodes with a small XPath subset, e.g.
//! `//nav[@id = "site-navigation"]//button[ contains( @class, "menu-toggle" ) ]`.
//!
//! Supported:
//!
//! - `/` (child) and `//` (descendant) steps
//! - a tag name or `*` per step, matched ASCII case-insensitively
//! - predicates `[@attr = "value"]` and `[contains(@attr, "value")]`, any number per step
//! - single or double quoted string literals; whitespace between tokens is ignored
//!
//! `contains()` is a substring test, as in XPath, not a class token test.
//!
//! Queries are tokenized with logos (see [`lexer`]) and parsed from the positioned token
//! stream, so errors carry the byte offset of the offending token.

mod lexer;

use super::{element_name, for_each_descendant, get_attribute};
use lexer::{tokenize_with_spans, QueryToken, TokenLocation};
use markup5ever_rcdom::Handle;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Query parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty node query")]
    Empty,

    #[error("expected {expected} at offset {offset} in query `{query}`")]
    Expected {
        expected: &'static str,
        offset: usize,
        query: String,
    },

    #[error("unterminated string literal at offset {offset} in query `{query}`")]
    UnterminatedString { offset: usize, query: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Equals { attr: String, value: String },
    Contains { attr: String, value: String },
}

impl Predicate {
    fn matches(&self, node: &Handle) -> bool {
        match self {
            Predicate::Equals { attr, value } => {
                get_attribute(node, attr).as_deref() == Some(value.as_str())
            }
            Predicate::Contains { attr, value } => get_attribute(node, attr)
                .map(|actual| actual.contains(value.as_str()))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    /// `None` matches any element
    tag: Option<String>,
    predicates: Vec<Predicate>,
}

impl Step {
    fn matches(&self, node: &Handle) -> bool {
        let Some(name) = element_name(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(&name) {
                return false;
            }
        }
        self.predicates.iter().all(|p| p.matches(node))
    }
}

/// A parsed structural query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeQuery {
    source: String,
    steps: Vec<Step>,
}

impl NodeQuery {
    pub fn parse(source: &str) -> Result<Self, QueryError> {
        let tokens = tokenize_with_spans(source)?;
        let steps = parse_steps(source, &tokens)?;
        Ok(NodeQuery {
            source: source.to_string(),
            steps,
        })
    }

    /// The query text this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate from `root`, returning matches in document order without duplicates.
    pub fn select(&self, root: &Handle) -> Vec<Handle> {
        let mut context = vec![root.clone()];
        for step in &self.steps {
            let mut next: Vec<Handle> = Vec::new();
            for node in &context {
                match step.axis {
                    Axis::Child => {
                        for child in node.children.borrow().iter() {
                            if step.matches(child) {
                                push_unique(&mut next, child);
                            }
                        }
                    }
                    Axis::Descendant => for_each_descendant(node, &mut |candidate| {
                        if step.matches(candidate) {
                            push_unique(&mut next, candidate);
                        }
                    }),
                }
            }
            context = next;
        }
        context
    }

    /// First match in document order.
    pub fn first(&self, root: &Handle) -> Option<Handle> {
        self.select(root).into_iter().next()
    }
}

impl FromStr for NodeQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeQuery::parse(s)
    }
}

fn push_unique(nodes: &mut Vec<Handle>, node: &Handle) {
    if !nodes.iter().any(|existing| Rc::ptr_eq(existing, node)) {
        nodes.push(node.clone());
    }
}

/// Parse a token stream into query steps.
fn parse_steps(source: &str, tokens: &[TokenLocation]) -> Result<Vec<Step>, QueryError> {
    if tokens.is_empty() {
        return Err(QueryError::Empty);
    }

    let mut parser = StepParser {
        source,
        tokens,
        i: 0,
    };
    let mut steps = Vec::new();
    while parser.i < tokens.len() {
        steps.push(parser.step()?);
    }
    Ok(steps)
}

/// Index cursor over the token slice.
struct StepParser<'a> {
    source: &'a str,
    tokens: &'a [TokenLocation],
    i: usize,
}

impl StepParser<'_> {
    fn step(&mut self) -> Result<Step, QueryError> {
        let axis = match self.peek() {
            Some(QueryToken::DoubleSlash) => Axis::Descendant,
            Some(QueryToken::Slash) => Axis::Child,
            _ => return Err(self.expected("`/` or `//`")),
        };
        self.i += 1;

        let tag = if self.eat(&QueryToken::Star) {
            None
        } else {
            Some(self.name()?)
        };

        let mut predicates = Vec::new();
        while self.eat(&QueryToken::OpenBracket) {
            predicates.push(self.predicate()?);
            self.expect(&QueryToken::CloseBracket, "`]`")?;
        }

        Ok(Step {
            axis,
            tag,
            predicates,
        })
    }

    fn predicate(&mut self) -> Result<Predicate, QueryError> {
        if self.eat(&QueryToken::At) {
            let attr = self.name()?;
            self.expect(&QueryToken::Equals, "`=`")?;
            let value = self.literal()?;
            return Ok(Predicate::Equals { attr, value });
        }

        if self.eat(&QueryToken::Contains) {
            self.expect(&QueryToken::OpenParen, "`(`")?;
            self.expect(&QueryToken::At, "`@`")?;
            let attr = self.name()?;
            self.expect(&QueryToken::Comma, "`,`")?;
            let value = self.literal()?;
            self.expect(&QueryToken::CloseParen, "`)`")?;
            return Ok(Predicate::Contains { attr, value });
        }

        Err(self.expected("`@attr = \"value\"` or `contains(...)`"))
    }

    fn name(&mut self) -> Result<String, QueryError> {
        let name = match self.peek() {
            Some(QueryToken::Name(name)) => name.clone(),
            // `contains` is only a keyword inside a predicate
            Some(QueryToken::Contains) => "contains".to_string(),
            _ => return Err(self.expected("a name")),
        };
        self.i += 1;
        Ok(name)
    }

    fn literal(&mut self) -> Result<String, QueryError> {
        let Some(QueryToken::Literal(value)) = self.peek() else {
            return Err(self.expected("a quoted string"));
        };
        let value = value.clone();
        self.i += 1;
        Ok(value)
    }

    fn peek(&self) -> Option<&QueryToken> {
        self.tokens.get(self.i).map(|(token, _)| token)
    }

    fn eat(&mut self, token: &QueryToken) -> bool {
        if self.peek() == Some(token) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &QueryToken, expected: &'static str) -> Result<(), QueryError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.expected(expected))
        }
    }

    /// Byte offset of the current token, or the end of the source.
    fn offset(&self) -> usize {
        self.tokens
            .get(self.i)
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    fn expected(&self, expected: &'static str) -> QueryError {
        QueryError::Expected {
            expected,
            offset: self.offset(),
            query: self.source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomHandle;

    const DOC: &str = r#"<html><body>
        <header id="masthead"><button class="secondary-toggle">Menu</button></header>
        <nav id="site-navigation"><div><button class="menu-toggle toggled">A</button></div>
        <button class="other">B</button></nav>
    </body></html>"#;

    fn first_text(dom: &DomHandle, query: &str) -> Option<String> {
        let query = NodeQuery::parse(query).unwrap();
        query
            .first(&dom.document())
            .map(|node| crate::dom::text_content(&node))
    }

    #[test]
    fn test_twentyseventeen_button_query() {
        let dom = DomHandle::parse(DOC);
        let found = first_text(
            &dom,
            r#"//nav[@id = "site-navigation"]//button[ contains( @class, "menu-toggle" ) ]"#,
        );
        assert_eq!(found.as_deref(), Some("A"));
    }

    #[test]
    fn test_twentyfifteen_button_query() {
        let dom = DomHandle::parse(DOC);
        let found = first_text(
            &dom,
            r#"//header[ @id = "masthead" ]//button[ contains( @class, "secondary-toggle" ) ]"#,
        );
        assert_eq!(found.as_deref(), Some("Menu"));
    }

    #[test]
    fn test_child_axis_does_not_descend() {
        let dom = DomHandle::parse(DOC);
        let query = NodeQuery::parse("//nav/button").unwrap();
        let found = query.select(&dom.document());
        assert_eq!(found.len(), 1);
        assert_eq!(crate::dom::text_content(&found[0]), "B");
    }

    #[test]
    fn test_wildcard_and_single_quotes() {
        let dom = DomHandle::parse(DOC);
        let found = first_text(&dom, "//*[@class='other']");
        assert_eq!(found.as_deref(), Some("B"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let dom = DomHandle::parse(DOC);
        let query = NodeQuery::parse(r#"//nav[@id="nope"]//button"#).unwrap();
        assert!(query.select(&dom.document()).is_empty());
    }

    #[test]
    fn test_nested_descendant_contexts_do_not_duplicate() {
        let dom = DomHandle::parse("<div><div><p>x</p></div></div>");
        let query = NodeQuery::parse("//div//p").unwrap();
        assert_eq!(query.select(&dom.document()).len(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(NodeQuery::parse("   "), Err(QueryError::Empty));
        assert!(matches!(
            NodeQuery::parse("nav"),
            Err(QueryError::Expected { offset: 0, .. })
        ));
        assert!(matches!(
            NodeQuery::parse(r#"//nav[@id = "x"#),
            Err(QueryError::UnterminatedString { .. })
        ));
        assert!(matches!(
            NodeQuery::parse("//nav[starts-with(@id, 'x')]"),
            Err(QueryError::Expected { .. })
        ));
        assert!(matches!(
            NodeQuery::parse("//nav[@id"),
            Err(QueryError::Expected { offset: 9, .. })
        ));
    }

    #[test]
    fn test_contains_as_tag_name() {
        let dom = DomHandle::parse("<div><contains>x</contains></div>");
        let query = NodeQuery::parse("//div/contains").unwrap();
        assert_eq!(query.select(&dom.document()).len(), 1);
    }

    #[test]
    fn test_from_str_keeps_source() {
        let query: NodeQuery = "//nav".parse().unwrap();
        assert_eq!(query.as_str(), "//nav");
    }
}
