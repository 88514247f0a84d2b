//! DOM substrate the rules run against
//!
//! Documents are parsed by html5ever into a `markup5ever_rcdom::RcDom` and written back with
//! html5ever's serializer. [`DomHandle`] owns the tree for the duration of one document; the
//! free functions below are the handful of node operations the rules need (attribute access,
//! node creation, insertion).

pub mod query;

pub use query::{NodeQuery, QueryError};

use crate::error::RewriteError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize,
    serialize::{SerializeOpts, TraversalScope},
    Attribute, LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A parsed document, mutated in place by post-parse rules.
pub struct DomHandle {
    dom: RcDom,
}

impl DomHandle {
    /// Parse a complete HTML document.
    ///
    /// The HTML parser always synthesizes `<html>`, `<head>` and `<body>`, so a document built
    /// this way is never missing its body.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        DomHandle { dom }
    }

    /// Wrap a tree that was built elsewhere.
    pub fn from_rcdom(dom: RcDom) -> Self {
        DomHandle { dom }
    }

    /// The document node (parent of the doctype and `<html>`).
    pub fn document(&self) -> Handle {
        self.dom.document.clone()
    }

    /// The root `<html>` element.
    pub fn document_element(&self) -> Option<Handle> {
        self.dom
            .document
            .children
            .borrow()
            .iter()
            .find(|child| matches!(child.data, NodeData::Element { .. }))
            .cloned()
    }

    /// First `<head>` element in document order.
    pub fn head(&self) -> Option<Handle> {
        self.first_element_named("head")
    }

    /// First `<body>` element in document order.
    pub fn body(&self) -> Option<Handle> {
        self.first_element_named("body")
    }

    /// Element whose `id` attribute equals `id`, first in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<Handle> {
        find_descendant(&self.dom.document, &mut |node| {
            get_attribute(node, "id").as_deref() == Some(id)
        })
    }

    /// All nodes matched by `query`, evaluated from the document node.
    pub fn query(&self, query: &NodeQuery) -> Vec<Handle> {
        query.select(&self.dom.document)
    }

    /// Serialize the whole document back to markup.
    pub fn serialize(&self) -> Result<String, RewriteError> {
        let mut output = Vec::new();
        let document = SerializableHandle::from(self.dom.document.clone());
        // The document node itself has no markup; only its children are written.
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };
        serialize(&mut output, &document, opts)
            .map_err(RewriteError::Serialization)?;
        Ok(String::from_utf8(output)?)
    }

    fn first_element_named(&self, tag: &str) -> Option<Handle> {
        find_descendant(&self.dom.document, &mut |node| element_name(node).as_deref() == Some(tag))
    }
}

/// Local name of an element node, `None` for anything else.
pub fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Attribute value, `None` if the node is not an element or lacks the attribute.
pub fn get_attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Set (or replace) an attribute. Returns `false` if the node is not an element.
pub fn set_attribute(node: &Handle, name: &str, value: &str) -> bool {
    let NodeData::Element { attrs, .. } = &node.data else {
        return false;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
        Some(attr) => attr.value = value.to_string().into(),
        None => attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        }),
    }
    true
}

/// Create a detached HTML element with attributes.
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a detached text node.
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Parent of `node`, if it is attached.
pub fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

/// Append `child` as the last child of `parent`.
pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Insert `new_node` immediately before `reference` among its siblings.
///
/// Returns `false` (and inserts nothing) when `reference` has no parent.
pub fn insert_before(reference: &Handle, new_node: Handle) -> bool {
    let Some(parent) = parent_of(reference) else {
        return false;
    };
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, reference)) else {
        return false;
    };
    new_node.parent.set(Some(Rc::downgrade(&parent)));
    children.insert(index, new_node);
    true
}

/// Concatenated text of all descendant text nodes.
#[cfg(test)]
pub(crate) fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

#[cfg(test)]
fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Depth-first, document order search below (not including) `node`.
pub(crate) fn find_descendant(
    node: &Handle,
    predicate: &mut dyn FnMut(&Handle) -> bool,
) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if predicate(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_descendant(child, predicate) {
            return Some(found);
        }
    }
    None
}

/// Visit every node below `node` in document order.
pub(crate) fn for_each_descendant(node: &Handle, visit: &mut dyn FnMut(&Handle)) {
    for child in node.children.borrow().iter() {
        visit(child);
        for_each_descendant(child, visit);
    }
}
