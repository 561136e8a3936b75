//! Document - repaired document returned by a normalizer

use crate::{Element, Node};

/// HTML Document
///
/// Holds the top-level nodes of a normalized document. A well-formed
/// document has a single `html` element with `head` and `body` children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Create an empty document (no structure)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Get the `<html>` element
    pub fn document_element(&self) -> Option<&Element> {
        find_child(&self.children, "html")
    }

    /// Get the `<body>` element at the fixed path `html > body`
    pub fn body(&self) -> Option<&Element> {
        self.document_element()
            .and_then(|html| find_child(&html.children, "body"))
    }

    /// Remove the `<body>` element from the document and return it
    pub fn take_body(&mut self) -> Option<Element> {
        let html = self
            .children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|e| e.name == "html")?;
        let index = html
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.name == "body"))?;
        match html.children.remove(index) {
            Node::Element(body) => Some(body),
            Node::Text(_) => None,
        }
    }
}

fn find_child<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Element> {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .find(|e| e.name == name)
}
