//! HTML5 Parser implementation
//!
//! Uses html5ever's built-in RcDom and converts to our owned tree.
//! Only elements and text survive the conversion.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use whitewash_dom::{Document, Element, Node};

use crate::{Normalizer, ParseError};

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";
const SVG_NS: &str = "http://www.w3.org/2000/svg";
const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// Tag name as seen by the sanitizer.
///
/// Elements outside the HTML namespace keep a prefix (`svg:style`,
/// `math:mi`) so they can never pass for the HTML element of the same
/// local name.
fn element_name(name: &QualName) -> String {
    let prefix = match &*name.ns {
        HTML_NS => return name.local.to_string(),
        SVG_NS => "svg",
        MATHML_NS => "math",
        _ => "foreign",
    };
    format!("{}:{}", prefix, name.local)
}

/// html5ever-backed normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everNormalizer;

impl Html5everNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Convert an RcDom node, appending the result to `out`
    fn convert_node(&self, handle: &Handle, out: &mut Vec<Node>) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, out);
                }
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.is_empty() {
                    return;
                }
                // html5ever already coalesces text, but a dropped comment
                // can leave two runs side by side
                if let Some(Node::Text(prev)) = out.last_mut() {
                    prev.push_str(&text);
                } else {
                    out.push(Node::Text(text.to_string()));
                }
            }
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let mut elem = Element::new(element_name(name));

                for attr in attrs.borrow().iter() {
                    let attr_name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    elem.set_attribute(attr_name, attr.value.to_string());
                }

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, &mut elem.children);
                }
                // <template> content lives in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    self.convert_node(contents, &mut elem.children);
                }

                out.push(Node::Element(elem));
            }
            RcNodeData::Doctype { .. }
            | RcNodeData::Comment { .. }
            | RcNodeData::ProcessingInstruction { .. } => {}
        }
    }
}

impl Normalizer for Html5everNormalizer {
    fn normalize(&self, html: &str) -> Result<Document, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut children = Vec::new();
        self.convert_node(&dom.document, &mut children);

        tracing::debug!("normalized {} bytes of markup", html.len());
        Ok(Document::from_nodes(children))
    }
}
