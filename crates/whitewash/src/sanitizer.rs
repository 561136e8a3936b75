//! Whitelist enforcement over an element tree.
//!
//! Children are always processed before their parent is finalized. Each
//! child list is rebuilt into a fresh vector (keep, drop, or splice in the
//! grandchildren) and assigned back, so no list is mutated while it is
//! being walked.

use tracing::trace;
use whitewash_css::is_valid_style;
use whitewash_dom::{Element, Node};

use crate::whitelist::{UnknownTagPolicy, Whitelist};

/// Tag whose text content is a style sheet
pub const STYLE_TAG: &str = "style";

/// Attribute holding inline CSS
pub const STYLE_ATTRIBUTE: &str = "style";

/// What happens to an element in its parent's child list
#[derive(Debug)]
enum Disposition {
    Keep(Element),
    Unwrap(Vec<Node>),
    Remove,
}

/// Tree sanitizer bound to one whitelist
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'w> {
    whitelist: &'w Whitelist,
}

impl<'w> Sanitizer<'w> {
    pub fn new(whitelist: &'w Whitelist) -> Self {
        Self { whitelist }
    }

    /// Sanitize a list of sibling nodes
    pub fn sanitize_nodes(&self, nodes: Vec<Node>) -> Vec<Node> {
        self.sanitize_nodes_with(nodes, &mut None::<fn(&mut Element)>)
    }

    /// Sanitize a list of sibling nodes, passing every kept element to
    /// `hook` once its attributes and children are final.
    pub fn sanitize_nodes_with<H>(&self, nodes: Vec<Node>, hook: &mut Option<H>) -> Vec<Node>
    where
        H: FnMut(&mut Element),
    {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Text(text) => push_node(&mut out, Node::Text(text)),
                Node::Element(element) => match self.sanitize_element(element, hook) {
                    Disposition::Keep(element) => push_node(&mut out, Node::Element(element)),
                    Disposition::Unwrap(children) => {
                        for child in children {
                            push_node(&mut out, child);
                        }
                    }
                    Disposition::Remove => {}
                },
            }
        }
        out
    }

    fn sanitize_element<H>(&self, mut element: Element, hook: &mut Option<H>) -> Disposition
    where
        H: FnMut(&mut Element),
    {
        if !self.whitelist.is_known(&element.name) {
            return match self.whitelist.unknown_tag_policy() {
                UnknownTagPolicy::Unwrap => {
                    trace!(tag = %element.name, "unwrapping unknown element");
                    let children = element.take_children();
                    Disposition::Unwrap(self.sanitize_nodes_with(children, hook))
                }
                UnknownTagPolicy::Remove => {
                    trace!(tag = %element.name, "removing unknown element");
                    Disposition::Remove
                }
            };
        }

        if element.name == STYLE_TAG {
            let css = element.text_content();
            if !is_valid_style(self.whitelist.css_properties(), &css) {
                trace!("removing style element with disallowed content");
                return Disposition::Remove;
            }
            // Only text is serialized inside <style>: keep exactly the
            // text that was checked, never nested elements.
            element.children = if css.is_empty() {
                Vec::new()
            } else {
                vec![Node::Text(css)]
            };
            self.filter_attributes(&mut element);
        } else {
            self.filter_attributes(&mut element);
            let children = element.take_children();
            element.children = self.sanitize_nodes_with(children, hook);
        }

        if let Some(hook) = hook.as_mut() {
            hook(&mut element);
        }

        Disposition::Keep(element)
    }

    /// Drop every attribute the whitelist does not allow on this tag,
    /// and any `style` attribute with disallowed CSS.
    fn filter_attributes(&self, element: &mut Element) {
        let whitelist = self.whitelist;
        let tag = element.name.as_str();

        element.attributes.retain(|attr| {
            if !whitelist.allows_attribute(tag, &attr.name, &attr.value) {
                trace!(tag, attribute = %attr.name, "removing attribute");
                return false;
            }
            if attr.name == STYLE_ATTRIBUTE
                && !is_valid_style(whitelist.css_properties(), &attr.value)
            {
                trace!(tag, "removing style attribute with disallowed CSS");
                return false;
            }
            true
        });
    }
}

/// Append `node`, merging it into a preceding text node
fn push_node(out: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(prev)) = out.last_mut() {
            prev.push_str(text);
            return;
        }
    }
    out.push(node);
}
