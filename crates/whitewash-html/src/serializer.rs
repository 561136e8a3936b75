//! HTML Serialization
//!
//! Renders an element tree back to markup that parses the same way as
//! HTML and as XHTML.
//!
//! Attribute values are always double-quoted, with both quote characters
//! escaped, whatever quoting the input used.

use whitewash_dom::{Element, Node};

/// Void elements (self-closing, no end tag)
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize a sequence of sibling nodes (innerHTML of their parent)
pub fn serialize_fragment(nodes: &[Node]) -> String {
    let mut output = String::new();
    for node in nodes {
        serialize_node(node, &mut output);
    }
    output
}

/// Serialize an element including its own tags (outerHTML)
pub fn serialize_element(element: &Element) -> String {
    let mut output = String::new();
    serialize_into(element, &mut output);
    output
}

fn serialize_node(node: &Node, output: &mut String) {
    match node {
        Node::Element(elem) => serialize_into(elem, output),
        Node::Text(text) => escape_text(text, output),
    }
}

fn serialize_into(elem: &Element, output: &mut String) {
    let tag = elem.name();

    output.push('<');
    output.push_str(tag);

    for attr in elem.attributes.iter() {
        output.push(' ');
        output.push_str(&attr.name);
        output.push_str("=\"");
        escape_attribute(&attr.value, output);
        output.push('"');
    }

    if VOID_ELEMENTS.contains(&tag) {
        output.push_str(" />");
        return;
    }
    output.push('>');

    if RAW_TEXT_ELEMENTS.contains(&tag) {
        for child in &elem.children {
            if let Node::Text(text) = child {
                write_raw_text(text, output);
            }
        }
    } else {
        for child in &elem.children {
            serialize_node(child, output);
        }
    }

    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

/// Raw text is written verbatim except that it can never close its element.
fn write_raw_text(text: &str, output: &mut String) {
    output.push_str(&text.replace("</", "<\\/"));
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&apos;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}
