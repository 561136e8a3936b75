//! Edge case tests for whitewash-html
//!
//! Tests rare HTML scenarios, malformed content, and how the repaired tree
//! serializes back.

use whitewash_html::{parse, serialize_fragment, Element, Node};

fn body(html: &str) -> Element {
    parse(html).unwrap().take_body().expect("html5ever always creates a body")
}

fn roundtrip(html: &str) -> String {
    serialize_fragment(&body(html).children)
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_empty() {
    assert!(body("").children.is_empty());
}

#[test]
fn test_parse_null_bytes() {
    let text = body("Hello\0World").text_content();
    assert!(!text.contains('\0'));
    assert!(text.starts_with("Hello"));
}

#[test]
fn test_parse_only_doctype() {
    assert_eq!(roundtrip("<!DOCTYPE html>"), "");
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    assert_eq!(roundtrip("<div><p><span>text"), "<div><p><span>text</span></p></div>");
}

#[test]
fn test_parse_misnested_inline() {
    assert_eq!(
        roundtrip("<p>foo <strong><em>bar</strong></em> buzz</p>"),
        "<p>foo <strong><em>bar</em></strong> buzz</p>"
    );
}

#[test]
fn test_parse_extra_closing_tags() {
    assert_eq!(roundtrip("<div></div></div></div>"), "<div></div>");
}

#[test]
fn test_parse_orphan_closing_tag() {
    assert_eq!(roundtrip("</div>"), "");
}

#[test]
fn test_parse_nested_paragraphs() {
    assert_eq!(roundtrip("<p><p>text"), "<p></p><p>text</p>");
}

#[test]
fn test_parse_extra_open_bracket() {
    let body = body("<<SCRIPT>alert(\"XSS\");//<</SCRIPT>");
    assert_eq!(body.children[0], Node::text("<"));
    let script = body.child_elements().next().unwrap();
    assert_eq!(script.name(), "script");
}

// ============================================================================
// SPECIAL TAGS
// ============================================================================

#[test]
fn test_parse_textarea_content() {
    let body = body("<textarea><div>This is not a div</div></textarea>");
    let textarea = body.child_elements().next().unwrap();
    assert_eq!(textarea.children, vec![Node::text("<div>This is not a div</div>")]);
}

#[test]
fn test_parse_style_in_paragraph() {
    let body = body("<P><STYLE>@import'http://ha.ckers.org/xss.css';</STYLE></P>");
    let p = body.child_elements().next().unwrap();
    let style = p.child_elements().next().unwrap();
    assert_eq!(style.name(), "style");
    assert_eq!(style.text_content(), "@import'http://ha.ckers.org/xss.css';");
}

// ============================================================================
// VOID ELEMENTS
// ============================================================================

#[test]
fn test_parse_void_with_content() {
    assert_eq!(
        roundtrip("<br>content after<hr>more content"),
        "<br />content after<hr />more content"
    );
}

#[test]
fn test_parse_void_self_closing() {
    assert_eq!(
        roundtrip(r#"<br /><hr/><img src="test.png" />"#),
        r#"<br /><hr /><img src="test.png" />"#
    );
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test]
fn test_parse_attribute_no_value() {
    assert_eq!(
        roundtrip("<input disabled readonly>"),
        r#"<input disabled="" readonly="" />"#
    );
}

#[test]
fn test_parse_attribute_unquoted() {
    assert_eq!(
        roundtrip("<div id=myid class=myclass></div>"),
        r#"<div id="myid" class="myclass"></div>"#
    );
}

#[test]
fn test_parse_attribute_single_quotes_requoted() {
    assert_eq!(
        roundtrip(r#"<span title='say "hi"'>x</span>"#),
        r#"<span title="say &quot;hi&quot;">x</span>"#
    );
    assert_eq!(
        roundtrip(r#"<span title="it's">x</span>"#),
        r#"<span title="it&apos;s">x</span>"#
    );
}

#[test]
fn test_parse_attribute_null_replaced() {
    let body = body("<IMG SRC=java\0script:alert(\"XSS\")>");
    let img = body.child_elements().next().unwrap();
    let src = img.get_attribute("src").unwrap();
    assert!(!src.contains('\0'));
    assert!(src.contains('\u{FFFD}'));
}

#[test]
fn test_parse_duplicate_attribute_keeps_first() {
    let body = body(r#"<a href="first" href="second">x</a>"#);
    let a = body.child_elements().next().unwrap();
    assert_eq!(a.get_attribute("href"), Some("first"));
}

// ============================================================================
// ENTITIES
// ============================================================================

#[test]
fn test_parse_named_entities() {
    assert_eq!(body("&lt;&gt;&amp;&copy;").text_content(), "<>&\u{a9}");
    assert_eq!(roundtrip("&lt;b&gt;"), "&lt;b&gt;");
}

#[test]
fn test_parse_numeric_entities() {
    assert_eq!(body("&#60;&#x3C;").text_content(), "<<");
}

// ============================================================================
// COMMENTS AND CDATA
// ============================================================================

#[test]
fn test_parse_conditional_comment() {
    assert_eq!(roundtrip("<!--[if IE]><script>x</script><![endif]-->ok"), "ok");
}

#[test]
fn test_parse_cdata_in_html() {
    // CDATA is a bogus comment in HTML content; it ends at the first '>'
    assert_eq!(roundtrip("<p><![CDATA[<script>]]></p>"), "<p>]]&gt;</p>");
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn test_parse_deeply_nested() {
    let mut html = String::new();
    for _ in 0..200 {
        html.push_str("<div>");
    }
    html.push_str("deep");
    let body = body(&html);
    assert_eq!(body.text_content(), "deep");
}

#[test]
fn test_parse_many_siblings() {
    let html = "<p>x</p>".repeat(1000);
    assert_eq!(body(&html).children.len(), 1000);
}
