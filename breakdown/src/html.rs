//! A small HTML document model
//!
//! Reports are assembled as [`Node`] trees and turned into text by
//! [`render`]. Text and attribute values are always escaped on the way out;
//! only [`Node::Raw`] (used for the static style sheet) is emitted verbatim.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const VOID: &[&str] = &["br", "hr", "link", "meta"];

/// Tags followed by a line break when rendered.
const BLOCK: &[&str] = &[
    "body", "div", "h1", "h2", "h3", "head", "html", "li", "meta", "ol", "p", "style", "table", "title", "tr", "ul",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

/// Start an element.
pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

impl Element {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode with the same unreserved set as JavaScript's
/// `encodeURIComponent`.
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

fn render_into(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape(text)),
        Node::Raw(raw) => out.push_str(raw),
        Node::Element(element) => {
            out.push('<');
            out.push_str(element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
            out.push('>');
            if VOID.contains(&element.tag) {
                if BLOCK.contains(&element.tag) {
                    out.push('\n');
                }
                return;
            }
            for child in &element.children {
                render_into(child, out);
            }
            out.push_str("</");
            out.push_str(element.tag);
            out.push('>');
            if BLOCK.contains(&element.tag) {
                out.push('\n');
            }
        }
    }
}

pub fn render(node: &Node) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

/// Render a complete document, doctype included.
pub fn render_document(root: &Node) -> String {
    format!("<!doctype html>\n{}", render(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_text_and_attrs() {
        let node: Node = el("a")
            .attr("data-name", "\"><script>")
            .text("<b>&'x'</b>")
            .into();
        assert_eq!(
            render(&node),
            "<a data-name=\"&quot;&gt;&lt;script&gt;\">&lt;b&gt;&amp;&#39;x&#39;&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn test_raw_is_verbatim() {
        let node: Node = el("style").child(Node::Raw("a > b { }".to_string())).into();
        assert_eq!(render(&node), "<style>a > b { }</style>\n");
    }

    #[test]
    fn test_void_and_nesting() {
        let node: Node = el("head")
            .child(el("meta").attr("charset", "utf-8"))
            .child(el("title").text("T"))
            .into();
        assert_eq!(
            render(&node),
            "<head><meta charset=\"utf-8\">\n<title>T</title>\n</head>\n"
        );
    }

    #[test]
    fn test_document() {
        assert!(render_document(&el("html").into()).starts_with("<!doctype html>\n<html>"));
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("abc-_.!~*'()"), "abc-_.!~*'()");
        assert_eq!(encode_uri_component("a b/c?&#"), "a%20b%2Fc%3F%26%23");
        assert_eq!(encode_uri_component("a\u{2013}"), "a%E2%80%93");
        assert_eq!(encode_uri_component("<\">"), "%3C%22%3E");
    }
}
