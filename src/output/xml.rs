//! Minimal XML tree and its pretty-printing serializer

const INDENT: &str = "  ";
const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A node of a rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Direct child elements named `name`, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// Concatenated text of the direct text children
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Serializes `root` with an XML declaration, one element per line and two-space indentation.
/// Elements holding only text are kept on one line; elements without children are self-closed.
pub fn serialize(root: &Element) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(DECLARATION);
    out.push('\n');
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = INDENT.repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push_str(&format!(r#" {name}="{}""#, escape(value, true)));
    }

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push('>');

    let text_only = element.children.iter().all(|c| matches!(c, Node::Text(_)));
    if text_only {
        out.push_str(&escape(&element.text_content(), false));
    } else {
        out.push('\n');
        for child in &element.children {
            match child {
                Node::Element(e) => write_element(out, e, depth + 1),
                Node::Text(t) => {
                    out.push_str(&INDENT.repeat(depth + 1));
                    out.push_str(&escape(t, false));
                    out.push('\n');
                }
            }
        }
        out.push_str(&indent);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

/// Escapes the markup characters of `value`; quotes are only escaped inside attribute values.
/// Control characters that XML 1.0 does not allow are dropped.
fn escape(value: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c < '\u{20}' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}
