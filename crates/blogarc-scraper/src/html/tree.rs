//! Owned markup tree.
//!
//! Parsing is delegated to `scraper`; the parsed DOM is then copied into
//! plain owned nodes so cleaning passes can mutate it freely. Parents own
//! their children and nothing points back up, so removing a node is just
//! removing it from its parent's `children` vector.

use std::fmt;

use scraper::{ElementRef, Html};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is emitted without entity escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose first newline the parser drops; serializing must add one
/// back when the content itself starts with a newline.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A parsed markup fragment: a forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_ref(element: ElementRef<'_>) -> Self {
        let value = element.value();
        Self {
            name: value.name().to_string(),
            attrs: value
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children: convert_children(element),
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets `name` to `value`, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Concatenated text of every descendant text node, in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }
}

impl Fragment {
    /// Parses an HTML fragment (no `<html>`/`<body>` wrapper expected).
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_fragment(html);
        // Fragments are parsed into a synthetic <html> context element.
        Self {
            children: convert_children(document.root_element()),
        }
    }

    /// Copies the children of an element of an already-parsed document.
    #[must_use]
    pub fn from_children_of(element: ElementRef<'_>) -> Self {
        Self {
            children: convert_children(element),
        }
    }

    /// Concatenated text of every text node, in document order.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_node(node, false, &mut out);
        }
        out
    }

    /// Calls `visit` on every element in document order (pre-order).
    pub fn for_each_element<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        for_each_element_in(&self.children, visit);
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn for_each_element_in<'a>(nodes: &'a [Node], visit: &mut impl FnMut(&'a Element)) {
    for node in nodes {
        if let Node::Element(element) = node {
            visit(element);
            for_each_element_in(&element.children, visit);
        }
    }
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    parent
        .children()
        .filter_map(|child| match child.value() {
            scraper::Node::Text(text) => Some(Node::Text(String::from(&**text))),
            scraper::Node::Comment(comment) => Some(Node::Comment(String::from(&**comment))),
            scraper::Node::Element(_) => {
                ElementRef::wrap(child).map(|element| Node::Element(Element::from_ref(element)))
            }
            _ => None,
        })
        .collect()
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            Node::Comment(_) => {}
        }
    }
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Text(text) if raw_text => out.push_str(text),
        Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');

    if element.is_void() {
        return;
    }

    if LEADING_NEWLINE_ELEMENTS.contains(&element.name.as_str())
        && matches!(element.children.first(), Some(Node::Text(text)) if text.starts_with('\n'))
    {
        out.push('\n');
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&element.name.as_str());
    for child in &element.children {
        write_node(child, raw_text, out);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}
