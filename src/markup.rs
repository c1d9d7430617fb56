//! Minimal HTML/SVG element tree
//!
//! Pages are assembled as a tree of [`Element`]s and rendered through
//! [`std::fmt::Display`]. Text nodes and attribute values are always
//! escaped on output, so labels and values reported by the device can
//! never inject markup into the page.

use std::fmt::{self, Display, Formatter, Write};

/// HTML elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "input", "link", "meta"];

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Written as is; only for trusted content such as inline CSS
    Raw(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(&'static str, Option<String>)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier value of the same name
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Set a boolean attribute such as `checked` or `selected`
    pub fn flag(mut self, name: &'static str) -> Self {
        if !self.has_flag(name) {
            self.attributes.push((name, None));
        }
        self
    }

    pub fn flag_if(self, name: &'static str, condition: bool) -> Self {
        if condition { self.flag(name) } else { self }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Trusted text written without escaping
    pub fn raw(self, text: &'static str) -> Self {
        self.child(Node::Raw(text))
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| *n == name)
    }

    /// All descendant elements in document order, depth first
    pub fn descendants(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(&mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if let Node::Element(element) = child {
                found.push(element);
                element.collect_descendants(found);
            }
        }
    }

    /// Concatenated text content of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => text.push_str(t),
                Node::Raw(t) => text.push_str(t),
                Node::Element(element) => text.push_str(&element.text_content()),
            }
        }
        text
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => Display::fmt(element, f),
            Node::Text(text) => write_escaped(f, text),
            Node::Raw(text) => f.write_str(text),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            match value {
                Some(value) => {
                    write!(f, " {name}=\"")?;
                    write_escaped(f, value)?;
                    f.write_char('"')?;
                }
                None => write!(f, " {name}")?,
            }
        }

        if VOID_ELEMENTS.contains(&self.tag) {
            return f.write_char('>');
        }

        // childless svg shapes are written self-closing
        if self.children.is_empty() && !is_html_container(self.tag) {
            return f.write_str("/>");
        }

        f.write_char('>')?;
        for child in &self.children {
            Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

fn is_html_container(tag: &str) -> bool {
    !matches!(tag, "circle" | "ellipse" | "path" | "rect" | "line")
}

fn write_escaped(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&#39;")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}
