//! Minimal XML element tree
//!
//! Every attribute value and text node passes through [`escape_xml`] while
//! rendering; nothing else writes user text into the output.

use std::fmt::Write;

/// Characters XML 1.0 does not allow anywhere in a document
const fn is_forbidden(ch: char) -> bool {
    matches!(
        ch,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// Escape the five XML special characters and drop characters XML 1.0
/// forbids (C0 controls other than tab, newline and carriage return).
#[must_use]
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if is_forbidden(c) => {}
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute; order of insertion is preserved on output.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append a child only when `child` is `Some`.
    #[must_use]
    pub fn child_opt(self, child: Option<Element>) -> Self {
        match child {
            Some(c) => self.child(c),
            None => self,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with two-space indentation.
    ///
    /// Empty elements self-close as `<a x="1" />`; elements holding only text
    /// stay on one line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, 0);
        out
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<{}", self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {key}=\"{}\"", escape_xml(value));
        }

        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }

        let text_only = self.children.iter().all(|c| matches!(c, Node::Text(_)));
        out.push('>');
        if text_only {
            for child in &self.children {
                if let Node::Text(text) = child {
                    out.push_str(&escape_xml(text));
                }
            }
        } else {
            for child in &self.children {
                out.push('\n');
                match child {
                    Node::Element(e) => e.write_to(out, depth + 1),
                    Node::Text(text) => {
                        let _ = write!(out, "{indent}  {}", escape_xml(text));
                    }
                }
            }
            out.push('\n');
            out.push_str(&indent);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}
