//! Owned XML element tree.
//!
//! E-utilities responses are parsed with the quick-xml pull reader into a small
//! tree of [`XmlNode`]s. Every accessor returns an `Option`, so callers chain
//! lookups through optional levels and pick their own fallback at the end.

use crate::error::{OptionExt, PubmedError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Content of an element, in document order
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    Element(XmlNode),
    Text(String),
}

/// A single XML element with its attributes and children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlChild>,
}

impl XmlNode {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_default();
                (key, value)
            })
            .collect();

        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    /// Iterate over child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(node) => Some(node),
            XmlChild::Text(_) => None,
        })
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.elements().find(|n| n.name == name)
    }

    /// All child elements with the given name, in order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.elements().filter(move |n| n.name == name)
    }

    /// Follow a chain of child element names
    pub fn path(&self, names: &[&str]) -> Option<&XmlNode> {
        names.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All descendant text concatenated in document order.
    ///
    /// Inline markup such as `<i>` or `<sup>` inside a title is flattened away.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlChild::Text(t) => out.push_str(t),
                XmlChild::Element(node) => node.collect_text(out),
            }
        }
    }

    /// Trimmed text of the element at `names`, `None` if missing or blank
    pub fn text_at(&self, names: &[&str]) -> Option<String> {
        self.path(names)
            .map(|n| n.text().trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// Parse an XML document and return its root element.
///
/// Declarations, doctype, comments and processing instructions are skipped.
pub fn parse(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(XmlNode::from_start(&e)),
            Ok(Event::Empty(e)) => {
                let node = XmlNode::from_start(&e);
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_parse("closing tag without matching opening tag")?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| {
                    PubmedError::Parse(format!(
                        "bad text at position {}: {}",
                        reader.buffer_position(),
                        err
                    ))
                })?;
                push_text(&mut stack, &text);
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&raw));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(PubmedError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(PubmedError::Parse(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_parse("document has no root element")
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlChild::Element(node)),
        // first complete top-level element is the root
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn push_text(stack: &mut [XmlNode], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        match parent.children.last_mut() {
            Some(XmlChild::Text(prev)) => prev.push_str(text),
            _ => parent.children.push(XmlChild::Text(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() -> Result<()> {
        let doc = parse(
            r#"<?xml version="1.0"?>
            <a><b id="1"><c>hello</c></b><b id="2"/></a>"#,
        )?;
        assert_eq!(doc.name, "a");
        assert_eq!(doc.children_named("b").count(), 2);
        assert_eq!(doc.child("b").and_then(|b| b.attr("id")), Some("1"));
        assert_eq!(doc.text_at(&["b", "c"]).as_deref(), Some("hello"));
        assert!(doc.path(&["b", "missing"]).is_none());
        Ok(())
    }

    #[test]
    fn test_mixed_content_text() -> Result<()> {
        let doc = parse("<t>Effect of <i>E. coli</i> on H<sub>2</sub>O</t>")?;
        assert_eq!(doc.text(), "Effect of E. coli on H2O");
        Ok(())
    }

    #[test]
    fn test_entities_and_cdata() -> Result<()> {
        let doc = parse("<t>Smith &amp; Sons &#x3b1; <![CDATA[<raw>]]></t>")?;
        assert_eq!(doc.text(), "Smith & Sons \u{3b1} <raw>");
        Ok(())
    }

    #[test]
    fn test_blank_text_is_none() -> Result<()> {
        let doc = parse("<a><b>   </b></a>")?;
        assert_eq!(doc.text_at(&["b"]), None);
        Ok(())
    }

    #[test]
    fn test_malformed_input() {
        assert!(parse("<a><b></a>").is_err());
        assert!(parse("<a>").is_err());
        assert!(parse("").is_err());
    }
}
