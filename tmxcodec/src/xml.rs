//! A minimal owned element tree on top of quick-xml's event reader/writer.
//!
//! The object model parses from and serializes to [`Element`] values rather
//! than raw event streams, so mixed content (text interleaved with inline
//! tags) keeps its document order through a round-trip. Only the capabilities
//! the model needs are provided: tag name, attribute list, ordered children.

use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::error::Error;

/// One XML element: a tag name, its attributes in document order, and its
/// children (text and elements, interleaved in document order).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Looks up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Appends character data, merging with a trailing text node so that
    /// consecutive text events (e.g. around a CDATA section) stay one node.
    pub fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// Concatenated character data directly inside this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let Node::Text(text) = child {
                out.push_str(text);
            }
        }
        out
    }

    /// Iterates over the element children, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Parses one XML document from any reader and returns its root element.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::End(_)) => {
                    let element = match stack.pop() {
                        Some(element) => element,
                        None => return Err(Error::EmptyDocument),
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(Error::XmlSyntax)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    let raw = e.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&text);
                    }
                }
                Ok(Event::Eof) => return Err(Error::EmptyDocument),
                Ok(_) => {}
                Err(e) => return Err(Error::XmlSyntax(e)),
            }
            buf.clear();
        }
    }

    /// Parses one XML document from a string slice.
    pub fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_reader(std::io::Cursor::new(s))
    }

    /// Writes this element and its subtree to any writer, without an XML
    /// declaration.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(writer);
        self.write_events(&mut xml_writer)
    }

    /// Emits this element's subtree into an already-open event writer.
    pub(crate) fn write_events<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                Node::Text(text) => {
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                }
                Node::Element(element) => element.write_events(writer)?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn element_from_start(e: &BytesStart) -> Result<Element, Error> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_element() {
        let element = Element::from_str(r#"<note xml:lang="en">hello</note>"#).unwrap();
        assert_eq!(element.name, "note");
        assert_eq!(element.attr("xml:lang"), Some("en"));
        assert_eq!(element.text(), "hello");
    }

    #[test]
    fn test_mixed_content_preserves_order() {
        let element = Element::from_str("<seg>one <ph>code</ph> two <ph/> three</seg>").unwrap();
        assert_eq!(element.children.len(), 5);
        assert!(matches!(&element.children[0], Node::Text(t) if t == "one "));
        assert!(matches!(&element.children[1], Node::Element(el) if el.name == "ph"));
        assert!(matches!(&element.children[2], Node::Text(t) if t == " two "));
        assert!(matches!(&element.children[3], Node::Element(el) if el.name == "ph"));
        assert!(matches!(&element.children[4], Node::Text(t) if t == " three"));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let element = Element::from_str("<seg>a &lt; b &amp; c</seg>").unwrap();
        assert_eq!(element.text(), "a < b & c");
    }

    #[test]
    fn test_round_trip_escapes_back() {
        let element = Element::from_str("<seg>a &lt; b</seg>").unwrap();
        let mut out = Vec::new();
        element.to_writer(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert_eq!(written, "<seg>a &lt; b</seg>");
        let reparsed = Element::from_str(&written).unwrap();
        assert_eq!(element, reparsed);
    }

    #[test]
    fn test_empty_element_written_self_closing() {
        let mut element = Element::new("ph");
        element.set_attr("x", "1");
        let mut out = Vec::new();
        element.to_writer(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"<ph x="1"/>"#);
    }

    #[test]
    fn test_declaration_and_comments_are_skipped() {
        let element = Element::from_str(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!-- a comment --><tmx version=\"1.4\"/>",
        )
        .unwrap();
        assert_eq!(element.name, "tmx");
        assert_eq!(element.attr("version"), Some("1.4"));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let result = Element::from_str("   ");
        assert!(matches!(result, Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_malformed_xml_is_a_syntax_error() {
        let result = Element::from_str("<tmx><header></tmx>");
        assert!(matches!(result, Err(Error::XmlSyntax(_))));
    }

    #[test]
    fn test_cdata_becomes_text() {
        let element = Element::from_str("<seg><![CDATA[a < b]]></seg>").unwrap();
        assert_eq!(element.text(), "a < b");
    }
}
