//! Reader building a [`Document`] from XML text.

use super::Document;
use super::node::{Attribute, Element, Node};
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a document from a string.
///
/// A leading byte-order mark is accepted. The XML declaration is dropped
/// because the writer always emits its own.
pub fn parse_string(content: &str) -> Result<Document> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);

    let mut stack: Vec<Element> = Vec::new();
    let mut prolog = Vec::new();
    let mut epilog = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(&e, reader.buffer_position()))?;

        let node = match event {
            Event::Start(start) => {
                stack.push(element_from(&start)?);
                continue;
            }
            Event::End(_) => match stack.pop() {
                Some(el) => Node::Element(el),
                None => return Err(Error::Malformed("unbalanced closing tag".into())),
            },
            Event::Empty(start) => Node::Element(element_from(&start)?),
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| malformed(&e, reader.buffer_position()))?;
                Node::Text(text.into_owned())
            }
            Event::CData(data) => {
                Node::CData(String::from_utf8_lossy(&data.into_inner()).into_owned())
            }
            Event::Comment(comment) => Node::Comment(String::from_utf8_lossy(&comment).into_owned()),
            Event::PI(pi) => Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned()),
            Event::DocType(doctype) => Node::DocType(String::from_utf8_lossy(&doctype).into_owned()),
            Event::Decl(_) => continue,
            Event::Eof => break,
        };

        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
            continue;
        }

        // Top level: outside the root only markup is meaningful
        match node {
            Node::Element(el) => {
                if root.is_some() {
                    return Err(Error::Malformed(format!(
                        "multiple root elements (second is <{}>)",
                        el.name
                    )));
                }
                root = Some(el);
            }
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Text(_) | Node::CData(_) => {
                return Err(Error::Malformed("text outside the root element".into()));
            }
            other if root.is_none() => prolog.push(other),
            other => epilog.push(other),
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Malformed(format!("unclosed element <{}>", open.name)));
    }

    let root = root.ok_or_else(|| Error::Malformed("document has no root element".into()))?;
    Ok(Document {
        prolog,
        root,
        epilog,
    })
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Malformed(format!("invalid attribute: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Malformed(format!("invalid attribute value: {e}")))?;
        element.attributes.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(element)
}

fn malformed(err: &quick_xml::Error, position: impl std::fmt::Display) -> Error {
    Error::Malformed(format!("{err} (at byte {position})"))
}
