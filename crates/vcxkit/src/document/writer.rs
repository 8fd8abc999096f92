//! Serialization of a [`Document`] back to XML text.
//!
//! Output uses a fixed declaration header and self-closes empty elements
//! the way Visual Studio does (`<ClCompile Include="a.cpp" />`).

use super::Document;
use super::node::{Element, Node};
use quick_xml::escape::partial_escape;
use std::fmt::Write;

/// Declaration written at the top of every saved document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Re-indent an element tree in place.
///
/// Every element that contains structure (child elements, comments or
/// processing instructions) has its whitespace-only text replaced so each
/// child sits on its own line, `step` deeper than its parent. Non-blank
/// text next to a child stays where it is and no whitespace is added
/// beside it. Text-only elements are left alone. Applying this twice yields
/// the same tree.
pub fn indent(element: &mut Element, step: &str) {
    indent_level(element, 0, step);
}

fn indent_level(element: &mut Element, level: usize, step: &str) {
    let structured = element
        .children
        .iter()
        .any(|node| !node.is_textual());
    if !structured {
        return;
    }

    let inner = format!("\n{}", step.repeat(level + 1));
    let outer = format!("\n{}", step.repeat(level));

    let old = std::mem::take(&mut element.children);
    let mut children: Vec<Node> = Vec::with_capacity(old.len() * 2 + 1);
    for mut node in old {
        if node.is_blank() {
            continue;
        }
        if node.is_textual() {
            children.push(node);
            continue;
        }
        if let Node::Element(child) = &mut node {
            indent_level(child, level + 1, step);
        }
        if !ends_with_text(&children) {
            children.push(Node::Text(inner.clone()));
        }
        children.push(node);
    }
    if !ends_with_text(&children) {
        children.push(Node::Text(outer));
    }
    element.children = children;
}

/// Whether the last node is meaningful character data, which is kept as-is
/// instead of being replaced by indentation.
fn ends_with_text(children: &[Node]) -> bool {
    children.last().is_some_and(Node::is_textual)
}

/// Serialize a document as-is (no re-indentation).
pub fn write_string(document: &Document) -> String {
    let mut output = String::new();
    output.push_str(XML_DECLARATION);
    output.push('\n');

    for node in &document.prolog {
        write_node(&mut output, node);
        output.push('\n');
    }

    write_element(&mut output, &document.root);
    output.push('\n');

    for node in &document.epilog {
        write_node(&mut output, node);
        output.push('\n');
    }

    output
}

fn write_node(output: &mut String, node: &Node) {
    match node {
        Node::Element(el) => write_element(output, el),
        Node::Text(text) => output.push_str(&partial_escape(text)),
        Node::CData(data) => {
            write!(output, "<![CDATA[{data}]]>").unwrap();
        }
        Node::Comment(comment) => {
            write!(output, "<!--{comment}-->").unwrap();
        }
        Node::ProcessingInstruction(pi) => {
            write!(output, "<?{pi}?>").unwrap();
        }
        Node::DocType(doctype) => {
            write!(output, "<!DOCTYPE {doctype}>").unwrap();
        }
    }
}

fn write_element(output: &mut String, element: &Element) {
    write!(output, "<{}", element.name).unwrap();
    for attr in &element.attributes {
        write!(output, " {}=\"{}\"", attr.name, escape_attribute(&attr.value)).unwrap();
    }

    if element.children.is_empty() {
        output.push_str(" />");
        return;
    }

    output.push('>');
    for child in &element.children {
        write_node(output, child);
    }
    write!(output, "</{}>", element.name).unwrap();
}

/// Escape an attribute value. Apostrophes stay literal so MSBuild
/// conditions like `'$(Configuration)'=='Debug'` keep their usual shape.
fn escape_attribute(value: &str) -> String {
    partial_escape(value)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}
