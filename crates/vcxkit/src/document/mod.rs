//! Structured document model.
//!
//! A [`Document`] is a mutable XML tree that round-trips content it does
//! not understand. Reconcilers edit it in memory; nothing touches the disk
//! until [`Document::save`].

pub mod node;
pub mod parser;
pub mod writer;

pub use node::{Attribute, Element, Node};
pub use parser::parse_string;
pub use writer::{XML_DECLARATION, indent, write_string};

use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::path::Path;

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Comments and processing instructions before the root element
    pub prolog: Vec<Node>,
    /// Root element
    pub root: Element,
    /// Comments and processing instructions after the root element
    pub epilog: Vec<Node>,
}

impl Document {
    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read(path)?;
        Self::parse(&content).map_err(|e| e.at_path(path))
    }

    /// Parse a document from text.
    pub fn parse(content: &str) -> Result<Self> {
        parse_string(content)
    }

    /// Re-indent the whole tree and serialize it.
    pub fn render(&mut self, step: &str) -> String {
        indent(&mut self.root, step);
        write_string(self)
    }

    /// Re-indent, serialize and write the document.
    pub fn save(&mut self, path: &Path, step: &str) -> Result<()> {
        let content = self.render(step);
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Read a document's text, mapping a missing file to [`Error::NotFound`]
/// and content that is not UTF-8 to [`Error::Parse`].
pub fn read(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => Error::Parse {
            path: path.to_path_buf(),
            message: "document is not valid UTF-8".to_string(),
        },
        _ => Error::Io(e),
    })
}
