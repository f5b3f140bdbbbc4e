//! zxml: An XML 1.0 parser with DTD internal subset support
//!
//! This crate provides functionality to:
//! - Parse XML documents, including the internal DTD subset, into a syntax tree
//! - Keep entity, character and parameter-entity references as written
//! - Render the tree back to XML text
//! - Handle errors with the production and position that failed
//!
//! # Examples
//! ```
//! use zxml::{parse, Result};
//!
//! fn example() -> Result<()> {
//!     let document = parse("<!DOCTYPE note [<!ELEMENT note (#PCDATA)>]><note>Hi &amp; bye</note>")?;
//!     let doctype = document.prolog.and_then(|prolog| prolog.doctype);
//!     assert_eq!(doctype.map(|d| d.markups.len()), Some(1));
//!     assert_eq!(document.root.name, "note");
//!     Ok(())
//! }
//! # example().ok();
//! ```

use tracing::{debug, instrument};

pub mod ast;
pub mod chars;
pub mod config;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod scanner;

// Re-exports
pub use ast::Document;
pub use config::ParserConfig;
pub use error::{Error, ErrorKind, Result};
pub use formatter::{FormatConfig, Formatter, XmlFormatter};
pub use parser::Parser;

/// Parse a document with the default limits
pub fn parse(input: &str) -> Result<Document> {
    parse_with_config(input, ParserConfig::default())
}

#[instrument(skip(input), fields(len = input.len()))]
pub fn parse_with_config(input: &str, config: ParserConfig) -> Result<Document> {
    let result = Parser::with_config(input, config).parse();
    match &result {
        Ok(document) => debug!(root = %document.root.name, "document parsed"),
        Err(err) => debug!(%err, "document rejected"),
    }
    result
}

/// Render a document with the default [`FormatConfig`]
pub fn render(document: &Document) -> String {
    XmlFormatter.format(document, &FormatConfig::default())
}
