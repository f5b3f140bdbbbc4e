mod xml;

pub use self::xml::XmlFormatter;
use crate::ast::Document;

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Number of spaces for indentation
    pub indent_spaces: usize,
}

/// Default configuration for formatting
impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_spaces: 2 }
    }
}

/// Trait for formatting a Document as a string
pub trait Formatter {
    fn format(&self, document: &Document, config: &FormatConfig) -> String;
}

/// Indentation shared by the formatters
pub trait CommonFormatter {
    /// Creates the indentation strings for a level and the level below it
    fn create_indentation(indent: usize, config: &FormatConfig) -> (String, String) {
        let indent_str = " ".repeat(indent * config.indent_spaces);
        let inner_indent = " ".repeat((indent + 1) * config.indent_spaces);
        (indent_str, inner_indent)
    }
}
