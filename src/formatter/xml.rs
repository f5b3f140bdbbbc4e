use super::{CommonFormatter, FormatConfig, Formatter};
use crate::ast::{Content, DocType, Document, Element};

/// Renders a document as indented XML text
///
/// Elements holding character data, references or CDATA sections are
/// written on one line so that no whitespace is added to their text.
/// Whitespace between the children of element-only content is replaced by
/// the indentation.
pub struct XmlFormatter;

impl CommonFormatter for XmlFormatter {}

impl Formatter for XmlFormatter {
    fn format(&self, document: &Document, config: &FormatConfig) -> String {
        let mut lines = Vec::new();
        if let Some(prolog) = &document.prolog {
            if let Some(xml_decl) = &prolog.xml_decl {
                lines.push(xml_decl.to_string());
            }
            if let Some(doctype) = &prolog.doctype {
                Self::format_doctype(doctype, config, &mut lines);
            }
        }
        Self::format_element(&document.root, 0, config, &mut lines);
        lines.extend(document.misc.iter().map(ToString::to_string));

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}

impl XmlFormatter {
    fn format_doctype(doctype: &DocType, config: &FormatConfig, lines: &mut Vec<String>) {
        if !doctype.has_internal_subset() {
            lines.push(doctype.to_string());
            return;
        }

        let mut head = format!("<!DOCTYPE {}", doctype.name);
        if let Some(external_id) = &doctype.external_id {
            head.push_str(&format!(" {external_id}"));
        }
        head.push_str(" [");
        lines.push(head);

        let (_, inner_indent) = Self::create_indentation(0, config);
        for markup in &doctype.markups {
            lines.push(format!("{inner_indent}{markup}"));
        }
        if let Some(pe) = &doctype.pe_reference {
            lines.push(format!("{inner_indent}%{pe};"));
        }
        lines.push("]>".to_string());
    }

    fn format_element(
        element: &Element,
        indent: usize,
        config: &FormatConfig,
        lines: &mut Vec<String>,
    ) {
        let (indent_str, inner_indent) = Self::create_indentation(indent, config);
        if !element.is_element_only() {
            lines.push(format!("{indent_str}{element}"));
            return;
        }

        let mut start_tag = format!("{indent_str}<{}", element.name);
        for attr in &element.attributes {
            start_tag.push_str(&format!(" {attr}"));
        }
        start_tag.push('>');
        lines.push(start_tag);

        for content in element.contents.iter().filter(|c| !c.is_whitespace()) {
            match content {
                Content::Element(child) => Self::format_element(child, indent + 1, config, lines),
                other => lines.push(format!("{inner_indent}{other}")),
            }
        }
        lines.push(format!("{indent_str}</{}>", element.name));
    }
}
