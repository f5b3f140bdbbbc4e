//! Syntax tree produced by the parser
//!
//! Every node is built bottom-up by [`Parser`](crate::Parser) and never
//! mutated afterwards. References are kept as written: entity and
//! parameter-entity references are not expanded.
//!
//! The `Display` impls render each node as canonical XML text on a single
//! line; the [`formatter`](crate::formatter) builds multi-line output on top
//! of them.

mod dtd;
mod node;

use std::fmt;

pub use dtd::{
    AttDef, AttType, AttlistDecl, ChoiceOrSeq, ContentParticle, ContentSpec, DefaultDecl,
    DocType, ElementDecl, EntityDecl, EntityDef, EntityKind, ExternalId, MarkupDecl,
    NotationDecl, Particle, Repetition, TokenizedType,
};
pub use node::{
    AttValue, Attribute, CData, CharRadix, Comment, Content, Element, EntityValue,
    ProcessingInstruction, Reference, Segment,
};

/// A parsed XML document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// `None` when the document has neither an XML declaration nor a DOCTYPE
    pub prolog: Option<Prolog>,
    pub root: Element,
    /// Comments and processing instructions after the root element
    pub misc: Vec<Misc>,
}

impl Document {
    /// Copy of the document with layout whitespace removed from every
    /// element-only element
    ///
    /// Rendering re-indents element-only content, so a rendered document
    /// equals its source after both pass through this.
    #[must_use]
    pub fn without_layout_whitespace(&self) -> Self {
        Self {
            root: self.root.without_layout_whitespace(),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prolog {
    pub xml_decl: Option<XmlDecl>,
    pub doctype: Option<DocType>,
}

impl Prolog {
    pub const fn is_empty(&self) -> bool {
        self.xml_decl.is_none() && self.doctype.is_none()
    }
}

/// `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDecl {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: bool,
}

/// Comment or processing instruction outside the root element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Misc {
    Comment(Comment),
    Pi(ProcessingInstruction),
}

impl fmt::Display for XmlDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<?xml version=\"{}\"", self.version)?;
        if let Some(encoding) = &self.encoding {
            write!(f, " encoding=\"{encoding}\"")?;
        }
        if self.standalone {
            write!(f, " standalone=\"yes\"")?;
        }
        write!(f, "?>")
    }
}

impl fmt::Display for Misc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(comment) => write!(f, "{comment}"),
            Self::Pi(pi) => write!(f, "{pi}"),
        }
    }
}
