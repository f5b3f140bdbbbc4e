//! Error types for zxml

use std::fmt;
use thiserror::Error;

/// Position in source text
///
/// `offset` is a character index into the input. `line` and `col` are
/// 1-based, with columns counted in characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: usize, col: usize) -> Self {
        Self { offset, line, col }
    }
}

/// Grammar production that was being parsed when an error occurred
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Production {
    Document,
    Prolog,
    XmlDecl,
    VersionInfo,
    EncodingDecl,
    SdDecl,
    Misc,
    Doctype,
    ExternalId,
    SystemLiteral,
    PubidLiteral,
    Name,
    Nmtoken,
    MarkupDecl,
    ElementDecl,
    ContentSpec,
    Mixed,
    Children,
    ContentParticle,
    Choice,
    Seq,
    AttlistDecl,
    AttDef,
    AttType,
    DefaultDecl,
    EntityDecl,
    NotationDecl,
    EntityValue,
    AttValue,
    CharRef,
    EntityRef,
    PeReference,
    ProcessingInstruction,
    Comment,
    CdSect,
    Element,
    Attribute,
    EndTag,
    Content,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::Prolog => "prolog",
            Self::XmlDecl => "XML declaration",
            Self::VersionInfo => "version",
            Self::EncodingDecl => "encoding declaration",
            Self::SdDecl => "standalone declaration",
            Self::Misc => "misc",
            Self::Doctype => "DOCTYPE declaration",
            Self::ExternalId => "external ID",
            Self::SystemLiteral => "system literal",
            Self::PubidLiteral => "public ID literal",
            Self::Name => "name",
            Self::Nmtoken => "name token",
            Self::MarkupDecl => "markup declaration",
            Self::ElementDecl => "element type declaration",
            Self::ContentSpec => "content specification",
            Self::Mixed => "mixed content",
            Self::Children => "children content",
            Self::ContentParticle => "content particle",
            Self::Choice => "choice",
            Self::Seq => "sequence",
            Self::AttlistDecl => "attribute-list declaration",
            Self::AttDef => "attribute definition",
            Self::AttType => "attribute type",
            Self::DefaultDecl => "attribute default",
            Self::EntityDecl => "entity declaration",
            Self::NotationDecl => "notation declaration",
            Self::EntityValue => "entity value",
            Self::AttValue => "attribute value",
            Self::CharRef => "character reference",
            Self::EntityRef => "entity reference",
            Self::PeReference => "parameter-entity reference",
            Self::ProcessingInstruction => "processing instruction",
            Self::Comment => "comment",
            Self::CdSect => "CDATA section",
            Self::Element => "element",
            Self::Attribute => "attribute",
            Self::EndTag => "end tag",
            Self::Content => "content",
        };
        f.write_str(name)
    }
}

/// Broad class of an [`ErrorKind`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input does not match the expected production
    Syntax,
    /// Construct recognized but not handled by this parser
    Unsupported,
    /// Input ended while a construct expected more characters
    Exhaustion,
    /// A configured parser limit was hit
    Limit,
}

/// Error kind for detailed categorization
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    #[error("invalid character {0:?}")]
    InvalidChar(char),
    #[error("invalid name")]
    InvalidName,
    #[error("end tag </{found}> does not match start tag <{expected}>")]
    MismatchedTag { expected: String, found: String },
    #[error("processing instruction target {0:?} is reserved")]
    ReservedPiTarget(String),
    #[error("mixed content listing element names must end with ')*'")]
    MissingMixedRepetition,
    #[error("mixed content without element names must not end with '*'")]
    UnexpectedMixedRepetition,
    #[error("']]>' is not allowed in character data")]
    CdataEndInText,
    #[error("unexpected content after the root element")]
    TrailingContent,
    #[error("invalid markup declaration")]
    InvalidDeclaration,
    #[error("unsupported construct: {0}")]
    Unsupported(String),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("max depth exceeded: {max}")]
    MaxDepthExceeded { max: usize },
    #[error("max size exceeded: {max}")]
    MaxSizeExceeded { max: usize },
}

impl ErrorKind {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unsupported(_) => ErrorCategory::Unsupported,
            Self::UnexpectedEof => ErrorCategory::Exhaustion,
            Self::MaxDepthExceeded { .. } | Self::MaxSizeExceeded { .. } => ErrorCategory::Limit,
            Self::Expected { .. }
            | Self::InvalidChar(_)
            | Self::InvalidName
            | Self::MismatchedTag { .. }
            | Self::ReservedPiTarget(_)
            | Self::MissingMixedRepetition
            | Self::UnexpectedMixedRepetition
            | Self::CdataEndInText
            | Self::TrailingContent
            | Self::InvalidDeclaration => ErrorCategory::Syntax,
        }
    }
}

/// Main error type for zxml
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub struct Error {
    production: Production,
    kind: ErrorKind,
    pos: Pos,
    #[source]
    source: Option<Box<Error>>,
}

impl Error {
    pub fn new(production: Production, kind: ErrorKind, pos: Pos) -> Self {
        Self {
            production,
            kind,
            pos,
            source: None,
        }
    }

    /// Attach the lower-level error that caused this one
    pub fn with_source(mut self, source: Self) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn production(&self) -> Production {
        self.production
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn line(&self) -> usize {
        self.pos.line
    }

    pub fn column(&self) -> usize {
        self.pos.col
    }

    /// Innermost error of the wrapping chain
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Some(inner) = current.source.as_deref() {
            current = inner;
        }
        current
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error while parsing {} at {}: {}",
            self.production, self.pos, self.kind
        )
    }
}

/// Result type alias for zxml
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "line 10 column 5");
    }

    #[test]
    fn test_error_display() {
        let err = Error::new(
            Production::Comment,
            ErrorKind::UnexpectedEof,
            Pos::new(10, 2, 5),
        );
        assert_eq!(
            err.to_string(),
            "error while parsing comment at line 2 column 5: unexpected end of input"
        );
    }

    #[test]
    fn test_error_source_chain() {
        let inner = Error::new(Production::Name, ErrorKind::InvalidName, Pos::new(12, 2, 3));
        let outer = Error::new(
            Production::Doctype,
            ErrorKind::InvalidDeclaration,
            Pos::new(12, 2, 3),
        )
        .with_source(inner.clone());

        assert_eq!(outer.root_cause(), &inner);
        let source = outer.source().map(ToString::to_string);
        assert_eq!(source, Some(inner.to_string()));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ErrorKind::UnexpectedEof.category(), ErrorCategory::Exhaustion);
        assert_eq!(
            ErrorKind::Unsupported("conditional section".to_string()).category(),
            ErrorCategory::Unsupported
        );
        assert_eq!(
            ErrorKind::MaxDepthExceeded { max: 1 }.category(),
            ErrorCategory::Limit
        );
        assert_eq!(ErrorKind::InvalidName.category(), ErrorCategory::Syntax);
    }
}
