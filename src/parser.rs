//! Recursive-descent XML parser
//!
//! The parser is split by grammar layer: `prolog` (XML declaration, Misc and
//! DOCTYPE), `markup` (internal-subset declarations), `content_model`
//! (element content specifications), `element` (the element tree) and
//! `reference` (quoted literals and references). All layers share the
//! lexical helpers defined here.
//!
//! Ordered alternatives are tried through [`Parser::attempt`], which puts the
//! cursor back where it was when an alternative fails.

mod content_model;
mod element;
mod markup;
mod prolog;
mod reference;

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{ContentParticle, Document};
use crate::chars::{is_char, is_name_char, is_name_start_char, is_quote, is_space};
use crate::config::{ParserConfig, ParsingContext};
use crate::error::{Error, ErrorKind, Production, Result};
use crate::scanner::{Mark, Scanner};

/// Content particles already parsed at a given offset, with the cursor
/// reached after them
type ParticleMemo = HashMap<usize, Result<(ContentParticle, Mark)>>;

/// XML document parser
///
/// A parser is single-use: build one per document.
#[derive(Debug)]
pub struct Parser {
    scanner: Scanner,
    input_len: usize,
    config: ParserConfig,
    context: ParsingContext,
    particle_memo: ParticleMemo,
}

impl Parser {
    /// Create a parser with the default limits
    pub fn new(input: &str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: &str, config: ParserConfig) -> Self {
        Self {
            scanner: Scanner::new(input),
            input_len: input.len(),
            config,
            context: ParsingContext::new(),
            particle_memo: HashMap::new(),
        }
    }

    /// Parse the whole input as one document
    ///
    /// `document ::= prolog element Misc*`
    pub fn parse(&mut self) -> Result<Document> {
        self.config.validate_size(self.input_len)?;

        let prolog = self.parse_prolog()?;
        debug!(
            has_xml_decl = prolog.as_ref().is_some_and(|p| p.xml_decl.is_some()),
            has_doctype = prolog.as_ref().is_some_and(|p| p.doctype.is_some()),
            "prolog parsed"
        );

        if !self.scanner.test('<') {
            return Err(self.expected(Production::Prolog, "root element"));
        }
        let root = self.parse_element()?;
        debug!(root = %root.name, "root element parsed");

        let misc = self.parse_misc_items()?;
        if !self.scanner.is_eof() {
            return Err(self.error(Production::Misc, ErrorKind::TrailingContent));
        }

        Ok(Document { prolog, root, misc })
    }

    /// Run `f`, restoring the cursor if it fails
    pub(crate) fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mark = self.scanner.mark();
        let result = f(self);
        if result.is_err() {
            self.scanner.restore(mark);
        }
        result
    }

    /// Run `f` one nesting level deeper, failing once `max_depth` is passed
    pub(crate) fn nested<T>(
        &mut self,
        production: Production,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.context
            .enter_nested(&self.config)
            .map_err(|kind| self.error(production, kind))?;
        let result = f(self);
        self.context.exit_nested();
        result
    }

    pub(crate) fn error(&self, production: Production, kind: ErrorKind) -> Error {
        Error::new(production, kind, self.scanner.position())
    }

    pub(crate) fn error_at(&self, production: Production, kind: ErrorKind, mark: Mark) -> Error {
        Error::new(production, kind, mark.pos())
    }

    /// Error for a missing `expected`, reported as exhaustion at end of input
    pub(crate) fn expected(&self, production: Production, expected: &str) -> Error {
        let kind = match self.scanner.current() {
            None => ErrorKind::UnexpectedEof,
            Some(c) => ErrorKind::Expected {
                expected: expected.to_string(),
                found: format!("{c:?}"),
            },
        };
        self.error(production, kind)
    }

    pub(crate) fn expect_char(&mut self, production: Production, expected: char) -> Result<()> {
        if self.scanner.consume(expected) {
            Ok(())
        } else {
            Err(self.expected(production, &format!("{expected:?}")))
        }
    }

    pub(crate) fn expect_str(&mut self, production: Production, literal: &str) -> Result<()> {
        if self.scanner.consume_str(literal) {
            Ok(())
        } else {
            Err(self.expected(production, &format!("{literal:?}")))
        }
    }

    /// Skip optional whitespace, reporting whether any was found
    pub(crate) fn skip_space(&mut self) -> bool {
        let start = self.scanner.cursor();
        self.scanner.skip_while(is_space);
        self.scanner.cursor() > start
    }

    /// Mandatory whitespace
    pub(crate) fn parse_space(&mut self, production: Production) -> Result<()> {
        if self.skip_space() {
            Ok(())
        } else {
            Err(self.expected(production, "whitespace"))
        }
    }

    /// Consume whitespace and report whether `keyword` follows it; the
    /// cursor is left untouched when it does not
    pub(crate) fn probe_keyword(&mut self, keyword: &str) -> bool {
        let mark = self.scanner.mark();
        if self.skip_space() && self.scanner.test_str(keyword) {
            true
        } else {
            self.scanner.restore(mark);
            false
        }
    }

    /// `Eq ::= S? '=' S?`
    pub(crate) fn parse_eq(&mut self, production: Production) -> Result<()> {
        self.skip_space();
        self.expect_char(production, '=')?;
        self.skip_space();
        Ok(())
    }

    /// Consume an opening quote and return it
    pub(crate) fn parse_quote(&mut self, production: Production) -> Result<char> {
        match self.scanner.current() {
            Some(c) if is_quote(c) => {
                self.scanner.advance();
                Ok(c)
            }
            _ => Err(self.expected(production, "quote")),
        }
    }

    /// `Name ::= NameStartChar (NameChar)*`
    pub(crate) fn parse_name(&mut self, production: Production) -> Result<String> {
        match self.scanner.current() {
            None => return Err(self.error(production, ErrorKind::UnexpectedEof)),
            Some(c) if !is_name_start_char(c) => {
                return Err(self.error(production, ErrorKind::InvalidName))
            }
            Some(_) => {}
        }
        let start = self.scanner.mark();
        self.scanner.skip_while(is_name_char);
        Ok(self.scanner.slice_from(start))
    }

    /// Collect characters up to `terminator` and consume the terminator
    pub(crate) fn take_until(&mut self, production: Production, terminator: &str) -> Result<String> {
        let start = self.scanner.mark();
        while !self.scanner.test_str(terminator) {
            match self.scanner.current() {
                None => return Err(self.error(production, ErrorKind::UnexpectedEof)),
                Some(c) if !is_char(c) => {
                    return Err(self.error(production, ErrorKind::InvalidChar(c)))
                }
                Some(_) => self.scanner.advance(),
            }
        }
        let text = self.scanner.slice_from(start);
        self.scanner.advance_by(terminator.chars().count());
        Ok(text)
    }

    /// `Nmtoken ::= (NameChar)+`
    pub(crate) fn parse_nmtoken(&mut self, production: Production) -> Result<String> {
        let start = self.scanner.mark();
        self.scanner.skip_while(is_name_char);
        if self.scanner.cursor() == start.offset() {
            return Err(match self.scanner.current() {
                None => self.error(production, ErrorKind::UnexpectedEof),
                Some(_) => self.error(production, ErrorKind::InvalidName),
            });
        }
        Ok(self.scanner.slice_from(start))
    }
}
