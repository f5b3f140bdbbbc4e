//! Quoted literals and references

use super::Parser;
use crate::ast::{AttValue, CharRadix, EntityValue, Reference, Segment};
use crate::chars::{is_char, is_pubid_char};
use crate::error::{ErrorKind, Production, Result};

/// Which quoted value is being read; they differ in the raw characters and
/// reference forms they accept
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ValueKind {
    Entity,
    Attribute,
}

impl ValueKind {
    const fn production(self) -> Production {
        match self {
            Self::Entity => Production::EntityValue,
            Self::Attribute => Production::AttValue,
        }
    }
}

fn flush_text(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

impl Parser {
    /// `Reference ::= EntityRef | CharRef`
    pub(crate) fn parse_reference(&mut self) -> Result<Reference> {
        if self.scanner.test_str("&#") {
            self.parse_char_ref()
        } else {
            self.parse_entity_ref()
        }
    }

    /// `CharRef ::= '&#' [0-9]+ ';' | '&#x' [0-9a-fA-F]+ ';'`
    pub(crate) fn parse_char_ref(&mut self) -> Result<Reference> {
        let radix = if self.scanner.consume_str("&#x") {
            CharRadix::Hexadecimal
        } else {
            self.expect_str(Production::CharRef, "&#")?;
            CharRadix::Decimal
        };

        let start = self.scanner.mark();
        self.scanner.skip_while(|c| c.is_digit(radix.radix()));
        let digits = self.scanner.slice_from(start);
        if digits.is_empty() {
            return Err(self.expected(Production::CharRef, "digit"));
        }
        self.expect_char(Production::CharRef, ';')?;
        Ok(Reference::Char { radix, digits })
    }

    /// `EntityRef ::= '&' Name ';'`
    pub(crate) fn parse_entity_ref(&mut self) -> Result<Reference> {
        self.expect_char(Production::EntityRef, '&')?;
        let name = self.parse_name(Production::EntityRef)?;
        self.expect_char(Production::EntityRef, ';')?;
        Ok(Reference::Entity(name))
    }

    /// `PEReference ::= '%' Name ';'`, returning the name
    pub(crate) fn parse_pe_reference(&mut self) -> Result<String> {
        self.expect_char(Production::PeReference, '%')?;
        let name = self.parse_name(Production::PeReference)?;
        self.expect_char(Production::PeReference, ';')?;
        Ok(name)
    }

    /// `EntityValue ::= '"' ([^%&"] | PEReference | Reference)* '"'`
    pub(crate) fn parse_entity_value(&mut self) -> Result<EntityValue> {
        self.parse_value_segments(ValueKind::Entity).map(EntityValue)
    }

    /// `AttValue ::= '"' ([^<&"] | Reference)* '"'`
    pub(crate) fn parse_att_value(&mut self) -> Result<AttValue> {
        self.parse_value_segments(ValueKind::Attribute).map(AttValue)
    }

    fn parse_value_segments(&mut self, kind: ValueKind) -> Result<Vec<Segment>> {
        let production = kind.production();
        let quote = self.parse_quote(production)?;
        let mut segments = Vec::new();
        let mut text = String::new();

        loop {
            match self.scanner.current() {
                None => return Err(self.error(production, ErrorKind::UnexpectedEof)),
                Some(c) if c == quote => {
                    self.scanner.advance();
                    break;
                }
                Some('&') => {
                    flush_text(&mut segments, &mut text);
                    segments.push(Segment::Reference(self.parse_reference()?));
                }
                Some('%') if kind == ValueKind::Entity => {
                    flush_text(&mut segments, &mut text);
                    let name = self.parse_pe_reference()?;
                    segments.push(Segment::Reference(Reference::Parameter(name)));
                }
                Some('<') if kind == ValueKind::Attribute => {
                    return Err(self.error(production, ErrorKind::InvalidChar('<')));
                }
                Some(c) if !is_char(c) => {
                    return Err(self.error(production, ErrorKind::InvalidChar(c)));
                }
                Some(c) => {
                    text.push(c);
                    self.scanner.advance();
                }
            }
        }

        flush_text(&mut segments, &mut text);
        Ok(segments)
    }

    /// `SystemLiteral ::= ('"' [^"]* '"') | ("'" [^']* "'")`
    pub(crate) fn parse_system_literal(&mut self) -> Result<String> {
        self.parse_literal(Production::SystemLiteral, is_char)
    }

    /// `PubidLiteral ::= '"' PubidChar* '"' | "'" (PubidChar - "'")* "'"`
    pub(crate) fn parse_pubid_literal(&mut self) -> Result<String> {
        self.parse_literal(Production::PubidLiteral, is_pubid_char)
    }

    /// Quoted run of characters satisfying `allowed`
    fn parse_literal(
        &mut self,
        production: Production,
        allowed: impl Fn(char) -> bool,
    ) -> Result<String> {
        let quote = self.parse_quote(production)?;
        let start = self.scanner.mark();
        self.scanner.skip_while(|c| c != quote && allowed(c));
        let value = self.scanner.slice_from(start);

        match self.scanner.current() {
            Some(c) if c == quote => {
                self.scanner.advance();
                Ok(value)
            }
            Some(c) => Err(self.error(production, ErrorKind::InvalidChar(c))),
            None => Err(self.error(production, ErrorKind::UnexpectedEof)),
        }
    }
}
