//! Internal-subset markup declarations, processing instructions and comments

use super::Parser;
use crate::ast::{
    AttDef, AttType, AttlistDecl, Comment, DefaultDecl, ElementDecl, EntityDecl, EntityDef,
    EntityKind, ExternalId, MarkupDecl, NotationDecl, ProcessingInstruction, TokenizedType,
};
use crate::chars::{is_name_start_char, is_quote};
use crate::error::{ErrorKind, Production, Result};
use crate::scanner::Scanner;

/// Literal prefix that selects a markup declaration parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MarkupKeyword {
    Element,
    Attlist,
    Entity,
    Notation,
    Pi,
    Comment,
}

impl MarkupKeyword {
    const PREFIXES: [(&'static str, Self); 6] = [
        ("<!ELEMENT", Self::Element),
        ("<!ATTLIST", Self::Attlist),
        ("<!ENTITY", Self::Entity),
        ("<!NOTATION", Self::Notation),
        ("<!--", Self::Comment),
        ("<?", Self::Pi),
    ];

    pub(crate) fn detect(scanner: &Scanner) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| scanner.test_str(prefix))
            .map(|&(_, keyword)| keyword)
    }
}

impl Parser {
    /// `markupdecl ::= elementdecl | AttlistDecl | EntityDecl | NotationDecl | PI | Comment`
    pub(crate) fn parse_markup_decl(&mut self, keyword: MarkupKeyword) -> Result<MarkupDecl> {
        Ok(match keyword {
            MarkupKeyword::Element => MarkupDecl::Element(self.parse_element_decl()?),
            MarkupKeyword::Attlist => MarkupDecl::Attlist(self.parse_attlist_decl()?),
            MarkupKeyword::Entity => MarkupDecl::Entity(self.parse_entity_decl()?),
            MarkupKeyword::Notation => MarkupDecl::Notation(self.parse_notation_decl()?),
            MarkupKeyword::Pi => MarkupDecl::Pi(self.parse_pi()?),
            MarkupKeyword::Comment => MarkupDecl::Comment(self.parse_comment()?),
        })
    }

    /// `elementdecl ::= '<!ELEMENT' S Name S contentspec S? '>'`
    pub(crate) fn parse_element_decl(&mut self) -> Result<ElementDecl> {
        self.expect_str(Production::ElementDecl, "<!ELEMENT")?;
        self.parse_space(Production::ElementDecl)?;
        let name = self.parse_name(Production::ElementDecl)?;
        self.parse_space(Production::ElementDecl)?;
        let content_spec = self.parse_content_spec()?;
        self.skip_space();
        self.expect_char(Production::ElementDecl, '>')?;
        Ok(ElementDecl { name, content_spec })
    }

    /// `AttlistDecl ::= '<!ATTLIST' S Name AttDef* S? '>'`
    pub(crate) fn parse_attlist_decl(&mut self) -> Result<AttlistDecl> {
        self.expect_str(Production::AttlistDecl, "<!ATTLIST")?;
        self.parse_space(Production::AttlistDecl)?;
        let name = self.parse_name(Production::AttlistDecl)?;

        let mut defs = Vec::new();
        loop {
            let mark = self.scanner.mark();
            if self.skip_space() && self.scanner.test_with(is_name_start_char) {
                defs.push(self.parse_att_def()?);
            } else {
                self.scanner.restore(mark);
                break;
            }
        }

        self.skip_space();
        self.expect_char(Production::AttlistDecl, '>')?;
        Ok(AttlistDecl { name, defs })
    }

    /// `AttDef ::= S Name S AttType S DefaultDecl`, after the leading space
    pub(crate) fn parse_att_def(&mut self) -> Result<AttDef> {
        let name = self.parse_name(Production::AttDef)?;
        self.parse_space(Production::AttDef)?;
        let att_type = self.parse_att_type()?;
        self.parse_space(Production::AttDef)?;
        let default = self.parse_default_decl()?;
        Ok(AttDef {
            name,
            att_type,
            default,
        })
    }

    /// `AttType ::= StringType | TokenizedType | EnumeratedType`
    pub(crate) fn parse_att_type(&mut self) -> Result<AttType> {
        if self.scanner.consume_str("CDATA") {
            return Ok(AttType::CData);
        }

        // ID/IDREF/IDREFS and friends are prefixes of each other
        let tokenized = TokenizedType::ALL
            .into_iter()
            .filter(|tokenized| self.scanner.test_str(tokenized.keyword()))
            .max_by_key(|tokenized| tokenized.keyword().len());
        if let Some(tokenized) = tokenized {
            self.scanner.advance_by(tokenized.keyword().len());
            return Ok(AttType::Tokenized(tokenized));
        }

        if self.scanner.consume_str("NOTATION") {
            self.parse_space(Production::AttType)?;
            let names = self.parse_token_group(Production::AttType, |p| {
                p.parse_name(Production::AttType)
            })?;
            return Ok(AttType::Notation(names));
        }

        if self.scanner.test('(') {
            let tokens = self.parse_token_group(Production::AttType, |p| {
                p.parse_nmtoken(Production::Nmtoken)
            })?;
            return Ok(AttType::Enumeration(tokens));
        }

        Err(self.expected(Production::AttType, "attribute type"))
    }

    /// `'(' S? token (S? '|' S? token)* S? ')'`
    fn parse_token_group(
        &mut self,
        production: Production,
        token: impl Fn(&mut Self) -> Result<String>,
    ) -> Result<Vec<String>> {
        self.expect_char(production, '(')?;
        self.skip_space();
        let mut tokens = vec![token(self)?];
        loop {
            self.skip_space();
            if !self.scanner.consume('|') {
                break;
            }
            self.skip_space();
            tokens.push(token(self)?);
        }
        self.expect_char(production, ')')?;
        Ok(tokens)
    }

    /// `DefaultDecl ::= '#REQUIRED' | '#IMPLIED' | (('#FIXED' S)? AttValue)`
    pub(crate) fn parse_default_decl(&mut self) -> Result<DefaultDecl> {
        if self.scanner.consume_str("#REQUIRED") {
            return Ok(DefaultDecl::Required);
        }
        if self.scanner.consume_str("#IMPLIED") {
            return Ok(DefaultDecl::Implied);
        }
        if self.scanner.consume_str("#FIXED") {
            self.parse_space(Production::DefaultDecl)?;
        }
        Ok(DefaultDecl::Fixed(self.parse_att_value()?))
    }

    /// `EntityDecl ::= '<!ENTITY' S ('%' S)? Name S EntityDef S? '>'`
    pub(crate) fn parse_entity_decl(&mut self) -> Result<EntityDecl> {
        self.expect_str(Production::EntityDecl, "<!ENTITY")?;
        self.parse_space(Production::EntityDecl)?;
        let kind = if self.scanner.consume('%') {
            self.parse_space(Production::EntityDecl)?;
            EntityKind::Parameter
        } else {
            EntityKind::General
        };
        let name = self.parse_name(Production::EntityDecl)?;
        self.parse_space(Production::EntityDecl)?;

        let definition = if self.scanner.test_with(is_quote) {
            EntityDef::Literal(self.parse_entity_value()?)
        } else {
            let external_id = self.parse_external_id()?;
            let ndata = if kind == EntityKind::General && self.probe_keyword("NDATA") {
                self.expect_str(Production::EntityDecl, "NDATA")?;
                self.parse_space(Production::EntityDecl)?;
                Some(self.parse_name(Production::EntityDecl)?)
            } else {
                None
            };
            EntityDef::External { external_id, ndata }
        };

        self.skip_space();
        self.expect_char(Production::EntityDecl, '>')?;
        Ok(EntityDecl {
            name,
            kind,
            definition,
        })
    }

    /// `NotationDecl ::= '<!NOTATION' S Name S (ExternalID | PublicID) S? '>'`
    pub(crate) fn parse_notation_decl(&mut self) -> Result<NotationDecl> {
        self.expect_str(Production::NotationDecl, "<!NOTATION")?;
        self.parse_space(Production::NotationDecl)?;
        let name = self.parse_name(Production::NotationDecl)?;
        self.parse_space(Production::NotationDecl)?;

        let external_id = if self.scanner.consume_str("PUBLIC") {
            // PublicID ::= 'PUBLIC' S PubidLiteral; the system literal is optional here
            self.parse_space(Production::NotationDecl)?;
            let pubid = self.parse_pubid_literal()?;
            let mark = self.scanner.mark();
            let system = if self.skip_space() && self.scanner.test_with(is_quote) {
                Some(self.parse_system_literal()?)
            } else {
                self.scanner.restore(mark);
                None
            };
            ExternalId::Public { pubid, system }
        } else {
            self.parse_external_id()?
        };

        self.skip_space();
        self.expect_char(Production::NotationDecl, '>')?;
        Ok(NotationDecl { name, external_id })
    }

    /// `PI ::= '<?' PITarget (S (Char* - (Char* '?>' Char*)))? '?>'`
    pub(crate) fn parse_pi(&mut self) -> Result<ProcessingInstruction> {
        self.expect_str(Production::ProcessingInstruction, "<?")?;
        let start = self.scanner.mark();
        let target = self.parse_name(Production::ProcessingInstruction)?;
        if target.eq_ignore_ascii_case("xml") {
            return Err(self.error_at(
                Production::ProcessingInstruction,
                ErrorKind::ReservedPiTarget(target),
                start,
            ));
        }

        let instruction = if self.skip_space() {
            self.take_until(Production::ProcessingInstruction, "?>")?
        } else {
            self.expect_str(Production::ProcessingInstruction, "?>")?;
            String::new()
        };
        Ok(ProcessingInstruction {
            target,
            instruction,
        })
    }

    /// `Comment ::= '<!--' ((Char - '-') | ('-' (Char - '-')))* '-->'`
    pub(crate) fn parse_comment(&mut self) -> Result<Comment> {
        self.expect_str(Production::Comment, "<!--")?;
        let text = self.take_until(Production::Comment, "--")?;
        if !self.scanner.consume('>') {
            return Err(self.expected(Production::Comment, "'>' after '--'"));
        }
        Ok(Comment(text))
    }
}
