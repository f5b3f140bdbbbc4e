//! Prolog: XML declaration, Misc and DOCTYPE

use tracing::{debug, trace, warn};

use super::markup::MarkupKeyword;
use super::Parser;
use crate::ast::{DocType, ExternalId, Misc, Prolog, XmlDecl};
use crate::chars::{is_enc_name_char, is_space, is_version_char};
use crate::error::{ErrorKind, Production, Result};

impl Parser {
    /// `prolog ::= XMLDecl? Misc* (doctypedecl Misc*)?`
    ///
    /// Comments and processing instructions of the prolog are consumed but
    /// not kept. Returns `None` when there is neither a declaration nor a
    /// DOCTYPE.
    pub(crate) fn parse_prolog(&mut self) -> Result<Option<Prolog>> {
        self.skip_space();
        let xml_decl = if self.at_xml_decl() {
            Some(self.parse_xml_decl()?)
        } else {
            None
        };
        self.parse_misc_items()?;

        let doctype = if self.scanner.test_str("<!DOCTYPE") {
            let doctype = self.parse_doctype()?;
            self.parse_misc_items()?;
            Some(doctype)
        } else {
            None
        };

        let prolog = Prolog { xml_decl, doctype };
        Ok((!prolog.is_empty()).then_some(prolog))
    }

    /// `<?xml` followed by whitespace; `<?xml-stylesheet` and friends are PIs
    fn at_xml_decl(&self) -> bool {
        self.scanner.test_str("<?xml") && self.scanner.peek(5).is_some_and(is_space)
    }

    /// `XMLDecl ::= '<?xml' VersionInfo EncodingDecl? SDDecl? S? '?>'`
    pub(crate) fn parse_xml_decl(&mut self) -> Result<XmlDecl> {
        self.expect_str(Production::XmlDecl, "<?xml")?;
        let version = self.parse_version_info()?;
        let encoding = if self.probe_keyword("encoding") {
            Some(self.parse_encoding_decl()?)
        } else {
            None
        };
        let standalone = if self.probe_keyword("standalone") {
            self.parse_sd_decl()?
        } else {
            false
        };
        self.skip_space();
        self.expect_str(Production::XmlDecl, "?>")?;

        Ok(XmlDecl {
            version,
            encoding,
            standalone,
        })
    }

    /// `VersionInfo ::= S 'version' Eq ("'" VersionNum "'" | '"' VersionNum '"')`
    fn parse_version_info(&mut self) -> Result<String> {
        self.parse_space(Production::VersionInfo)?;
        self.expect_str(Production::VersionInfo, "version")?;
        self.parse_eq(Production::VersionInfo)?;
        self.parse_quoted_token(Production::VersionInfo, |_| true, is_version_char)
    }

    /// `EncodingDecl ::= S 'encoding' Eq ('"' EncName '"' | "'" EncName "'" )`
    ///
    /// The leading whitespace has already been consumed by the probe.
    fn parse_encoding_decl(&mut self) -> Result<String> {
        self.expect_str(Production::EncodingDecl, "encoding")?;
        self.parse_eq(Production::EncodingDecl)?;
        self.parse_quoted_token(
            Production::EncodingDecl,
            |c| c.is_ascii_alphabetic(),
            is_enc_name_char,
        )
    }

    /// `SDDecl ::= S 'standalone' Eq (("'" ('yes' | 'no') "'") | ('"' ('yes' | 'no') '"'))`
    fn parse_sd_decl(&mut self) -> Result<bool> {
        self.expect_str(Production::SdDecl, "standalone")?;
        self.parse_eq(Production::SdDecl)?;
        let quote = self.parse_quote(Production::SdDecl)?;
        let standalone = if self.scanner.consume_str("yes") {
            true
        } else if self.scanner.consume_str("no") {
            false
        } else {
            return Err(self.expected(Production::SdDecl, "'yes' or 'no'"));
        };
        self.expect_char(Production::SdDecl, quote)?;
        Ok(standalone)
    }

    /// Non-empty quoted token whose first character satisfies `first` and
    /// the rest satisfy `rest`; the closing quote must match the opening one
    fn parse_quoted_token(
        &mut self,
        production: Production,
        first: impl Fn(char) -> bool,
        rest: impl Fn(char) -> bool,
    ) -> Result<String> {
        let quote = self.parse_quote(production)?;
        if !self.scanner.test_with(|c| rest(c) && first(c)) {
            return Err(match self.scanner.current() {
                Some(c) => self.error(production, ErrorKind::InvalidChar(c)),
                None => self.error(production, ErrorKind::UnexpectedEof),
            });
        }
        let start = self.scanner.mark();
        self.scanner.skip_while(rest);
        let token = self.scanner.slice_from(start);
        self.expect_char(production, quote)?;
        Ok(token)
    }

    /// `Misc ::= Comment | PI`; whitespace is handled by the caller
    fn parse_misc(&mut self) -> Result<Option<Misc>> {
        if self.scanner.test_str("<!--") {
            Ok(Some(Misc::Comment(self.parse_comment()?)))
        } else if self.scanner.test_str("<?") {
            Ok(Some(Misc::Pi(self.parse_pi()?)))
        } else {
            Ok(None)
        }
    }

    /// `Misc*`, skipping whitespace between items
    pub(crate) fn parse_misc_items(&mut self) -> Result<Vec<Misc>> {
        let mut items = Vec::new();
        loop {
            self.skip_space();
            match self.parse_misc()? {
                Some(misc) => items.push(misc),
                None => return Ok(items),
            }
        }
    }

    /// `doctypedecl ::= '<!DOCTYPE' S Name (S ExternalID)? S? ('[' intSubset ']' S?)? '>'`
    pub(crate) fn parse_doctype(&mut self) -> Result<DocType> {
        self.expect_str(Production::Doctype, "<!DOCTYPE")?;
        self.parse_space(Production::Doctype)?;
        let name = self.parse_name(Production::Doctype)?;
        debug!(%name, "parsing DOCTYPE");

        let external_id = if self.probe_keyword("SYSTEM") || self.probe_keyword("PUBLIC") {
            Some(self.parse_external_id()?)
        } else {
            None
        };
        self.skip_space();

        let mut doctype = DocType {
            name,
            external_id,
            markups: Vec::new(),
            pe_reference: None,
        };
        if self.scanner.consume('[') {
            self.parse_internal_subset(&mut doctype)?;
            self.expect_char(Production::Doctype, ']')?;
            self.skip_space();
        }
        self.expect_char(Production::Doctype, '>')?;

        debug!(markups = doctype.markups.len(), "DOCTYPE parsed");
        Ok(doctype)
    }

    /// `intSubset ::= (markupdecl | PEReference | S)*`
    fn parse_internal_subset(&mut self, doctype: &mut DocType) -> Result<()> {
        loop {
            if let Some(keyword) = MarkupKeyword::detect(&self.scanner) {
                trace!(?keyword, "markup declaration");
                let start = self.scanner.mark();
                let markup = self.parse_markup_decl(keyword).map_err(|err| {
                    self.error_at(Production::MarkupDecl, ErrorKind::InvalidDeclaration, start)
                        .with_source(err)
                })?;
                doctype.markups.push(markup);
            } else if self.scanner.test('%') {
                doctype.pe_reference = Some(self.parse_pe_reference()?);
            } else if self.scanner.test_str("<![") {
                warn!("conditional section in internal subset");
                return Err(self.error(
                    Production::Doctype,
                    ErrorKind::Unsupported("conditional section".to_string()),
                ));
            } else if !self.skip_space() {
                return Ok(());
            }
        }
    }

    /// `ExternalID ::= 'SYSTEM' S SystemLiteral | 'PUBLIC' S PubidLiteral S SystemLiteral`
    pub(crate) fn parse_external_id(&mut self) -> Result<ExternalId> {
        if self.scanner.consume_str("SYSTEM") {
            self.parse_space(Production::ExternalId)?;
            let system = self.parse_system_literal()?;
            Ok(ExternalId::System { system })
        } else if self.scanner.consume_str("PUBLIC") {
            self.parse_space(Production::ExternalId)?;
            let pubid = self.parse_pubid_literal()?;
            self.parse_space(Production::ExternalId)?;
            let system = self.parse_system_literal()?;
            Ok(ExternalId::Public {
                pubid,
                system: Some(system),
            })
        } else {
            Err(self.expected(Production::ExternalId, "'SYSTEM' or 'PUBLIC'"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ContentSpec, ElementDecl, MarkupDecl};
    use crate::error::Error;

    fn root_kind(err: &Error) -> ErrorKind {
        err.root_cause().kind().clone()
    }

    #[test]
    fn test_xml_decl() -> Result<()> {
        let mut parser =
            Parser::new(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let decl = parser.parse_xml_decl()?;
        assert_eq!(
            decl,
            XmlDecl {
                version: "1.0".to_string(),
                encoding: Some("UTF-8".to_string()),
                standalone: true,
            }
        );
        assert!(parser.scanner.is_eof());

        let mut parser = Parser::new("<?xml version='1.0'  ?>");
        let decl = parser.parse_xml_decl()?;
        assert_eq!(decl.encoding, None);
        assert!(!decl.standalone);

        let mut parser = Parser::new("<?xml version='1.0' standalone='no'?>");
        assert!(!parser.parse_xml_decl()?.standalone);
        Ok(())
    }

    #[test]
    fn test_xml_decl_errors() {
        for invalid in [
            "<?xml?>",
            "<?xml encoding='UTF-8'?>",
            r#"<?xml version="1.0'?>"#,
            r#"<?xml version=""?>"#,
            r#"<?xml version="1.0" encoding="8bit"?>"#,
            r#"<?xml version="1.0" standalone="maybe"?>"#,
            r#"<?xml version="1.0" standalone="yes" encoding="UTF-8"?>"#,
            r#"<?xml version="1.0""#,
        ] {
            assert!(Parser::new(invalid).parse_xml_decl().is_err(), "{invalid}");
        }
    }

    #[test]
    fn test_prolog_variants() -> Result<()> {
        let mut parser = Parser::new("<?xml-stylesheet href='a.css'?><r/>");
        assert_eq!(parser.parse_prolog()?, None);
        assert!(parser.scanner.test_str("<r/>"));

        let mut parser = Parser::new("\n<!-- c --> <?pi x?>\n<!DOCTYPE r> <!-- d --><r/>");
        let prolog = parser.parse_prolog()?;
        let doctype = prolog.and_then(|p| p.doctype);
        assert_eq!(doctype.map(|d| d.name), Some("r".to_string()));
        assert!(parser.scanner.test_str("<r/>"));
        Ok(())
    }

    #[test]
    fn test_doctype_public() -> Result<()> {
        let mut parser = Parser::new(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "xhtml1-strict.dtd">"#,
        );
        let doctype = parser.parse_doctype()?;
        assert_eq!(doctype.name, "html");
        assert_eq!(
            doctype.external_id,
            Some(ExternalId::Public {
                pubid: "-//W3C//DTD XHTML 1.0 Strict//EN".to_string(),
                system: Some("xhtml1-strict.dtd".to_string()),
            })
        );
        assert!(doctype.markups.is_empty());
        Ok(())
    }

    #[test]
    fn test_doctype_internal_subset() -> Result<()> {
        let mut parser = Parser::new(
            "<!DOCTYPE note SYSTEM \"note.dtd\" [\n  <!ELEMENT note ANY>\n  %common;\n  <!-- c -->\n]>",
        );
        let doctype = parser.parse_doctype()?;
        assert!(matches!(doctype.external_id, Some(ExternalId::System { .. })));
        assert_eq!(doctype.markups.len(), 2);
        assert_eq!(
            doctype.markups.first(),
            Some(&MarkupDecl::Element(ElementDecl {
                name: "note".to_string(),
                content_spec: ContentSpec::Any,
            }))
        );
        assert_eq!(doctype.pe_reference.as_deref(), Some("common"));
        Ok(())
    }

    #[test]
    fn test_doctype_bad_declaration() {
        let mut parser = Parser::new("<!DOCTYPE a [\n<!ELEMENT a (#PCDATA|b)>\n]>");
        let err = parser.parse_doctype().err();
        assert_eq!(
            err.as_ref().map(|e| e.kind().clone()),
            Some(ErrorKind::InvalidDeclaration)
        );
        assert_eq!(err.as_ref().map(Error::line), Some(2));
        assert!(err.as_ref().is_some_and(|e| e.root_cause() != e));
    }

    #[test]
    fn test_doctype_conditional_section() {
        let mut parser = Parser::new("<!DOCTYPE a [<![INCLUDE[<!ELEMENT a ANY>]]>]>");
        let err = parser.parse_doctype().err();
        assert_eq!(
            err.map(|e| e.kind().category()),
            Some(crate::error::ErrorCategory::Unsupported)
        );
    }

    #[test]
    fn test_external_id() -> Result<()> {
        let mut parser = Parser::new("SYSTEM 'a.dtd'");
        assert_eq!(
            parser.parse_external_id()?,
            ExternalId::System {
                system: "a.dtd".to_string()
            }
        );

        let err = Parser::new("PUBLIC \"-//A//EN\"").parse_external_id().err();
        assert_eq!(err.as_ref().map(root_kind), Some(ErrorKind::UnexpectedEof));
        assert!(Parser::new("SYSTEM'a.dtd'").parse_external_id().is_err());
        assert!(Parser::new("LOCAL 'a.dtd'").parse_external_id().is_err());
        Ok(())
    }
}
