//! Elements and their content

use super::Parser;
use crate::ast::{Attribute, CData, Content, Element};
use crate::chars::{is_char, is_name_start_char};
use crate::error::{ErrorKind, Production, Result};

impl Parser {
    /// `element ::= EmptyElemTag | STag content ETag`
    pub(crate) fn parse_element(&mut self) -> Result<Element> {
        self.nested(Production::Element, Self::parse_element_at)
    }

    fn parse_element_at(&mut self) -> Result<Element> {
        self.expect_char(Production::Element, '<')?;
        let name = self.parse_name(Production::Element)?;

        let mut attributes = Vec::new();
        loop {
            let mark = self.scanner.mark();
            if self.skip_space() && self.scanner.test_with(is_name_start_char) {
                attributes.push(self.parse_attribute()?);
            } else {
                self.scanner.restore(mark);
                break;
            }
        }
        self.skip_space();

        if self.scanner.consume_str("/>") {
            return Ok(Element {
                name,
                attributes,
                contents: Vec::new(),
                is_empty_tag: true,
            });
        }
        self.expect_char(Production::Element, '>')?;

        let contents = self.parse_contents()?;
        self.parse_end_tag(&name)?;
        Ok(Element {
            name,
            attributes,
            contents,
            is_empty_tag: false,
        })
    }

    /// `Attribute ::= Name Eq AttValue`
    pub(crate) fn parse_attribute(&mut self) -> Result<Attribute> {
        let name = self.parse_name(Production::Attribute)?;
        self.parse_eq(Production::Attribute)?;
        let value = self.parse_att_value()?;
        Ok(Attribute { name, value })
    }

    /// `ETag ::= '</' Name S? '>'`; the name must match the start tag
    pub(crate) fn parse_end_tag(&mut self, expected: &str) -> Result<()> {
        self.expect_str(Production::EndTag, "</")?;
        let start = self.scanner.mark();
        let name = self.parse_name(Production::EndTag)?;
        if name != expected {
            return Err(self.error_at(
                Production::EndTag,
                ErrorKind::MismatchedTag {
                    expected: expected.to_string(),
                    found: name,
                },
                start,
            ));
        }
        self.skip_space();
        self.expect_char(Production::EndTag, '>')
    }

    /// `content ::= CharData? ((element | Reference | CDSect | PI | Comment) CharData?)*`
    ///
    /// Stops in front of `</` or at end of input.
    pub(crate) fn parse_contents(&mut self) -> Result<Vec<Content>> {
        let mut contents = Vec::new();
        while !self.scanner.is_eof() && !self.scanner.test_str("</") {
            let content = if self.scanner.test_str("<!--") {
                Content::Comment(self.parse_comment()?)
            } else if self.scanner.test_str("<?") {
                Content::Pi(self.parse_pi()?)
            } else if self.scanner.test_str("<![CDATA[") {
                Content::CData(self.parse_cdata()?)
            } else if self.scanner.test('&') {
                Content::Reference(self.parse_reference()?)
            } else if self.scanner.test('<') {
                Content::Element(self.parse_element()?)
            } else {
                Content::Text(self.parse_char_data()?)
            };
            contents.push(content);
        }
        Ok(contents)
    }

    /// `CharData ::= [^<&]* - ([^<&]* ']]>' [^<&]*)`
    fn parse_char_data(&mut self) -> Result<String> {
        let start = self.scanner.mark();
        while let Some(c) = self.scanner.current() {
            if c == '<' || c == '&' {
                break;
            }
            if !is_char(c) {
                return Err(self.error(Production::Content, ErrorKind::InvalidChar(c)));
            }
            if self.scanner.test_str("]]>") {
                return Err(self.error(Production::Content, ErrorKind::CdataEndInText));
            }
            self.scanner.advance();
        }
        Ok(self.scanner.slice_from(start))
    }

    /// `CDSect ::= '<![CDATA[' CData ']]>'`
    pub(crate) fn parse_cdata(&mut self) -> Result<CData> {
        self.expect_str(Production::CdSect, "<![CDATA[")?;
        self.take_until(Production::CdSect, "]]>").map(CData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AttValue, Reference, Segment};
    use crate::config::ParserConfig;

    #[test]
    fn test_empty_elements() -> Result<()> {
        let element = Parser::new("<a></a>").parse_element()?;
        assert_eq!(element.name, "a");
        assert!(element.contents.is_empty());
        assert!(!element.is_empty_tag);

        let element = Parser::new("<br />").parse_element()?;
        assert!(element.is_empty_tag);
        Ok(())
    }

    #[test]
    fn test_mismatched_tag() {
        let err = Parser::new("<a></b>").parse_element().err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MismatchedTag {
                expected: "a".to_string(),
                found: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_contents_keep_references() -> Result<()> {
        let element = Parser::new("<root><child/>text&amp;ref;</root>").parse_element()?;
        assert_eq!(
            element.contents,
            vec![
                Content::Element(Element {
                    name: "child".to_string(),
                    attributes: Vec::new(),
                    contents: Vec::new(),
                    is_empty_tag: true,
                }),
                Content::Text("text".to_string()),
                Content::Reference(Reference::Entity("amp".to_string())),
                Content::Text("ref;".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_attributes() -> Result<()> {
        let element =
            Parser::new(r#"<img src = "a.png" alt='&quot;A&quot;' src="b.png"/>"#).parse_element()?;
        let names: Vec<_> = element.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["src", "alt", "src"]);
        assert_eq!(
            element.attribute("src").map(|a| &a.value),
            Some(&AttValue(vec![Segment::Text("a.png".to_string())]))
        );

        assert!(Parser::new("<a b></a>").parse_element().is_err());
        assert!(Parser::new("<a b=c></a>").parse_element().is_err());
        assert!(Parser::new("<a b='1'c='2'/>").parse_element().is_err());
        Ok(())
    }

    #[test]
    fn test_whitespace_runs_are_kept() -> Result<()> {
        let element = Parser::new("<a>\n  <b> x </b>\n  <!-- c -->\n</a>").parse_element()?;
        assert_eq!(element.contents.len(), 5);
        assert_eq!(element.contents.first(), Some(&Content::Text("\n  ".to_string())));
        assert_eq!(element.contents.last(), Some(&Content::Text("\n".to_string())));
        let inner = element.child_elements().next().map(|b| b.contents.clone());
        assert_eq!(inner, Some(vec![Content::Text(" x ".to_string())]));

        let element = Parser::new("<p><b>a</b> <i>b</i></p>").parse_element()?;
        assert_eq!(element.contents.len(), 3);
        assert_eq!(element.contents.get(1), Some(&Content::Text(" ".to_string())));

        let element = Parser::new("<a> </a>").parse_element()?;
        assert_eq!(element.contents, vec![Content::Text(" ".to_string())]);
        Ok(())
    }

    #[test]
    fn test_cdata_and_pi() -> Result<()> {
        let element =
            Parser::new("<s><![CDATA[if (a < b && c) ]] ]]><?php echo 1; ?></s>").parse_element()?;
        assert_eq!(
            element.contents,
            vec![
                Content::CData(CData("if (a < b && c) ]] ".to_string())),
                Content::Pi(crate::ast::ProcessingInstruction {
                    target: "php".to_string(),
                    instruction: "echo 1; ".to_string(),
                }),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_content_errors() {
        let err = Parser::new("<a>x ]]> y</a>").parse_element().err();
        assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::CdataEndInText));

        for invalid in [
            "<a>",
            "<a><b></a>",
            "<a>&bad</a>",
            "<a><!-- -- --></a>",
            "<a><![CDATA[x</a>",
        ] {
            assert!(Parser::new(invalid).parse_element().is_err(), "{invalid}");
        }
    }

    #[test]
    fn test_element_depth_limit() {
        let config = ParserConfig::default().with_max_depth(3);
        assert!(Parser::with_config("<a><b><c/></b></a>", config)
            .parse_element()
            .is_ok());
        let err = Parser::with_config("<a><b><c><d/></c></b></a>", config)
            .parse_element()
            .err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxDepthExceeded { max: 3 })
        );
    }

    #[test]
    fn test_error_position() {
        let err = Parser::new("<a>\n  <b></c>\n</a>").parse_element().err();
        assert_eq!(err.as_ref().map(|e| (e.line(), e.column())), Some((2, 8)));
    }
}
