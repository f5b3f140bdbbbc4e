use std::fmt;

use crate::chars::is_space;

/// Radix of a character reference, which fixes its `&#` / `&#x` prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharRadix {
    Decimal,
    Hexadecimal,
}

impl CharRadix {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Decimal => "&#",
            Self::Hexadecimal => "&#x",
        }
    }

    pub const fn radix(self) -> u32 {
        match self {
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }
}

/// Unexpanded reference as it appears in the source
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reference {
    /// `&#N;` or `&#xH;`
    Char { radix: CharRadix, digits: String },
    /// `&Name;`
    Entity(String),
    /// `%Name;`
    Parameter(String),
}

impl Reference {
    /// Decode a character reference. Entity references are never expanded.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char { radix, digits } => u32::from_str_radix(digits, radix.radix())
                .ok()
                .and_then(char::from_u32),
            Self::Entity(_) | Self::Parameter(_) => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char { radix, digits } => write!(f, "{}{digits};", radix.prefix()),
            Self::Entity(name) => write!(f, "&{name};"),
            Self::Parameter(name) => write!(f, "%{name};"),
        }
    }
}

/// One piece of a quoted value: literal text or a reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Reference(Reference),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Reference(reference) => write!(f, "{reference}"),
        }
    }
}

/// Pick a quote character that does not occur in the literal text
pub(crate) fn quote_for<'a>(mut texts: impl Iterator<Item = &'a str>) -> char {
    if texts.any(|text| text.contains('"')) {
        '\''
    } else {
        '"'
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, segments: &[Segment]) -> fmt::Result {
    let quote = quote_for(segments.iter().filter_map(|segment| match segment {
        Segment::Text(text) => Some(text.as_str()),
        Segment::Reference(_) => None,
    }));
    write!(f, "{quote}")?;
    for segment in segments {
        write!(f, "{segment}")?;
    }
    write!(f, "{quote}")
}

/// Literal value of an internal entity; may hold parameter-entity references
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityValue(pub Vec<Segment>);

impl fmt::Display for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quoted(f, &self.0)
    }
}

/// Attribute value; never holds parameter-entity references or raw `<`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttValue(pub Vec<Segment>);

impl AttValue {
    /// Literal text of the value if it holds no references
    pub fn as_text(&self) -> Option<String> {
        self.0
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                Segment::Reference(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for AttValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quoted(f, &self.0)
    }
}

/// `<!--text-->`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment(pub String);

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!--{}-->", self.0)
    }
}

/// `<?target instruction?>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub target: String,
    /// Text after the whitespace following the target, empty if absent
    pub instruction: String,
}

impl fmt::Display for ProcessingInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<?{}", self.target)?;
        if !self.instruction.is_empty() {
            write!(f, " {}", self.instruction)?;
        }
        write!(f, "?>")
    }
}

/// `<![CDATA[text]]>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CData(pub String);

impl fmt::Display for CData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<![CDATA[{}]]>", self.0)
    }
}

/// `name="value"` inside a start tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttValue,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Node inside an element, in document order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    /// Character data, kept verbatim; whitespace-only runs are not recorded
    Text(String),
    Element(Element),
    Reference(Reference),
    CData(CData),
    Comment(Comment),
    Pi(ProcessingInstruction),
}

impl Content {
    /// Character data made only of whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text(text) if text.chars().all(is_space))
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Element(element) => write!(f, "{element}"),
            Self::Reference(reference) => write!(f, "{reference}"),
            Self::CData(cdata) => write!(f, "{cdata}"),
            Self::Comment(comment) => write!(f, "{comment}"),
            Self::Pi(pi) => write!(f, "{pi}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// In source order; duplicate names are kept
    pub attributes: Vec<Attribute>,
    pub contents: Vec<Content>,
    /// Written as `<name/>`
    pub is_empty_tag: bool,
}

impl Element {
    /// First attribute with the given name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Child elements in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.contents.iter().filter_map(|content| match content {
            Content::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Whether the element holds character data other than whitespace,
    /// references or CDATA sections
    pub fn has_character_content(&self) -> bool {
        self.contents.iter().any(|content| match content {
            Content::Text(_) => !content.is_whitespace(),
            Content::Reference(_) | Content::CData(_) => true,
            Content::Element(_) | Content::Comment(_) | Content::Pi(_) => false,
        })
    }

    /// Whether whitespace between the children is only layout: the element
    /// has element content and no character data
    pub fn is_element_only(&self) -> bool {
        !self.has_character_content() && self.contents.iter().any(|c| !c.is_whitespace())
    }

    /// Copy of the element with layout whitespace removed from element-only
    /// content, recursively
    ///
    /// Two elements that differ only in indentation compare equal after this.
    #[must_use]
    pub fn without_layout_whitespace(&self) -> Self {
        if !self.is_element_only() {
            return self.clone();
        }
        let contents = self
            .contents
            .iter()
            .filter(|content| !content.is_whitespace())
            .map(|content| match content {
                Content::Element(child) => Content::Element(child.without_layout_whitespace()),
                other => other.clone(),
            })
            .collect();
        Self {
            contents,
            ..self.clone()
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attributes {
            write!(f, " {attr}")?;
        }
        if self.is_empty_tag {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        for content in &self.contents {
            write!(f, "{content}")?;
        }
        write!(f, "</{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_display() {
        let hex = Reference::Char {
            radix: CharRadix::Hexadecimal,
            digits: "20".to_string(),
        };
        assert_eq!(hex.to_string(), "&#x20;");
        assert_eq!(Reference::Entity("amp".to_string()).to_string(), "&amp;");
        assert_eq!(Reference::Parameter("pe".to_string()).to_string(), "%pe;");
    }

    #[test]
    fn test_reference_as_char() {
        let hex = Reference::Char {
            radix: CharRadix::Hexadecimal,
            digits: "41".to_string(),
        };
        let dec = Reference::Char {
            radix: CharRadix::Decimal,
            digits: "65".to_string(),
        };
        let surrogate = Reference::Char {
            radix: CharRadix::Hexadecimal,
            digits: "D800".to_string(),
        };
        assert_eq!(hex.as_char(), Some('A'));
        assert_eq!(dec.as_char(), Some('A'));
        assert_eq!(surrogate.as_char(), None);
        assert_eq!(Reference::Entity("amp".to_string()).as_char(), None);
    }

    #[test]
    fn test_att_value_quotes() {
        let plain = AttValue(vec![
            Segment::Text("bb".to_string()),
            Segment::Reference(Reference::Entity("a".to_string())),
        ]);
        assert_eq!(plain.to_string(), "\"bb&a;\"");

        let quoted = AttValue(vec![Segment::Text("say \"hi\"".to_string())]);
        assert_eq!(quoted.to_string(), "'say \"hi\"'");
    }

    fn element(name: &str, contents: Vec<Content>) -> Element {
        Element {
            name: name.to_string(),
            attributes: Vec::new(),
            contents,
            is_empty_tag: false,
        }
    }

    fn child(name: &str, contents: Vec<Content>) -> Content {
        Content::Element(element(name, contents))
    }

    fn text(s: &str) -> Content {
        Content::Text(s.to_string())
    }

    #[test]
    fn test_element_only_detection() {
        let block = element("a", vec![text("\n  "), child("b", Vec::new())]);
        assert!(block.is_element_only());
        assert!(!block.has_character_content());

        let spaced_children = element("p", vec![child("b", Vec::new()), text(" ")]);
        assert!(spaced_children.is_element_only());

        let blank = element("a", vec![text(" ")]);
        assert!(!blank.is_element_only());
        assert!(!element("a", Vec::new()).is_element_only());

        let inline = element("p", vec![text("x"), child("b", Vec::new())]);
        assert!(inline.has_character_content());
        assert!(!inline.is_element_only());
    }

    #[test]
    fn test_without_layout_whitespace() {
        let indented = element(
            "a",
            vec![
                text("\n  "),
                child("b", vec![text("\n    "), child("c", Vec::new())]),
                text("\n"),
            ],
        );
        let compact = element("a", vec![child("b", vec![child("c", Vec::new())])]);
        assert_eq!(indented.without_layout_whitespace(), compact);

        let inline = element("p", vec![text(" x "), child("b", vec![text(" ")])]);
        assert_eq!(inline.without_layout_whitespace(), inline);
    }

    #[test]
    fn test_att_value_as_text() {
        let plain = AttValue(vec![Segment::Text("x".to_string())]);
        assert_eq!(plain.as_text(), Some("x".to_string()));
        let with_ref = AttValue(vec![Segment::Reference(Reference::Entity("a".to_string()))]);
        assert_eq!(with_ref.as_text(), None);
        assert_eq!(AttValue::default().as_text(), Some(String::new()));
    }

    #[test]
    fn test_element_display() {
        let element = Element {
            name: "root".to_string(),
            attributes: vec![Attribute {
                name: "id".to_string(),
                value: AttValue(vec![Segment::Text("1".to_string())]),
            }],
            contents: vec![
                Content::Element(Element {
                    name: "child".to_string(),
                    attributes: Vec::new(),
                    contents: Vec::new(),
                    is_empty_tag: true,
                }),
                Content::Text("text".to_string()),
                Content::Reference(Reference::Entity("amp".to_string())),
                Content::CData(CData("<raw>".to_string())),
            ],
            is_empty_tag: false,
        };
        assert_eq!(
            element.to_string(),
            r#"<root id="1"><child/>text&amp;<![CDATA[<raw>]]></root>"#
        );
        assert_eq!(element.child_elements().count(), 1);
        assert!(element.attribute("id").is_some());
        assert!(element.attribute("name").is_none());
    }

    #[test]
    fn test_pi_display() {
        let pi = ProcessingInstruction {
            target: "target".to_string(),
            instruction: "key=\"value\" ".to_string(),
        };
        assert_eq!(pi.to_string(), "<?target key=\"value\" ?>");
    }
}
