use std::fmt;

use super::node::{quote_for, AttValue, Comment, EntityValue, ProcessingInstruction};

/// `<!DOCTYPE name ExternalID? [ markupdecl* ]>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocType {
    pub name: String,
    pub external_id: Option<ExternalId>,
    /// Internal subset declarations in document order
    pub markups: Vec<MarkupDecl>,
    /// Last parameter-entity reference found in the internal subset
    pub pe_reference: Option<String>,
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!DOCTYPE {}", self.name)?;
        if let Some(external_id) = &self.external_id {
            write!(f, " {external_id}")?;
        }
        if self.has_internal_subset() {
            write!(f, " [")?;
            for markup in &self.markups {
                write!(f, "{markup}")?;
            }
            if let Some(pe) = &self.pe_reference {
                write!(f, "%{pe};")?;
            }
            write!(f, "]")?;
        }
        write!(f, ">")
    }
}

impl DocType {
    pub fn has_internal_subset(&self) -> bool {
        !self.markups.is_empty() || self.pe_reference.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExternalId {
    /// `SYSTEM "system"`
    System { system: String },
    /// `PUBLIC "pubid" "system"`; the system literal is only omitted in
    /// notation declarations
    Public {
        pubid: String,
        system: Option<String>,
    },
}

impl ExternalId {
    pub fn system_literal(&self) -> Option<&str> {
        match self {
            Self::System { system } => Some(system),
            Self::Public { system, .. } => system.as_deref(),
        }
    }

    pub fn pubid_literal(&self) -> Option<&str> {
        match self {
            Self::System { .. } => None,
            Self::Public { pubid, .. } => Some(pubid),
        }
    }
}

fn write_system_literal(f: &mut fmt::Formatter<'_>, system: &str) -> fmt::Result {
    let quote = quote_for(std::iter::once(system));
    write!(f, "{quote}{system}{quote}")
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System { system } => {
                write!(f, "SYSTEM ")?;
                write_system_literal(f, system)
            }
            Self::Public { pubid, system } => {
                write!(f, "PUBLIC \"{pubid}\"")?;
                if let Some(system) = system {
                    write!(f, " ")?;
                    write_system_literal(f, system)?;
                }
                Ok(())
            }
        }
    }
}

/// Declaration inside the internal subset
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupDecl {
    Element(ElementDecl),
    Attlist(AttlistDecl),
    Entity(EntityDecl),
    Notation(NotationDecl),
    Pi(ProcessingInstruction),
    Comment(Comment),
}

impl fmt::Display for MarkupDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(decl) => write!(f, "{decl}"),
            Self::Attlist(decl) => write!(f, "{decl}"),
            Self::Entity(decl) => write!(f, "{decl}"),
            Self::Notation(decl) => write!(f, "{decl}"),
            Self::Pi(pi) => write!(f, "{pi}"),
            Self::Comment(comment) => write!(f, "{comment}"),
        }
    }
}

/// `<!ELEMENT name contentspec>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDecl {
    pub name: String,
    pub content_spec: ContentSpec,
}

impl fmt::Display for ElementDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!ELEMENT {} {}>", self.name, self.content_spec)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSpec {
    Empty,
    Any,
    /// `(#PCDATA|a|b)*`; the list of element names may be empty
    Mixed(Vec<String>),
    Children {
        group: ChoiceOrSeq,
        repetition: Option<Repetition>,
    },
}

impl fmt::Display for ContentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY"),
            Self::Any => write!(f, "ANY"),
            Self::Mixed(names) if names.is_empty() => write!(f, "(#PCDATA)"),
            Self::Mixed(names) => write!(f, "(#PCDATA|{})*", names.join("|")),
            Self::Children { group, repetition } => {
                write!(f, "{group}")?;
                if let Some(repetition) = repetition {
                    write!(f, "{repetition}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoiceOrSeq {
    /// Alternatives separated by `|`
    Choice(Vec<ContentParticle>),
    /// Sequence separated by `,`
    Seq(Vec<ContentParticle>),
}

impl ChoiceOrSeq {
    pub fn particles(&self) -> &[ContentParticle] {
        match self {
            Self::Choice(particles) | Self::Seq(particles) => particles,
        }
    }
}

impl fmt::Display for ChoiceOrSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = match self {
            Self::Choice(_) => "|",
            Self::Seq(_) => ",",
        };
        write!(f, "(")?;
        for (i, particle) in self.particles().iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{particle}")?;
        }
        write!(f, ")")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Particle {
    Name(String),
    Group(ChoiceOrSeq),
}

/// One unit of a children content model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentParticle {
    pub particle: Particle,
    pub repetition: Option<Repetition>,
}

impl ContentParticle {
    pub fn name(name: impl Into<String>, repetition: Option<Repetition>) -> Self {
        Self {
            particle: Particle::Name(name.into()),
            repetition,
        }
    }

    pub const fn group(group: ChoiceOrSeq, repetition: Option<Repetition>) -> Self {
        Self {
            particle: Particle::Group(group),
            repetition,
        }
    }
}

impl fmt::Display for ContentParticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.particle {
            Particle::Name(name) => f.write_str(name)?,
            Particle::Group(group) => write!(f, "{group}")?,
        }
        if let Some(repetition) = self.repetition {
            write!(f, "{repetition}")?;
        }
        Ok(())
    }
}

/// Repetition suffix of a content particle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Repetition {
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl Repetition {
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(Self::Optional),
            '*' => Some(Self::ZeroOrMore),
            '+' => Some(Self::OneOrMore),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Optional => '?',
            Self::ZeroOrMore => '*',
            Self::OneOrMore => '+',
        }
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// `<!ATTLIST name AttDef*>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttlistDecl {
    pub name: String,
    pub defs: Vec<AttDef>,
}

impl fmt::Display for AttlistDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!ATTLIST {}", self.name)?;
        for def in &self.defs {
            write!(f, " {def}")?;
        }
        write!(f, ">")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttDef {
    pub name: String,
    pub att_type: AttType,
    pub default: DefaultDecl,
}

impl fmt::Display for AttDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.att_type, self.default)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttType {
    CData,
    Tokenized(TokenizedType),
    /// `NOTATION (a|b)`
    Notation(Vec<String>),
    /// `(a|b)`
    Enumeration(Vec<String>),
}

impl fmt::Display for AttType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CData => write!(f, "CDATA"),
            Self::Tokenized(tokenized) => write!(f, "{tokenized}"),
            Self::Notation(names) => write!(f, "NOTATION ({})", names.join("|")),
            Self::Enumeration(names) => write!(f, "({})", names.join("|")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenizedType {
    Id,
    IdRef,
    IdRefs,
    Entity,
    Entities,
    NmToken,
    NmTokens,
}

impl TokenizedType {
    pub const ALL: [Self; 7] = [
        Self::Id,
        Self::IdRef,
        Self::IdRefs,
        Self::Entity,
        Self::Entities,
        Self::NmToken,
        Self::NmTokens,
    ];

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::IdRef => "IDREF",
            Self::IdRefs => "IDREFS",
            Self::Entity => "ENTITY",
            Self::Entities => "ENTITIES",
            Self::NmToken => "NMTOKEN",
            Self::NmTokens => "NMTOKENS",
        }
    }
}

impl fmt::Display for TokenizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Attribute default. A bare literal default is stored as `Fixed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultDecl {
    Required,
    Implied,
    Fixed(AttValue),
}

impl fmt::Display for DefaultDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "#REQUIRED"),
            Self::Implied => write!(f, "#IMPLIED"),
            Self::Fixed(value) => write!(f, "#FIXED {value}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    General,
    Parameter,
}

/// `<!ENTITY name def>` or `<!ENTITY % name def>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDecl {
    pub name: String,
    pub kind: EntityKind,
    pub definition: EntityDef,
}

impl fmt::Display for EntityDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!ENTITY ")?;
        if self.kind == EntityKind::Parameter {
            write!(f, "% ")?;
        }
        write!(f, "{} {}>", self.name, self.definition)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityDef {
    Literal(EntityValue),
    /// `ndata` is only ever set for general entities
    External {
        external_id: ExternalId,
        ndata: Option<String>,
    },
}

impl fmt::Display for EntityDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::External { external_id, ndata } => {
                write!(f, "{external_id}")?;
                if let Some(ndata) = ndata {
                    write!(f, " NDATA {ndata}")?;
                }
                Ok(())
            }
        }
    }
}

/// `<!NOTATION name ExternalID>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotationDecl {
    pub name: String,
    pub external_id: ExternalId,
}

impl fmt::Display for NotationDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!NOTATION {} {}>", self.name, self.external_id)
    }
}
