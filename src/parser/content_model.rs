//! Element content specifications

use super::Parser;
use crate::ast::{ChoiceOrSeq, ContentParticle, ContentSpec, Particle, Repetition};
use crate::error::{ErrorKind, Production, Result};

impl Parser {
    /// `contentspec ::= 'EMPTY' | 'ANY' | Mixed | children`
    ///
    /// Mixed and children both open with `(`, so Mixed is tried first and
    /// children parsed from the same position when it fails.
    pub(crate) fn parse_content_spec(&mut self) -> Result<ContentSpec> {
        if self.scanner.consume_str("EMPTY") {
            return Ok(ContentSpec::Empty);
        }
        if self.scanner.consume_str("ANY") {
            return Ok(ContentSpec::Any);
        }
        if !self.scanner.test('(') {
            return Err(self.expected(Production::ContentSpec, "'EMPTY', 'ANY' or '('"));
        }

        let spec = match self.attempt(Self::parse_mixed) {
            Ok(names) => Ok(ContentSpec::Mixed(names)),
            Err(_) => self.parse_children(),
        };
        self.particle_memo.clear();
        spec
    }

    /// `Mixed ::= '(' S? '#PCDATA' (S? '|' S? Name)* S? ')*' | '(' S? '#PCDATA' S? ')'`
    ///
    /// Returns the listed element names.
    pub(crate) fn parse_mixed(&mut self) -> Result<Vec<String>> {
        self.expect_char(Production::Mixed, '(')?;
        self.skip_space();
        self.expect_str(Production::Mixed, "#PCDATA")?;

        let mut names = Vec::new();
        loop {
            self.skip_space();
            if !self.scanner.consume('|') {
                break;
            }
            self.skip_space();
            names.push(self.parse_name(Production::Mixed)?);
        }
        self.expect_char(Production::Mixed, ')')?;

        if names.is_empty() {
            if self.scanner.test('*') {
                return Err(self.error(Production::Mixed, ErrorKind::UnexpectedMixedRepetition));
            }
        } else if !self.scanner.consume('*') {
            return Err(self.error(Production::Mixed, ErrorKind::MissingMixedRepetition));
        }
        Ok(names)
    }

    /// `children ::= (choice | seq) ('?' | '*' | '+')?`
    pub(crate) fn parse_children(&mut self) -> Result<ContentSpec> {
        let group = self.parse_group(Production::Children)?;
        let repetition = self.parse_repetition();
        Ok(ContentSpec::Children { group, repetition })
    }

    /// Parenthesized group: choice first, then sequence
    fn parse_group(&mut self, production: Production) -> Result<ChoiceOrSeq> {
        self.nested(production, |p| match p.attempt(Self::parse_choice) {
            Ok(choice) => Ok(choice),
            Err(_) => p.parse_seq(),
        })
    }

    /// `choice ::= '(' S? cp ( S? '|' S? cp )* S? ')'`
    ///
    /// A single particle is accepted, so `(a)` is a choice.
    pub(crate) fn parse_choice(&mut self) -> Result<ChoiceOrSeq> {
        self.parse_particle_list(Production::Choice, '|')
            .map(ChoiceOrSeq::Choice)
    }

    /// `seq ::= '(' S? cp ( S? ',' S? cp )* S? ')'`
    pub(crate) fn parse_seq(&mut self) -> Result<ChoiceOrSeq> {
        self.parse_particle_list(Production::Seq, ',')
            .map(ChoiceOrSeq::Seq)
    }

    fn parse_particle_list(
        &mut self,
        production: Production,
        separator: char,
    ) -> Result<Vec<ContentParticle>> {
        self.expect_char(production, '(')?;
        self.skip_space();
        let mut particles = vec![self.parse_content_particle()?];
        loop {
            self.skip_space();
            if !self.scanner.consume(separator) {
                break;
            }
            self.skip_space();
            particles.push(self.parse_content_particle()?);
        }
        self.expect_char(production, ')')?;
        Ok(particles)
    }

    /// `cp ::= (Name | choice | seq) ('?' | '*' | '+')?`
    ///
    /// Results are remembered per offset: a failed choice and the sequence
    /// tried after it start with the same particle.
    pub(crate) fn parse_content_particle(&mut self) -> Result<ContentParticle> {
        let start = self.scanner.mark();
        if let Some(memo) = self.particle_memo.get(&start.offset()) {
            let (particle, end) = memo.clone()?;
            self.scanner.restore(end);
            return Ok(particle);
        }

        let result = self.parse_content_particle_at();
        let memo = result
            .clone()
            .map(|particle| (particle, self.scanner.mark()));
        self.particle_memo.insert(start.offset(), memo);
        result
    }

    fn parse_content_particle_at(&mut self) -> Result<ContentParticle> {
        let particle = if self.scanner.test('(') {
            Particle::Group(self.parse_group(Production::ContentParticle)?)
        } else {
            Particle::Name(self.parse_name(Production::ContentParticle)?)
        };
        let repetition = self.parse_repetition();
        Ok(ContentParticle {
            particle,
            repetition,
        })
    }

    fn parse_repetition(&mut self) -> Option<Repetition> {
        let repetition = self.scanner.current().and_then(Repetition::from_char)?;
        self.scanner.advance();
        Some(repetition)
    }
}
