//! The CSS selector subset used to locate page elements.
//!
//! Every behavior finds its elements through a configurable selector string,
//! so the grammar covers exactly what a portfolio page needs:
//!
//! ```text
//! section                 type
//! .project-card           class
//! #current-year           id
//! [data-filter]           attribute present
//! a[href="#about"]        attribute equals
//! a[href^="#"]            attribute starts with
//! section, .card          selector list (any of)
//! ```
//!
//! Compound selectors (`a.nav-link[href^="#"]`) are supported. Combinators
//! (descendant, child, sibling) are not: every selector matches a single
//! element on its own attributes.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character '{found}' at offset {offset} in selector '{input}'")]
    Unexpected {
        input: String,
        offset: usize,
        found: char,
    },
    #[error("unterminated {what} in selector '{input}'")]
    Unterminated { input: String, what: &'static str },
    #[error("missing name after '{after}' in selector '{input}'")]
    MissingName { input: String, after: char },
}

/// Anything a selector can be tested against.
pub trait Subject {
    /// Lowercase tag name.
    fn tag(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrMatch {
    Present,
    Equals(String),
    StartsWith(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrCondition {
    pub name: String,
    pub op: AttrMatch,
}

/// A single compound selector: optional type plus any number of conditions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrCondition>,
}

impl Compound {
    pub fn matches<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        if let Some(tag) = &self.tag {
            if !subject.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if subject.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| subject.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|cond| {
            let value = subject.attribute(&cond.name);
            match (&cond.op, value) {
                (_, None) => false,
                (AttrMatch::Present, Some(_)) => true,
                (AttrMatch::Equals(expected), Some(v)) => v == expected,
                // `[a^=""]` matches nothing, as in CSS.
                (AttrMatch::StartsWith(prefix), Some(v)) => {
                    !prefix.is_empty() && v.starts_with(prefix.as_str())
                }
            }
        })
    }
}

/// A parsed selector list. Matches when any of its compounds match.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// Selector for `a[href="#<fragment>"]`, the nav link pointing at a section.
    pub fn link_to_fragment(fragment: &str) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: Some("a".to_string()),
                attrs: vec![AttrCondition {
                    name: "href".to_string(),
                    op: AttrMatch::Equals(format!("#{fragment}")),
                }],
                ..Compound::default()
            }],
        }
    }

    pub fn alternatives(&self) -> &[Compound] {
        &self.alternatives
    }

    pub fn matches<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        self.alternatives.iter().any(|c| c.matches(subject))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, compound) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if let Some(tag) = &compound.tag {
                write!(f, "{tag}")?;
            }
            if let Some(id) = &compound.id {
                write!(f, "#{id}")?;
            }
            for class in &compound.classes {
                write!(f, ".{class}")?;
            }
            for attr in &compound.attrs {
                match &attr.op {
                    AttrMatch::Present => write!(f, "[{}]", attr.name)?,
                    AttrMatch::Equals(v) => write!(f, "[{}=\"{}\"]", attr.name, v)?,
                    AttrMatch::StartsWith(v) => write!(f, "[{}^=\"{}\"]", attr.name, v)?,
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(o, _)| o)
            .unwrap_or(self.input.len())
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected {
            input: self.input.to_string(),
            offset: self.offset(),
            found,
        }
    }

    fn parse_list(&mut self) -> Result<Selector, SelectorError> {
        if self.input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            alternatives.push(self.parse_compound()?);
            self.skip_whitespace();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(c) => {
                    self.pos -= 1;
                    return Err(self.unexpected(c));
                }
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let start = self.pos;
        if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident().to_ascii_lowercase());
        }
        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.bump();
                    compound.classes.push(self.required_ident('.')?);
                }
                '#' => {
                    self.bump();
                    compound.id = Some(self.required_ident('#')?);
                }
                '[' => {
                    self.bump();
                    compound.attrs.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return match self.peek() {
                Some(c) => Err(self.unexpected(c)),
                None => Err(SelectorError::Empty),
            };
        }
        Ok(compound)
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn required_ident(&mut self, after: char) -> Result<String, SelectorError> {
        let name = self.ident();
        if name.is_empty() {
            return Err(SelectorError::MissingName {
                input: self.input.to_string(),
                after,
            });
        }
        Ok(name)
    }

    fn attribute(&mut self) -> Result<AttrCondition, SelectorError> {
        self.skip_whitespace();
        let name = self.required_ident('[')?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.bump() {
            Some(']') => return Ok(AttrCondition {
                name,
                op: AttrMatch::Present,
            }),
            Some('=') => AttrKind::Equals,
            Some('^') => match self.bump() {
                Some('=') => AttrKind::StartsWith,
                Some(c) => {
                    self.pos -= 1;
                    return Err(self.unexpected(c));
                }
                None => return Err(self.unterminated("attribute condition")),
            },
            Some(c) => {
                self.pos -= 1;
                return Err(self.unexpected(c));
            }
            None => return Err(self.unterminated("attribute condition")),
        };
        self.skip_whitespace();
        let value = self.attribute_value()?;
        self.skip_whitespace();
        match self.bump() {
            Some(']') => {}
            Some(c) => {
                self.pos -= 1;
                return Err(self.unexpected(c));
            }
            None => return Err(self.unterminated("attribute condition")),
        }
        let op = match op {
            AttrKind::Equals => AttrMatch::Equals(value),
            AttrKind::StartsWith => AttrMatch::StartsWith(value),
        };
        Ok(AttrCondition { name, op })
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut out = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(out),
                        Some('\\') => match self.bump() {
                            Some(c) => out.push(c),
                            None => return Err(self.unterminated("string")),
                        },
                        Some(c) => out.push(c),
                        None => return Err(self.unterminated("string")),
                    }
                }
            }
            Some(c) if is_ident_char(c) => Ok(self.ident()),
            Some(c) => Err(self.unexpected(c)),
            None => Err(self.unterminated("attribute condition")),
        }
    }

    fn unterminated(&self, what: &'static str) -> SelectorError {
        SelectorError::Unterminated {
            input: self.input.to_string(),
            what,
        }
    }
}

enum AttrKind {
    Equals,
    StartsWith,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
