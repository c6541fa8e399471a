use super::error::RouterError;

use std::fmt;

use smallvec::SmallVec;

pub(crate) const COLON: char = ':';
pub(crate) const SLASH: char = '/';

pub(crate) type Parts<'p> = SmallVec<[&'p str; 8]>;

/// One segment of a registered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(Box<str>),
    /// `:name`. The name may be empty (`:`).
    Wildcard(Box<str>),
}

/// A registered route pattern such as `/configurations/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: Box<str>,
    segments: SmallVec<[Segment; 8]>,
}

/// A shape token. Wildcards carry no name: names only come back from the
/// registered pattern, never from the incoming path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    Literal(&'a str),
    Wildcard,
}

/// A path or pattern reduced to literal and wildcard tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathShape<'a> {
    tokens: SmallVec<[Token<'a>; 8]>,
}

impl Pattern {
    pub fn parse(pattern: &str) -> Result<Self, RouterError> {
        if !pattern.starts_with(SLASH) {
            return Err(RouterError::new("pattern must start with '/'"));
        }

        let segments = split_path(pattern)
            .into_iter()
            .map(|part| match part.strip_prefix(COLON) {
                Some(name) => Segment::Wildcard(name.into()),
                None => Segment::Literal(part.into()),
            })
            .collect();

        Ok(Self {
            raw: pattern.into(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard(_)))
            .count()
    }

    pub fn shape(&self) -> PathShape<'_> {
        let tokens = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(lit) => Token::Literal(&**lit),
                Segment::Wildcard(_) => Token::Wildcard,
            })
            .collect();
        PathShape { tokens }
    }

    /// Segment-by-segment comparison: every literal must equal the path part
    /// at the same position, wildcards accept anything.
    pub fn accepts(&self, parts: &[&str]) -> bool {
        self.segments.len() == parts.len()
            && self
                .segments
                .iter()
                .zip(parts)
                .all(|(seg, part)| match seg {
                    Segment::Literal(lit) => **lit == **part,
                    Segment::Wildcard(_) => true,
                })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'a> PathShape<'a> {
    pub fn literal(parts: &[&'a str]) -> Self {
        Self {
            tokens: parts.iter().map(|&p| Token::Literal(p)).collect(),
        }
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn set_wildcard(&mut self, i: usize) {
        self.tokens[i] = Token::Wildcard;
    }
}

impl fmt::Display for PathShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Token::Literal(lit) => write!(f, "/{}", lit)?,
                Token::Wildcard => f.write_str("/:")?,
            }
        }
        Ok(())
    }
}

/// Splits a path into segments, dropping the empty segment in front of the
/// leading slash. `/` yields a single empty segment.
pub(crate) fn split_path(path: &str) -> Parts<'_> {
    trim_first_slash(path).split(SLASH).collect()
}

#[inline(always)]
fn trim_first_slash(s: &str) -> &str {
    s.strip_prefix(SLASH).unwrap_or(s)
}
