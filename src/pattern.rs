//! Route pattern compiler.
//!
//! A pattern is a `/`-delimited list of segments. Each segment is one of:
//!
//! ```text
//!  Syntax            Segment
//!  users             literal, matched byte for byte
//!  :id               named parameter, exactly one path segment
//!  *name             wildcard, exactly one path segment
//!  **path            multi-segment wildcard, the rest of the path (last only)
//!  <base>.{a,b}      extension union over a literal, `:name` or `*name` base
//! ```
//!
//! Empty segments are ignored, so `/users/`, `users` and `/users` are the same
//! pattern. Compilation happens once, at registration; a pattern that does not
//! compile never reaches the route table.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{CompileError, CompileErrorKind};

/// One compiled segment of a route pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    /// Plain text; the path segment must be identical.
    Literal(String),
    /// `:name`; captures one path segment.
    Param(String),
    /// `*name`; captures one path segment.
    Wildcard(String),
    /// `**name`; captures every remaining path segment, joined by `/`.
    MultiWildcard(String),
    /// `<base>.{a,b,...}`; the path segment's extension must be one of
    /// `extensions` and the text before it must satisfy `base`. Contributes
    /// no parameter.
    LiteralExtension {
        base: ExtensionBase,
        extensions: Vec<String>,
    },
}

/// The part of an extension-union segment in front of the `.{...}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExtensionBase {
    Literal(String),
    Param(String),
    Wildcard(String),
}

impl PathSegment {
    /// The parameter name, for segments that produce a parameter.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::Param(name) | Self::Wildcard(name) | Self::MultiWildcard(name) => Some(name),
            Self::Literal(_) | Self::LiteralExtension { .. } => None,
        }
    }
}

/// A route pattern, compiled into typed segments.
///
/// ```rust
/// use switchyard::{CompiledPattern, PathSegment};
///
/// let pattern = CompiledPattern::compile("/users/:id").unwrap();
/// assert_eq!(pattern.segments(), &[
///     PathSegment::Literal("users".into()),
///     PathSegment::Param("id".into()),
/// ]);
/// ```
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    source: Arc<str>,
    segments: Vec<PathSegment>,
}

impl CompiledPattern {
    /// Compiles `pattern`, or explains why it is malformed.
    pub fn compile(pattern: &str) -> Result<Self, CompileError> {
        let texts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(texts.len());

        for (i, text) in texts.iter().enumerate() {
            let segment = parse_segment(text).map_err(|kind| CompileError::new(pattern, kind))?;

            if matches!(segment, PathSegment::MultiWildcard(_)) && i + 1 != texts.len() {
                return Err(CompileError::new(
                    pattern,
                    CompileErrorKind::MultiWildcardNotLast((*text).to_owned()),
                ));
            }
            segments.push(segment);
        }

        Ok(Self { source: Arc::from(pattern), segments })
    }

    /// The pattern string as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Names of the capturing segments, in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(PathSegment::param_name)
    }

    /// Number of parameters a match against this pattern produces.
    pub fn param_count(&self) -> usize {
        self.param_names().count()
    }

    /// Whether a path with `len` non-empty segments could possibly match.
    pub(crate) fn accepts_len(&self, len: usize) -> bool {
        match self.segments.last() {
            Some(PathSegment::MultiWildcard(_)) => len >= self.segments.len(),
            _ => len == self.segments.len(),
        }
    }

    pub(crate) fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }
}

/// Two patterns are equal when they compile to the same segments, whatever
/// their slashes looked like.
impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for CompiledPattern {}

impl FromStr for CompiledPattern {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ── Segment parsing ──────────────────────────────────────────────────────────

/// A segment with any extension union already removed.
enum Base<'a> {
    Literal(&'a str),
    Param(String),
    Wildcard(String),
    MultiWildcard(String),
}

fn parse_segment(segment: &str) -> Result<PathSegment, CompileErrorKind> {
    let opens = segment.matches('{').count();
    let closes = segment.matches('}').count();

    if opens == 0 && closes == 0 {
        return Ok(match parse_base(segment, segment)? {
            Base::Literal(text) => PathSegment::Literal(text.to_owned()),
            Base::Param(name) => PathSegment::Param(name),
            Base::Wildcard(name) => PathSegment::Wildcard(name),
            Base::MultiWildcard(name) => PathSegment::MultiWildcard(name),
        });
    }
    if opens != 1 || closes != 1 {
        return Err(CompileErrorKind::UnbalancedBrace(segment.to_owned()));
    }

    let (base, list) = segment
        .split_once(".{")
        .and_then(|(base, rest)| Some((base, rest.strip_suffix('}')?)))
        .ok_or_else(|| CompileErrorKind::MisplacedExtension(segment.to_owned()))?;

    if base.is_empty() {
        return Err(CompileErrorKind::EmptyBase(segment.to_owned()));
    }

    let extensions = list
        .split(',')
        .map(|ext| {
            if ext.is_empty() || ext.contains('.') {
                Err(CompileErrorKind::InvalidExtension(segment.to_owned()))
            } else {
                Ok(ext.to_owned())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let base = match parse_base(segment, base)? {
        Base::Literal(text) => ExtensionBase::Literal(text.to_owned()),
        Base::Param(name) => ExtensionBase::Param(name),
        Base::Wildcard(name) => ExtensionBase::Wildcard(name),
        Base::MultiWildcard(_) => {
            return Err(CompileErrorKind::MultiWildcardExtension(segment.to_owned()));
        }
    };

    Ok(PathSegment::LiteralExtension { base, extensions })
}

/// Classifies brace-free text. `segment` is only used for error messages.
fn parse_base<'a>(segment: &str, text: &'a str) -> Result<Base<'a>, CompileErrorKind> {
    if let Some(name) = text.strip_prefix("**") {
        return Ok(Base::MultiWildcard(param_name(segment, name)?));
    }
    if let Some(name) = text.strip_prefix('*') {
        return Ok(Base::Wildcard(param_name(segment, name)?));
    }
    if let Some(name) = text.strip_prefix(':') {
        return Ok(Base::Param(param_name(segment, name)?));
    }
    Ok(Base::Literal(text))
}

fn param_name(segment: &str, name: &str) -> Result<String, CompileErrorKind> {
    if name.is_empty() {
        return Err(CompileErrorKind::MissingName(segment.to_owned()));
    }
    if name.contains([':', '*', '.', '{', '}']) {
        return Err(CompileErrorKind::InvalidName(segment.to_owned()));
    }
    Ok(name.to_owned())
}
