//! Structural matching of one path against one compiled pattern.
//!
//! The router calls [`match_pattern`] for each candidate in registration
//! order and stops at the first hit; everything here is pure and allocation
//! is limited to the captured parameters.

use crate::params::{Param, Params};
use crate::pattern::{CompiledPattern, ExtensionBase, PathSegment};

/// Splits a request path into its non-empty segments.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// What a successful match captured.
#[derive(Debug, Default)]
pub(crate) struct Captures {
    pub(crate) params: Params,
    /// Right-most format seen in the path, from an extension union or a
    /// parameter's extension.
    pub(crate) format: Option<String>,
}

pub(crate) fn match_pattern(pattern: &CompiledPattern, path: &[&str]) -> Option<Captures> {
    if !pattern.accepts_len(path.len()) {
        return None;
    }

    let mut captures = Captures::default();
    let mut rest = path;

    for segment in pattern.segments() {
        match segment {
            PathSegment::Literal(text) => {
                if next_segment(&mut rest)? != text {
                    return None;
                }
            }
            PathSegment::Param(name) | PathSegment::Wildcard(name) => {
                let param = Param::extracted(name, next_segment(&mut rest)?);
                if let Some(format) = param.format() {
                    captures.format = Some(format.to_owned());
                }
                captures.params.push(param);
            }
            PathSegment::LiteralExtension { base, extensions } => {
                let ext = match_extension(base, extensions, next_segment(&mut rest)?)?;
                captures.format = Some(ext.to_owned());
            }
            PathSegment::MultiWildcard(name) => {
                if rest.is_empty() {
                    return None;
                }
                captures.params.push(Param::verbatim(name, rest.join("/")));
                rest = &[];
            }
        }
    }

    rest.is_empty().then_some(captures)
}

fn next_segment<'a, 'p>(rest: &mut &'a [&'p str]) -> Option<&'p str> {
    let current: &'a [&'p str] = rest;
    let (&head, tail) = current.split_first()?;
    *rest = tail;
    Some(head)
}

/// Returns the matched extension when `segment` satisfies the union.
fn match_extension<'s>(
    base: &ExtensionBase,
    extensions: &[String],
    segment: &'s str,
) -> Option<&'s str> {
    let (stem, ext) = segment.rsplit_once('.')?;
    if !extensions.iter().any(|allowed| allowed == ext) {
        return None;
    }

    let base_ok = match base {
        ExtensionBase::Literal(text) => stem == text,
        ExtensionBase::Param(_) | ExtensionBase::Wildcard(_) => !stem.is_empty(),
    };
    base_ok.then_some(ext)
}
