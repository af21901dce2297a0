//! Path template parsing and matching.
//!
//! # Responsibilities
//! - Parse templates such as `/status/{code}` into literal and placeholder segments
//! - Match a request path against a template, binding placeholder values
//! - Rank templates so the most specific one wins
//!
//! # Design Decisions
//! - A placeholder matches exactly one non-empty segment
//! - Segments are compared byte-for-byte; no percent-decoding
//! - Trailing slashes are significant (`/get/` is not `/get`)
//! - No regex, matching is a single pass over the segments

use std::collections::BTreeMap;
use std::fmt;

use super::RouteError;

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Binds any non-empty request segment under this name.
    Placeholder(String),
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        for part in split_segments(rest) {
            if let Some(inner) = part.strip_prefix('{') {
                let name = inner
                    .strip_suffix('}')
                    .ok_or_else(|| invalid("unbalanced '{'"))?;
                if name.is_empty() {
                    return Err(invalid("empty placeholder name"));
                }
                if name.contains(['{', '}']) {
                    return Err(invalid("nested braces in placeholder"));
                }
                if names.contains(&name) {
                    return Err(invalid("duplicate placeholder name"));
                }
                names.push(name);
                segments.push(Segment::Placeholder(name.to_string()));
            } else {
                if part.contains(['{', '}']) {
                    return Err(invalid("braces inside a literal segment"));
                }
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template as it was registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a request path, returning the bound placeholder values.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let mut params = PathParams::default();
        let mut parts = split_segments(rest);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Placeholder(_) if part.is_empty() => return None,
                Segment::Placeholder(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// Precedence key: literal segments outrank placeholders, compared from the left.
    ///
    /// Two templates that both match a path always have the same length, so
    /// comparing these keys orders them by specificity.
    pub(crate) fn rank(&self) -> Vec<bool> {
        self.segments
            .iter()
            .map(|s| matches!(s, Segment::Literal(_)))
            .collect()
    }

    /// True when both templates match exactly the same set of paths.
    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Placeholder(_), Segment::Placeholder(_)) => true,
                    _ => false,
                })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Root (`""` after the leading slash) has no segments at all.
fn split_segments(rest: &str) -> impl Iterator<Item = &str> {
    let mut iter = rest.split('/');
    if rest.is_empty() {
        iter.next();
    }
    iter
}

/// Values bound by placeholder segments, keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_and_placeholder() {
        let template = PathTemplate::parse("/status/{code}").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("status".into()),
                Segment::Placeholder("code".into())
            ]
        );
        assert_eq!(template.as_str(), "/status/{code}");
    }

    #[test]
    fn test_parse_root_has_no_segments() {
        let template = PathTemplate::parse("/").unwrap();
        assert!(template.segments().is_empty());
        assert!(template.matches("/").is_some());
        assert!(template.matches("/get").is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["status", "/{", "/{}", "/a{b}", "/{a}/{a}", "/{a{b}}"] {
            assert!(
                matches!(PathTemplate::parse(bad), Err(RouteError::InvalidTemplate { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_match_binds_placeholder() {
        let template = PathTemplate::parse("/delay/{seconds}").unwrap();
        let params = template.matches("/delay/3").unwrap();
        assert_eq!(params.get("seconds"), Some("3"));
        assert_eq!(params.len(), 1);

        // Bound verbatim, validation is the handler's job.
        let params = template.matches("/delay/3.5").unwrap();
        assert_eq!(params.get("seconds"), Some("3.5"));
    }

    #[test]
    fn test_match_requires_same_segment_count() {
        let template = PathTemplate::parse("/status/{code}").unwrap();
        assert!(template.matches("/status").is_none());
        assert!(template.matches("/status/200/extra").is_none());
        assert!(template.matches("/status/").is_none()); // empty placeholder
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let template = PathTemplate::parse("/get").unwrap();
        assert!(template.matches("/get").is_some());
        assert!(template.matches("/get/").is_none());
        assert!(template.matches("/GET").is_none());
    }

    #[test]
    fn test_rank_prefers_literals() {
        let literal = PathTemplate::parse("/status/teapot").unwrap();
        let placeholder = PathTemplate::parse("/status/{code}").unwrap();
        assert!(literal.rank() > placeholder.rank());
    }

    #[test]
    fn test_same_shape_ignores_placeholder_names() {
        let a = PathTemplate::parse("/status/{code}").unwrap();
        let b = PathTemplate::parse("/status/{n}").unwrap();
        let c = PathTemplate::parse("/status/teapot").unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
