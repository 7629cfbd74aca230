//! Route pattern parsing.
//!
//! A pattern is split on `/` into segments. `{name}` is a named parameter,
//! `{name...}` is a catch-all, anything else matches literally:
//!
//! ```text
//! /files/{owner}/{path...}   →   Static("files"), Param("owner"), CatchAll("path")
//! ```

use crate::error::RouteError;

const CATCH_ALL_SUFFIX: &str = "...";

/// One `/`-delimited component of a route pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

impl Segment {
    /// The parameter name, for `Param` and `CatchAll` segments.
    pub(crate) fn param_name(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Param(name) | Self::CatchAll(name) => Some(name.as_str()),
        }
    }
}

/// Splits `pattern` into segments. Never fails; see [`validate`] for the
/// structural checks applied at registration.
pub(crate) fn parse(pattern: &str) -> Vec<Segment> {
    let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);

    trimmed
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let inner = part
                .strip_prefix('{')
                .and_then(|p| p.strip_suffix('}'))
                .filter(|_| part.len() > 2);

            match inner {
                Some(name) => match name.strip_suffix(CATCH_ALL_SUFFIX) {
                    Some(name) => Segment::CatchAll(name.to_owned()),
                    None => Segment::Param(name.to_owned()),
                },
                None => Segment::Static(part.to_owned()),
            }
        })
        .collect()
}

/// Rejects a catch-all in non-final position and parameter names that
/// appear twice in one pattern.
pub(crate) fn validate(pattern: &str, segments: &[Segment]) -> Result<(), RouteError> {
    if let Some(pos) = segments.iter().position(|s| matches!(s, Segment::CatchAll(_))) {
        if pos + 1 != segments.len() {
            return Err(RouteError::CatchAllNotLast { pattern: pattern.to_owned() });
        }
    }

    let mut seen: Vec<&str> = Vec::with_capacity(segments.len());
    for name in segments.iter().filter_map(Segment::param_name) {
        if seen.contains(&name) {
            return Err(RouteError::DuplicateParam {
                pattern: pattern.to_owned(),
                name: name.to_owned(),
            });
        }
        seen.push(name);
    }

    Ok(())
}
