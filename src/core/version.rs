//! Package versions and version requirements.
//!
//! Versions are semver values parsed leniently (`"1"` and `"1.2"` are
//! accepted). Requirements are either unconstrained, an exact version, or
//! a semver range expression.

use std::fmt;

use semver::{Op, Version, VersionReq};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error produced while parsing a version or a requirement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version `{input}`")]
    InvalidVersion { input: String },

    #[error("invalid version requirement `{input}`: {reason}")]
    InvalidRequirement { input: String, reason: String },
}

/// Parse a version string, filling in missing minor/patch components.
pub fn parse_version(s: &str) -> Result<Version, VersionError> {
    let s = s.trim();
    if let Ok(v) = s.parse() {
        return Ok(v);
    }

    let invalid = || VersionError::InvalidVersion {
        input: s.to_string(),
    };

    let parts: Vec<&str> = s.split('.').collect();
    match parts.as_slice() {
        [major] => Ok(Version::new(major.parse().map_err(|_| invalid())?, 0, 0)),
        [major, minor] => Ok(Version::new(
            major.parse().map_err(|_| invalid())?,
            minor.parse().map_err(|_| invalid())?,
            0,
        )),
        _ => Err(invalid()),
    }
}

/// A predicate over package versions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionRequirement {
    /// Every version satisfies it.
    #[default]
    Any,
    /// Only this exact version.
    Exact(Version),
    /// A semver comparison or range (`>=1.0, <2.0`, `^1.2`, `~0.3`).
    Range(VersionReq),
}

/// Outcome of a lenient requirement parse.
///
/// A malformed requirement does not fail the declaration that carries it; it
/// becomes unconstrained, and the discarded input is kept here so callers can
/// report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRequirement {
    Constrained(VersionRequirement),
    Unconstrained { input: String, reason: String },
}

impl ParsedRequirement {
    /// The requirement to apply.
    pub fn requirement(&self) -> VersionRequirement {
        match self {
            ParsedRequirement::Constrained(req) => req.clone(),
            ParsedRequirement::Unconstrained { .. } => VersionRequirement::Any,
        }
    }

    /// Whether the input was discarded.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParsedRequirement::Unconstrained { .. })
    }
}

impl VersionRequirement {
    /// Strict parse.
    ///
    /// `""`, `"*"` and `"any"` (any case) mean [`VersionRequirement::Any`];
    /// a single `=` comparator with all three components is
    /// [`VersionRequirement::Exact`]; everything else goes through semver.
    pub fn try_parse(s: &str) -> Result<Self, VersionError> {
        let s = s.trim();
        if s.is_empty() || s == "*" || s.eq_ignore_ascii_case("any") {
            return Ok(VersionRequirement::Any);
        }

        let req = VersionReq::parse(s).map_err(|e| VersionError::InvalidRequirement {
            input: s.to_string(),
            reason: e.to_string(),
        })?;

        if let [comp] = req.comparators.as_slice() {
            if comp.op == Op::Exact && comp.pre.is_empty() {
                if let (Some(minor), Some(patch)) = (comp.minor, comp.patch) {
                    return Ok(VersionRequirement::Exact(Version::new(comp.major, minor, patch)));
                }
            }
        }

        if req.comparators.is_empty() {
            return Ok(VersionRequirement::Any);
        }

        Ok(VersionRequirement::Range(req))
    }

    /// Lenient parse that records a fallback instead of failing.
    pub fn parse_lenient(s: &str) -> ParsedRequirement {
        match Self::try_parse(s) {
            Ok(req) => ParsedRequirement::Constrained(req),
            Err(e) => ParsedRequirement::Unconstrained {
                input: s.to_string(),
                reason: e.to_string(),
            },
        }
    }

    /// Lenient parse; malformed input yields [`VersionRequirement::Any`].
    pub fn parse(s: &str) -> Self {
        Self::parse_lenient(s).requirement()
    }

    /// Check whether `version` satisfies this requirement.
    pub fn test(&self, version: &Version) -> bool {
        match self {
            VersionRequirement::Any => true,
            VersionRequirement::Exact(v) => v == version,
            VersionRequirement::Range(req) => req.matches(version),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, VersionRequirement::Any)
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRequirement::Any => write!(f, "*"),
            VersionRequirement::Exact(v) => write!(f, "={}", v),
            VersionRequirement::Range(req) => write!(f, "{}", req),
        }
    }
}

impl Serialize for VersionRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
