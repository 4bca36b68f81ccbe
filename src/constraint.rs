//! Version requirement evaluation
//!
//! Forge metadata expresses dependency requirements in two styles:
//! - Comparator lists: `>= 4.13.1 < 10.0.0`, `>=1.0.0`, `= 2.1.0`
//! - Single ranges: `^1.2.3`, `~1.2`, `1.x`, or a plain exact version
//!
//! Comparator clauses are combined with AND. Anything that cannot be parsed
//! never matches, so a broken requirement is reported as a violation.

use crate::domain::NormalizedVersion;
use regex::Regex;
use semver::{Version, VersionReq};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

// Longest operators first so `>=` is not read as `>` followed by `=`.
static CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|>|<|=)\s*([^\s<>=,|]+)").unwrap());

/// Comparison operator of a requirement clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `>=`
    Gte,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `<`
    Lt,
    /// `=`
    Eq,
}

impl Comparator {
    /// Parse an operator token
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            ">=" => Some(Comparator::Gte),
            ">" => Some(Comparator::Gt),
            "<=" => Some(Comparator::Lte),
            "<" => Some(Comparator::Lt),
            "=" => Some(Comparator::Eq),
            _ => None,
        }
    }

    /// Operator token
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Gte => ">=",
            Comparator::Gt => ">",
            Comparator::Lte => "<=",
            Comparator::Lt => "<",
            Comparator::Eq => "=",
        }
    }

    /// Whether `candidate.cmp(operand)` satisfies this operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Comparator::Gte => ordering != Ordering::Less,
            Comparator::Gt => ordering == Ordering::Greater,
            Comparator::Lte => ordering != Ordering::Greater,
            Comparator::Lt => ordering == Ordering::Less,
            Comparator::Eq => ordering == Ordering::Equal,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<operator><version>` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub comparator: Comparator,
    pub version: Version,
}

impl Clause {
    /// Check a version against this clause using semver precedence
    pub fn matches(&self, version: &Version) -> bool {
        self.comparator
            .accepts(version.cmp_precedence(&self.version))
    }
}

/// A parsed version requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Conjunction of comparator clauses
    Clauses(Vec<Clause>),
    /// A plain version, matched exactly
    Exact(Version),
    /// A semver range expression (caret, tilde, wildcard, ...)
    Range(VersionReq),
    /// Unparseable requirement; never matches
    Malformed(String),
}

impl Requirement {
    /// Parse a requirement string; never fails
    pub fn parse(requirement: &str) -> Self {
        let trimmed = requirement.trim();
        if trimmed.is_empty() {
            return Requirement::Malformed(requirement.to_string());
        }

        let mut clauses = Vec::new();
        let mut consumed = 0;
        for caps in CLAUSE_RE.captures_iter(trimmed) {
            let Some(span) = caps.get(0) else {
                continue;
            };
            if !is_separator(&trimmed[consumed..span.start()]) {
                return Requirement::Malformed(requirement.to_string());
            }
            consumed = span.end();
            let Some(comparator) = Comparator::parse(&caps[1]) else {
                return Requirement::Malformed(requirement.to_string());
            };
            match parse_operand(&caps[2]) {
                Some(version) => clauses.push(Clause {
                    comparator,
                    version,
                }),
                None => return Requirement::Malformed(requirement.to_string()),
            }
        }

        if !clauses.is_empty() {
            // `~>`, `!=` and trailing words leave text between the clauses
            if !is_separator(&trimmed[consumed..]) {
                return Requirement::Malformed(requirement.to_string());
            }
            return Requirement::Clauses(clauses);
        }

        if let Some(version) = parse_operand(trimmed) {
            return Requirement::Exact(version);
        }

        // A bare partial version like `1.2` must spell out its range
        if !is_explicit_range(trimmed) {
            return Requirement::Malformed(requirement.to_string());
        }

        match VersionReq::parse(trimmed) {
            Ok(req) => Requirement::Range(req),
            Err(_) => Requirement::Malformed(requirement.to_string()),
        }
    }

    /// Check whether a version satisfies this requirement
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Requirement::Clauses(clauses) => clauses.iter().all(|c| c.matches(version)),
            Requirement::Exact(exact) => version.cmp_precedence(exact) == Ordering::Equal,
            Requirement::Range(req) => req.matches(version),
            Requirement::Malformed(_) => false,
        }
    }

    /// Returns true if the requirement could not be parsed
    pub fn is_malformed(&self) -> bool {
        matches!(self, Requirement::Malformed(_))
    }
}

fn is_separator(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == ',')
}

fn is_explicit_range(text: &str) -> bool {
    text.starts_with(['^', '~']) || text.contains(['*', 'x', 'X'])
}

fn parse_operand(text: &str) -> Option<Version> {
    let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
    Version::parse(text).ok()
}

/// Check whether a pinned version satisfies a registry requirement
pub fn satisfies(version: &NormalizedVersion, requirement: &str) -> bool {
    Requirement::parse(requirement).matches(version.semver())
}
