//! Canonical figure facts
//!
//! A fact is one relation or measurement in canonical form. Symmetric
//! relations sort their arguments and measurements keep their value as an
//! exact decimal string, so two facts are equal iff their tokens are equal.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A canonical fact token
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Fact {
    /// `PERP(a,b)` with `a <= b`
    Perpendicular(String, String),
    /// `PARA(a,b)` with `a <= b`
    Parallel(String, String),
    /// `TANGENT(line,point)`
    Tangent { line: String, point: String },
    /// `MEASURE(element,value)`
    Measure { element: String, value: String },
}

/// Fact shape without its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactKind {
    Perpendicular,
    Parallel,
    Tangent,
    Measure,
}

/// An unordered, duplicate-free collection of facts
pub type FactSet = BTreeSet<Fact>;

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl Fact {
    pub fn perpendicular(a: &str, b: &str) -> Self {
        let (a, b) = sorted_pair(a, b);
        Fact::Perpendicular(a, b)
    }

    pub fn parallel(a: &str, b: &str) -> Self {
        let (a, b) = sorted_pair(a, b);
        Fact::Parallel(a, b)
    }

    pub fn tangent(line: &str, point: &str) -> Self {
        Fact::Tangent {
            line: line.to_string(),
            point: point.to_string(),
        }
    }

    /// Build a measurement; `None` if `value` is not a decimal number
    pub fn measure(element: &str, value: &str) -> Option<Self> {
        Some(Fact::Measure {
            element: element.to_string(),
            value: canonical_decimal(value)?,
        })
    }

    pub fn kind(&self) -> FactKind {
        match self {
            Fact::Perpendicular(..) => FactKind::Perpendicular,
            Fact::Parallel(..) => FactKind::Parallel,
            Fact::Tangent { .. } => FactKind::Tangent,
            Fact::Measure { .. } => FactKind::Measure,
        }
    }

    /// Element names the fact mentions
    pub fn elements(&self) -> Vec<&str> {
        match self {
            Fact::Perpendicular(a, b) | Fact::Parallel(a, b) => vec![a.as_str(), b.as_str()],
            Fact::Tangent { line, point } => vec![line.as_str(), point.as_str()],
            Fact::Measure { element, .. } => vec![element.as_str()],
        }
    }

    /// Whether this is a perpendicular or parallel relation
    pub fn is_line_relation(&self) -> bool {
        matches!(self, Fact::Perpendicular(..) | Fact::Parallel(..))
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::Perpendicular(a, b) => write!(f, "PERP({},{})", a, b),
            Fact::Parallel(a, b) => write!(f, "PARA({},{})", a, b),
            Fact::Tangent { line, point } => write!(f, "TANGENT({},{})", line, point),
            Fact::Measure { element, value } => write!(f, "MEASURE({},{})", element, value),
        }
    }
}

/// Error parsing a canonical fact token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a canonical fact token: {0}")]
pub struct FactParseError(pub String);

impl FromStr for Fact {
    type Err = FactParseError;

    /// Parse a token previously produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || FactParseError(s.to_string());
        let (tag, rest) = s.trim().split_once('(').ok_or_else(err)?;
        let args = rest.strip_suffix(')').ok_or_else(err)?;
        let (a, b) = args.split_once(',').ok_or_else(err)?;
        let (a, b) = (a.trim(), b.trim());
        if a.is_empty() || b.is_empty() {
            return Err(err());
        }
        match tag {
            "PERP" => Ok(Fact::perpendicular(a, b)),
            "PARA" => Ok(Fact::parallel(a, b)),
            "TANGENT" => Ok(Fact::tangent(a, b)),
            "MEASURE" => Fact::measure(a, b).ok_or_else(err),
            _ => Err(err()),
        }
    }
}

impl From<Fact> for String {
    fn from(fact: Fact) -> Self {
        fact.to_string()
    }
}

impl TryFrom<String> for Fact {
    type Error = FactParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Canonical text of a decimal number without going through floating point.
///
/// Leading `+` and zeros and trailing fractional zeros are dropped, so `"20"`,
/// `"20.0"` and `"+020.00"` all become `"20"`; `"0.50"` becomes `"0.5"`.
pub fn canonical_decimal(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let mut out = String::new();
    if negative && !(int_part == "0" && frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}
