//! Canonical reasoning-error detectors
//!
//! Five independent predicates over the same context. Each is a plain
//! function in a fixed table; the flag set of a response is every code whose
//! detector fires, reported in table order.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fact::{Fact, FactSet};
use crate::index::{ElementKind, SceneIndex};
use crate::normalize::{Claim, Normalizer};

/// Error tag raised by a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Guessed relation
    #[serde(rename = "GP")]
    GuessedRelation,
    /// Missed tangency
    #[serde(rename = "TG")]
    MissedTangency,
    /// Arc/chord confusion
    #[serde(rename = "AC")]
    ArcChordConfusion,
    /// Label-anchor error
    #[serde(rename = "LC")]
    LabelAnchor,
    /// Visual-scale reliance
    #[serde(rename = "NS")]
    VisualScale,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 5] = [
        ErrorCode::GuessedRelation,
        ErrorCode::MissedTangency,
        ErrorCode::ArcChordConfusion,
        ErrorCode::LabelAnchor,
        ErrorCode::VisualScale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::GuessedRelation => "GP",
            ErrorCode::MissedTangency => "TG",
            ErrorCode::ArcChordConfusion => "AC",
            ErrorCode::LabelAnchor => "LC",
            ErrorCode::VisualScale => "NS",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::GuessedRelation => "relation claimed without a figure mark or text given",
            ErrorCode::MissedTangency => "marked tangency not used",
            ErrorCode::ArcChordConfusion => "arc measure and chord length confused",
            ErrorCode::LabelAnchor => "label read by screen position instead of anchor",
            ErrorCode::VisualScale => "justified by visual scale",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown error code: {}", s))
    }
}

/// Claims of one list, split by what the detectors can do with them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    pub facts: FactSet,
    /// Sorted element pairs asserted equal
    pub equalities: BTreeSet<(String, String)>,
    /// Elements given a straight-line length
    pub lengths: BTreeSet<String>,
}

impl ClaimSet {
    /// Classify every raw claim; unrecognized strings are dropped and logged
    pub fn collect<I, S>(normalizer: &Normalizer<'_>, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for claim in claims {
            let raw = claim.as_ref();
            match normalizer.classify(raw) {
                Claim::Fact(fact) => {
                    set.facts.insert(fact);
                }
                Claim::Equality(a, b) => {
                    set.equalities.insert((a, b));
                }
                Claim::Length { element } => {
                    set.lengths.insert(element);
                }
                Claim::Unrecognized => tracing::debug!(claim = raw, "dropping unrecognized claim"),
            }
        }
        set
    }
}

/// Everything a detector may look at
#[derive(Debug, Clone, Copy)]
pub struct ClaimContext<'a> {
    /// Figure facts the response says it used
    pub claimed: &'a ClaimSet,
    /// Facts the response attributes to the problem text
    pub givens: &'a ClaimSet,
    pub truth: &'a FactSet,
    /// Raw figure-fact and text-given strings
    pub raw_claims: &'a [String],
    /// Full response text, explanation included
    pub response_text: &'a str,
    pub normalizer: Normalizer<'a>,
}

impl<'a> ClaimContext<'a> {
    fn index(&self) -> Option<&'a SceneIndex> {
        self.normalizer.index()
    }

    fn backed(&self, fact: &Fact) -> bool {
        self.truth.contains(fact) || self.givens.facts.contains(fact)
    }

    fn equality_backed(&self, a: &str, b: &str) -> bool {
        let key = (a.to_string(), b.to_string());
        self.givens.equalities.contains(&key)
            || self.index().map(|idx| idx.same_tick_group(a, b)).unwrap_or(false)
    }

    fn truth_measures(&self) -> impl Iterator<Item = &'a str> + 'a {
        let truth: &'a FactSet = self.truth;
        truth.iter().filter_map(|f| match f {
            Fact::Measure { element, .. } => Some(element.as_str()),
            _ => None,
        })
    }
}

/// One named predicate
#[derive(Clone, Copy)]
pub struct Detector {
    pub code: ErrorCode,
    pub detect: fn(&ClaimContext<'_>) -> bool,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector").field("code", &self.code).finish()
    }
}

pub const DETECTORS: [Detector; 5] = [
    Detector {
        code: ErrorCode::GuessedRelation,
        detect: guessed_relation,
    },
    Detector {
        code: ErrorCode::MissedTangency,
        detect: missed_tangency,
    },
    Detector {
        code: ErrorCode::ArcChordConfusion,
        detect: arc_chord_confusion,
    },
    Detector {
        code: ErrorCode::LabelAnchor,
        detect: label_anchor,
    },
    Detector {
        code: ErrorCode::VisualScale,
        detect: visual_scale,
    },
];

/// Run every detector and return the codes that fire, in table order
pub fn classify_errors(ctx: &ClaimContext<'_>) -> Vec<ErrorCode> {
    DETECTORS
        .iter()
        .filter(|d| (d.detect)(ctx))
        .map(|d| {
            tracing::debug!(code = d.code.as_str(), "detector fired");
            d.code
        })
        .collect()
}

/// A perpendicular, parallel or equality claim with no mark or text given behind it
pub fn guessed_relation(ctx: &ClaimContext<'_>) -> bool {
    let unbacked_relation = ctx
        .claimed
        .facts
        .iter()
        .filter(|f| f.is_line_relation())
        .any(|f| !ctx.backed(f));
    unbacked_relation
        || ctx
            .claimed
            .equalities
            .iter()
            .any(|(a, b)| !ctx.equality_backed(a, b))
}

/// A marked tangency that no claimed fact names
pub fn missed_tangency(ctx: &ClaimContext<'_>) -> bool {
    ctx.truth
        .iter()
        .filter(|f| matches!(f, Fact::Tangent { .. }))
        .any(|f| !ctx.claimed.facts.contains(f))
}

pub fn arc_chord_confusion(ctx: &ClaimContext<'_>) -> bool {
    let Some(index) = ctx.index() else {
        return false;
    };

    // Arc or angle measure claimed on something the figure shows as a straight length.
    let measured_chord = ctx.claimed.facts.iter().any(|f| match f {
        Fact::Measure { element, .. } => {
            let measured_in_truth = ctx.truth_measures().any(|m| m == element.as_str());
            !measured_in_truth
                && (index.kind(element) == Some(ElementKind::Line) || index.has_length_label(element))
        }
        _ => false,
    });

    // Chord length claimed where the figure gives only an arc measure.
    let length_of_arc = ctx.claimed.lengths.iter().any(|element| {
        !index.has_length_label(element)
            && ctx
                .truth_measures()
                .any(|m| m == element.as_str() || (index.kind(m) == Some(ElementKind::Arc) && index.same_endpoints(m, element)))
    });

    measured_chord || length_of_arc
}

fn label_position_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?ix)
            \blabels?\s+(?:near|next\ to|beside|above|below|by|closest\ to|nearest|left\ of|right\ of)\b
            | \blabel(?:'s)?\s+position\b
            | \bposition\s+of\s+the\s+label\b
            | \bwhere\s+the\s+label\b
            | \b(?:near|next\ to|beside|closest\ to|nearest)\s+(?:the\s+)?label\b
            ",
        )
        .expect("valid regex")
    })
}

/// Claim text that locates a label by where it is drawn
pub fn label_anchor(ctx: &ClaimContext<'_>) -> bool {
    ctx.raw_claims.iter().any(|c| label_position_re().is_match(c))
}

fn scale_phrase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?ix)
            \b(?:looks?|appears?|seems?)\b
            | \bby\s+(?:scale|eye)\b
            | \bvisually\b
            | \bto\s+scale\s+but\b
            | \bmeasuring\s+the\s+(?:figure|diagram|picture)\b
            | \bfrom\s+the\s+(?:picture|drawing)\b
            ",
        )
        .expect("valid regex")
    })
}

fn segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?](?:\s|$)|[;\n]").expect("valid regex"))
}

/// Scale-based justification for something no truth fact or text given supports
pub fn visual_scale(ctx: &ClaimContext<'_>) -> bool {
    segment_re()
        .split(ctx.response_text)
        .filter(|segment| scale_phrase_re().is_match(segment))
        .any(|segment| match ctx.normalizer.classify(segment) {
            Claim::Fact(fact) => !ctx.backed(&fact),
            Claim::Equality(a, b) => !ctx.equality_backed(&a, &b),
            Claim::Length { .. } | Claim::Unrecognized => true,
        })
}
