//! Contrastive consistency between a base answer and a variant answer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::answer::{GradedAnswer, Tolerance};

/// What a variant's edit is declared to do to the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedEffect {
    /// Decisive edit: the answer must change or become indeterminate
    #[serde(alias = "flip", alias = "flip or invalidate", alias = "invalidate")]
    FlipOrInvalidate,
    /// Cosmetic edit: the answer must not change
    #[serde(alias = "no change", alias = "none", alias = "unchanged")]
    NoChange,
}

impl ExpectedEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedEffect::FlipOrInvalidate => "flip_or_invalidate",
            ExpectedEffect::NoChange => "no_change",
        }
    }
}

impl fmt::Display for ExpectedEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpectedEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "flip_or_invalidate" | "flip" | "invalidate" => Ok(ExpectedEffect::FlipOrInvalidate),
            "no_change" | "none" | "unchanged" => Ok(ExpectedEffect::NoChange),
            other => Err(format!("unknown expected effect: {}", other)),
        }
    }
}

/// Check a variant answer against the base answer.
///
/// An unparsed variant answer never passes. A decisive variant passes when
/// the answer is indeterminate or moves beyond tolerance; a cosmetic variant
/// passes when the answer stays within it. `base` must be a value.
pub fn check_consistency(
    base: f64,
    variant: &GradedAnswer,
    effect: ExpectedEffect,
    tolerance: &Tolerance,
) -> bool {
    match (effect, variant) {
        (_, GradedAnswer::Unparsed) => false,
        (ExpectedEffect::FlipOrInvalidate, GradedAnswer::Indeterminate) => true,
        (ExpectedEffect::FlipOrInvalidate, GradedAnswer::Value(v)) => !tolerance.matches(*v, base),
        (ExpectedEffect::NoChange, GradedAnswer::Indeterminate) => false,
        (ExpectedEffect::NoChange, GradedAnswer::Value(v)) => tolerance.matches(*v, base),
    }
}
