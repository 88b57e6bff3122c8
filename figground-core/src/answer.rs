//! Final-answer grading

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Slack added on top of every declared tolerance
pub const DEFAULT_ANSWER_EPSILON: f64 = 0.01;

/// Absorbs binary rounding in the tolerance comparison
const FLOAT_GUARD: f64 = 1e-9;

const INDETERMINATE_PHRASES: &[&str] = &[
    "indeterminate",
    "cannot be determined",
    "can't be determined",
    "can not be determined",
    "not determinable",
    "undeterminable",
    "insufficient information",
    "not enough information",
];

/// A final answer as read from a response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GradedAnswer {
    Value(f64),
    /// The response explicitly declined to give a number
    Indeterminate,
    /// No number and no indeterminacy phrase
    Unparsed,
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"))
}

impl GradedAnswer {
    /// Read a final-answer string
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if INDETERMINATE_PHRASES.iter().any(|p| lower.contains(p)) {
            return GradedAnswer::Indeterminate;
        }
        let cleaned = raw.replace(',', "");
        number_re()
            .find(&cleaned)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(GradedAnswer::Value)
            .unwrap_or(GradedAnswer::Unparsed)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            GradedAnswer::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, GradedAnswer::Indeterminate)
    }

    /// Short text for reports
    pub fn display_value(&self) -> String {
        match self {
            GradedAnswer::Value(v) => format!("{}", v),
            GradedAnswer::Indeterminate => "indeterminate".to_string(),
            GradedAnswer::Unparsed => String::new(),
        }
    }
}

/// Declared tolerance plus the global epsilon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub declared: f64,
    pub epsilon: f64,
}

impl Tolerance {
    pub fn new(declared: f64, epsilon: f64) -> Self {
        Self {
            declared: declared.max(0.0),
            epsilon: epsilon.max(0.0),
        }
    }

    pub fn effective(&self) -> f64 {
        self.declared + self.epsilon + FLOAT_GUARD
    }

    /// Whether two values agree within the effective tolerance
    pub fn matches(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.effective()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_ANSWER_EPSILON)
    }
}

/// Correct iff the answer is a number within tolerance of gold
pub fn is_correct(answer: &GradedAnswer, gold: f64, tolerance: &Tolerance) -> bool {
    answer.value().map(|v| tolerance.matches(v, gold)).unwrap_or(false)
}
