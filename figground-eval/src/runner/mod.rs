//! Evaluation engine: per-item grading and the concurrent run over a dataset

pub mod executor;
pub mod item;

pub use executor::{ConsoleProgress, EvalError, Evaluator, ExecutorConfig, NoOpProgress, ProgressCallback};
pub use item::evaluate_item;

use std::fmt;

use serde::{Deserialize, Serialize};

use figground::{ErrorCode, GradedAnswer, GroundingScore};

use crate::items::VariantRole;

/// Whether a row was graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Graded,
    Ungraded,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Graded => "graded",
            RowStatus::Ungraded => "ungraded",
        }
    }
}

/// Result of the contrastive consistency check for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consistency {
    #[serde(rename = "pass")]
    Pass,
    #[serde(rename = "fail")]
    Fail,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Consistency {
    pub fn from_check(passed: bool) -> Self {
        if passed {
            Consistency::Pass
        } else {
            Consistency::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Consistency::Pass => "pass",
            Consistency::Fail => "fail",
            Consistency::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One report row: a single variant of a single item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRow {
    pub item: String,
    pub variant: String,
    pub role: VariantRole,
    pub status: RowStatus,
    pub correct: bool,
    /// `None` for ungraded rows
    pub answer: Option<GradedAnswer>,
    pub score: GroundingScore,
    pub flags: Vec<ErrorCode>,
    pub consistency: Consistency,
    /// Why the row is ungraded or how its response failed to parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EvaluationRow {
    /// Row for a variant that could not be graded
    pub fn ungraded(item: &str, variant: &str, role: VariantRole, note: impl Into<String>) -> Self {
        Self {
            item: item.to_string(),
            variant: variant.to_string(),
            role,
            status: RowStatus::Ungraded,
            correct: false,
            answer: None,
            score: GroundingScore::default(),
            flags: Vec::new(),
            consistency: Consistency::NotApplicable,
            note: Some(note.into()),
        }
    }

    pub fn is_graded(&self) -> bool {
        self.status == RowStatus::Graded
    }

    /// Numeric answer of a graded row
    pub fn value(&self) -> Option<f64> {
        if !self.is_graded() {
            return None;
        }
        self.answer.as_ref().and_then(GradedAnswer::value)
    }
}

/// What happened to one item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Evaluated { item: String, rows: Vec<EvaluationRow> },
    Skipped { item: String, reason: String },
}

impl ItemOutcome {
    pub fn item(&self) -> &str {
        match self {
            ItemOutcome::Evaluated { item, .. } | ItemOutcome::Skipped { item, .. } => item,
        }
    }

    pub fn rows(&self) -> &[EvaluationRow] {
        match self {
            ItemOutcome::Evaluated { rows, .. } => rows,
            ItemOutcome::Skipped { .. } => &[],
        }
    }
}

/// All outcomes of a run, in item-id order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunResults {
    pub outcomes: Vec<ItemOutcome>,
}

impl RunResults {
    pub fn rows(&self) -> impl Iterator<Item = &EvaluationRow> {
        self.outcomes.iter().flat_map(|o| o.rows())
    }

    /// `(item, reason)` of every skipped item
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            ItemOutcome::Skipped { item, reason } => Some((item.as_str(), reason.as_str())),
            ItemOutcome::Evaluated { .. } => None,
        })
    }
}
