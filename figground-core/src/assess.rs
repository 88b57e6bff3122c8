//! Per-response assessment
//!
//! Ties the pieces together for one response against one figure: grades the
//! answer, normalizes the claims, scores grounding and runs the detectors.

use serde::{Deserialize, Serialize};

use crate::answer::{is_correct, GradedAnswer, Tolerance};
use crate::classify::{classify_errors, ClaimContext, ClaimSet, ErrorCode};
use crate::fact::FactSet;
use crate::index::SceneIndex;
use crate::metrics::{grounding_prf, GroundingScore};
use crate::normalize::Normalizer;
use crate::scene::{SceneAnnotation, SceneError};
use crate::truth::extract_truth_facts;

/// The parts of a model response the evaluation reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseClaims {
    #[serde(default)]
    pub final_answer: String,
    #[serde(default)]
    pub figure_facts_used: Vec<String>,
    #[serde(default)]
    pub text_givens_used: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Free prose outside the structured lists
    #[serde(default)]
    pub explanation: String,
}

impl ResponseClaims {
    /// Figure facts, text givens and assumptions, in that order
    pub fn raw_claims(&self) -> Vec<String> {
        self.figure_facts_used
            .iter()
            .chain(&self.text_givens_used)
            .chain(&self.assumptions)
            .cloned()
            .collect()
    }

    /// Everything the response says, one entry per line
    pub fn full_text(&self) -> String {
        let mut lines = vec![self.final_answer.clone()];
        lines.extend(self.raw_claims());
        if !self.explanation.is_empty() {
            lines.push(self.explanation.clone());
        }
        lines.join("\n")
    }
}

/// Truth facts and identifier table of one validated figure
#[derive(Debug, Clone)]
pub struct Figure {
    pub index: SceneIndex,
    pub truth: FactSet,
}

impl Figure {
    pub fn from_scene(scene: &SceneAnnotation) -> Result<Self, SceneError> {
        let index = SceneIndex::from_scene(scene);
        let truth = extract_truth_facts(scene, &index)?;
        Ok(Self { index, truth })
    }

    pub fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::with_index(&self.index)
    }
}

/// Outcome of grading one response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub answer: GradedAnswer,
    pub correct: bool,
    pub score: GroundingScore,
    pub flags: Vec<ErrorCode>,
    pub claimed: FactSet,
}

/// Grade a response against a figure and a gold value.
///
/// A final answer with no extractable number voids the claimed facts and
/// givens, so grounding is scored as if nothing was claimed. The text
/// detectors still read everything the response says.
pub fn assess(figure: &Figure, response: &ResponseClaims, gold: f64, tolerance: &Tolerance) -> Assessment {
    let answer = GradedAnswer::parse(&response.final_answer);
    let normalizer = figure.normalizer();
    let (claimed, givens) = if answer == GradedAnswer::Unparsed {
        tracing::debug!(final_answer = %response.final_answer, "no extractable answer, ignoring claimed facts");
        (ClaimSet::default(), ClaimSet::default())
    } else {
        (
            ClaimSet::collect(&normalizer, &response.figure_facts_used),
            ClaimSet::collect(&normalizer, &response.text_givens_used),
        )
    };
    let raw_claims = response.raw_claims();
    let text = response.full_text();

    let ctx = ClaimContext {
        claimed: &claimed,
        givens: &givens,
        truth: &figure.truth,
        raw_claims: &raw_claims,
        response_text: &text,
        normalizer,
    };
    let flags = classify_errors(&ctx);
    let score = grounding_prf(&claimed.facts, &figure.truth);

    Assessment {
        answer,
        correct: is_correct(&answer, gold, tolerance),
        score,
        flags,
        claimed: claimed.facts,
    }
}
