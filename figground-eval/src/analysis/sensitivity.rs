//! Modality sensitivity: how much an item's accuracy depends on the image or the text

use serde::{Deserialize, Serialize};

use crate::items::VariantRole;
use crate::runner::{EvaluationRow, ItemOutcome};

/// Accuracy change of the single-modality variants against the base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalitySensitivity {
    pub item: String,
    pub base_correct: bool,
    /// `image_only` correctness minus base correctness (-1, 0 or +1)
    pub image_only_delta: Option<i32>,
    /// `text_only` correctness minus base correctness (-1, 0 or +1)
    pub text_only_delta: Option<i32>,
}

fn graded_with_role(rows: &[EvaluationRow], role: VariantRole) -> Option<&EvaluationRow> {
    rows.iter().find(|r| r.role == role && r.is_graded())
}

/// Sensitivity for every item whose base row is graded
pub fn modality_sensitivity(outcomes: &[ItemOutcome]) -> Vec<ModalitySensitivity> {
    outcomes
        .iter()
        .filter_map(|outcome| {
            let rows = outcome.rows();
            let base = graded_with_role(rows, VariantRole::Base)?;
            let delta = |role| graded_with_role(rows, role).map(|r| r.correct as i32 - base.correct as i32);
            Some(ModalitySensitivity {
                item: outcome.item().to_string(),
                base_correct: base.correct,
                image_only_delta: delta(VariantRole::ImageOnly),
                text_only_delta: delta(VariantRole::TextOnly),
            })
        })
        .collect()
}
