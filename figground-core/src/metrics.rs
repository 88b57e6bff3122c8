//! Grounding precision / recall / F1

use serde::{Deserialize, Serialize};

use crate::fact::FactSet;

/// Set overlap between claimed and truth facts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundingScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl GroundingScore {
    /// `(precision, recall, f1)`
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.precision, self.recall, self.f1)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Score claimed facts against truth.
///
/// Precision is 0.0 with no claims and recall is 0.0 with no truth facts;
/// F1 is 0.0 whenever precision + recall is 0.
pub fn grounding_prf(claimed: &FactSet, truth: &FactSet) -> GroundingScore {
    let tp = claimed.intersection(truth).count();
    let fp = claimed.len() - tp;
    let fn_ = truth.len() - tp;

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    GroundingScore {
        precision,
        recall,
        f1,
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;

    fn set(facts: &[Fact]) -> FactSet {
        facts.iter().cloned().collect()
    }

    #[test]
    fn test_identical_sets() {
        let truth = set(&[Fact::tangent("PA", "A"), Fact::perpendicular("OA", "PA")]);
        assert_eq!(grounding_prf(&truth, &truth).as_tuple(), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_edges() {
        let truth = set(&[Fact::tangent("PA", "A")]);
        let empty = FactSet::new();
        assert_eq!(grounding_prf(&empty, &truth).as_tuple(), (0.0, 0.0, 0.0));
        assert_eq!(grounding_prf(&truth, &empty).as_tuple(), (0.0, 0.0, 0.0));
        assert_eq!(grounding_prf(&empty, &empty).as_tuple(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_partial_overlap() {
        let truth = set(&[Fact::tangent("PA", "A"), Fact::perpendicular("OA", "PA")]);
        let claimed = set(&[Fact::perpendicular("PA", "OA"), Fact::parallel("OA", "PA")]);
        let score = grounding_prf(&claimed, &truth);
        assert_eq!(score.true_positives, 1);
        assert_eq!(score.false_positives, 1);
        assert_eq!(score.false_negatives, 1);
        assert!((score.precision - 0.5).abs() < 1e-12);
        assert!((score.recall - 0.5).abs() < 1e-12);
        assert!((score.f1 - 0.5).abs() < 1e-12);
    }
}
