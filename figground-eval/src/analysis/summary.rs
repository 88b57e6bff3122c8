//! Run-level aggregate metrics

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use figground::ErrorCode;

use crate::items::VariantRole;
use crate::runner::{Consistency, EvaluationRow, RunResults};

use super::sensitivity::{modality_sensitivity, ModalitySensitivity};

/// Pass rate of the consistency check over one variant role
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsistencyRate {
    pub checked: usize,
    pub passed: usize,
    pub rate: f64,
}

impl ConsistencyRate {
    fn over<'a>(rows: impl Iterator<Item = &'a EvaluationRow>) -> Self {
        let mut checked = 0;
        let mut passed = 0;
        for row in rows {
            match row.consistency {
                Consistency::Pass => {
                    checked += 1;
                    passed += 1;
                }
                Consistency::Fail => checked += 1,
                Consistency::NotApplicable => {}
            }
        }
        Self {
            checked,
            passed,
            rate: mean_of(passed as f64, checked),
        }
    }
}

/// An item left out of the run and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub item: String,
    pub reason: String,
}

/// Aggregate view over a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_items: usize,
    pub evaluated_items: usize,
    pub total_rows: usize,
    pub graded_rows: usize,
    pub ungraded_rows: usize,
    pub correct_rows: usize,
    /// Correct over graded rows
    pub accuracy: f64,
    pub mean_precision: f64,
    pub mean_recall: f64,
    pub mean_f1: f64,
    /// Every code in detector order, including zero counts
    pub flag_counts: IndexMap<String, usize>,
    pub decisive_consistency: ConsistencyRate,
    pub cosmetic_consistency: ConsistencyRate,
    pub modality_sensitivity: Vec<ModalitySensitivity>,
    pub skipped: Vec<SkippedItem>,
}

fn mean_of(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl RunSummary {
    pub fn from_results(results: &RunResults) -> Self {
        let rows: Vec<&EvaluationRow> = results.rows().collect();
        let graded: Vec<&EvaluationRow> = rows.iter().copied().filter(|r| r.is_graded()).collect();
        let correct_rows = graded.iter().filter(|r| r.correct).count();

        let mut flag_counts: IndexMap<String, usize> =
            ErrorCode::ALL.iter().map(|c| (c.as_str().to_string(), 0)).collect();
        for flag in graded.iter().flat_map(|r| &r.flags) {
            *flag_counts.entry(flag.as_str().to_string()).or_insert(0) += 1;
        }

        let skipped: Vec<SkippedItem> = results
            .skipped()
            .map(|(item, reason)| SkippedItem {
                item: item.to_string(),
                reason: reason.to_string(),
            })
            .collect();

        let sum = |f: fn(&EvaluationRow) -> f64| graded.iter().map(|r| f(r)).sum::<f64>();

        Self {
            total_items: results.outcomes.len(),
            evaluated_items: results.outcomes.len() - skipped.len(),
            total_rows: rows.len(),
            graded_rows: graded.len(),
            ungraded_rows: rows.len() - graded.len(),
            correct_rows,
            accuracy: mean_of(correct_rows as f64, graded.len()),
            mean_precision: mean_of(sum(|r| r.score.precision), graded.len()),
            mean_recall: mean_of(sum(|r| r.score.recall), graded.len()),
            mean_f1: mean_of(sum(|r| r.score.f1), graded.len()),
            flag_counts,
            decisive_consistency: ConsistencyRate::over(
                rows.iter().copied().filter(|r| r.role == VariantRole::Decisive),
            ),
            cosmetic_consistency: ConsistencyRate::over(
                rows.iter().copied().filter(|r| r.role == VariantRole::Cosmetic),
            ),
            modality_sensitivity: modality_sensitivity(&results.outcomes),
            skipped,
        }
    }
}
