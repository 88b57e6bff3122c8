//! Sequential evaluation of a single item: base first, then its variants

use std::path::Path;

use figground::{assess, check_consistency, Figure, ResponseClaims, Tolerance};

use crate::items::{load_item, GoldRecord, ItemPaths, VariantDescriptor, VariantRole};
use crate::response::{find_response, load_response};

use super::{Consistency, EvaluationRow, ItemOutcome, RowStatus};

/// Grade every variant of one item.
///
/// A scene that fails its integrity checks, or item files that cannot be
/// loaded, skip the whole item. Missing responses or gold produce ungraded
/// rows; a response that fails to parse is graded as an empty, wrong answer.
pub fn evaluate_item(
    paths: &ItemPaths,
    responses_dir: &Path,
    answer_epsilon: f64,
    extensions: &[String],
) -> ItemOutcome {
    let family = match load_item(paths) {
        Ok(family) => family,
        Err(e) => {
            tracing::warn!("Skipping item {}: {}", paths.id, e);
            return ItemOutcome::Skipped {
                item: paths.id.clone(),
                reason: e.to_string(),
            };
        }
    };

    let figure = match Figure::from_scene(&family.scene) {
        Ok(figure) => figure,
        Err(e) => {
            tracing::warn!("Skipping item {}: {}", family.id, e);
            return ItemOutcome::Skipped {
                item: family.id,
                reason: e.to_string(),
            };
        }
    };
    tracing::debug!("Item {}: {} truth facts", family.id, figure.truth.len());

    let mut rows = Vec::with_capacity(family.variants.len());
    let mut base_value = None;

    for (role, variant) in family.ordered_variants() {
        let mut row = grade_variant(
            &family.id,
            &figure,
            family.gold.as_ref(),
            role,
            variant,
            responses_dir,
            answer_epsilon,
            extensions,
        );

        if role == VariantRole::Base {
            base_value = row.value();
        } else if let (Some(effect), Some(base), Some(answer), Some(gold)) =
            (role.checked_effect(), base_value, row.answer.filter(|_| row.is_graded()), &family.gold)
        {
            let passed = check_consistency(base, &answer, effect, &gold.tolerance(answer_epsilon));
            row.consistency = Consistency::from_check(passed);
            if !passed {
                tracing::info!("Consistency failed for {} ({} variant)", row.variant, role);
            }
        }

        rows.push(row);
    }

    ItemOutcome::Evaluated { item: family.id, rows }
}

#[allow(clippy::too_many_arguments)]
fn grade_variant(
    item: &str,
    figure: &Figure,
    gold: Option<&GoldRecord>,
    role: VariantRole,
    variant: &VariantDescriptor,
    responses_dir: &Path,
    answer_epsilon: f64,
    extensions: &[String],
) -> EvaluationRow {
    let Some(path) = find_response(responses_dir, &variant.variant_id, extensions) else {
        tracing::warn!("No response for {}", variant.variant_id);
        return EvaluationRow::ungraded(item, &variant.variant_id, role, "missing response");
    };
    let Some(gold) = gold else {
        return EvaluationRow::ungraded(item, &variant.variant_id, role, "missing gold record");
    };

    let (response, note) = match load_response(&path) {
        Ok(response) => (response, None),
        Err(e) => {
            tracing::warn!("Unparseable response {}: {}", path.display(), e);
            (ResponseClaims::default(), Some(e.to_string()))
        }
    };

    let tolerance: Tolerance = gold.tolerance(answer_epsilon);
    let result = assess(figure, &response, gold.answer.value, &tolerance);
    if !result.flags.is_empty() {
        tracing::debug!("{} flagged {:?}", variant.variant_id, result.flags);
    }

    EvaluationRow {
        item: item.to_string(),
        variant: variant.variant_id.clone(),
        role,
        status: RowStatus::Graded,
        correct: result.correct,
        answer: Some(result.answer),
        score: result.score,
        flags: result.flags,
        consistency: Consistency::NotApplicable,
        note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figground::ErrorCode;

    const SCENE: &str = r#"{
        "points": [{"id": "O"}, {"id": "A"}, {"id": "P"}],
        "lines": [{"id": "OA", "p1": "O", "p2": "A"}, {"id": "PA", "p1": "P", "p2": "A"}],
        "circles": [{"id": "c1", "center": "O", "radius": 80}],
        "symbols": [{"id": "tangA", "type": "tangent_mark"}],
        "relations": [{"type": "sym2geo", "symbol_id": "tangA", "target_ids": ["PA", "A"]}]
    }"#;

    const VARIANTS: &str = r#"[
        {"variant_id": "T1_mark_removed", "expected_effect": "flip_or_invalidate", "decisive_symbol": "tangA"},
        {"variant_id": "T1_full_txtimg"},
        {"variant_id": "T1_recolor", "expected_effect": "no_change"}
    ]"#;

    fn setup(scene: &str) -> (tempfile::TempDir, ItemPaths, std::path::PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let items = root.path().join("items");
        let responses = root.path().join("responses");
        std::fs::create_dir_all(items.join("T1")).unwrap();
        std::fs::create_dir_all(&responses).unwrap();
        let paths = ItemPaths::new(&items, "T1");
        std::fs::write(&paths.scene, scene).unwrap();
        std::fs::write(&paths.variants, VARIANTS).unwrap();
        std::fs::write(&paths.gold, r#"{"gold": {"answer": {"value": 90}}}"#).unwrap();
        (root, paths, responses)
    }

    fn exts() -> Vec<String> {
        vec!["json".to_string(), "txt".to_string()]
    }

    #[test]
    fn test_base_first_and_consistency() {
        let (_root, paths, responses) = setup(SCENE);
        std::fs::write(
            responses.join("T1_full_txtimg.json"),
            r#"{"final_answer": "90", "figure_facts_used": ["PA tangent@ A"]}"#,
        )
        .unwrap();
        std::fs::write(responses.join("T1_mark_removed.json"), r#"{"final_answer": "90"}"#).unwrap();
        std::fs::write(responses.join("T1_recolor.txt"), "FINAL_ANSWER: 90\n").unwrap();

        let outcome = evaluate_item(&paths, &responses, 0.01, &exts());
        let rows = outcome.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].variant, "T1_full_txtimg");
        assert!(rows[0].correct);
        assert_eq!(rows[0].consistency, Consistency::NotApplicable);
        assert_eq!(rows[1].role, VariantRole::Decisive);
        assert_eq!(rows[1].consistency, Consistency::Fail);
        assert!(rows[1].flags.contains(&ErrorCode::MissedTangency));
        assert_eq!(rows[2].consistency, Consistency::Pass);
    }

    #[test]
    fn test_missing_and_malformed_responses() {
        let (_root, paths, responses) = setup(SCENE);
        std::fs::write(responses.join("T1_full_txtimg.json"), "{ not json").unwrap();

        let outcome = evaluate_item(&paths, &responses, 0.01, &exts());
        let rows = outcome.rows();
        assert_eq!(rows[0].status, RowStatus::Graded);
        assert!(!rows[0].correct);
        assert!(rows[0].note.is_some());
        assert_eq!(rows[1].status, RowStatus::Ungraded);
        // base has no numeric answer
        assert_eq!(rows[2].consistency, Consistency::NotApplicable);
    }

    #[test]
    fn test_integrity_error_skips_item() {
        let broken = r#"{
            "points": [{"id": "A"}],
            "symbols": [{"id": "orphan", "type": "parallel"}],
            "relations": []
        }"#;
        let (_root, paths, responses) = setup(broken);
        let outcome = evaluate_item(&paths, &responses, 0.01, &exts());
        assert!(matches!(outcome, ItemOutcome::Skipped { .. }));
        assert!(outcome.rows().is_empty());
    }
}
