//! Truth fact extraction
//!
//! Derives what a figure actually shows from its annotation graph. Only
//! relation marks and measurement labels produce facts; tick bars and bare
//! angle arcs mark equality or the existence of an angle and contribute
//! nothing on their own.

use crate::fact::{Fact, FactSet};
use crate::index::{ElementKind, SceneIndex};
use crate::normalize::Normalizer;
use crate::scene::{measure_text, SceneAnnotation, SceneError, SymbolKind};

/// Extract the complete truth fact set for a scene.
///
/// The annotation is validated first; a data-integrity violation is returned
/// as an error rather than producing a partial set.
pub fn extract_truth_facts(scene: &SceneAnnotation, index: &SceneIndex) -> Result<FactSet, SceneError> {
    scene.validate()?;

    let normalizer = Normalizer::with_index(index);
    let mut facts = FactSet::new();

    for (symbol_id, targets) in scene.sym2geo() {
        let symbol = scene
            .symbol(symbol_id)
            .ok_or_else(|| SceneError::UnknownSource(symbol_id.to_string()))?;
        let names: Vec<String> = targets.iter().map(|t| normalizer.canonical_element(t)).collect();

        let fact = match symbol.kind {
            SymbolKind::Perpendicular => line_pair(index, &names).map(|(a, b)| Fact::perpendicular(a, b)),
            SymbolKind::Parallel => line_pair(index, &names).map(|(a, b)| Fact::parallel(a, b)),
            SymbolKind::TangentMark => tangent_targets(index, &names).map(|(l, p)| Fact::tangent(l, p)),
            SymbolKind::AngleArc | SymbolKind::TickBar => None,
        };

        match fact {
            Some(fact) => {
                facts.insert(fact);
            }
            None if matches!(
                symbol.kind,
                SymbolKind::Perpendicular | SymbolKind::Parallel | SymbolKind::TangentMark
            ) =>
            {
                return Err(SceneError::MalformedRelation {
                    symbol: symbol_id.to_string(),
                    kind: symbol.kind,
                    expected: symbol.kind.min_targets(),
                    found: targets.len(),
                });
            }
            None => {}
        }
    }

    for (text_id, target_id) in scene.text2geo() {
        let Some(measure) = scene.text(text_id).and_then(|t| measure_text(&t.string)) else {
            continue;
        };
        let target = normalizer.canonical_element(target_id);
        if !matches!(index.kind(&target), Some(ElementKind::Arc) | Some(ElementKind::Angle)) {
            continue;
        }
        if let Some(fact) = Fact::measure(&target, &measure.value) {
            facts.insert(fact);
        }
    }

    tracing::debug!(facts = facts.len(), "extracted truth facts");
    Ok(facts)
}

/// First two distinct targets that are lines (or unknown to the table)
fn line_pair<'n>(index: &SceneIndex, names: &'n [String]) -> Option<(&'n str, &'n str)> {
    let mut lines = names
        .iter()
        .filter(|n| matches!(index.kind(n), Some(ElementKind::Line) | None));
    let a = lines.next()?;
    let b = lines.find(|n| *n != a)?;
    Some((a.as_str(), b.as_str()))
}

/// `(line, point)` for a tangent mark, picked by kind with target order as fallback
fn tangent_targets<'n>(index: &SceneIndex, names: &'n [String]) -> Option<(&'n str, &'n str)> {
    let by_kind = |kind: ElementKind| names.iter().find(|n| index.kind(n) == Some(kind));
    match (by_kind(ElementKind::Line), by_kind(ElementKind::Point)) {
        (Some(line), Some(point)) => Some((line.as_str(), point.as_str())),
        _ => match names {
            [line, point, ..] if line != point => Some((line.as_str(), point.as_str())),
            _ => None,
        },
    }
}
