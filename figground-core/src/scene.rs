//! Scene annotation model
//!
//! Mirrors the PGDP-style annotation emitted by the diagram renderer: geometric
//! primitives, visual symbols, text labels and the `sym2geo` / `text2geo`
//! relations that bind marks to the primitives they describe.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Data-integrity errors in a scene annotation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("symbol {0} has no sym2geo relation")]
    UnlinkedSymbol(String),

    #[error("measure text {0} has no text2geo anchor")]
    UnanchoredText(String),

    #[error("text {text} is anchored to {count} elements, expected exactly one")]
    MultipleAnchors { text: String, count: usize },

    #[error("relation from {source_id} targets unknown element {target}")]
    UnknownTarget { source_id: String, target: String },

    #[error("relation references unknown symbol or text {0}")]
    UnknownSource(String),

    #[error("{kind} symbol {symbol} needs at least {expected} targets, found {found}")]
    MalformedRelation {
        symbol: String,
        kind: SymbolKind,
        expected: usize,
        found: usize,
    },

    #[error("invalid annotation JSON: {0}")]
    Json(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub p1: String,
    pub p2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub id: String,
    pub center: String,
    #[serde(default)]
    pub radius: f64,
}

/// An arc of a circle between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularArc {
    pub id: String,
    pub circle: String,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_deg: Option<f64>,
}

/// Visual mark type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    #[serde(alias = "angle-arc")]
    AngleArc,
    #[serde(alias = "tick", alias = "tick-bar")]
    TickBar,
    Parallel,
    Perpendicular,
    #[serde(alias = "tangent-mark", alias = "tangent")]
    TangentMark,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::AngleArc => "angle_arc",
            SymbolKind::TickBar => "tick_bar",
            SymbolKind::Parallel => "parallel",
            SymbolKind::Perpendicular => "perpendicular",
            SymbolKind::TangentMark => "tangent_mark",
        }
    }

    /// Minimum number of sym2geo targets the mark needs to assert anything
    pub fn min_targets(&self) -> usize {
        match self {
            SymbolKind::TickBar => 1,
            SymbolKind::Parallel | SymbolKind::Perpendicular | SymbolKind::TangentMark => 2,
            SymbolKind::AngleArc => 1,
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
}

/// A rendered label string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLabel {
    pub id: String,
    pub string: String,
    /// Render anchor point; only used for placement, never for grounding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

/// Structural link from a mark to the primitives it describes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Relation {
    Sym2geo {
        symbol_id: String,
        target_ids: Vec<String>,
    },
    Text2geo {
        text_id: String,
        target_id: String,
    },
    #[serde(other)]
    Other,
}

/// Ground-truth annotation for one figure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneAnnotation {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub circles: Vec<Circle>,
    #[serde(default)]
    pub arcs: Vec<CircularArc>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub texts: Vec<TextLabel>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Numeric content of a measurement label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureText {
    /// Number exactly as written in the label
    pub value: String,
    /// Carries a degree unit
    pub angular: bool,
}

fn degree_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(-?\d+(?:\.\d+)?)\s*(?:°|º|deg\b|degrees?\b)").expect("valid regex"))
}

fn assigned_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"=\s*(-?\d+(?:\.\d+)?)").expect("valid regex"))
}

fn bare_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*(?:cm|mm|m|units?)?\s*$").expect("valid regex"))
}

/// Extract the measurement carried by a label, if any.
///
/// `"31°"`, `"∠PAB = 31°"` and `"x = 20"` encode measures; `"A"` does not.
pub fn measure_text(content: &str) -> Option<MeasureText> {
    let content = content.replace(',', "");
    if let Some(caps) = degree_value_re().captures(&content) {
        return Some(MeasureText {
            value: caps[1].to_string(),
            angular: true,
        });
    }
    assigned_value_re()
        .captures(&content)
        .or_else(|| bare_value_re().captures(&content))
        .map(|caps| MeasureText {
            value: caps[1].to_string(),
            angular: false,
        })
}

impl SceneAnnotation {
    /// Parse an annotation from its JSON form
    pub fn from_json_str(content: &str) -> Result<Self, SceneError> {
        serde_json::from_str(content).map_err(|e| SceneError::Json(e.to_string()))
    }

    pub fn symbol(&self, id: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn text(&self, id: &str) -> Option<&TextLabel> {
        self.texts.iter().find(|t| t.id == id)
    }

    /// Iterate over every sym2geo relation as `(symbol_id, targets)`
    pub fn sym2geo(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.relations.iter().filter_map(|r| match r {
            Relation::Sym2geo {
                symbol_id,
                target_ids,
            } => Some((symbol_id.as_str(), target_ids.as_slice())),
            _ => None,
        })
    }

    /// Iterate over every text2geo relation as `(text_id, target_id)`
    pub fn text2geo(&self) -> impl Iterator<Item = (&str, &str)> {
        self.relations.iter().filter_map(|r| match r {
            Relation::Text2geo { text_id, target_id } => Some((text_id.as_str(), target_id.as_str())),
            _ => None,
        })
    }

    /// Ids that a relation may legitimately target
    pub fn element_ids(&self) -> HashSet<&str> {
        self.points
            .iter()
            .map(|p| p.id.as_str())
            .chain(self.lines.iter().map(|l| l.id.as_str()))
            .chain(self.circles.iter().map(|c| c.id.as_str()))
            .chain(self.arcs.iter().map(|a| a.id.as_str()))
            .chain(self.symbols.iter().map(|s| s.id.as_str()))
            .collect()
    }

    /// Check the structural invariants the evaluation core relies on.
    ///
    /// Every symbol needs at least one sym2geo relation with enough targets,
    /// every measurement text exactly one text2geo anchor, and every relation
    /// must point at elements that exist.
    pub fn validate(&self) -> Result<(), SceneError> {
        let elements = self.element_ids();

        let mut linked_symbols: HashSet<&str> = HashSet::new();
        for (symbol_id, targets) in self.sym2geo() {
            let symbol = self
                .symbol(symbol_id)
                .ok_or_else(|| SceneError::UnknownSource(symbol_id.to_string()))?;
            if targets.len() < symbol.kind.min_targets() {
                return Err(SceneError::MalformedRelation {
                    symbol: symbol_id.to_string(),
                    kind: symbol.kind,
                    expected: symbol.kind.min_targets(),
                    found: targets.len(),
                });
            }
            for target in targets {
                if !elements.contains(target.as_str()) {
                    return Err(SceneError::UnknownTarget {
                        source_id: symbol_id.to_string(),
                        target: target.clone(),
                    });
                }
            }
            linked_symbols.insert(symbol_id);
        }

        if let Some(unlinked) = self
            .symbols
            .iter()
            .find(|s| !linked_symbols.contains(s.id.as_str()))
        {
            return Err(SceneError::UnlinkedSymbol(unlinked.id.clone()));
        }

        let mut anchors: HashMap<&str, usize> = HashMap::new();
        for (text_id, target_id) in self.text2geo() {
            if self.text(text_id).is_none() {
                return Err(SceneError::UnknownSource(text_id.to_string()));
            }
            if !elements.contains(target_id) {
                return Err(SceneError::UnknownTarget {
                    source_id: text_id.to_string(),
                    target: target_id.to_string(),
                });
            }
            *anchors.entry(text_id).or_insert(0) += 1;
        }

        for text in &self.texts {
            if measure_text(&text.string).is_none() {
                continue;
            }
            match anchors.get(text.id.as_str()).copied().unwrap_or(0) {
                0 => return Err(SceneError::UnanchoredText(text.id.clone())),
                1 => {}
                count => {
                    return Err(SceneError::MultipleAnchors {
                        text: text.id.clone(),
                        count,
                    })
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TANGENT_SCENE: &str = r#"{
        "points": [{"id": "O", "x": 200, "y": 200}, {"id": "A", "x": 200, "y": 120}, {"id": "P", "x": 320, "y": 120}],
        "lines": [{"id": "OA", "p1": "O", "p2": "A"}, {"id": "PA", "p1": "P", "p2": "A"}],
        "circles": [{"id": "c1", "center": "O", "radius": 80}],
        "symbols": [{"id": "tangA", "type": "tangent_mark"}, {"id": "rtA", "type": "perpendicular"}],
        "texts": [{"id": "lblA", "string": "A", "anchor": "A"}, {"id": "t31", "string": "31°", "anchor": "A"}],
        "relations": [
            {"type": "sym2geo", "symbol_id": "tangA", "target_ids": ["PA", "A"]},
            {"type": "sym2geo", "symbol_id": "rtA", "target_ids": ["OA", "PA"]},
            {"type": "text2geo", "text_id": "t31", "target_id": "c1"}
        ]
    }"#;

    #[test]
    fn test_parse_and_validate() {
        let scene = SceneAnnotation::from_json_str(TANGENT_SCENE).unwrap();
        assert_eq!(scene.lines.len(), 2);
        assert_eq!(scene.symbols[0].kind, SymbolKind::TangentMark);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_symbol_kind_aliases() {
        let kind: SymbolKind = serde_json::from_str("\"tick\"").unwrap();
        assert_eq!(kind, SymbolKind::TickBar);
        let kind: SymbolKind = serde_json::from_str("\"angle-arc\"").unwrap();
        assert_eq!(kind, SymbolKind::AngleArc);
    }

    #[test]
    fn test_unlinked_symbol_rejected() {
        let mut scene = SceneAnnotation::from_json_str(TANGENT_SCENE).unwrap();
        scene.symbols.push(Symbol {
            id: "par1".to_string(),
            kind: SymbolKind::Parallel,
        });
        assert_eq!(
            scene.validate(),
            Err(SceneError::UnlinkedSymbol("par1".to_string()))
        );
    }

    #[test]
    fn test_unanchored_measure_rejected() {
        let mut scene = SceneAnnotation::from_json_str(TANGENT_SCENE).unwrap();
        scene.texts.push(TextLabel {
            id: "t40".to_string(),
            string: "40°".to_string(),
            anchor: None,
        });
        assert_eq!(
            scene.validate(),
            Err(SceneError::UnanchoredText("t40".to_string()))
        );
    }

    #[test]
    fn test_double_anchor_rejected() {
        let mut scene = SceneAnnotation::from_json_str(TANGENT_SCENE).unwrap();
        scene.relations.push(Relation::Text2geo {
            text_id: "t31".to_string(),
            target_id: "OA".to_string(),
        });
        assert!(matches!(
            scene.validate(),
            Err(SceneError::MultipleAnchors { count: 2, .. })
        ));
    }

    #[test]
    fn test_short_relation_rejected() {
        let mut scene = SceneAnnotation::from_json_str(TANGENT_SCENE).unwrap();
        scene.relations[1] = Relation::Sym2geo {
            symbol_id: "rtA".to_string(),
            target_ids: vec!["OA".to_string()],
        };
        assert!(matches!(
            scene.validate(),
            Err(SceneError::MalformedRelation { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_measure_text() {
        assert_eq!(
            measure_text("∠PAB = 31°"),
            Some(MeasureText { value: "31".to_string(), angular: true })
        );
        assert_eq!(
            measure_text("x = 20"),
            Some(MeasureText { value: "20".to_string(), angular: false })
        );
        assert_eq!(
            measure_text("12 cm"),
            Some(MeasureText { value: "12".to_string(), angular: false })
        );
        assert_eq!(measure_text("A"), None);
        assert_eq!(measure_text("1,080°").map(|m| m.value), Some("1080".to_string()));
    }
}
