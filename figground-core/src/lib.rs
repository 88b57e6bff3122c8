//! Figground - figure-fact grounding for geometry answers
//!
//! Checks whether a model's answer to a geometry problem rests on the marks
//! actually drawn in the diagram.
//!
//! # Example
//!
//! ```rust
//! use figground::{assess, Figure, ResponseClaims, SceneAnnotation, Tolerance};
//!
//! let scene = SceneAnnotation::from_json_str(r#"{
//!     "points": [{"id": "O"}, {"id": "A"}, {"id": "P"}],
//!     "lines": [{"id": "OA", "p1": "O", "p2": "A"}, {"id": "PA", "p1": "P", "p2": "A"}],
//!     "symbols": [{"id": "t", "type": "tangent_mark"}],
//!     "relations": [{"type": "sym2geo", "symbol_id": "t", "target_ids": ["PA", "A"]}]
//! }"#).unwrap();
//! let figure = Figure::from_scene(&scene).unwrap();
//!
//! let response = ResponseClaims {
//!     final_answer: "59".into(),
//!     figure_facts_used: vec!["PA is tangent at A".into()],
//!     ..Default::default()
//! };
//! let result = assess(&figure, &response, 59.0, &Tolerance::default());
//! assert!(result.correct);
//! assert_eq!(result.score.recall, 1.0);
//! ```

mod answer;
mod assess;
mod classify;
mod consistency;
mod fact;
mod index;
mod metrics;
mod normalize;
mod scene;
mod truth;

pub use answer::{is_correct, GradedAnswer, Tolerance, DEFAULT_ANSWER_EPSILON};
pub use assess::{assess, Assessment, Figure, ResponseClaims};
pub use classify::{
    arc_chord_confusion, classify_errors, guessed_relation, label_anchor, missed_tangency, visual_scale,
    ClaimContext, ClaimSet, Detector, ErrorCode, DETECTORS,
};
pub use consistency::{check_consistency, ExpectedEffect};
pub use fact::{canonical_decimal, Fact, FactKind, FactParseError, FactSet};
pub use index::{canonical_name, ElementKind, RefPrefix, SceneIndex};
pub use metrics::{grounding_prf, GroundingScore};
pub use normalize::{normalize_fact, Claim, Normalizer};
pub use scene::{
    measure_text, Circle, CircularArc, Line, MeasureText, Point, Relation, SceneAnnotation, SceneError, Symbol,
    SymbolKind, TextLabel,
};
pub use truth::extract_truth_facts;
