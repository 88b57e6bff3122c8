//! Identifier table for a scene
//!
//! Maps the many ways a response may name an element ("PA", "AP", "line PA",
//! "∠PAB", "arc AB") onto one canonical element name, and records the element
//! facts the error detectors need beyond the truth fact set.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::scene::{measure_text, SceneAnnotation, SymbolKind};

/// Kind of a named scene element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Point,
    Line,
    Circle,
    Arc,
    Angle,
}

/// Prefix word that narrows how a reference is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefPrefix {
    Angle,
    Arc,
    Circle,
}

impl RefPrefix {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "angle" | "ang" => Some(RefPrefix::Angle),
            "arc" => Some(RefPrefix::Arc),
            "circle" => Some(RefPrefix::Circle),
            _ => None,
        }
    }

    fn key(&self, name: &str) -> String {
        let tag = match self {
            RefPrefix::Angle => "ANGLE",
            RefPrefix::Arc => "ARC",
            RefPrefix::Circle => "CIRCLE",
        };
        format!("{}:{}", tag, name)
    }

    /// Element kind implied by the prefix when the table cannot resolve it
    pub fn implied_kind(&self) -> ElementKind {
        match self {
            RefPrefix::Angle => ElementKind::Angle,
            RefPrefix::Arc => ElementKind::Arc,
            RefPrefix::Circle => ElementKind::Circle,
        }
    }
}

/// Canonical spelling of an element id
pub fn canonical_name(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Lookup table from element references to canonical element names
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    kinds: IndexMap<String, ElementKind>,
    aliases: HashMap<String, String>,
    endpoints: HashMap<String, (String, String)>,
    tick_groups: Vec<BTreeSet<String>>,
    length_labels: HashSet<String>,
}

impl SceneIndex {
    /// Build the table from an annotation
    pub fn from_scene(scene: &SceneAnnotation) -> Self {
        let mut index = Self::default();

        for point in &scene.points {
            index.add_element(&point.id, ElementKind::Point);
        }

        for line in &scene.lines {
            let name = index.add_element(&line.id, ElementKind::Line);
            let (a, b) = (canonical_name(&line.p1), canonical_name(&line.p2));
            index.add_alias(format!("{}{}", a, b), &name);
            index.add_alias(format!("{}{}", b, a), &name);
            index.endpoints.insert(name, (a, b));
        }

        for circle in &scene.circles {
            let name = index.add_element(&circle.id, ElementKind::Circle);
            index.add_alias(RefPrefix::Circle.key(&canonical_name(&circle.center)), &name);
        }

        for arc in &scene.arcs {
            let name = index.add_element(&arc.id, ElementKind::Arc);
            let (s, e) = (canonical_name(&arc.start), canonical_name(&arc.end));
            index.add_alias(RefPrefix::Arc.key(&format!("{}{}", s, e)), &name);
            index.add_alias(RefPrefix::Arc.key(&format!("{}{}", e, s)), &name);
            index.endpoints.insert(name, (s, e));
        }

        for symbol in &scene.symbols {
            match symbol.kind {
                SymbolKind::AngleArc => {
                    let name = index.add_element(&symbol.id, ElementKind::Angle);
                    for (_, targets) in scene.sym2geo().filter(|(id, _)| *id == symbol.id) {
                        if let Some((x, v, y)) = index.angle_points(targets) {
                            index.add_alias(RefPrefix::Angle.key(&format!("{}{}{}", x, v, y)), &name);
                            index.add_alias(RefPrefix::Angle.key(&format!("{}{}{}", y, v, x)), &name);
                            index.add_alias(RefPrefix::Angle.key(&v), &name);
                        }
                    }
                }
                SymbolKind::TickBar => {
                    for (_, targets) in scene.sym2geo().filter(|(id, _)| *id == symbol.id) {
                        let group: BTreeSet<String> = targets.iter().map(|t| canonical_name(t)).collect();
                        if group.len() >= 2 {
                            index.tick_groups.push(group);
                        }
                    }
                }
                _ => {}
            }
        }

        for (text_id, target_id) in scene.text2geo() {
            let target = canonical_name(target_id);
            let is_length = scene
                .text(text_id)
                .and_then(|t| measure_text(&t.string))
                .map(|m| !m.angular)
                .unwrap_or(false);
            if is_length && index.kind(&target) == Some(ElementKind::Line) {
                index.length_labels.insert(target);
            }
        }

        index
    }

    fn add_element(&mut self, id: &str, kind: ElementKind) -> String {
        let name = canonical_name(id);
        self.kinds.insert(name.clone(), kind);
        self.aliases.insert(name.clone(), name.clone());
        name
    }

    fn add_alias(&mut self, alias: String, name: &str) {
        // Element ids win over derived aliases.
        self.aliases.entry(alias).or_insert_with(|| name.to_string());
    }

    /// Resolve the `[line_a, line_b, vertex]` targets of an angle mark into
    /// the three points `X`, `V`, `Y` of angle XVY.
    fn angle_points(&self, targets: &[String]) -> Option<(String, String, String)> {
        let [line_a, line_b, vertex] = targets else {
            return None;
        };
        let v = canonical_name(vertex);
        let other = |line: &str| -> Option<String> {
            let (p, q) = self.endpoints.get(&canonical_name(line))?;
            if *p == v {
                Some(q.clone())
            } else if *q == v {
                Some(p.clone())
            } else {
                None
            }
        };
        Some((other(line_a.as_str())?, v.clone(), other(line_b.as_str())?))
    }

    /// Resolve a bare reference such as `"pa"` or `"l1"`
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        self.aliases
            .get(&canonical_name(reference))
            .map(String::as_str)
    }

    /// Resolve a prefixed reference such as `angle PAB`, falling back to the bare alias
    pub fn resolve_prefixed(&self, prefix: RefPrefix, reference: &str) -> Option<&str> {
        self.aliases
            .get(&prefix.key(&canonical_name(reference)))
            .map(String::as_str)
            .or_else(|| self.resolve(reference))
    }

    pub fn kind(&self, name: &str) -> Option<ElementKind> {
        self.kinds.get(name).copied()
    }

    /// Endpoints of a line or arc
    pub fn endpoints(&self, name: &str) -> Option<(&str, &str)> {
        self.endpoints
            .get(name)
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Whether two endpoint pairs name the same unordered segment
    pub fn same_endpoints(&self, a: &str, b: &str) -> bool {
        match (self.endpoints(a), self.endpoints(b)) {
            (Some((a1, a2)), Some((b1, b2))) => (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1),
            _ => false,
        }
    }

    /// Whether a single tick-bar mark declares both elements equal
    pub fn same_tick_group(&self, a: &str, b: &str) -> bool {
        self.tick_groups
            .iter()
            .any(|g| g.contains(a) && g.contains(b))
    }

    /// Whether the figure labels this element with a straight-line length
    pub fn has_length_label(&self, name: &str) -> bool {
        self.length_labels.contains(name)
    }

    /// Canonical names in annotation order
    pub fn elements(&self) -> impl Iterator<Item = (&str, ElementKind)> {
        self.kinds.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
