//! Item definitions and loading
//!
//! An item is one geometry problem: a scene annotation, a gold record and the
//! descriptors of every rendering (variant) a model was asked about.

pub mod loader;

pub use loader::{discover_items, load_gold_str, load_item, load_variants_str, ItemPaths, LoadError};

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use figground::{ExpectedEffect, SceneAnnotation, Tolerance};

/// Accepted numeric answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldAnswer {
    pub value: f64,
    /// Declared tolerance; absent or `null` means exact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tol: Option<f64>,
}

impl GoldAnswer {
    pub fn declared_tol(&self) -> f64 {
        self.tol.unwrap_or(0.0)
    }
}

/// Gold record for one base item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldRecord {
    pub answer: GoldAnswer,
    /// Free-form reasoning keys; documentation only
    #[serde(default)]
    pub reasoning_keys: Vec<String>,
    /// Error tags the item is designed to elicit; documentation only
    #[serde(default, alias = "allowed_error_tags")]
    pub error_tags: Vec<String>,
}

impl GoldRecord {
    pub fn tolerance(&self, answer_epsilon: f64) -> Tolerance {
        Tolerance::new(self.answer.declared_tol(), answer_epsilon)
    }
}

fn default_true() -> bool {
    true
}

/// Distinguishes an explicit `null` from an absent field
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One rendering of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub variant_id: String,
    #[serde(default)]
    pub base: bool,
    #[serde(default = "default_true")]
    pub text_included: bool,
    /// `Some(None)` when the variant is declared to have no image
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_effect: Option<ExpectedEffect>,
    /// Symbol or text whose edit makes this variant decisive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decisive_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mark_removed: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub render_ops: Vec<serde_json::Value>,
}

impl VariantDescriptor {
    pub fn new(variant_id: impl Into<String>) -> Self {
        Self {
            variant_id: variant_id.into(),
            base: false,
            text_included: true,
            image: None,
            expected_effect: None,
            decisive_symbol: None,
            mark_removed: Vec::new(),
            render_ops: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: ExpectedEffect) -> Self {
        self.expected_effect = Some(effect);
        self
    }

    fn has_no_image(&self) -> bool {
        matches!(self.image, Some(None))
    }
}

/// How a variant relates to its base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantRole {
    Base,
    /// Decisive edit, answer must flip or become indeterminate
    Decisive,
    /// Cosmetic edit, answer must not change
    Cosmetic,
    ImageOnly,
    TextOnly,
    Other,
}

impl VariantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantRole::Base => "base",
            VariantRole::Decisive => "decisive",
            VariantRole::Cosmetic => "cosmetic",
            VariantRole::ImageOnly => "image_only",
            VariantRole::TextOnly => "text_only",
            VariantRole::Other => "other",
        }
    }

    /// Expected effect a consistency check is run against, if any
    pub fn checked_effect(&self) -> Option<ExpectedEffect> {
        match self {
            VariantRole::Decisive => Some(ExpectedEffect::FlipOrInvalidate),
            VariantRole::Cosmetic => Some(ExpectedEffect::NoChange),
            _ => None,
        }
    }
}

impl fmt::Display for VariantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of the base variant: flagged `base`, else the `_full_txtimg`
/// rendering, else the first variant without an expected effect
pub fn base_index(variants: &[VariantDescriptor]) -> Option<usize> {
    variants
        .iter()
        .position(|v| v.base)
        .or_else(|| variants.iter().position(|v| v.variant_id.ends_with("_full_txtimg")))
        .or_else(|| variants.iter().position(|v| v.expected_effect.is_none()))
}

/// Role of every variant, in descriptor order
pub fn assign_roles(variants: &[VariantDescriptor]) -> Vec<VariantRole> {
    let base = base_index(variants);
    variants
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if Some(i) == base {
                return VariantRole::Base;
            }
            match v.expected_effect {
                Some(ExpectedEffect::FlipOrInvalidate) => VariantRole::Decisive,
                Some(ExpectedEffect::NoChange) => VariantRole::Cosmetic,
                None if !v.text_included => VariantRole::ImageOnly,
                None if v.has_no_image() => VariantRole::TextOnly,
                None => VariantRole::Other,
            }
        })
        .collect()
}

/// A fully loaded item
#[derive(Debug, Clone)]
pub struct ItemFamily {
    pub id: String,
    pub dir: PathBuf,
    pub scene: SceneAnnotation,
    /// Absent gold makes every row of the item ungraded
    pub gold: Option<GoldRecord>,
    pub variants: Vec<VariantDescriptor>,
}

impl ItemFamily {
    /// Variants with their roles, base first, then descriptor order
    pub fn ordered_variants(&self) -> Vec<(VariantRole, &VariantDescriptor)> {
        let mut ordered: Vec<(VariantRole, &VariantDescriptor)> =
            assign_roles(&self.variants).into_iter().zip(&self.variants).collect();
        ordered.sort_by_key(|(role, _)| *role != VariantRole::Base);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants() -> Vec<VariantDescriptor> {
        load_variants_str(
            r#"[
            {"variant_id": "T1_img_only", "text_included": false, "image": "assets/figure.png"},
            {"variant_id": "T1_full_txtimg", "text_included": true, "image": "assets/figure.png"},
            {"variant_id": "T1_txt_only", "text_included": true, "image": null},
            {"variant_id": "T1_mark_removed", "expected_effect": "flip_or_invalidate", "decisive_symbol": "tangA"},
            {"variant_id": "T1_recolor", "expected_effect": "no_change"}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_roles() {
        let roles = assign_roles(&variants());
        assert_eq!(
            roles,
            vec![
                VariantRole::ImageOnly,
                VariantRole::Base,
                VariantRole::TextOnly,
                VariantRole::Decisive,
                VariantRole::Cosmetic,
            ]
        );
    }

    #[test]
    fn test_explicit_base_flag_wins() {
        let mut vs = variants();
        vs[4].base = true;
        assert_eq!(base_index(&vs), Some(4));
    }

    #[test]
    fn test_base_falls_back_to_first_without_effect() {
        let vs = vec![
            VariantDescriptor::new("a_mark_removed").with_effect(ExpectedEffect::FlipOrInvalidate),
            VariantDescriptor::new("a_plain"),
        ];
        assert_eq!(base_index(&vs), Some(1));
        let only_decisive = vec![VariantDescriptor::new("x").with_effect(ExpectedEffect::FlipOrInvalidate)];
        assert_eq!(base_index(&only_decisive), None);
    }

    #[test]
    fn test_image_null_versus_absent() {
        let vs = variants();
        assert_eq!(vs[2].image, Some(None));
        assert_eq!(vs[3].image, None);
    }

    #[test]
    fn test_ordered_variants_put_base_first() {
        let family = ItemFamily {
            id: "T1".to_string(),
            dir: PathBuf::from("items/T1"),
            scene: SceneAnnotation::default(),
            gold: None,
            variants: variants(),
        };
        let ordered = family.ordered_variants();
        assert_eq!(ordered[0].0, VariantRole::Base);
        assert_eq!(ordered[0].1.variant_id, "T1_full_txtimg");
        assert_eq!(ordered[1].1.variant_id, "T1_img_only");
        assert_eq!(ordered.len(), 5);
    }

    #[test]
    fn test_gold_tolerance() {
        let gold = load_gold_str(r#"{"gold": {"answer": {"value": 30, "tol": 0.5}}}"#).unwrap();
        let tol = gold.tolerance(0.01);
        assert!(tol.matches(30.5, 30.0));
        assert!(!tol.matches(30.6, 30.0));
    }

    #[test]
    fn test_null_tolerance_is_exact() {
        let gold = load_gold_str(r#"{"answer": {"value": 30, "tol": null}}"#).unwrap();
        assert_eq!(gold.answer.tol, None);
        assert_eq!(gold.answer.declared_tol(), 0.0);
        let tol = gold.tolerance(0.01);
        assert!(tol.matches(30.01, 30.0));
        assert!(!tol.matches(30.02, 30.0));
    }
}
