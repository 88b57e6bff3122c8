//! Dataset sanity checks
//!
//! Unlike a run, validation keeps going after the first problem so that one
//! pass reports everything wrong with an item.

use std::collections::HashSet;
use std::path::Path;

use figground::{ExpectedEffect, SceneAnnotation, SceneError};

use crate::items::{base_index, discover_items, load_gold_str, load_variants_str, ItemPaths, LoadError};
use crate::runner::EvalError;

/// A problem found in one item
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("scene annotation: {0}")]
    Scene(#[from] SceneError),

    #[error("gold answer is not a finite number")]
    NonFiniteAnswer,

    #[error("gold tolerance {0} is negative or not finite")]
    InvalidTolerance(f64),

    #[error("variant {variant} references unknown mark '{mark}'")]
    UnknownMark { variant: String, mark: String },

    #[error("duplicate variant id '{0}'")]
    DuplicateVariant(String),

    #[error("no base variant can be resolved")]
    NoBase,

    #[error("{0} variants are flagged as base")]
    MultipleBases(usize),

    #[error("decisive variant {0} does not name its decisive symbol")]
    MissingDecisiveSymbol(String),
}

/// Validation outcome of one item
#[derive(Debug)]
pub struct ItemValidation {
    pub item: String,
    pub errors: Vec<ValidationError>,
}

impl ItemValidation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Run every check on one item
pub fn validate_item(paths: &ItemPaths) -> ItemValidation {
    let mut errors = Vec::new();

    let scene = match read(&paths.scene).and_then(|content| {
        SceneAnnotation::from_json_str(&content).map_err(|e| LoadError::Parse(e.to_string()))
    }) {
        Ok(scene) => {
            if let Err(e) = scene.validate() {
                errors.push(ValidationError::Scene(e));
            }
            Some(scene)
        }
        Err(e) => {
            errors.push(e.into());
            None
        }
    };

    match read(&paths.gold).and_then(|content| load_gold_str(&content)) {
        Ok(gold) => {
            if !gold.answer.value.is_finite() {
                errors.push(ValidationError::NonFiniteAnswer);
            }
            if let Some(tol) = gold.answer.tol.filter(|t| !(t.is_finite() && *t >= 0.0)) {
                errors.push(ValidationError::InvalidTolerance(tol));
            }
        }
        Err(e) => errors.push(e.into()),
    }

    let variants = match read(&paths.variants).and_then(|content| load_variants_str(&content)) {
        Ok(variants) => variants,
        Err(e) => {
            errors.push(e.into());
            return ItemValidation {
                item: paths.id.clone(),
                errors,
            };
        }
    };

    let mut seen = HashSet::new();
    for variant in &variants {
        if !seen.insert(variant.variant_id.as_str()) {
            errors.push(ValidationError::DuplicateVariant(variant.variant_id.clone()));
        }
    }

    let flagged = variants.iter().filter(|v| v.base).count();
    if flagged > 1 {
        errors.push(ValidationError::MultipleBases(flagged));
    } else if base_index(&variants).is_none() {
        errors.push(ValidationError::NoBase);
    }

    for variant in &variants {
        if variant.expected_effect == Some(ExpectedEffect::FlipOrInvalidate) && variant.decisive_symbol.is_none() {
            errors.push(ValidationError::MissingDecisiveSymbol(variant.variant_id.clone()));
        }
    }

    if let Some(scene) = &scene {
        let marks: HashSet<&str> = scene
            .symbols
            .iter()
            .map(|s| s.id.as_str())
            .chain(scene.texts.iter().map(|t| t.id.as_str()))
            .collect();
        for variant in &variants {
            for mark in variant.decisive_symbol.iter().chain(&variant.mark_removed) {
                if !marks.contains(mark.as_str()) {
                    errors.push(ValidationError::UnknownMark {
                        variant: variant.variant_id.clone(),
                        mark: mark.clone(),
                    });
                }
            }
        }
    }

    ItemValidation {
        item: paths.id.clone(),
        errors,
    }
}

/// Validate every item under `items_dir`
pub fn validate_dataset(items_dir: &Path) -> Result<Vec<ItemValidation>, EvalError> {
    if !items_dir.is_dir() {
        return Err(EvalError::ItemsDirMissing(items_dir.to_path_buf()));
    }
    let items = discover_items(items_dir)?;
    if items.is_empty() {
        return Err(EvalError::NoItems(items_dir.to_path_buf()));
    }
    Ok(items.iter().map(validate_item).collect())
}
