//! Item discovery and loading from an items directory
//!
//! Layout: `<items_dir>/<ITEM>/<ITEM>.{pgdp,gold,variants}.json`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use figground::SceneAnnotation;

use super::{base_index, GoldRecord, ItemFamily, VariantDescriptor};

/// Error type for item loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Missing field: {0}")]
    MissingField(String),
}

/// Expected file locations of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPaths {
    pub id: String,
    pub dir: PathBuf,
    pub scene: PathBuf,
    pub gold: PathBuf,
    pub variants: PathBuf,
}

impl ItemPaths {
    pub fn new(items_dir: &Path, id: &str) -> Self {
        let dir = items_dir.join(id);
        Self {
            id: id.to_string(),
            scene: dir.join(format!("{}.pgdp.json", id)),
            gold: dir.join(format!("{}.gold.json", id)),
            variants: dir.join(format!("{}.variants.json", id)),
            dir,
        }
    }
}

/// Gold files come either wrapped in `{"gold": ...}` or bare
#[derive(Deserialize)]
#[serde(untagged)]
enum GoldFile {
    Wrapped { gold: GoldRecord },
    Bare(GoldRecord),
}

/// List every item directory, sorted by id
pub fn discover_items(items_dir: impl AsRef<Path>) -> Result<Vec<ItemPaths>, LoadError> {
    let items_dir = items_dir.as_ref();
    let mut items = Vec::new();

    for entry in std::fs::read_dir(items_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(id) = entry.file_name().to_str().map(String::from) else {
            tracing::warn!("Skipping non UTF-8 item directory {:?}", entry.path());
            continue;
        };
        if id.starts_with('.') {
            continue;
        }
        items.push(ItemPaths::new(items_dir, &id));
    }

    items.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(items)
}

fn read_required(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Parse a gold record
pub fn load_gold_str(content: &str) -> Result<GoldRecord, LoadError> {
    let file: GoldFile = serde_json::from_str(content)
        .map_err(|e| LoadError::Parse(format!("gold record: {}", e)))?;
    Ok(match file {
        GoldFile::Wrapped { gold } => gold,
        GoldFile::Bare(gold) => gold,
    })
}

/// Parse a variants list
pub fn load_variants_str(content: &str) -> Result<Vec<VariantDescriptor>, LoadError> {
    serde_json::from_str(content).map_err(|e| LoadError::Parse(format!("variants: {}", e)))
}

/// Load an item's files.
///
/// A missing gold file is tolerated (the item's rows become ungraded); a
/// missing scene or variants file, or a variants list with no resolvable
/// base, is an error for the item.
pub fn load_item(paths: &ItemPaths) -> Result<ItemFamily, LoadError> {
    let scene = SceneAnnotation::from_json_str(&read_required(&paths.scene)?)
        .map_err(|e| LoadError::Parse(format!("{}: {}", paths.scene.display(), e)))?;

    let variants = load_variants_str(&read_required(&paths.variants)?)?;
    if base_index(&variants).is_none() {
        return Err(LoadError::MissingField(format!("base variant in {}", paths.variants.display())));
    }

    let gold = if paths.gold.exists() {
        Some(load_gold_str(&std::fs::read_to_string(&paths.gold)?)?)
    } else {
        tracing::warn!("Item {} has no gold record; its rows will be ungraded", paths.id);
        None
    };

    Ok(ItemFamily {
        id: paths.id.clone(),
        dir: paths.dir.clone(),
        scene,
        gold,
        variants,
    })
}
