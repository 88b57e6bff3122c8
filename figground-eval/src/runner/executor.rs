//! Async executor running items concurrently

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::items::{discover_items, ItemPaths};

use super::item::evaluate_item;
use super::{ItemOutcome, RunResults};

/// Fatal run errors; nothing is written when one occurs
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Items directory not found: {}", .0.display())]
    ItemsDirMissing(PathBuf),

    #[error("No items found in {}", .0.display())]
    NoItems(PathBuf),

    #[error("Cannot read items directory: {0}")]
    Load(#[from] crate::items::LoadError),
}

/// Configuration for the executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum items evaluated at once
    pub parallel_items: usize,
    /// Added to every gold tolerance
    pub answer_epsilon: f64,
    /// Response file extensions, in order of preference
    pub response_extensions: Vec<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ExecutorConfig {
    fn from(config: &Config) -> Self {
        Self {
            parallel_items: config.parallel_items(),
            answer_epsilon: config.evaluation.answer_epsilon,
            response_extensions: config.evaluation.response_extensions.clone(),
        }
    }
}

/// Runs every item of a dataset against a directory of responses
#[derive(Clone)]
pub struct Evaluator {
    config: ExecutorConfig,
    semaphore: Arc<Semaphore>,
}

impl Evaluator {
    pub fn new(config: ExecutorConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.parallel_items.max(1)));
        Self { config, semaphore }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Evaluate one item on the blocking pool, holding a worker permit
    pub async fn evaluate(&self, paths: ItemPaths, responses_dir: PathBuf) -> ItemOutcome {
        let _permit = match self.semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                return ItemOutcome::Skipped {
                    item: paths.id,
                    reason: format!("executor closed: {}", e),
                }
            }
        };

        let id = paths.id.clone();
        let config = self.config.clone();
        let handle = tokio::task::spawn_blocking(move || {
            evaluate_item(&paths, &responses_dir, config.answer_epsilon, &config.response_extensions)
        });

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Item {} panicked: {}", id, e);
                ItemOutcome::Skipped {
                    item: id,
                    reason: format!("evaluation panicked: {}", e),
                }
            }
        }
    }

    /// Evaluate every item under `items_dir`.
    ///
    /// Items run in parallel; outcomes are merged once, in item-id order.
    pub async fn run(
        &self,
        items_dir: &Path,
        responses_dir: &Path,
        progress: Arc<dyn ProgressCallback>,
    ) -> Result<RunResults, EvalError> {
        if !items_dir.is_dir() {
            return Err(EvalError::ItemsDirMissing(items_dir.to_path_buf()));
        }
        let items = discover_items(items_dir)?;
        if items.is_empty() {
            return Err(EvalError::NoItems(items_dir.to_path_buf()));
        }
        if !responses_dir.is_dir() {
            tracing::warn!(
                "Responses directory {} not found; every row will be ungraded",
                responses_dir.display()
            );
        }

        let total = items.len();
        tracing::info!("Evaluating {} items with {} workers", total, self.config.parallel_items);

        let mut handles = Vec::with_capacity(total);
        for paths in items {
            let evaluator = self.clone();
            let progress = progress.clone();
            let responses_dir = responses_dir.to_path_buf();
            let id = paths.id.clone();

            let handle = tokio::spawn(async move {
                progress.on_item_start(&paths.id);
                let outcome = evaluator.evaluate(paths, responses_dir).await;
                progress.on_item_complete(&outcome);
                outcome
            });
            handles.push((id, handle));
        }

        let mut outcomes = Vec::with_capacity(total);
        for (completed, (id, handle)) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("Item execution panicked: {}", e);
                    outcomes.push(ItemOutcome::Skipped {
                        item: id,
                        reason: format!("evaluation panicked: {}", e),
                    });
                }
            }
            progress.on_progress(completed + 1, total);
        }

        outcomes.sort_by(|a, b| a.item().cmp(b.item()));
        Ok(RunResults { outcomes })
    }
}

/// Progress callback for tracking execution
pub trait ProgressCallback: Send + Sync {
    fn on_item_start(&self, item: &str);
    fn on_item_complete(&self, outcome: &ItemOutcome);
    fn on_progress(&self, completed: usize, total: usize);
}

/// Default no-op progress callback
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_item_start(&self, _item: &str) {}
    fn on_item_complete(&self, _outcome: &ItemOutcome) {}
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Console progress callback
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_item_start(&self, item: &str) {
        println!("  Starting {}...", item);
    }

    fn on_item_complete(&self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Evaluated { item, rows } => {
                let graded = rows.iter().filter(|r| r.is_graded()).count();
                println!("  OK {}: {}/{} variants graded", item, graded, rows.len());
            }
            ItemOutcome::Skipped { item, reason } => {
                println!("  SKIPPED {}: {}", item, reason);
            }
        }
    }

    fn on_progress(&self, completed: usize, total: usize) {
        println!("Progress: {}/{} items complete", completed, total);
    }
}
