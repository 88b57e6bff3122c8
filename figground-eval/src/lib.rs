//! Figground evaluation harness
//!
//! Runs the grounding engine over a dataset of geometry items: loads scene
//! annotations, gold records and variant descriptors, reads each variant's
//! model response, and produces a per-variant report with aggregate metrics.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use figground_eval::{
//!     analysis::RunSummary,
//!     reporting::{print_console_report, CsvWriter},
//!     runner::{Evaluator, ExecutorConfig, NoOpProgress},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let evaluator = Evaluator::new(ExecutorConfig::default());
//!     let results = evaluator
//!         .run(Path::new("items"), Path::new("responses"), Arc::new(NoOpProgress))
//!         .await?;
//!
//!     let rows: Vec<_> = results.rows().cloned().collect();
//!     CsvWriter::write_rows("results.csv", &rows)?;
//!     print_console_report(&RunSummary::from_results(&results));
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod items;
pub mod reporting;
pub mod response;
pub mod runner;
pub mod validate;

pub use config::Config;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{ConsistencyRate, ModalitySensitivity, RunSummary};
    pub use crate::config::Config;
    pub use crate::items::{ItemFamily, ItemPaths, VariantDescriptor, VariantRole};
    pub use crate::reporting::{print_console_report, CsvWriter, JsonSummary};
    pub use crate::response::{load_response, ResponseError};
    pub use crate::runner::{
        Consistency, EvalError, EvaluationRow, Evaluator, ExecutorConfig, ItemOutcome, NoOpProgress, RowStatus,
        RunResults,
    };
    pub use crate::validate::{validate_dataset, ItemValidation, ValidationError};
}
