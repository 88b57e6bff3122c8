//! Aggregation of evaluation rows

pub mod sensitivity;
pub mod summary;

pub use sensitivity::{modality_sensitivity, ModalitySensitivity};
pub use summary::{ConsistencyRate, RunSummary, SkippedItem};
