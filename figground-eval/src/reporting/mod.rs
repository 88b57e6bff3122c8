//! Results reporting

pub mod csv_writer;

pub use csv_writer::{format_row, CsvWriter, CSV_HEADER};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::RunSummary;

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub items_dir: String,
    pub responses_dir: String,
    pub answer_epsilon: f64,
    pub detailed_results_file: String,
    pub summary: RunSummary,
}

impl JsonSummary {
    pub fn new(
        run_id: impl Into<String>,
        items_dir: &Path,
        responses_dir: &Path,
        answer_epsilon: f64,
        detailed_file: impl Into<String>,
        summary: RunSummary,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            items_dir: items_dir.display().to_string(),
            responses_dir: responses_dir.display().to_string(),
            answer_epsilon,
            detailed_results_file: detailed_file.into(),
            summary,
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

fn format_delta(delta: Option<i32>) -> String {
    delta.map(|d| format!("{:+}", d)).unwrap_or_else(|| "-".to_string())
}

/// Generate a console report
pub fn print_console_report(summary: &RunSummary) {
    println!("\n=== Figure Grounding Results ===\n");
    println!(
        "Items: {} ({} evaluated, {} skipped)",
        summary.total_items,
        summary.evaluated_items,
        summary.skipped.len()
    );
    println!(
        "Rows: {} ({} graded, {} ungraded)\n",
        summary.total_rows, summary.graded_rows, summary.ungraded_rows
    );

    println!("Answers and Grounding:");
    println!("{:-<50}", "");
    println!(
        "  Accuracy: {:.3} ({}/{})",
        summary.accuracy, summary.correct_rows, summary.graded_rows
    );
    println!(
        "  Mean Precision: {:.3}, Recall: {:.3}, F1: {:.3}",
        summary.mean_precision, summary.mean_recall, summary.mean_f1
    );

    println!("\nError Flags:");
    println!("{:-<50}", "");
    for (code, count) in &summary.flag_counts {
        println!("  {}: {}", code, count);
    }

    println!("\nContrastive Consistency:");
    println!("{:-<50}", "");
    for (label, rate) in [
        ("Decisive", &summary.decisive_consistency),
        ("Cosmetic", &summary.cosmetic_consistency),
    ] {
        if rate.checked == 0 {
            println!("  {}: n/a", label);
        } else {
            println!("  {}: {:.3} ({}/{})", label, rate.rate, rate.passed, rate.checked);
        }
    }

    if !summary.modality_sensitivity.is_empty() {
        println!("\nModality Sensitivity (vs base):");
        println!("{:-<50}", "");
        for s in &summary.modality_sensitivity {
            println!(
                "  {}: image-only {}, text-only {}",
                s.item,
                format_delta(s.image_only_delta),
                format_delta(s.text_only_delta)
            );
        }
    }

    if !summary.skipped.is_empty() {
        println!("\nSkipped Items:");
        println!("{:-<50}", "");
        for skipped in &summary.skipped {
            println!("  {}: {}", skipped.item, skipped.reason);
        }
    }

    println!("\n{:=<50}", "");
}
