//! CSV output for evaluation rows

use std::io::Write;
use std::path::Path;

use crate::runner::EvaluationRow;

pub const CSV_HEADER: &str = "item,variant,role,status,correct,answer,precision,recall,f1,flags,consistency";

/// Write evaluation rows as a CSV report
pub struct CsvWriter;

impl CsvWriter {
    /// Write rows to a file, creating parent directories
    pub fn write_rows(path: impl AsRef<Path>, rows: &[EvaluationRow]) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        Self::write_to(&mut file, rows)?;
        file.flush()
    }

    pub fn write_to<W: Write>(out: &mut W, rows: &[EvaluationRow]) -> std::io::Result<()> {
        writeln!(out, "{}", CSV_HEADER)?;
        for row in rows {
            writeln!(out, "{}", format_row(row))?;
        }
        Ok(())
    }
}

/// One CSV line, without the newline
pub fn format_row(row: &EvaluationRow) -> String {
    let (correct, answer, precision, recall, f1) = if row.is_graded() {
        (
            (row.correct as u8).to_string(),
            row.answer.map(|a| a.display_value()).unwrap_or_default(),
            format!("{:.3}", row.score.precision),
            format!("{:.3}", row.score.recall),
            format!("{:.3}", row.score.f1),
        )
    } else {
        Default::default()
    };
    let flags: Vec<&str> = row.flags.iter().map(|f| f.as_str()).collect();

    [
        quote(&row.item),
        quote(&row.variant),
        row.role.as_str().to_string(),
        row.status.as_str().to_string(),
        correct,
        quote(&answer),
        precision,
        recall,
        f1,
        flags.join(";"),
        row.consistency.as_str().to_string(),
    ]
    .join(",")
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::VariantRole;
    use crate::runner::{Consistency, RowStatus};
    use figground::{ErrorCode, GradedAnswer, GroundingScore};

    fn graded_row() -> EvaluationRow {
        EvaluationRow {
            item: "T1".to_string(),
            variant: "T1_mark_removed".to_string(),
            role: VariantRole::Decisive,
            status: RowStatus::Graded,
            correct: true,
            answer: Some(GradedAnswer::Value(30.0)),
            score: GroundingScore {
                precision: 0.5,
                recall: 1.0,
                f1: 2.0 / 3.0,
                ..GroundingScore::default()
            },
            flags: vec![ErrorCode::GuessedRelation, ErrorCode::VisualScale],
            consistency: Consistency::Fail,
            note: None,
        }
    }

    #[test]
    fn test_graded_row() {
        assert_eq!(
            format_row(&graded_row()),
            "T1,T1_mark_removed,decisive,graded,1,30,0.500,1.000,0.667,GP;NS,fail"
        );
    }

    #[test]
    fn test_ungraded_row_leaves_metrics_empty() {
        let row = EvaluationRow::ungraded("T1", "T1_full_txtimg", VariantRole::Base, "missing response");
        assert_eq!(format_row(&row), "T1,T1_full_txtimg,base,ungraded,,,,,,,NA");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"x\""), "\"say \"\"x\"\"\"");
        assert_eq!(quote("plain"), "plain");
    }

    #[test]
    fn test_write_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.csv");
        CsvWriter::write_rows(&path, &[graded_row()]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert!(lines.next().unwrap().starts_with("T1,T1_mark_removed"));
        assert_eq!(lines.next(), None);
    }
}
