//! Model response loading
//!
//! Responses follow one output contract in two encodings: a JSON object, or
//! plain text with a `FINAL_ANSWER:` line and bulleted sections.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use figground::ResponseClaims;

/// Errors reading a response file that exists
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON response: {0}")]
    Json(String),

    #[error("Response has no final answer")]
    MissingFinalAnswer,

    #[error("Unsupported response extension: {0}")]
    UnsupportedFormat(String),
}

/// First existing `<responses_dir>/<variant_id>.<ext>` in extension order
pub fn find_response(responses_dir: &Path, variant_id: &str, extensions: &[String]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| responses_dir.join(format!("{}.{}", variant_id, ext.trim_start_matches('.'))))
        .find(|path| path.is_file())
}

/// Load a response, picking the parser by file extension
pub fn load_response(path: &Path) -> Result<ResponseClaims, ResponseError> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "json" => parse_json_response(&content),
        "txt" | "md" => parse_text_response(&content),
        other => Err(ResponseError::UnsupportedFormat(other.to_string())),
    }
}

#[derive(Deserialize)]
struct JsonResponse {
    final_answer: Option<serde_json::Value>,
    #[serde(default)]
    figure_facts_used: Vec<String>,
    #[serde(default)]
    text_givens_used: Vec<String>,
    #[serde(default)]
    assumptions: Vec<String>,
    #[serde(default, alias = "reasoning")]
    explanation: Option<String>,
}

fn without_none(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
        .collect()
}

/// Parse the JSON contract
pub fn parse_json_response(content: &str) -> Result<ResponseClaims, ResponseError> {
    let raw: JsonResponse = serde_json::from_str(content).map_err(|e| ResponseError::Json(e.to_string()))?;
    let final_answer = match raw.final_answer {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Err(ResponseError::MissingFinalAnswer),
    };
    Ok(ResponseClaims {
        final_answer,
        figure_facts_used: without_none(raw.figure_facts_used),
        text_givens_used: without_none(raw.text_givens_used),
        assumptions: without_none(raw.assumptions),
        explanation: raw.explanation.unwrap_or_default(),
    })
}

/// Section header, tolerating Markdown emphasis and heading marks
fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[#*\s]*(final[_ ]answer|figure_facts_used|text_givens_used|assumptions)[*\s]*:[*\s]*(.*?)[*\s]*$")
            .expect("valid regex")
    })
}

#[derive(Clone, Copy)]
enum Section {
    Prose,
    FigureFacts,
    TextGivens,
    Assumptions,
}

/// Parse the plain-text contract
pub fn parse_text_response(content: &str) -> Result<ResponseClaims, ResponseError> {
    let mut claims = ResponseClaims::default();
    let mut final_answer = None;
    let mut prose = Vec::new();
    let mut section = Section::Prose;

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(caps) = header_re().captures(trimmed) {
            let name = caps[1].to_lowercase().replace(' ', "_");
            section = match name.as_str() {
                "final_answer" => {
                    if final_answer.is_none() {
                        final_answer = Some(caps[2].to_string());
                    }
                    Section::Prose
                }
                "figure_facts_used" => Section::FigureFacts,
                "text_givens_used" => Section::TextGivens,
                _ => Section::Assumptions,
            };
            continue;
        }

        let item = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
            .or_else(|| trimmed.strip_prefix("• "));
        match (section, item) {
            (Section::FigureFacts, Some(item)) => claims.figure_facts_used.push(item.to_string()),
            (Section::TextGivens, Some(item)) => claims.text_givens_used.push(item.to_string()),
            (Section::Assumptions, Some(item)) => claims.assumptions.push(item.to_string()),
            _ if trimmed.is_empty() => {}
            _ => {
                section = Section::Prose;
                prose.push(trimmed.to_string());
            }
        }
    }

    claims.final_answer = final_answer.ok_or(ResponseError::MissingFinalAnswer)?;
    claims.figure_facts_used = without_none(claims.figure_facts_used);
    claims.text_givens_used = without_none(claims.text_givens_used);
    claims.assumptions = without_none(claims.assumptions);
    claims.explanation = prose.join("\n");
    Ok(claims)
}
