//! Configuration management for the evaluation harness
//!
//! Loads settings from TOML files and provides runtime access.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use figground::DEFAULT_ANSWER_EPSILON;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Grading and execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Added to every gold tolerance
    #[serde(default = "default_answer_epsilon")]
    pub answer_epsilon: f64,
    /// Items evaluated concurrently
    #[serde(default = "default_parallel_items")]
    pub parallel_items: usize,
    /// Response file extensions, in order of preference
    #[serde(default = "default_response_extensions")]
    pub response_extensions: Vec<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            answer_epsilon: default_answer_epsilon(),
            parallel_items: default_parallel_items(),
            response_extensions: default_response_extensions(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default = "default_true")]
    pub write_json_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            report_file: default_report_file(),
            write_json_summary: true,
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_answer_epsilon() -> f64 { DEFAULT_ANSWER_EPSILON }
fn default_parallel_items() -> usize { 4 }
fn default_response_extensions() -> Vec<String> { vec!["json".to_string(), "txt".to_string()] }
fn default_output_dir() -> String { "results/runs".to_string() }
fn default_report_file() -> String { "results.csv".to_string() }

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = [
            "config/figground.toml",
            "../config/figground.toml",
        ];

        for path in &config_paths {
            if let Ok(config) = Self::from_file(path) {
                tracing::info!("Loaded configuration from {}", path);
                return config;
            }
        }

        tracing::debug!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Worker count, never below one
    pub fn parallel_items(&self) -> usize {
        self.evaluation.parallel_items.max(1)
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.evaluation.answer_epsilon, 0.01);
        assert_eq!(config.evaluation.parallel_items, 4);
        assert_eq!(config.evaluation.response_extensions, vec!["json", "txt"]);
        assert_eq!(config.output.report_file, "results.csv");
        assert!(config.output.write_json_summary);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[evaluation]
answer_epsilon = 0.5
parallel_items = 2

[output]
output_dir = "out"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.evaluation.answer_epsilon, 0.5);
        assert_eq!(config.parallel_items(), 2);
        assert_eq!(config.evaluation.response_extensions, vec!["json", "txt"]);
        assert_eq!(config.output.output_dir, "out");
        assert_eq!(config.output.report_file, "results.csv");
    }

    #[test]
    fn test_zero_workers_clamped() {
        let config = Config::from_toml("[evaluation]\nparallel_items = 0\n").unwrap();
        assert_eq!(config.parallel_items(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[evaluation\nbroken"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figground.toml");
        Config::default().save_toml(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.output.output_dir, "results/runs");
    }
}
