//! Error taxonomy for question generation. Grading has no error type: malformed
//! answers degrade to "incorrect".

use thiserror::Error;

/// Why a single question was discarded.
#[derive(Debug, Error, PartialEq)]
pub enum QuestionError {
  #[error("schema violation in {id}: {reason}")]
  SchemaViolation { id: String, reason: String },
  #[error("compliance failure in {id}: {}", errors.join("; "))]
  ComplianceFailure { id: String, errors: Vec<String> },
}

/// Why a provider response could not be turned into a question.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("provider returned an empty response")]
  EmptyResponse,
  #[error("no JSON object found in provider response")]
  NoJsonObject,
  #[error("provider JSON did not parse as a question: {0}")]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Schema(#[from] QuestionError),
  #[error("provider call failed: {0}")]
  Call(String),
}

/// Caller-visible failures of quiz generation.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
  #[error("invalid request: {0}")]
  InvalidRequest(String),
  #[error("no questions could be generated for the requested sections")]
  Empty,
  #[error("all {generated} generated questions failed validation")]
  NoValidQuestions { generated: usize },
}

/// Failure to load the TOML configuration file. Logged at startup; defaults
/// are used instead.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read { path: String, source: std::io::Error },
  #[error("failed to parse {path}: {source}")]
  Parse { path: String, source: toml::de::Error },
}
