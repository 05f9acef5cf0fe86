//! Loading quiz configuration (provider prompts + generation settings) from TOML.
//!
//! See `QuizConfig`, `Prompts` and `GenerationCfg` for the expected schema.
//! Every table and key is optional; missing values fall back to defaults.

use serde::Deserialize;
use tracing::{error, info};

use crate::error::ConfigError;
use crate::pool::DEFAULT_POOL_SIZE;
use crate::validator::ValidationLevel;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationCfg,
}

/// Prompts sent to the external question provider.
///
/// `question_user_template` placeholders: `{kind}`, `{section}`,
/// `{difficulty}` and `{handbook_context}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub question_system: String,
  pub question_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      question_system: "You are an NCEES-style exam item developer writing practice questions for the FE (Other Disciplines) exam. \
Every question must be solvable in 2 to 4 minutes with formulas from the FE Reference Handbook, test one core concept, and use concise technical wording. \
Multiple-choice items have exactly 4 options labelled \"A) \" to \"D) \" with one correct answer; every distractor must come from a common FE mistake \
(unit conversion, sign error, diameter instead of radius, forgotten factor such as g or 1/2, order of magnitude). \
Numeric items give a finite non-zero answer, a relative tolerance (typically 0.05) and accepted units. \
Return ONLY one JSON object with fields: id, section, difficulty, type (\"mcq\"|\"numeric\"), prompt, choices (mcq only), \
correctAnswer (letter for mcq, number for numeric), tolerance, acceptedUnits, solutionOutline, explanationCorrect, \
explanationCommonWrong, tags, generatedAt.".into(),
      question_user_template: "Generate a {kind} FE exam question for the \"{section}\" section at \"{difficulty}\" difficulty level.{handbook_context}\n\nReturn ONLY the JSON object with no markdown or extra text.".into(),
    }
  }
}

/// Generation knobs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationCfg {
  /// Candidates built per section before sampling.
  pub pool_size: usize,
  /// Level used when filtering assembled questions.
  pub validation_level: ValidationLevel,
  /// Share of MCQ items on the provider path when the request does not say.
  pub mcq_fraction: f64,
  /// Minutes allowed in timed mode.
  pub exam_time_limit: u32,
  /// Largest accepted question count per request.
  pub max_count: usize,
  /// Provider requests in flight at once for one quiz.
  pub provider_concurrency: usize,
}

impl Default for GenerationCfg {
  fn default() -> Self {
    Self {
      pool_size: DEFAULT_POOL_SIZE,
      validation_level: ValidationLevel::Moderate,
      mcq_fraction: 0.8,
      exam_time_limit: 360,
      max_count: 110,
      provider_concurrency: 8,
    }
  }
}

pub fn load_quiz_config(path: &str) -> Result<QuizConfig, ConfigError> {
  let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
  toml::from_str::<QuizConfig>(&text).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any IO/parse error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match load_quiz_config(&path) {
    Ok(cfg) => {
      info!(target: "fe_practice", %path, pool_size = cfg.generation.pool_size, "Loaded quiz config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: "fe_practice", %path, error = %e, "Failed to load TOML config; using defaults");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults() {
    let cfg: QuizConfig = toml::from_str(
      r#"
      [generation]
      pool_size = 24
      validation_level = "strict"
      "#,
    )
    .expect("parse");
    assert_eq!(cfg.generation.pool_size, 24);
    assert_eq!(cfg.generation.validation_level, ValidationLevel::Strict);
    assert_eq!(cfg.generation.exam_time_limit, 360);
    assert_eq!(cfg.generation.provider_concurrency, 8);
    assert!(cfg.prompts.question_user_template.contains("{handbook_context}"));
  }

  #[test]
  fn prompts_can_be_overridden() {
    let cfg: QuizConfig = toml::from_str(
      r#"
      [prompts]
      question_system = "Be brief."
      "#,
    )
    .expect("parse");
    assert_eq!(cfg.prompts.question_system, "Be brief.");
    assert!(cfg.prompts.question_user_template.starts_with("Generate a {kind}"));
  }

  #[test]
  fn missing_file_is_a_read_error() {
    let err = load_quiz_config("/nonexistent/quiz.toml").expect_err("should fail");
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
