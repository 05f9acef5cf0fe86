//! Handbook compliance validator.
//!
//! Heuristic checks approximating the FE style guide. Errors make a question
//! invalid and the caller drops it; warnings and suggestions are only logged.
//! Validation is a pure function of (question, level).

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Difficulty, Question, QuestionKind};
use crate::handbook::{first_n, handbook_entry, is_formula_in_handbook};
use crate::util::word_count;

/// Upper bound on the estimated solve time, in seconds.
pub const MAX_SOLVE_SECONDS: u32 = 240;

const COMPLEXITY_SIGNALS: [&str; 6] = ["derive", "prove", "multiple", "complex", "advanced", "iterative"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
  /// Also require a recognizable handbook formula in the solution.
  Strict,
  Moderate,
  Relaxed,
}

impl Default for ValidationLevel {
  fn default() -> Self { ValidationLevel::Moderate }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
  pub is_valid: bool,
  pub level: ValidationLevel,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
  pub suggestions: Vec<String>,
  pub handbook_references: Vec<String>,
}

impl ValidationResult {
  fn new(level: ValidationLevel) -> Self {
    Self {
      is_valid: true,
      level,
      errors: vec![],
      warnings: vec![],
      suggestions: vec![],
      handbook_references: vec![],
    }
  }

  fn error(&mut self, msg: String) {
    self.errors.push(msg);
    self.is_valid = false;
  }

  pub fn has_notes(&self) -> bool {
    !self.errors.is_empty() || !self.warnings.is_empty() || !self.suggestions.is_empty()
  }
}

#[instrument(level = "debug", skip(question), fields(id = %question.id, section = %question.section))]
pub fn validate(question: &Question, level: ValidationLevel) -> ValidationResult {
  let mut result = ValidationResult::new(level);

  let Some(entry) = handbook_entry(&question.section) else {
    result.error(format!("Section \"{}\" not found in handbook", question.section));
    return result;
  };

  let prompt_lower = question.prompt.to_lowercase();
  let found: Vec<&str> = entry
    .keywords
    .iter()
    .copied()
    .filter(|k| prompt_lower.contains(&k.to_lowercase()))
    .collect();
  if found.is_empty() {
    result.warnings.push(format!(
      "No handbook keywords found in prompt. Expected keywords: {}",
      first_n(entry.keywords, 5)
    ));
  } else {
    result.handbook_references.push(format!("Keywords: {}", found.join(", ")));
  }

  if !has_formula_reference(&question.solution_outline) {
    result.warnings.push("Solution outline should reference handbook formulas or equations".into());
  }

  if level == ValidationLevel::Strict && !cites_handbook_formula(question) {
    result.warnings.push(format!(
      "Solution outline does not cite a {} handbook formula",
      question.section
    ));
  }

  let tag_overlap = question.tags.iter().any(|tag| {
    let tag = tag.to_lowercase();
    entry.keywords.iter().any(|k| tag.contains(&k.to_lowercase()))
  });
  if !tag_overlap {
    result.suggestions.push(format!("Add tags related to: {}", first_n(entry.keywords, 3)));
  }

  let seconds = estimate_solve_seconds(question);
  if seconds > MAX_SOLVE_SECONDS {
    result.error(format!(
      "Estimated solve time ({} min) exceeds 4-minute limit",
      (seconds as f64 / 60.0).round()
    ));
  }

  match question.kind {
    QuestionKind::Mcq => {
      let n = question.choices.as_ref().map(|c| c.len()).unwrap_or(0);
      if n != 4 {
        result.error(format!("MCQ must have exactly 4 choices, found {}", n));
      }
      if question.explanation_common_wrong.len() < 3 {
        result.warnings.push("MCQ should explain why each wrong answer is a common mistake".into());
      }
    }
    QuestionKind::Numeric => {
      if question.tolerance.is_none() {
        result.warnings.push("Numeric question should specify tolerance (typically ±5%)".into());
      }
      if question.accepted_units.as_ref().map_or(true, |u| u.is_empty()) {
        result.warnings.push("Numeric question should specify accepted units".into());
      }
    }
  }

  debug!(target: "validator", is_valid = result.is_valid, errors = result.errors.len(), warnings = result.warnings.len(), "Question validated");
  result
}

/// Deterministic solve-time estimate in seconds.
pub fn estimate_solve_seconds(question: &Question) -> u32 {
  let mut secs = 120;

  let words = word_count(&question.prompt);
  if words > 100 { secs += 60; }
  if words > 150 { secs += 60; }

  match question.difficulty {
    Difficulty::Easy => {}
    Difficulty::Medium => secs += 30,
    Difficulty::Hard => secs += 60,
  }

  if question.kind == QuestionKind::Numeric { secs += 30; }

  let prompt = question.prompt.to_lowercase();
  if COMPLEXITY_SIGNALS.iter().any(|w| prompt.contains(w)) {
    secs += 60;
  }
  secs
}

fn has_formula_reference(outline: &str) -> bool {
  let lower = outline.to_lowercase();
  lower.contains("equation")
    || lower.contains("formula")
    || lower.contains("handbook")
    || outline.chars().any(|c| matches!(c, '=' | '+' | '-' | '*' | '/' | '^' | '(' | ')'))
}

fn cites_handbook_formula(question: &Question) -> bool {
  question
    .solution_outline
    .split(|c| c == '\n' || c == '→' || c == ';')
    .any(|step| is_formula_in_handbook(step, &question.section))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{CorrectAnswer, Section};
  use chrono::Utc;

  fn numeric(prompt: &str, difficulty: Difficulty) -> Question {
    Question {
      id: "t-1".into(),
      section: Section::Statics,
      difficulty,
      kind: QuestionKind::Numeric,
      prompt: prompt.into(),
      choices: None,
      correct_answer: CorrectAnswer::Number(50.0),
      tolerance: Some(0.05),
      accepted_units: Some(vec!["N".into()]),
      solution_outline: "F_y = F sin(θ) = 100 × 0.5 = 50 N".into(),
      explanation_correct: "Use sin for the vertical component.".into(),
      explanation_common_wrong: vec!["Using cos instead of sin".into()],
      tags: vec!["force-resolution".into()],
      generated_at: Utc::now(),
    }
  }

  fn mcq() -> Question {
    Question {
      id: "t-2".into(),
      section: Section::Dynamics,
      difficulty: Difficulty::Easy,
      kind: QuestionKind::Mcq,
      prompt: "An object with mass 5 kg experiences a net force of 20 N. What is its acceleration?".into(),
      choices: Some(vec!["A) 2 m/s²".into(), "B) 4 m/s²".into(), "C) 100 m/s²".into(), "D) 0.25 m/s²".into()]),
      correct_answer: CorrectAnswer::Letter("B".into()),
      tolerance: None,
      accepted_units: None,
      solution_outline: "F = ma → a = F/m = 20 / 5 = 4 m/s²".into(),
      explanation_correct: "Newton's second law.".into(),
      explanation_common_wrong: vec!["a".into(), "b".into(), "c".into(), "d".into()],
      tags: vec!["kinematics".into()],
      generated_at: Utc::now(),
    }
  }

  #[test]
  fn well_formed_mcq_is_valid_without_notes() {
    let r = validate(&mcq(), ValidationLevel::Moderate);
    assert!(r.is_valid, "{r:?}");
    assert!(r.errors.is_empty() && r.warnings.is_empty() && r.suggestions.is_empty(), "{r:?}");
    assert_eq!(r.handbook_references, vec!["Keywords: acceleration, force, mass".to_string()]);
  }

  #[test]
  fn long_hard_numeric_prompt_exceeds_solve_ceiling() {
    let prompt = vec!["force"; 160].join(" ");
    let q = numeric(&prompt, Difficulty::Hard);
    // 120 + 60 + 60 (length) + 60 (hard) + 30 (numeric)
    assert_eq!(estimate_solve_seconds(&q), 330);
    let r = validate(&q, ValidationLevel::Moderate);
    assert!(!r.is_valid);
    assert!(r.errors[0].contains("exceeds 4-minute limit"), "{:?}", r.errors);
  }

  #[test]
  fn complexity_words_add_a_minute() {
    let q = numeric("Derive the resultant force on the truss joint.", Difficulty::Medium);
    assert_eq!(estimate_solve_seconds(&q), 120 + 30 + 30 + 60);
    assert!(validate(&q, ValidationLevel::Moderate).is_valid);
  }

  #[test]
  fn unknown_section_is_an_error() {
    let mut q = mcq();
    q.section = Section::Unknown("Power Systems".into());
    let r = validate(&q, ValidationLevel::Relaxed);
    assert!(!r.is_valid);
    assert_eq!(r.errors, vec!["Section \"Power Systems\" not found in handbook".to_string()]);
  }

  #[test]
  fn mcq_needs_four_choices_and_distractor_notes() {
    let mut q = mcq();
    q.choices = Some(vec!["A) 1".into(), "B) 2".into(), "C) 3".into()]);
    q.explanation_common_wrong.truncate(2);
    let r = validate(&q, ValidationLevel::Moderate);
    assert!(!r.is_valid);
    assert!(r.errors.iter().any(|e| e.contains("found 3")));
    assert!(r.warnings.iter().any(|w| w.contains("each wrong answer")));
  }

  #[test]
  fn numeric_without_tolerance_or_units_only_warns() {
    let mut q = numeric("A 100 N force acts at 30° above the horizontal. What is the vertical component?", Difficulty::Easy);
    q.tolerance = None;
    q.accepted_units = Some(vec![]);
    let r = validate(&q, ValidationLevel::Moderate);
    assert!(r.is_valid);
    assert_eq!(r.warnings.len(), 2, "{:?}", r.warnings);
  }

  #[test]
  fn missing_keywords_formula_and_tags_are_reported() {
    let mut q = numeric("What is the answer?", Difficulty::Easy);
    q.solution_outline = "Look it up".into();
    q.tags = vec!["misc".into()];
    let r = validate(&q, ValidationLevel::Moderate);
    assert!(r.is_valid);
    assert!(r.warnings.iter().any(|w| w.starts_with("No handbook keywords")));
    assert!(r.warnings.iter().any(|w| w.contains("formulas or equations")));
    assert_eq!(r.suggestions.len(), 1);
  }

  #[test]
  fn strict_level_wants_a_handbook_formula() {
    let mut q = mcq();
    q.solution_outline = "a = 20 / 5 = 4".into();
    assert!(validate(&q, ValidationLevel::Moderate).warnings.is_empty());
    let strict = validate(&q, ValidationLevel::Strict);
    assert!(strict.is_valid);
    assert!(strict.warnings.iter().any(|w| w.contains("handbook formula")));
  }

  #[test]
  fn revalidation_is_idempotent() {
    let q = numeric("What is the answer?", Difficulty::Hard);
    assert_eq!(validate(&q, ValidationLevel::Moderate), validate(&q, ValidationLevel::Moderate));
  }
}
