//! Turning raw provider text into a checked `Question`.
//!
//! The external model is asked for one JSON object, but replies often arrive
//! wrapped in markdown fencing or surrounded by prose. Parsing never panics:
//! every failure is a `ProviderError` and the caller falls back to a template
//! for that single item.

use chrono::Utc;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{label_index, split_choice_label, CorrectAnswer, Question, QuestionKind, CHOICE_LABELS};
use crate::error::{ProviderError, QuestionError};
use crate::util::trunc_for_log;

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence line and a trailing fence.
pub fn strip_fencing(raw: &str) -> &str {
  let s = raw.trim();
  let Some(rest) = s.strip_prefix("```") else {
    return s;
  };
  let body = match rest.find('\n') {
    Some(nl) => &rest[nl + 1..],
    None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
  };
  body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// First balanced `{...}` span. Braces inside JSON string literals are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (offset, ch) in text[start..].char_indices() {
    if in_string {
      match ch {
        _ if escaped => escaped = false,
        '\\' => escaped = true,
        '"' => in_string = false,
        _ => {}
      }
      continue;
    }
    match ch {
      '"' => in_string = true,
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return Some(&text[start..start + offset + 1]);
        }
      }
      _ => {}
    }
  }
  None
}

/// Parse raw provider output into a schema-checked question. A missing `id`
/// gets a fresh uuid and a missing `generatedAt` the current time.
pub fn parse_question(raw: &str) -> Result<Question, ProviderError> {
  if raw.trim().is_empty() {
    return Err(ProviderError::EmptyResponse);
  }
  let body = extract_json_object(strip_fencing(raw)).ok_or(ProviderError::NoJsonObject)?;
  debug!(target: "generator", body = %trunc_for_log(body, 200), "Provider JSON extracted");

  let mut value: Value = serde_json::from_str(body)?;
  if let Some(obj) = value.as_object_mut() {
    obj
      .entry("id")
      .or_insert_with(|| Value::String(format!("ai-{}", Uuid::new_v4())));
    obj
      .entry("generatedAt")
      .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
  }

  let mut question: Question = serde_json::from_value(value)?;
  normalize(&mut question);
  check_schema(&question)?;
  Ok(question)
}

/// Canonical forms for values models commonly send loosely: lowercase choice
/// letters and numbers quoted as strings.
fn normalize(q: &mut Question) {
  let normalized = match (&q.kind, &q.correct_answer) {
    (QuestionKind::Mcq, CorrectAnswer::Letter(l)) => Some(CorrectAnswer::Letter(l.trim().to_uppercase())),
    (QuestionKind::Numeric, CorrectAnswer::Letter(s)) => s.trim().parse::<f64>().ok().map(CorrectAnswer::Number),
    _ => None,
  };
  if let Some(answer) = normalized {
    q.correct_answer = answer;
  }
}

/// Structural checks shared by every question source.
pub fn check_schema(q: &Question) -> Result<(), QuestionError> {
  let violation = |reason: String| QuestionError::SchemaViolation { id: q.id.clone(), reason };

  if q.id.trim().is_empty() {
    return Err(violation("empty id".into()));
  }
  if q.prompt.trim().is_empty() {
    return Err(violation("empty prompt".into()));
  }

  match q.kind {
    QuestionKind::Mcq => {
      let choices = q.choices.as_ref().ok_or_else(|| violation("mcq without choices".into()))?;
      if choices.len() != CHOICE_LABELS.len() {
        return Err(violation(format!("expected 4 choices, found {}", choices.len())));
      }
      for (choice, expected) in choices.iter().zip(CHOICE_LABELS.iter()) {
        match split_choice_label(choice) {
          Some((label, _)) if label.eq_ignore_ascii_case(expected) => {}
          _ => return Err(violation(format!("choice {:?} is not labelled {}", choice, expected))),
        }
      }
      match &q.correct_answer {
        CorrectAnswer::Letter(l) if label_index(l).is_some() => {}
        other => return Err(violation(format!("mcq correctAnswer must be A-D, got {}", other))),
      }
    }
    QuestionKind::Numeric => {
      match q.correct_answer {
        CorrectAnswer::Number(n) if n.is_finite() && n != 0.0 => {}
        ref other => return Err(violation(format!("numeric correctAnswer must be a finite non-zero number, got {}", other))),
      }
      if let Some(t) = q.tolerance {
        if !(t.is_finite() && t > 0.0) {
          return Err(violation(format!("tolerance must be positive, got {}", t)));
        }
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Section;

  const MCQ_JSON: &str = r#"{
    "id": "ai-1",
    "section": "Dynamics",
    "difficulty": "easy",
    "type": "mcq",
    "prompt": "A 5 kg mass is pushed by a net force of 20 N. What is its acceleration?",
    "choices": ["A) 2 m/s²", "B) 4 m/s²", "C) 100 m/s²", "D) 0.25 m/s²"],
    "correctAnswer": "b",
    "solutionOutline": "F = ma → a = 20/5 = 4 m/s²",
    "explanationCorrect": "Newton's second law {F = ma}.",
    "explanationCommonWrong": ["Divided the wrong way", "Multiplied", "Inverted"],
    "tags": ["force", "acceleration"],
    "generatedAt": "2026-02-01T12:00:00Z"
  }"#;

  #[test]
  fn strips_json_and_plain_fences() {
    assert_eq!(strip_fencing("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    assert_eq!(strip_fencing("```\n{\"a\":1}\n```  "), "{\"a\":1}");
    assert_eq!(strip_fencing("  {\"a\":1} "), "{\"a\":1}");
  }

  #[test]
  fn extracts_first_balanced_object_ignoring_braces_in_strings() {
    let text = r#"Sure! {"a": "x } y", "b": {"c": "\"{"}} trailing {"d": 2}"#;
    assert_eq!(extract_json_object(text), Some(r#"{"a": "x } y", "b": {"c": "\"{"}}"#));
    assert_eq!(extract_json_object("no json here"), None);
    assert_eq!(extract_json_object("{\"open\": 1"), None);
  }

  #[test]
  fn parses_fenced_mcq_and_normalizes_letter() {
    let raw = format!("Here you go:\n```json\n{}\n```", MCQ_JSON);
    let q = parse_question(&raw).expect("parse");
    assert_eq!(q.id, "ai-1");
    assert_eq!(q.section, Section::Dynamics);
    assert_eq!(q.correct_answer, CorrectAnswer::Letter("B".into()));
    assert_eq!(q.explanation_correct, "Newton's second law {F = ma}.");
  }

  #[test]
  fn missing_id_and_timestamp_are_filled() {
    let raw = r#"{"section": "Statics", "difficulty": "hard", "type": "numeric",
      "prompt": "Find the reaction.", "correctAnswer": "12.5", "tolerance": 0.05,
      "acceptedUnits": ["kN"], "solutionOutline": "R = wL/2", "explanationCorrect": "Symmetry."}"#;
    let q = parse_question(raw).expect("parse");
    assert!(q.id.starts_with("ai-"));
    assert_eq!(q.correct_answer, CorrectAnswer::Number(12.5));
    assert!(q.explanation_common_wrong.is_empty());
  }

  #[test]
  fn empty_and_jsonless_responses_are_errors() {
    assert!(matches!(parse_question("   "), Err(ProviderError::EmptyResponse)));
    assert!(matches!(parse_question("I cannot help with that."), Err(ProviderError::NoJsonObject)));
    assert!(matches!(parse_question("{\"id\": 3}"), Err(ProviderError::Json(_))));
  }

  #[test]
  fn schema_violations_are_reported() {
    let three = MCQ_JSON.replace(r#", "D) 0.25 m/s²""#, "");
    assert!(matches!(
      parse_question(&three),
      Err(ProviderError::Schema(QuestionError::SchemaViolation { .. }))
    ));

    let bad_letter = MCQ_JSON.replace(r#""correctAnswer": "b""#, r#""correctAnswer": "E""#);
    assert!(matches!(parse_question(&bad_letter), Err(ProviderError::Schema(_))));

    let zero = r#"{"section": "Statics", "difficulty": "easy", "type": "numeric",
      "prompt": "p", "correctAnswer": 0, "solutionOutline": "s", "explanationCorrect": "e"}"#;
    assert!(matches!(parse_question(zero), Err(ProviderError::Schema(_))));
  }
}
