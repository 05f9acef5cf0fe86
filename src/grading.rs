//! Grading engine: answer matching, explanation synthesis and score aggregation.
//!
//! Grading never fails. Anything that cannot be interpreted (a non-numeric
//! value for a numeric item, a letter outside A-D, an unknown question id) is
//! simply graded incorrect.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
  label_index, AnswerValue, Attempt, CorrectAnswer, GradedAnswer, Mode, Question, QuestionKind, Section, UserAnswer,
};

/// Relative tolerance applied when a numeric item does not carry one.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// A graded answer together with the section of the question it answered.
#[derive(Clone, Debug, Serialize)]
pub struct GradedItem {
  #[serde(flatten)]
  pub answer: GradedAnswer,
  pub section: String,
}

pub fn grade(answer: &AnswerValue, question: &Question) -> bool {
  match question.kind {
    QuestionKind::Mcq => {
      let expected = question.correct_answer.to_string();
      answer.as_text().trim().to_uppercase() == expected.trim().to_uppercase()
    }
    QuestionKind::Numeric => {
      let correct = match &question.correct_answer {
        CorrectAnswer::Number(n) => Some(*n),
        CorrectAnswer::Letter(s) => s.trim().parse::<f64>().ok(),
      };
      match (answer.as_f64(), correct) {
        (Some(user), Some(correct)) => within_tolerance(user, correct, tolerance_of(question)),
        _ => false,
      }
    }
  }
}

pub(crate) fn tolerance_of(question: &Question) -> f64 {
  question.tolerance.filter(|t| t.is_finite() && *t > 0.0).unwrap_or(DEFAULT_TOLERANCE)
}

/// `|user - correct| / |correct| <= tolerance`. A zero or non-finite canonical
/// value cannot be matched relatively and always fails.
pub fn within_tolerance(user: f64, correct: f64, tolerance: f64) -> bool {
  if !user.is_finite() || !correct.is_finite() || correct == 0.0 {
    return false;
  }
  (user - correct).abs() / correct.abs() <= tolerance
}

pub fn explain(answer: &AnswerValue, question: &Question, is_correct: bool) -> String {
  if is_correct {
    return format!(
      "✓ CORRECT\n\n{}\n\nSolution:\n{}",
      question.explanation_correct, question.solution_outline
    );
  }

  let mut out = format!(
    "✗ INCORRECT\n\nYour answer: {}\nCorrect answer: {}\n\n",
    answer, question.correct_answer
  );

  match question.kind {
    QuestionKind::Mcq => {
      out.push_str("Why your choice was wrong:\n");
      let picked = label_index(&answer.as_text());
      if let Some(why) = picked.and_then(|i| question.explanation_common_wrong.get(i)).filter(|w| !w.is_empty()) {
        out.push_str(why);
        out.push_str("\n\n");
      }
      out.push_str(&format!(
        "Why the correct answer ({}) is right:\n{}\n\n",
        question.correct_answer, question.explanation_correct
      ));
    }
    QuestionKind::Numeric => {
      out.push_str("Why this is incorrect:\n");
      if let Some(mistake) = question.explanation_common_wrong.first().filter(|w| !w.is_empty()) {
        out.push_str(mistake);
        out.push_str("\n\n");
      }
      out.push_str(&format!("Correct approach:\n{}\n\n", question.explanation_correct));
    }
  }

  out.push_str("Solution Steps:\n");
  out.push_str(&question.solution_outline);
  out
}

/// `round(100 * correct / total)`, 0 when nothing was attempted.
pub fn percent(correct: usize, total: usize) -> u32 {
  if total == 0 {
    return 0;
  }
  (100.0 * correct as f64 / total as f64).round() as u32
}

/// Score per requested section. Sections without attempted questions score 0;
/// answers in sections outside the request are not counted.
pub fn section_scores(items: &[GradedItem], sections: &[Section]) -> BTreeMap<String, u32> {
  sections
    .iter()
    .map(|s| {
      let name = s.name();
      let (correct, total) = items
        .iter()
        .filter(|it| it.section == name)
        .fold((0, 0), |(c, t), it| (c + usize::from(it.answer.is_correct), t + 1));
      (name.to_string(), percent(correct, total))
    })
    .collect()
}

/// Grade every submitted answer, matching questions by id.
pub fn grade_answers(questions: &[Question], answers: &[UserAnswer]) -> Vec<GradedItem> {
  let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();

  answers
    .iter()
    .map(|ua| match by_id.get(ua.question_id.as_str()) {
      Some(q) => {
        let is_correct = grade(&ua.user_answer, q);
        GradedItem {
          answer: GradedAnswer {
            question_id: ua.question_id.clone(),
            user_answer: ua.user_answer.clone(),
            is_correct,
            explanation: explain(&ua.user_answer, q, is_correct),
            time_spent: ua.time_spent,
          },
          section: q.section.name().to_string(),
        }
      }
      None => {
        warn!(target: "grading", question_id = %ua.question_id, "Answer for unknown question");
        GradedItem {
          answer: GradedAnswer {
            question_id: ua.question_id.clone(),
            user_answer: ua.user_answer.clone(),
            is_correct: false,
            explanation: "Question not found".into(),
            time_spent: ua.time_spent,
          },
          section: "Unknown".into(),
        }
      }
    })
    .collect()
}

/// Grade a submission and build its immutable `Attempt`.
#[instrument(level = "info", skip_all, fields(%quiz_id, questions = questions.len(), answers = answers.len()))]
pub fn grade_quiz(
  quiz_id: &str,
  questions: &[Question],
  answers: &[UserAnswer],
  sections: &[Section],
  mode: Mode,
) -> (Attempt, Vec<GradedItem>) {
  let items = grade_answers(questions, answers);
  let correct = items.iter().filter(|it| it.answer.is_correct).count();
  let overall = percent(correct, items.len());

  let attempt = Attempt {
    id: format!("attempt-{}", Uuid::new_v4()),
    quiz_id: quiz_id.to_string(),
    sections: sections.to_vec(),
    mode,
    answers: items.iter().map(|it| it.answer.clone()).collect(),
    overall_score: overall,
    section_scores: section_scores(&items, sections),
    submitted_at: Utc::now(),
  };

  info!(target: "grading", %quiz_id, correct, total = items.len(), overall, "Quiz graded");
  (attempt, items)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Difficulty;

  fn numeric(correct: f64, tolerance: Option<f64>) -> Question {
    Question {
      id: "n-1".into(),
      section: Section::Statics,
      difficulty: Difficulty::Easy,
      kind: QuestionKind::Numeric,
      prompt: "A force of 100 N ...".into(),
      choices: None,
      correct_answer: CorrectAnswer::Number(correct),
      tolerance,
      accepted_units: Some(vec!["N".into()]),
      solution_outline: "F = 100 N".into(),
      explanation_correct: "Sum the forces.".into(),
      explanation_common_wrong: vec!["Dropped a sign.".into()],
      tags: vec![],
      generated_at: Utc::now(),
    }
  }

  fn mcq(id: &str, section: Section, correct: &str) -> Question {
    Question {
      id: id.into(),
      section,
      difficulty: Difficulty::Medium,
      kind: QuestionKind::Mcq,
      prompt: "Pick one.".into(),
      choices: Some(vec!["A) 1".into(), "B) 2".into(), "C) 3".into(), "D) 4".into()]),
      correct_answer: CorrectAnswer::Letter(correct.into()),
      tolerance: None,
      accepted_units: None,
      solution_outline: "2 = 1 + 1".into(),
      explanation_correct: "One plus one.".into(),
      explanation_common_wrong: vec!["Off by one low.".into(), "".into(), "Added three.".into(), "Squared it.".into()],
      tags: vec![],
      generated_at: Utc::now(),
    }
  }

  fn num(v: f64) -> AnswerValue {
    AnswerValue::Number(v)
  }

  fn text(s: &str) -> AnswerValue {
    AnswerValue::Text(s.into())
  }

  #[test]
  fn numeric_tolerance_is_relative_and_inclusive() {
    let q = numeric(100.0, Some(0.05));
    assert!(grade(&num(103.0), &q));
    assert!(grade(&num(105.0), &q));
    assert!(!grade(&num(106.0), &q));
    assert!(grade(&num(95.0), &q));
    assert!(grade(&text("104.9"), &q));
  }

  #[test]
  fn negative_canonical_values_use_magnitude() {
    let q = numeric(-20.0, Some(0.05));
    assert!(grade(&num(-20.8), &q));
    assert!(!grade(&num(20.0), &q));
  }

  #[test]
  fn missing_tolerance_defaults_to_five_percent() {
    let q = numeric(100.0, None);
    assert!(grade(&num(104.0), &q));
    assert!(!grade(&num(94.0), &q));
  }

  #[test]
  fn ungradable_numeric_input_is_incorrect() {
    let q = numeric(100.0, Some(0.05));
    assert!(!grade(&text("about a hundred"), &q));
    assert!(!grade(&num(f64::INFINITY), &q));
    assert!(!grade(&num(0.0), &numeric(0.0, Some(0.05))));
  }

  #[test]
  fn letters_compare_case_insensitively() {
    let q = mcq("m-1", Section::Statics, "B");
    assert!(grade(&text("b"), &q));
    assert!(grade(&text("B"), &q));
    assert!(!grade(&text("C"), &q));
    assert!(!grade(&text("E"), &q));
    assert!(!grade(&num(2.0), &q));
  }

  #[test]
  fn correct_explanation_has_reasoning_and_solution() {
    let q = mcq("m-1", Section::Statics, "B");
    let e = explain(&text("B"), &q, true);
    assert!(e.starts_with("✓ CORRECT"));
    assert!(e.contains("One plus one."));
    assert!(e.contains("Solution:\n2 = 1 + 1"));
  }

  #[test]
  fn wrong_mcq_cites_the_picked_choice() {
    let q = mcq("m-1", Section::Statics, "B");
    let e = explain(&text("d"), &q, false);
    assert!(e.starts_with("✗ INCORRECT"));
    assert!(e.contains("Your answer: d\nCorrect answer: B"));
    assert!(e.contains("Why your choice was wrong:\nSquared it."));
    assert!(e.contains("Why the correct answer (B) is right:\nOne plus one."));
    assert!(e.ends_with("Solution Steps:\n2 = 1 + 1"));

    // Out-of-range label: the choice-specific note is omitted.
    let e = explain(&text("Z"), &q, false);
    assert!(e.contains("Why your choice was wrong:\nWhy the correct answer"));
  }

  #[test]
  fn wrong_numeric_cites_the_first_common_mistake() {
    let q = numeric(100.0, Some(0.05));
    let e = explain(&num(120.0), &q, false);
    assert!(e.contains("Your answer: 120\nCorrect answer: 100"));
    assert!(e.contains("Why this is incorrect:\nDropped a sign."));
    assert!(e.contains("Correct approach:\nSum the forces."));
  }

  #[test]
  fn seven_of_ten_scores_seventy() {
    assert_eq!(percent(7, 10), 70);
    assert_eq!(percent(2, 3), 67);
    assert_eq!(percent(0, 0), 0);
  }

  #[test]
  fn quiz_attempt_aggregates_overall_and_per_section() {
    let questions: Vec<Question> = (0..10)
      .map(|i| mcq(&format!("q{i}"), if i < 6 { Section::Statics } else { Section::Dynamics }, "A"))
      .collect();
    let answers: Vec<UserAnswer> = (0..10)
      .map(|i| UserAnswer {
        question_id: format!("q{i}"),
        user_answer: text(if i < 7 { "a" } else { "C" }),
        time_spent: Some(30),
      })
      .collect();
    let sections = [Section::Statics, Section::Dynamics, Section::Chemistry];

    let (attempt, items) = grade_quiz("quiz-1", &questions, &answers, &sections, Mode::Timed);
    assert_eq!(attempt.overall_score, 70);
    assert_eq!(attempt.section_scores["Statics"], 100);
    assert_eq!(attempt.section_scores["Dynamics"], 25);
    assert_eq!(attempt.section_scores["Chemistry"], 0);
    assert_eq!(attempt.answers.len(), 10);
    assert_eq!(items[9].section, "Dynamics");
    assert_eq!(attempt.mode, Mode::Timed);
  }

  #[test]
  fn answers_are_matched_by_id_not_position() {
    let questions = vec![mcq("x", Section::Statics, "A"), mcq("y", Section::Statics, "B")];
    let answers = vec![
      UserAnswer { question_id: "y".into(), user_answer: text("B"), time_spent: None },
      UserAnswer { question_id: "missing".into(), user_answer: text("A"), time_spent: None },
    ];
    let items = grade_answers(&questions, &answers);
    assert!(items[0].answer.is_correct);
    assert!(!items[1].answer.is_correct);
    assert_eq!(items[1].answer.explanation, "Question not found");
    assert_eq!(items[1].section, "Unknown");
  }
}
