//! Domain models: exam sections, questions, quizzes, graded answers and attempts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// FE (Other Disciplines) knowledge areas.
///
/// Serialized as the display name. Names that are not part of the exam are kept
/// as `Unknown` so the validator can reject them instead of the JSON layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Section {
  Mathematics,
  ProbabilityStatistics,
  Chemistry,
  InstrumentationControls,
  EthicsSocietalImpacts,
  SafetyHealthEnvironment,
  EngineeringEconomics,
  Statics,
  Dynamics,
  StrengthOfMaterials,
  Materials,
  FluidMechanics,
  BasicElectrical,
  ThermoHeatTransfer,
  Unknown(String),
}

impl Section {
  pub const ALL: [Section; 14] = [
    Section::Mathematics,
    Section::ProbabilityStatistics,
    Section::Chemistry,
    Section::InstrumentationControls,
    Section::EthicsSocietalImpacts,
    Section::SafetyHealthEnvironment,
    Section::EngineeringEconomics,
    Section::Statics,
    Section::Dynamics,
    Section::StrengthOfMaterials,
    Section::Materials,
    Section::FluidMechanics,
    Section::BasicElectrical,
    Section::ThermoHeatTransfer,
  ];

  pub fn name(&self) -> &str {
    match self {
      Section::Mathematics => "Mathematics",
      Section::ProbabilityStatistics => "Probability and Statistics",
      Section::Chemistry => "Chemistry",
      Section::InstrumentationControls => "Instrumentation and Controls",
      Section::EthicsSocietalImpacts => "Engineering Ethics and Societal Impacts",
      Section::SafetyHealthEnvironment => "Safety, Health, and Environment",
      Section::EngineeringEconomics => "Engineering Economics",
      Section::Statics => "Statics",
      Section::Dynamics => "Dynamics",
      Section::StrengthOfMaterials => "Strength of Materials",
      Section::Materials => "Materials",
      Section::FluidMechanics => "Fluid Mechanics",
      Section::BasicElectrical => "Basic Electrical Engineering",
      Section::ThermoHeatTransfer => "Thermodynamics and Heat Transfer",
      Section::Unknown(name) => name,
    }
  }

  pub fn is_known(&self) -> bool {
    !matches!(self, Section::Unknown(_))
  }
}

impl From<String> for Section {
  fn from(name: String) -> Self {
    Section::ALL
      .iter()
      .find(|s| s.name() == name.trim())
      .cloned()
      .unwrap_or(Section::Unknown(name))
  }
}

impl From<&str> for Section {
  fn from(name: &str) -> Self {
    Section::from(name.to_string())
  }
}

impl From<Section> for String {
  fn from(s: Section) -> Self {
    s.name().to_string()
  }
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }

  /// Short code used inside deterministic question ids.
  pub fn code(self) -> char {
    match self {
      Difficulty::Easy => 'e',
      Difficulty::Medium => 'm',
      Difficulty::Hard => 'h',
    }
  }
}

/// Difficulty requested for a whole quiz: one fixed level or an even rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyFilter {
  Easy,
  Medium,
  Hard,
  Mixed,
}

impl Default for DifficultyFilter {
  fn default() -> Self { DifficultyFilter::Mixed }
}

impl DifficultyFilter {
  /// Difficulty for the item at `index` in a generated sequence.
  pub fn for_index(self, index: usize) -> Difficulty {
    match self {
      DifficultyFilter::Easy => Difficulty::Easy,
      DifficultyFilter::Medium => Difficulty::Medium,
      DifficultyFilter::Hard => Difficulty::Hard,
      DifficultyFilter::Mixed => match index % 3 {
        0 => Difficulty::Easy,
        1 => Difficulty::Medium,
        _ => Difficulty::Hard,
      },
    }
  }
}

impl From<Difficulty> for DifficultyFilter {
  fn from(d: Difficulty) -> Self {
    match d {
      Difficulty::Easy => DifficultyFilter::Easy,
      Difficulty::Medium => DifficultyFilter::Medium,
      Difficulty::Hard => DifficultyFilter::Hard,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  Mcq,
  Numeric,
}

impl QuestionKind {
  pub fn as_str(self) -> &'static str {
    match self {
      QuestionKind::Mcq => "mcq",
      QuestionKind::Numeric => "numeric",
    }
  }
}

/// Canonical answer: a choice letter for MCQ, a number for numeric items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
  Number(f64),
  Letter(String),
}

impl fmt::Display for CorrectAnswer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CorrectAnswer::Number(n) => write!(f, "{}", n),
      CorrectAnswer::Letter(l) => f.write_str(l),
    }
  }
}

/// One exam item. Frozen once it leaves the pool builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: String,
  pub section: Section,
  pub difficulty: Difficulty,
  #[serde(rename = "type")]
  pub kind: QuestionKind,
  pub prompt: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub choices: Option<Vec<String>>,
  pub correct_answer: CorrectAnswer,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tolerance: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub accepted_units: Option<Vec<String>>,
  pub solution_outline: String,
  pub explanation_correct: String,
  #[serde(default)]
  pub explanation_common_wrong: Vec<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  pub generated_at: DateTime<Utc>,
}

pub const CHOICE_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Positional index of a choice letter (`"b"` -> 1). None for anything but A-D.
pub fn label_index(label: &str) -> Option<usize> {
  let upper = label.trim().to_uppercase();
  CHOICE_LABELS.iter().position(|l| *l == upper)
}

/// Split `"B) 4 m/s²"` into `("B", "4 m/s²")`. Unlabelled text yields `None`.
pub fn split_choice_label(choice: &str) -> Option<(&str, &str)> {
  let (label, rest) = choice.split_once(')')?;
  let label = label.trim();
  if label_index(label).is_some() {
    Some((label, rest.trim_start()))
  } else {
    None
  }
}

/// Submitted value: whatever the client sent (a letter, a number or a numeric string).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
  Number(f64),
  Text(String),
}

impl AnswerValue {
  /// Numeric coercion; non-numeric or non-finite input yields `None`.
  pub fn as_f64(&self) -> Option<f64> {
    let n = match self {
      AnswerValue::Number(n) => *n,
      AnswerValue::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    n.is_finite().then_some(n)
  }

  pub fn as_text(&self) -> String {
    match self {
      AnswerValue::Number(n) => n.to_string(),
      AnswerValue::Text(s) => s.clone(),
    }
  }
}

impl fmt::Display for AnswerValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.as_text())
  }
}

/// An answer as submitted by the client, before grading.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
  pub question_id: String,
  pub user_answer: AnswerValue,
  #[serde(default)]
  pub time_spent: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
  pub question_id: String,
  pub user_answer: AnswerValue,
  pub is_correct: bool,
  pub explanation: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time_spent: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
  Practice,
  #[serde(alias = "exam")]
  Timed,
}

impl Default for Mode {
  fn default() -> Self { Mode::Practice }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
  pub id: String,
  pub sections: Vec<Section>,
  pub mode: Mode,
  pub questions: Vec<Question>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time_limit: Option<u32>,
  pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
  pub id: String,
  pub quiz_id: String,
  pub sections: Vec<Section>,
  pub mode: Mode,
  pub answers: Vec<GradedAnswer>,
  pub overall_score: u32,
  pub section_scores: std::collections::BTreeMap<String, u32>,
  pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn section_names_round_trip_and_unknown_is_preserved() {
    for s in Section::ALL.iter() {
      assert_eq!(&Section::from(s.name()), s);
    }
    let odd = Section::from("Power Systems");
    assert_eq!(odd, Section::Unknown("Power Systems".into()));
    assert!(!odd.is_known());
    let json = serde_json::to_string(&Section::FluidMechanics).unwrap();
    assert_eq!(json, "\"Fluid Mechanics\"");
  }

  #[test]
  fn mixed_filter_rotates_one_to_one_to_one() {
    let got: Vec<Difficulty> = (0..6).map(|i| DifficultyFilter::Mixed.for_index(i)).collect();
    assert_eq!(
      got,
      vec![
        Difficulty::Easy, Difficulty::Medium, Difficulty::Hard,
        Difficulty::Easy, Difficulty::Medium, Difficulty::Hard,
      ]
    );
    assert_eq!(DifficultyFilter::Hard.for_index(1), Difficulty::Hard);
  }

  #[test]
  fn choice_labels_parse() {
    assert_eq!(label_index("b"), Some(1));
    assert_eq!(label_index("E"), None);
    assert_eq!(split_choice_label("C) 12 N"), Some(("C", "12 N")));
    assert_eq!(split_choice_label("no label"), None);
  }

  #[test]
  fn answer_values_coerce() {
    assert_eq!(AnswerValue::Text(" 12.5 ".into()).as_f64(), Some(12.5));
    assert_eq!(AnswerValue::Text("twelve".into()).as_f64(), None);
    assert_eq!(AnswerValue::Number(f64::NAN).as_f64(), None);
    let v: AnswerValue = serde_json::from_str("103").unwrap();
    assert_eq!(v, AnswerValue::Number(103.0));
    let v: AnswerValue = serde_json::from_str("\"B\"").unwrap();
    assert_eq!(v, AnswerValue::Text("B".into()));
  }

  #[test]
  fn exam_is_an_alias_for_timed() {
    let m: Mode = serde_json::from_str("\"exam\"").unwrap();
    assert_eq!(m, Mode::Timed);
  }
}
