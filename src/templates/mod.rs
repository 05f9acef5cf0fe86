//! Template registry: per-section lists of parameterized question templates.
//!
//! A template is a pure `fn(seed, difficulty) -> Question`. Every numeric
//! parameter comes from `Mulberry32::new(seed)`, so the same (seed, difficulty) always
//! gives the same question apart from `generated_at`. Distractors are computed
//! from the same inputs with one named mistake each.
//!
//! Adding a template means adding a function to the section's slice below;
//! the pool builder and selection engine do not change.

mod economics;
mod math;
mod mechanics;
mod science;

use chrono::Utc;
use rand::seq::SliceRandom;

use crate::domain::{CorrectAnswer, Difficulty, Question, QuestionKind, Section, CHOICE_LABELS};
use crate::handbook::handbook_entry;
use crate::rng::{derive_seed, pick, Mulberry32};
use crate::util::{fmt_num, round_sig};

pub type Template = fn(u32, Difficulty) -> Question;

const ORDER_SALT: u32 = 0x0A11;

static MATHEMATICS: [Template; 3] = [math::linear_equation, math::derivative_at_point, math::determinant_2x2];
static PROBABILITY: [Template; 2] = [math::independent_events, math::sample_std_dev];
static CHEMISTRY: [Template; 2] = [science::moles_from_mass, science::strong_acid_ph];
static INSTRUMENTATION: [Template; 2] = [science::nyquist_rate, science::adc_resolution];
static ECONOMICS: [Template; 3] = [economics::present_worth, economics::future_worth, economics::straight_line_depreciation];
static STATICS: [Template; 3] = [mechanics::force_component, mechanics::static_friction, mechanics::moment_about_point];
static DYNAMICS: [Template; 2] = [mechanics::newton_second_law, mechanics::kinetic_energy];
static STRENGTH: [Template; 2] = [mechanics::axial_force_from_stress, mechanics::axial_elongation];
static MATERIALS: [Template; 1] = [mechanics::thermal_expansion];
static FLUIDS: [Template; 3] = [science::pipe_flow_rate, science::hydrostatic_pressure, science::reynolds_number];
static ELECTRICAL: [Template; 2] = [science::ohms_law_current, science::resistor_power];
static THERMO: [Template; 2] = [science::sensible_heat, science::carnot_efficiency];

/// Templates registered for a section, in round-robin order. Empty means the
/// section is served by `fallback_question`.
pub fn templates_for(section: &Section) -> &'static [Template] {
  match section {
    Section::Mathematics => &MATHEMATICS,
    Section::ProbabilityStatistics => &PROBABILITY,
    Section::Chemistry => &CHEMISTRY,
    Section::InstrumentationControls => &INSTRUMENTATION,
    Section::EngineeringEconomics => &ECONOMICS,
    Section::Statics => &STATICS,
    Section::Dynamics => &DYNAMICS,
    Section::StrengthOfMaterials => &STRENGTH,
    Section::Materials => &MATERIALS,
    Section::FluidMechanics => &FLUIDS,
    Section::BasicElectrical => &ELECTRICAL,
    Section::ThermoHeatTransfer => &THERMO,
    Section::EthicsSocietalImpacts | Section::SafetyHealthEnvironment | Section::Unknown(_) => &[],
  }
}

/// Deterministic id: template key, difficulty code and seed.
pub(crate) fn question_id(key: &str, difficulty: Difficulty, seed: u32) -> String {
  format!("{}-{}-{:08x}", key, difficulty.code(), seed)
}

/// One answer option and the mistake (or reasoning) behind it.
pub(crate) struct Opt {
  pub text: String,
  pub why: String,
}

/// Format numeric options with a unit, nudging any distractor whose rounded
/// text collides with an earlier option so the four texts stay distinct.
pub(crate) fn numeric_options(unit: &str, correct: f64, distractors: [(f64, String); 3]) -> (Opt, [Opt; 3]) {
  let fmt = |v: f64| if unit.is_empty() { fmt_num(v) } else { format!("{} {}", fmt_num(v), unit) };
  let correct_opt = Opt { text: fmt(correct), why: String::new() };
  let mut taken = vec![correct_opt.text.clone()];
  let opts = distractors.map(|(value, why)| {
    let mut v = value;
    let mut text = fmt(v);
    let mut bump = 0;
    while taken.contains(&text) && bump < 8 {
      bump += 1;
      v *= if bump % 2 == 1 { 1.25 } else { 0.7 };
      text = fmt(v);
    }
    taken.push(text.clone());
    Opt { text, why }
  });
  (correct_opt, opts)
}

pub(crate) struct McqDraft {
  pub key: &'static str,
  pub section: Section,
  pub seed: u32,
  pub difficulty: Difficulty,
  pub prompt: String,
  pub correct: Opt,
  pub distractors: [Opt; 3],
  pub solution: String,
  pub explanation: String,
  pub tags: &'static [&'static str],
}

/// Lay out an MCQ: the correct option lands at a seed-derived position and the
/// wrong-choice explanations are aligned with all four labels.
pub(crate) fn build_mcq(d: McqDraft) -> Question {
  let correct_why = format!("Correct: {}", d.explanation);
  let mut options: Vec<(bool, Opt)> = Vec::with_capacity(4);
  options.push((true, Opt { text: d.correct.text, why: correct_why }));
  for opt in d.distractors {
    options.push((false, opt));
  }
  options.shuffle(&mut Mulberry32::new(derive_seed(d.seed, ORDER_SALT)));

  let correct_idx = options.iter().position(|(ok, _)| *ok).unwrap_or(0);
  let choices = options
    .iter()
    .zip(CHOICE_LABELS.iter())
    .map(|((_, o), label)| format!("{}) {}", label, o.text))
    .collect();
  let wrong = options.into_iter().map(|(_, o)| o.why).collect();

  Question {
    id: question_id(d.key, d.difficulty, d.seed),
    section: d.section,
    difficulty: d.difficulty,
    kind: QuestionKind::Mcq,
    prompt: d.prompt,
    choices: Some(choices),
    correct_answer: CorrectAnswer::Letter(CHOICE_LABELS[correct_idx].to_string()),
    tolerance: None,
    accepted_units: None,
    solution_outline: d.solution,
    explanation_correct: d.explanation,
    explanation_common_wrong: wrong,
    tags: d.tags.iter().map(|t| t.to_string()).collect(),
    generated_at: Utc::now(),
  }
}

pub(crate) struct NumericDraft {
  pub key: &'static str,
  pub section: Section,
  pub seed: u32,
  pub difficulty: Difficulty,
  pub prompt: String,
  pub answer: f64,
  pub tolerance: f64,
  pub units: &'static [&'static str],
  pub solution: String,
  pub explanation: String,
  pub mistakes: Vec<String>,
  pub tags: &'static [&'static str],
}

pub(crate) fn build_numeric(d: NumericDraft) -> Question {
  Question {
    id: question_id(d.key, d.difficulty, d.seed),
    section: d.section,
    difficulty: d.difficulty,
    kind: QuestionKind::Numeric,
    prompt: d.prompt,
    choices: None,
    correct_answer: CorrectAnswer::Number(round_sig(d.answer, 6)),
    tolerance: Some(d.tolerance),
    accepted_units: Some(d.units.iter().map(|u| u.to_string()).collect()),
    solution_outline: d.solution,
    explanation_correct: d.explanation,
    explanation_common_wrong: d.mistakes,
    tags: d.tags.iter().map(|t| t.to_string()).collect(),
    generated_at: Utc::now(),
  }
}

/// Generic question for sections without templates (and unknown sections), so
/// generation never stalls. Asks which handbook search keyword belongs to the
/// section; the distractors are keywords of other sections.
pub fn fallback_question(section: &Section, seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);

  let (correct, own): (String, Vec<String>) = match handbook_entry(section) {
    Some(entry) => (
      pick(&mut rng, entry.keywords).to_string(),
      entry.keywords.iter().map(|k| k.to_lowercase()).collect(),
    ),
    None => ("(none: this section is not in the handbook)".to_string(), vec![]),
  };

  let mut foreign: Vec<(String, String)> = Section::ALL
    .iter()
    .filter(|s| *s != section)
    .filter_map(|s| handbook_entry(s).map(|e| (s.name().to_string(), e)))
    .flat_map(|(owner, e)| e.keywords.iter().map(move |k| (k.to_string(), owner.clone())))
    .filter(|(k, _)| !own.contains(&k.to_lowercase()) && k.to_lowercase() != correct.to_lowercase())
    .collect();
  foreign.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
  foreign.dedup_by(|a, b| a.0.to_lowercase() == b.0.to_lowercase());
  foreign.shuffle(&mut rng);

  let distractors: [Opt; 3] = std::array::from_fn(|i| {
    let (kw, owner) = &foreign[i % foreign.len().max(1)];
    Opt { text: kw.clone(), why: format!("\"{}\" is a {} keyword, not a {} one.", kw, owner, section) }
  });

  build_mcq(McqDraft {
    key: "fallback-keyword",
    section: section.clone(),
    seed,
    difficulty,
    prompt: format!(
      "An examinee is searching the FE Reference Handbook for a problem in the {} section. Which search keyword belongs to this section?",
      section
    ),
    correct: Opt { text: correct.clone(), why: String::new() },
    distractors,
    solution: format!("Step 1: Recall the {} handbook chapter. Step 2: Match the keyword (Ctrl+F) to that chapter.", section),
    explanation: format!("\"{}\" is listed under {} in the handbook.", correct, section),
    tags: &["handbook-navigation"],
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::split_choice_label;
  use crate::validator::{validate, ValidationLevel};

  fn all_registered() -> Vec<(Section, Template)> {
    Section::ALL
      .iter()
      .flat_map(|s| templates_for(s).iter().map(move |t| (s.clone(), *t)))
      .collect()
  }

  fn without_timestamp(mut q: Question) -> Question {
    q.generated_at = chrono::DateTime::<Utc>::MIN_UTC;
    q
  }

  #[test]
  fn templates_are_deterministic_per_seed_and_difficulty() {
    for (_, t) in all_registered() {
      for seed in [0u32, 1, 17, 9_999] {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
          let a = without_timestamp(t(seed, d));
          let b = without_timestamp(t(seed, d));
          assert_eq!(a, b, "template {} not deterministic", a.id);
        }
      }
    }
  }

  #[test]
  fn templates_keep_their_section_and_pass_validation() {
    for (section, t) in all_registered() {
      for seed in 0..40u32 {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
          let q = t(seed, d);
          assert_eq!(q.section, section);
          assert_eq!(q.difficulty, d);
          let r = validate(&q, ValidationLevel::Moderate);
          assert!(r.is_valid, "{} invalid: {:?}", q.id, r.errors);
        }
      }
    }
  }

  #[test]
  fn mcq_templates_have_four_distinct_labelled_choices_and_one_answer() {
    for (_, t) in all_registered() {
      for seed in 0..60u32 {
        let q = t(seed, Difficulty::Medium);
        if q.kind != QuestionKind::Mcq {
          continue;
        }
        let choices = q.choices.as_ref().expect("choices");
        assert_eq!(choices.len(), 4);
        let texts: Vec<&str> = choices.iter().map(|c| split_choice_label(c).expect("label").1).collect();
        for i in 0..4 {
          for j in (i + 1)..4 {
            assert_ne!(texts[i], texts[j], "duplicate choice in {}: {:?}", q.id, choices);
          }
        }
        assert_eq!(q.explanation_common_wrong.len(), 4);
        let CorrectAnswer::Letter(l) = &q.correct_answer else { panic!("letter expected") };
        let hits = choices.iter().filter(|c| split_choice_label(c).map(|(lab, _)| lab) == Some(l.as_str())).count();
        assert_eq!(hits, 1);
      }
    }
  }

  #[test]
  fn numeric_templates_have_finite_nonzero_answers() {
    for (_, t) in all_registered() {
      for seed in 0..60u32 {
        let q = t(seed, Difficulty::Hard);
        if let CorrectAnswer::Number(n) = q.correct_answer {
          assert!(n.is_finite() && n != 0.0, "{} -> {}", q.id, n);
          assert!(q.tolerance.unwrap_or(0.0) > 0.0);
        }
      }
    }
  }

  #[test]
  fn correct_position_varies_across_seeds() {
    let letters: std::collections::HashSet<String> = (0..40u32)
      .map(|s| math::linear_equation(s, Difficulty::Easy).correct_answer.to_string())
      .collect();
    assert!(letters.len() > 1, "correct answer always at {:?}", letters);
  }

  #[test]
  fn fallback_serves_sections_without_templates() {
    assert!(templates_for(&Section::EthicsSocietalImpacts).is_empty());
    let q = fallback_question(&Section::EthicsSocietalImpacts, 5, Difficulty::Easy);
    assert_eq!(q.section, Section::EthicsSocietalImpacts);
    assert!(validate(&q, ValidationLevel::Moderate).is_valid);

    let unknown = Section::Unknown("Power Systems".into());
    let q = fallback_question(&unknown, 5, Difficulty::Easy);
    assert_eq!(q.choices.as_ref().map(|c| c.len()), Some(4));
    assert!(!validate(&q, ValidationLevel::Moderate).is_valid);
  }
}
