//! Pool builder: expands one section into a candidate pool by running its
//! templates over consecutive seeds.
//!
//! Each raw item is finalized exactly once here (MCQ choices re-shuffled,
//! numeric answers jittered) and is frozen afterwards. Both steps draw from a
//! stream derived from the item seed, so a pool is reproducible from
//! `(section, seed_base, pool_size, filter)`.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::domain::{
  split_choice_label, CorrectAnswer, DifficultyFilter, Question, QuestionKind, Section, CHOICE_LABELS,
};
use crate::grading::tolerance_of;
use crate::rng::{derive_seed, Mulberry32};
use crate::templates::{fallback_question, templates_for};
use crate::util::round_sig;

/// Pool size used when the configuration does not override it.
pub const DEFAULT_POOL_SIZE: usize = 60;

/// Relative half-width of the numeric answer jitter.
pub const JITTER: f64 = 0.05;

/// Headroom kept between the jitter and the tolerance for 4-significant-figure
/// rounding of the jittered value.
const ROUNDING_MARGIN: f64 = 0.001;

const SHUFFLE_SALT: u32 = 0x5EED_0001;
const JITTER_SALT: u32 = 0x5EED_0002;

pub fn build_pool(section: &Section, pool_size: usize, filter: DifficultyFilter) -> Vec<Question> {
  build_pool_from(section, 0, pool_size, filter)
}

/// Item `i` uses seed `seed_base + i`, template `i mod count` and
/// `filter.for_index(i)`. Sections without templates get fallback items.
#[instrument(level = "debug", skip(section), fields(section = %section))]
pub fn build_pool_from(
  section: &Section,
  seed_base: u32,
  pool_size: usize,
  filter: DifficultyFilter,
) -> Vec<Question> {
  let templates = templates_for(section);
  let pool: Vec<Question> = (0..pool_size)
    .map(|i| {
      let seed = seed_base.wrapping_add(i as u32);
      let difficulty = filter.for_index(i);
      let raw = match templates.len() {
        0 => fallback_question(section, seed, difficulty),
        n => templates[i % n](seed, difficulty),
      };
      finalize(raw, seed)
    })
    .collect();

  debug!(target: "generator", size = pool.len(), templates = templates.len(), "Pool built");
  pool
}

fn finalize(question: Question, seed: u32) -> Question {
  match question.kind {
    QuestionKind::Mcq => shuffle_choices(question, derive_seed(seed, SHUFFLE_SALT)),
    QuestionKind::Numeric => jitter_answer(question, derive_seed(seed, JITTER_SALT)),
  }
}

/// Re-order the choice texts, relabel them A-D and move `correctAnswer` (and
/// the aligned wrong-choice explanations) along with them.
fn shuffle_choices(mut q: Question, seed: u32) -> Question {
  let Some(choices) = q.choices.take() else {
    return q;
  };
  let correct_idx = match &q.correct_answer {
    CorrectAnswer::Letter(l) => choices
      .iter()
      .position(|c| split_choice_label(c).map_or(false, |(lab, _)| lab.eq_ignore_ascii_case(l))),
    CorrectAnswer::Number(_) => None,
  };
  let Some(correct_idx) = correct_idx else {
    q.choices = Some(choices);
    return q;
  };

  let aligned = q.explanation_common_wrong.len() == choices.len();
  let mut order: Vec<usize> = (0..choices.len()).collect();
  order.shuffle(&mut Mulberry32::new(seed));

  let texts: Vec<&str> = choices
    .iter()
    .map(|c| split_choice_label(c).map_or(c.as_str(), |(_, text)| text))
    .collect();
  let relabelled = order
    .iter()
    .zip(CHOICE_LABELS.iter())
    .map(|(&from, label)| format!("{}) {}", label, texts[from]))
    .collect();

  if aligned {
    q.explanation_common_wrong = order.iter().map(|&from| q.explanation_common_wrong[from].clone()).collect();
  }
  if let Some(new_idx) = order.iter().position(|&from| from == correct_idx) {
    q.correct_answer = CorrectAnswer::Letter(CHOICE_LABELS[new_idx].to_string());
  }
  q.choices = Some(relabelled);
  q
}

/// Scale the canonical answer by a factor in `1 ± half_width`. Tolerance is
/// left as is; the width shrinks so the unjittered value still grades correct.
fn jitter_answer(mut q: Question, seed: u32) -> Question {
  if let CorrectAnswer::Number(n) = q.correct_answer {
    let half = jitter_half_width(tolerance_of(&q));
    if half <= 0.0 {
      return q;
    }
    let factor = Mulberry32::new(seed).gen_range(1.0 - half..=1.0 + half);
    let jittered = round_sig(n * factor, 4);
    q.correct_answer = CorrectAnswer::Number(if jittered == 0.0 { n } else { jittered });
  }
  q
}

/// Largest half-width `h` with `h / (1 - h) <= tolerance`, capped at `JITTER`.
pub fn jitter_half_width(tolerance: f64) -> f64 {
  (tolerance / (1.0 + tolerance) - ROUNDING_MARGIN).clamp(0.0, JITTER)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AnswerValue, Difficulty};
  use crate::grading::grade;

  fn correct_text(q: &Question) -> String {
    let CorrectAnswer::Letter(l) = &q.correct_answer else { panic!("letter expected") };
    q.choices
      .as_ref()
      .expect("choices")
      .iter()
      .find_map(|c| split_choice_label(c).filter(|(lab, _)| *lab == l.as_str()).map(|(_, t)| t.to_string()))
      .expect("correct label present")
  }

  #[test]
  fn pool_has_requested_size_and_section() {
    let pool = build_pool(&Section::Statics, 30, DifficultyFilter::Mixed);
    assert_eq!(pool.len(), 30);
    assert!(pool.iter().all(|q| q.section == Section::Statics));
  }

  #[test]
  fn mixed_filter_rotates_difficulty_by_index() {
    let pool = build_pool(&Section::Dynamics, 9, DifficultyFilter::Mixed);
    for (i, q) in pool.iter().enumerate() {
      assert_eq!(q.difficulty, DifficultyFilter::Mixed.for_index(i));
    }
    let fixed = build_pool(&Section::Dynamics, 9, DifficultyFilter::Hard);
    assert!(fixed.iter().all(|q| q.difficulty == Difficulty::Hard));
  }

  #[test]
  fn shuffled_mcqs_keep_exactly_one_correct_label() {
    for section in Section::ALL.iter() {
      for q in build_pool_from(section, 1_000, 40, DifficultyFilter::Mixed) {
        if q.kind != QuestionKind::Mcq {
          continue;
        }
        let CorrectAnswer::Letter(l) = &q.correct_answer else { panic!("letter expected") };
        let choices = q.choices.as_ref().expect("choices");
        let labels: Vec<&str> = choices.iter().filter_map(|c| split_choice_label(c).map(|(lab, _)| lab)).collect();
        assert_eq!(labels, CHOICE_LABELS.to_vec(), "{}", q.id);
        assert_eq!(labels.iter().filter(|lab| **lab == l.as_str()).count(), 1, "{}", q.id);
      }
    }
  }

  #[test]
  fn shuffle_moves_the_correct_text_with_its_label() {
    for seed in 0..30u32 {
      let raw = fallback_question(&Section::SafetyHealthEnvironment, seed, Difficulty::Easy);
      let before = correct_text(&raw);
      let raw_wrong = raw.explanation_common_wrong.clone();
      let shuffled = finalize(raw, seed);
      assert_eq!(correct_text(&shuffled), before);

      let mut a = raw_wrong;
      let mut b = shuffled.explanation_common_wrong.clone();
      a.sort();
      b.sort();
      assert_eq!(a, b, "explanations must be permuted, not rewritten");
      let CorrectAnswer::Letter(l) = &shuffled.correct_answer else { panic!("letter expected") };
      let idx = crate::domain::label_index(l).expect("label");
      assert!(shuffled.explanation_common_wrong[idx].starts_with("Correct:"));
    }
  }

  #[test]
  fn numeric_jitter_stays_within_five_percent() {
    for q in build_pool(&Section::Materials, 30, DifficultyFilter::Medium) {
      let CorrectAnswer::Number(jittered) = q.correct_answer else { continue };
      assert!(jittered.is_finite() && jittered != 0.0);
      assert_eq!(q.tolerance, Some(0.05));
    }

    let seed = 11;
    let mut q = templates_for(&Section::Materials)[0](seed, Difficulty::Easy);
    let CorrectAnswer::Number(base) = q.correct_answer else { panic!("numeric expected") };
    q = jitter_answer(q, derive_seed(seed, JITTER_SALT));
    let CorrectAnswer::Number(after) = q.correct_answer else { panic!("numeric expected") };
    let rel = (after - base).abs() / base.abs();
    assert!(rel <= JITTER + 1e-3, "jitter {rel} too large");
  }

  #[test]
  fn jitter_width_follows_tolerance() {
    assert!((jitter_half_width(0.05) - (0.05 / 1.05 - 0.001)).abs() < 1e-12);
    assert!(jitter_half_width(0.01) < 0.01);
    assert_eq!(jitter_half_width(0.5), JITTER);
    assert_eq!(jitter_half_width(0.0005), 0.0);
  }

  #[test]
  fn exact_answers_still_grade_correct_after_jitter() {
    for section in Section::ALL.iter() {
      for (t, template) in templates_for(section).iter().enumerate() {
        for seed in 0..300u32 {
          for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let raw = template(seed, difficulty);
            let CorrectAnswer::Number(exact) = raw.correct_answer else { break };
            let q = finalize(raw, seed);
            assert!(
              grade(&AnswerValue::Number(exact), &q),
              "{section} template {t}: exact {exact} graded wrong against {} (tolerance {:?}, id {})",
              q.correct_answer,
              q.tolerance,
              q.id
            );
          }
        }
      }
    }
  }

  #[test]
  fn pools_are_reproducible() {
    let strip = |qs: Vec<Question>| -> Vec<(String, Option<Vec<String>>, String)> {
      qs.into_iter().map(|q| (q.id, q.choices, q.correct_answer.to_string())).collect()
    };
    let a = strip(build_pool_from(&Section::FluidMechanics, 77, 12, DifficultyFilter::Mixed));
    let b = strip(build_pool_from(&Section::FluidMechanics, 77, 12, DifficultyFilter::Mixed));
    assert_eq!(a, b);
  }

  #[test]
  fn empty_registry_uses_fallback() {
    let pool = build_pool(&Section::EthicsSocietalImpacts, 5, DifficultyFilter::Easy);
    assert_eq!(pool.len(), 5);
    assert!(pool.iter().all(|q| q.id.starts_with("fallback-keyword")));
  }
}
