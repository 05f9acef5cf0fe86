//! Selection engine: spreads a question count over sections and samples each
//! section's pool.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, instrument};

use crate::domain::{DifficultyFilter, Question, Section};
use crate::pool::build_pool_from;

/// Per-section allotment: `total / n` each, the first `total % n` sections
/// one more.
pub fn allotments(total: usize, sections: usize) -> Vec<usize> {
  if sections == 0 {
    return vec![];
  }
  let base = total / sections;
  let remainder = total % sections;
  (0..sections).map(|i| base + usize::from(i < remainder)).collect()
}

/// Pick `total` questions across `sections`. Each pool holds at least its
/// allotment, so fewer come back only when a section yields no questions at all.
#[instrument(level = "info", skip(sections, rng), fields(sections = sections.len()))]
pub fn select_questions<R: Rng + ?Sized>(
  sections: &[Section],
  total: usize,
  filter: DifficultyFilter,
  pool_size: usize,
  rng: &mut R,
) -> Vec<Question> {
  if total == 0 || sections.is_empty() {
    return vec![];
  }

  let mut selected = Vec::with_capacity(total);
  for (section, take) in sections.iter().zip(allotments(total, sections.len())) {
    if take == 0 {
      continue;
    }
    let mut pool = build_pool_from(section, rng.gen(), pool_size.max(take), filter);
    pool.shuffle(rng);
    pool.truncate(take);
    selected.extend(pool);
  }
  selected.truncate(total);

  info!(target: "generator", requested = total, selected = selected.len(), "Questions selected");
  selected
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::StdRng, SeedableRng};

  fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
  }

  #[test]
  fn remainder_goes_to_the_first_sections() {
    assert_eq!(allotments(10, 3), vec![4, 3, 3]);
    assert_eq!(allotments(2, 3), vec![1, 1, 0]);
    assert_eq!(allotments(9, 3), vec![3, 3, 3]);
  }

  #[test]
  fn ten_over_three_sections_is_four_three_three() {
    let sections = [Section::Statics, Section::Dynamics, Section::Chemistry];
    let got = select_questions(&sections, 10, DifficultyFilter::Mixed, 60, &mut rng());
    assert_eq!(got.len(), 10);
    let count = |s: &Section| got.iter().filter(|q| &q.section == s).count();
    assert_eq!(count(&Section::Statics), 4);
    assert_eq!(count(&Section::Dynamics), 3);
    assert_eq!(count(&Section::Chemistry), 3);
  }

  #[test]
  fn returns_exact_count_when_pools_are_large_enough() {
    let sections: Vec<Section> = Section::ALL.to_vec();
    for total in [1usize, 13, 14, 40, 110] {
      let got = select_questions(&sections, total, DifficultyFilter::Mixed, 60, &mut rng());
      assert_eq!(got.len(), total);
    }
  }

  #[test]
  fn small_configured_pools_grow_to_the_allotment() {
    let sections = [Section::Mathematics, Section::Materials];
    let got = select_questions(&sections, 20, DifficultyFilter::Easy, 4, &mut rng());
    assert_eq!(got.len(), 20);
    assert_eq!(got.iter().filter(|q| q.section == Section::Mathematics).count(), 10);
  }

  #[test]
  fn a_single_section_fills_a_full_length_exam() {
    let got = select_questions(&[Section::Statics], 110, DifficultyFilter::Mixed, 60, &mut rng());
    assert_eq!(got.len(), 110);
    let mut ids: Vec<&str> = got.iter().map(|q| q.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 110, "questions must not repeat");
  }

  #[test]
  fn zero_count_or_no_sections_is_empty() {
    assert!(select_questions(&[Section::Statics], 0, DifficultyFilter::Mixed, 60, &mut rng()).is_empty());
    assert!(select_questions(&[], 5, DifficultyFilter::Mixed, 60, &mut rng()).is_empty());
  }

  #[test]
  fn fixed_filter_is_respected() {
    let got = select_questions(&[Section::FluidMechanics], 12, DifficultyFilter::Hard, 60, &mut rng());
    assert!(got.iter().all(|q| q.difficulty == crate::domain::Difficulty::Hard));
  }
}
