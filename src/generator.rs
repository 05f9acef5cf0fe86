//! Quiz assembly.
//!
//! Without a provider the template selection engine fills the whole quiz.
//! With one, every slot is requested from the model first (async, one call
//! per slot, a bounded number in flight, replies kept in slot order) and the replies are then assembled synchronously: a reply that
//! fails to parse or breaks the schema is replaced by a template question for
//! that slot only. Either way the candidates go through the compliance
//! validator before the quiz is built.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use rand::Rng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::GenerationCfg;
use crate::domain::{Difficulty, DifficultyFilter, Mode, Question, QuestionKind, Quiz, Section};
use crate::error::{GenerationError, ProviderError, QuestionError};
use crate::pool::build_pool_from;
use crate::provider::{check_schema, parse_question};
use crate::selection::select_questions;
use crate::state::AppState;
use crate::templates::templates_for;
use crate::validator::{validate, ValidationLevel};

/// A validated quiz request.
#[derive(Clone, Debug)]
pub struct QuizRequest {
  pub sections: Vec<Section>,
  pub difficulty: DifficultyFilter,
  pub count: usize,
  /// Share of MCQ items on the provider path, in [0, 1].
  pub mcq_fraction: f64,
  pub mode: Mode,
}

impl QuizRequest {
  pub fn new(
    sections: Vec<Section>,
    difficulty: DifficultyFilter,
    count: i64,
    mcq_fraction: f64,
    mode: Mode,
    max_count: usize,
  ) -> Result<Self, GenerationError> {
    if sections.is_empty() {
      return Err(GenerationError::InvalidRequest("Missing or invalid sections".into()));
    }
    if count <= 0 {
      return Err(GenerationError::InvalidRequest(format!("count must be positive, got {}", count)));
    }
    if count as u64 > max_count as u64 {
      return Err(GenerationError::InvalidRequest(format!("count must be at most {}, got {}", max_count, count)));
    }
    if !(0.0..=1.0).contains(&mcq_fraction) {
      return Err(GenerationError::InvalidRequest(format!("mcqFraction must be within [0, 1], got {}", mcq_fraction)));
    }
    Ok(Self { sections, difficulty, count: count as usize, mcq_fraction, mode })
  }
}

/// One provider request: where the item goes and what was asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
  pub section: Section,
  pub difficulty: Difficulty,
  pub kind: QuestionKind,
  pub seed: u32,
}

/// `round(mcq_fraction * count)` MCQ slots followed by numeric slots; each
/// run cycles through the sections from the first one.
pub fn plan_slots(req: &QuizRequest, seed_base: u32) -> Vec<Slot> {
  let mcq = ((req.mcq_fraction * req.count as f64).round() as usize).min(req.count);
  let runs = [(QuestionKind::Mcq, mcq), (QuestionKind::Numeric, req.count - mcq)];

  let mut slots = Vec::with_capacity(req.count);
  for (kind, n) in runs {
    for i in 0..n {
      slots.push(Slot {
        section: req.sections[i % req.sections.len()].clone(),
        difficulty: req.difficulty.for_index(i),
        kind,
        seed: seed_base.wrapping_add(slots.len() as u32),
      });
    }
  }
  slots
}

/// Candidates probed from a section pool when a slot falls back to templates.
const FALLBACK_PROBE: usize = 6;

/// Template stand-in for a slot, preferring an item of the requested kind.
pub fn template_for_slot(slot: &Slot) -> Option<Question> {
  let probe = FALLBACK_PROBE.max(templates_for(&slot.section).len());
  let mut pool = build_pool_from(&slot.section, slot.seed, probe, DifficultyFilter::from(slot.difficulty));
  let pick = pool.iter().position(|q| q.kind == slot.kind).unwrap_or(0);
  (!pool.is_empty()).then(|| pool.swap_remove(pick))
}

/// Pair each slot with its provider reply; failures fall back per slot.
pub fn assemble_from_provider(slots: &[Slot], replies: Vec<Result<String, ProviderError>>) -> Vec<Question> {
  let mut out = Vec::with_capacity(slots.len());
  let mut fallbacks = 0usize;

  for (slot, reply) in slots.iter().zip(replies) {
    match reply.and_then(|raw| parse_question(&raw)) {
      Ok(q) => {
        debug!(target: "generator", id = %q.id, section = %q.section, "Provider question accepted");
        out.push(q);
      }
      Err(e) => {
        warn!(target: "generator", section = %slot.section, kind = slot.kind.as_str(), error = %e, "Provider item rejected; using template");
        fallbacks += 1;
        out.extend(template_for_slot(slot));
      }
    }
  }

  info!(target: "generator", slots = slots.len(), fallbacks, "Provider batch assembled");
  out
}

/// Drop questions that fail the schema or compliance checks, logging why.
pub fn filter_valid(candidates: Vec<Question>, level: ValidationLevel) -> Vec<Question> {
  candidates
    .into_iter()
    .filter(|q| {
      if let Err(e) = check_schema(q) {
        warn!(target: "validator", error = %e, "Question discarded");
        return false;
      }
      let result = validate(q, level);
      if result.has_notes() {
        debug!(
          target: "validator",
          id = %q.id,
          errors = ?result.errors,
          warnings = ?result.warnings,
          suggestions = ?result.suggestions,
          "Question validation notes"
        );
      }
      if !result.is_valid {
        let failure = QuestionError::ComplianceFailure { id: q.id.clone(), errors: result.errors };
        warn!(target: "validator", error = %failure, "Question discarded");
      }
      result.is_valid
    })
    .collect()
}

/// Validate candidates and wrap the survivors in a quiz.
pub fn finish_quiz(candidates: Vec<Question>, req: &QuizRequest, cfg: &GenerationCfg) -> Result<Quiz, GenerationError> {
  if candidates.is_empty() {
    return Err(GenerationError::Empty);
  }
  let generated = candidates.len();
  let mut questions = filter_valid(candidates, cfg.validation_level);
  if questions.is_empty() {
    return Err(GenerationError::NoValidQuestions { generated });
  }
  questions.truncate(req.count);

  let quiz = Quiz {
    id: format!("quiz-{}", Uuid::new_v4()),
    sections: req.sections.clone(),
    mode: req.mode,
    questions,
    time_limit: (req.mode == Mode::Timed).then_some(cfg.exam_time_limit),
    created_at: Utc::now(),
  };
  info!(target: "generator", quiz_id = %quiz.id, generated, kept = quiz.questions.len(), "Quiz assembled");
  Ok(quiz)
}

/// Template-only generation.
pub fn generate_from_templates<R: Rng + ?Sized>(
  req: &QuizRequest,
  cfg: &GenerationCfg,
  rng: &mut R,
) -> Result<Quiz, GenerationError> {
  let candidates = select_questions(&req.sections, req.count, req.difficulty, cfg.pool_size, rng);
  finish_quiz(candidates, req, cfg)
}

/// Build a quiz, going through the provider when one is configured.
///
/// Provider calls run at most `provider_concurrency` at a time, so a quiz
/// takes roughly `ceil(count / concurrency)` client timeouts in the worst case.
#[instrument(level = "info", skip_all, fields(sections = req.sections.len(), count = req.count, provider = state.openai.is_some()))]
pub async fn generate_quiz(state: &AppState, req: &QuizRequest) -> Result<Quiz, GenerationError> {
  let Some(oa) = &state.openai else {
    debug!(target: "generator", mcq_fraction = req.mcq_fraction, "No provider; template mix decides the question types");
    return generate_from_templates(req, &state.generation, &mut rand::thread_rng());
  };

  let slots = plan_slots(req, rand::random());
  let replies: Vec<Result<String, ProviderError>> = stream::iter(slots.clone())
    .map(|slot| async move {
      oa.generate_question_raw(&state.prompts, &slot.section, slot.difficulty, slot.kind)
        .await
        .map_err(ProviderError::Call)
    })
    .buffered(state.generation.provider_concurrency.max(1))
    .collect()
    .await;

  finish_quiz(assemble_from_provider(&slots, replies), req, &state.generation)
}
