//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs request parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, Json, response::{IntoResponse, Response}};
use tracing::{info, instrument, warn};

use crate::domain::Section;
use crate::error::GenerationError;
use crate::generator::{generate_quiz, QuizRequest};
use crate::grading::grade_quiz;
use crate::handbook::suggest_sections;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn http_get_sections() -> impl IntoResponse {
  let sections = Section::ALL.iter().map(section_out).collect::<Vec<_>>();
  Json(SectionsOut { sections })
}

#[instrument(level = "info", fields(topic_len = q.topic.len()))]
pub async fn http_get_suggest(Query(q): Query<SuggestQuery>) -> impl IntoResponse {
  let sections = suggest_sections(&q.topic);
  info!(target: "fe_practice", matches = sections.len(), "Handbook sections suggested");
  Json(SuggestOut { topic: q.topic, sections })
}

#[instrument(level = "info", skip(state, body), fields(sections = body.sections.len(), count = body.count, difficulty = ?body.difficulty, mode = ?body.mode))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateIn>,
) -> Response {
  let cfg = &state.generation;
  let mcq_fraction = body.resolved_mcq_fraction(cfg.mcq_fraction);
  let req = match QuizRequest::new(body.sections, body.difficulty, body.count, mcq_fraction, body.mode, cfg.max_count) {
    Ok(req) => req,
    Err(e) => return error_response(&e),
  };

  match generate_quiz(&state, &req).await {
    Ok(quiz) => {
      info!(target: "fe_practice", id = %quiz.id, questions = quiz.questions.len(), "HTTP quiz served");
      Json(quiz).into_response()
    }
    Err(e) => error_response(&e),
  }
}

#[instrument(level = "info", skip(body), fields(quiz_id = %body.quiz_id, questions = body.questions.len(), answers = body.answers.len()))]
pub async fn http_post_grade(Json(body): Json<GradeIn>) -> impl IntoResponse {
  let (attempt, answers) = grade_quiz(&body.quiz_id, &body.questions, &body.answers, &body.sections, body.mode);
  info!(target: "fe_practice", id = %attempt.id, overall = attempt.overall_score, "HTTP attempt graded");
  Json(GradeOut { attempt, answers })
}

fn error_response(e: &GenerationError) -> Response {
  let status = match e {
    GenerationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    GenerationError::Empty | GenerationError::NoValidQuestions { .. } => StatusCode::SERVICE_UNAVAILABLE,
  };
  warn!(target: "fe_practice", %status, error = %e, "Quiz generation rejected");
  (status, Json(ErrorOut { error: e.to_string() })).into_response()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invalid_requests_are_client_errors() {
    let res = error_response(&GenerationError::InvalidRequest("count must be positive, got 0".into()));
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn generation_failures_are_unavailable() {
    assert_eq!(error_response(&GenerationError::Empty).status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
      error_response(&GenerationError::NoValidQuestions { generated: 3 }).status(),
      StatusCode::SERVICE_UNAVAILABLE
    );
  }
}
