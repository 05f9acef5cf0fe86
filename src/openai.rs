//! Minimal OpenAI client for question generation.
//!
//! We only call chat.completions and return the raw reply text; turning it
//! into a `Question` is `provider::parse_question`'s job. Calls are
//! instrumented and log model names, latencies and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::{Difficulty, QuestionKind, Section};
use crate::handbook::handbook_hints;
use crate::util::fill_template;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// Chat completion in JSON mode; the reply body is returned untouched.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json(
    &self,
    system: &str,
    user: &str,
    temperature: f32,
    max_tokens: Option<u32>,
  ) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      max_tokens,
      response_format: ResponseFormat { kind: "json_object" },
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "fe-practice-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or(body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    Ok(body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default())
  }

  /// Ask the model for one question and return its raw reply.
  #[instrument(level = "info", skip(self, prompts), fields(%section, difficulty = difficulty.as_str(), kind = kind.as_str()))]
  pub async fn generate_question_raw(
    &self,
    prompts: &Prompts,
    section: &Section,
    difficulty: Difficulty,
    kind: QuestionKind,
  ) -> Result<String, String> {
    let user = question_user_prompt(prompts, section, difficulty, kind);
    let start = std::time::Instant::now();
    let result = self.chat_json(&prompts.question_system, &user, 0.9, Some(1500)).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(text) => info!(?elapsed, response_len = text.len(), "Model response received"),
      Err(e) => error!(?elapsed, error = %e, "Model call failed during question generation"),
    }
    result
  }
}

/// Fill the user prompt, appending the section's handbook hints when known.
pub fn question_user_prompt(prompts: &Prompts, section: &Section, difficulty: Difficulty, kind: QuestionKind) -> String {
  let hints = handbook_hints(section);
  let handbook_context = if hints.is_empty() {
    String::new()
  } else {
    format!("\n\nFE HANDBOOK REFERENCE FOR {}:\n{}", section.name().to_uppercase(), hints.join("\n"))
  };
  let kind_phrase = match kind {
    QuestionKind::Mcq => "multiple-choice",
    QuestionKind::Numeric => "numeric answer",
  };
  fill_template(
    &prompts.question_user_template,
    &[
      ("kind", kind_phrase),
      ("section", section.name()),
      ("difficulty", difficulty.as_str()),
      ("handbook_context", &handbook_context),
    ],
  )
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
  response_format: ResponseFormat,
}
#[derive(Serialize)]
struct ResponseFormat {
  #[serde(rename = "type")]
  kind: &'static str,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
