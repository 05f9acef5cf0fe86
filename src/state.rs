//! Application state: prompts, generation settings and the optional OpenAI client.
//!
//! Everything here is read-only after startup. Quizzes and attempts are not
//! stored: the client sends back the questions it wants graded.

use tracing::{info, instrument};

use crate::config::{load_quiz_config_from_env, GenerationCfg, Prompts};
use crate::openai::OpenAI;

#[derive(Clone)]
pub struct AppState {
    pub prompts: Prompts,
    pub generation: GenerationCfg,
    pub openai: Option<OpenAI>,
}

impl AppState {
    /// Build state from env: load config, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_quiz_config_from_env().unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "fe_practice", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "fe_practice", "OpenAI disabled (no OPENAI_API_KEY). Using template generator.");
        }

        info!(
            target: "fe_practice",
            pool_size = cfg.generation.pool_size,
            level = ?cfg.generation.validation_level,
            max_count = cfg.generation.max_count,
            "Generation settings"
        );

        Self::with_parts(cfg.prompts, cfg.generation, openai)
    }

    pub fn with_parts(prompts: Prompts, generation: GenerationCfg, openai: Option<OpenAI>) -> Self {
        Self { prompts, generation, openai }
    }
}
