//! The hybrid decision engine: a cheap, declarative guard-rule cascade in
//! front of a language-model fallback with bounded retry and
//! structured-output validation. Emits exactly one `Action` per call.
//!
//! Grounded in `ag/plan.py`'s `Planner.next` (rule cascade, retry loop,
//! fallback) and the teacher's `agent-core::planner::rule_based`
//! (guard-first-wins dispatch structure), retargeted at a true per-step
//! planner rather than the teacher's upfront multi-step plan synthesis.

mod consts;
mod prompt;
mod rules;

use agent_types::{Action, ActionKind, Observation, ValidationError};
use browser_facade::LanguageModel;
use std::sync::Arc;
use structured_output::ParseError;
use thiserror::Error;

/// Whether the guard-rule cascade (rules 1-6) runs before the model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerMode {
    /// Guard rules run first; the model is a fallback. The default.
    Hybrid,
    /// Guard rules are skipped; every step goes straight to the model.
    Model,
}

impl std::str::FromStr for PlannerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hybrid" => Ok(PlannerMode::Hybrid),
            "model" => Ok(PlannerMode::Model),
            other => Err(format!("unknown planner mode '{other}', expected 'hybrid' or 'model'")),
        }
    }
}

/// Planner tuning, distinct from the session/browser config (`navigator`'s
/// `Config` builds one of these from its own `NAV_PLANNER_MODE`/
/// `NAV_AUTO_CONSENT` fields).
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub mode: PlannerMode,
    /// Fallback destination for rule 5 (extract-loop protection) and the
    /// model-exhaustion fallback.
    pub home_url: String,
    /// Enables rule 2 (cookie banner dismissal).
    pub auto_consent: bool,
    /// Bounded retry count for the model-call fallback (rule 7).
    pub max_retries: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mode: PlannerMode::Hybrid,
            home_url: "https://google.com".to_string(),
            auto_consent: true,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlannerError {
    /// The model's response never yielded a parseable JSON object. Recovered
    /// by the bounded retry inside `next()`; surfaced here only for callers
    /// that drive the parse/validate step directly.
    #[error("model response parsing failed: {0}")]
    Parse(#[from] ParseError),
    /// The parsed object failed schema validation. Also retried internally.
    #[error("model response failed validation: {0}")]
    Validation(#[from] ValidationError),
    /// The language model itself could not be reached (auth failure,
    /// transport error). Not retried — propagated to the caller immediately,
    /// the LM-auth-equivalent terminal condition from spec §7.
    #[error("language model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Extracts and validates a single action object from a raw model response.
fn parse_and_validate(raw: &str) -> Result<Action, PlannerError> {
    let value = structured_output::load_obj(raw)?;
    let action = agent_types::parse_action(&value)?;
    Ok(action)
}

/// Decides the next `Action` for one step, given the goal, the current
/// observation, and the memory view (newline-joined `WorkingMemory::view()`).
pub struct Planner {
    llm: Arc<dyn LanguageModel>,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(llm: Arc<dyn LanguageModel>, config: PlannerConfig) -> Self {
        Self { llm, config }
    }

    pub async fn next(
        &self,
        goal: &str,
        observation: &Observation,
        memory_view: &str,
    ) -> Result<Action, PlannerError> {
        if self.config.mode == PlannerMode::Hybrid {
            if let Some(action) = rules::bootstrap(goal, &observation.url, observation.step) {
                return Ok(action);
            }
            if let Some(action) = rules::cookie_consent(&self.config, &observation.text) {
                return Ok(action);
            }
            if let Some(action) = rules::search_site_heuristics(&observation.url, memory_view) {
                return Ok(action);
            }
            if let Some(action) = rules::captcha_block(&observation.url, &observation.text) {
                return Ok(action);
            }
            if let Some(action) = rules::extract_loop_protection(memory_view, &self.config.home_url) {
                return Ok(action);
            }
            if let Some(action) =
                rules::sparse_page(&observation.url, &observation.text, memory_view, observation.step)
            {
                return Ok(action);
            }
        }

        self.call_model(goal, observation, memory_view).await
    }

    /// Rule 7: the model-call fallback, with a bounded retry that re-prompts
    /// on a parse/validation failure or on a premature `extract`/`done` over
    /// an empty page, and a deterministic fallback once retries are spent.
    async fn call_model(
        &self,
        goal: &str,
        observation: &Observation,
        memory_view: &str,
    ) -> Result<Action, PlannerError> {
        let mut retry_error: Option<String> = None;

        for _ in 0..self.config.max_retries {
            let user = prompt::build_user_prompt(
                goal,
                &observation.url,
                observation.step,
                &observation.text,
                memory_view,
                retry_error.as_deref(),
            );
            let raw = self
                .llm
                .generate(prompt::SYSTEM_PROMPT, &user)
                .await
                .map_err(|e| PlannerError::ModelUnavailable(e.to_string()))?;

            match parse_and_validate(&raw) {
                Ok(action) => {
                    let page_empty = observation.text.trim().is_empty();
                    let premature_conclusion =
                        matches!(action.kind, ActionKind::Extract | ActionKind::Done { .. });
                    if page_empty && premature_conclusion && observation.step < 2 {
                        retry_error =
                            Some("the page is empty, gather more information before concluding".to_string());
                        continue;
                    }
                    return Ok(action);
                }
                Err(err) => {
                    retry_error = Some(err.to_string());
                    continue;
                }
            }
        }

        let fallback = if observation.text.trim().is_empty() {
            Action::with_thought(
                ActionKind::Navigate { url: self.config.home_url.clone() },
                "model exhausted retries on an empty page",
            )
        } else {
            Action::with_thought(ActionKind::Done { text: "error".into() }, "model exhausted retries")
        };
        Ok(fallback)
    }
}
