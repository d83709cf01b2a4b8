//! The perception/planning/actuation loop and its `AgentSession` owner (spec
//! §4.H, §4.I). Grounded in the teacher's `AgentLoopController::run`/
//! `execute_step` observe→decide→act cycle
//! (`agent-core::agent_loop::controller`), generalized from the teacher's
//! multi-action-per-step loop to this spec's strict one-`Action`-per-step
//! hybrid loop, and in the original `ag/app.py`'s `AgentSession.run` for the
//! exact per-action semantics §4.I implements in `dispatcher`.

mod config;
mod dispatcher;
mod errors;

pub use config::SessionConfig;
pub use dispatcher::DispatchOutcome;
pub use errors::SessionError;

use agent_planner::{Planner, PlannerError};
use agent_types::{is_looping, Action, ActionKind, Observation, RunResult, Step, WorkingMemory};
use browser_facade::BrowserFacade;
use cursor_path::CursorState;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

const LOOP_WARNING: &str = "SYSTEM WARNING: loop detected";
const POST_LOOP_TEXT_BUDGET: usize = 2_200;
const PLACEHOLDER_ANSWER: &str = "fine";

/// Owns the mutable per-run state (`Planner`, `WorkingMemory`, `CursorState`)
/// exclusively; the browser it drives is a shared `Arc<dyn BrowserFacade>`
/// whose lifetime the caller guarantees outlives the session (spec §3
/// Ownership).
pub struct AgentSession {
    browser: Arc<dyn BrowserFacade>,
    planner: Planner,
    memory: WorkingMemory,
    cursor: CursorState,
    config: SessionConfig,
}

impl AgentSession {
    pub fn new(browser: Arc<dyn BrowserFacade>, planner: Planner, config: SessionConfig) -> Self {
        Self { browser, planner, memory: WorkingMemory::default(), cursor: CursorState::new(), config }
    }

    /// Runs `goal` to completion: starts the browser, drives the loop for at
    /// most `max_steps` iterations, and guarantees teardown on every exit
    /// path (normal completion, step-budget exhaustion, timeout, or error).
    pub async fn run(&mut self, goal: &str) -> Result<RunResult, SessionError> {
        self.browser.start().await.map_err(|e| SessionError::BrowserFatal(e.to_string()))?;
        let outcome = self.run_inner(goal).await;
        let _ = self.browser.stop().await;
        outcome
    }

    async fn run_inner(&mut self, goal: &str) -> Result<RunResult, SessionError> {
        let mut result = RunResult::new(goal);
        let mut steps: VecDeque<Step> = VecDeque::new();

        for step in 0..self.config.max_steps {
            let observation = self.observe(step).await;

            if is_looping(&steps) {
                self.memory.add(LOOP_WARNING);
                warn!(step, "loop detected over last three actions");
            }

            let planner_observation = Observation {
                text: observation.text.chars().take(self.config.model_text_budget).collect(),
                ..observation.clone()
            };

            let plan = tokio::time::timeout(
                std::time::Duration::from_millis(self.config.plan_timeout_ms),
                self.planner.next(goal, &planner_observation, &self.memory.view()),
            )
            .await;

            let action = match plan {
                Ok(Ok(action)) => action,
                Ok(Err(PlannerError::ModelUnavailable(msg))) => {
                    return Err(SessionError::LmAuth(msg));
                }
                Ok(Err(other)) => {
                    // Parse/Validation errors are retried internally by the
                    // planner and never escape `next()` in practice; treat an
                    // unexpected one as a non-fatal noop rather than aborting
                    // the run.
                    self.memory.add(format!("WARNING: planner error: {other}"));
                    Action::new(ActionKind::Wait { ms: 0 })
                }
                Err(_) => {
                    let answer = format!("Timeout after {}ms", self.config.plan_timeout_ms);
                    info!(step, "planning timed out");
                    let terminal = Action::with_thought(
                        ActionKind::Done { text: answer.clone() },
                        "plan_timeout_ms exceeded",
                    );
                    steps.push_back(Step { action: terminal, observation: observation.clone() });
                    result.answer = answer;
                    result.steps = steps.into_iter().collect();
                    return Ok(result);
                }
            };

            debug!(step, action = action.kind.tag(), "dispatching action");
            steps.push_back(Step { action: action.clone(), observation: observation.clone() });

            let dispatch_outcome = dispatcher::dispatch(
                &action,
                self.browser.as_ref(),
                &mut self.cursor,
                &mut self.memory,
                &observation,
                &self.config,
            )
            .await;

            if let DispatchOutcome::Terminate { answer } = dispatch_outcome {
                result.answer = answer;
                result.steps = steps.into_iter().collect();
                return Ok(result);
            }

            if self.config.action_delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.config.action_delay_ms)).await;
            }
        }

        result.steps = steps.into_iter().collect();
        if result.answer.is_empty() {
            let tail = self.browser.extract_text(POST_LOOP_TEXT_BUDGET).await;
            result.answer = if tail.trim().is_empty() { PLACEHOLDER_ANSWER.to_string() } else { tail };
        }
        Ok(result)
    }

    /// Refreshes the observation for one step: url/title/text plus a
    /// best-effort screenshot whose failures are swallowed (spec §4.H step
    /// 1 — screenshotting is ambient diagnostics, never loop-blocking).
    async fn observe(&self, step: u32) -> Observation {
        let url = self.browser.url().await;
        let title = self.browser.title().await;
        let text = self.browser.extract_text(self.config.text_budget).await;
        let _ = self.browser.screenshot(&format!("step_{step:03}.png")).await;
        Observation { url, title, text, step }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_planner::PlannerConfig;
    use async_trait::async_trait;
    use browser_facade::{BrowserError, LanguageModel, LlmError, MockLanguageModel, NullBrowser, Snapshot};

    fn planner_with_mock() -> Planner {
        Planner::new(Arc::new(MockLanguageModel::new()), PlannerConfig::default())
    }

    #[tokio::test]
    async fn step_budget_bounds_planner_calls_and_sets_answer_once() {
        let browser: Arc<dyn BrowserFacade> =
            Arc::new(NullBrowser::new(Snapshot::new("https://example.com", "Example", "hello"), vec![]));
        let config = SessionConfig { max_steps: 3, plan_timeout_ms: 5_000, ..SessionConfig::default() };
        let mut session = AgentSession::new(browser, planner_with_mock(), config);
        let result = session.run("find something").await.unwrap();
        assert!(result.steps.len() <= 3);
        assert!(!result.answer.is_empty());
    }

    #[tokio::test]
    async fn loop_detection_warns_after_three_identical_actions() {
        struct StubBrowser;
        #[async_trait]
        impl BrowserFacade for StubBrowser {
            async fn start(&self) -> Result<(), BrowserError> { Ok(()) }
            async fn stop(&self) -> Result<(), BrowserError> { Ok(()) }
            async fn url(&self) -> String { "https://example.com".into() }
            async fn title(&self) -> String { "Example".into() }
            async fn extract_text(&self, _budget: usize) -> String { String::new() }
            async fn screenshot(&self, _path: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn goto(&self, _url: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn back(&self) -> Result<(), BrowserError> { Ok(()) }
            async fn scroll(&self, _dy: i32) -> Result<(), BrowserError> { Ok(()) }
            async fn press(&self, _key: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn type_into(&self, _selector: &str, _text: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn bbox_center(&self, _selector: &str) -> Option<browser_facade::BboxCenter> {
                Some((10.0, 10.0, 20.0))
            }
            async fn move_cursor(&self, _x: f64, _y: f64) -> Result<(), BrowserError> { Ok(()) }
            async fn click_at(&self, _x: f64, _y: f64) -> Result<(), BrowserError> { Ok(()) }
            async fn set_status(&self, _message: &str) -> Result<(), BrowserError> { Ok(()) }
            fn headless(&self) -> bool { true }
            fn demo_mode(&self) -> bool { false }
        }

        struct AlwaysClick;
        #[async_trait]
        impl LanguageModel for AlwaysClick {
            async fn generate(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
                Ok(r#"{"action":"click","selector":"#same"}"#.to_string())
            }
        }

        let browser: Arc<dyn BrowserFacade> = Arc::new(StubBrowser);
        let planner = Planner::new(Arc::new(AlwaysClick), PlannerConfig::default());
        let config = SessionConfig { max_steps: 4, plan_timeout_ms: 5_000, ..SessionConfig::default() };
        let mut session = AgentSession::new(browser, planner, config);
        let _ = session.run("click repeatedly").await.unwrap();
        assert!(session.memory.view().contains(LOOP_WARNING));
    }

    #[tokio::test]
    async fn plan_timeout_terminates_quickly_with_timeout_answer() {
        struct SlowLlm;
        #[async_trait]
        impl LanguageModel for SlowLlm {
            async fn generate(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                Ok(r#"{"action":"done","text":"too slow"}"#.to_string())
            }
        }

        let browser: Arc<dyn BrowserFacade> = Arc::new(NullBrowser::empty());
        let planner = Planner::new(Arc::new(SlowLlm), PlannerConfig::default());
        let config = SessionConfig { max_steps: 5, plan_timeout_ms: 10, ..SessionConfig::default() };
        let mut session = AgentSession::new(browser, planner, config);

        let started = std::time::Instant::now();
        let result = session.run("anything").await.unwrap();
        assert!(started.elapsed() < std::time::Duration::from_millis(500));
        assert!(result.answer.starts_with("Timeout"));
    }

    #[tokio::test]
    async fn model_unavailable_propagates_as_lm_auth_error() {
        struct RefusingLlm;
        #[async_trait]
        impl LanguageModel for RefusingLlm {
            async fn generate(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
                Err(LlmError::AuthRequired("no api key".into()))
            }
        }

        let browser: Arc<dyn BrowserFacade> = Arc::new(NullBrowser::empty());
        let planner = Planner::new(Arc::new(RefusingLlm), PlannerConfig::default());
        let mut session = AgentSession::new(browser, planner, SessionConfig::default());
        let err = session.run("anything").await.unwrap_err();
        assert!(matches!(err, SessionError::LmAuth(_)));
    }

    #[tokio::test]
    async fn browser_start_failure_surfaces_as_browser_fatal() {
        struct DeadOnArrival;
        #[async_trait]
        impl BrowserFacade for DeadOnArrival {
            async fn start(&self) -> Result<(), BrowserError> {
                Err(BrowserError::DriverUnavailable("no display".into()))
            }
            async fn stop(&self) -> Result<(), BrowserError> { Ok(()) }
            async fn url(&self) -> String { String::new() }
            async fn title(&self) -> String { String::new() }
            async fn extract_text(&self, _budget: usize) -> String { String::new() }
            async fn screenshot(&self, _path: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn goto(&self, _url: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn back(&self) -> Result<(), BrowserError> { Ok(()) }
            async fn scroll(&self, _dy: i32) -> Result<(), BrowserError> { Ok(()) }
            async fn press(&self, _key: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn type_into(&self, _selector: &str, _text: &str) -> Result<(), BrowserError> { Ok(()) }
            async fn bbox_center(&self, _selector: &str) -> Option<browser_facade::BboxCenter> { None }
            async fn move_cursor(&self, _x: f64, _y: f64) -> Result<(), BrowserError> { Ok(()) }
            async fn click_at(&self, _x: f64, _y: f64) -> Result<(), BrowserError> { Ok(()) }
            async fn set_status(&self, _message: &str) -> Result<(), BrowserError> { Ok(()) }
        }

        let browser: Arc<dyn BrowserFacade> = Arc::new(DeadOnArrival);
        let mut session = AgentSession::new(browser, planner_with_mock(), SessionConfig::default());
        let err = session.run("anything").await.unwrap_err();
        assert!(matches!(err, SessionError::BrowserFatal(_)));
    }
}
