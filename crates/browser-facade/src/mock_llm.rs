use crate::llm::{LanguageModel, LlmError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

/// Deterministic, rule-driven stand-in for a real language model: used by
/// the planner's own test suite and the CLI's `--offline` run mode.
///
/// Mirrors the call count it has seen so far (rather than inspecting the
/// prompt text) to decide what to answer, the same call-count-driven
/// determinism the reference mock planner decision uses: click on the
/// first couple of calls, then finish.
#[derive(Debug, Default)]
pub struct MockLanguageModel {
    calls: AtomicU32,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let action = match call {
            0 => r#"{"thought": "locating the primary control", "action": "click", "selector": "#primary"}"#,
            1 => r#"{"thought": "confirming the result", "action": "extract"}"#,
            _ => r#"{"thought": "goal satisfied", "action": "done", "text": "Done."}"#,
        };
        Ok(action.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn advances_to_done_after_three_calls() {
        let llm = MockLanguageModel::new();
        let _ = llm.generate("sys", "user").await.unwrap();
        let _ = llm.generate("sys", "user").await.unwrap();
        let third = llm.generate("sys", "user").await.unwrap();
        assert!(third.contains("\"done\""));
    }
}
