//! Offline reference stack: an in-memory scripted `BrowserFacade`
//! (`NullBrowser`) and a rule-driven `LanguageModel` (`MockLanguageModel`),
//! wired up for the `run --offline` and `demo` subcommands. Grounded in the
//! teacher's `src/cli/demo.rs` pattern of shipping a canned, network-free
//! walkthrough alongside the real commands.

use agent_planner::Planner;
use agent_session::{AgentSession, SessionConfig};
use browser_facade::{BrowserFacade, MockLanguageModel, NullBrowser, Snapshot};
use std::sync::Arc;

use crate::config::Config;

/// A short scripted Google-style search: blank tab → homepage → results
/// page, enough for the planner's search-site guard rules (spec §4.G rule 3)
/// to drive without any model call past the first step.
pub fn scripted_search_browser(headless: bool) -> Arc<dyn BrowserFacade> {
    let homepage = Snapshot::new(
        "https://google.com/",
        "Google",
        "1. [INPUT] \"Search\" => #APjFqb\n2. [A] \"Images\" => a.gb1\n3. [A] \"About\" => a.about",
    );
    let results = Snapshot::new(
        "https://google.com/search?q=rust+programming+language+tutorials",
        "rust programming language tutorials - Google Search",
        "1. [A] \"The Rust Programming Language\" => h3\n2. [A] \"Rust by Example\" => h3",
    );
    Arc::new(
        NullBrowser::new(Snapshot::new("about:blank", "", ""), vec![homepage, results])
            .with_headless(headless),
    )
}

/// Builds an `AgentSession` driven entirely by in-process stand-ins: no
/// network, no real browser, deterministic cursor paths when `seed` is set.
pub fn offline_session(config: &Config, seed: Option<u64>) -> AgentSession {
    let browser = scripted_search_browser(config.headless);
    let llm = Arc::new(MockLanguageModel::new());
    let planner = Planner::new(llm, config.planner_config());
    let mut session_config = config.session_config();
    session_config.cursor_seed = seed;
    AgentSession::new(browser, planner, session_config)
}

/// The same offline stack, but starting from a blank tab rather than a
/// pre-scripted page — used by `run --offline <goal>` where the goal (not a
/// fixed walkthrough) decides where the planner navigates first.
pub fn offline_session_blank(config: &Config, seed: Option<u64>) -> AgentSession {
    let browser: Arc<dyn BrowserFacade> =
        Arc::new(NullBrowser::empty().with_headless(config.headless));
    let llm = Arc::new(MockLanguageModel::new());
    let planner = Planner::new(llm, config.planner_config());
    let mut session_config = config.session_config();
    session_config.cursor_seed = seed;
    AgentSession::new(browser, planner, session_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_search_completes_without_hitting_the_step_budget() {
        let config = Config { max_steps: 8, ..Config::default() };
        let mut session = offline_session(&config, Some(7));
        let result = session.run("search for rust programming language tutorials").await.unwrap();
        assert!(result.steps.len() < 8);
        assert!(!result.answer.is_empty());
    }
}
