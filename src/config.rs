//! Environment-overridable configuration tying spec §6's table to concrete
//! `SessionConfig`/`PlannerConfig` values. Grounded in the teacher's
//! `os.environ`-driven `Cfg` pattern (`ag/config.py`-equivalent) and its own
//! root `src/config.rs`, scaled down from the teacher's `soulbase-config`
//! namespace store to a plain struct with a `from_env()` constructor — this
//! crate has one process-wide config, not a multi-tenant namespace registry.

use agent_planner::{PlannerConfig, PlannerMode};
use agent_session::SessionConfig;
use std::str::FromStr;

/// One row per spec §6 table entry; every field reads its environment
/// override at `from_env()` time and otherwise keeps the documented default.
#[derive(Debug, Clone)]
pub struct Config {
    pub max_steps: u32,
    pub page_timeout_ms: u64,
    pub text_budget: usize,
    pub model_text_budget: usize,
    pub plan_timeout_ms: u64,
    pub planner_mode: PlannerMode,
    pub auto_consent: bool,
    pub headless: bool,
    pub action_delay_ms: u64,
    pub demo_mode: bool,
    pub home_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_steps: 12,
            page_timeout_ms: 30_000,
            text_budget: 6_000,
            model_text_budget: 3_500,
            plan_timeout_ms: 180_000,
            planner_mode: PlannerMode::Hybrid,
            auto_consent: true,
            headless: false,
            action_delay_ms: 0,
            demo_mode: true,
            home_url: "https://google.com".to_string(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    /// Builds a `Config` from its defaults overlaid with `NAV_*` environment
    /// variables, per spec §6's table.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_steps: env_or("NAV_MAX_STEPS", defaults.max_steps),
            page_timeout_ms: env_or("NAV_PAGE_TIMEOUT_MS", defaults.page_timeout_ms),
            text_budget: env_or("NAV_TEXT_BUDGET", defaults.text_budget),
            model_text_budget: env_or("NAV_MODEL_TEXT_BUDGET", defaults.model_text_budget),
            plan_timeout_ms: env_or("NAV_PLAN_TIMEOUT_MS", defaults.plan_timeout_ms),
            planner_mode: std::env::var("NAV_PLANNER_MODE")
                .ok()
                .and_then(|v| PlannerMode::from_str(&v).ok())
                .unwrap_or(defaults.planner_mode),
            auto_consent: env_or("NAV_AUTO_CONSENT", defaults.auto_consent),
            headless: env_or("NAV_HEADLESS", defaults.headless),
            action_delay_ms: env_or("NAV_ACTION_DELAY_MS", defaults.action_delay_ms),
            demo_mode: env_or("NAV_DEMO_MODE", defaults.demo_mode),
            home_url: std::env::var("NAV_HOME_URL").unwrap_or(defaults.home_url),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_steps: self.max_steps,
            page_timeout_ms: self.page_timeout_ms,
            text_budget: self.text_budget,
            model_text_budget: self.model_text_budget,
            plan_timeout_ms: self.plan_timeout_ms,
            action_delay_ms: self.action_delay_ms,
            cursor_seed: None,
        }
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            mode: self.planner_mode,
            home_url: self.home_url.clone(),
            auto_consent: self.auto_consent,
            max_retries: 3,
        }
    }
}
