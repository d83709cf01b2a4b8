//! The deterministic guard cascade, rules 1-6 of spec §4.G. Each rule is a
//! plain function returning `Some(Action)` on a match; `Planner::next` tries
//! them in order and falls through to the model call on an all-`None` pass.
//! Grounded in `ag/plan.py`'s `Planner.next` cascade and `ag/consts.py`'s
//! site/selector tables, generalized to the richer rule set spec.md names.

use crate::consts::{CAPTCHA_MARKERS, CONSENT_PHRASES, COOKIE_CONSENT_SELECTORS, KNOWN_SITES};
use crate::PlannerConfig;
use agent_types::{Action, ActionKind};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(https?://\S+|\b[a-z0-9-]+\.(?:com|org|net|io|it)(?:/\S*)?\b)").unwrap());

static INTERACTIVE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s").unwrap());

fn extract_url_token(goal: &str) -> Option<String> {
    let m = URL_TOKEN.find(goal)?;
    let found = m.as_str();
    if found.starts_with("http") {
        Some(found.to_string())
    } else {
        Some(format!("https://{found}"))
    }
}

fn known_site_url(goal: &str) -> Option<String> {
    let lower = goal.to_lowercase();
    KNOWN_SITES.iter().find(|(site, _)| lower.contains(site)).map(|(_, url)| url.to_string())
}

/// Count entries in the "interactive elements" index prefix of `text`
/// (numbered lines, per `JS_EXTRACT_TEXT`'s output format). Text the core
/// never parses beyond this one heuristic.
fn count_interactive_elements(text: &str) -> usize {
    INTERACTIVE_LINE.find_iter(text).count()
}

fn is_search_results_page(url: &str) -> bool {
    url.to_lowercase().contains("/search")
}

/// Rule 1 — bootstrap: an empty first observation plus a goal that either
/// spells out a URL or names a known site resolves directly, skipping the
/// model entirely.
pub fn bootstrap(goal: &str, url: &str, step: u32) -> Option<Action> {
    if step != 0 {
        return None;
    }
    let lower = url.to_lowercase();
    if !(url.is_empty() || lower == "about:blank") {
        return None;
    }
    if let Some(target) = extract_url_token(goal) {
        return Some(Action::with_thought(ActionKind::Navigate { url: target }, "URL found in goal"));
    }
    if let Some(target) = known_site_url(goal) {
        return Some(Action::with_thought(ActionKind::Navigate { url: target }, "known site requested"));
    }
    None
}

/// Rule 2 — cookie banner: a configured consent phrase in the page text
/// triggers a click on a known selector, falling back to a generic dialog
/// button guess.
pub fn cookie_consent(cfg: &PlannerConfig, text: &str) -> Option<Action> {
    if !cfg.auto_consent {
        return None;
    }
    let lower = text.to_lowercase();
    if !CONSENT_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return None;
    }
    let selector = COOKIE_CONSENT_SELECTORS.first().copied().unwrap_or("[role='dialog'] button").to_string();
    Some(Action::with_thought(ActionKind::Click { selector }, "dismissing cookie banner"))
}

/// Rule 3 — search-site heuristics: finish a just-typed query with Enter,
/// or jump straight to the first result on a results page.
pub fn search_site_heuristics(url: &str, memory_view: &str) -> Option<Action> {
    let lower = url.to_lowercase();
    let on_search_host =
        lower.contains("google.") || lower.contains("bing.") || lower.contains("duckduckgo.com");
    if !on_search_host {
        return None;
    }
    let lines: Vec<&str> = memory_view.lines().collect();
    if let Some(last_type_idx) = lines.iter().rposition(|line| line.starts_with("type ")) {
        let pressed_since = lines[last_type_idx + 1..].iter().any(|line| line.starts_with("press Enter"));
        if !pressed_since {
            return Some(Action::with_thought(ActionKind::Press { key: "Enter".into() }, "submitting search"));
        }
    }
    if is_search_results_page(&lower) {
        return Some(Action::with_thought(ActionKind::Click { selector: "h3".into() }, "opening first result"));
    }
    None
}

/// Rule 4 — captcha block: never hand a blocked page to the model, which
/// could otherwise keep retrying `type`/`click` against a wall.
pub fn captcha_block(url: &str, text: &str) -> Option<Action> {
    let haystack = format!("{} {}", url.to_lowercase(), text.to_lowercase());
    if CAPTCHA_MARKERS.iter().any(|marker| haystack.contains(marker)) {
        return Some(Action::with_thought(
            ActionKind::Done { text: format!("Blocked by anti-bot verification at {url}") },
            "anti-bot block detected",
        ));
    }
    None
}

/// Rule 5 — extract loop protection: three prior `extract`s with no
/// progress means the page isn't yielding anything new; bail back home.
pub fn extract_loop_protection(memory_view: &str, home_url: &str) -> Option<Action> {
    let extracts = memory_view.lines().filter(|line| *line == "extract").count();
    if extracts >= 3 {
        return Some(Action::with_thought(
            ActionKind::Navigate { url: home_url.to_string() },
            "too many extracts without progress, returning home",
        ));
    }
    None
}

/// Rule 6 — sparse page: a freshly-loaded page with almost no interactive
/// elements is probably still rendering; scroll once to coax more content
/// in rather than burning a model call on it.
pub fn sparse_page(url: &str, text: &str, memory_view: &str, step: u32) -> Option<Action> {
    let lower = url.to_lowercase();
    if url.is_empty() || lower == "about:blank" {
        // Nothing to scroll yet; let the bootstrap rule or the model decide
        // where to go first instead of scrolling a blank tab.
        return None;
    }
    if is_search_results_page(url) {
        return None;
    }
    if step >= 3 {
        return None;
    }
    if memory_view.lines().any(|line| line.starts_with("scroll ")) {
        return None;
    }
    if count_interactive_elements(text) >= 3 {
        return None;
    }
    Some(Action::with_thought(ActionKind::Scroll { dy: 700 }, "page looks sparse, scrolling for more content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_resolves_explicit_url() {
        let action = bootstrap("open github.com/test", "about:blank", 0).unwrap();
        assert_eq!(action.kind, ActionKind::Navigate { url: "https://github.com/test".into() });
    }

    #[test]
    fn bootstrap_resolves_known_site_by_name() {
        let action = bootstrap("open openai", "about:blank", 0).unwrap();
        assert_eq!(action.kind, ActionKind::Navigate { url: "https://openai.com".into() });
    }

    #[test]
    fn bootstrap_skips_past_first_step() {
        assert!(bootstrap("open openai", "about:blank", 1).is_none());
    }

    #[test]
    fn captcha_block_never_suggests_typing() {
        let action = captcha_block("https://duckduckgo.com/?q=x", "please complete the captcha").unwrap();
        assert!(matches!(action.kind, ActionKind::Done { .. }));
    }

    #[test]
    fn search_heuristic_presses_enter_after_type() {
        let action = search_site_heuristics("https://google.com/", "type #APjFqb=test").unwrap();
        assert_eq!(action.kind, ActionKind::Press { key: "Enter".into() });
    }

    #[test]
    fn search_heuristic_clicks_result_on_results_page() {
        let action = search_site_heuristics("https://google.com/search?q=test", "type #APjFqb=test\npress Enter").unwrap();
        assert_eq!(action.kind, ActionKind::Click { selector: "h3".into() });
    }

    #[test]
    fn extract_loop_protection_triggers_at_three() {
        let mem = "extract\nextract\nextract";
        let action = extract_loop_protection(mem, "https://google.com").unwrap();
        assert_eq!(action.kind, ActionKind::Navigate { url: "https://google.com".into() });
    }

    #[test]
    fn sparse_page_scrolls_when_few_elements_and_early() {
        let action = sparse_page("https://example.com", "1. [A] link => a.x", "", 1).unwrap();
        assert_eq!(action.kind, ActionKind::Scroll { dy: 700 });
    }

    #[test]
    fn sparse_page_skips_search_results() {
        assert!(sparse_page("https://google.com/search?q=x", "", "", 1).is_none());
    }

    #[test]
    fn sparse_page_skips_blank_starting_tab() {
        assert!(sparse_page("about:blank", "", "", 0).is_none());
    }
}
