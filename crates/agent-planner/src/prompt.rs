//! Prompt assembly for the model-call fallback (rule 7). Grounded in
//! `ag/plan.py`'s `SYS` constant and its per-call user-prompt template,
//! translated out of the original's Italian copy into the English the rest
//! of this crate uses, with the same structure: a fixed system prompt plus a
//! per-step user prompt carrying goal/state/text/memory and situational
//! hints.

pub const TEXT_EXCERPT_BUDGET: usize = 2000;

pub const SYSTEM_PROMPT: &str = "You are a web navigation agent driving a real browser to complete a user's goal.\n\
Always respond with a single valid JSON object, never plain prose.\n\n\
JSON SCHEMA:\n\
{\n  \"thought\": \"short rationale\",\n  \"action\": \"navigate\" | \"click\" | \"type\" | \"press\" | \"scroll\" | \"wait\" | \"extract\" | \"back\" | \"done\",\n  \"url\": \"...\" (navigate only),\n  \"selector\": \"CSS selector\" (click, type),\n  \"text\": \"...\" (type, done),\n  \"key\": \"Enter\" | \"Tab\" | ... (press),\n  \"dy\": 700 (scroll, positive is down),\n  \"ms\": 1000 (wait)\n}\n\n\
RULES:\n\
1. SEARCH: if you need to search and you're not on a search engine, navigate there first. If already on one, don't reload it: type into the search box, then press Enter.\n\
2. ELEMENTS: use the interactive-elements index in the page text to find selectors. If something isn't there yet, wait or scroll.\n\
3. RECOVERY: if an action failed (see memory), try a different approach.\n\
4. EXTRACTION: use 'extract' to read the visible text, then reason about it from memory.\n\
5. COMPLETION: once the goal is satisfied, use action 'done' with the final answer in 'text'.\n";

/// Situational hints appended to the user prompt: loop detection already
/// flagged by the session, a near-empty page, or a likely anti-bot block.
pub fn build_hints(url: &str, text: &str, memory_view: &str) -> Vec<&'static str> {
    let mut hints = Vec::new();
    if memory_view.contains("SYSTEM WARNING: loop detected") {
        hints.push("LOOP");
    }
    if text.trim().is_empty() {
        hints.push("EMPTY PAGE");
    }
    let haystack = format!("{} {}", url.to_lowercase(), text.to_lowercase());
    if crate::consts::CAPTCHA_MARKERS.iter().any(|marker| haystack.contains(marker)) {
        hints.push("BLOCK");
    }
    hints
}

/// Per-step user prompt: goal, state, a bounded text excerpt, memory, and
/// any hints, followed by the retry error line when `retry_error` is set.
pub fn build_user_prompt(
    goal: &str,
    url: &str,
    step: u32,
    text: &str,
    memory_view: &str,
    retry_error: Option<&str>,
) -> String {
    let excerpt: String = text.chars().take(TEXT_EXCERPT_BUDGET).collect();
    let hints = build_hints(url, text, memory_view);
    let mut prompt = format!(
        "GOAL:\n{goal}\n\nSTATE:\nurl={url}\nstep={step}\n\nPAGE TEXT (excerpt):\n{excerpt}\n\nMEMORY:\n{memory_view}\n"
    );
    if !hints.is_empty() {
        prompt.push_str(&format!("\nHINTS: {}\n", hints.join(", ")));
    }
    if let Some(err) = retry_error {
        prompt.push_str(&format!("\nError: {err}\nRetry with JSON only:\n"));
    } else {
        prompt.push_str("\nNext action JSON:");
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_flag_empty_page_and_block() {
        let hints = build_hints("https://x.test", "", "");
        assert!(hints.contains(&"EMPTY PAGE"));

        let hints = build_hints("https://x.test", "please solve this captcha", "");
        assert!(hints.contains(&"BLOCK"));
    }

    #[test]
    fn user_prompt_truncates_text_to_budget() {
        let long_text = "x".repeat(TEXT_EXCERPT_BUDGET + 500);
        let prompt = build_user_prompt("goal", "https://x.test", 1, &long_text, "", None);
        let excerpt_chars = prompt.matches('x').count();
        assert_eq!(excerpt_chars, TEXT_EXCERPT_BUDGET);
    }
}
