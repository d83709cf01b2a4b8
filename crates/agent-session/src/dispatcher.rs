//! Executes one `Action` against the `BrowserFacade`, folding every browser
//! error into a `WorkingMemory` annotation rather than propagating it (spec
//! §4.I, §7 "the dispatcher never raises"). Movement (`click`/`type`) is
//! routed through `cursor-path` for the humanized path before the browser
//! call, per spec §4.I's cursor-movement policy.

use crate::config::SessionConfig;
use agent_types::{Action, ActionKind, Observation, WorkingMemory};
use browser_facade::{BrowserError, BrowserFacade};
use cursor_path::CursorState;
use std::future::Future;
use std::time::Duration;

/// What the loop should do after one dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Continue,
    Terminate { answer: String },
}

const DEFAULT_WAIT_MS: u64 = 500;
const DEFAULT_SCROLL_DY: i32 = 700;
const MEMORY_TEXT_PREVIEW: usize = 60;
const DONE_OBSERVATION_FALLBACK: usize = 1200;

/// Bounds a fallible browser call by `page_timeout_ms`, turning an elapsed
/// deadline into `BrowserError::Timeout` rather than hanging the step.
async fn guarded<T, F>(page_timeout_ms: u64, fut: F) -> Result<T, BrowserError>
where
    F: Future<Output = Result<T, BrowserError>>,
{
    match tokio::time::timeout(Duration::from_millis(page_timeout_ms), fut).await {
        Ok(result) => result,
        Err(_) => Err(BrowserError::Timeout(page_timeout_ms)),
    }
}

fn record_failure(memory: &mut WorkingMemory, op: &str, err: BrowserError) {
    memory.add(format!("WARNING: {op} failed: {err}"));
}

fn normalize_url(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Moves the cursor onto `(cx, cy)` along a humanized path, honoring the
/// headless/demo-mode sleep policy, then snaps to the exact center as a
/// final correction. The very first move of a session (cursor still at the
/// origin) snaps directly instead of sweeping a long path across an
/// untouched page.
async fn move_cursor_humanized(
    browser: &dyn BrowserFacade,
    cursor: &mut CursorState,
    cx: f64,
    cy: f64,
    width: f64,
    cfg: &SessionConfig,
) {
    if cursor.x == 0.0 && cursor.y == 0.0 {
        cursor.set(cx, cy);
    } else {
        let path = cursor.path_to_timed(cx, cy, width, cfg.cursor_seed);
        let animate = !browser.headless() || browser.demo_mode();
        for (x, y, delay_ms) in path.iter_timed() {
            let _ = browser.move_cursor(x, y).await;
            if animate {
                tokio::time::sleep(Duration::from_millis(delay_ms as u64)).await;
            }
        }
    }
    let _ = browser.move_cursor(cx, cy).await;
}

/// Executes one action. Never returns an `Err` — every `BrowserFacade`
/// failure is absorbed into `memory` as a warning and the loop continues.
pub async fn dispatch(
    action: &Action,
    browser: &dyn BrowserFacade,
    cursor: &mut CursorState,
    memory: &mut WorkingMemory,
    observation: &Observation,
    cfg: &SessionConfig,
) -> DispatchOutcome {
    match &action.kind {
        ActionKind::Done { text } => {
            let answer = if text.trim().is_empty() {
                observation.text.chars().take(DONE_OBSERVATION_FALLBACK).collect()
            } else {
                text.clone()
            };
            DispatchOutcome::Terminate { answer }
        }

        ActionKind::Navigate { url } => {
            let target = normalize_url(url);
            match guarded(cfg.page_timeout_ms, browser.goto(&target)).await {
                Ok(()) => memory.add(format!("goto {target}")),
                Err(err) => record_failure(memory, "goto", err),
            }
            DispatchOutcome::Continue
        }

        ActionKind::Back => {
            match guarded(cfg.page_timeout_ms, browser.back()).await {
                Ok(()) => memory.add("back"),
                Err(err) => record_failure(memory, "back", err),
            }
            DispatchOutcome::Continue
        }

        ActionKind::Wait { ms } => {
            let ms = if *ms == 0 { DEFAULT_WAIT_MS } else { *ms };
            tokio::time::sleep(Duration::from_millis(ms)).await;
            memory.add(format!("wait {ms}"));
            DispatchOutcome::Continue
        }

        ActionKind::Extract => {
            memory.add("extract");
            DispatchOutcome::Continue
        }

        ActionKind::Type { selector, text, key } => {
            if let Some((cx, cy, width)) = browser.bbox_center(selector).await {
                move_cursor_humanized(browser, cursor, cx, cy, width, cfg).await;
                match guarded(cfg.page_timeout_ms, browser.type_into(selector, text)).await {
                    Ok(()) => {
                        let preview: String = text.chars().take(MEMORY_TEXT_PREVIEW).collect();
                        memory.add(format!("type {selector}={preview}"));
                        if let Some(key) = key {
                            match guarded(cfg.page_timeout_ms, browser.press(key)).await {
                                Ok(()) => memory.add(format!("press {key}")),
                                Err(err) => record_failure(memory, "press", err),
                            }
                        }
                    }
                    Err(err) => record_failure(memory, "type_into", err),
                }
            } else {
                memory.add(format!("miss {selector}"));
            }
            DispatchOutcome::Continue
        }

        ActionKind::Press { key } => {
            if key.trim().is_empty() {
                memory.add("WARNING: press missing key");
            } else {
                match guarded(cfg.page_timeout_ms, browser.press(key)).await {
                    Ok(()) => memory.add(format!("press {key}")),
                    Err(err) => record_failure(memory, "press", err),
                }
            }
            DispatchOutcome::Continue
        }

        ActionKind::Scroll { dy } => {
            let dy = if *dy == 0 { DEFAULT_SCROLL_DY } else { *dy };
            match guarded(cfg.page_timeout_ms, browser.scroll(dy)).await {
                Ok(()) => memory.add(format!("scroll {dy}")),
                Err(err) => record_failure(memory, "scroll", err),
            }
            DispatchOutcome::Continue
        }

        ActionKind::Click { selector } => {
            if let Some((cx, cy, width)) = browser.bbox_center(selector).await {
                move_cursor_humanized(browser, cursor, cx, cy, width, cfg).await;
                match guarded(cfg.page_timeout_ms, browser.click_at(cx, cy)).await {
                    Ok(()) => memory.add(format!("click {selector}")),
                    Err(err) => record_failure(memory, "click_at", err),
                }
            } else {
                memory.add(format!("miss {selector}"));
            }
            DispatchOutcome::Continue
        }
    }
}
