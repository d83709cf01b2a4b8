use crate::errors::BrowserError;
use crate::{BboxCenter, BrowserFacade};
use async_trait::async_trait;
use std::sync::Mutex;

/// A page snapshot the scripted browser serves for one `goto`/start call.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub url: String,
    pub title: String,
    pub text: String,
}

impl Snapshot {
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self { url: url.into(), title: title.into(), text: text.into() }
    }
}

struct State {
    current: Snapshot,
    scripted: Vec<Snapshot>,
    calls: Vec<String>,
    view_only: bool,
    headless: bool,
    demo_mode: bool,
    action_delay_ms: u64,
}

/// In-memory `BrowserFacade` driven by a pre-programmed snapshot sequence
/// rather than a real page: every `goto` advances to the next scripted
/// snapshot (or repeats the last one once exhausted). All calls are
/// recorded for test assertions via `calls()`.
pub struct NullBrowser {
    state: Mutex<State>,
}

impl NullBrowser {
    pub fn new(initial: Snapshot, scripted: Vec<Snapshot>) -> Self {
        Self {
            state: Mutex::new(State {
                current: initial,
                scripted,
                calls: Vec::new(),
                view_only: false,
                headless: true,
                demo_mode: true,
                action_delay_ms: 0,
            }),
        }
    }

    pub fn empty() -> Self {
        Self::new(Snapshot::default(), Vec::new())
    }

    pub fn with_view_only(mut self, view_only: bool) -> Self {
        self.state.get_mut().unwrap().view_only = view_only;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.state.get_mut().unwrap().headless = headless;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }
}

#[async_trait]
impl BrowserFacade for NullBrowser {
    async fn start(&self) -> Result<(), BrowserError> {
        self.record("start");
        Ok(())
    }

    async fn stop(&self) -> Result<(), BrowserError> {
        self.record("stop");
        Ok(())
    }

    async fn url(&self) -> String {
        self.state.lock().unwrap().current.url.clone()
    }

    async fn title(&self) -> String {
        self.state.lock().unwrap().current.title.clone()
    }

    async fn extract_text(&self, budget: usize) -> String {
        let text = self.state.lock().unwrap().current.text.clone();
        text.chars().take(budget).collect()
    }

    async fn screenshot(&self, _path: &str) -> Result<(), BrowserError> {
        self.record("screenshot");
        Ok(())
    }

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.record(format!("goto {url}"));
        let mut state = self.state.lock().unwrap();
        if let Some(next) = state.scripted.first().cloned() {
            state.scripted.remove(0);
            state.current = next;
        }
        state.current.url = url.to_string();
        Ok(())
    }

    async fn back(&self) -> Result<(), BrowserError> {
        self.record("back");
        Ok(())
    }

    async fn scroll(&self, dy: i32) -> Result<(), BrowserError> {
        self.record(format!("scroll {dy}"));
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<(), BrowserError> {
        self.record(format!("press {key}"));
        Ok(())
    }

    async fn type_into(&self, selector: &str, text: &str) -> Result<(), BrowserError> {
        self.record(format!("type {selector}={text}"));
        Ok(())
    }

    async fn bbox_center(&self, selector: &str) -> Option<BboxCenter> {
        self.record(format!("bbox {selector}"));
        Some((100.0, 100.0, 40.0))
    }

    async fn move_cursor(&self, x: f64, y: f64) -> Result<(), BrowserError> {
        self.record(format!("move {x},{y}"));
        Ok(())
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<(), BrowserError> {
        self.record(format!("click_at {x},{y}"));
        Ok(())
    }

    async fn set_status(&self, message: &str) -> Result<(), BrowserError> {
        self.record(format!("status {message}"));
        Ok(())
    }

    fn view_only(&self) -> bool {
        self.state.lock().unwrap().view_only
    }

    fn headless(&self) -> bool {
        self.state.lock().unwrap().headless
    }

    fn demo_mode(&self) -> bool {
        self.state.lock().unwrap().demo_mode
    }

    fn action_delay_ms(&self) -> u64 {
        self.state.lock().unwrap().action_delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn goto_advances_scripted_snapshot() {
        let browser = NullBrowser::new(
            Snapshot::new("about:blank", "", ""),
            vec![Snapshot::new("https://example.com", "Example", "hello world")],
        );
        browser.goto("https://example.com").await.unwrap();
        assert_eq!(browser.title().await, "Example");
        assert_eq!(browser.extract_text(5).await, "hello");
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let browser = NullBrowser::empty();
        browser.goto("https://a.test").await.unwrap();
        browser.scroll(700).await.unwrap();
        assert_eq!(browser.calls(), vec!["goto https://a.test".to_string(), "scroll 700".to_string()]);
    }
}
