//! External interfaces the agent session drives but does not implement:
//! the headed browser (`BrowserFacade`) and the language model
//! (`LanguageModel`). Ships trait definitions plus the reference
//! implementations (`NullBrowser`, `MockLanguageModel`) used by the core's
//! own test suite and the CLI's offline mode.

mod errors;
mod llm;
mod mock_llm;
mod null_browser;
#[cfg(feature = "http-llm")]
pub mod http_llm;

pub use errors::BrowserError;
pub use llm::{LanguageModel, LlmError};
pub use mock_llm::MockLanguageModel;
pub use null_browser::{NullBrowser, Snapshot};

use async_trait::async_trait;

/// A single bounding box center plus effective width, as returned by
/// locating an element on the page (`None` if the selector matched nothing).
pub type BboxCenter = (f64, f64, f64);

/// The browser the agent drives. Implementations own the real page/session;
/// every method is fallible and callers are expected to degrade gracefully
/// (the dispatcher absorbs errors into memory annotations rather than
/// propagating them, see `agent-session`).
#[async_trait]
pub trait BrowserFacade: Send + Sync {
    async fn start(&self) -> Result<(), BrowserError>;
    async fn stop(&self) -> Result<(), BrowserError>;

    async fn url(&self) -> String;
    async fn title(&self) -> String;
    async fn extract_text(&self, budget: usize) -> String;
    async fn screenshot(&self, path: &str) -> Result<(), BrowserError>;

    async fn goto(&self, url: &str) -> Result<(), BrowserError>;
    async fn back(&self) -> Result<(), BrowserError>;
    async fn scroll(&self, dy: i32) -> Result<(), BrowserError>;
    async fn press(&self, key: &str) -> Result<(), BrowserError>;
    async fn type_into(&self, selector: &str, text: &str) -> Result<(), BrowserError>;

    async fn bbox_center(&self, selector: &str) -> Option<BboxCenter>;
    async fn move_cursor(&self, x: f64, y: f64) -> Result<(), BrowserError>;
    async fn click_at(&self, x: f64, y: f64) -> Result<(), BrowserError>;
    async fn set_status(&self, message: &str) -> Result<(), BrowserError>;

    /// True when the agent is merely narrating an externally-controlled
    /// browser window rather than driving one of its own (no navigation or
    /// element interaction is possible; the loop should exit after one step).
    fn view_only(&self) -> bool {
        false
    }
    fn headless(&self) -> bool {
        false
    }
    /// Forces the timed cursor animation to run even in headless mode.
    fn demo_mode(&self) -> bool {
        true
    }
    fn action_delay_ms(&self) -> u64 {
        0
    }
}
