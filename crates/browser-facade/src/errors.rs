use thiserror::Error;

/// Errors surfaced by a `BrowserFacade` implementation.
///
/// The dispatcher never propagates these — they're caught and folded into a
/// `WorkingMemory` warning annotation, matching the "never panics or hangs
/// the step loop" requirement on browser operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser driver unavailable: {0}")]
    DriverUnavailable(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("element not found: {0}")]
    ElementNotFound(String),
    #[error("operation timed out after {0}ms")]
    Timeout(u64),
    #[error("browser operation failed: {0}")]
    Other(String),
}
