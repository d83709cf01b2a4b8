use thiserror::Error;

/// Terminal conditions the session `run()` can surface as `Err`. Every other
/// outcome (timeout, captcha block, step-budget exhaustion) returns `Ok` with
/// a populated `RunResult::answer` instead — see spec §7.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The browser driver could not be started; nothing ran.
    #[error("browser failed to start: {0}")]
    BrowserFatal(String),
    /// The language model backend refused credentials or is unreachable in a
    /// way retry cannot fix. Distinct from a plan timeout, which is not an
    /// error at all.
    #[error("language model unavailable: {0}")]
    LmAuth(String),
}
