//! Hardcoded fallbacks for the guard rules, grounded in `ag/consts.py`'s
//! `KNOWN_SITES` and `COOKIE_CONSENT_SELECTORS`. The original makes these
//! environment-overridable; here that's `PlannerConfig`'s job, these are
//! just the defaults it's built from.

/// Goal keyword → canonical URL, consulted by the bootstrap rule when the
/// goal names a well-known site without spelling out a URL (e.g. "open
/// openai"). First match by iteration order wins.
pub const KNOWN_SITES: &[(&str, &str)] = &[
    ("openai", "https://openai.com"),
    ("google", "https://google.com"),
    ("github", "https://github.com"),
    ("wikipedia", "https://wikipedia.org"),
    ("youtube", "https://youtube.com"),
    ("twitter", "https://twitter.com"),
    ("x.com", "https://x.com"),
    ("linkedin", "https://linkedin.com"),
    ("facebook", "https://facebook.com"),
    ("reddit", "https://reddit.com"),
    ("amazon", "https://amazon.com"),
    ("stackoverflow", "https://stackoverflow.com"),
];

/// Known consent-button selectors, tried in order before falling back to a
/// phrase match against the page text.
pub const COOKIE_CONSENT_SELECTORS: &[&str] = &["#L2AGLb", "#bnp_btn_accept", "button[id*='accept']", "button[id*='consent']"];

/// Page-text phrases that indicate a cookie/consent banner is showing.
pub const CONSENT_PHRASES: &[&str] =
    &["accetta tutto", "accept all", "i agree", "acconsento", "prima di continuare"];

/// URL or page-text substrings treated as an anti-bot block.
pub const CAPTCHA_MARKERS: &[&str] =
    &["captcha", "robot", "verify you are human", "unusual traffic", "/sorry/"];
