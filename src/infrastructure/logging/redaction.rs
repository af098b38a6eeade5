//! Secret redaction for log output

use std::sync::LazyLock;

use regex::Regex;

static BEARER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Bearer\s+[a-zA-Z0-9\-_\.]+").expect("valid regex")
});

static ANTHROPIC_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sk-ant-[a-zA-Z0-9\-_]{20,}").expect("valid regex")
});

/// Shorten an API key to a loggable prefix
pub fn redact_key(key: &str) -> String {
    match key.char_indices().nth(8) {
        Some((cut, _)) if key.len() > 12 => format!("{}...[REDACTED]", &key[..cut]),
        _ => "[REDACTED]".to_string(),
    }
}

/// Remove bearer tokens and API keys from free text (e.g. error bodies)
pub fn scrub_message(message: &str) -> String {
    let scrubbed = ANTHROPIC_KEY_PATTERN.replace_all(message, "[API_KEY_REDACTED]");
    BEARER_PATTERN
        .replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]")
        .into_owned()
}
