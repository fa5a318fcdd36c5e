//! Guard against mutating statements in generated templates
//!
//! Runs at the execution boundary on the template text only. Bound values
//! never reach the text, so this catches template authoring mistakes.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::SafetyError;

static MUTATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(drop|delete|update|insert|alter|truncate)\b").unwrap()
});

/// Refuse SQL containing a mutating keyword as a whole word
pub fn validate_template(sql: &str) -> Result<(), SafetyError> {
    match MUTATING_RE.captures(sql) {
        Some(caps) => {
            let keyword = caps[1].to_lowercase();
            warn!(keyword = %keyword, "Refusing template with mutating keyword");
            Err(SafetyError::MutatingKeyword { keyword })
        }
        None => Ok(()),
    }
}
