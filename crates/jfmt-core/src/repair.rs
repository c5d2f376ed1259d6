use crate::error::ParseError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Remove commas that directly precede a closing `}` or `]`.
///
/// Single pass, not string-aware: a quoted value containing `,}` or `, ]`
/// is rewritten too.
pub fn strip_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}

/// Strict parse with one repair retry.
///
/// On failure of both attempts the error of the first attempt is returned,
/// so positions refer to the text the caller supplied.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let original = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let repaired = strip_trailing_commas(text);
    if repaired == text {
        return Err(original.into());
    }
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            tracing::debug!(error = %original, "parsed after trailing-comma repair");
            Ok(value)
        }
        Err(_) => Err(original.into()),
    }
}
