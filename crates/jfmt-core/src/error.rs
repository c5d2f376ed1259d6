/// Grammar violation reported by the strict JSON parser.
///
/// `line` and `column` are 1-based and refer to the text the user supplied,
/// never to the repaired text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}

/// Failure of a format or compress action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("input is empty")]
    EmptyInput,
    #[error("invalid JSON: {0}")]
    Parse(#[from] ParseError),
}

/// Persisted state that could not be read back. Soft: callers fall back to
/// an empty state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {key} is unreadable: {reason}")]
pub struct StorageCorrupt {
    pub key: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_keeps_serde_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\" 1}").unwrap_err();
        let pe = ParseError::from(err);
        assert_eq!(pe.line, 2);
        assert!(pe.column > 0);
        assert!(pe.message.contains("line 2"));
    }

    #[test]
    fn edit_error_messages() {
        assert_eq!(EditError::EmptyInput.to_string(), "input is empty");
        let pe = ParseError {
            message: "expected value at line 1 column 1".into(),
            line: 1,
            column: 1,
        };
        assert_eq!(
            EditError::from(pe).to_string(),
            "invalid JSON: expected value at line 1 column 1"
        );
    }
}
