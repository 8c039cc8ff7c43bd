//! Error types for schema parsing and solving.

use thiserror::Error;

/// What went wrong while reading a rig definition.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The text is not valid JSON or does not match the expected layout.
    #[error("invalid JSON: {0}")]
    Syntax(String),

    #[error("unsupported encodingVersion {0}")]
    UnsupportedVersion(u64),

    /// An entity exists but its fields are wrong.
    #[error("{entity} {index} is malformed: {reason}")]
    Malformed {
        entity: &'static str,
        index: usize,
        reason: String,
    },

    /// An entity references an index that does not exist.
    #[error("{entity} '{name}' references missing {target} {index}")]
    DanglingReference {
        entity: &'static str,
        name: String,
        target: &'static str,
        index: usize,
    },

    #[error("progression '{name}' has duplicate position {position}")]
    DuplicatePosition { name: String, position: f64 },

    #[error("unknown interpolation '{0}'")]
    UnknownInterp(String),

    #[error("unknown controller type '{0}'")]
    UnknownControllerType(String),

    #[error("traversal cycle detected involving '{0}'")]
    TraversalCycle(String),
}

/// A schema failure with the byte offset of the first detected problem.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} (at byte {offset})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Human-readable description without the offset suffix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Build a syntax error from serde_json, translating its 1-based line/column
    /// into a byte offset into `text`.
    pub(crate) fn syntax(err: &serde_json::Error, text: &str) -> Self {
        Self::new(ParseErrorKind::Syntax(err.to_string()), json_error_offset(err, text))
    }
}

/// Byte offset in `text` of a serde_json error raised while reading `text`.
pub(crate) fn json_error_offset(err: &serde_json::Error, text: &str) -> usize {
    line_column_to_offset(text, err.line(), err.column())
}

/// serde_json counts columns in bytes; line 0 means "no position".
fn line_column_to_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut offset = 0usize;
    for (i, l) in text.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            return (offset + column.saturating_sub(1)).min(text.len());
        }
        offset += l.len();
    }
    text.len()
}

/// Precondition violations of [`Simplex::solve`](crate::Simplex::solve).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error("solve called on a graph that was never built")]
    NotBuilt,
    #[error("input has {got} values, rig has {expected} sliders")]
    DimensionMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_lines() {
        let text = "{\n  \"a\": 1,\n  oops\n}";
        // line 3, column 3 -> the 'o' of oops
        let off = line_column_to_offset(text, 3, 3);
        assert_eq!(&text[off..off + 4], "oops");
        assert_eq!(line_column_to_offset(text, 0, 9), 0);
    }

    #[test]
    fn display_includes_offset() {
        let err = ParseError::new(ParseErrorKind::UnsupportedVersion(7), 12);
        assert_eq!(err.to_string(), "unsupported encodingVersion 7 (at byte 12)");
        assert_eq!(err.message(), "unsupported encodingVersion 7");
    }
}
