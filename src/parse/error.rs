use std::fmt;

/// Errors produced when expression text does not match the grammar.
///
/// Carries the full offending text and the byte offset at which parsing
/// stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    text: String,
    offset: usize,
    message: String,
}

impl ParseError {
    pub(crate) fn new(text: &str, offset: usize, message: impl Into<String>) -> Self {
        Self {
            text: text.to_owned(),
            offset,
            message: message.into(),
        }
    }

    /// The text that failed to parse.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset into [`text`](Self::text) where parsing failed.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at offset {} in '{}': {}",
            self.offset, self.text, self.message
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::new("a ==", 4, "expected operand");
        assert_eq!(
            err.to_string(),
            "parse error at offset 4 in 'a ==': expected operand"
        );
        assert_eq!(err.offset(), 4);
        assert_eq!(err.text(), "a ==");
    }
}
