mod error;
mod grammar;

pub use error::ParseError;

use crate::Expr;

/// Deepest parenthesis nesting the parser accepts.
pub const MAX_NESTING: usize = 32;

/// Most binary operators a single expression may contain.
pub const MAX_OPERATORS: usize = 1024;

/// Deepest expression tree the parser returns.
pub const MAX_DEPTH: usize = 256;

/// Parse condition or action text into an [`Expr`].
///
/// The whole input must be consumed; surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`ParseError`] if the text does not match the expression grammar,
/// has trailing input, nests parentheses deeper than [`MAX_NESTING`], has
/// more than [`MAX_OPERATORS`] operators, or yields a tree deeper than
/// [`MAX_DEPTH`].
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;

    check_limits(text)?;
    let expr = grammar::expression.parse(text).map_err(|e| {
        let offset = e.offset();
        let context = e.inner().to_string();
        let message = if !context.is_empty() {
            context
        } else if offset < text.len() {
            format!("unexpected input '{}'", &text[offset..])
        } else {
            "unexpected end of input".to_owned()
        };
        ParseError::new(text, offset, message)
    })?;

    let depth = expr.depth();
    if depth > MAX_DEPTH {
        return Err(ParseError::new(
            text,
            0,
            format!("expression depth {depth} exceeds the limit of {MAX_DEPTH}"),
        ));
    }
    Ok(expr)
}

/// Bound the size of the tree before the parser builds it. A flat chain like
/// `1 + 1 + ...` is as deep as it is long, so operators are counted as well
/// as parentheses. Anything inside a string literal does not count.
fn check_limits(text: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut operators = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut prev = ' ';
    for (offset, c) in text.char_indices() {
        if in_string {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }
        // Second half of `==`, `!=`, `&&`, `||`.
        let paired = matches!((prev, c), ('=' | '!', '=') | ('&', '&') | ('|', '|'));
        prev = if paired { ' ' } else { c };
        match c {
            '"' => in_string = true,
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::new(
                        text,
                        offset,
                        format!("parentheses nested deeper than {MAX_NESTING}"),
                    ));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            '*' | '/' | '+' | '-' | '=' | '!' | '&' | '|' if !paired => {
                operators += 1;
                if operators > MAX_OPERATORS {
                    return Err(ParseError::new(
                        text,
                        offset,
                        format!("more than {MAX_OPERATORS} operators"),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting_at_limit_parses() {
        let text = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse(&text).is_ok());
    }

    #[test]
    fn nesting_beyond_limit_fails() {
        let depth = MAX_NESTING + 1;
        let text = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        let err = parse(&text).unwrap_err();
        assert_eq!(err.offset(), MAX_NESTING);
        assert!(err.message().contains("nested deeper"));
    }

    #[test]
    fn parentheses_in_strings_do_not_count() {
        let text = format!("a == \"{}\"", "(".repeat(MAX_NESTING + 5));
        assert!(parse(&text).is_ok());
    }

    #[test]
    fn long_chain_rejected_before_building_tree() {
        let text = vec!["1"; 20_000].join(" + ");
        let err = parse(&text).unwrap_err();
        assert!(err.message().contains("operators"), "{err}");
    }

    #[test]
    fn depth_limit_applies_after_parsing() {
        let text = vec!["a"; 65].join(" && ");
        assert!(parse(&text).is_ok());
        let text = vec!["a == 1"; MAX_OPERATORS / 2].join(" || ");
        assert!(matches!(parse(&text), Err(e) if e.message().contains("depth")));
    }

    #[test]
    fn paired_operators_count_once() {
        assert!(check_limits(&vec!["a == b"; MAX_OPERATORS].join(" ")).is_ok());
        assert!(check_limits(&vec!["a = b"; MAX_OPERATORS + 1].join(" ")).is_err());
    }

    #[test]
    fn operators_in_strings_do_not_count() {
        let text = format!("a == \"{}\"", "+".repeat(MAX_OPERATORS + 1));
        assert!(parse(&text).is_ok());
    }

    #[test]
    fn trailing_input_message() {
        let err = parse("a b").unwrap_err();
        assert_eq!(err.offset(), 2);
        assert!(!err.message().is_empty());
    }
}
