use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, delimited, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{BinaryOp, Expr, LiteralKind};

type Level = fn(&mut &str) -> ModalResult<Expr>;
type OpParser = fn(&mut &str) -> ModalResult<BinaryOp>;

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

// -- Operands ---------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn integer_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    digit1.parse_next(input)
}

/// A double-quoted string. The returned slice is the raw text, quotes and
/// escape sequences included.
fn string_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ('"', cut_err(string_body)).take().parse_next(input)
}

fn string_body(input: &mut &str) -> ModalResult<()> {
    loop {
        match any.parse_next(input)? {
            '"' => return Ok(()),
            '\\' => {
                any.parse_next(input)?;
            }
            _ => {}
        }
    }
}

fn operand(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        delimited('(', cut_err(expression), cut_err(')')).map(Expr::group),
        integer_literal.map(|raw: &str| Expr::Literal {
            kind: LiteralKind::Int,
            raw: raw.to_owned(),
        }),
        string_literal.map(|raw: &str| Expr::Literal {
            kind: LiteralKind::String,
            raw: raw.to_owned(),
        }),
        ident.map(|name: &str| Expr::Identifier(name.to_owned())),
    ))
    .context(StrContext::Expected(StrContextValue::Description("operand")))
    .parse_next(input)
}

// -- Operators --------------------------------------------------------------

fn multiplicative_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt(('*'.value(BinaryOp::Mul), '/'.value(BinaryOp::Div))).parse_next(input)
}

fn additive_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub))).parse_next(input)
}

fn equality_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt((
        "==".value(BinaryOp::Eq),
        "!=".value(BinaryOp::Neq),
        '='.value(BinaryOp::Assign),
    ))
    .parse_next(input)
}

fn and_op(input: &mut &str) -> ModalResult<BinaryOp> {
    "&&".value(BinaryOp::And).parse_next(input)
}

fn or_op(input: &mut &str) -> ModalResult<BinaryOp> {
    "||".value(BinaryOp::Or).parse_next(input)
}

// -- Expressions (precedence: || < && < ==,!=,= < +,- < *,/ < operand) ------

/// One left-associative precedence level: `next (op next)*`.
fn binary_level(input: &mut &str, next: Level, op: OpParser) -> ModalResult<Expr> {
    let first = next(input)?;
    let rest: Vec<(BinaryOp, Expr)> =
        repeat(0.., (preceded(ws, op), cut_err(next))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, (op, rhs)| Expr::binary(op, acc, rhs)))
}

fn multiplicative(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, operand, multiplicative_op)
}

fn additive(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, multiplicative, additive_op)
}

fn equality(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, additive, equality_op)
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, equality, and_op)
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, and_expr, or_op)
}

// -- Top-level parser -------------------------------------------------------

pub fn expression(input: &mut &str) -> ModalResult<Expr> {
    let expr = or_expr(input)?;
    ws.parse_next(input)?;
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use crate::parse::parse;
    use crate::{ident, int, string};

    use super::*;

    #[test]
    fn parse_identifier() {
        assert_eq!(parse("region").unwrap(), ident("region"));
        assert_eq!(parse("_literal").unwrap(), ident("_literal"));
        assert_eq!(parse("seg_2").unwrap(), ident("seg_2"));
    }

    #[test]
    fn parse_integer_literal() {
        assert_eq!(parse("42").unwrap(), int(42));
    }

    #[test]
    fn parse_string_literal_keeps_raw_text() {
        assert_eq!(parse(r#""gold""#).unwrap(), string("gold"));
        match parse(r#""a\"b""#).unwrap() {
            Expr::Literal { kind, raw } => {
                assert_eq!(kind, LiteralKind::String);
                assert_eq!(raw, r#""a\"b""#);
            }
            other => panic!("expected Literal, got {other:?}"),
        }
    }

    #[test]
    fn parse_all_operators() {
        let ops = [
            ("*", BinaryOp::Mul),
            ("/", BinaryOp::Div),
            ("+", BinaryOp::Add),
            ("-", BinaryOp::Sub),
            ("==", BinaryOp::Eq),
            ("!=", BinaryOp::Neq),
            ("=", BinaryOp::Assign),
            ("&&", BinaryOp::And),
            ("||", BinaryOp::Or),
        ];
        for (sym, expected) in ops {
            let input = format!("a {sym} b");
            match parse(&input).unwrap() {
                Expr::Binary { op, .. } => assert_eq!(op, expected, "failed for {sym}"),
                other => panic!("expected Binary for {sym}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_without_whitespace() {
        assert_eq!(parse("b=2").unwrap(), ident("b").assign(int(2)));
        assert_eq!(parse("a==1").unwrap(), ident("a").equals(int(1)));
        assert_eq!(parse("a!=1").unwrap(), ident("a").not_equals(int(1)));
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let expr = parse("a + b * c").unwrap();
        assert_eq!(expr, ident("a").add(ident("b").mul(ident("c"))));
    }

    #[test]
    fn additive_binds_tighter_than_equality() {
        let expr = parse("total == a + 1").unwrap();
        assert_eq!(expr, ident("total").equals(ident("a").add(int(1))));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse("a == 1 || b == 2 && c == 3").unwrap();
        assert_eq!(
            expr,
            ident("a")
                .equals(int(1))
                .or(ident("b").equals(int(2)).and(ident("c").equals(int(3))))
        );
    }

    #[test]
    fn same_level_is_left_associative() {
        assert_eq!(
            parse("a - b - c").unwrap(),
            ident("a").sub(ident("b")).sub(ident("c"))
        );
    }

    #[test]
    fn parentheses_produce_group() {
        assert_eq!(
            parse("(a + b) * c").unwrap(),
            ident("a").add(ident("b")).group().mul(ident("c"))
        );
        assert_eq!(parse("( a )").unwrap(), ident("a").group());
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(parse("  a == 1\n").unwrap(), ident("a").equals(int(1)));
    }

    #[test]
    fn unbalanced_parentheses_fail() {
        assert!(parse("(a == 1").is_err());
        assert!(parse("a == 1)").is_err());
    }

    #[test]
    fn dangling_operator_fails() {
        let err = parse("a ==").unwrap_err();
        assert_eq!(err.text(), "a ==");
        assert!(err.offset() >= 4);
    }

    #[test]
    fn unsupported_syntax_fails() {
        for input in ["", "   ", "-1", "a & b", "a < b", "f(x)", "1.5", "!a", "\"open"] {
            assert!(parse(input).is_err(), "expected failure for {input:?}");
        }
    }

    #[test]
    fn trailing_input_fails_with_offset() {
        let err = parse("a == 1 b").unwrap_err();
        assert_eq!(err.offset(), 7);
    }
}
