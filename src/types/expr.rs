use std::fmt;

/// The lexical kind of a literal operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    String,
}

/// Binary operators supported in rule expressions.
///
/// `Eq` and `Assign` share a precedence level. Which of comparison or
/// assignment they perform is decided by the [`EvalContext`](super::EvalContext)
/// at evaluation time, not by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Add,
    Sub,
    Eq,
    Neq,
    Assign,
    And,
    Or,
}

impl BinaryOp {
    /// Source spelling of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Assign => "=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Parsed syntax of a condition or action.
///
/// Literals keep their raw source text; a string literal's raw text includes
/// its surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal { kind: LiteralKind, raw: String },
    Identifier(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Group(Box<Expr>),
}

#[allow(clippy::should_implement_trait)]
impl Expr {
    #[must_use]
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs)
    }

    #[must_use]
    pub fn sub(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Sub, self, rhs)
    }

    #[must_use]
    pub fn mul(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Mul, self, rhs)
    }

    #[must_use]
    pub fn div(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Div, self, rhs)
    }

    #[must_use]
    pub fn equals(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Eq, self, rhs)
    }

    #[must_use]
    pub fn not_equals(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Neq, self, rhs)
    }

    #[must_use]
    pub fn assign(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Assign, self, rhs)
    }

    #[must_use]
    pub fn and(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::And, self, rhs)
    }

    #[must_use]
    pub fn or(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Or, self, rhs)
    }

    /// Wrap this expression in parentheses.
    #[must_use]
    pub fn group(self) -> Expr {
        Expr::Group(Box::new(self))
    }

    /// Whether `op` occurs anywhere in this tree.
    #[must_use]
    pub fn contains_op(&self, op: BinaryOp) -> bool {
        match self {
            Expr::Binary {
                op: own,
                left,
                right,
            } => *own == op || left.contains_op(op) || right.contains_op(op),
            Expr::Group(inner) => inner.contains_op(op),
            Expr::Literal { .. } | Expr::Identifier(_) => false,
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Expr::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expr::Group(inner) => 1 + inner.depth(),
            Expr::Literal { .. } | Expr::Identifier(_) => 1,
        }
    }
}

/// Prints a canonical form. For trees produced by the parser, the output
/// parses back to an identical tree; hand-built trees must use
/// [`Expr::group`] where precedence would otherwise differ.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { raw, .. } => f.write_str(raw),
            Expr::Identifier(name) => f.write_str(name),
            Expr::Binary { op, left, right } => write!(f, "{left} {op} {right}"),
            Expr::Group(inner) => write!(f, "({inner})"),
        }
    }
}

/// An identifier operand: a fact name, or a marker-prefixed filter/escape name.
#[must_use]
pub fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_owned())
}

/// An integer literal operand.
#[must_use]
pub fn int(value: u64) -> Expr {
    Expr::Literal {
        kind: LiteralKind::Int,
        raw: value.to_string(),
    }
}

/// A string literal operand. The raw text keeps its quotes, with `"` and `\`
/// escaped so the literal re-parses.
#[must_use]
pub fn string(value: &str) -> Expr {
    let mut raw = String::with_capacity(value.len() + 2);
    raw.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            raw.push('\\');
        }
        raw.push(c);
    }
    raw.push('"');
    Expr::Literal {
        kind: LiteralKind::String,
        raw,
    }
}
