use std::fmt;

/// Evaluation mode for an expression tree.
///
/// In `Condition` context identifiers evaluate to their own name, so the
/// enclosing comparison can look the name up in the fact table. In `Action`
/// context identifiers resolve to fact values and `==`/`=` assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalContext {
    Condition,
    Action,
}

impl fmt::Display for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalContext::Condition => f.write_str("condition"),
            EvalContext::Action => f.write_str("action"),
        }
    }
}

/// Location of an expression within a rule: its condition, or one of its
/// actions by zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Condition,
    Action(usize),
}

impl Site {
    /// The evaluation context an expression at this site runs under.
    #[must_use]
    pub fn context(self) -> EvalContext {
        match self {
            Site::Condition => EvalContext::Condition,
            Site::Action(_) => EvalContext::Action,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Condition => f.write_str("condition"),
            Site::Action(index) => write!(f, "action #{index}"),
        }
    }
}
