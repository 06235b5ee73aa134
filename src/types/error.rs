use thiserror::Error;

use super::context::{EvalContext, Site};
use super::expr::BinaryOp;
use crate::parse::ParseError;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("rule '{rule}' {site}: {source}")]
    Parse {
        rule: String,
        site: Site,
        #[source]
        source: ParseError,
    },

    #[error("duplicate rule name '{name}'")]
    DuplicateRule { name: String },

    #[error("operator '{op}' is not allowed in rule '{rule}' {site}")]
    InvalidOperator { rule: String, site: Site, op: BinaryOp },

    #[error("condition of rule '{rule}' does not yield true or false")]
    NonBooleanCondition { rule: String },

    #[error("{} errors: {}", .0.len(), join_errors(.0))]
    Multiple(Vec<CompileError>),
}

impl CompileError {
    /// The individual errors, flattening [`CompileError::Multiple`].
    #[must_use]
    pub fn errors(&self) -> Vec<&CompileError> {
        match self {
            CompileError::Multiple(errors) => {
                errors.iter().flat_map(CompileError::errors).collect()
            }
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[CompileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure while evaluating a single expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("cannot convert '{operand}' to a number")]
    NumericConversion { operand: String },

    #[error("expression nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("operator '{op}' cannot be evaluated in {context} context")]
    InvalidOperator { op: BinaryOp, context: EvalContext },

    #[error("rule '{name}' has no compiled entry")]
    UnknownRule { name: String },
}

/// Failure of a rule run, locating the rule and expression that failed.
///
/// Facts mutated by earlier rules and actions of the same run stay mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule '{rule}' failed in {site}: {source}")]
pub struct ExecutionError {
    pub rule: String,
    pub site: Site,
    #[source]
    pub source: EvalError,
}
