use std::collections::HashMap;

use tracing::debug;

use crate::config::DEFAULT_MAX_DEPTH;
use crate::{
    BinaryOp, CompiledRule, EvalContext, EvalError, ExecutionError, Expr, FILTER_MARKER, FactTable,
    FilterIndex, Site,
};

/// Leading character that makes an identifier evaluate to its own text
/// (marker stripped) in action context instead of a fact lookup.
pub const ESCAPE_MARKER: char = '_';

const TRUE: &str = "true";
const FALSE: &str = "false";

/// What a binary operator does once the evaluation context is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Arithmetic(Arithmetic),
    And,
    Or,
    Compare { negate: bool },
    Assign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arithmetic {
    Add,
    Sub,
    Mul,
    Div,
}

fn resolve(op: BinaryOp, context: EvalContext) -> Result<Operation, EvalError> {
    match (op, context) {
        (BinaryOp::Add, _) => Ok(Operation::Arithmetic(Arithmetic::Add)),
        (BinaryOp::Sub, _) => Ok(Operation::Arithmetic(Arithmetic::Sub)),
        (BinaryOp::Mul, _) => Ok(Operation::Arithmetic(Arithmetic::Mul)),
        (BinaryOp::Div, _) => Ok(Operation::Arithmetic(Arithmetic::Div)),
        (BinaryOp::And, _) => Ok(Operation::And),
        (BinaryOp::Or, _) => Ok(Operation::Or),
        (BinaryOp::Eq, EvalContext::Condition) => Ok(Operation::Compare { negate: false }),
        (BinaryOp::Neq, EvalContext::Condition) => Ok(Operation::Compare { negate: true }),
        (BinaryOp::Eq | BinaryOp::Assign, EvalContext::Action) => Ok(Operation::Assign),
        (BinaryOp::Assign, EvalContext::Condition) | (BinaryOp::Neq, EvalContext::Action) => {
            Err(EvalError::InvalidOperator { op, context })
        }
    }
}

struct Evaluator<'a> {
    context: EvalContext,
    facts: &'a mut FactTable,
    filters: &'a FilterIndex,
    max_depth: usize,
}

impl Evaluator<'_> {
    fn eval(&mut self, expr: &Expr, depth: usize) -> Result<String, EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        match expr {
            Expr::Literal { raw, .. } => Ok(raw.clone()),
            Expr::Group(inner) => self.eval(inner, depth + 1),
            Expr::Identifier(name) => Ok(self.identifier(name)),
            Expr::Binary { op, left, right } => {
                // Both sides always run; `&&`/`||` do not short-circuit.
                let left = self.eval(left, depth + 1)?;
                let right = self.eval(right, depth + 1)?;
                let operation = resolve(*op, self.context)?;
                self.apply(operation, left, right)
            }
        }
    }

    fn identifier(&self, name: &str) -> String {
        match self.context {
            EvalContext::Condition => name.to_owned(),
            EvalContext::Action => match name.strip_prefix(ESCAPE_MARKER) {
                Some(escaped) => escaped.to_owned(),
                None => self.facts.get(name).unwrap_or(name).to_owned(),
            },
        }
    }

    fn apply(
        &mut self,
        operation: Operation,
        left: String,
        right: String,
    ) -> Result<String, EvalError> {
        match operation {
            Operation::Arithmetic(op) => arithmetic(op, &left, &right),
            Operation::And => Ok(boolean(left == TRUE && right == TRUE)),
            Operation::Or => Ok(boolean(left == TRUE || right == TRUE)),
            Operation::Compare { negate } => Ok(boolean(self.compare(&left, &right, negate))),
            Operation::Assign => {
                self.facts.insert(left, right);
                Ok(String::new())
            }
        }
    }

    /// `name` is the left operand as produced in condition context: a fact
    /// name, not its value.
    fn compare(&self, name: &str, right: &str, negate: bool) -> bool {
        if right.starts_with(FILTER_MARKER) {
            return match self.facts.get(name) {
                Some(value) => self.filters.is_member(right, value) != negate,
                None => false,
            };
        }
        let current = self.facts.get(name).unwrap_or_default();
        (current == right) != negate
    }
}

fn arithmetic(op: Arithmetic, left: &str, right: &str) -> Result<String, EvalError> {
    let left = to_number(left)?;
    let right = to_number(right)?;
    // Division by zero yields inf/NaN text rather than an error.
    let result = match op {
        Arithmetic::Add => left + right,
        Arithmetic::Sub => left - right,
        Arithmetic::Mul => left * right,
        Arithmetic::Div => left / right,
    };
    Ok(format!("{result:.2}"))
}

fn to_number(operand: &str) -> Result<f64, EvalError> {
    operand
        .parse::<f64>()
        .map_err(|_| EvalError::NumericConversion {
            operand: operand.to_owned(),
        })
}

fn boolean(value: bool) -> String {
    let token = if value { TRUE } else { FALSE };
    token.to_owned()
}

/// Evaluate one expression tree against `facts`.
///
/// Every node yields text: booleans are `"true"`/`"false"`, arithmetic
/// results carry two decimal places, assignments yield `""`.
///
/// # Errors
///
/// Returns [`EvalError`] if an arithmetic operand is not numeric, the tree
/// is deeper than [`DEFAULT_MAX_DEPTH`], or an operator is not valid in
/// `context`.
pub fn evaluate(
    expr: &Expr,
    context: EvalContext,
    facts: &mut FactTable,
    filters: &FilterIndex,
) -> Result<String, EvalError> {
    evaluate_with_limit(expr, context, facts, filters, DEFAULT_MAX_DEPTH)
}

/// [`evaluate`] with an explicit tree depth limit.
///
/// # Errors
///
/// See [`evaluate`].
pub fn evaluate_with_limit(
    expr: &Expr,
    context: EvalContext,
    facts: &mut FactTable,
    filters: &FilterIndex,
    max_depth: usize,
) -> Result<String, EvalError> {
    Evaluator {
        context,
        facts,
        filters,
        max_depth,
    }
    .eval(expr, 1)
}

/// Run rules in `order`: test each condition and, when it yields `"true"`,
/// append `<name>;` to the trace and run the rule's actions in order.
pub(crate) fn run(
    rules: &HashMap<String, CompiledRule>,
    order: &[String],
    filters: &FilterIndex,
    facts: &mut FactTable,
    max_depth: usize,
) -> Result<(), ExecutionError> {
    facts.reset_trace();

    for name in order {
        let rule = rules.get(name).ok_or_else(|| ExecutionError {
            rule: name.clone(),
            site: Site::Condition,
            source: EvalError::UnknownRule { name: name.clone() },
        })?;

        let outcome = eval_at(rule, Site::Condition, &rule.condition, facts, filters, max_depth)?;
        if outcome != TRUE {
            continue;
        }

        facts.record_fired(name);
        debug!(rule = %name, actions = rule.actions.len(), "rule fired");

        for (index, action) in rule.actions.iter().enumerate() {
            eval_at(rule, Site::Action(index), action, facts, filters, max_depth)?;
        }
    }

    Ok(())
}

fn eval_at(
    rule: &CompiledRule,
    site: Site,
    expr: &Expr,
    facts: &mut FactTable,
    filters: &FilterIndex,
    max_depth: usize,
) -> Result<String, ExecutionError> {
    evaluate_with_limit(expr, site.context(), facts, filters, max_depth).map_err(|source| {
        ExecutionError {
            rule: rule.name.clone(),
            site,
            source,
        }
    })
}
