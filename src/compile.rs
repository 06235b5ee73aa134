use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::parse::parse;
use crate::{
    BinaryOp, CompileError, CompiledPackage, CompiledRule, Expr, FilterIndex, Rule, RulePackage,
    Site,
};

/// Compile a package all-or-nothing. Every rule is checked before failing so
/// that one error report covers the whole package.
pub(crate) fn compile(package: &RulePackage) -> Result<CompiledPackage, CompileError> {
    let mut errors = check_duplicates(&package.rules);

    let mut rules = HashMap::with_capacity(package.rules.len());
    let mut order = Vec::with_capacity(package.rules.len());
    for rule in &package.rules {
        match compile_rule(rule) {
            Ok(compiled) => {
                if !rules.contains_key(&rule.name) {
                    order.push(rule.name.clone());
                    rules.insert(rule.name.clone(), compiled);
                }
            }
            Err(mut rule_errors) => errors.append(&mut rule_errors),
        }
    }

    if errors.len() == 1 {
        return Err(errors.remove(0));
    }
    if !errors.is_empty() {
        return Err(CompileError::Multiple(errors));
    }

    debug!(
        package = %package.name,
        rules = order.len(),
        filters = package.filters.len(),
        "compiled rule package"
    );

    Ok(CompiledPackage {
        name: package.name.clone(),
        valid_from: package.valid_from.clone(),
        valid_to: package.valid_to.clone(),
        rules,
        order,
        filters: FilterIndex::new(package.filters.iter().cloned()),
    })
}

fn check_duplicates(rules: &[Rule]) -> Vec<CompileError> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut errors = Vec::new();
    for rule in rules {
        if !seen.insert(rule.name.as_str()) && reported.insert(rule.name.as_str()) {
            errors.push(CompileError::DuplicateRule {
                name: rule.name.clone(),
            });
        }
    }
    errors
}

fn compile_rule(rule: &Rule) -> Result<CompiledRule, Vec<CompileError>> {
    let mut errors = Vec::new();

    let condition = compile_expr(&rule.name, Site::Condition, &rule.condition)
        .map_err(|e| errors.push(e))
        .ok();

    let mut actions = Vec::with_capacity(rule.actions.len());
    for (index, text) in rule.actions.iter().enumerate() {
        match compile_expr(&rule.name, Site::Action(index), text) {
            Ok(expr) => actions.push(expr),
            Err(e) => errors.push(e),
        }
    }

    match condition {
        Some(condition) if errors.is_empty() => Ok(CompiledRule {
            name: rule.name.clone(),
            condition,
            actions,
        }),
        _ => Err(errors),
    }
}

fn compile_expr(rule: &str, site: Site, text: &str) -> Result<Expr, CompileError> {
    let expr = parse(text).map_err(|source| CompileError::Parse {
        rule: rule.to_owned(),
        site,
        source,
    })?;
    check_placement(rule, site, &expr)?;
    if site == Site::Condition && !is_boolean(&expr) {
        return Err(CompileError::NonBooleanCondition {
            rule: rule.to_owned(),
        });
    }
    Ok(expr)
}

/// A condition must be a comparison, or comparisons joined by `&&`/`||`.
fn is_boolean(expr: &Expr) -> bool {
    match expr {
        Expr::Group(inner) => is_boolean(inner),
        Expr::Binary { op, left, right } => match op {
            BinaryOp::Eq | BinaryOp::Neq => true,
            BinaryOp::And | BinaryOp::Or => is_boolean(left) && is_boolean(right),
            _ => false,
        },
        Expr::Literal { .. } | Expr::Identifier(_) => false,
    }
}

/// Conditions never assign and actions never test inequality.
fn check_placement(rule: &str, site: Site, expr: &Expr) -> Result<(), CompileError> {
    let forbidden = match site {
        Site::Condition => BinaryOp::Assign,
        Site::Action(_) => BinaryOp::Neq,
    };
    if expr.contains_op(forbidden) {
        return Err(CompileError::InvalidOperator {
            rule: rule.to_owned(),
            site,
            op: forbidden,
        });
    }
    Ok(())
}
