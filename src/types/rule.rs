use serde::{Deserialize, Serialize};

use super::expr::Expr;

/// One named condition and its ordered actions, as source text.
///
/// Field names follow the package document: `ruleName`, `rule`, `actions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "ruleName")]
    pub name: String,
    #[serde(rename = "rule")]
    pub condition: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Rule {
    pub fn new(name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: condition.into(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }
}

/// A rule whose condition and actions have been parsed into expression trees.
///
/// Produced by compilation and stored inside a
/// [`CompiledPackage`](super::CompiledPackage); never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub(crate) name: String,
    pub(crate) condition: Expr,
    pub(crate) actions: Vec<Expr>,
}

impl CompiledRule {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    #[must_use]
    pub fn actions(&self) -> &[Expr] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_document_field_names() {
        let rule: Rule =
            serde_json::from_str(r#"{"ruleName":"R1","rule":"a==1","actions":["b=2"]}"#).unwrap();
        assert_eq!(rule, Rule::new("R1", "a==1").with_action("b=2"));
    }

    #[test]
    fn actions_default_to_empty() {
        let rule: Rule = serde_json::from_str(r#"{"ruleName":"R1","rule":"a==1"}"#).unwrap();
        assert!(rule.actions.is_empty());
    }
}
