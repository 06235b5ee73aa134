use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{CompileError, ExecutionError};
use super::facts::FactTable;
use super::filter::FilterIndex;
use super::rule::{CompiledRule, Rule};
use crate::config::EngineConfig;

/// A versioned bundle of rules, as delivered by the package document.
///
/// Field names follow the document: `packageName`, `validFrom`, `validTo`,
/// `ruleSet`, `filters`. The validity window is carried verbatim and never
/// interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePackage {
    #[serde(rename = "packageName")]
    pub name: String,
    #[serde(default)]
    pub valid_from: String,
    #[serde(default)]
    pub valid_to: String,
    #[serde(rename = "ruleSet", default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub filters: Vec<String>,
}

impl RulePackage {
    /// Decode a package document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the document is malformed.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Parse every condition and action into a [`CompiledPackage`].
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if any rule fails to compile. Nothing is
    /// produced for a partially valid package.
    pub fn compile(&self) -> Result<CompiledPackage, CompileError> {
        crate::compile::compile(self)
    }
}

/// Builder for constructing a [`RulePackage`] in code.
///
/// # Example
///
/// ```
/// use bre::{FactTable, RulePackageBuilder};
///
/// let package = RulePackageBuilder::new("pricing")
///     .rule("R1", |r| r.when("a == 1").then("b = 2"))
///     .rule("R2", |r| r.when("b == 2").then("c = 3"))
///     .compile()
///     .unwrap();
///
/// let facts = package.evaluate(FactTable::new().set("a", "1")).unwrap();
/// assert_eq!(facts.get("c"), Some("3"));
/// assert_eq!(facts.trace(), "R1;R2;");
/// ```
#[derive(Debug, Default)]
pub struct RulePackageBuilder {
    package: RulePackage,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    condition: String,
    actions: Vec<String>,
}

impl RulePackageBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            package: RulePackage {
                name: name.to_owned(),
                ..RulePackage::default()
            },
        }
    }

    #[must_use]
    pub fn validity(mut self, from: &str, to: &str) -> Self {
        self.package.valid_from = from.to_owned();
        self.package.valid_to = to.to_owned();
        self
    }

    /// Define a rule. The closure sets the condition with `.when(text)` and
    /// appends actions with `.then(text)`.
    #[must_use]
    pub fn rule(mut self, name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder::default());
        self.package.rules.push(Rule {
            name: name.to_owned(),
            condition: builder.condition,
            actions: builder.actions,
        });
        self
    }

    /// Add a dimension-membership key, e.g. `"xlsSeg-10"`.
    #[must_use]
    pub fn filter(mut self, key: &str) -> Self {
        self.package.filters.push(key.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> RulePackage {
        self.package
    }

    /// Build and compile the package.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if validation fails.
    pub fn compile(self) -> Result<CompiledPackage, CompileError> {
        crate::compile::compile(&self.package)
    }
}

impl RuleBuilder {
    /// Set the condition text for this rule.
    #[must_use]
    pub fn when(mut self, condition: &str) -> Self {
        self.condition = condition.to_owned();
        self
    }

    /// Append an action text, run in order when the condition holds.
    #[must_use]
    pub fn then(mut self, action: &str) -> Self {
        self.actions.push(action.to_owned());
        self
    }
}

/// A compiled, immutable rule package. Thread-safe and designed to live
/// behind `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPackage {
    pub(crate) name: String,
    pub(crate) valid_from: String,
    pub(crate) valid_to: String,
    pub(crate) rules: HashMap<String, CompiledRule>,
    /// Rule names in declared order.
    pub(crate) order: Vec<String>,
    pub(crate) filters: FilterIndex,
}

impl CompiledPackage {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn valid_from(&self) -> &str {
        &self.valid_from
    }

    #[must_use]
    pub fn valid_to(&self) -> &str {
        &self.valid_to
    }

    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&CompiledRule> {
        self.rules.get(name)
    }

    /// Rule names in declared (execution) order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn filters(&self) -> &FilterIndex {
        &self.filters
    }

    /// Run every rule against `facts` in place, using the default
    /// [`EngineConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] for the first failing rule. Facts mutated
    /// before the failure stay mutated.
    pub fn run(&self, facts: &mut FactTable) -> Result<(), ExecutionError> {
        self.run_with(facts, &EngineConfig::default())
    }

    /// Like [`run`](Self::run), with explicit evaluation limits.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] for the first failing rule.
    pub fn run_with(
        &self,
        facts: &mut FactTable,
        config: &EngineConfig,
    ) -> Result<(), ExecutionError> {
        crate::evaluate::run(&self.rules, &self.order, &self.filters, facts, config.max_depth)
    }

    /// Run every rule against an owned fact table and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] for the first failing rule; the partially
    /// mutated table is dropped. Use [`run`](Self::run) to keep it.
    pub fn evaluate(&self, mut facts: FactTable) -> Result<FactTable, ExecutionError> {
        self.run(&mut facts)?;
        Ok(facts)
    }
}

impl fmt::Display for CompiledPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompiledPackage({}, {} rules, {} filter keys)",
            self.name,
            self.order.len(),
            self.filters.len(),
        )
    }
}
