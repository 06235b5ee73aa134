use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Name of the reserved fact recording which rules fired, in firing order.
pub const TRACE_FACT: &str = "trace";

/// Working memory for one evaluation call: fact name to textual value.
///
/// Numeric facts are stored as text and only parsed when they reach an
/// arithmetic operator. Iteration and serialization order is by fact name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactTable {
    facts: BTreeMap<String, String>,
}

impl FactTable {
    /// Create an empty fact table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fact, builder style.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or overwrite a fact.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.facts.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.facts.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.facts.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The accumulated trace, or `""` if no run has initialized it.
    #[must_use]
    pub fn trace(&self) -> &str {
        self.get(TRACE_FACT).unwrap_or_default()
    }

    /// Names of the rules recorded in the trace, in firing order.
    pub fn fired_rules(&self) -> impl Iterator<Item = &str> {
        self.trace().split(';').filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.facts
    }

    /// Decode a fact document from its JSON object form.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the input is not a JSON object of
    /// string values.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Encode this fact table as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub(crate) fn reset_trace(&mut self) {
        self.facts.insert(TRACE_FACT.to_owned(), String::new());
    }

    pub(crate) fn record_fired(&mut self, rule_name: &str) {
        let trace = self.facts.entry(TRACE_FACT.to_owned()).or_default();
        trace.push_str(rule_name);
        trace.push(';');
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FactTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            facts: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for FactTable {
    fn from(facts: BTreeMap<String, String>) -> Self {
        Self { facts }
    }
}

impl From<HashMap<String, String>> for FactTable {
    fn from(facts: HashMap<String, String>) -> Self {
        facts.into_iter().collect()
    }
}

impl IntoIterator for FactTable {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.into_iter()
    }
}
