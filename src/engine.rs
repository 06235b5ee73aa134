//! Process-facing entry points: load a package, evaluate fact documents.
//!
//! An [`Engine`] owns the active [`CompiledPackage`] behind an atomically
//! swappable pointer. Each evaluation takes a snapshot of the pointer, so a
//! reload never disturbs calls already in flight, and a failed reload never
//! replaces the active package.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{info, instrument, warn};

use crate::{BreError, CompileError, CompiledPackage, EngineConfig, FactTable, RulePackage};

pub struct Engine {
    current: ArcSwapOption<CompiledPackage>,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with no package loaded and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compile `package` and, on success, make it the active package.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if any rule fails to compile; the previously
    /// active package (if any) stays active.
    #[instrument(
        skip(self, package),
        fields(package_name = %package.name, rules = package.rules.len())
    )]
    pub fn load_package(
        &self,
        package: &RulePackage,
    ) -> Result<Arc<CompiledPackage>, CompileError> {
        match package.compile() {
            Ok(compiled) => Ok(self.activate(compiled)),
            Err(e) => {
                warn!(error = %e, "rule package rejected; keeping active package");
                Err(e)
            }
        }
    }

    /// Decode a JSON package document and load it.
    ///
    /// # Errors
    ///
    /// Returns [`BreError::Document`] for a malformed document or
    /// [`BreError::Compile`] for a rule that fails to compile.
    pub fn load_package_json(&self, document: &str) -> Result<Arc<CompiledPackage>, BreError> {
        let package = RulePackage::from_json(document).map_err(|e| {
            warn!(error = %e, "rule package document rejected");
            e
        })?;
        Ok(self.load_package(&package)?)
    }

    /// Make an already compiled package the active one.
    pub fn activate(&self, compiled: CompiledPackage) -> Arc<CompiledPackage> {
        let compiled = Arc::new(compiled);
        let previous = self.current.swap(Some(Arc::clone(&compiled)));
        info!(
            package = %compiled.name(),
            rules = compiled.len(),
            filters = compiled.filters().len(),
            replaced = ?previous.as_ref().map(|p| p.name().to_owned()),
            "rule package activated"
        );
        compiled
    }

    /// Snapshot of the active package.
    #[must_use]
    pub fn current(&self) -> Option<Arc<CompiledPackage>> {
        self.current.load_full()
    }

    /// Run the active package against `facts` and return the updated table,
    /// including the `trace` fact.
    ///
    /// # Errors
    ///
    /// Returns [`BreError::NoPackage`] if nothing is loaded, or
    /// [`BreError::Execution`] if a rule fails. A failure affects only this
    /// call.
    #[instrument(skip_all, fields(fact_count = facts.len()))]
    pub fn evaluate(&self, mut facts: FactTable) -> Result<FactTable, BreError> {
        let package = self.current().ok_or(BreError::NoPackage)?;
        package.run_with(&mut facts, &self.config).map_err(|e| {
            warn!(package = %package.name(), error = %e, "evaluation failed");
            e
        })?;
        Ok(facts)
    }

    /// Decode a JSON fact document, evaluate it, and encode the result.
    ///
    /// # Errors
    ///
    /// Returns [`BreError`] on decoding, evaluation, or encoding failure.
    pub fn evaluate_json(&self, document: &str) -> Result<String, BreError> {
        let facts = FactTable::from_json(document)?;
        let facts = self.evaluate(facts)?;
        Ok(facts.to_json()?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("current", &self.current().map(|p| p.name().to_owned()))
            .field("config", &self.config)
            .finish()
    }
}
