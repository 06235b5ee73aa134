//! Business rule engine.
//!
//! A [`RulePackage`] holds named rules, each a condition plus a list of
//! actions written in a small expression language. Compiling a package
//! parses every expression once; evaluating it runs the rules in declared
//! order against a [`FactTable`] of string facts, applying the actions of
//! every rule whose condition holds and recording the fired rule names in the
//! `trace` fact.
//!
//! ```
//! use bre::{Engine, FactTable, RulePackageBuilder};
//!
//! let engine = Engine::new();
//! engine
//!     .load_package(
//!         &RulePackageBuilder::new("pricing")
//!             .rule("R1", |r| r.when("a == 1").then("b = a + 1"))
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let facts = engine.evaluate(FactTable::new().set("a", "1")).unwrap();
//! assert_eq!(facts.get("b"), Some("2.00"));
//! assert_eq!(facts.trace(), "R1;");
//! ```

mod compile;
mod config;
mod engine;
mod error;
mod evaluate;
pub mod parse;
mod types;

pub use config::{DEFAULT_MAX_DEPTH, EngineConfig};
pub use engine::Engine;
pub use error::BreError;
pub use evaluate::{ESCAPE_MARKER, evaluate, evaluate_with_limit};
pub use parse::{MAX_DEPTH, MAX_NESTING, MAX_OPERATORS, ParseError, parse};
pub use types::{
    BinaryOp, CompileError, CompiledPackage, CompiledRule, EvalContext, EvalError, ExecutionError,
    Expr, FILTER_MARKER, FactTable, FilterIndex, LiteralKind, Rule, RuleBuilder, RulePackage,
    RulePackageBuilder, Site, TRACE_FACT, ident, int, string,
};
