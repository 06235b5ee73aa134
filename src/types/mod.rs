mod context;
mod error;
mod expr;
mod facts;
mod filter;
mod package;
mod rule;

pub use context::{EvalContext, Site};
pub use error::{CompileError, EvalError, ExecutionError};
pub use expr::{BinaryOp, Expr, LiteralKind, ident, int, string};
pub use facts::{FactTable, TRACE_FACT};
pub use filter::{FILTER_MARKER, FilterIndex};
pub use package::{CompiledPackage, RuleBuilder, RulePackage, RulePackageBuilder};
pub use rule::{CompiledRule, Rule};
