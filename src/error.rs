use thiserror::Error;

use crate::parse::ParseError;
use crate::{CompileError, ExecutionError};

/// Unified error type for the document-level entry points.
///
/// Returned by [`Engine`](crate::Engine) methods that decode, load, or
/// evaluate.
#[derive(Debug, Error)]
pub enum BreError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("malformed document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("no rule package is loaded")]
    NoPackage,
}
