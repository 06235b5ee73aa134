use serde::{Deserialize, Serialize};

/// Default limit on expression tree depth during evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Evaluation settings shared by every call on an [`Engine`](crate::Engine).
///
/// Deserializable so hosts can embed it in their own configuration files;
/// missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest expression tree an evaluation will walk before failing with
    /// [`EvalError::DepthExceeded`](crate::EvalError::DepthExceeded).
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(EngineConfig::new().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(config, EngineConfig::new().with_max_depth(8));
    }
}
