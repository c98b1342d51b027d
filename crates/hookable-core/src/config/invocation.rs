//! Invocation configuration.

use serde::{Deserialize, Serialize};

/// Settings applied to every hookable built from this configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationConfig {
    /// Whether hookables may be cloned.
    #[serde(default = "default_true")]
    pub clone: bool,
    /// Whether the invoke callback is reachable from outside the factory.
    #[serde(default)]
    pub expose_invoke: bool,
    /// Maximum number of hooks the parallel invoker runs at once.
    #[serde(default)]
    pub parallel_limit: Option<usize>,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            clone: true,
            expose_invoke: false,
            parallel_limit: None,
        }
    }
}

fn default_true() -> bool {
    true
}
