//! Coordinator configuration loaded from environment variables.

/// Coordinator configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `WORKFLOW_MAX_CASCADE_DEPTH`: how many policy hops a submitted command
///   may trigger (default: `16`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    pub max_cascade_depth: usize,
}

impl CoordinatorConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            max_cascade_depth: std::env::var("WORKFLOW_MAX_CASCADE_DEPTH")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(16),
        }
    }

    pub fn with_max_cascade_depth(mut self, max_cascade_depth: usize) -> Self {
        self.max_cascade_depth = max_cascade_depth;
        self
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_cascade_depth: 16,
        }
    }
}
