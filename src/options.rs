//! Knobs for embedding the repair parser in a host application.

/// Configuration for [`crate::repair_with_options`].
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Maximum object/array nesting depth. A composite that would recurse
    /// past this returns an empty object/array immediately, logging a
    /// `tracing::warn!`, rather than overflowing the stack.
    pub max_depth: usize,
    /// When set, suppresses the `tracing` instrumentation emitted at
    /// heuristic decision points (duplicate-key split, dangling-array
    /// merge, same-type collapse, and the like).
    pub quiet: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            max_depth: 512,
            quiet: false,
        }
    }
}
