//! Configuration for the graph walker.

/// Default hop limit for a single path.
pub const DEFAULT_MAX_HOPS: usize = 25;

/// Configuration for the graph walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Longest path the walker accepts. Longer paths fail before any resolution.
    pub max_hops: usize,
    /// Maximum number of resolutions issued together in one fan-out step.
    ///
    /// `None` issues the whole frontier at once. `Some(n)` resolves the
    /// frontier in consecutive chunks of `n`; results are still concatenated
    /// in frontier order.
    pub batch_width: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            batch_width: None,
        }
    }
}

impl WalkerConfig {
    /// Creates a new configuration with the specified hop limit.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Creates a new configuration with the specified batch width.
    /// A width of zero is treated as one.
    pub fn with_batch_width(mut self, width: usize) -> Self {
        self.batch_width = Some(width.max(1));
        self
    }
}
