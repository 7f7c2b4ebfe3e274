//! Cumulative usage statistics for one orchestration run.

use serde::{Deserialize, Serialize};

/// Token and timing totals summed across every iteration of a run — these
/// are running sums, not per-iteration snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,

    /// Accumulated generation time reported by local inference backends.
    pub predicted_ms: f64,

    /// Accumulated predicted-token count from local inference backends.
    pub predicted_tokens: u64,
}

impl UsageStats {
    /// Fold one iteration's counters into the running totals.
    pub fn accumulate(&mut self, other: &UsageStats) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        self.predicted_ms += other.predicted_ms;
        self.predicted_tokens += other.predicted_tokens;
    }
}
