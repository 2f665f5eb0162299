//! Analysis run metrics.
//!
//! Small plain structs used to observe where an analysis spends its time and
//! how much work the memoized search actually did.
//!
//! The intended usage is:
//!
//! - `Analyzer::analyze` for normal operation.
//! - `Analyzer::analyze_verbose` for profiling and for the CLI debug report.
//!
//! Collection is always on; the counters are plain integer bumps on the hot
//! path and the timings are taken once per stage.

use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

/// Work done while building one segmentation graph.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SegmentMetrics {
    /// Elapsed time for [`Segmenter::get_sandhi_splits`](super::Segmenter::get_sandhi_splits).
    pub duration: Duration,
    /// Substrings that were actually split (scoreboard misses).
    pub substrings_explored: usize,
    /// Substrings answered from the scoreboard.
    pub scoreboard_hits: usize,
    /// `(left, right)` candidates produced by reverse sandhi.
    pub sandhi_proposals: usize,
    /// Candidates dropped because the left part is not a word.
    pub lexicon_rejections: usize,
    /// Word nodes in the finished graph.
    pub graph_nodes: usize,
    /// Edges in the finished graph, sentinel edges included.
    pub graph_edges: usize,
}

/// Timings for the sentence-analysis stage.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseMetrics {
    pub duration: Duration,
    /// Splits handed to the sentence analyzer.
    pub splits: usize,
    /// Valid parses across all splits.
    pub parses: usize,
}

/// Metrics for a full analysis run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunMetrics {
    /// Total elapsed time for `Analyzer::analyze_verbose`.
    pub total: Duration,
    pub segment: SegmentMetrics,
    /// Time spent enumerating and scoring paths.
    pub paths: Duration,
    /// Number of candidate splits returned.
    pub path_count: usize,
    pub parse: ParseMetrics,
}
