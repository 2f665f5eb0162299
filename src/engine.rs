//! Lexical segmentation engine.
//!
//! This module is the *public entry point* for turning an unsegmented
//! Sanskrit string into candidate word sequences. It is split into focused
//! submodules under `src/engine/` while keeping public paths flat (for example
//! `crate::engine::Segmenter` and `crate::engine::SandhiGraph`).
//!
//! ## How the parts work together
//!
//! ```text
//! RuleTable (rules.rs) ──> Sandhi                     (sandhi.rs)
//!                            - join      forward rules
//!                            - split_at  backward rules, one position
//!                            - split_all union over positions
//!                               │
//! input ──> Segmenter::get_sandhi_splits               (segment.rs)
//!             - split before the first space
//!             - keep splits whose left part is a word (LexiconOracle)
//!             - recurse on the right part, memoized per substring
//!                               │
//!                               v
//!                         SandhiGraph                  (graph.rs)
//!                           START ─> words ─> END
//!                               │
//!                               v
//!             SandhiGraph::find_all_paths              (paths.rs)
//!               - Yen k-shortest (scored or by hop count)
//!               - or exhaustive DFS under a hard ceiling
//!                               │
//!                               v
//!                   Vec<Vec<SanskritString>>
//! ```
//!
//! The search is exponential in the worst case; the per-query scoreboard is
//! what makes long inputs tractable: every distinct suffix is split once and
//! its sub-DAG is shared by every prefix that leads to it.
//!
//! ## Responsibilities by module
//!
//! - `sandhi.rs`: rule application in both directions over char windows.
//! - `segment.rs`: the memoized DAG builder, tagging, pre-segmented input.
//! - `graph.rs`: the arena DAG, scoring of edges, path extraction.
//! - `paths.rs`: k-shortest and exhaustive path enumeration.
//! - `metrics.rs`: counters and timings for a run.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=padaccheda=debug` (or `trace` for per-position split
//! attempts) to see `[split_all]`, `[segment]` and `[paths]` events.

#[path = "engine/graph.rs"]
mod graph;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/paths.rs"]
mod paths;
#[path = "engine/sandhi.rs"]
mod sandhi;
#[path = "engine/segment.rs"]
mod segment;

#[allow(unused_imports)]
pub use graph::{K_SHORTEST_LIMIT, NodeId, SandhiGraph, SandhiNode};
#[allow(unused_imports)]
pub use metrics::{ParseMetrics, RunMetrics, SegmentMetrics};
#[allow(unused_imports)]
pub use sandhi::{Sandhi, SplitPair};
pub use segment::Segmenter;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;
