//! Memoized search for every lexicon-valid segmentation of an input.
//!
//! For a string `s` the search tries every reverse-sandhi split `(left,
//! right)` before the first space, keeps those whose `left` is a word, and
//! recurses on `right`. The roots of each substring's sub-DAG are remembered in
//! a per-query scoreboard, so a suffix shared by many candidate prefixes is
//! solved once and its nodes are shared.
//!
//! A rule may widen the right context, so `right` is not always shorter than
//! `s`. Substrings still being solved are kept on an in-progress set and a
//! `right` that is on it, or longer than `s`, is skipped. Without that two
//! rules that feed each other would recurse forever.

use super::graph::{NodeId, SandhiGraph};
use super::metrics::SegmentMetrics;
use super::sandhi::Sandhi;
use crate::error::Result;
use crate::lexicon::LexiconOracle;
use crate::text::SanskritString;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

type Scoreboard = HashMap<String, BTreeSet<NodeId>>;

/// Builds segmentation graphs.
pub struct Segmenter<'a> {
    sandhi: &'a Sandhi,
    lexicon: &'a dyn LexiconOracle,
    memoize: bool,
    metrics: SegmentMetrics,
}

impl<'a> Segmenter<'a> {
    pub fn new(sandhi: &'a Sandhi, lexicon: &'a dyn LexiconOracle) -> Self {
        Self { sandhi, lexicon, memoize: true, metrics: SegmentMetrics::default() }
    }

    /// Turn the scoreboard lookup off. Results must not change; only the
    /// amount of work does.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Metrics of the last [`Segmenter::get_sandhi_splits`] call.
    pub fn metrics(&self) -> &SegmentMetrics {
        &self.metrics
    }

    /// All valid segmentations of `input` as a DAG, or `None` if there are none.
    ///
    /// With `tag`, every node carries its lexicon analyses.
    pub fn get_sandhi_splits(&mut self, input: &SanskritString, tag: bool) -> Result<Option<SandhiGraph>> {
        let started = Instant::now();
        self.metrics = SegmentMetrics::default();

        let mut graph = SandhiGraph::new();
        let mut scoreboard = Scoreboard::new();
        let mut active = HashSet::new();
        let roots = self.possible_splits(input.canonical(), &mut graph, &mut scoreboard, &mut active);

        self.metrics.graph_nodes = graph.node_count();
        self.metrics.graph_edges = graph.edge_count();
        self.metrics.duration = started.elapsed();
        log::debug!(
            "[segment] input={input} roots={} nodes={} explored={} hits={}",
            roots.len(),
            self.metrics.graph_nodes,
            self.metrics.substrings_explored,
            self.metrics.scoreboard_hits
        );

        if roots.is_empty() {
            return Ok(None);
        }
        if tag {
            self.tag_graph(&mut graph);
        }
        graph.add_roots(roots);
        Ok(Some(graph))
    }

    /// A linear, locked graph for a sentence that is already split into words.
    pub fn pre_segmented(&self, words: &[SanskritString], tag: bool) -> SandhiGraph {
        let mut graph = SandhiGraph::new();
        let mut next: Option<NodeId> = None;
        for word in words.iter().rev() {
            let id = graph.add_node(word.clone());
            match next {
                None => graph.add_end_edge(id),
                Some(n) => graph.append_to_node(id, [n]),
            }
            next = Some(id);
        }
        graph.add_roots(next);
        if tag {
            self.tag_graph(&mut graph);
        }
        graph.lock_start();
        graph
    }

    fn tag_graph(&self, graph: &mut SandhiGraph) {
        let ids: Vec<NodeId> = graph.node_ids().collect();
        for id in ids {
            let tags = self.lexicon.get_tags(graph.node(id).word.canonical(), true);
            if tags.is_none() {
                log::warn!("[segment] no analyses for {}", graph.node(id).word);
            }
            graph.set_tags(id, tags);
        }
    }

    fn possible_splits(
        &mut self,
        s: &str,
        graph: &mut SandhiGraph,
        scoreboard: &mut Scoreboard,
        active: &mut HashSet<String>,
    ) -> BTreeSet<NodeId> {
        if self.memoize {
            if let Some(roots) = scoreboard.get(s) {
                self.metrics.scoreboard_hits += 1;
                log::trace!("[segment] scoreboard hit {s}");
                return roots.clone();
            }
        }
        self.metrics.substrings_explored += 1;
        active.insert(s.to_string());
        let len = s.chars().count();

        // A space is a hard word boundary.
        let stop = s.find(' ').map(|byte| s[..byte].chars().count());
        let candidates = self.sandhi.split_all(s, 0, stop).unwrap_or_default();
        self.metrics.sandhi_proposals += candidates.len();

        let mut node_cache: HashMap<String, NodeId> = HashMap::new();
        let mut roots = BTreeSet::new();
        for (left, right) in candidates {
            if !self.lexicon.valid(&left) {
                self.metrics.lexicon_rejections += 1;
                continue;
            }
            if right.is_empty() {
                let t = *node_cache.entry(left.clone()).or_insert_with(|| graph.add_node(SanskritString::strict(left)));
                roots.insert(t);
                graph.add_end_edge(t);
            } else {
                let right = right.trim();
                if right.chars().count() > len || active.contains(right) {
                    log::trace!("[segment] skip {left} + {right} under {s}");
                    continue;
                }
                let r_roots = self.possible_splits(right, graph, scoreboard, active);
                if r_roots.is_empty() {
                    continue;
                }
                let t = *node_cache.entry(left.clone()).or_insert_with(|| graph.add_node(SanskritString::strict(left)));
                roots.insert(t);
                graph.append_to_node(t, r_roots);
            }
        }

        active.remove(s);
        scoreboard.insert(s.to_string(), roots.clone());
        roots
    }
}
