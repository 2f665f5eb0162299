//! The segmentation DAG.
//!
//! Nodes are candidate words. An edge `u -> v` means "`v` may follow `u`".
//! Two sentinel vertices bracket every path: `START` points at the possible
//! first words (once [`SandhiGraph::lock_start`] has run) and every possible
//! last word points at `END`.
//!
//! ```text
//!            ┌─> gaReSam ─> namAmi ──┐
//!   START ───┤                       ├──> END
//!            └─> ...     ─> ...    ──┘
//! ```
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Two nodes may carry
//! the same surface string: identity is the node, not the text.

use super::paths;
use crate::error::Result;
use crate::lexicon::MorphTag;
use crate::scorer::Scorer;
use crate::text::SanskritString;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Handle of a word node in a [`SandhiGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Internal vertex numbering: the sentinels first, then word nodes.
pub(crate) type Vertex = usize;
pub(crate) const START: Vertex = 0;
pub(crate) const END: Vertex = 1;
const FIRST_WORD: Vertex = 2;

fn vertex(id: NodeId) -> Vertex {
    id.0 + FIRST_WORD
}

/// One candidate word.
#[derive(Debug, Clone)]
pub struct SandhiNode {
    pub word: SanskritString,
    /// Morphological analyses, once the graph has been tagged.
    pub tags: Option<Vec<MorphTag>>,
}

/// Above this many paths the enumerator switches from k-shortest to
/// exhaustive enumeration.
pub const K_SHORTEST_LIMIT: usize = 1000;

#[derive(Debug, Clone, Default)]
pub struct SandhiGraph {
    nodes: Vec<SandhiNode>,
    succ: BTreeMap<Vertex, BTreeSet<Vertex>>,
    weights: HashMap<(Vertex, Vertex), f64>,
    roots: BTreeSet<NodeId>,
    locked: bool,
}

impl SandhiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fresh word node.
    pub fn add_node(&mut self, word: SanskritString) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SandhiNode { word, tags: None });
        let fresh = self.succ.insert(vertex(id), BTreeSet::new()).is_none();
        assert!(fresh, "node {} added twice", id.0);
        id
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &SandhiNode {
        &self.nodes[id.0]
    }

    pub fn set_tags(&mut self, id: NodeId, tags: Option<Vec<MorphTag>>) {
        self.nodes[id.0].tags = tags;
    }

    /// Word node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of word nodes (sentinels excluded).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, sentinel edges included.
    pub fn edge_count(&self) -> usize {
        self.succ.values().map(BTreeSet::len).sum()
    }

    /// Words that may follow `id`.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.succ
            .get(&vertex(id))
            .into_iter()
            .flatten()
            .filter(|v| **v >= FIRST_WORD)
            .map(|v| NodeId(v - FIRST_WORD))
    }

    /// Does `id` have an edge to the end sentinel?
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.succ.get(&vertex(id)).is_some_and(|s| s.contains(&END))
    }

    /// Add edges `t -> n` for every `n` in `nodes`.
    pub fn append_to_node(&mut self, t: NodeId, nodes: impl IntoIterator<Item = NodeId>) {
        assert!(self.has_node(t), "append_to_node on unknown node {}", t.0);
        let targets: Vec<Vertex> = nodes.into_iter().map(vertex).collect();
        self.succ.entry(vertex(t)).or_default().extend(targets);
    }

    /// Mark `t` as a possible last word.
    pub fn add_end_edge(&mut self, t: NodeId) {
        assert!(self.has_node(t), "add_end_edge on unknown node {}", t.0);
        self.succ.entry(vertex(t)).or_default().insert(END);
    }

    /// Record possible first words; they are connected on [`SandhiGraph::lock_start`].
    ///
    /// Panics once the start is locked.
    pub fn add_roots(&mut self, roots: impl IntoIterator<Item = NodeId>) {
        assert!(!self.locked, "add_roots on a locked graph");
        self.roots.extend(roots);
    }

    /// Connect the start sentinel to the recorded roots. Idempotent.
    pub fn lock_start(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        self.succ.entry(START).or_default().extend(roots.into_iter().map(vertex));
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// First words, after locking.
    pub fn start_nodes(&self) -> Vec<NodeId> {
        self.succ.get(&START).into_iter().flatten().map(|v| NodeId(v - FIRST_WORD)).collect()
    }

    fn word_of(&self, v: Vertex) -> &str {
        self.nodes[v - FIRST_WORD].word.canonical()
    }

    /// Weight every edge with the negated scorer output.
    ///
    /// Start edges are scored as `[v]`, end edges as `[u]`, the rest as `[u, v]`.
    pub fn score_graph(&mut self, scorer: &dyn Scorer) {
        let edges: Vec<(Vertex, Vertex)> =
            self.succ.iter().flat_map(|(u, vs)| vs.iter().map(move |v| (*u, *v))).collect();
        let sequences: Vec<Vec<&str>> = edges
            .iter()
            .map(|&(u, v)| match (u, v) {
                (START, END) => vec![],
                (START, v) => vec![self.word_of(v)],
                (u, END) => vec![self.word_of(u)],
                (u, v) => vec![self.word_of(u), self.word_of(v)],
            })
            .collect();
        let scores = scorer.score_sequences(&sequences);
        self.weights = edges.into_iter().zip(scores).map(|(e, s)| (e, -s)).collect();
        log::debug!("[graph] scored edges={}", self.weights.len());
    }

    /// Vertices in topological order, sentinels included; `None` on a cycle.
    pub(crate) fn vertex_order(&self) -> Option<Vec<Vertex>> {
        let vertex_count = self.nodes.len() + FIRST_WORD;
        let mut indegree = vec![0usize; vertex_count];
        for vs in self.succ.values() {
            for v in vs {
                indegree[*v] += 1;
            }
        }
        let mut ready: Vec<Vertex> = (0..vertex_count).filter(|v| indegree[*v] == 0).rev().collect();
        let mut order = Vec::with_capacity(vertex_count);
        while let Some(u) = ready.pop() {
            order.push(u);
            for v in self.succ.get(&u).into_iter().flatten() {
                indegree[*v] -= 1;
                if indegree[*v] == 0 {
                    ready.push(*v);
                }
            }
        }
        (order.len() == vertex_count).then_some(order)
    }

    /// Word nodes in topological order; `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<NodeId>> {
        let order = self.vertex_order()?;
        Some(order.into_iter().filter(|v| *v >= FIRST_WORD).map(|v| NodeId(v - FIRST_WORD)).collect())
    }

    pub(crate) fn succ_map(&self) -> &BTreeMap<Vertex, BTreeSet<Vertex>> {
        &self.succ
    }

    /// Word sequences of sentinel-to-sentinel paths, first occurrence kept.
    fn distinct_words(&self, vertex_paths: Vec<Vec<Vertex>>) -> Vec<Vec<SanskritString>> {
        let mut seen = BTreeSet::new();
        vertex_paths
            .into_iter()
            .map(|p| p[1..p.len() - 1].iter().map(|v| self.nodes[v - FIRST_WORD].word.clone()).collect())
            .filter(|w: &Vec<SanskritString>| seen.insert(w.clone()))
            .collect()
    }

    pub(crate) fn weight(&self, u: Vertex, v: Vertex) -> f64 {
        self.weights.get(&(u, v)).copied().unwrap_or(1.0)
    }

    /// Candidate splits as word sequences.
    ///
    /// With `max_paths <= 1000` these are the `max_paths` shortest simple
    /// paths: by scorer weight when `score` is set (then re-scored as whole
    /// sequences and sorted best first), otherwise by word count. Beyond that
    /// every simple path is enumerated, sorted by word count when `sort` is
    /// set, and more than `ceiling` paths is a [`Error::ResourceLimit`].
    ///
    /// Repeated word sequences (reached through distinct nodes) are reported
    /// once. The shortest-path search is then widened until `max_paths`
    /// distinct sequences are found, the graph runs out, or `ceiling` is reached.
    ///
    /// [`Error::ResourceLimit`]: crate::Error::ResourceLimit
    pub fn find_all_paths(
        &mut self,
        max_paths: usize,
        sort: bool,
        score: bool,
        scorer: &dyn Scorer,
        ceiling: usize,
    ) -> Result<Vec<Vec<SanskritString>>> {
        if !self.locked {
            self.lock_start();
        }

        let mut words = if max_paths <= K_SHORTEST_LIMIT {
            if score {
                self.score_graph(scorer);
            }
            let mut k = max_paths;
            loop {
                let found = paths::k_shortest_paths(self, START, END, k, score);
                let exhausted = found.len() < k;
                let mut words = self.distinct_words(found);
                if words.len() >= max_paths || exhausted || k >= ceiling {
                    words.truncate(max_paths);
                    break words;
                }
                log::trace!("[paths] k={k} gave {} distinct, widening", words.len());
                k = (k * 2).min(ceiling);
            }
        } else {
            let mut all = paths::all_simple_paths(self, START, END, ceiling)?;
            if sort {
                all.sort_by_key(Vec::len);
            }
            self.distinct_words(all)
        };

        if score && max_paths <= K_SHORTEST_LIMIT {
            let sequences: Vec<Vec<&str>> =
                words.iter().map(|p| p.iter().map(SanskritString::canonical).collect()).collect();
            let scores = scorer.score_sequences(&sequences);
            let mut scored: Vec<(f64, Vec<SanskritString>)> = scores.into_iter().zip(words).collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));
            words = scored.into_iter().map(|(_, p)| p).collect();
        }

        log::debug!("[paths] max_paths={max_paths} score={score} found={}", words.len());
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::LengthScorer;

    fn s(text: &str) -> SanskritString {
        SanskritString::strict(text)
    }

    fn words(paths: &[Vec<SanskritString>]) -> Vec<Vec<&str>> {
        paths.iter().map(|p| p.iter().map(SanskritString::canonical).collect()).collect()
    }

    /// ab | a -> b, with the single word `ab` as an alternative.
    fn diamond() -> SandhiGraph {
        let mut g = SandhiGraph::new();
        let a = g.add_node(s("a"));
        let b = g.add_node(s("b"));
        let ab = g.add_node(s("ab"));
        g.append_to_node(a, [b]);
        g.add_end_edge(b);
        g.add_end_edge(ab);
        g.add_roots([a, ab]);
        g
    }

    #[test]
    fn lock_start_is_idempotent() {
        let mut g = diamond();
        g.lock_start();
        let edges = g.edge_count();
        g.lock_start();
        assert_eq!(g.edge_count(), edges);
        assert_eq!(g.start_nodes().len(), 2);
    }

    #[test]
    fn topological_order_respects_edges() {
        let g = diamond();
        let order = g.topological_order().unwrap();
        let pos = |id: NodeId| order.iter().position(|n| *n == id).unwrap();
        assert!(pos(NodeId(0)) < pos(NodeId(1)));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn cycle_has_no_order() {
        let mut g = SandhiGraph::new();
        let a = g.add_node(s("a"));
        let b = g.add_node(s("b"));
        g.append_to_node(a, [b]);
        g.append_to_node(b, [a]);
        assert!(g.topological_order().is_none());
    }

    #[test]
    fn scored_paths_prefer_fewer_words() {
        let mut g = diamond();
        let paths = g.find_all_paths(10, true, true, &LengthScorer, 100).unwrap();
        assert_eq!(words(&paths), vec![vec!["ab"], vec!["a", "b"]]);
    }

    #[test]
    fn unscored_paths_by_hop_count() {
        let mut g = diamond();
        let paths = g.find_all_paths(1, true, false, &LengthScorer, 100).unwrap();
        assert_eq!(words(&paths), vec![vec!["ab"]]);
    }

    #[test]
    fn exhaustive_enumeration_sorted_by_length() {
        let mut g = diamond();
        let paths = g.find_all_paths(5000, true, false, &LengthScorer, 100).unwrap();
        assert_eq!(words(&paths), vec![vec!["ab"], vec!["a", "b"]]);
    }

    #[test]
    fn exhaustive_enumeration_hits_ceiling() {
        let mut g = diamond();
        let err = g.find_all_paths(5000, true, false, &LengthScorer, 1).unwrap_err();
        assert!(matches!(err, crate::Error::ResourceLimit { limit: 1 }));
    }

    #[test]
    fn repeated_surface_sequences_are_reported_once() {
        let mut g = SandhiGraph::new();
        let x1 = g.add_node(s("x"));
        let x2 = g.add_node(s("x"));
        g.add_end_edge(x1);
        g.add_end_edge(x2);
        g.add_roots([x1, x2]);
        let paths = g.find_all_paths(10, true, true, &LengthScorer, 100).unwrap();
        assert_eq!(words(&paths), vec![vec!["x"]]);
    }

    #[test]
    fn repeated_sequences_do_not_crowd_out_distinct_ones() {
        let mut g = SandhiGraph::new();
        let x1 = g.add_node(s("x"));
        let x2 = g.add_node(s("x"));
        let x3 = g.add_node(s("x"));
        let y = g.add_node(s("y"));
        for n in [x1, x2, x3, y] {
            g.add_end_edge(n);
        }
        g.add_roots([x1, x2, x3, y]);
        let mut paths = g.find_all_paths(2, true, false, &LengthScorer, 100).unwrap();
        paths.sort();
        assert_eq!(words(&paths), vec![vec!["x"], vec!["y"]]);
    }

    #[test]
    #[should_panic(expected = "locked")]
    fn no_roots_after_locking() {
        let mut g = diamond();
        g.lock_start();
        g.add_roots([NodeId(1)]);
    }
}
