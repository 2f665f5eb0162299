//! Partial parses and their divide-and-conquer enumeration.
//!
//! A parse is a spanning forest grown Kruskal-style over the k-partite vakya
//! graph: at most one node per partition may take part (the others in its
//! partition are *extinguished*), and an edge may not close a cycle.
//!
//! ```text
//! partitions  [P0] [P1] [P2] [P3] [P4] [P5]
//!              └── solve ──┘  └── solve ──┘      ranges <= max_parse_dc
//!              └──────── merge ─────────┘        can_merge + merge
//! ```
//!
//! Within a range, partitions are visited in order. The first contributes the
//! empty parse plus one parse per edge into it; every later partition `i`
//! drops parses with fewer than `i` edges and adds every compatible extension
//! by an edge into `i` that survives the on-the-fly check.

use super::check;
use super::dedup::PartialKey;
use super::disjoint_set::DisjointSet;
use super::graph::VakyaGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Unlabelled partial parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VakyaParse {
    edges: BTreeSet<(usize, usize)>,
    active: BTreeSet<usize>,
    extinguished: BTreeSet<usize>,
    connections: DisjointSet<usize>,
}

impl VakyaParse {
    /// The parse with no edges.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `(predecessor, node)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub(crate) fn key(&self) -> PartialKey {
        self.edges.clone()
    }

    fn activate(&mut self, node: usize, index: &[usize]) {
        self.active.insert(node);
        self.extinguished.insert(index[node]);
    }

    /// Another node of this node's partition is already in the parse.
    pub fn is_extinguished(&self, node: usize, index: &[usize]) -> bool {
        self.extinguished.contains(&index[node]) && !self.active.contains(&node)
    }

    /// Can `pred -> node` be added without a second reading of a position or a cycle?
    pub fn is_safe(&self, pred: usize, node: usize, index: &[usize]) -> bool {
        if self.is_extinguished(pred, index) || self.is_extinguished(node, index) {
            false
        } else if self.active.contains(&pred) && self.active.contains(&node) {
            !self.connections.connected(pred, node)
        } else {
            true
        }
    }

    pub fn extend(&mut self, pred: usize, node: usize, index: &[usize]) {
        self.activate(pred, index);
        self.activate(node, index);
        self.edges.insert((pred, node));
        self.connections.union(pred, node);
    }

    /// Is `other` (a parse of a disjoint range) compatible, and together are
    /// they at least `length` edges?
    pub fn can_merge(&self, other: &VakyaParse, length: usize, index: &[usize]) -> bool {
        if self.len() + other.len() < length {
            return false;
        }
        if other.active.iter().any(|n| self.is_extinguished(*n, index)) {
            return false;
        }
        let mut conn = self.connections.clone();
        for &(u, v) in &other.edges {
            if conn.connected(u, v) {
                return false;
            }
            conn.union(u, v);
        }
        true
    }

    pub fn merge(&self, other: &VakyaParse) -> VakyaParse {
        let mut t = self.clone();
        t.extinguished.extend(other.extinguished.iter().copied());
        t.active.extend(other.active.iter().copied());
        t.edges.extend(other.edges.iter().copied());
        for &(u, v) in &other.edges {
            t.connections.union(u, v);
        }
        t
    }
}

/// Candidate set keyed by edge set, so equal parses are kept once.
type Candidates = BTreeMap<PartialKey, VakyaParse>;

fn insert(set: &mut Candidates, p: VakyaParse) {
    set.entry(p.key()).or_insert(p);
}

/// All complete unlabelled parses of `graph`.
pub(crate) fn get_parses_dc(graph: &VakyaGraph, max_parse_dc: usize) -> Vec<VakyaParse> {
    let index = graph.index_map();
    let parses = dc(graph, &index, 0, graph.partition_count(), max_parse_dc.max(1));
    log::debug!("[vakya] unlabelled parses={}", parses.len());
    parses.into_values().collect()
}

fn dc(graph: &VakyaGraph, index: &[usize], mn: usize, mx: usize, max_parse_dc: usize) -> Candidates {
    if mx - mn > max_parse_dc {
        let md = (mn + mx) / 2;
        let left = dc(graph, index, mn, md, max_parse_dc);
        let right = dc(graph, index, md, mx, max_parse_dc);
        merge_partials(graph, index, &left, &right, mn, mx)
    } else {
        solve_range(graph, index, mn, mx)
    }
}

fn solve_range(graph: &VakyaGraph, index: &[usize], mn: usize, mx: usize) -> Candidates {
    let mut partials = Candidates::new();
    for (i, partition) in graph.partitions()[mn..mx].iter().enumerate() {
        if i == 0 {
            insert(&mut partials, VakyaParse::empty());
            for &n in partition {
                for pred in graph.predecessors(n) {
                    let mut p = VakyaParse::empty();
                    p.extend(pred, n, index);
                    insert(&mut partials, p);
                }
            }
            continue;
        }

        let mut extended = Candidates::new();
        for ps in partials.values() {
            for &n in partition {
                for pred in graph.predecessors(n) {
                    if !ps.is_safe(pred, n, index) {
                        continue;
                    }
                    let mut psc = ps.clone();
                    psc.extend(pred, n, index);
                    if check::on_the_fly(graph, &psc) {
                        insert(&mut extended, psc);
                    }
                }
            }
        }
        partials.retain(|_, p| p.len() >= i);
        for (k, p) in extended {
            partials.entry(k).or_insert(p);
        }
        log::trace!("[vakya] range=[{mn},{mx}) partition={} partials={}", mn + i, partials.len());
    }
    partials
}

fn merge_partials(
    graph: &VakyaGraph,
    index: &[usize],
    left: &Candidates,
    right: &Candidates,
    mn: usize,
    mx: usize,
) -> Candidates {
    let mut merged = Candidates::new();
    for a in left.values() {
        for b in right.values() {
            if a.can_merge(b, mx - mn - 1, index) {
                let m = a.merge(b);
                if check::on_the_fly(graph, &m) {
                    insert(&mut merged, m);
                }
            }
        }
    }
    log::debug!("[vakya] merged [{mn},{mx}) {} x {} -> {}", left.len(), right.len(), merged.len());
    merged
}
