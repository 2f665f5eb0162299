//! Deduplication keys for parses.
//!
//! Parse enumeration reaches the same edge set along different orders of
//! extension and merging. Without a stable key the candidate sets grow with
//! every permutation and the output repeats parses.
//!
//! ## What counts as “the same parse”
//!
//! - A *partial* parse is identified by its unlabelled edge set alone. Its
//!   active nodes, extinguished partitions and connectivity are all functions
//!   of the edges, so two partial parses with equal edges extend identically.
//! - A *labelled* parse is identified by its sorted `(from, to, label)`
//!   triples.

use super::labels::EdgeLabel;
use std::collections::BTreeSet;

/// Key of a partial parse.
pub(crate) type PartialKey = BTreeSet<(usize, usize)>;

/// Key of a labelled parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ParseKey(Vec<(usize, usize, EdgeLabel)>);

impl ParseKey {
    pub(crate) fn new(edges: impl IntoIterator<Item = (usize, usize, EdgeLabel)>) -> Self {
        let mut v: Vec<_> = edges.into_iter().collect();
        v.sort();
        ParseKey(v)
    }
}
