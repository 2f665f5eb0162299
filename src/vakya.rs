//! Sentence analysis over one segmentation.
//!
//! Given a word sequence where each word carries all its morphological
//! analyses, build a graph of every grammatical relation that *could* hold
//! and extract the spanning structures that are consistent as a whole.
//!
//! ```text
//! [(word, [MorphTag])]
//!        │
//!        v
//! VakyaGraph::new                                  (graph.rs)
//!   - one node per (word, analysis); one partition per word
//!   - ca/vA tag rewriting, then edge builders:
//!       karakas, samasta, zazWI, kriyAviSezaRam, viSezaRam, kriyA-kriyA,
//!       avyayas, BAvalakzaRam, upapada cases, vIpsA, sentence links
//!   - drop readings with no edge
//!        │
//!        v
//! get_parses_dc                                    (parse.rs)
//!   - per range: extend partition by partition, checked on the fly
//!   - ranges above max_parse_dc are split and merged
//!        │
//!        v
//! labelings -> check_parse (final) -> parse_cost   (check.rs)
//!        │
//!        v
//! Vec<Parse>, cheapest first, deduplicated         (dedup.rs)
//! ```
//!
//! Run with `RUST_LOG=padaccheda=debug` to see every edge as it is added;
//! `trace` also shows why candidates are rejected.

#[path = "vakya/check.rs"]
mod check;
#[path = "vakya/dedup.rs"]
mod dedup;
#[path = "vakya/disjoint_set.rs"]
mod disjoint_set;
#[path = "vakya/graph.rs"]
mod graph;
#[path = "vakya/labels.rs"]
mod labels;
#[path = "vakya/parse.rs"]
mod parse;

#[allow(unused_imports)]
pub use disjoint_set::DisjointSet;
#[allow(unused_imports)]
pub use graph::{
    DEFAULT_MAX_PARSE_DC, Parse, VakyaGraph, VakyaNode, check_sambodhya, match_linga_vacana,
    match_linga_vacana_vibhakti, match_purusha_vacana,
};
pub use labels::{EdgeLabel, LabeledEdge, Relation};
#[allow(unused_imports)]
pub use parse::VakyaParse;

#[cfg(test)]
#[path = "vakya/tests.rs"]
mod tests;
