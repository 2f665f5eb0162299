//! Parse validity and cost.
//!
//! A candidate is rejected when:
//!
//! - a verb assigns the same karaka twice,
//! - a node receives more than one karaka,
//! - two projective arcs (karakas, kriyAviSezaRam, sentence links) cross,
//! - a sentence-linking word opens more than one relation,
//! - a viSezaRam target itself has a viSezaRam,
//! - an arc reaches past the partner of a vAkyasambanDaH pair.
//!
//! Completed parses are additionally required to have `sambadDa-` arcs only
//! from linked words and exactly one incoming and one outgoing arc at every
//! sentence conjunction.

use super::graph::{VakyaGraph, is_sentence_conjunction};
use super::labels::{EdgeLabel, LabeledEdge, Relation};
use super::parse::VakyaParse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Every labelling of `parse`: the product of the parallel labels of its edges.
pub(crate) fn labelings(graph: &VakyaGraph, parse: &VakyaParse) -> Vec<Vec<LabeledEdge>> {
    parse.edges().fold(vec![Vec::new()], |acc, (u, v)| {
        let labels = graph.labels(u, v);
        acc.iter()
            .flat_map(|prefix| {
                labels.iter().map(move |label| {
                    let mut next = prefix.clone();
                    next.push(LabeledEdge { from: u, to: v, label: *label });
                    next
                })
            })
            .collect()
    })
}

/// Does any labelling of a partial parse pass the incremental checks?
pub(crate) fn on_the_fly(graph: &VakyaGraph, parse: &VakyaParse) -> bool {
    labelings(graph, parse).iter().any(|edges| check_parse(graph, edges, true))
}

/// Do two arcs over positions cross?
fn non_projective(u: usize, v: usize, w: usize, x: usize) -> bool {
    let (mnu, mxu) = (u.min(v), u.max(v));
    let (mnw, mxw) = (w.min(x), w.max(x));
    if mnu < mnw {
        mxu < mxw && mxu > mnw
    } else if mxu > mxw {
        mnu > mnw && mnu < mxw
    } else {
        false
    }
}

/// Validity of a labelled parse. `on_the_fly` skips the completion-only checks.
pub(crate) fn check_parse(graph: &VakyaGraph, edges: &[LabeledEdge], on_the_fly: bool) -> bool {
    let pos = |n: usize| graph.node(n).index;

    let mut count: HashMap<(usize, Relation), usize> = HashMap::new();
    let mut toedge: HashMap<usize, usize> = HashMap::new();
    let mut visheshana_from: BTreeSet<usize> = BTreeSet::new();
    let mut visheshana_to: BTreeSet<usize> = BTreeSet::new();
    let mut projective: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut links: HashMap<usize, usize> = HashMap::new();
    let mut partner: BTreeMap<usize, usize> = BTreeMap::new();
    let mut linked: BTreeSet<usize> = BTreeSet::new();
    let mut conj: BTreeMap<usize, (usize, usize)> = BTreeMap::new();

    for e in edges {
        let (u, v, l) = (e.from, e.to, e.label);
        if l.is_karaka() {
            *count.entry((u, l.relation)).or_default() += 1;
            *toedge.entry(v).or_default() += 1;
        }
        if l.is_sambaddha_karaka() {
            // reversed arc: the verb is the target
            *count.entry((v, l.relation)).or_default() += 1;
            *toedge.entry(v).or_default() += 1;
        }
        if l.is(Relation::Visheshana) {
            visheshana_from.insert(u);
            visheshana_to.insert(v);
        }
        if l.is_projective() {
            projective.insert((pos(u), pos(v)));
        }
        if l.is_sambaddha_link() {
            *links.entry(u).or_default() += 1;
        }
        if l.is(Relation::Vakyasambandha) {
            partner.insert(pos(u), pos(v));
            partner.insert(pos(v), pos(u));
            linked.insert(pos(v));
        }
        if is_sentence_conjunction(graph.node(u)) {
            conj.entry(u).or_default().0 += 1;
        }
        if is_sentence_conjunction(graph.node(v)) {
            conj.entry(v).or_default().1 += 1;
        }
    }

    if let Some(((u, rel), _)) = count.iter().find(|(_, c)| **c > 1) {
        log::trace!("[check] {} assigns {} twice", graph.node(*u), EdgeLabel::new(*rel));
        return false;
    }
    for &(a, b) in &projective {
        for &(c, d) in &projective {
            if non_projective(a, b, c, d) {
                log::trace!("[check] sannidhi violation {a}-{b} : {c}-{d}");
                return false;
            }
        }
    }
    if toedge.values().any(|c| *c > 1) {
        log::trace!("[check] node with more than one karaka");
        return false;
    }
    if links.values().any(|c| *c > 1) {
        log::trace!("[check] more than one sambadDa arc from a node");
        return false;
    }
    if visheshana_to.iter().any(|v| visheshana_from.contains(v)) {
        log::trace!("[check] viSezaRa has a viSezaRa");
        return false;
    }

    for e in edges {
        let (ui, vi) = (pos(e.from), pos(e.to));
        for (a, b) in [(ui, vi), (vi, ui)] {
            if let Some(&p) = partner.get(&a) {
                if (p > a && b > p) || (p < a && b < p) {
                    log::trace!("[check] arc {ui}-{vi} reaches past vAkyasambanDa partner {p}");
                    return false;
                }
            }
        }
        if !on_the_fly && e.label.sambaddha && !linked.contains(&ui) {
            log::trace!("[check] sambadDa arc from unlinked node {ui}");
            return false;
        }
    }

    if !on_the_fly && conj.values().any(|&(from, to)| from != 1 || to != 1) {
        log::trace!("[check] sentence conjunction without exactly one link each way");
        return false;
    }
    true
}

/// Ordering cost of a labelled parse; lower is more plausible.
///
/// Each arc costs its label weight times its length in positions (constant
/// labels ignore length), discounted by 0.9 when the head is a finite verb.
pub(crate) fn parse_cost(graph: &VakyaGraph, edges: &[LabeledEdge]) -> f64 {
    let total: f64 = edges
        .iter()
        .map(|e| {
            let (u, v) = (graph.node(e.from), graph.node(e.to));
            let w = if e.label.is_constant_cost() {
                e.label.cost()
            } else {
                u.index.abs_diff(v.index) as f64 * e.label.cost()
            };
            if u.tag.is_a(crate::TagSet::LAKARAS) { 0.9 * w } else { w }
        })
        .sum();
    (total * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_arcs() {
        let cases = [
            ((0, 2), (1, 3), true),
            ((1, 3), (0, 2), true),
            ((0, 3), (1, 2), false),
            ((1, 2), (0, 3), false),
            ((0, 1), (2, 3), false),
            ((0, 2), (0, 2), false),
            ((2, 0), (3, 1), true),
        ];
        for ((u, v), (w, x), expected) in cases {
            assert_eq!(non_projective(u, v, w, x), expected, "{u}-{v} vs {w}-{x}");
        }
    }
}
