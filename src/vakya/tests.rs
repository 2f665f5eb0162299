use super::*;
use crate::lexicon::{LexiconOracle, MorphTag, TagSet, demo_lexicon};
use crate::text::SanskritString;
use std::collections::BTreeSet;

fn words(ws: &[&str]) -> Vec<(SanskritString, Vec<MorphTag>)> {
    let lexicon = demo_lexicon();
    ws.iter()
        .map(|w| (SanskritString::strict(*w), lexicon.get_tags(w, true).unwrap_or_else(|| panic!("{w} not in lexicon"))))
        .collect()
}

fn graph(ws: &[&str]) -> VakyaGraph {
    VakyaGraph::new(&words(ws), demo_lexicon().as_ref(), DEFAULT_MAX_PARSE_DC)
}

/// `(head pada, dependent pada, label)` of every arc, sorted.
fn arcs(g: &VakyaGraph, p: &Parse) -> Vec<(String, String, String)> {
    let mut v: Vec<_> = p
        .edges
        .iter()
        .map(|e| (g.node(e.from).pada.to_string(), g.node(e.to).pada.to_string(), e.label.to_string()))
        .collect();
    v.sort();
    v
}

fn arc(from: &str, to: &str, label: &str) -> (String, String, String) {
    (from.to_string(), to.to_string(), label.to_string())
}

fn assert_cost(p: &Parse, expected: f64) {
    assert!((p.cost - expected).abs() < 1e-9, "cost {} != {expected}", p.cost);
}

#[test]
fn simple_sentence_has_one_parse() {
    let g = graph(&["rAmas", "vanam", "gacCati"]);
    assert_eq!(g.parses().len(), 1);
    let p = &g.parses()[0];
    assert_eq!(arcs(&g, p), vec![arc("gacCati", "rAmas", "kartA"), arc("gacCati", "vanam", "karma")]);
    let object = p.edges.iter().find(|e| e.label.is(Relation::Karma)).map(|e| e.to).unwrap();
    assert!(g.node(object).is_a(TagSet::DVITIYA));
    // 2 * 0.8 * 0.9 + 1 * 0.85 * 0.9
    assert_cost(p, 2.205);
}

#[test]
fn object_and_verb() {
    let g = graph(&["gaReSam", "namAmi"]);
    assert_eq!(g.parses().len(), 1);
    assert_eq!(arcs(&g, &g.parses()[0]), vec![arc("namAmi", "gaReSam", "karma")]);
}

#[test]
fn readings_without_relations_are_dropped() {
    let g = graph(&["SaraRam", "namAmi"]);
    let first = &g.partitions()[0];
    assert_eq!(first.len(), 1);
    assert!(g.node(first[0]).is_a(TagSet::DVITIYA));
    assert_eq!(g.parses().len(), 1);
}

#[test]
fn conjunction_takes_number_and_gender_of_its_members() {
    let g = graph(&["rAmas", "lakzmaRas", "ca", "gacCatas"]);
    let ca = g.partitions()[2][0];
    assert_eq!(g.node(ca).tag.tags, tags!(AVYAYA, PRATHAMA, DVIVACANA, PUMLLINGA));

    let best = &g.parses()[0];
    assert_eq!(
        arcs(&g, best),
        vec![arc("ca", "lakzmaRas", "samuccitam"), arc("ca", "rAmas", "samuccitam"), arc("gacCatas", "ca", "kartA")]
    );
    // 0.7 + 0.7 + 1 * 0.8 * 0.9
    assert_cost(best, 2.12);
    assert_eq!(g.parses().len(), 3);
}

#[test]
fn sentence_conjunction_links_two_clauses() {
    let g = graph(&["tvam", "gacCasi", "cet", "aham", "gacCAmi"]);
    assert!(!g.parses().is_empty());
    let best = &g.parses()[0];
    assert_eq!(
        arcs(&g, best),
        vec![
            arc("cet", "gacCasi", "saMbadDakriyA"),
            arc("gacCAmi", "aham", "kartA"),
            arc("gacCAmi", "cet", "vAkyasambanDaH"),
            arc("gacCasi", "tvam", "kartA"),
        ]
    );
    assert_cost(best, 2.71);
    let cet = g.partitions()[2][0];
    for p in g.parses() {
        assert_eq!(p.edges.iter().filter(|e| e.from == cet).count(), 1);
        assert_eq!(p.edges.iter().filter(|e| e.to == cet).count(), 1);
    }
}

#[test]
fn unrelated_words_have_no_parse() {
    let g = graph(&["rAmas", "sItA"]);
    assert!(g.parses().is_empty());
}

#[test]
fn parses_are_valid_ordered_and_distinct() {
    let sentences: &[&[&str]] = &[
        &["rAmas", "vanam", "gacCati"],
        &["rAmas", "lakzmaRas", "ca", "gacCatas"],
        &["tvam", "gacCasi", "cet", "aham", "gacCAmi"],
        &["rAmas", "rAmeRa", "vanAt", "gacCati"],
        &["budDam", "SaraRam", "gacCAmi"],
    ];
    for ws in sentences {
        let g = graph(ws);
        let mut seen = BTreeSet::new();
        for w in g.parses().windows(2) {
            assert!(w[0].cost <= w[1].cost, "{ws:?} not ordered");
        }
        for p in g.parses() {
            assert_eq!(p.edges.len(), ws.len() - 1, "{ws:?}: not spanning");
            assert!(seen.insert(arcs(&g, p)), "{ws:?}: duplicate parse");

            let nodes = p.nodes();
            let positions: BTreeSet<usize> = nodes.iter().map(|n| g.node(*n).index).collect();
            assert_eq!(positions.len(), nodes.len(), "{ws:?}: two readings of one word");
            assert_eq!(positions.len(), ws.len());

            for n in &nodes {
                let karakas = p.edges.iter().filter(|e| e.to == *n && e.label.is_karaka()).count();
                assert!(karakas <= 1, "{ws:?}: node {n} has {karakas} karakas");
            }
            let mut assigned = BTreeSet::new();
            for e in p.edges.iter().filter(|e| e.label.is_karaka()) {
                assert!(assigned.insert((e.from, e.label)), "{ws:?}: repeated {}", e.label);
            }
        }
    }
}

#[test]
fn divide_and_conquer_matches_direct_search() {
    let ws = words(&["tvam", "gacCasi", "cet", "aham", "gacCAmi"]);
    let lexicon = demo_lexicon();
    let direct = VakyaGraph::new(&ws, lexicon.as_ref(), 16);
    for dc in [1, 2, 3] {
        let split = VakyaGraph::new(&ws, lexicon.as_ref(), dc);
        let a: BTreeSet<_> = direct.parses().iter().map(|p| arcs(&direct, p)).collect();
        let b: BTreeSet<_> = split.parses().iter().map(|p| arcs(&split, p)).collect();
        assert_eq!(a, b, "max_parse_dc={dc}");
    }
}
