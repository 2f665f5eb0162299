use super::*;
use crate::lexicon::{MemoryLexicon, MorphTag, TagSet, demo_lexicon};
use crate::rules::{RuleTable, RuleTableBuilder};
use crate::scorer::LengthScorer;
use crate::text::SanskritString;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn sandhi() -> Sandhi {
    Sandhi::new(RuleTable::default_rules())
}

fn splits_of(input: &str, memoize: bool) -> Option<BTreeSet<Vec<String>>> {
    let sandhi = sandhi();
    let lexicon = demo_lexicon();
    let mut seg = Segmenter::new(&sandhi, lexicon.as_ref()).memoize(memoize);
    let mut graph = seg.get_sandhi_splits(&SanskritString::new(input), false).unwrap()?;
    let paths = graph.find_all_paths(5000, true, false, &LengthScorer, 100_000).unwrap();
    Some(paths.into_iter().map(|p| p.iter().map(|w| w.canonical().to_string()).collect()).collect())
}

fn seq(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn segments_reference_inputs() {
    let cases: &[(&str, &[&str])] = &[
        ("gaReSannamAmi", &["gaReSam", "namAmi"]),
        ("budDaMSaraRaNgacCAmi", &["budDam", "SaraRam", "gacCAmi"]),
        ("rAmo vanaM gacCati", &["rAmas", "vanam", "gacCati"]),
        ("ityeva", &["iti", "eva"]),
        ("nEva", &["na", "eva"]),
        ("tayeva", &["te", "eva"]),
    ];
    for (input, expected) in cases {
        let splits = splits_of(input, true).unwrap_or_else(|| panic!("no split for {input}"));
        assert!(splits.contains(&seq(expected)), "{input}: {splits:?}");
    }
}

#[test]
fn unsplittable_input_is_none() {
    assert!(splits_of("", true).is_none());
    assert!(splits_of("kzkzkz", true).is_none());
}

#[test]
fn best_scored_split_comes_first() {
    let sandhi = sandhi();
    let lexicon = demo_lexicon();
    let mut seg = Segmenter::new(&sandhi, lexicon.as_ref());
    let mut graph = seg.get_sandhi_splits(&SanskritString::new("gaReSannamAmi"), false).unwrap().unwrap();
    let paths = graph.find_all_paths(10, true, true, &LengthScorer, 100_000).unwrap();
    let first: Vec<&str> = paths[0].iter().map(SanskritString::canonical).collect();
    assert_eq!(first, vec!["gaReSam", "namAmi"]);
}

#[test]
fn segmentation_graph_is_acyclic_and_tagged() {
    let sandhi = sandhi();
    let lexicon = demo_lexicon();
    let mut seg = Segmenter::new(&sandhi, lexicon.as_ref());
    let graph = seg.get_sandhi_splits(&SanskritString::new("budDaMSaraRaNgacCAmi"), true).unwrap().unwrap();
    assert!(graph.topological_order().is_some());
    for id in graph.node_ids() {
        assert!(graph.node(id).tags.is_some(), "{} untagged", graph.node(id).word);
    }
    let m = seg.metrics();
    assert!(m.substrings_explored > 0);
    assert!(m.sandhi_proposals >= m.lexicon_rejections);
    assert_eq!(m.graph_nodes, graph.node_count());
}

#[test]
fn rules_that_feed_each_other_terminate() {
    // Each rule splits a one-char word into a word plus the other char.
    let mut b = RuleTableBuilder::new();
    b.add_rules_from_str("cycle.txt", "a + b = b\nb + a = a\n[*al] + = {0}\n").unwrap();
    let sandhi = Sandhi::new(Arc::new(b.build()));
    let mut lexicon = MemoryLexicon::new();
    for w in ["a", "b"] {
        lexicon.insert(w, MorphTag::new(w, TagSet::empty()));
    }

    for memoize in [true, false] {
        for input in ["a", "b", "ab"] {
            let mut seg = Segmenter::new(&sandhi, &lexicon).memoize(memoize);
            let Some(mut graph) = seg.get_sandhi_splits(&SanskritString::strict(input), false).unwrap() else {
                continue;
            };
            assert!(graph.topological_order().is_some(), "{input}");
            graph.find_all_paths(100, true, false, &LengthScorer, 1000).unwrap();
        }
        let mut seg = Segmenter::new(&sandhi, &lexicon).memoize(memoize);
        let mut graph = seg.get_sandhi_splits(&SanskritString::strict("b"), false).unwrap().unwrap();
        let paths = graph.find_all_paths(10, true, false, &LengthScorer, 100).unwrap();
        let words: Vec<&str> = paths[0].iter().map(SanskritString::canonical).collect();
        assert_eq!(words, ["b"]);
    }
}

#[test]
fn scoreboard_is_consulted_for_shared_suffixes() {
    let sandhi = sandhi();
    let lexicon = demo_lexicon();
    let mut seg = Segmenter::new(&sandhi, lexicon.as_ref());
    seg.get_sandhi_splits(&SanskritString::new("budDaMSaraRaNgacCAmi"), false).unwrap();
    let memo = seg.metrics().clone();

    let mut seg = Segmenter::new(&sandhi, lexicon.as_ref()).memoize(false);
    seg.get_sandhi_splits(&SanskritString::new("budDaMSaraRaNgacCAmi"), false).unwrap();
    assert_eq!(seg.metrics().scoreboard_hits, 0);
    assert!(seg.metrics().substrings_explored >= memo.substrings_explored);
}

#[test]
fn pre_segmented_is_a_locked_chain() {
    let sandhi = sandhi();
    let lexicon = demo_lexicon();
    let seg = Segmenter::new(&sandhi, lexicon.as_ref());
    let words: Vec<SanskritString> = ["rAmas", "vanam", "gacCati"].iter().map(|w| SanskritString::strict(*w)).collect();
    let mut graph = seg.pre_segmented(&words, true);
    assert!(graph.is_locked());
    assert_eq!(graph.start_nodes().len(), 1);
    let paths = graph.find_all_paths(10, true, false, &LengthScorer, 100).unwrap();
    assert_eq!(paths, vec![words]);
    assert!(graph.node_ids().all(|id| graph.node(id).tags.is_some()));
}

const WORDS: &[&str] = &[
    "gaReSam", "namAmi", "budDam", "SaraRam", "gacCAmi", "rAmas", "vanam", "gacCati", "te", "eva", "iti", "na",
    "sItA", "pustakam",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn join_then_split_recovers_the_words(ixs in prop::collection::vec(0..WORDS.len(), 1..4)) {
        let sandhi = sandhi();
        let words: Vec<&str> = ixs.iter().map(|i| WORDS[*i]).collect();
        let joined = words[1..].iter().fold(words[0].to_string(), |acc, w| {
            sandhi.join(&acc, w).and_then(|s| s.into_iter().next()).unwrap_or_else(|| format!("{acc}{w}"))
        });
        let splits = splits_of(&joined, true);
        prop_assert!(splits.is_some(), "no split for {}", joined);
        let expected = seq(&words);
        prop_assert!(splits.unwrap_or_default().contains(&expected), "{} did not yield {:?}", joined, expected);
    }

    #[test]
    fn memoization_does_not_change_results(ixs in prop::collection::vec(0..WORDS.len(), 1..4)) {
        let joined: String = ixs.iter().map(|i| WORDS[*i]).collect::<Vec<_>>().concat();
        prop_assert_eq!(splits_of(&joined, true), splits_of(&joined, false));
    }
}
