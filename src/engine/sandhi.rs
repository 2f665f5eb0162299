//! Forward and reverse sandhi over a [`RuleTable`].

use crate::rules::RuleTable;
use crate::text::{char_head, char_slice, char_tail};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A `(left, right)` candidate produced by a reverse split.
pub type SplitPair = (String, String);

/// Applies sandhi rules in both directions.
///
/// Cheap to clone; the rule table is shared.
#[derive(Debug, Clone)]
pub struct Sandhi {
    rules: Arc<RuleTable>,
}

impl Sandhi {
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Every surface form `first` and `second` can merge into.
    ///
    /// An empty operand yields the other one unchanged. `None` when no rule
    /// covers the boundary.
    pub fn join(&self, first: &str, second: &str) -> Option<BTreeSet<String>> {
        if first.is_empty() {
            return Some(BTreeSet::from([second.to_string()]));
        }
        if second.is_empty() {
            return Some(BTreeSet::from([first.to_string()]));
        }

        let n = first.chars().count();
        let m = second.chars().count();
        let rules = &self.rules;

        // Suffixes of `first` inside the window, plus the whole-word (`^`) key.
        let mut left_keys: Vec<String> =
            (n.saturating_sub(rules.lc_len_max())..n).map(|i| char_tail(first, i).to_string()).collect();
        left_keys.push(format!("^{first}"));
        let right_keys: Vec<&str> = (0..=rules.rc_len_max().min(m)).map(|j| char_head(second, j)).collect();

        let mut joins = BTreeSet::new();
        for kl in &left_keys {
            let prefix = char_head(first, n.saturating_sub(kl.chars().count()));
            for kr in &right_keys {
                let Some(merged) = rules.forward(kl, kr) else {
                    continue;
                };
                let suffix = char_tail(second, kr.chars().count());
                for (out, annotation) in merged {
                    log::debug!("[join] {first} + {second} key=({kl},{kr}) -> {out} rule={annotation}");
                    joins.insert(format!("{prefix}{out}{suffix}"));
                }
            }
        }

        if joins.is_empty() { None } else { Some(joins) }
    }

    /// Reverse sandhi at one position.
    ///
    /// Tries every surface window starting at `idx` that a rule could have
    /// produced and undoes it. `^` rules only apply at the start of the word.
    pub fn split_at(&self, word: &str, idx: usize) -> Option<BTreeSet<SplitPair>> {
        let len = word.chars().count();
        let head = char_head(word, idx);
        let mut splits = BTreeSet::new();

        let last = (idx + self.rules.after_len_max()).min(len);
        for end in idx + 1..=last {
            let after = char_slice(word, idx, end);
            let Some(befores) = self.rules.backward(after) else {
                continue;
            };
            let tail = char_tail(word, end);
            for ((left, right), annotation) in befores {
                let left = match left.strip_prefix('^') {
                    Some(_) if idx != 0 => continue,
                    Some(stripped) => stripped,
                    None => left.as_str(),
                };
                log::trace!("[split_at] {word}@{idx} after={after} rule={annotation}");
                splits.insert((format!("{head}{left}"), format!("{right}{tail}")));
            }
        }

        if splits.is_empty() { None } else { Some(splits) }
    }

    /// Union of [`Sandhi::split_at`] over `start..stop` (`stop` defaults to
    /// the word length).
    pub fn split_all(&self, word: &str, start: usize, stop: Option<usize>) -> Option<BTreeSet<SplitPair>> {
        let stop = stop.unwrap_or_else(|| word.chars().count());
        let mut splits = BTreeSet::new();
        for idx in start..stop {
            if let Some(s) = self.split_at(word, idx) {
                splits.extend(s);
            }
        }
        log::debug!("[split_all] {word} [{start},{stop}) candidates={}", splits.len());
        if splits.is_empty() { None } else { Some(splits) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleTableBuilder;

    fn sandhi(corpus: &str) -> Sandhi {
        let mut b = RuleTableBuilder::new();
        b.add_rules_from_str("test.txt", corpus).unwrap();
        Sandhi::new(Arc::new(b.build()))
    }

    fn pair(l: &str, r: &str) -> SplitPair {
        (l.to_string(), r.to_string())
    }

    #[test]
    fn join_with_empty_operand() {
        let s = sandhi("a + a = A\n");
        assert_eq!(s.join("", "vanam").unwrap(), BTreeSet::from(["vanam".to_string()]));
        assert_eq!(s.join("rAma", "").unwrap(), BTreeSet::from(["rAma".to_string()]));
    }

    #[test]
    fn join_applies_matching_rules() {
        let s = sandhi("[a,A] + [a,A] = A\nm + n = nn\n");
        assert_eq!(s.join("rAma", "asti").unwrap(), BTreeSet::from(["rAmAsti".to_string()]));
        assert_eq!(s.join("gaReSam", "namAmi").unwrap(), BTreeSet::from(["gaReSannamAmi".to_string()]));
        assert!(s.join("rAma", "vanam").is_none());
    }

    #[test]
    fn join_keeps_hiatus_when_a_rule_says_so() {
        let s = sandhi("e + e = ee\ne + [*ac-a] = ay{1}\n");
        let joined = s.join("te", "eva").unwrap();
        assert!(joined.contains("teeva"), "{joined:?}");
        assert!(joined.contains("tayeva"), "{joined:?}");
    }

    #[test]
    fn join_whole_word_rule() {
        let s = sandhi("^sas + [*hal] = sa{1}\n");
        assert_eq!(s.join("sas", "gacCati").unwrap(), BTreeSet::from(["sagacCati".to_string()]));
        assert!(s.join("rAmasas", "gacCati").is_none());
    }

    #[test]
    fn split_at_undoes_rules() {
        let s = sandhi("m + n = nn\n[a,A] + [a,A] = A\n");
        let splits = s.split_at("gaReSannamAmi", 6).unwrap();
        assert_eq!(splits, BTreeSet::from([pair("gaReSam", "namAmi")]));

        let splits = s.split_at("rAmAsti", 3).unwrap();
        assert_eq!(splits.len(), 4);
        assert!(splits.contains(&pair("rAma", "asti")));
        assert!(s.split_at("gaReSannamAmi", 0).is_none());
    }

    #[test]
    fn caret_rules_only_at_word_start() {
        let s = sandhi("^sas + [*hal] = sa{1}\n");
        assert_eq!(s.split_at("sagacCati", 0).unwrap(), BTreeSet::from([pair("sas", "gacCati")]));
        assert!(s.split_at("rAmasagacCati", 4).is_none());
    }

    #[test]
    fn split_all_unions_positions() {
        let s = sandhi("[*al] + = {0}\n");
        let splits = s.split_all("abc", 0, None).unwrap();
        assert_eq!(splits, BTreeSet::from([pair("a", "bc"), pair("ab", "c"), pair("abc", "")]));
        let splits = s.split_all("abc", 0, Some(1)).unwrap();
        assert_eq!(splits, BTreeSet::from([pair("a", "bc")]));
        assert!(s.split_all("", 0, None).is_none());
    }
}
