//! Sandhi rule corpus: parsing, expansion and the bidirectional rule table.
//!
//! Rules are authored as text, one per line:
//!
//! ```text
//! [a,A] + [i,I] = e          # AdguRaH
//! m + [*hal] = M{1}          # mo'nusvAraH
//! ^sas + [*hal] = sa{1}      # only at the start of a word
//! ```
//!
//! Loading is a small pipeline:
//!
//! ```text
//! text ── RuleLine::parse ──> RuleLine ── expand ──> ExpandedRule*
//!          (line.rs)                                     │
//!                                                        v
//!                                 RuleTableBuilder::add_rule (table.rs)
//!                                   - forward  (left, right) -> merged
//!                                   - backward merged -> (left, right)
//!                                   - window maxima
//! ```
//!
//! The built [`RuleTable`] is immutable and shared behind an `Arc`. It can be
//! persisted with bincode so large corpora need not be re-expanded.

#[path = "rules/line.rs"]
mod line;
#[path = "rules/table.rs"]
mod table;

#[allow(unused_imports)]
pub use line::{ExpandedRule, RuleLine};
pub use table::{RuleKey, RuleTable, RuleTableBuilder};

#[cfg(test)]
#[path = "rules/tests.rs"]
mod tests;
