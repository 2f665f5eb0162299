//! Sanskrit sandhi splitting and sentence parsing.
//!
//! ```text
//! text ──> SanskritString ──> Segmenter (engine) ──> SandhiGraph ──> splits
//!                                 │                                   │
//!                          Sandhi + RuleTable                  VakyaGraph (vakya)
//!                          LexiconOracle                              │
//!                                                                   parses
//! ```
//!
//! [`Analyzer`] ties the pieces together; the modules can also be used on
//! their own. [`prakriya`] derives two-word sandhi from Ashtadhyayi sutras.

#[macro_use]
mod macros;
mod api;
mod config;
pub mod engine;
mod error;
pub mod lexicon;
pub mod phonology;
pub mod prakriya;
pub mod rules;
pub mod scorer;
pub mod text;
pub mod vakya;

pub use api::{Analysis, Analyzer, Parse, ParseEdge, ParseItem, ParseNode, Split, SplitReport, VerboseAnalysis};
pub use config::Options;
pub use engine::{RunMetrics, Sandhi, SandhiGraph, Segmenter, SplitPair};
pub use error::{Error, Result};
pub use lexicon::{LexiconOracle, MemoryLexicon, MorphTag, TagSet, Transitivity, demo_lexicon};
pub use prakriya::{Prakriya, SutraEngine};
pub use rules::{RuleTable, RuleTableBuilder};
pub use scorer::{LengthScorer, NgramScorer, Scorer};
pub use text::{SanskritString, Slp1, Transcoder, VisargaPolicy};
