use crate::config::Options;
use crate::engine::{RunMetrics, Sandhi, SandhiGraph, Segmenter, SplitPair};
use crate::error::Result;
use crate::lexicon::{LexiconOracle, MemoryLexicon, MorphTag, demo_lexicon};
use crate::rules::{RuleTable, RuleTableBuilder};
use crate::scorer::{LengthScorer, NgramScorer, Scorer};
use crate::text::{SanskritString, Slp1};
use crate::vakya::{self, VakyaGraph, VakyaNode};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Entry point: owns the rule table, lexicon and scorer for any number of
/// queries. Every query gets its own scoreboard; nothing here is mutated.
pub struct Analyzer {
    sandhi: Sandhi,
    lexicon: Arc<dyn LexiconOracle>,
    scorer: Arc<dyn Scorer>,
    options: Options,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("rules", &self.sandhi.rules().len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Load the rule corpus, lexicon and scorer named in `options`, falling back
    /// to the embedded defaults.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        let rules = match &options.rules_dir {
            Some(dir) => {
                let mut builder = RuleTableBuilder::new();
                builder.add_rules_from_dir(dir)?;
                Arc::new(builder.build())
            }
            None => RuleTable::default_rules(),
        };
        let lexicon: Arc<dyn LexiconOracle> = match &options.lexicon {
            Some(path) => Arc::new(MemoryLexicon::from_path(path)?),
            None => demo_lexicon(),
        };
        let scorer: Arc<dyn Scorer> = match &options.scorer {
            Some(path) => Arc::new(NgramScorer::from_path(path)?),
            None => Arc::new(LengthScorer),
        };
        Ok(Self::with_parts(rules, lexicon, scorer, options))
    }

    pub fn with_parts(
        rules: Arc<RuleTable>,
        lexicon: Arc<dyn LexiconOracle>,
        scorer: Arc<dyn Scorer>,
        options: Options,
    ) -> Self {
        log::debug!("[analyzer] rules={} options={options:?}", rules.len());
        Self { sandhi: Sandhi::new(rules), lexicon, scorer, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn lexicon(&self) -> &dyn LexiconOracle {
        self.lexicon.as_ref()
    }

    fn input(&self, text: &str) -> SanskritString {
        if self.options.strict_io {
            SanskritString::strict(text)
        } else {
            SanskritString::with_policy(text, self.options.replace_ending_visarga)
        }
    }

    fn word(&self, text: &str) -> SanskritString {
        if self.options.strict_io { SanskritString::strict(text) } else { SanskritString::new(text) }
    }

    fn render(&self, s: &SanskritString) -> String {
        s.render(&Slp1, self.options.strict_io)
    }

    /// Every surface form of `first` followed by `second`.
    pub fn join(&self, first: &str, second: &str) -> Option<BTreeSet<String>> {
        self.sandhi.join(self.word(first).canonical(), self.word(second).canonical())
    }

    /// Reverse sandhi at one char position of `word`.
    pub fn split_at(&self, word: &str, idx: usize) -> Option<BTreeSet<SplitPair>> {
        self.sandhi.split_at(self.word(word).canonical(), idx)
    }

    /// Reverse sandhi at every position of `word`.
    pub fn split_all(&self, word: &str) -> Option<BTreeSet<SplitPair>> {
        self.sandhi.split_all(self.word(word).canonical(), 0, None)
    }

    /// Segment `text`. `Ok(None)` when no segmentation exists.
    pub fn analyze(&self, text: &str) -> Result<Option<Analysis<'_>>> {
        let input = self.input(text);
        let mut segmenter = Segmenter::new(&self.sandhi, self.lexicon.as_ref());
        let graph = segmenter.get_sandhi_splits(&input, true)?;
        log::debug!("[analyze] input={input} found={}", graph.is_some());
        Ok(graph.map(|graph| Analysis { analyzer: self, input, graph }))
    }

    /// Treat `words` as the one segmentation; only sentence analysis remains.
    pub fn analyze_words(&self, words: &[&str]) -> Analysis<'_> {
        let words: Vec<SanskritString> = words.iter().map(|w| self.word(w)).collect();
        let graph = Segmenter::new(&self.sandhi, self.lexicon.as_ref()).pre_segmented(&words, true);
        let joined: Vec<&str> = words.iter().map(SanskritString::canonical).collect();
        Analysis { analyzer: self, input: SanskritString::strict(joined.join(" ")), graph }
    }

    /// [`Analyzer::analyze`], the best `max_paths` splits and their parses, with
    /// timings and counters for each stage.
    pub fn analyze_verbose(&self, text: &str) -> Result<VerboseAnalysis> {
        let started = Instant::now();
        let input = self.input(text);
        let mut metrics = RunMetrics::default();

        let mut segmenter = Segmenter::new(&self.sandhi, self.lexicon.as_ref());
        let graph = segmenter.get_sandhi_splits(&input, true)?;
        metrics.segment = segmenter.metrics().clone();

        let mut splits = Vec::new();
        if let Some(graph) = graph {
            let mut analysis = Analysis { analyzer: self, input: input.clone(), graph };
            let paths_started = Instant::now();
            let found = analysis.splits(self.options.max_paths)?;
            metrics.paths = paths_started.elapsed();
            metrics.path_count = found.len();

            let parse_started = Instant::now();
            for split in &found {
                let parses = split.parses();
                metrics.parse.parses += parses.len();
                splits.push(SplitReport { words: split.rendered(), parses });
            }
            metrics.parse.splits = found.len();
            metrics.parse.duration = parse_started.elapsed();
        }

        metrics.total = started.elapsed();
        Ok(VerboseAnalysis { input: input.canonical().to_string(), splits, metrics })
    }
}

/// Segmentation graph of one input.
#[derive(Debug)]
pub struct Analysis<'a> {
    analyzer: &'a Analyzer,
    input: SanskritString,
    graph: SandhiGraph,
}

impl<'a> Analysis<'a> {
    pub fn input(&self) -> &SanskritString {
        &self.input
    }

    pub fn graph(&self) -> &SandhiGraph {
        &self.graph
    }

    /// Up to `max` segmentations, best first.
    pub fn splits(&mut self, max: usize) -> Result<Vec<Split<'a>>> {
        let options = &self.analyzer.options;
        let paths = self.graph.find_all_paths(
            max,
            options.sort_paths,
            options.score,
            self.analyzer.scorer.as_ref(),
            options.path_ceiling,
        )?;
        Ok(paths.into_iter().map(|words| Split { analyzer: self.analyzer, words }).collect())
    }
}

/// One segmentation of the input.
#[derive(Debug, Clone)]
pub struct Split<'a> {
    analyzer: &'a Analyzer,
    words: Vec<SanskritString>,
}

impl Split<'_> {
    pub fn words(&self) -> &[SanskritString] {
        &self.words
    }

    /// Words for output (visarga restored unless strict I/O).
    pub fn rendered(&self) -> Vec<String> {
        self.words.iter().map(|w| self.analyzer.render(w)).collect()
    }

    /// The sentence graph of this split; every word with all its analyses.
    pub fn vakya_graph(&self) -> VakyaGraph {
        let lexicon = self.analyzer.lexicon.as_ref();
        let tagged: Vec<(SanskritString, Vec<MorphTag>)> = self
            .words
            .iter()
            .map(|w| (w.clone(), lexicon.get_tags(w.canonical(), true).unwrap_or_default()))
            .collect();
        VakyaGraph::new(&tagged, lexicon, self.analyzer.options.split_above)
    }

    /// Valid sentence parses, cheapest first.
    pub fn parses(&self) -> Vec<Parse> {
        let graph = self.vakya_graph();
        graph.parses().iter().map(|p| Parse::new(&graph, p, self.analyzer)).collect()
    }
}

impl fmt::Display for Split<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.rendered().join(", "))
    }
}

impl Serialize for Split<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Split", 2)?;
        s.serialize_field("split", &self.rendered())?;
        s.serialize_field("parses", &self.parses())?;
        s.end()
    }
}

/// A word with the analysis a parse chose for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseNode {
    pub pada: String,
    pub root: String,
    pub tags: Vec<String>,
}

impl ParseNode {
    fn new(node: &VakyaNode, analyzer: &Analyzer) -> Self {
        ParseNode {
            pada: analyzer.render(&node.pada),
            root: analyzer.render(&node.tag.base),
            tags: node.tag.tags.tag_names().into_iter().map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => ({}, [{}])", self.pada, self.root, self.tags.join(", "))
    }
}

/// A word and its relation to its head.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseEdge {
    pub node: ParseNode,
    pub predecessor: String,
    pub sambandha: String,
}

impl fmt::Display for ParseEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} of {}", self.node, self.sambandha, self.predecessor)
    }
}

/// Head words serialize as bare nodes, the rest as edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParseItem {
    Edge(ParseEdge),
    Node(ParseNode),
}

impl fmt::Display for ParseItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseItem::Edge(e) => e.fmt(f),
            ParseItem::Node(n) => n.fmt(f),
        }
    }
}

/// One sentence parse in word order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parse {
    pub graph: Vec<ParseItem>,
    pub cost: f64,
}

impl Parse {
    fn new(graph: &VakyaGraph, parse: &vakya::Parse, analyzer: &Analyzer) -> Self {
        let mut nodes: Vec<usize> = parse.nodes().into_iter().collect();
        nodes.sort_by_key(|n| graph.node(*n).index);
        let items = nodes
            .into_iter()
            .map(|n| {
                let node = ParseNode::new(graph.node(n), analyzer);
                match parse.predecessor(n) {
                    Some(e) => ParseItem::Edge(ParseEdge {
                        node,
                        predecessor: analyzer.render(&graph.node(e.from).pada),
                        sambandha: e.label.to_string(),
                    }),
                    None => ParseItem::Node(node),
                }
            })
            .collect();
        Parse { graph: items, cost: parse.cost }
    }
}

impl fmt::Display for Parse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.graph.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Result of [`Analyzer::analyze_verbose`].
#[derive(Debug, Clone)]
pub struct VerboseAnalysis {
    pub input: String,
    pub splits: Vec<SplitReport>,
    pub metrics: RunMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitReport {
    pub words: Vec<String>,
    pub parses: Vec<Parse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::PathBuf;

    fn analyzer() -> Analyzer {
        Analyzer::new(Options::default()).unwrap()
    }

    fn canonical(split: &Split<'_>) -> Vec<String> {
        split.words().iter().map(|w| w.canonical().to_string()).collect()
    }

    #[test]
    fn analyze_finds_splits_and_parses() {
        let a = analyzer();
        let mut analysis = a.analyze("rAmo vanaM gacCati").unwrap().unwrap();
        let splits = analysis.splits(10).unwrap();
        let split = splits.iter().find(|s| canonical(s) == ["rAmas", "vanam", "gacCati"]).unwrap();
        assert_eq!(split.rendered(), vec!["rAmaH", "vanam", "gacCati"]);

        let parses = split.parses();
        assert_eq!(parses.len(), 1);
        let json = serde_json::to_value(&parses[0]).unwrap();
        let graph = json["graph"].as_array().unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph[0]["node"]["pada"], "rAmaH");
        assert_eq!(graph[0]["node"]["root"], "rAma");
        assert_eq!(graph[0]["predecessor"], "gacCati");
        assert_eq!(graph[0]["sambandha"], "kartA");
        assert_eq!(graph[1]["sambandha"], "karma");
        assert_eq!(graph[2]["pada"], "gacCati");
        assert!(graph[2].get("predecessor").is_none());
    }

    #[test]
    fn no_split_is_none_not_error() {
        assert!(analyzer().analyze("kzkzkz").unwrap().is_none());
    }

    #[test]
    fn split_serializes_words_and_parses() {
        let a = analyzer();
        let mut analysis = a.analyze_words(&["gaReSam", "namAmi"]);
        let splits = analysis.splits(1).unwrap();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].to_string(), "[gaReSam, namAmi]");
        let json = serde_json::to_value(&splits[0]).unwrap();
        assert_eq!(json["split"], serde_json::json!(["gaReSam", "namAmi"]));
        assert_eq!(json["parses"][0]["graph"][0]["sambandha"], "karma");
    }

    #[test]
    fn raw_sandhi_operations() {
        let a = analyzer();
        assert!(a.join("te", "eva").unwrap().contains("tayeva"));
        assert!(a.split_all("ityeva").unwrap().contains(&("iti".to_string(), "eva".to_string())));
        assert!(a.split_at("ityeva", 2).unwrap().contains(&("iti".to_string(), "eva".to_string())));
    }

    #[test]
    fn verbose_run_reports_every_stage() {
        let res = analyzer().analyze_verbose("gaReSannamAmi").unwrap();
        assert_eq!(res.input, "gaReSannamAmi");
        assert!(res.metrics.path_count >= 1);
        assert_eq!(res.metrics.parse.splits, res.metrics.path_count);
        assert_eq!(res.splits.len(), res.metrics.path_count);
        assert!(res.metrics.segment.substrings_explored > 0);
        assert!(res.metrics.total >= res.metrics.segment.duration);
        assert!(res.splits.iter().any(|s| s.words == ["gaReSam", "namAmi"] && !s.parses.is_empty()));
    }

    #[test]
    fn missing_lexicon_is_fatal() {
        let options = Options { lexicon: Some(PathBuf::from("/nonexistent/lexicon.toml")), ..Options::default() };
        assert!(matches!(Analyzer::new(options), Err(Error::OracleUnavailable(_))));
    }
}
