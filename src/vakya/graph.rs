//! The k-partite compatibility graph of one segmentation.

use super::check::{self, parse_cost};
use super::dedup::ParseKey;
use super::labels::{EdgeLabel, LabeledEdge, Relation};
use super::parse;
use crate::lexicon::{LexiconOracle, MorphTag, TagSet, Vibhakti};
use crate::text::SanskritString;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Instant;

/// Default partition count above which parse search divides and conquers.
pub const DEFAULT_MAX_PARSE_DC: usize = 4;

const CONJUNCTIONS: &[&str] = &["ca"];
const DISJUNCTIONS: &[&str] = &["uta", "vA"];
const NISHEDHA: &[&str] = &["na"];
const KARMAP_NULL: &[&str] = &["su", "api"];
const AVYAYA_KRIYAV: &[&str] = &["kila", "bata", "aho", "nanu", "hanta", "eva", "tu"];
const KARMAP_2: &[&str] = &["anu", "upa", "prati", "aBi", "aDi", "ati"];
const KARMAP_5: &[&str] = &["apa", "pari", "A", "prati"];

/// Words that govern a case without being a karaka.
const NON_KARAKA_VIBHAKTIS: &[(Vibhakti, &[&str])] = &[
    (Vibhakti::Dvitiya, &["antarA", "antareRa", "pfTak", "vinA", "nAnA"]),
    (Vibhakti::Tritiya, &["saha", "pfTak", "vinA", "nAnA"]),
    (Vibhakti::Caturthi, &["namaH", "svasti", "svAhA", "alam", "vazaw"]),
    (Vibhakti::Pancami, &["anya", "Arat", "itara", "fte", "pfTak", "vinA", "nAnA"]),
];

/// Sentence-linking words and their correlatives. `None` means the link may
/// go to the verb of the other clause instead.
const SENTENCE_CONJUNCTIONS: &[(&str, &[Option<&str>])] = &[
    ("yad", &[Some("tad"), None]),
    ("yadi", &[Some("tarhi")]),
    ("yatra", &[Some("tatra")]),
    ("yAvat", &[Some("tAvat")]),
    ("yadA", &[Some("tadA")]),
    ("yaTA", &[Some("taTA")]),
    ("api", &[None]),
    ("cet", &[None]),
    ("natu", &[None]),
];

fn correlatives(base: &str) -> Option<&'static [Option<&'static str>]> {
    SENTENCE_CONJUNCTIONS.iter().find(|(y, _)| *y == base).map(|(_, t)| *t)
}

fn is_conjunction_base(base: &str) -> bool {
    CONJUNCTIONS.contains(&base) || DISJUNCTIONS.contains(&base)
}

/// One reading of one word: the word, a single analysis, and its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VakyaNode {
    pub pada: SanskritString,
    pub tag: MorphTag,
    pub index: usize,
}

impl VakyaNode {
    pub fn base(&self) -> &str {
        self.tag.base.canonical()
    }

    pub fn is_a(&self, tags: TagSet) -> bool {
        self.tag.is_a(tags)
    }

    fn tags(&self) -> TagSet {
        self.tag.tags
    }
}

impl fmt::Display for VakyaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pada, self.tag, self.index)
    }
}

pub(crate) fn is_sentence_conjunction(node: &VakyaNode) -> bool {
    correlatives(node.base()).is_some()
}

/// Person implied by a nominal: `asmad` is first, `yuzmad` second, all else third.
fn implied_purusha(node: &VakyaNode) -> TagSet {
    match node.base() {
        "asmad" => TagSet::UTTAMA_PURUSHA,
        "yuzmad" => TagSet::MADHYAMA_PURUSHA,
        _ => TagSet::PRATHAMA_PURUSHA,
    }
}

/// Verb `d` agrees with nominal `n` in person and number.
pub fn match_purusha_vacana(d: &VakyaNode, n: &VakyaNode) -> bool {
    d.tags().vacana() == n.tags().vacana() && d.tags().purusha() == implied_purusha(n)
}

pub fn match_linga_vacana(a: &VakyaNode, b: &VakyaNode) -> bool {
    a.tags().vacana() == b.tags().vacana() && a.tags().linga() == b.tags().linga()
}

pub fn match_linga_vacana_vibhakti(a: &VakyaNode, b: &VakyaNode) -> bool {
    match_linga_vacana(a, b) && a.tags().vibhakti() == b.tags().vibhakti()
}

/// A vocative can only address the listener of a second-person verb.
pub fn check_sambodhya(d: &VakyaNode, n: &VakyaNode) -> bool {
    d.tags().vacana() == n.tags().vacana() && d.tags().purusha() == TagSet::MADHYAMA_PURUSHA
}

fn lowest_flag(t: TagSet) -> TagSet {
    TagSet::from_bits_retain(t.bits() & t.bits().wrapping_neg())
}

fn combine_vacana(a: TagSet, b: TagSet, conjunction: bool) -> TagSet {
    let both_singular = a == TagSet::EKAVACANA && b == TagSet::EKAVACANA;
    if conjunction {
        if both_singular { TagSet::DVIVACANA } else { TagSet::BAHUVACANA }
    } else if both_singular {
        TagSet::EKAVACANA
    } else if a == TagSet::BAHUVACANA || b == TagSet::BAHUVACANA {
        TagSet::BAHUVACANA
    } else {
        TagSet::DVIVACANA
    }
}

fn combine_linga(a: TagSet, b: TagSet) -> TagSet {
    if a == TagSet::NAPUMSAKALINGA || b == TagSet::NAPUMSAKALINGA {
        TagSet::NAPUMSAKALINGA
    } else if a == TagSet::PUMLLINGA || b == TagSet::PUMLLINGA {
        TagSet::PUMLLINGA
    } else {
        TagSet::STRILINGA
    }
}

/// A complete, labelled, valid parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parse {
    pub edges: Vec<LabeledEdge>,
    pub cost: f64,
}

impl Parse {
    /// Node ids that take part, ascending.
    pub fn nodes(&self) -> BTreeSet<usize> {
        self.edges.iter().flat_map(|e| [e.from, e.to]).collect()
    }

    /// The arc into `node`, if any.
    pub fn predecessor(&self, node: usize) -> Option<&LabeledEdge> {
        self.edges.iter().find(|e| e.to == node)
    }
}

/// Compatibility graph over the readings of one word sequence.
///
/// Node `i` of partition `k` is one analysis of word `k`. Edges run from a
/// head to a dependent and may carry several labels in parallel.
#[derive(Debug, Clone)]
pub struct VakyaGraph {
    nodes: Vec<VakyaNode>,
    partitions: Vec<Vec<usize>>,
    edges: BTreeMap<(usize, usize), BTreeSet<EdgeLabel>>,
    preds: BTreeMap<usize, BTreeSet<usize>>,
    succs: BTreeMap<usize, BTreeSet<usize>>,
    parses: Vec<Parse>,
}

impl VakyaGraph {
    /// Build the graph for `words` (each with all its analyses) and extract
    /// its parses, cheapest first.
    pub fn new(words: &[(SanskritString, Vec<MorphTag>)], oracle: &dyn LexiconOracle, max_parse_dc: usize) -> Self {
        let mut g = Self::build(words);
        g.add_edges(oracle);
        g.remove_isolates(words);

        let start = Instant::now();
        let partials = parse::get_parses_dc(&g, max_parse_dc);
        let enumerated = start.elapsed();
        g.parses = g.complete(&partials);
        log::info!(
            "[vakya] words={} nodes={} edges={} parses={} enumerate={:?} total={:?}",
            words.len(),
            g.nodes.len(),
            g.edge_count(),
            g.parses.len(),
            enumerated,
            start.elapsed()
        );
        g
    }

    fn build(words: &[(SanskritString, Vec<MorphTag>)]) -> Self {
        let mut g = VakyaGraph {
            nodes: Vec::new(),
            partitions: Vec::with_capacity(words.len()),
            edges: BTreeMap::new(),
            preds: BTreeMap::new(),
            succs: BTreeMap::new(),
            parses: Vec::new(),
        };
        for (index, (pada, tags)) in words.iter().enumerate() {
            let mut partition = Vec::with_capacity(tags.len());
            for tag in tags {
                partition.push(g.nodes.len());
                g.nodes.push(VakyaNode { pada: pada.clone(), tag: tag.clone(), index });
            }
            g.partitions.push(partition);
        }
        log::debug!("[vakya] partitions={} nodes={}", g.partitions.len(), g.nodes.len());
        g
    }

    // --- Accessors -----------------------------------------------------------

    pub fn node(&self, id: usize) -> &VakyaNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[VakyaNode] {
        &self.nodes
    }

    /// Node ids per word position. Isolated readings have been removed.
    pub fn partitions(&self) -> &[Vec<usize>] {
        &self.partitions
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Partition of every node id.
    pub(crate) fn index_map(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.index).collect()
    }

    /// Every labelled edge.
    pub fn edges(&self) -> impl Iterator<Item = LabeledEdge> + '_ {
        self.edges
            .iter()
            .flat_map(|(&(from, to), labels)| labels.iter().map(move |&label| LabeledEdge { from, to, label }))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Labels on `from -> to`; empty if there is no such edge.
    pub fn labels(&self, from: usize, to: usize) -> Vec<EdgeLabel> {
        self.edges.get(&(from, to)).map(|l| l.iter().copied().collect()).unwrap_or_default()
    }

    pub fn predecessors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.preds.get(&node).into_iter().flatten().copied()
    }

    pub fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.succs.get(&node).into_iter().flatten().copied()
    }

    /// Valid parses, cheapest first.
    pub fn parses(&self) -> &[Parse] {
        &self.parses
    }

    // --- Edge construction ---------------------------------------------------

    fn add_edge(&mut self, from: usize, to: usize, label: impl Into<EdgeLabel>) {
        let label = label.into();
        log::debug!("[vakya] edge {} -> {} {label}", self.nodes[from], self.nodes[to]);
        self.edges.entry((from, to)).or_default().insert(label);
        self.preds.entry(to).or_default().insert(from);
        self.succs.entry(from).or_default().insert(to);
    }

    fn has_incoming(&self, node: usize, label: EdgeLabel) -> bool {
        self.predecessors(node).any(|p| self.edges[&(p, node)].contains(&label))
    }

    fn same_partition(&self, a: usize, b: usize) -> bool {
        self.nodes[a].index == self.nodes[b].index
    }

    fn ids_with(&self, tags: TagSet) -> Vec<usize> {
        (0..self.nodes.len()).filter(|&n| self.nodes[n].is_a(tags)).collect()
    }

    fn add_edges(&mut self, oracle: &dyn LexiconOracle) {
        let laks = self.ids_with(TagSet::LAKARAS);
        let krts = self.ids_with(TagSet::KRTS);
        let bases: BTreeSet<usize> = laks.iter().chain(&krts).copied().collect();

        // tag rewriting on ca/vA must precede the karakas
        self.add_conjunctions();
        self.add_karakas(&bases, oracle);
        self.add_samastas();
        self.add_shashthi();
        self.add_kriyavisheshana(&bases);
        self.add_visheshana();
        self.add_kriya_kriya(&laks, &krts);
        self.add_avyayas(&bases);
        self.add_bhavalakshana(&krts, &laks);
        self.add_non_karaka_vibhaktis();
        self.add_vipsa();
        self.add_sentence_conjunctions(&laks, &krts);
    }

    fn is_conjunction(&self, n: usize) -> bool {
        self.nodes[n].is_a(TagSet::AVYAYA) && is_conjunction_base(self.nodes[n].base())
    }

    /// `samuccitam` edges from `ca`/`uta`/`vA` to the items they join.
    ///
    /// The conjunction temporarily takes the case (or lakara) of the item
    /// before it so that a chain `A ca B ca` can be found walking backwards;
    /// the second pass fixes the conjunction's final tags.
    fn add_conjunctions(&mut self) {
        for i in 1..self.partitions.len() {
            for n in self.partitions[i].clone() {
                if !self.is_conjunction(n) {
                    continue;
                }
                for nn in self.partitions[i - 1].clone() {
                    let prev = self.nodes[nn].tags();
                    if prev.intersects(TagSet::VIBHAKTIS) {
                        self.add_edge(n, nn, Relation::Samuccita);
                        let vibhakti = prev.vibhakti();
                        self.nodes[n].tag.tags |= vibhakti;
                        self.link_earlier(i, n, nn, |g, nnn| g.nodes[nnn].tags().vibhakti() == vibhakti);
                    } else if prev.intersects(TagSet::LAKARAS) {
                        self.add_edge(n, nn, Relation::Samuccita);
                        let lakara = prev.lakara();
                        self.nodes[n].tag.tags |= lakara | prev.purusha() | prev.vacana();
                        self.link_earlier(i, n, nn, |g, nnn| {
                            g.nodes[nnn].tags().lakara() == lakara && match_purusha_vacana(&g.nodes[nnn], &g.nodes[nn])
                        });
                    }
                }
            }
        }

        for n in 0..self.nodes.len() {
            if !self.is_conjunction(n) {
                continue;
            }
            let t = self.nodes[n].tags();
            let (v, lk) = (t.vibhakti(), t.lakara());
            if self.has_incoming(n, Relation::Samuccita.into()) {
                let mut drop = v;
                if !lk.is_empty() {
                    drop |= lk | t.vacana() | t.purusha();
                }
                self.nodes[n].tag.tags.remove(drop);
            }
            let now = self.nodes[n].tags();
            if now.intersects(lk) {
                self.nodes[n].tag.tags.remove(lk | t.vacana() | t.purusha() | v);
                log::debug!("[vakya] conjunction lakara dropped {}", self.nodes[n]);
            } else if now.intersects(v) {
                let agreement = self.conjunct_agreement(n);
                self.nodes[n].tag.tags |= agreement;
                log::debug!("[vakya] conjunction vibhakti locked {}", self.nodes[n]);
            }
        }
    }

    fn link_earlier(&mut self, i: usize, n: usize, nn: usize, matches: impl Fn(&Self, usize) -> bool) {
        for ni in (0..i - 1).rev() {
            let mut chained = false;
            for nnn in self.partitions[ni].clone() {
                if !matches(&*self, nnn) {
                    continue;
                }
                let other = &self.nodes[nnn];
                if ni == i - 2 && other.is_a(TagSet::AVYAYA) && other.base() == self.nodes[n].base() {
                    self.add_edge(nn, nnn, Relation::Samuccita);
                    chained = true;
                } else if !is_conjunction_base(other.base()) {
                    self.add_edge(n, nnn, Relation::Samuccita);
                }
            }
            // an earlier conjunction of the same kind owns everything before it
            if chained {
                break;
            }
        }
    }

    /// Number and gender of a conjoined group, from everything reachable below `n`.
    fn conjunct_agreement(&self, n: usize) -> TagSet {
        let conjunction = CONJUNCTIONS.contains(&self.nodes[n].base());
        let mut vacana = TagSet::empty();
        let mut linga = TagSet::STRILINGA;
        for s in self.reachable(n) {
            let t = self.nodes[s].tags();
            let v = lowest_flag(t.vacana());
            if vacana.is_empty() {
                vacana = v;
            } else if !v.is_empty() {
                vacana = combine_vacana(vacana, v, conjunction);
            }
            let l = lowest_flag(t.linga());
            if !l.is_empty() {
                linga = combine_linga(linga, l);
            }
        }
        vacana | linga
    }

    /// Depth-first preorder of nodes reachable from `n`, excluding `n`.
    fn reachable(&self, n: usize) -> Vec<usize> {
        let mut seen = BTreeSet::from([n]);
        let mut order = Vec::new();
        let mut stack: Vec<usize> = self.successors(n).collect::<Vec<_>>().into_iter().rev().collect();
        while let Some(s) = stack.pop() {
            if !seen.insert(s) {
                continue;
            }
            order.push(s);
            stack.extend(self.successors(s).collect::<Vec<_>>().into_iter().rev());
        }
        order
    }

    fn add_karakas(&mut self, bases: &BTreeSet<usize>, oracle: &dyn LexiconOracle) {
        for &d in bases {
            let verb = &self.nodes[d];
            let dhatu = verb.base().split('#').next().unwrap_or_default();
            let (sakarmaka, dvikarmaka) = if verb.is_a(TagSet::LAKARAS) {
                oracle.dhatu_transitivity(dhatu).map_or((true, false), |t| (t.is_sakarmaka(), t.is_dvikarmaka()))
            } else {
                (true, false)
            };
            let karmani = verb.is_a(TagSet::KARMANI);
            let nijanta = verb.is_a(TagSet::NIJANTA);
            let lakara = verb.is_a(TagSet::LAKARAS);
            log::trace!("[vakya] dhatu={dhatu} sakarmaka={sakarmaka} dvikarmaka={dvikarmaka} karmani={karmani}");

            for n in 0..self.nodes.len() {
                if self.same_partition(d, n) {
                    continue;
                }
                let (verb, noun) = (&self.nodes[d], &self.nodes[n]);
                let mut labels = Vec::new();
                if karmani {
                    if noun.is_a(TagSet::TRITIYA) {
                        if nijanta {
                            labels.push(Relation::HetuKarta);
                        }
                        labels.push(Relation::Karta);
                    } else if noun.is_a(TagSet::PRATHAMA) && match_purusha_vacana(verb, noun) && lakara && sakarmaka {
                        labels.push(Relation::Karma);
                        if dvikarmaka {
                            labels.push(Relation::GaunaKarma);
                        }
                    }
                } else if noun.is_a(TagSet::PRATHAMA) && lakara && match_purusha_vacana(verb, noun) {
                    labels.push(if nijanta { Relation::HetuKarta } else { Relation::Karta });
                } else if noun.is_a(TagSet::TRITIYA) && nijanta {
                    labels.push(Relation::Karta);
                } else if noun.is_a(TagSet::DVITIYA) && sakarmaka {
                    labels.push(Relation::Karma);
                    if dvikarmaka {
                        labels.push(Relation::GaunaKarma);
                    }
                }

                if noun.is_a(TagSet::TRITIYA) {
                    labels.push(Relation::Karana);
                } else if noun.is_a(TagSet::CATURTHI) {
                    labels.push(Relation::Sampradana);
                } else if noun.is_a(TagSet::PANCAMI) {
                    labels.push(Relation::Apadana);
                } else if noun.is_a(TagSet::SAPTAMI) {
                    labels.push(Relation::Adhikarana);
                } else if noun.is_a(TagSet::SAMBODHANA) && check_sambodhya(verb, noun) {
                    labels.push(Relation::Sambodhya);
                }

                for label in labels {
                    self.add_edge(d, n, label);
                }
            }
        }
    }

    /// Links from the word after a compound member (or genitive) back to it.
    fn add_following(&mut self, marker: TagSet, relation: Relation) {
        for i in 0..self.partitions.len().saturating_sub(1) {
            for n in self.partitions[i].clone() {
                if !self.nodes[n].is_a(marker) {
                    continue;
                }
                for nn in self.partitions[i + 1].clone() {
                    if self.nodes[nn].is_a(TagSet::VIBHAKTIS | TagSet::SAMASA_PURVAPADA) {
                        self.add_edge(nn, n, relation);
                    }
                }
            }
        }
    }

    fn add_samastas(&mut self) {
        self.add_following(TagSet::SAMASA_PURVAPADA, Relation::Samasta);
    }

    fn add_shashthi(&mut self) {
        self.add_following(TagSet::SHASHTHI, Relation::ShashthiSambandha);
    }

    fn add_kriyavisheshana(&mut self, bases: &BTreeSet<usize>) {
        for &d in bases {
            for n in 0..self.nodes.len() {
                let node = &self.nodes[n];
                if !self.same_partition(d, n)
                    && node.is_a(TagSet::AVYAYA)
                    && (node.is_a(TagSet::KRIYAVISHESHANA) || AVYAYA_KRIYAV.contains(&node.base()))
                {
                    self.add_edge(d, n, Relation::KriyaVisheshana);
                }
            }
        }
    }

    fn add_visheshana(&mut self) {
        for n in self.ids_with(TagSet::VIBHAKTIS) {
            for no in 0..self.nodes.len() {
                let (a, b) = (&self.nodes[n], &self.nodes[no]);
                if !self.same_partition(n, no) && match_linga_vacana_vibhakti(a, b) && a.base() != b.base() {
                    self.add_edge(n, no, Relation::Visheshana);
                }
            }
        }
    }

    fn add_kriya_kriya(&mut self, laks: &[usize], krts: &[usize]) {
        for &d in laks {
            for &n in krts {
                if self.same_partition(d, n) {
                    continue;
                }
                let krt = &self.nodes[n];
                if krt.is_a(TagSet::PURVAKALA) {
                    self.add_edge(d, n, Relation::Purvakala);
                } else if krt.is_a(TagSet::TUMUN) {
                    self.add_edge(d, n, Relation::Prayojana);
                } else if krt.is_a(TagSet::SAMANAKALA)
                    && krt.is_a(TagSet::PRATHAMA)
                    && match_purusha_vacana(&self.nodes[d], krt)
                {
                    self.add_edge(d, n, Relation::Samanakala);
                }
            }
        }
    }

    fn add_avyayas(&mut self, bases: &BTreeSet<usize>) {
        let last = self.partitions.len().saturating_sub(1);
        for i in 0..self.partitions.len() {
            for n in self.partitions[i].clone() {
                let node = &self.nodes[n];
                if node.is_a(TagSet::UPASARGA) {
                    if i == last {
                        continue;
                    }
                    for nn in self.partitions[i + 1].clone() {
                        let next = &self.nodes[nn];
                        if (bases.contains(&nn) && !next.is_a(TagSet::KTVA)) || next.is_a(TagSet::UPASARGA) {
                            self.add_edge(nn, n, Relation::Upasarga);
                        }
                    }
                } else if node.is_a(TagSet::AVYAYA) && NISHEDHA.contains(&node.base()) {
                    for &b in bases {
                        if !self.same_partition(n, b) {
                            self.add_edge(b, n, Relation::Nishedha);
                        }
                    }
                } else if node.is_a(TagSet::KARMAPRAVACANIYA)
                    && !AVYAYA_KRIYAV.contains(&node.base())
                    && !KARMAP_NULL.contains(&node.base())
                {
                    let base = node.base().to_string();
                    for &b in bases {
                        if !self.same_partition(n, b) {
                            self.add_edge(b, n, Relation::Karmapravacaniya);
                        }
                    }
                    let mut neighbours = Vec::new();
                    if i < last {
                        neighbours.extend(self.partitions[i + 1].iter().copied());
                    }
                    if i > 0 {
                        neighbours.extend(self.partitions[i - 1].iter().copied());
                    }
                    for nn in neighbours {
                        let other = &self.nodes[nn];
                        if other.is_a(TagSet::DVITIYA) && KARMAP_2.contains(&base.as_str()) {
                            self.add_edge(n, nn, Relation::KarmapravacaniyaDvitiya);
                        } else if other.is_a(TagSet::PANCAMI) && KARMAP_5.contains(&base.as_str()) {
                            self.add_edge(n, nn, Relation::KarmapravacaniyaPancami);
                        }
                    }
                }
            }
        }
    }

    fn add_bhavalakshana(&mut self, krts: &[usize], laks: &[usize]) {
        for &k in krts {
            if !self.nodes[k].is_a(TagSet::SAPTAMI) {
                continue;
            }
            for &lak in laks {
                if !self.same_partition(k, lak) {
                    self.add_edge(lak, k, Relation::Bhavalakshana);
                }
            }
        }
    }

    fn add_non_karaka_vibhaktis(&mut self) {
        for n in 0..self.nodes.len() {
            for &(vibhakti, words) in NON_KARAKA_VIBHAKTIS {
                if !words.contains(&self.nodes[n].base()) {
                    continue;
                }
                for nn in 0..self.nodes.len() {
                    if self.nodes[nn].is_a(vibhakti.flag()) && !self.same_partition(nn, n) {
                        self.add_edge(n, nn, Relation::Upapada(vibhakti));
                    }
                }
            }
        }
    }

    fn add_vipsa(&mut self) {
        for n in 0..self.nodes.len() {
            for no in 0..self.nodes.len() {
                let (a, b) = (&self.nodes[n], &self.nodes[no]);
                if a.index + 1 == b.index && a.pada == b.pada {
                    self.add_edge(n, no, Relation::Vipsa);
                }
            }
        }
    }

    fn is_vipsa(&self, n: usize) -> bool {
        self.has_incoming(n, Relation::Vipsa.into())
    }

    /// Links between the clauses of `yadi .. tarhi ..`, `.. cet ..` and the like.
    ///
    /// Every relation into the linking word is mirrored as a `sambadDa-` arc out
    /// of it, the word is tied to its correlative (`vAkyasambanDaH`), and a
    /// saMyojaka may instead attach to the verb of either clause.
    fn add_sentence_conjunctions(&mut self, laks: &[usize], krts: &[usize]) {
        let bases: BTreeSet<usize> = laks
            .iter()
            .copied()
            .chain(krts.iter().copied().filter(|&k| self.nodes[k].is_a(TagSet::PRATHAMA)))
            .collect();

        for n in 0..self.nodes.len() {
            let Some(partners) = correlatives(self.nodes[n].base()) else {
                continue;
            };
            if self.is_vipsa(n) {
                continue;
            }

            for p in self.predecessors(n).collect::<Vec<_>>() {
                for label in self.labels(p, n) {
                    // already mirrored by another linking word
                    if label.sambaddha {
                        continue;
                    }
                    if label.is(Relation::Visheshana) {
                        for pp in self.predecessors(p).collect::<Vec<_>>() {
                            for pl in self.labels(pp, p) {
                                if !pl.sambaddha {
                                    self.add_edge(p, pp, EdgeLabel::sambaddha(pl.relation));
                                }
                            }
                        }
                    }
                    self.add_edge(n, p, EdgeLabel::sambaddha(label.relation));
                }
            }

            let samyojaka = self.nodes[n].is_a(TagSet::SAMYOJAKA);
            for nn in 0..self.nodes.len() {
                if self.same_partition(n, nn) {
                    continue;
                }
                let other_base = self.nodes[nn].base();
                if !self.is_vipsa(nn)
                    && partners.iter().any(|p| *p == Some(other_base))
                    && match_linga_vacana(&self.nodes[n], &self.nodes[nn])
                {
                    self.add_edge(nn, n, Relation::Vakyasambandha);
                }
                if samyojaka && bases.contains(&nn) {
                    self.add_edge(n, nn, Relation::SambaddhaKriya);
                    if partners.contains(&None) {
                        self.add_edge(nn, n, Relation::Vakyasambandha);
                    }
                }
            }
        }
    }

    fn remove_isolates(&mut self, words: &[(SanskritString, Vec<MorphTag>)]) {
        let connected: BTreeSet<usize> = self.preds.keys().chain(self.succs.keys()).copied().collect();
        for (ix, partition) in self.partitions.iter_mut().enumerate() {
            partition.retain(|n| connected.contains(n));
            if partition.is_empty() {
                log::error!("[vakya] partition {ix}: {} has no connected reading", words[ix].0);
            }
        }
    }

    // --- Parses ---------------------------------------------------------------

    /// Label, validate, cost and order the unlabelled parses.
    fn complete(&self, partials: &[parse::VakyaParse]) -> Vec<Parse> {
        let mut seen = BTreeSet::new();
        let mut parses = Vec::new();
        for partial in partials {
            for edges in check::labelings(self, partial) {
                if !check::check_parse(self, &edges, false) {
                    continue;
                }
                if seen.insert(ParseKey::new(edges.iter().map(|e| (e.from, e.to, e.label)))) {
                    let cost = parse_cost(self, &edges);
                    parses.push(Parse { edges, cost });
                }
            }
        }
        parses.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        log::debug!("[vakya] valid parses={}", parses.len());
        parses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacana_and_linga_of_conjoined_groups() {
        use TagSet as T;
        assert_eq!(combine_vacana(T::EKAVACANA, T::EKAVACANA, true), T::DVIVACANA);
        assert_eq!(combine_vacana(T::EKAVACANA, T::DVIVACANA, true), T::BAHUVACANA);
        assert_eq!(combine_vacana(T::EKAVACANA, T::EKAVACANA, false), T::EKAVACANA);
        assert_eq!(combine_vacana(T::DVIVACANA, T::BAHUVACANA, false), T::BAHUVACANA);
        assert_eq!(combine_vacana(T::EKAVACANA, T::DVIVACANA, false), T::DVIVACANA);

        assert_eq!(combine_linga(T::STRILINGA, T::PUMLLINGA), T::PUMLLINGA);
        assert_eq!(combine_linga(T::PUMLLINGA, T::NAPUMSAKALINGA), T::NAPUMSAKALINGA);
        assert_eq!(combine_linga(T::STRILINGA, T::TRILINGA), T::STRILINGA);
    }

    #[test]
    fn lowest_flag_picks_one_bit() {
        assert_eq!(lowest_flag(tags!(EKAVACANA, BAHUVACANA)), TagSet::EKAVACANA);
        assert_eq!(lowest_flag(TagSet::empty()), TagSet::empty());
    }

    #[test]
    fn agreement_helpers() {
        let node = |base: &str, tags: TagSet| VakyaNode {
            pada: SanskritString::strict(base),
            tag: MorphTag::new(base, tags),
            index: 0,
        };
        let gacchami = node("gam", tags!(LAW, UTTAMA_PURUSHA, EKAVACANA));
        assert!(match_purusha_vacana(&gacchami, &node("asmad", tags!(PRATHAMA, EKAVACANA))));
        assert!(!match_purusha_vacana(&gacchami, &node("rAma", tags!(PRATHAMA, EKAVACANA))));
        let gacchasi = node("gam", tags!(LAW, MADHYAMA_PURUSHA, EKAVACANA));
        assert!(check_sambodhya(&gacchasi, &node("rAma", tags!(SAMBODHANA, EKAVACANA))));
        assert!(!check_sambodhya(&gacchami, &node("rAma", tags!(SAMBODHANA, EKAVACANA))));
    }
}
