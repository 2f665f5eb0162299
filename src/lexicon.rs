//! Lexicon oracle: word validity and morphological tags.
//!
//! The segmenter only asks "is this a word?" and, when tagging is requested,
//! "what can this word be?". Everything behind those two questions is an
//! implementation of [`LexiconOracle`]. The crate ships [`MemoryLexicon`], a
//! TOML-backed table, and embeds a small demonstration lexicon for the CLI and
//! tests.
//!
//! Tags are a closed vocabulary stored as a [`TagSet`] bit set. Names in data
//! files use the SLP1 grammatical terms (`praTamAviBaktiH`, `ekavacanam`, ...).

use crate::error::{Error, Result};
use crate::text::SanskritString;
use once_cell::sync::Lazy;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

bitflags::bitflags! {
    /// Morphological tag set of one analysis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct TagSet: u64 {
        // lakaras
        const LAW        = 1 << 0;
        const LIW        = 1 << 1;
        const LUW        = 1 << 2;
        const LFW        = 1 << 3;
        const LOW        = 1 << 4;
        const LAN        = 1 << 5;
        const LIN        = 1 << 6;
        const LUN        = 1 << 7;
        const LFN        = 1 << 8;
        const VIDHILIN   = 1 << 9;
        const ASHIRLIN   = 1 << 10;
        // krt suffixes
        const KTVA       = 1 << 11;
        const SHATR      = 1 << 12;
        const SHANAC     = 1 << 13;
        const TUMUN      = 1 << 14;
        const KTA        = 1 << 15;
        const KTAVATU    = 1 << 16;
        const LYAP       = 1 << 17;
        // vibhaktis
        const PRATHAMA   = 1 << 18;
        const DVITIYA    = 1 << 19;
        const TRITIYA    = 1 << 20;
        const CATURTHI   = 1 << 21;
        const PANCAMI    = 1 << 22;
        const SHASHTHI   = 1 << 23;
        const SAPTAMI    = 1 << 24;
        const SAMBODHANA = 1 << 25;
        // vacanas
        const EKAVACANA  = 1 << 26;
        const DVIVACANA  = 1 << 27;
        const BAHUVACANA = 1 << 28;
        // purushas
        const PRATHAMA_PURUSHA = 1 << 29;
        const MADHYAMA_PURUSHA = 1 << 30;
        const UTTAMA_PURUSHA   = 1 << 31;
        // lingas
        const PUMLLINGA      = 1 << 32;
        const NAPUMSAKALINGA = 1 << 33;
        const STRILINGA      = 1 << 34;
        const TRILINGA       = 1 << 35;
        // markers
        const KARMANI           = 1 << 36;
        const SAMASA_PURVAPADA  = 1 << 37;
        const NIJANTA           = 1 << 38;
        const AVYAYA            = 1 << 39;
        const KRIYAVISHESHANA   = 1 << 40;
        const UPASARGA          = 1 << 41;
        const KARMAPRAVACANIYA  = 1 << 42;
        const SAMYOJAKA         = 1 << 43;

        const LAKARAS = Self::LAW.bits() | Self::LIW.bits() | Self::LUW.bits() | Self::LFW.bits()
            | Self::LOW.bits() | Self::LAN.bits() | Self::LIN.bits() | Self::LUN.bits()
            | Self::LFN.bits() | Self::VIDHILIN.bits() | Self::ASHIRLIN.bits();
        const KRTS = Self::KTVA.bits() | Self::SHATR.bits() | Self::SHANAC.bits() | Self::TUMUN.bits()
            | Self::KTA.bits() | Self::KTAVATU.bits() | Self::LYAP.bits();
        const PURVAKALA = Self::KTVA.bits() | Self::LYAP.bits();
        const SAMANAKALA = Self::SHATR.bits() | Self::SHANAC.bits();
        const VIBHAKTIS = Self::PRATHAMA.bits() | Self::DVITIYA.bits() | Self::TRITIYA.bits()
            | Self::CATURTHI.bits() | Self::PANCAMI.bits() | Self::SHASHTHI.bits()
            | Self::SAPTAMI.bits() | Self::SAMBODHANA.bits();
        const VACANAS = Self::EKAVACANA.bits() | Self::DVIVACANA.bits() | Self::BAHUVACANA.bits();
        const PURUSHAS = Self::PRATHAMA_PURUSHA.bits() | Self::MADHYAMA_PURUSHA.bits()
            | Self::UTTAMA_PURUSHA.bits();
        const LINGAS = Self::PUMLLINGA.bits() | Self::NAPUMSAKALINGA.bits() | Self::STRILINGA.bits()
            | Self::TRILINGA.bits();
    }
}

/// SLP1 name of every single tag, in bit order.
const TAG_NAMES: &[(&str, TagSet)] = &[
    ("law", TagSet::LAW),
    ("liw", TagSet::LIW),
    ("luw", TagSet::LUW),
    ("lfw", TagSet::LFW),
    ("low", TagSet::LOW),
    ("laN", TagSet::LAN),
    ("liN", TagSet::LIN),
    ("luN", TagSet::LUN),
    ("lfN", TagSet::LFN),
    ("viDiliN", TagSet::VIDHILIN),
    ("ASIrliN", TagSet::ASHIRLIN),
    ("ktvA", TagSet::KTVA),
    ("Satf", TagSet::SHATR),
    ("SAnac", TagSet::SHANAC),
    ("tumun", TagSet::TUMUN),
    ("kta", TagSet::KTA),
    ("ktavatu", TagSet::KTAVATU),
    ("lyap", TagSet::LYAP),
    ("praTamAviBaktiH", TagSet::PRATHAMA),
    ("dvitIyAviBaktiH", TagSet::DVITIYA),
    ("tftIyAviBaktiH", TagSet::TRITIYA),
    ("caturTIviBaktiH", TagSet::CATURTHI),
    ("paYcamIviBaktiH", TagSet::PANCAMI),
    ("zazWIviBaktiH", TagSet::SHASHTHI),
    ("saptamIviBaktiH", TagSet::SAPTAMI),
    ("saMboDanaviBaktiH", TagSet::SAMBODHANA),
    ("ekavacanam", TagSet::EKAVACANA),
    ("dvivacanam", TagSet::DVIVACANA),
    ("bahuvacanam", TagSet::BAHUVACANA),
    ("praTamapuruzaH", TagSet::PRATHAMA_PURUSHA),
    ("maDyamapuruzaH", TagSet::MADHYAMA_PURUSHA),
    ("uttamapuruzaH", TagSet::UTTAMA_PURUSHA),
    ("puMlliNgam", TagSet::PUMLLINGA),
    ("napuMsakaliNgam", TagSet::NAPUMSAKALINGA),
    ("strIliNgam", TagSet::STRILINGA),
    ("triliNgam", TagSet::TRILINGA),
    ("karmaRi", TagSet::KARMANI),
    ("samAsapUrvapadanAmapadam", TagSet::SAMASA_PURVAPADA),
    ("RijantaH", TagSet::NIJANTA),
    ("avyayam", TagSet::AVYAYA),
    ("kriyAviSezaRam", TagSet::KRIYAVISHESHANA),
    ("upasargaH", TagSet::UPASARGA),
    ("karmapravacanIyaH", TagSet::KARMAPRAVACANIYA),
    ("saMyojakaH", TagSet::SAMYOJAKA),
];

impl TagSet {
    /// Look up a single tag by its SLP1 name. `lrw` is accepted for `lfw`.
    pub fn from_slp1(name: &str) -> Option<TagSet> {
        if name == "lrw" {
            return Some(TagSet::LFW);
        }
        TAG_NAMES.iter().find(|(n, _)| *n == name).map(|(_, t)| *t)
    }

    /// Parse a list of names; fails on the first unknown one.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> std::result::Result<TagSet, String> {
        names.iter().try_fold(TagSet::empty(), |acc, name| {
            TagSet::from_slp1(name.as_ref()).map(|t| acc | t).ok_or_else(|| name.as_ref().to_string())
        })
    }

    /// SLP1 names of the single tags in this set, in bit order.
    pub fn tag_names(&self) -> Vec<&'static str> {
        TAG_NAMES.iter().filter(|(_, t)| self.contains(*t)).map(|(n, _)| *n).collect()
    }

    /// The vibhakti bits of this set.
    pub fn vibhakti(&self) -> TagSet {
        *self & TagSet::VIBHAKTIS
    }

    pub fn vacana(&self) -> TagSet {
        *self & TagSet::VACANAS
    }

    pub fn purusha(&self) -> TagSet {
        *self & TagSet::PURUSHAS
    }

    pub fn linga(&self) -> TagSet {
        *self & TagSet::LINGAS
    }

    pub fn lakara(&self) -> TagSet {
        *self & TagSet::LAKARAS
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let names = self.tag_names();
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

/// Case, in the order grammarians number them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vibhakti {
    Prathama,
    Dvitiya,
    Tritiya,
    Caturthi,
    Pancami,
    Shashthi,
    Saptami,
    Sambodhana,
}

impl Vibhakti {
    pub const ALL: [Vibhakti; 8] = [
        Vibhakti::Prathama,
        Vibhakti::Dvitiya,
        Vibhakti::Tritiya,
        Vibhakti::Caturthi,
        Vibhakti::Pancami,
        Vibhakti::Shashthi,
        Vibhakti::Saptami,
        Vibhakti::Sambodhana,
    ];

    /// 1-based case number.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn flag(self) -> TagSet {
        match self {
            Vibhakti::Prathama => TagSet::PRATHAMA,
            Vibhakti::Dvitiya => TagSet::DVITIYA,
            Vibhakti::Tritiya => TagSet::TRITIYA,
            Vibhakti::Caturthi => TagSet::CATURTHI,
            Vibhakti::Pancami => TagSet::PANCAMI,
            Vibhakti::Shashthi => TagSet::SHASHTHI,
            Vibhakti::Saptami => TagSet::SAPTAMI,
            Vibhakti::Sambodhana => TagSet::SAMBODHANA,
        }
    }
}

/// One morphological analysis of a surface form: its base and its tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MorphTag {
    pub base: SanskritString,
    pub tags: TagSet,
}

impl MorphTag {
    pub fn new(base: &str, tags: TagSet) -> Self {
        Self { base: SanskritString::strict(base), tags }
    }

    /// True if any of `tags` is present.
    pub fn is_a(&self, tags: TagSet) -> bool {
        self.tags.intersects(tags)
    }
}

impl fmt::Display for MorphTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.base, self.tags.tag_names().join(","))
    }
}

/// How many objects a verbal root takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transitivity {
    Akarmaka,
    Sakarmaka,
    Dvikarmaka,
}

impl Transitivity {
    pub fn is_sakarmaka(self) -> bool {
        matches!(self, Transitivity::Sakarmaka | Transitivity::Dvikarmaka)
    }

    pub fn is_dvikarmaka(self) -> bool {
        self == Transitivity::Dvikarmaka
    }
}

/// Source of truth for word validity and morphology.
pub trait LexiconOracle: Send + Sync {
    /// Is `word` a known surface form?
    fn valid(&self, word: &str) -> bool;

    /// All analyses of `word`, or `None` if it is unknown. With `map_std`, tags
    /// are reported in the standard vocabulary of [`TagSet`].
    fn get_tags(&self, word: &str, map_std: bool) -> Option<Vec<MorphTag>>;

    /// Transitivity of a verbal root, if the oracle knows it.
    fn dhatu_transitivity(&self, _dhatu: &str) -> Option<Transitivity> {
        None
    }
}

/// Analyses of `word` whose base equals `base` (if given) and whose tags
/// include every tag in `tags` (if given). `None` when nothing matches.
pub fn has_tag(
    oracle: &dyn LexiconOracle,
    word: &str,
    base: Option<&str>,
    tags: Option<TagSet>,
) -> Option<Vec<MorphTag>> {
    assert!(base.is_some() || tags.is_some(), "has_tag needs a base or a tag set");
    let matches: Vec<MorphTag> = oracle
        .get_tags(word, true)?
        .into_iter()
        .filter(|m| base.is_none_or(|b| m.base.canonical() == b))
        .filter(|m| tags.is_none_or(|t| m.tags.contains(t)))
        .collect();
    if matches.is_empty() { None } else { Some(matches) }
}

// --- MemoryLexicon ----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    forms: BTreeMap<String, Vec<RawAnalysis>>,
    #[serde(default)]
    dhatus: BTreeMap<String, Transitivity>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    base: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// In-memory lexicon loaded from TOML.
///
/// ```toml
/// [forms]
/// namAmi = [{ base = "nam", tags = ["law", "uttamapuruzaH", "ekavacanam"] }]
///
/// [dhatus]
/// nam = "sakarmaka"
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLexicon {
    forms: BTreeMap<String, Vec<MorphTag>>,
    dhatus: BTreeMap<String, Transitivity>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one analysis for `form`.
    pub fn insert(&mut self, form: &str, tag: MorphTag) {
        self.forms.entry(form.to_string()).or_default().push(tag);
    }

    pub fn insert_dhatu(&mut self, dhatu: &str, transitivity: Transitivity) {
        self.dhatus.insert(dhatu.to_string(), transitivity);
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: LexiconFile =
            toml::from_str(text).map_err(|e| Error::OracleUnavailable(format!("failed to parse lexicon: {e}")))?;

        let mut lexicon = MemoryLexicon::new();
        for (form, analyses) in file.forms {
            for raw in analyses {
                let tags = TagSet::from_names(&raw.tags)
                    .map_err(|name| Error::OracleUnavailable(format!("unknown tag '{name}' for form '{form}'")))?;
                lexicon.insert(&form, MorphTag::new(&raw.base, tags));
            }
        }
        lexicon.dhatus = file.dhatus;
        log::debug!("[lexicon] loaded forms={} dhatus={}", lexicon.forms.len(), lexicon.dhatus.len());
        Ok(lexicon)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::OracleUnavailable(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

impl LexiconOracle for MemoryLexicon {
    fn valid(&self, word: &str) -> bool {
        self.forms.contains_key(word)
    }

    fn get_tags(&self, word: &str, _map_std: bool) -> Option<Vec<MorphTag>> {
        self.forms.get(word).cloned()
    }

    fn dhatu_transitivity(&self, dhatu: &str) -> Option<Transitivity> {
        self.dhatus.get(dhatu).copied()
    }
}

static DEMO_LEXICON: Lazy<Arc<MemoryLexicon>> = Lazy::new(|| {
    Arc::new(
        MemoryLexicon::from_toml_str(include_str!("../data/lexicon.toml"))
            .expect("embedded lexicon must parse"),
    )
});

/// The small lexicon embedded in the crate.
pub fn demo_lexicon() -> Arc<MemoryLexicon> {
    Arc::clone(&DEMO_LEXICON)
}
