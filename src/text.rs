//! Canonical Sanskrit text.
//!
//! Every string the engine touches is held as a [`SanskritString`]: an immutable
//! value in SLP1, where each phoneme is exactly one `char`. Rule windows, split
//! indexes and suffix lengths below are all counted in chars.
//!
//! Transliteration is a seam, not a feature: [`Transcoder`] converts between an
//! external scheme and SLP1, and only the identity [`Slp1`] implementation ships
//! with the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Converts between an external encoding and canonical SLP1.
pub trait Transcoder: Send + Sync {
    /// Scheme name used in diagnostics.
    fn name(&self) -> &'static str;
    /// External text -> SLP1.
    fn to_canonical(&self, text: &str) -> String;
    /// SLP1 -> external text.
    fn from_canonical(&self, text: &str) -> String;
}

/// Identity transcoder: input is already SLP1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Slp1;

impl Transcoder for Slp1 {
    fn name(&self) -> &'static str {
        "SLP1"
    }

    fn to_canonical(&self, text: &str) -> String {
        text.to_string()
    }

    fn from_canonical(&self, text: &str) -> String {
        text.to_string()
    }
}

/// What to do with a visarga (`H`) at the very end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisargaPolicy {
    /// `H` -> `s`
    S,
    /// `H` -> `r`
    R,
}

impl VisargaPolicy {
    fn replacement(self) -> char {
        match self {
            VisargaPolicy::S => 's',
            VisargaPolicy::R => 'r',
        }
    }
}

/// Grammatical role a string currently plays.
///
/// Carried next to a string rather than baked into its type, so the same
/// [`SanskritString`] can be a finished pada in one place and a stem in another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Unknown,
    Pada,
    Pratipadika,
    Dhatu,
    Pratyaya,
}

/// Immutable SLP1 string. Equality and hashing use the canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanskritString {
    canonical: String,
}

impl SanskritString {
    /// Normalize `text` (already SLP1) and wrap it.
    pub fn new(text: &str) -> Self {
        Self { canonical: normalize(text, None) }
    }

    /// Normalize with an explicit end-of-input visarga policy.
    pub fn with_policy(text: &str, policy: Option<VisargaPolicy>) -> Self {
        Self { canonical: normalize(text, policy) }
    }

    /// Wrap `text` verbatim. Use for strict I/O and for strings the engine built itself.
    pub fn strict(text: impl Into<String>) -> Self {
        Self { canonical: text.into() }
    }

    /// Transcode from an external scheme, then normalize.
    pub fn with_transcoder(text: &str, transcoder: &dyn Transcoder, policy: Option<VisargaPolicy>) -> Self {
        Self::with_policy(&transcoder.to_canonical(text), policy)
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Length in phonemes.
    pub fn len(&self) -> usize {
        self.canonical.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Render for output. Unless `strict_io`, word-final `s` is shown as visarga.
    pub fn render(&self, transcoder: &dyn Transcoder, strict_io: bool) -> String {
        if strict_io {
            transcoder.from_canonical(&self.canonical)
        } else {
            transcoder.from_canonical(&denormalize(&self.canonical))
        }
    }
}

impl fmt::Display for SanskritString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl From<&str> for SanskritString {
    fn from(value: &str) -> Self {
        SanskritString::strict(value)
    }
}

impl AsRef<str> for SanskritString {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

// --- Normalization ----------------------------------------------------------

/// Clean user input into the form the engine expects.
///
/// Drops zero-width joiners, punctuation and digits, turns `:` into visarga and
/// newlines into spaces, collapses runs of whitespace, and fixes up the last
/// phoneme: a final anusvara becomes `m`; with a visarga policy a final `o`
/// becomes `aH` and a final `H` becomes `s`/`r`.
pub fn normalize(text: &str, policy: Option<VisargaPolicy>) -> String {
    let stripped = regex!(r"[\u{200b}\u{200c}\u{200d},'\-;().?!\x220-9|]").replace_all(text, "");
    let stripped = stripped.replace(':', "H").replace("\r\n", " ").replace('\n', " ");
    let mut s = regex!(r"\s+").replace_all(stripped.trim(), " ").into_owned();

    if s.ends_with('M') {
        log::warn!("[normalize] anusvara at end of input, replacing with m");
        s.pop();
        s.push('m');
    }
    if let Some(policy) = policy {
        if s.ends_with('o') {
            log::warn!("[normalize] o at end of input, replacing with aH");
            s.pop();
            s.push_str("aH");
        }
        if s.ends_with('H') {
            log::warn!("[normalize] visarga at end of input, replacing with {}", policy.replacement());
            s.pop();
            s.push(policy.replacement());
        }
    }
    s
}

/// Turn internal word-final `s` back into visarga for display.
pub fn denormalize(text: &str) -> String {
    let s = text.replace("s ", "H ");
    regex!(r"s$").replace(&s, "H").into_owned()
}

// --- char-indexed slicing helpers --------------------------------------------

/// `s[start..end]` counted in chars.
pub(crate) fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let from = indices.nth(start).unwrap_or(s.len());
    let to = if end <= start { from } else { indices.nth(end - start - 1).unwrap_or(s.len()) };
    &s[from..to]
}

/// `s[start..]` counted in chars.
pub(crate) fn char_tail(s: &str, start: usize) -> &str {
    match s.char_indices().nth(start) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}

/// `s[..end]` counted in chars.
pub(crate) fn char_head(s: &str, end: usize) -> &str {
    match s.char_indices().nth(end) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
