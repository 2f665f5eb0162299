//! The compiled rule table and its builder.

use super::line::RuleLine;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// `(left_suffix, right_prefix)` key of a forward rule.
pub type RuleKey = (String, String);

/// Bidirectional sandhi rule table.
///
/// Built once from the rule corpus and shared read-only. The three length
/// maxima bound the windows the sandhi engine has to look at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    forward: BTreeMap<RuleKey, BTreeSet<(String, String)>>,
    backward: BTreeMap<String, BTreeSet<(RuleKey, String)>>,
    lc_len_max: usize,
    rc_len_max: usize,
    after_len_max: usize,
}

impl RuleTable {
    /// Merged forms for `(left_suffix, right_prefix)`, with annotations.
    pub fn forward(&self, left: &str, right: &str) -> Option<&BTreeSet<(String, String)>> {
        self.forward.get(&(left.to_string(), right.to_string()))
    }

    /// Source pairs that merge into `merged`, with annotations.
    pub fn backward(&self, merged: &str) -> Option<&BTreeSet<(RuleKey, String)>> {
        self.backward.get(merged)
    }

    /// Longest left key (in chars, including a leading `^`).
    pub fn lc_len_max(&self) -> usize {
        self.lc_len_max
    }

    pub fn rc_len_max(&self) -> usize {
        self.rc_len_max
    }

    pub fn after_len_max(&self) -> usize {
        self.after_len_max
    }

    /// Number of distinct forward keys.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Write the table to `path` atomically (temp file in the same directory, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        let temp_file = NamedTempFile::new_in(dir)?;
        bincode::serialize_into(BufWriter::new(&temp_file), self)?;
        temp_file.persist(path).map_err(|e| Error::Io(e.error))?;
        log::debug!("[rules] saved keys={} path={}", self.len(), path.display());
        Ok(())
    }

    /// Load a table written by [`RuleTable::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let table: RuleTable = bincode::deserialize_from(reader)?;
        Ok(table)
    }

    /// The embedded default corpus, compiled on first use.
    pub fn default_rules() -> Arc<RuleTable> {
        Arc::clone(&DEFAULT_RULES)
    }
}

/// Embedded rule corpus, in load order.
const EMBEDDED_CORPUS: &[(&str, &str)] = &[
    ("svara.txt", include_str!("../../data/sandhi_rules/svara.txt")),
    ("hal.txt", include_str!("../../data/sandhi_rules/hal.txt")),
    ("anusvara.txt", include_str!("../../data/sandhi_rules/anusvara.txt")),
    ("visarga.txt", include_str!("../../data/sandhi_rules/visarga.txt")),
    ("pada.txt", include_str!("../../data/sandhi_rules/pada.txt")),
];

static DEFAULT_RULES: Lazy<Arc<RuleTable>> = Lazy::new(|| {
    let mut builder = RuleTableBuilder::new();
    for (name, text) in EMBEDDED_CORPUS {
        builder.add_rules_from_str(name, text).expect("embedded sandhi rules must parse");
    }
    Arc::new(builder.build())
});

/// Accumulates rules from one or more corpus sources.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    table: RuleTable,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one concrete rule.
    pub fn add_rule(&mut self, left: &str, right: &str, merged: &str, annotation: &str) {
        let t = &mut self.table;
        t.forward
            .entry((left.to_string(), right.to_string()))
            .or_default()
            .insert((merged.to_string(), annotation.to_string()));
        t.backward
            .entry(merged.to_string())
            .or_default()
            .insert(((left.to_string(), right.to_string()), annotation.to_string()));
        t.lc_len_max = t.lc_len_max.max(left.chars().count());
        t.rc_len_max = t.rc_len_max.max(right.chars().count());
        t.after_len_max = t.after_len_max.max(merged.chars().count());
    }

    /// Parse and expand every rule line in `text`; `name` is used in annotations.
    ///
    /// Blank lines and `#` comments are skipped. The first malformed line aborts
    /// the load.
    pub fn add_rules_from_str(&mut self, name: &str, text: &str) -> Result<usize> {
        let mut added = 0;
        for (ix, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let lineno = ix + 1;
            let rule = RuleLine::parse(line).map_err(|reason| Error::InvalidRuleSpec {
                source_name: name.to_string(),
                line: lineno,
                reason,
            })?;
            let annotation = format!("{name}:{lineno}");
            for r in rule.expand() {
                self.add_rule(&r.left, &r.right, &r.merged, &annotation);
                added += 1;
            }
        }
        log::debug!("[rules] source={name} expanded={added}");
        Ok(added)
    }

    pub fn add_rules_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        self.add_rules_from_str(&name, &text)
    }

    /// Load every `*.txt` file in `dir`, in file name order.
    pub fn add_rules_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let mut files: Vec<_> = std::fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        let mut added = 0;
        for file in files {
            added += self.add_rules_from_file(&file)?;
        }
        Ok(added)
    }

    pub fn build(self) -> RuleTable {
        log::debug!(
            "[rules] built keys={} lc_len_max={} rc_len_max={} after_len_max={}",
            self.table.forward.len(),
            self.table.lc_len_max,
            self.table.rc_len_max,
            self.table.after_len_max
        );
        self.table
    }
}
