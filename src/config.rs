//! Analyzer options.
//!
//! Everything has a default, so an empty TOML file is a valid configuration:
//!
//! ```toml
//! max_paths = 10
//! score = true
//! split_above = 5
//! replace_ending_visarga = "s"
//! lexicon = "data/lexicon.toml"
//! ```

use crate::error::{Error, Result};
use crate::text::VisargaPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Splits to return per input.
    pub max_paths: usize,
    /// Rank splits with the scorer instead of by word count.
    pub score: bool,
    /// Sort exhaustively enumerated splits by word count.
    pub sort_paths: bool,
    /// Largest partition range the sentence parser solves without splitting it.
    pub split_above: usize,
    /// Hard limit on exhaustively enumerated paths.
    pub path_ceiling: usize,
    pub replace_ending_visarga: Option<VisargaPolicy>,
    /// Take input verbatim and render output without restoring final visarga.
    pub strict_io: bool,
    /// Rule corpus directory; the embedded corpus when unset.
    pub rules_dir: Option<PathBuf>,
    /// Lexicon TOML; the embedded demonstration lexicon when unset.
    pub lexicon: Option<PathBuf>,
    /// N-gram scorer TOML; the length heuristic when unset.
    pub scorer: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_paths: 10,
            score: true,
            sort_paths: true,
            split_above: 5,
            path_ceiling: 100_000,
            replace_ending_visarga: None,
            strict_io: false,
            rules_dir: None,
            lexicon: None,
            scorer: None,
        }
    }
}

impl Options {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: Options = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("[config] loading {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_paths == 0 {
            return Err(Error::Config("max_paths must be at least 1".to_string()));
        }
        if self.split_above == 0 {
            return Err(Error::Config("split_above must be at least 1".to_string()));
        }
        if self.path_ceiling < self.max_paths {
            return Err(Error::Config(format!(
                "path_ceiling ({}) is below max_paths ({})",
                self.path_ceiling, self.max_paths
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let options = Options::from_toml_str("").unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(options.max_paths, 10);
        assert_eq!(options.split_above, 5);
        assert!(options.score && options.sort_paths && !options.strict_io);
    }

    #[test]
    fn reads_fields() {
        let options = Options::from_toml_str(
            r#"
            max_paths = 3
            score = false
            replace_ending_visarga = "r"
            lexicon = "lex.toml"
            "#,
        )
        .unwrap();
        assert_eq!(options.max_paths, 3);
        assert!(!options.score);
        assert_eq!(options.replace_ending_visarga, Some(VisargaPolicy::R));
        assert_eq!(options.lexicon, Some(PathBuf::from("lex.toml")));
    }

    #[test]
    fn rejects_bad_configuration() {
        let cases = [
            "max_paths = 0",
            "split_above = 0",
            "max_paths = 20\npath_ceiling = 5",
            "max_path = 3",
            "replace_ending_visarga = \"h\"",
            "score = \"yes\"",
        ];
        for text in cases {
            assert!(matches!(Options::from_toml_str(text), Err(Error::Config(_))), "{text:?}");
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_paths = 4").unwrap();
        assert_eq!(Options::from_path(file.path()).unwrap().max_paths, 4);
        assert!(matches!(Options::from_path("/nonexistent/padaccheda.toml"), Err(Error::Io(_))));
    }
}
