//! Maheshvara sutras and the phoneme-class queries built on them.
//!
//! A pratyahara like `ac` or `hal` names the run of the sutras from its first
//! letter up to (the first or last occurrence of) its closing it-marker. The
//! sutras are kept in SLP1 with a space after every it-marker, which is what the
//! slicing below relies on.
//!
//! ```text
//! aiuR fxk eoN EOc hayavaraw laR YamaNaRanam JaBaY GaQaDaz jabagaqadaS ...
//! ^--- ac (short) --^
//! ```

/// SLP1 rendition of the fourteen sutras, one space after each it-marker.
pub const MAHESHVARA_SUTRAS: &str =
    "aiuR fxk eoN EOc hayavaraw laR YamaNaRanam JaBaY GaQaDaz jabagaqadaS KaPaCaWaTacawatav kapay Sazasar hal ";

/// How to read a pratyahara.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PratyaharaReading {
    /// Stop at the last matching it-marker instead of the first.
    pub long: bool,
    /// Drop the euphonic `a` that follows each consonant.
    pub remove_a: bool,
    /// Add the long counterpart after every short simple vowel.
    pub dirghas: bool,
}

impl PratyaharaReading {
    /// Reading used when expanding `[*name]` classes in the rule corpus.
    pub const RULE_CLASS: Self = Self { long: false, remove_a: true, dirghas: true };
    /// Reading used for membership tests.
    pub const MEMBERSHIP: Self = Self { long: true, remove_a: false, dirghas: false };
}

/// Expand a pratyahara into the varnas it covers.
///
/// Returns `None` when `name` does not denote a run of the sutras.
pub fn pratyahara(name: &str, reading: PratyaharaReading) -> Option<String> {
    let mut chars = name.chars();
    let it = chars.next_back()?;
    let head = chars.as_str();
    if head.is_empty() {
        return None;
    }

    let start = MAHESHVARA_SUTRAS.find(head)?;
    let marker = format!("{it} ");
    let rest = &MAHESHVARA_SUTRAS[start..];
    let end = if reading.long { rest.rfind(&marker)? } else { rest.find(&marker)? };

    let span = regex!(r". ").replace_all(&rest[..end], "");
    let mut varnas: String = if reading.remove_a {
        let mut it = span.chars();
        let first = it.next()?;
        std::iter::once(first).chain(it.filter(|c| *c != 'a')).collect()
    } else {
        span.into_owned()
    };

    if reading.dirghas {
        varnas = varnas
            .chars()
            .flat_map(|c| {
                let long = match c {
                    'a' => Some('A'),
                    'i' => Some('I'),
                    'u' => Some('U'),
                    'f' => Some('F'),
                    'x' => Some('X'),
                    _ => None,
                };
                std::iter::once(c).chain(long)
            })
            .collect();
    }
    Some(varnas)
}

/// Fold long vowels onto their short forms and drop pluta markers.
fn hrasva(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '3')
        .map(|c| match c {
            'A' | 'I' | 'U' | 'F' | 'X' => c.to_ascii_lowercase(),
            _ => c,
        })
        .collect()
}

/// Is `varna` covered by the pratyahara `name`? Long vowels count as their
/// short counterparts. An empty varna is never covered.
pub fn is_in_pratyahara(name: &str, varna: &str) -> bool {
    let v = hrasva(varna);
    let Some(first) = v.chars().next() else {
        return false;
    };
    let reading = PratyaharaReading { remove_a: first == 'a', ..PratyaharaReading::MEMBERSHIP };
    match pratyahara(name, reading) {
        Some(varnas) => varnas.contains(&v),
        None => {
            log::debug!("[pratyahara] unknown name={name}");
            false
        }
    }
}

/// Is `varna` savarna with the indicator `v`?
///
/// `v` is either a single vowel (length-insensitive), a tapara like `at`
/// (exact match on the part before `t`), an udit like `ku` (the whole
/// consonant class), or a literal list of varnas.
pub fn is_savarna(v: &str, varna: &str) -> bool {
    match (v.is_empty(), varna.is_empty()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        _ => {}
    }

    if v.chars().count() == 1 {
        return hrasva(varna) == hrasva(v);
    }
    if let Some(stem) = v.strip_suffix('t') {
        return varna == stem;
    }
    if v.ends_with('u') {
        let class = match v.chars().next() {
            Some('k') => "kKgGN",
            Some('c') => "cCjJY",
            Some('w') => "wWqQR",
            Some('t') => "tTdDn",
            Some('p') => "pPbBm",
            _ => v,
        };
        return class.contains(varna);
    }
    v.contains(varna)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_pratyaharas() {
        let cases = [
            ("jaS", PratyaharaReading::MEMBERSHIP, Some("jabagaqada")),
            ("jaS", PratyaharaReading::RULE_CLASS, Some("jbgqd")),
            ("ac", PratyaharaReading::RULE_CLASS, Some("aAiIuUfFxXeoEO")),
            ("ik", PratyaharaReading::RULE_CLASS, Some("iIuUfFxX")),
            ("eN", PratyaharaReading::RULE_CLASS, Some("eo")),
            ("ec", PratyaharaReading::RULE_CLASS, Some("eoEO")),
            ("yaR", PratyaharaReading::RULE_CLASS, Some("yvrl")),
            ("hal", PratyaharaReading::RULE_CLASS, Some("hyvrlYmNRnJBGQDjbgqdKPCWTcwtkpSzsh")),
            ("qq", PratyaharaReading::RULE_CLASS, None),
            ("a", PratyaharaReading::RULE_CLASS, None),
        ];
        for (name, reading, expected) in cases {
            assert_eq!(pratyahara(name, reading).as_deref(), expected, "pratyahara {name}");
        }
    }

    #[test]
    fn membership_folds_vowel_length() {
        assert!(is_in_pratyahara("ac", "A"));
        assert!(is_in_pratyahara("ik", "I"));
        assert!(is_in_pratyahara("yaR", "v"));
        assert!(is_in_pratyahara("jaS", "g"));
        assert!(!is_in_pratyahara("jaS", "k"));
        assert!(!is_in_pratyahara("ik", "e"));
        assert!(!is_in_pratyahara("ac", ""));
    }

    #[test]
    fn savarna_forms() {
        assert!(is_savarna("a", "A"));
        assert!(is_savarna("i", "I"));
        assert!(!is_savarna("i", "u"));
        assert!(is_savarna("at", "a"));
        assert!(!is_savarna("at", "A"));
        assert!(is_savarna("ku", "g"));
        assert!(!is_savarna("ku", "c"));
        assert!(is_savarna("", ""));
        assert!(!is_savarna("a", ""));
    }
}
