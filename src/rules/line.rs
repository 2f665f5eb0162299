//! One authored rule line and its expansion into concrete rules.
//!
//! ```text
//! [*ac-a] + [*ac] = {0}{1}/{0}'{1}
//! └─ left ┘  └right┘  └─ outputs ─┘
//! ```
//!
//! Each side is a sequence of classes. A class is either a bracketed list
//! (`[k,K,g,G]`), a pratyahara (`[*ac]`, `[*ac-a]`, right side also
//! `[*jaS+s]`), or plain literal text. Expansion takes the cartesian product of
//! every class choice and formats each output with the chosen members, left
//! classes first.

use crate::phonology::{PratyaharaReading, pratyahara};
use std::collections::BTreeSet;

/// Which side of the `+` a class sits on. Only the right side accepts `+xyz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A parsed, not yet expanded, rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    left: Vec<Vec<String>>,
    right: Vec<Vec<String>>,
    outputs: Vec<String>,
}

/// One concrete rule: `(left_suffix, right_prefix) -> merged`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpandedRule {
    pub left: String,
    pub right: String,
    pub merged: String,
}

impl RuleLine {
    /// Parse `left + right = out1/out2`. The error is a human readable reason.
    pub fn parse(line: &str) -> Result<RuleLine, String> {
        let (before, afters) = match line.split('=').collect::<Vec<_>>().as_slice() {
            [before, afters] => (before.trim(), afters.trim()),
            [_] => return Err("missing '='".to_string()),
            _ => return Err("more than one '='".to_string()),
        };
        let (left, right) = split_sides(before)?;

        let left = parse_side(left.trim(), Side::Left)?;
        let right = parse_side(right.trim(), Side::Right)?;
        if left.is_empty() {
            return Err("empty left context".to_string());
        }

        let outputs: Vec<String> = afters.split('/').map(|s| s.trim().to_string()).collect();
        let slots = left.len() + right.len();
        for out in &outputs {
            for cap in regex!(r"\{(\d+)\}").captures_iter(out) {
                let ix: usize = cap[1].parse().map_err(|_| format!("bad placeholder in '{out}'"))?;
                if ix >= slots {
                    return Err(format!("placeholder {{{ix}}} out of range ({slots} classes)"));
                }
            }
            if regex!(r"\{[^}]*$|^[^{]*\}").is_match(out) {
                return Err(format!("unbalanced braces in '{out}'"));
            }
        }

        Ok(RuleLine { left, right, outputs })
    }

    /// Every concrete rule this line stands for.
    pub fn expand(&self) -> Vec<ExpandedRule> {
        let lefts = product(&self.left);
        let rights = product(&self.right);
        let mut rules = Vec::with_capacity(self.outputs.len() * lefts.len() * rights.len());

        for out in &self.outputs {
            for l in &lefts {
                for r in &rights {
                    let slots: Vec<&str> = l.iter().chain(r.iter()).map(String::as_str).collect();
                    let merged = regex!(r"\{(\d+)\}")
                        .replace_all(out, |cap: &regex::Captures<'_>| {
                            cap[1].parse::<usize>().ok().and_then(|ix| slots.get(ix)).copied().unwrap_or("")
                        })
                        .into_owned();
                    rules.push(ExpandedRule { left: l.concat(), right: r.concat(), merged });
                }
            }
        }
        rules
    }
}

/// Split `left + right` at the `+` outside brackets; `[*jaS+s]` keeps its `+`.
fn split_sides(before: &str) -> Result<(&str, &str), String> {
    let mut depth = 0i32;
    let mut plus = None;
    for (i, c) in before.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            '+' if depth == 0 && plus.is_none() => plus = Some(i),
            _ => {}
        }
        if depth < 0 {
            break;
        }
    }
    if depth != 0 {
        return Err(format!("unbalanced brackets near '{before}'"));
    }
    let i = plus.ok_or_else(|| "missing '+'".to_string())?;
    Ok((&before[..i], &before[i + 1..]))
}

/// Split one side into classes.
fn parse_side(side: &str, which: Side) -> Result<Vec<Vec<String>>, String> {
    let mut classes = Vec::new();
    let mut last = 0;
    for cap in regex!(r"\[(.*?)\]").captures_iter(side) {
        let whole = cap.get(0).map(|m| m.range()).unwrap_or(0..0);
        literal_class(&side[last..whole.start], &mut classes)?;
        classes.push(bracket_class(&cap[1], which)?);
        last = whole.end;
    }
    literal_class(&side[last..], &mut classes)?;
    Ok(classes)
}

fn literal_class(text: &str, classes: &mut Vec<Vec<String>>) -> Result<(), String> {
    if text.contains('[') || text.contains(']') {
        return Err(format!("unbalanced brackets near '{text}'"));
    }
    let text = text.trim();
    if !text.is_empty() {
        classes.push(text.split(',').map(|s| s.trim().to_string()).collect());
    }
    Ok(())
}

fn bracket_class(body: &str, which: Side) -> Result<Vec<String>, String> {
    let Some(spec) = body.strip_prefix('*') else {
        return Ok(body.split(',').map(|s| s.trim().to_string()).collect());
    };

    let (name, op, extra) = match spec.find(['-', '+']) {
        Some(pos) => (&spec[..pos], Some(&spec[pos..pos + 1]), spec[pos + 1..].trim()),
        None => (spec, None, ""),
    };
    let name = name.trim();
    let varnas = pratyahara(name, PratyaharaReading::RULE_CLASS)
        .ok_or_else(|| format!("unknown pratyahara '{name}'"))?;

    let mut set: BTreeSet<char> = varnas.chars().collect();
    match (op, which) {
        (Some("-"), _) => extra.chars().for_each(|c| {
            set.remove(&c);
        }),
        (Some("+"), Side::Right) => set.extend(extra.chars()),
        (Some(op), Side::Left) => return Err(format!("'{op}' is not allowed in a left pratyahara class")),
        _ => {}
    }
    Ok(set.into_iter().map(String::from).collect())
}

/// Cartesian product of the classes; a side with no classes yields one empty choice.
fn product(classes: &[Vec<String>]) -> Vec<Vec<String>> {
    classes.iter().fold(vec![Vec::new()], |acc, class| {
        acc.iter()
            .flat_map(|prefix| {
                class.iter().map(move |choice| {
                    let mut next = prefix.clone();
                    next.push(choice.clone());
                    next
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(line: &str) -> Vec<(String, String, String)> {
        let mut v: Vec<_> = RuleLine::parse(line)
            .unwrap()
            .expand()
            .into_iter()
            .map(|r| (r.left, r.right, r.merged))
            .collect();
        v.sort();
        v
    }

    fn t(l: &str, r: &str, m: &str) -> (String, String, String) {
        (l.to_string(), r.to_string(), m.to_string())
    }

    #[test]
    fn literal_rule() {
        assert_eq!(expand("m + n = nn"), vec![t("m", "n", "nn")]);
    }

    #[test]
    fn class_with_placeholders() {
        assert_eq!(
            expand("m + [k,g] = N{1}"),
            vec![t("m", "g", "Ng"), t("m", "k", "Nk")]
        );
    }

    #[test]
    fn empty_right_side_is_word_end() {
        assert_eq!(expand("[a,i] + = {0}"), vec![t("a", "", "a"), t("i", "", "i")]);
    }

    #[test]
    fn pratyahara_with_exclusion_and_inclusion() {
        let rules = expand("[*eN-o] + [*jaS+s] = {0}{1}");
        assert_eq!(rules.len(), 6);
        assert!(rules.contains(&t("e", "s", "es")));
        assert!(!rules.iter().any(|(l, _, _)| l == "o"));
    }

    #[test]
    fn plus_inside_a_class_is_not_the_separator() {
        let rules = expand("a + [*jaS+s] = {0}{1}");
        assert!(rules.contains(&t("a", "s", "as")));
        assert!(rules.contains(&t("a", "j", "aj")));
    }

    #[test]
    fn multiple_outputs() {
        assert_eq!(
            expand("a + a = A/a"),
            vec![t("a", "a", "A"), t("a", "a", "a")]
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        let cases = [
            ("a + a", "missing '='"),
            ("a a = A", "missing '+'"),
            ("[*qq] + a = A", "unknown pratyahara"),
            ("[a,b + a = A", "unbalanced brackets"),
            ("a + a = {2}", "out of range"),
            ("[*ac+a] + a = A", "not allowed"),
            ("a] + [a = A", "unbalanced brackets"),
            ("[*ac+a] = A", "missing '+'"),
        ];
        for (line, reason) in cases {
            let err = RuleLine::parse(line).unwrap_err();
            assert!(err.contains(reason), "{line}: {err}");
        }
    }
}
