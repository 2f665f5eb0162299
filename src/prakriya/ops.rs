//! Phonological substitutions and per-slot rewrites.

use super::cond::{Env, Var};
use crate::phonology::{PratyaharaReading, pratyahara};

/// Replace every char of `s` found in `from` by the char at the same position
/// in `to`; other chars pass through.
fn adesha(s: &str, from: &str, to: &str) -> String {
    s.chars()
        .map(|c| match from.chars().position(|f| f == c) {
            Some(i) => to.chars().nth(i).unwrap_or(c),
            None => c,
        })
        .collect()
}

fn class(name: &str) -> String {
    pratyahara(name, PratyaharaReading { dirghas: false, ..PratyaharaReading::RULE_CLASS }).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phon {
    Dirgha,
    Guna,
    Vriddhi,
    Ikoyan,
    Samprasarana,
    Ayavayav,
    Shcutva,
    Zwutva,
    Jashtva,
    Chartva,
    Anunasika,
}

impl Phon {
    pub fn apply(self, s: &str) -> String {
        match self {
            Phon::Dirgha => adesha(s, "aAiIuUfFxX", "AAIIUUFFXX"),
            Phon::Guna => adesha(s, "iIuUfFxX", "eeooaaaa"),
            Phon::Vriddhi => adesha(&Phon::Guna.apply(s), "aeo", "AEO"),
            Phon::Ikoyan => adesha(&s.to_lowercase(), &class("ik"), &class("yaR")),
            Phon::Samprasarana => adesha(s, &class("yaR"), &class("ik")),
            Phon::Ayavayav => s
                .chars()
                .map(|c| match c {
                    'e' => "ay".to_string(),
                    'o' => "av".to_string(),
                    'E' => "Ay".to_string(),
                    'O' => "Av".to_string(),
                    c => c.to_string(),
                })
                .collect(),
            Phon::Shcutva => adesha(s, "stTdDn", "ScCjJY"),
            Phon::Zwutva => adesha(s, "stTdDn", "zwWqQR"),
            Phon::Jashtva => adesha(s, "JBGQDjbgqdKPCWTcwtkpSzsh", "jbgqdjbgqdgbjqdjqdgbjqdg"),
            Phon::Chartva => adesha(s, "kKgGcCjJwWqQtTdDpPbB", "kkkkccccwwwwttttpppp"),
            Phon::Anunasika => adesha(s, "kKgGcCjJwWqQtTdDpPbB", "NNNNYYYYRRRRnnnnmmmm"),
        }
    }
}

/// Is `s` a guna vowel (`a e o`)?
pub fn is_guna(s: &str) -> bool {
    matches!(s, "a" | "e" | "o")
}

/// Is `s` a vriddhi vowel (`A E O`)?
pub fn is_vriddhi(s: &str) -> bool {
    matches!(s, "A" | "E" | "O")
}

/// How one slot of the environment is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// The slot's own value.
    Keep,
    Clear,
    Literal(&'static str),
    Var(Var),
    Apply(Phon, Var),
    Concat(Vec<Op>),
}

impl Op {
    pub fn apply(phon: Phon, var: Var) -> Self {
        Op::Apply(phon, var)
    }

    pub fn concat(ops: impl IntoIterator<Item = Op>) -> Self {
        Op::Concat(ops.into_iter().collect())
    }

    fn eval(&self, slot: Var, env: &Env) -> String {
        match self {
            Op::Keep => env.get(slot).to_string(),
            Op::Clear => String::new(),
            Op::Literal(s) => s.to_string(),
            Op::Var(v) => env.get(*v).to_string(),
            Op::Apply(phon, v) => phon.apply(env.get(*v)),
            Op::Concat(ops) => ops.iter().map(|op| op.eval(slot, env)).collect(),
        }
    }
}

/// Rewrite of the four slots; the result is `(lc + l, r + rc)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xform {
    pub lc: Op,
    pub l: Op,
    pub r: Op,
    pub rc: Op,
}

impl Xform {
    /// Rewrite `l` and `r`, keep the context.
    pub fn new(l: Op, r: Op) -> Self {
        Xform { lc: Op::Keep, l, r, rc: Op::Keep }
    }

    pub fn with_lc(mut self, lc: Op) -> Self {
        self.lc = lc;
        self
    }

    pub fn with_rc(mut self, rc: Op) -> Self {
        self.rc = rc;
        self
    }

    pub fn apply(&self, env: &Env) -> (String, String) {
        let left = self.lc.eval(Var::LC, env) + &self.l.eval(Var::L, env);
        let right = self.r.eval(Var::R, env) + &self.rc.eval(Var::RC, env);
        (left, right)
    }
}
