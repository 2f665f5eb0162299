//! Trigger conditions over the junction of two words.
//!
//! ```text
//!   left = "rAma"          right = "iti"
//!           ││└ l = a              │└ rc = ti
//!           │└─ ll = m             └─ r = i
//!           └── lc = rAm           rr = t
//! ```

use super::sutra::GlobalDomains;
use crate::phonology::{is_in_pratyahara, is_savarna};
use crate::text::{char_head, char_tail};

/// Variable of the junction environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Var {
    /// Last varna of the left word.
    L,
    /// First varna of the right word.
    R,
    /// Second-to-last varna of the left word.
    LL,
    /// Second varna of the right word.
    RR,
    /// Left word without its last varna.
    LC,
    /// Right word without its first varna.
    RC,
}

/// The junction of `left` and `right`, split into its variables.
///
/// Words of one varna have empty `ll`/`lc` (`rr`/`rc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env {
    pub l: String,
    pub r: String,
    pub ll: String,
    pub rr: String,
    pub lc: String,
    pub rc: String,
}

impl Env {
    pub fn new(left: &str, right: &str) -> Self {
        let ln = left.chars().count();
        let rn = right.chars().count();
        let lc = char_head(left, ln.saturating_sub(1));
        let rc = if rn > 1 { char_tail(right, 1) } else { "" };
        Env {
            l: char_tail(left, ln.saturating_sub(1)).to_string(),
            r: char_head(right, rn.min(1)).to_string(),
            ll: if ln > 1 { char_tail(lc, ln - 2).to_string() } else { String::new() },
            rr: char_head(rc, rc.chars().count().min(1)).to_string(),
            lc: lc.to_string(),
            rc: rc.to_string(),
        }
    }

    pub fn get(&self, var: Var) -> &str {
        match var {
            Var::L => &self.l,
            Var::R => &self.r,
            Var::LL => &self.ll,
            Var::RR => &self.rr,
            Var::LC => &self.lc,
            Var::RC => &self.rc,
        }
    }
}

/// Engine-wide switches a sutra can set for a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// A guna/vriddhi substitute just replaced `f`; 1.1.51 appends `r`.
    Uran,
}

/// Mutable engine state visible to conditions and updates.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub domains: GlobalDomains,
    pub uran: bool,
}

impl State {
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Uran => self.uran,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    True,
    /// `var` is a member of the pratyahara `name` (length folded).
    InPratyahara { name: &'static str, var: Var },
    /// `var` is savarna with a literal indicator (`a`, `at`, `ku`, `stTdDn`).
    Savarna { of: &'static str, var: Var },
    /// `var` is savarna with the value of another variable.
    SavarnaVar { of: Var, var: Var },
    Eq { var: Var, value: &'static str },
    NotEq { var: Var, value: &'static str },
    Flag(Flag),
    Any(Vec<Cond>),
    All(Vec<Cond>),
    Not(Box<Cond>),
}

impl Cond {
    pub fn in_pratyahara(name: &'static str, var: Var) -> Self {
        Cond::InPratyahara { name, var }
    }

    pub fn savarna(of: &'static str, var: Var) -> Self {
        Cond::Savarna { of, var }
    }

    pub fn savarna_var(of: Var, var: Var) -> Self {
        Cond::SavarnaVar { of, var }
    }

    pub fn eq(var: Var, value: &'static str) -> Self {
        Cond::Eq { var, value }
    }

    pub fn not_eq(var: Var, value: &'static str) -> Self {
        Cond::NotEq { var, value }
    }

    pub fn any(conds: impl IntoIterator<Item = Cond>) -> Self {
        Cond::Any(conds.into_iter().collect())
    }

    pub fn all(conds: impl IntoIterator<Item = Cond>) -> Self {
        Cond::All(conds.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(cond: Cond) -> Self {
        Cond::Not(Box::new(cond))
    }

    pub fn eval(&self, env: &Env, state: &State) -> bool {
        match self {
            Cond::True => true,
            Cond::InPratyahara { name, var } => is_in_pratyahara(name, env.get(*var)),
            Cond::Savarna { of, var } => is_savarna(of, env.get(*var)),
            Cond::SavarnaVar { of, var } => is_savarna(env.get(*of), env.get(*var)),
            Cond::Eq { var, value } => env.get(*var) == *value,
            Cond::NotEq { var, value } => env.get(*var) != *value,
            Cond::Flag(flag) => state.flag(*flag),
            Cond::Any(cs) => cs.iter().any(|c| c.eval(env, state)),
            Cond::All(cs) => cs.iter().all(|c| c.eval(env, state)),
            Cond::Not(c) => !c.eval(env, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_the_junction() {
        let env = Env::new("rAma", "iti");
        assert_eq!((env.l.as_str(), env.ll.as_str(), env.lc.as_str()), ("a", "m", "rAm"));
        assert_eq!((env.r.as_str(), env.rr.as_str(), env.rc.as_str()), ("i", "t", "ti"));

        let short = Env::new("a", "u");
        assert_eq!((short.l.as_str(), short.ll.as_str(), short.lc.as_str()), ("a", "", ""));
        assert_eq!((short.r.as_str(), short.rr.as_str(), short.rc.as_str()), ("u", "", ""));

        let empty = Env::new("", "");
        assert_eq!(empty, Env::new("", ""));
        assert!(empty.l.is_empty() && empty.r.is_empty());
    }

    #[test]
    fn evaluates_conditions() {
        let env = Env::new("daDi", "idam");
        let state = State::default();
        let cases = [
            (Cond::True, true),
            (Cond::in_pratyahara("ik", Var::L), true),
            (Cond::in_pratyahara("ec", Var::L), false),
            (Cond::savarna("i", Var::R), true),
            (Cond::savarna("at", Var::R), false),
            (Cond::savarna_var(Var::L, Var::R), true),
            (Cond::eq(Var::RR, "d"), true),
            (Cond::not_eq(Var::LL, "D"), false),
            (Cond::Flag(Flag::Uran), false),
            (Cond::any([Cond::eq(Var::L, "u"), Cond::eq(Var::L, "i")]), true),
            (Cond::all([Cond::eq(Var::L, "u"), Cond::eq(Var::L, "i")]), false),
            (Cond::not(Cond::eq(Var::LC, "daD")), false),
        ];
        for (cond, expected) in cases {
            assert_eq!(cond.eval(&env, &state), expected, "{cond:?}");
        }
    }
}
