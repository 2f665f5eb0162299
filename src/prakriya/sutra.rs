use super::cond::{Cond, Env, State};
use super::ops::Xform;
use crate::error::{Error, Result};
use bitflags::bitflags;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Ashtadhyayi address: `adhyaya.pada.sutra[.sub]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SutraId {
    pub adhyaya: u32,
    pub pada: u32,
    pub sutra: u32,
    pub sub: Option<u32>,
}

impl SutraId {
    /// Panics unless `parts` has three or four components; used by `sutra!`.
    pub fn from_parts(parts: &[u32]) -> Self {
        assert!(parts.len() == 3 || parts.len() == 4, "sutra id needs 3 or 4 parts, got {parts:?}");
        SutraId { adhyaya: parts[0], pada: parts[1], sutra: parts[2], sub: parts.get(3).copied() }
    }

    /// Position in the Ashtadhyayi as one number; `sub` becomes the fraction.
    ///
    /// `6.1.87` is `61087`, `8.4.40.1` is `84040.1`.
    pub fn aps_num(&self) -> f64 {
        let whole = (self.sutra + self.pada * 1000 + self.adhyaya * 10000) as f64;
        match self.sub {
            Some(sub) => {
                let digits = sub.max(1).ilog10() + 1;
                whole + sub as f64 / 10f64.powi(digits as i32)
            }
            None => whole,
        }
    }
}

impl FromStr for SutraId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Config(format!("bad sutra id {s:?}: {e}")))?;
        if parts.len() != 3 && parts.len() != 4 {
            return Err(Error::Config(format!("bad sutra id {s:?}: expected a.p.s or a.p.s.n")));
        }
        Ok(SutraId::from_parts(&parts))
    }
}

impl fmt::Display for SutraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.adhyaya, self.pada, self.sutra)?;
        if let Some(sub) = self.sub {
            write!(f, ".{sub}")?;
        }
        Ok(())
    }
}

bitflags! {
    /// Grammatical domain a sutra operates in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Domain: u8 {
        const SAMJNA   = 1 << 0;
        const UPADESHA = 1 << 1;
        const PRAKRTI  = 1 << 2;
        const PRATYAYA = 1 << 3;
        const ANGA     = 1 << 4;
        const PADA     = 1 << 5;
        const SAMHITA  = 1 << 6;
        const STANDARD = 1 << 7;
    }
}

impl Domain {
    /// Order in which the engine visits domains within one step.
    pub const EXECUTION_ORDER: [Domain; 7] = [
        Domain::SAMJNA,
        Domain::PRAKRTI,
        Domain::PRATYAYA,
        Domain::ANGA,
        Domain::STANDARD,
        Domain::PADA,
        Domain::SAMHITA,
    ];

    pub fn name(self) -> &'static str {
        match self {
            d if d == Domain::SAMJNA => "saMjYA",
            d if d == Domain::UPADESHA => "upadeSa",
            d if d == Domain::PRAKRTI => "prakfti",
            d if d == Domain::PRATYAYA => "pratyaya",
            d if d == Domain::ANGA => "aNga",
            d if d == Domain::PADA => "pada",
            d if d == Domain::SAMHITA => "saMhitA",
            d if d == Domain::STANDARD => "standard",
            _ => "mixed",
        }
    }
}

/// Which domains are currently switched on. Starts in saMjYA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalDomains {
    active: Domain,
}

impl Default for GlobalDomains {
    fn default() -> Self {
        GlobalDomains { active: Domain::SAMJNA }
    }
}

impl GlobalDomains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `domain` the only active one.
    pub fn set_domain(&mut self, domain: Domain) {
        self.active = domain;
    }

    /// Are all of `domain`'s bits active?
    pub fn is_domain(&self, domain: Domain) -> bool {
        self.active.contains(domain)
    }

    pub fn active(&self) -> Domain {
        self.active
    }
}

/// Side effect run on the engine state just before a sutra rewrites.
pub type Update = fn(&Env, &mut State);

/// One rewrite rule with its trigger and priority metadata.
#[derive(Clone)]
pub struct Sutra {
    pub name: &'static str,
    pub id: SutraId,
    pub cond: Cond,
    pub xform: Xform,
    pub domain: Domain,
    pub update: Option<Update>,
    pub optional: bool,
    /// Lower is more antaranga; beats a higher value regardless of position.
    pub bahiranga: u32,
    pub overrides: Vec<SutraId>,
}

impl Sutra {
    pub fn is_triggered(&self, env: &Env, state: &State) -> bool {
        state.domains.is_domain(self.domain) && self.cond.eval(env, state)
    }

    pub fn aps_num(&self) -> f64 {
        self.id.aps_num()
    }

    pub fn overrides(&self, other: &SutraId) -> bool {
        self.overrides.contains(other)
    }

    /// Run `update`, then rewrite the environment into a new `(left, right)`.
    pub fn apply(&self, env: &Env, state: &mut State) -> (String, String) {
        if let Some(update) = self.update {
            update(env, state);
        }
        self.xform.apply(env)
    }
}

impl fmt::Debug for Sutra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sutra")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("domain", &self.domain)
            .field("optional", &self.optional)
            .field("bahiranga", &self.bahiranga)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Sutra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.name)?;
        if self.optional {
            write!(f, " (optional)")?;
        }
        Ok(())
    }
}
