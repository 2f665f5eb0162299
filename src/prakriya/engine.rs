use super::cond::{Env, State};
use super::resolver::sutra_priority;
use super::sutra::{Domain, Sutra, SutraId};
use super::sutras::ach_sandhi;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One applied sutra.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub sutra: SutraId,
    pub name: &'static str,
    pub domain: &'static str,
    pub left: String,
    pub right: String,
    /// Triggered at the same time but lost to `sutra`.
    pub rejected: Vec<SutraId>,
}

/// Derivation of the sandhi of two words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prakriya {
    pub left: String,
    pub right: String,
    pub steps: Vec<Step>,
    pub result: String,
}

impl fmt::Display for Prakriya {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} + {}", self.left, self.right)?;
        for s in &self.steps {
            write!(f, "  {:<10} {:<20} {} + {}", s.sutra.to_string(), s.name, s.left, s.right)?;
            if !s.rejected.is_empty() {
                let ids: Vec<String> = s.rejected.iter().map(|id| id.to_string()).collect();
                write!(f, "  (over {})", ids.join(", "))?;
            }
            writeln!(f)?;
        }
        write!(f, "= {}", self.result)
    }
}

/// Applies sutras to a word junction until none triggers.
///
/// A sutra that has applied, or that lost to one it is overridden by, is
/// disabled for the rest of the derivation, so every derivation ends after
/// at most one step per sutra.
#[derive(Debug, Clone)]
pub struct SutraEngine {
    sutras: Vec<Sutra>,
}

impl Default for SutraEngine {
    fn default() -> Self {
        Self::new(ach_sandhi())
    }
}

impl SutraEngine {
    pub fn new(sutras: Vec<Sutra>) -> Self {
        SutraEngine { sutras }
    }

    pub fn sutras(&self) -> &[Sutra] {
        &self.sutras
    }

    pub fn sandhi(&self, left: &str, right: &str) -> Prakriya {
        let mut state = State::default();
        let mut disabled = BTreeSet::new();
        let (mut l, mut r) = (left.to_string(), right.to_string());
        let mut steps = Vec::new();

        while let Some(step) = self.step(&l, &r, &mut state, &mut disabled) {
            l.clone_from(&step.left);
            r.clone_from(&step.right);
            steps.push(step);
            assert!(steps.len() <= self.sutras.len(), "sutra engine did not terminate on {left} + {right}");
        }

        let result = format!("{l}{r}");
        log::debug!("[prakriya] {left} + {right} -> {result} steps={}", steps.len());
        Prakriya { left: left.to_string(), right: right.to_string(), steps, result }
    }

    fn step(&self, l: &str, r: &str, state: &mut State, disabled: &mut BTreeSet<SutraId>) -> Option<Step> {
        let env = Env::new(l, r);
        for domain in Domain::EXECUTION_ORDER {
            state.domains.set_domain(domain);
            let triggered: Vec<&Sutra> = self
                .sutras
                .iter()
                .filter(|s| !disabled.contains(&s.id) && s.is_triggered(&env, state))
                .collect();
            let Some(winner) = sutra_priority(&triggered) else {
                continue;
            };

            let (left, right) = winner.apply(&env, state);
            disabled.insert(winner.id);
            let rejected: Vec<SutraId> = triggered.iter().filter(|s| s.id != winner.id).map(|s| s.id).collect();
            for id in &rejected {
                if winner.overrides(id) {
                    disabled.insert(*id);
                }
            }
            log::trace!("[prakriya] domain={} {winner} -> {left} + {right}", domain.name());
            return Some(Step { sutra: winner.id, name: winner.name, domain: domain.name(), left, right, rejected });
        }
        None
    }
}
