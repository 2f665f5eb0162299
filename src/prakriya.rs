//! Sandhi as a derivation: sutras, their triggers, and who wins a conflict.
//!
//! Where `engine::sandhi` joins words by looking up surface rules, this
//! module derives the same junctions step by step from Ashtadhyayi sutras and
//! records which sutra applied at each step.
//!
//! ```text
//! (left, right)
//!     │
//!     v
//! Env { l, r, ll, rr, lc, rc }                     (cond.rs)
//!     │  for each domain in EXECUTION_ORDER
//!     v
//! triggered = sutras where domain active && cond   (sutra.rs)
//!     │
//!     v
//! sutra_priority(triggered)                        (resolver.rs)
//!     │
//!     v
//! update, Xform -> new (left, right)               (ops.rs)
//!     │  winner disabled; repeat until nothing triggers
//!     v
//! Prakriya { steps, result }                       (engine.rs)
//! ```

#[path = "prakriya/cond.rs"]
mod cond;
#[path = "prakriya/engine.rs"]
mod engine;
#[path = "prakriya/ops.rs"]
mod ops;
#[path = "prakriya/resolver.rs"]
mod resolver;
#[path = "prakriya/sutra.rs"]
mod sutra;
#[path = "prakriya/sutras.rs"]
mod sutras;

#[allow(unused_imports)]
pub use cond::{Cond, Env, Flag, State, Var};
pub use engine::{Prakriya, Step, SutraEngine};
#[allow(unused_imports)]
pub use ops::{Op, Phon, Xform, is_guna, is_vriddhi};
#[allow(unused_imports)]
pub use resolver::{sutra_priority, winner};
#[allow(unused_imports)]
pub use sutra::{Domain, GlobalDomains, Sutra, SutraId, Update};
#[allow(unused_imports)]
pub use sutras::ach_sandhi;

#[cfg(test)]
#[path = "prakriya/tests.rs"]
mod tests;
