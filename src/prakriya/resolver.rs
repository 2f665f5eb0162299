//! Choosing one sutra among several that trigger at the same time.
//!
//! ```text
//!   triggered: [s0, s1, s2, ...]
//!                 └─ winner(s0, s1) ─┐
//!                                    └─ winner(.., s2) ─ ... ─> applied sutra
//! ```
//!
//! Pairwise, in order:
//!
//! 1. a sutra that lists the other in `overrides` wins (apavAda),
//! 2. the lower `bahiranga` wins (antaraNga),
//! 3. by position `aps_num`: if either is in 1.1-1.4 (below 14000) or in the
//!    tripAdI (above 82000) the earlier wins, otherwise the later one (para).

use super::sutra::Sutra;
use std::cmp::Ordering;

/// The winner of a pair; ties go to `a`.
pub fn winner<'a>(a: &'a Sutra, b: &'a Sutra) -> &'a Sutra {
    if b.overrides(&a.id) {
        return b;
    }
    if a.overrides(&b.id) {
        return a;
    }
    match a.bahiranga.cmp(&b.bahiranga) {
        Ordering::Less => return a,
        Ordering::Greater => return b,
        Ordering::Equal => {}
    }

    let (x, y) = (a.aps_num(), b.aps_num());
    let earlier_wins = x < 14000.0 || y < 14000.0 || x > 82000.0 || y > 82000.0;
    let b_wins = if earlier_wins { y < x } else { y > x };
    if b_wins { b } else { a }
}

/// Fold [`winner`] over `triggered`. `None` when nothing triggered.
pub fn sutra_priority<'a>(triggered: &[&'a Sutra]) -> Option<&'a Sutra> {
    let (first, rest) = triggered.split_first()?;
    let chosen = rest.iter().fold(*first, |acc, s| {
        let w = winner(acc, s);
        log::trace!("[resolver] {} vs {} -> {}", acc.id, s.id, w.id);
        w
    });
    Some(chosen)
}
