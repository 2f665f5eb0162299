//! Built-in sutra set: vowel sandhi plus the consonant assimilations of 8.4.

use super::cond::{Cond, Env, Flag, State, Var};
use super::ops::{Op, Phon, Xform};
use super::sutra::Sutra;
use crate::phonology::is_savarna;

const STU: &str = "stTdDn";
const SCU: &str = "ScCjJY";
const ZWU: &str = "zwWqQR";

fn set_uran(env: &Env, state: &mut State) {
    if is_savarna("f", &env.r) {
        state.uran = true;
    }
}

fn clear_uran(_env: &Env, state: &mut State) {
    state.uran = false;
}

/// `l` from one class and `r` from the other, either way round.
fn either_way(a: &'static str, b: &'static str) -> Cond {
    Cond::any([
        Cond::all([Cond::savarna(a, Var::L), Cond::savarna(b, Var::R)]),
        Cond::all([Cond::savarna(b, Var::L), Cond::savarna(a, Var::R)]),
    ])
}

pub fn ach_sandhi() -> Vec<Sutra> {
    vec![
        sutra! {
            name: "uraRraparaH",
            id: (1, 1, 51),
            cond: Cond::Flag(Flag::Uran),
            xform: Xform::new(Op::Keep, Op::concat([Op::Keep, Op::Literal("r")])),
            update: clear_uran,
        },
        sutra! {
            name: "ikoyaRaci",
            id: (6, 1, 77),
            cond: Cond::all([Cond::in_pratyahara("ik", Var::L), Cond::in_pratyahara("ac", Var::R)]),
            xform: Xform::new(Op::apply(Phon::Ikoyan, Var::L), Op::Keep),
        },
        sutra! {
            name: "ecoyavAyAvaH",
            id: (6, 1, 78),
            cond: Cond::all([Cond::in_pratyahara("ec", Var::L), Cond::in_pratyahara("ac", Var::R)]),
            xform: Xform::new(Op::apply(Phon::Ayavayav, Var::L), Op::Keep),
        },
        sutra! {
            name: "AdguRaH",
            id: (6, 1, 87),
            cond: Cond::all([Cond::savarna("a", Var::L), Cond::in_pratyahara("ik", Var::R)]),
            xform: Xform::new(Op::Clear, Op::apply(Phon::Guna, Var::R)),
            update: set_uran,
        },
        sutra! {
            name: "vfdDireci",
            id: (6, 1, 88),
            cond: Cond::all([Cond::savarna("a", Var::L), Cond::in_pratyahara("ec", Var::R)]),
            xform: Xform::new(Op::Clear, Op::apply(Phon::Vriddhi, Var::R)),
            overrides: [(6, 1, 87)],
        },
        sutra! {
            name: "akaHsavarRedIrGaH",
            id: (6, 1, 101),
            cond: Cond::all([Cond::in_pratyahara("ak", Var::L), Cond::savarna_var(Var::L, Var::R)]),
            xform: Xform::new(Op::apply(Phon::Dirgha, Var::L), Op::Clear),
            overrides: [(6, 1, 77)],
        },
        sutra! {
            name: "eNaHpadAntAdati",
            id: (6, 1, 109),
            cond: Cond::all([Cond::in_pratyahara("eN", Var::L), Cond::savarna("at", Var::R)]),
            xform: Xform::new(Op::Keep, Op::Clear),
            overrides: [(6, 1, 78)],
        },
        sutra! {
            name: "stoHScunAScuH",
            id: (8, 4, 40),
            cond: either_way(STU, SCU),
            xform: Xform::new(Op::apply(Phon::Shcutva, Var::L), Op::apply(Phon::Shcutva, Var::R)),
        },
        sutra! {
            name: "zwunAzwuH",
            id: (8, 4, 41),
            cond: either_way(STU, ZWU),
            xform: Xform::new(Op::apply(Phon::Zwutva, Var::L), Op::apply(Phon::Zwutva, Var::R)),
        },
        sutra! {
            name: "JalAMjaSJaSi",
            id: (8, 4, 53),
            cond: Cond::all([Cond::in_pratyahara("Jal", Var::L), Cond::in_pratyahara("JaS", Var::R)]),
            xform: Xform::new(Op::apply(Phon::Jashtva, Var::L), Op::Keep),
        },
        sutra! {
            name: "Kari ca",
            id: (8, 4, 55),
            cond: Cond::all([Cond::in_pratyahara("Jal", Var::L), Cond::in_pratyahara("Kar", Var::R)]),
            xform: Xform::new(Op::apply(Phon::Chartva, Var::L), Op::Keep),
        },
    ]
}
