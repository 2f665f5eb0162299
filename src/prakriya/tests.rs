use super::*;
use proptest::prelude::*;

fn id(s: &str) -> SutraId {
    s.parse().unwrap()
}

fn bare(s: &str) -> Sutra {
    Sutra {
        name: "test",
        id: id(s),
        cond: Cond::True,
        xform: Xform::new(Op::Keep, Op::Keep),
        domain: Domain::STANDARD,
        update: None,
        optional: false,
        bahiranga: 1,
        overrides: Vec::new(),
    }
}

#[test]
fn parses_sutra_ids() {
    let s = id("8.4.40.1");
    assert_eq!((s.adhyaya, s.pada, s.sutra, s.sub), (8, 4, 40, Some(1)));
    assert_eq!(s.to_string(), "8.4.40.1");
    assert_eq!(id(" 6.1.87 ").to_string(), "6.1.87");
    for bad in ["6.1", "6.1.x", "", "1.2.3.4.5"] {
        assert!(bad.parse::<SutraId>().is_err(), "{bad:?}");
    }
}

#[test]
fn aps_numbers() {
    let cases = [("6.1.87", 61087.0), ("1.1.51", 11051.0), ("8.4.40.1", 84040.1), ("8.4.40.12", 84040.12)];
    for (s, expected) in cases {
        assert!((id(s).aps_num() - expected).abs() < 1e-9, "{s}");
    }
}

#[test]
fn domains_are_exclusive() {
    let mut d = GlobalDomains::new();
    assert!(d.is_domain(Domain::SAMJNA));
    d.set_domain(Domain::PADA);
    assert!(d.is_domain(Domain::PADA));
    assert!(!d.is_domain(Domain::SAMJNA));
    assert_eq!(d.active(), Domain::PADA);
    assert_eq!(d.active().name(), "pada");
}

#[test]
fn positional_priority() {
    // (a, b, expected winner)
    let cases = [
        ("6.1.87", "6.1.101", "6.1.101"),
        ("1.1.51", "6.1.87", "1.1.51"),
        ("8.4.40", "8.4.55", "8.4.40"),
        ("6.1.87", "8.4.40", "6.1.87"),
        ("8.4.40.1", "8.4.40.2", "8.4.40.1"),
    ];
    for (a, b, expected) in cases {
        let (sa, sb) = (bare(a), bare(b));
        assert_eq!(winner(&sa, &sb).id, id(expected), "{a} vs {b}");
        assert_eq!(winner(&sb, &sa).id, id(expected), "{b} vs {a}");
    }
}

#[test]
fn antaranga_beats_position() {
    let mut outer = bare("6.1.101");
    outer.bahiranga = 2;
    let inner = bare("6.1.77");
    assert_eq!(winner(&outer, &inner).id, inner.id);
    assert_eq!(winner(&inner, &outer).id, inner.id);
}

#[test]
fn override_wins_regardless_of_ids() {
    for (a, b) in [("6.1.101", "6.1.77"), ("6.1.77", "6.1.101"), ("8.4.40", "8.4.55"), ("1.1.51", "6.1.87")] {
        let sa = bare(a);
        let mut sb = bare(b);
        sb.overrides.push(sa.id);
        sb.bahiranga = 3;
        assert_eq!(winner(&sa, &sb).id, sb.id, "{b} overrides {a}");
        assert_eq!(winner(&sb, &sa).id, sb.id, "{b} overrides {a}");
        assert_eq!(sutra_priority(&[&sa, &sb]).map(|s| s.id), Some(sb.id));
    }
}

#[test]
fn priority_folds_over_all_triggered() {
    let sutras = [bare("6.1.77"), bare("6.1.101"), bare("6.1.87")];
    let refs: Vec<&Sutra> = sutras.iter().collect();
    assert_eq!(sutra_priority(&refs).map(|s| s.id), Some(id("6.1.101")));
    assert!(sutra_priority(&[]).is_none());
}

#[test]
fn derivations() {
    // (left, right, result, applied sutras)
    let cases: &[(&str, &str, &str, &[&str])] = &[
        ("rAma", "iti", "rAmeti", &["6.1.87"]),
        ("deva", "fzi", "devarzi", &["6.1.87", "1.1.51"]),
        ("mahA", "fzi", "maharzi", &["6.1.87", "1.1.51"]),
        ("sadA", "eva", "sadEva", &["6.1.88"]),
        ("rAma", "asti", "rAmAsti", &["6.1.101"]),
        ("daDi", "idam", "daDIdam", &["6.1.101"]),
        ("iti", "eva", "ityeva", &["6.1.77"]),
        ("te", "eva", "tayeva", &["6.1.78"]),
        ("te", "api", "tepi", &["6.1.109"]),
        ("vAk", "daRqa", "vAgdaRqa", &["8.4.53"]),
        ("tad", "pAtra", "tatpAtra", &["8.4.55"]),
        ("tad", "ca", "tacca", &["8.4.40", "8.4.55"]),
        ("rAma", "gacCati", "rAmagacCati", &[]),
    ];
    let engine = SutraEngine::default();
    for (left, right, result, applied) in cases {
        let p = engine.sandhi(left, right);
        assert_eq!(p.result, *result, "{left} + {right}");
        let ids: Vec<String> = p.steps.iter().map(|s| s.sutra.to_string()).collect();
        assert_eq!(ids, *applied, "{left} + {right}");
    }
}

#[test]
fn apavada_is_recorded_over_the_general_rule() {
    let p = SutraEngine::default().sandhi("daDi", "idam");
    assert_eq!(p.steps[0].rejected, vec![id("6.1.77")]);
    assert_eq!(p.steps[0].domain, "standard");
    assert_eq!(p.to_string().lines().last(), Some("= daDIdam"));
}

#[test]
fn sutras_run_only_in_their_domain() {
    let visarga = sutra! {
        name: "sasajuzoruH",
        id: (8, 2, 66),
        cond: Cond::eq(Var::L, "s"),
        xform: Xform::new(Op::Literal("r"), Op::Keep),
        domain: Domain::PADA,
    };
    let mut env_state = State::default();
    let env = Env::new("punas", "api");
    env_state.domains.set_domain(Domain::STANDARD);
    assert!(!visarga.is_triggered(&env, &env_state));
    env_state.domains.set_domain(Domain::PADA);
    assert!(visarga.is_triggered(&env, &env_state));

    let p = SutraEngine::new(vec![visarga]).sandhi("punas", "api");
    assert_eq!(p.result, "punarapi");
    assert_eq!(p.steps.len(), 1);
    assert_eq!(p.steps[0].domain, "pada");
}

proptest! {
    #[test]
    fn every_derivation_terminates(left in "[aAiIuUfeoEOkgcjtdpbnmsy]{1,5}", right in "[aAiIuUfeoEOkgcjtdpbnmsy]{1,5}") {
        let engine = SutraEngine::default();
        let p = engine.sandhi(&left, &right);
        prop_assert!(p.steps.len() <= engine.sutras().len());
        let distinct: std::collections::BTreeSet<_> = p.steps.iter().map(|s| s.sutra).collect();
        prop_assert_eq!(distinct.len(), p.steps.len());
    }
}
