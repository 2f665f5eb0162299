use super::*;
use crate::error::Error;

const SMALL: &str = "\
# comment lines and blanks are skipped

[a,A] + [i,I] = e
m + [k,g] = N{1}
^sas + [*hal] = sa{1}
";

fn small_table() -> RuleTable {
    let mut b = RuleTableBuilder::new();
    b.add_rules_from_str("small.txt", SMALL).unwrap();
    b.build()
}

#[test]
fn forward_and_backward_are_populated() {
    let t = small_table();
    let fwd = t.forward("A", "i").unwrap();
    assert!(fwd.contains(&("e".to_string(), "small.txt:3".to_string())));

    let back = t.backward("e").unwrap();
    assert_eq!(back.len(), 4);
    assert!(back.contains(&(("a".to_string(), "I".to_string()), "small.txt:3".to_string())));

    let back = t.backward("Ng").unwrap();
    assert!(back.iter().any(|((l, r), _)| l == "m" && r == "g"));
    assert!(t.forward("x", "y").is_none());
}

#[test]
fn window_maxima_count_chars() {
    let t = small_table();
    assert_eq!(t.lc_len_max(), 4); // "^sas"
    assert_eq!(t.rc_len_max(), 1);
    assert_eq!(t.after_len_max(), 3); // "sa" + one consonant
}

#[test]
fn malformed_line_reports_source_and_line() {
    let mut b = RuleTableBuilder::new();
    let err = b.add_rules_from_str("bad.txt", "a + a = A\n\na + a\n").unwrap_err();
    match err {
        Error::InvalidRuleSpec { source_name, line, reason } => {
            assert_eq!(source_name, "bad.txt");
            assert_eq!(line, 3);
            assert!(reason.contains("missing '='"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn save_and_load_round_trip() {
    let t = small_table();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.bin");
    t.save(&path).unwrap();
    let loaded = RuleTable::load(&path).unwrap();
    assert_eq!(loaded, t);
}

#[test]
fn load_of_garbage_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.bin");
    std::fs::write(&path, b"\xff\xff\xff\xff\xff\xff\xff\xff\xff").unwrap();
    assert!(matches!(RuleTable::load(&path), Err(Error::Serialization(_))));
}

#[test]
fn loads_txt_files_from_a_directory_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.txt"), "m + n = nn\n").unwrap();
    std::fs::write(dir.path().join("a.txt"), "a + a = A\n").unwrap();
    std::fs::write(dir.path().join("notes.md"), "not a rule").unwrap();

    let mut b = RuleTableBuilder::new();
    assert_eq!(b.add_rules_from_dir(dir.path()).unwrap(), 2);
    let t = b.build();
    assert_eq!(t.len(), 2);
    assert!(t.forward("a", "a").unwrap().contains(&("A".to_string(), "a.txt:1".to_string())));
}

#[test]
fn embedded_corpus_compiles() {
    let t = RuleTable::default_rules();
    assert!(!t.is_empty());
    // identity rule for word-final segments
    assert!(t.forward("a", "").is_some_and(|s| s.iter().any(|(m, _)| m == "a")));
    assert!(t.backward("nn").is_some_and(|s| s.iter().any(|((l, r), _)| l == "m" && r == "n")));
}
