use tt::error::Error;
use tt::id::{generate, SubtaskId};

#[test]
fn round_trip_holds_for_valid_inputs() {
    let cases: &[(u64, &[u64])] = &[
        (1, &[1]),
        (1, &[2, 3]),
        (12, &[34, 56, 78]),
        (9, &[1, 1, 1, 1, 1]),
    ];

    for (root, path) in cases {
        let rendered = generate(*root, path).expect("generate");
        let parsed = SubtaskId::parse(&rendered).expect("parse");
        assert_eq!(parsed.root(), *root);
        assert_eq!(parsed.path(), *path);
    }
}

#[test]
fn generate_with_empty_path_always_fails() {
    for root in [1u64, 7, 100] {
        assert!(matches!(generate(root, &[]), Err(Error::EmptyPath)));
    }
}

#[test]
fn bare_root_is_not_a_subtask_id() {
    let err = SubtaskId::parse("1").unwrap_err();
    assert!(matches!(err, Error::MalformedIdentifier(id) if id == "1"));
}

#[test]
fn zero_segments_are_malformed() {
    assert!(matches!(
        SubtaskId::parse("1.0"),
        Err(Error::MalformedIdentifier(_))
    ));
}

#[test]
fn junk_is_malformed() {
    for input in ["", ".", "1.", ".1", "1.2.x", "-1.2", "1.+2", "a.b.c"] {
        assert!(
            matches!(SubtaskId::parse(input), Err(Error::MalformedIdentifier(_))),
            "expected malformed: {input:?}"
        );
    }
}

#[test]
fn from_str_matches_parse() {
    let via_parse = SubtaskId::parse("4.2.1").unwrap();
    let via_from_str: SubtaskId = "4.2.1".parse().unwrap();
    assert_eq!(via_parse, via_from_str);
}
