use simplex_core::{ParseErrorKind, Simplex, SolveError};

fn rejected(name: &str) -> (String, Simplex) {
    let json = simplex_test_fixtures::rigs::json(name).expect("load malformed fixture");
    let simplex = Simplex::new(&json);
    assert!(simplex.has_parse_error(), "{name} should be rejected");
    assert!(!simplex.is_loaded(), "{name} should not be loaded");
    assert!(!simplex.is_built(), "{name} should not be built");
    (json, simplex)
}

#[test]
fn syntax_error_points_at_the_bad_token() {
    let (json, simplex) = rejected("malformed-syntax");
    let err = simplex.parse_error().unwrap();
    assert!(matches!(err.kind, ParseErrorKind::Syntax(_)));
    let line = json[..err.offset()].lines().count();
    assert_eq!(line, 3);
}

#[test]
fn dangling_slider_points_at_the_combo() {
    let (json, simplex) = rejected("malformed-dangling");
    let err = simplex.parse_error().unwrap();
    assert_eq!(
        err.kind,
        ParseErrorKind::DanglingReference {
            entity: "combo",
            name: "A_B".into(),
            target: "slider",
            index: 3,
        }
    );
    assert!(json[err.offset()..].starts_with("{ \"name\": \"A_B\""));
    assert!(err.to_string().contains("at byte"));
}

#[test]
fn traversal_cycle_is_rejected() {
    let (_, simplex) = rejected("malformed-cycle");
    assert_eq!(
        simplex.parse_error().unwrap().kind,
        ParseErrorKind::TraversalCycle("Ping".into())
    );
}

#[test]
fn unsupported_version_is_rejected() {
    let (_, simplex) = rejected("malformed-version");
    assert_eq!(
        simplex.parse_error().unwrap().kind,
        ParseErrorKind::UnsupportedVersion(5)
    );
}

#[test]
fn rejected_rig_fails_fast_on_solve() {
    let (_, mut simplex) = rejected("malformed-dangling");
    assert_eq!(simplex.solve(&[1.0]), Err(SolveError::NotBuilt));
}

#[test]
fn from_json_surfaces_the_error() {
    let json = simplex_test_fixtures::rigs::json("malformed-cycle").unwrap();
    let err = Simplex::from_json(&json).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::TraversalCycle(_)));
}

#[test]
fn garbage_never_panics() {
    for text in ["", "null", "{", "{\"shapes\": 3}", "{\"encodingVersion\": \"two\"}"] {
        let simplex = Simplex::new(text);
        assert!(simplex.has_parse_error(), "{text:?}");
        assert!(!simplex.is_built());
    }
}
