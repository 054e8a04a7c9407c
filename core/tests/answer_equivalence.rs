use drill_core::answer::{is_equivalent, match_rule, normalize, MatchRule};

const NO_ALTS: &[&str] = &[];

#[test]
fn normalize_is_idempotent_and_total() {
    for s in [
        "",
        "   ",
        "No Solutions",
        "Infinite number of solutions",
        "x ≥ 3",
        "(2, -1)",
        " -7 / 5 ",
        "completely unrelated",
    ] {
        let once = normalize(s);
        assert_eq!(normalize(&once), once);
    }
    assert_eq!(normalize(""), "");
}

#[test]
fn case_and_whitespace_do_not_matter() {
    assert_eq!(normalize("x+y"), normalize("X + Y"));
    assert_eq!(normalize("181/15"), normalize(" 1 8 1 / 1 5 "));
}

#[test]
fn symbols_and_phrases_canonicalize() {
    assert_eq!(normalize("x ≥ 3"), normalize("x>=3"));
    assert_eq!(normalize("No solution"), normalize("none"));
    assert_eq!(normalize("No solution"), "nosolution");
}

#[test]
fn exact_match_is_symmetric() {
    let pairs = [("-7/5", " -7 / 5 "), ("m>=1", "m ≥ 1"), ("nosolution", "No Solutions")];
    for (a, b) in pairs {
        assert!(is_equivalent(a, b, NO_ALTS));
        assert!(is_equivalent(b, a, NO_ALTS));
    }
}

#[test]
fn fraction_equivalence_by_cross_multiplication() {
    assert!(is_equivalent("4/6", "2/3", NO_ALTS));
    assert!(!is_equivalent("1/2", "1/3", NO_ALTS));
    assert_eq!(match_rule("4/6", "2/3", NO_ALTS), Some(MatchRule::Fraction));
}

#[test]
fn coordinate_pairs_are_whitespace_insensitive_but_sign_sensitive() {
    assert!(is_equivalent("(2, -1)", "(2,-1)", NO_ALTS));
    assert!(!is_equivalent("(2,1)", "(2,-1)", NO_ALTS));
}

#[test]
fn alternatives_gate_cross_format_acceptance() {
    assert!(is_equivalent("12.0667", "181/15", &["12.0667"]));
    assert!(!is_equivalent("12.0667", "181/15", NO_ALTS));
}

#[test]
fn scenario_rows_from_the_reference_bank() {
    // canonical -7/5, learner " -7 / 5 "
    assert!(is_equivalent(" -7 / 5 ", "-7/5", NO_ALTS));
    // canonical nosolution, learner "No Solutions"
    assert!(is_equivalent("No Solutions", "nosolution", NO_ALTS));
    // canonical m>=1, learner "m ≥ 1"
    assert!(is_equivalent("m ≥ 1", "m>=1", NO_ALTS));
}

#[test]
fn rejection_never_panics_on_junk() {
    for junk in ["(((", ")", "/", "1/", "/2", "--5", "∞", "{-1}", "a/b"] {
        assert!(!is_equivalent(junk, "2/3", NO_ALTS), "accepted {:?}", junk);
    }
}
