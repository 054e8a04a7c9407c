use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalize::normalize;

static COORD_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((-?\d+),(-?\d+)\)$").expect("coordinate pattern must compile"));

static BARE_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+$").expect("integer pattern must compile"));

static FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+)/(-?\d+)$").expect("fraction pattern must compile"));

/// Rule that accepted a submission. Rules are tried in declaration order and
/// the first acceptance wins; there is no partial credit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    Alternative,
    CoordinatePair,
    Integer,
    Fraction,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::Alternative => "alternative",
            MatchRule::CoordinatePair => "coordinate_pair",
            MatchRule::Integer => "integer",
            MatchRule::Fraction => "fraction",
        }
    }
}

/// Decide whether a learner's raw input is an acceptable answer, and report
/// which rule accepted it. Both sides are normalized before comparison;
/// malformed input never errors, it just fails every rule.
pub fn match_rule<S: AsRef<str>>(
    input: &str,
    canonical: &str,
    alternatives: &[S],
) -> Option<MatchRule> {
    let user = normalize(input);
    let correct = normalize(canonical);

    if user == correct {
        return Some(MatchRule::Exact);
    }

    if alternatives.iter().any(|alt| normalize(alt.as_ref()) == user) {
        return Some(MatchRule::Alternative);
    }

    if let Some(correct_coords) = COORD_PAIR.captures(&correct) {
        if let Some(user_coords) = COORD_PAIR.captures(&user) {
            // Captured digit text is compared verbatim: "(2,-01)" is not "(2,-1)".
            if user_coords[1] == correct_coords[1] && user_coords[2] == correct_coords[2] {
                return Some(MatchRule::CoordinatePair);
            }
        }
    }

    // Canonical forms arrive with set braces already stripped, so "{-1}" is
    // stored as "-1" and a bare signed integer is accepted against it.
    if BARE_INT.is_match(&correct) {
        if let Some(m) = BARE_INT.find(&user) {
            if m.as_str() == correct {
                return Some(MatchRule::Integer);
            }
        }
    }

    if correct.contains('/') {
        if let (Some(user_frac), Some(correct_frac)) =
            (FRACTION.captures(&user), FRACTION.captures(&correct))
        {
            if let (Ok(un), Ok(ud), Ok(cn), Ok(cd)) = (
                user_frac[1].parse::<i64>(),
                user_frac[2].parse::<i64>(),
                correct_frac[1].parse::<i64>(),
                correct_frac[2].parse::<i64>(),
            ) {
                // Cross-multiplied in i128 so the comparison cannot overflow.
                if un as i128 * cd as i128 == ud as i128 * cn as i128 {
                    return Some(MatchRule::Fraction);
                }
            }
        }
    }

    None
}

/// Boolean form of [`match_rule`].
pub fn is_equivalent<S: AsRef<str>>(input: &str, canonical: &str, alternatives: &[S]) -> bool {
    match_rule(input, canonical, alternatives).is_some()
}
