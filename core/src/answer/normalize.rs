use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical token for every "infinitely many solutions" phrasing.
pub const INFINITE_SOLUTIONS: &str = "infinitenumberofsolutions";

/// Canonical token for every "no solution" phrasing.
pub const NO_SOLUTION: &str = "nosolution";

// Longest phrasing first so every variant collapses whole in one pass.
static INFINITE_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new("infinitenumberofsolutions|infinitelymanysolutions|infinitesolutions|infinite")
        .expect("infinite-solutions pattern must compile")
});

static NO_SOLUTION_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new("nosolutions|nosolution|none").expect("no-solution pattern must compile")
});

/// Map an arbitrary answer string to its comparison form.
///
/// Total over all strings: lowercases, strips every whitespace character,
/// canonicalizes the inequality symbols `≥`/`≤` to their two-character ASCII
/// forms, then collapses the known "infinitely many solutions" and
/// "no solution" phrasings to one token each. Empty input yields empty
/// output, and the result is a fixed point of this function.
pub fn normalize(input: &str) -> String {
    let stripped: String = input
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let symbols = stripped.replace('≥', ">=").replace('≤', "<=");
    let infinite = INFINITE_PHRASES.replace_all(&symbols, INFINITE_SOLUTIONS);
    NO_SOLUTION_PHRASES
        .replace_all(&infinite, NO_SOLUTION)
        .into_owned()
}
