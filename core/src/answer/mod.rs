pub mod equivalence;
pub mod normalize;

pub use equivalence::{is_equivalent, match_rule, MatchRule};
pub use normalize::normalize;
