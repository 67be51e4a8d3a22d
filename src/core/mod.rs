// Core algorithm exports
pub mod matcher;
pub mod overlap;

pub use matcher::{Matcher, MatchResult};
pub use overlap::{find_overlap, Overlap, DEFAULT_MIN_OVERLAP_MINUTES};
