//! Dogmatch - pairs dogs with walkers by overlapping weekly availability
//!
//! The matching core is pure and works on in-memory records; storage is
//! reached through the [`services::MatchRepository`] trait.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{find_overlap, Matcher, MatchResult, Overlap};
pub use models::{AvailabilityWindow, Dog, DogWalker, Match, WindowOwner};
pub use services::{InMemoryRepository, MatchRepository, MatchRun, MatchStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.min_overlap_minutes(), 15);
        assert!(matcher.find_matches(&[], &[]).matches.is_empty());
    }
}
