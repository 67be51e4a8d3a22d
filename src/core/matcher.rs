use chrono::Duration;
use crate::models::{AvailabilityWindow, Dog, DogWalker, Match};
use crate::core::overlap::{find_overlap, DEFAULT_MIN_OVERLAP_MINUTES};

/// Result of the matching process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub matches: Vec<Match>,
    /// Same-weekday window pairs handed to the overlap evaluator
    pub pairs_evaluated: usize,
    /// Windows with `start_time >= end_time`, ignored
    pub skipped_windows: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Drop malformed availability windows
/// 2. Pair every dog window with every walker window on the same weekday
/// 3. Keep pairs whose overlap reaches the minimum duration
/// 4. Order by dog name (case-insensitive, stable)
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    min_overlap_minutes: u32,
}

impl Matcher {
    pub fn new(min_overlap_minutes: u32) -> Self {
        Self { min_overlap_minutes }
    }

    pub fn with_default_threshold() -> Self {
        Self::new(DEFAULT_MIN_OVERLAP_MINUTES)
    }

    pub fn min_overlap_minutes(&self) -> u32 {
        self.min_overlap_minutes
    }

    /// Find every dog/walker overlap across all availability windows
    ///
    /// No deduplication happens: several overlapping window pairs for the same
    /// dog and walker on one weekday produce one match each.
    ///
    /// # Arguments
    /// * `dogs` - All dogs with their windows, in iteration order
    /// * `walkers` - All walkers with their windows, in iteration order
    ///
    /// # Returns
    /// MatchResult with matches sorted by dog name
    pub fn find_matches(&self, dogs: &[Dog], walkers: &[DogWalker]) -> MatchResult {
        let min_overlap = Duration::minutes(i64::from(self.min_overlap_minutes));
        let mut skipped_windows = 0;

        // Stage 1: integrity filter, done once per entity rather than per pair
        let dog_windows: Vec<(&Dog, Vec<&AvailabilityWindow>)> = dogs
            .iter()
            .map(|dog| {
                let windows = well_formed(&dog.availabilities, &dog.name, &mut skipped_windows);
                (dog, windows)
            })
            .collect();

        let walker_windows: Vec<(&DogWalker, Vec<&AvailabilityWindow>)> = walkers
            .iter()
            .map(|walker| {
                let windows = well_formed(&walker.availabilities, &walker.name, &mut skipped_windows);
                (walker, windows)
            })
            .collect();

        // Stages 2 & 3
        let mut pairs_evaluated = 0;
        let mut matches = Vec::new();

        for (dog, dog_avail) in &dog_windows {
            for (walker, walker_avail) in &walker_windows {
                for da in dog_avail {
                    for wa in walker_avail {
                        if da.weekday != wa.weekday {
                            continue;
                        }
                        pairs_evaluated += 1;

                        if let Some(overlap) = find_overlap(
                            da.start_time,
                            da.end_time,
                            wa.start_time,
                            wa.end_time,
                            min_overlap,
                        ) {
                            matches.push(Match {
                                dog_id: dog.id,
                                dog_name: dog.name.clone(),
                                walker_id: walker.id,
                                walker_name: walker.name.clone(),
                                weekday: da.weekday,
                                start_time: overlap.start,
                                end_time: overlap.end,
                            });
                        }
                    }
                }
            }
        }

        // Stage 4: stable, so ties keep discovery order
        matches.sort_by_cached_key(|m| m.dog_name.to_lowercase());

        tracing::debug!(
            "Evaluated {} window pairs across {} dogs and {} walkers, {} matches",
            pairs_evaluated,
            dogs.len(),
            walkers.len(),
            matches.len()
        );

        MatchResult {
            matches,
            pairs_evaluated,
            skipped_windows,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_threshold()
    }
}

fn well_formed<'a>(
    windows: &'a [AvailabilityWindow],
    owner_name: &str,
    skipped: &mut usize,
) -> Vec<&'a AvailabilityWindow> {
    windows
        .iter()
        .filter(|window| {
            if window.is_well_formed() {
                return true;
            }
            tracing::warn!(
                "Skipping malformed availability window {} of {:?} ({}): {} >= {}",
                window.id,
                window.owner,
                owner_name,
                window.start_time,
                window.end_time
            );
            *skipped += 1;
            false
        })
        .collect()
}
