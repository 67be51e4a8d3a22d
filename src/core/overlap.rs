use chrono::{Duration, NaiveTime};

/// Default minimum overlap, in minutes
pub const DEFAULT_MIN_OVERLAP_MINUTES: u32 = 15;

/// Intersection of two same-day intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Overlap {
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Compute the overlap of two time-of-day intervals on the same weekday
///
/// The intersection is `[max(a_start, b_start), min(a_end, b_end)]`. It is
/// rejected when empty or when shorter than `min_overlap`; a duration equal
/// to `min_overlap` is accepted. Intervals never wrap past midnight.
///
/// # Arguments
/// * `a_start`, `a_end` - First interval
/// * `b_start`, `b_end` - Second interval
/// * `min_overlap` - Shortest acceptable intersection
///
/// # Returns
/// The overlap bounds, or `None` if the intervals don't overlap long enough
#[inline]
pub fn find_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
    min_overlap: Duration,
) -> Option<Overlap> {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);

    if start >= end {
        return None;
    }

    let overlap = Overlap { start, end };
    if overlap.duration() < min_overlap {
        return None;
    }

    Some(overlap)
}
