use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building domain records from raw input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Start must be before end ({start} >= {end})")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("Weekday index out of range: {0} (expected 0-6, Monday=0)")]
    InvalidWeekday(i64),
}

/// Convert a stored weekday index (0 = Monday) into a `Weekday`
pub fn weekday_from_index(index: i64) -> Result<Weekday, DomainError> {
    u8::try_from(index)
        .ok()
        .and_then(|i| Weekday::try_from(i).ok())
        .ok_or(DomainError::InvalidWeekday(index))
}

/// Inverse of [`weekday_from_index`]
#[inline]
pub fn weekday_index(weekday: Weekday) -> i16 {
    weekday.num_days_from_monday() as i16
}

/// The entity an availability window belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum WindowOwner {
    Dog(i64),
    Walker(i64),
}

/// A recurring weekly time-of-day interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: i64,
    pub weekday: Weekday,
    #[serde(rename = "startTime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endTime")]
    pub end_time: NaiveTime,
    pub owner: WindowOwner,
}

impl AvailabilityWindow {
    /// Build a window, rejecting `start_time >= end_time`
    pub fn new(
        id: i64,
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        owner: WindowOwner,
    ) -> Result<Self, DomainError> {
        if start_time >= end_time {
            return Err(DomainError::InvalidWindow {
                start: start_time,
                end: end_time,
            });
        }

        Ok(Self {
            id,
            weekday,
            start_time,
            end_time,
            owner,
        })
    }

    /// Windows loaded from storage may bypass `new`; the matcher checks this
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }
}

/// Dog with its availability windows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(rename = "ownerId")]
    pub owner_id: i64,
    #[serde(default)]
    pub availabilities: Vec<AvailabilityWindow>,
}

/// Dog walker with its availability windows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogWalker {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub availabilities: Vec<AvailabilityWindow>,
}

/// A dog and a walker sharing an overlap on one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "dogId")]
    pub dog_id: i64,
    #[serde(rename = "dogName")]
    pub dog_name: String,
    #[serde(rename = "walkerId")]
    pub walker_id: i64,
    #[serde(rename = "walkerName")]
    pub walker_name: String,
    pub weekday: Weekday,
    #[serde(rename = "startTime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endTime")]
    pub end_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        let err = AvailabilityWindow::new(1, Weekday::Mon, t(10, 0), t(9, 0), WindowOwner::Dog(1))
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidWindow { start: t(10, 0), end: t(9, 0) });

        assert!(AvailabilityWindow::new(1, Weekday::Mon, t(9, 0), t(9, 0), WindowOwner::Dog(1)).is_err());
        assert!(AvailabilityWindow::new(1, Weekday::Mon, t(9, 0), t(9, 1), WindowOwner::Dog(1)).is_ok());
    }

    #[test]
    fn test_weekday_index_mapping() {
        assert_eq!(weekday_from_index(0), Ok(Weekday::Mon));
        assert_eq!(weekday_from_index(6), Ok(Weekday::Sun));
        assert_eq!(weekday_from_index(7), Err(DomainError::InvalidWeekday(7)));
        assert_eq!(weekday_from_index(-1), Err(DomainError::InvalidWeekday(-1)));
        assert_eq!(weekday_index(Weekday::Wed), 2);
    }
}
