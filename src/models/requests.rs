use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to recompute the match set
///
/// The body is optional; an empty body runs with the configured threshold.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RunMatchesRequest {
    #[validate(range(min = 1, max = 1440))]
    #[serde(alias = "min_overlap_minutes", rename = "minOverlapMinutes", default)]
    pub min_overlap_minutes: Option<u32>,
}
