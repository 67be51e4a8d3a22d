use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::Match;

/// Response for the run matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchesResponse {
    #[serde(rename = "runId")]
    pub run_id: Uuid,
    #[serde(rename = "computedAt")]
    pub computed_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "minOverlapMinutes")]
    pub min_overlap_minutes: u32,
    #[serde(rename = "pairsEvaluated")]
    pub pairs_evaluated: usize,
    #[serde(rename = "skippedWindows")]
    pub skipped_windows: usize,
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
    pub matches: Vec<Match>,
}

/// Response for the list matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMatchesResponse {
    pub matches: Vec<Match>,
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
