use crate::models::domain::{ActivityEntry, ScoredOffering};
use serde::{Deserialize, Serialize};

/// Response for the match endpoint.
///
/// `data` is ordered by descending `match_score`, stable for ties, and never
/// contains an offering the investor has already engaged with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub data: Vec<ScoredOffering>,
    pub total: usize,
    pub has_preferences: bool,
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

/// Response after recording an interest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInterestResponse {
    pub success: bool,
    pub interest_id: String,
}

/// One formatted entry in the activity feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityItem {
    #[serde(flatten)]
    pub entry: ActivityEntry,
    pub formatted_message: String,
    pub time_ago: String,
}

/// Response for the activity feed endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub data: Vec<ActivityItem>,
    pub count: usize,
    pub has_more: bool,
}
