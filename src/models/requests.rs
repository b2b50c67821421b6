use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find offering matches for an investor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(alias = "investor_id", rename = "investorId")]
    pub investor_id: String,
    /// Page size; falls back to the configured default when absent
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(default)]
    #[serde(alias = "exclude_offering_ids", rename = "excludeOfferingIds")]
    pub exclude_offering_ids: Vec<String>,
}

/// Request to express interest in an offering
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordInterestRequest {
    #[serde(alias = "investor_id", rename = "investorId")]
    pub investor_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "offering_id", rename = "offeringId")]
    pub offering_id: String,
    /// Pledged amount in cents; must meet the offering minimum when present
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request to save an offering to the watchlist
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveOfferingRequest {
    #[serde(alias = "investor_id", rename = "investorId")]
    pub investor_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "offering_id", rename = "offeringId")]
    pub offering_id: String,
}

/// Request to log an activity entry (internal use by the web tier)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordActivityRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub action: String,
    #[serde(default)]
    #[serde(alias = "entity_type", rename = "entityType")]
    pub entity_type: Option<String>,
    #[serde(default)]
    #[serde(alias = "entity_id", rename = "entityId")]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Query parameters for the activity feed
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityQuery {
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: String,
    #[serde(default = "default_feed_limit")]
    pub limit: u16,
    #[serde(default)]
    pub offset: u32,
}

fn default_feed_limit() -> u16 {
    20
}

/// Query parameters for offering search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: u16,
}

fn default_search_limit() -> u16 {
    20
}
