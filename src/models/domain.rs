use serde::{Deserialize, Serialize};

/// Offering lifecycle status. The match engine only ever considers `Live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferingStatus {
    Draft,
    UnderReview,
    Live,
    Funded,
    Closed,
}

/// User role as stored in the marketplace profiles table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Founder,
    Investor,
    Admin,
}

/// Status of an expressed interest. Any row, regardless of status,
/// excludes the offering from the investor's future match results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "interest_status", rename_all = "lowercase")]
pub enum InterestStatus {
    Pending,
    Accepted,
    Declined,
    Withdrawn,
}

/// Marketplace user profile (read from Supabase)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Company summary embedded into an offering row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

/// A funding round posted by a founder's company.
///
/// Monetary fields are in cents. `interest_count` is not a Supabase column;
/// it is enriched from the interest store before scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offering {
    pub id: String,
    pub company_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: OfferingStatus,
    pub minimum_investment: i64,
    pub target_raise: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub company: Option<CompanySummary>,
    #[serde(default)]
    pub interest_count: i64,
}

impl Offering {
    /// Company sector, if the company embed carries one
    pub fn sector(&self) -> Option<&str> {
        self.company.as_ref().and_then(|c| c.sector.as_deref())
    }

    /// Company stage, if the company embed carries one
    pub fn stage(&self) -> Option<&str> {
        self.company.as_ref().and_then(|c| c.stage.as_deref())
    }
}

/// An investor's stated preferences (read from Supabase).
///
/// An absent record means "no stated preferences". It is not an error and
/// no preference-driven scoring tier triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub user_id: String,
    #[serde(default)]
    pub accredited: bool,
    #[serde(default)]
    pub investment_min: Option<i64>,
    #[serde(default)]
    pub investment_max: Option<i64>,
    #[serde(default)]
    pub sectors_of_interest: Vec<String>,
    #[serde(default)]
    pub stages_of_interest: Vec<String>,
}

impl InvestorProfile {
    /// True iff at least one of the sector/stage preference sets is non-empty
    pub fn has_preferences(&self) -> bool {
        !self.sectors_of_interest.is_empty() || !self.stages_of_interest.is_empty()
    }

    /// Both check-size bounds, when both are set
    pub fn investment_bounds(&self) -> Option<(i64, i64)> {
        self.investment_min.zip(self.investment_max)
    }
}

/// An investor's non-binding pledge against one offering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    pub id: uuid::Uuid,
    pub investor_id: String,
    pub offering_id: String,
    pub amount: Option<i64>,
    pub message: Option<String>,
    pub status: InterestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Watchlist entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedOffering {
    pub investor_id: String,
    pub offering_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One row of the activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: uuid::Uuid,
    pub user_id: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One scored offering in a match response. Never persisted: created fresh
/// for every match request and discarded with the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredOffering {
    #[serde(flatten)]
    pub offering: Offering,
    pub match_score: u32,
    pub match_reasons: Vec<String>,
}

/// Point values for the scoring tiers.
///
/// The defaults are the production values; deployments can override them
/// through `[scoring.weights]` in the config tree.
#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    pub sector: u32,
    pub stage: u32,
    pub range_fit: u32,
    pub capacity_fit: u32,
    pub popular: u32,
    pub traction: u32,
    pub new_listing: u32,
    pub recent: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            sector: 40,
            stage: 30,
            range_fit: 20,
            capacity_fit: 10,
            popular: 10,
            traction: 5,
            new_listing: 10,
            recent: 5,
        }
    }
}

impl MatchWeights {
    /// Maximum attainable score: one value per tier, highest sub-tier only
    pub fn max_score(&self) -> u32 {
        self.sector + self.stage + self.range_fit + self.popular + self.new_listing
    }
}
