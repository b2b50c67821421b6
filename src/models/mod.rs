// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivityEntry, CompanySummary, Interest, InterestStatus, InvestorProfile, MatchWeights,
    Offering, OfferingStatus, Profile, SavedOffering, ScoredOffering, UserRole,
};
pub use requests::{
    ActivityQuery, FindMatchesRequest, RecordActivityRequest, RecordInterestRequest,
    SaveOfferingRequest, SearchQuery,
};
pub use responses::{
    ActivityItem, ActivityResponse, ErrorResponse, HealthResponse, MatchResponse,
    RecordInterestResponse,
};
