// Core algorithm exports
pub mod feed;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use feed::{format_activity_message, time_ago};
pub use filters::{classify_investment_fit, first_matching_sector, sector_matches, stage_matches, InvestmentFit};
pub use matcher::{MatchOutcome, Matcher};
pub use scoring::{days_since, score_offering};
