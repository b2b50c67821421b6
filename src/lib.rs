//! EquityAI Match - offering match engine for the EquityAI marketplace
//!
//! This library ranks live funding offerings against an investor's stated
//! preferences and activity signals, producing an ordered, explained
//! recommendation list. Scoring is an additive tier system (sector, stage,
//! investment-size fit, social proof, recency) over an immutable candidate
//! snapshot.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{score_offering, MatchOutcome, Matcher};
pub use models::{
    InvestorProfile, MatchResponse, MatchWeights, Offering, OfferingStatus, ScoredOffering,
};
